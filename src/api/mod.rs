//! Trade backend access.
//!
//! Typed payloads for the `/countries`, `/trade/{code}` and
//! `/products/{code}` endpoints, plus the background client that fetches
//! them together with the world-boundaries dataset.

mod client;
mod types;

pub use client::{decode_response, ApiChannel, Endpoints};
pub use types::{
    ApiRequest, ApiResponse, Country, CountryData, FetchError, ProductData, ProductEntry, TradeData,
    TradePartner,
};
