//! Request, response and payload types for the trade backend.

use crate::geo::{CountryCode, WorldBoundaries};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entry of `GET /countries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub country_code: CountryCode,
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePartner {
    pub country_code: CountryCode,
    pub country_name: String,
    pub value: f64,
}

/// Body of `GET /trade/{code}`. Partners keep the order they were received in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeData {
    pub exports: Vec<TradePartner>,
    pub imports: Vec<TradePartner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub product_name: String,
    pub value: f64,
}

/// Body of `GET /products/{code}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductData {
    pub exports: Vec<ProductEntry>,
    pub imports: Vec<ProductEntry>,
}

/// Payload of a per-country fetch together with the code it was fetched for.
///
/// A late response may belong to an earlier selection, so the data never
/// borrows its country from the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryData<T> {
    pub code: CountryCode,
    pub data: T,
}

impl<T> CountryData<T> {
    pub fn new(code: CountryCode, data: T) -> Self {
        Self { code, data }
    }
}

/// Why a fetch produced no usable data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    Status(u16),
    /// Request never completed.
    Network(String),
    /// Body was not the expected JSON.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP error! status: {}", status),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Work the UI asks the fetcher to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// The world-boundaries dataset.
    Boundaries,
    Countries,
    /// Trade partners of `code`, issued for selection `generation`.
    Trade { code: CountryCode, generation: u64 },
    /// Product categories of `code`, issued for selection `generation`.
    Products { code: CountryCode, generation: u64 },
}

impl ApiRequest {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Boundaries => "boundaries",
            Self::Countries => "countries",
            Self::Trade { .. } => "trade",
            Self::Products { .. } => "products",
        }
    }
}

/// Completed work, delivered back to the UI thread.
#[derive(Debug)]
pub enum ApiResponse {
    Boundaries(Result<WorldBoundaries, FetchError>),
    Countries(Result<Vec<Country>, FetchError>),
    Trade {
        code: CountryCode,
        generation: u64,
        result: Result<TradeData, FetchError>,
    },
    Products {
        code: CountryCode,
        generation: u64,
        result: Result<ProductData, FetchError>,
    },
}
