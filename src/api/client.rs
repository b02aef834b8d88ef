//! HTTP client for the trade backend and the boundaries dataset.
//!
//! Uses channel-based communication to bridge async fetches with egui's
//! synchronous update loop.

use super::types::{ApiRequest, ApiResponse, FetchError};
use crate::geo::WorldBoundaries;
use crate::session::Fetcher;
use crate::state::GlobeSettings;
use eframe::egui;
use serde::de::DeserializeOwned;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Where each request is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub api_base_url: String,
    pub boundaries_url: String,
    /// TopoJSON object holding the country geometries
    pub boundaries_object: String,
}

impl Endpoints {
    pub fn from_settings(settings: &GlobeSettings) -> Self {
        Self {
            api_base_url: settings.api_base_url.clone(),
            boundaries_url: settings.boundaries_url.clone(),
            boundaries_object: settings.boundaries_object.clone(),
        }
    }

    pub fn url_for(&self, request: &ApiRequest) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        match request {
            ApiRequest::Boundaries => self.boundaries_url.clone(),
            ApiRequest::Countries => format!("{}/countries", base),
            ApiRequest::Trade { code, .. } => {
                format!("{}/trade/{}", base, urlencoding::encode(code.as_str()))
            }
            ApiRequest::Products { code, .. } => {
                format!("{}/products/{}", base, urlencoding::encode(code.as_str()))
            }
        }
    }
}

/// Channel-based fetcher.
///
/// Each request runs in the background (a thread natively, a local future
/// on wasm). Results are decoded off the UI thread where possible and
/// collected with [`ApiChannel::try_recv`] once per frame.
pub struct ApiChannel {
    sender: Sender<ApiResponse>,
    receiver: Receiver<ApiResponse>,
    ctx: egui::Context,
    endpoints: Endpoints,
}

impl ApiChannel {
    pub fn new(ctx: egui::Context, endpoints: Endpoints) -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            ctx,
            endpoints,
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn(&self, request: ApiRequest) {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        let url = self.endpoints.url_for(&request);
        let object_key = self.endpoints.boundaries_object.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let body = get_text(&url).await;
            let _ = sender.send(decode_response(request, body, &object_key));
            ctx.request_repaint();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn(&self, request: ApiRequest) {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        let url = self.endpoints.url_for(&request);
        let object_key = self.endpoints.boundaries_object.clone();

        std::thread::spawn(move || {
            let body = get_text(&url);
            let _ = sender.send(decode_response(request, body, &object_key));
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed request.
    pub fn try_recv(&self) -> Option<ApiResponse> {
        self.receiver.try_recv().ok()
    }
}

impl Fetcher for ApiChannel {
    fn fetch(&mut self, request: ApiRequest) {
        let url = self.endpoints.url_for(&request);
        log::debug!("GET {} ({})", url, request.label());
        self.spawn(request);
    }
}

fn decode_json<T: DeserializeOwned>(body: Result<String, FetchError>) -> Result<T, FetchError> {
    let text = body?;
    serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
}

fn decode_boundaries(
    body: Result<String, FetchError>,
    object_key: &str,
) -> Result<WorldBoundaries, FetchError> {
    let text = body?;
    WorldBoundaries::parse(&text, object_key).map_err(FetchError::Decode)
}

/// Turns a response body into the typed result for `request`.
pub fn decode_response(
    request: ApiRequest,
    body: Result<String, FetchError>,
    object_key: &str,
) -> ApiResponse {
    match request {
        ApiRequest::Boundaries => ApiResponse::Boundaries(decode_boundaries(body, object_key)),
        ApiRequest::Countries => ApiResponse::Countries(decode_json(body)),
        ApiRequest::Trade { code, generation } => ApiResponse::Trade {
            code,
            generation,
            result: decode_json(body),
        },
        ApiRequest::Products { code, generation } => ApiResponse::Products {
            code,
            generation,
            result: decode_json(body),
        },
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn get_text(url: &str) -> Result<String, FetchError> {
    match ureq::get(url).call() {
        Ok(response) => response
            .into_string()
            .map_err(|e| FetchError::Network(e.to_string())),
        Err(ureq::Error::Status(status, _)) => Err(FetchError::Status(status)),
        Err(e) => Err(FetchError::Network(e.to_string())),
    }
}

#[cfg(target_arch = "wasm32")]
async fn get_text(url: &str) -> Result<String, FetchError> {
    use wasm_bindgen::JsCast as _;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| FetchError::Network("No window".to_string()))?;
    let value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| FetchError::Network(format!("{:?}", e)))?;

    let response: web_sys::Response = value
        .dyn_into()
        .map_err(|_| FetchError::Network("Response is not a Response".to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let text = JsFuture::from(
        response
            .text()
            .map_err(|e| FetchError::Network(format!("{:?}", e)))?,
    )
    .await
    .map_err(|e| FetchError::Network(format!("{:?}", e)))?;

    text.as_string()
        .ok_or_else(|| FetchError::Decode("Response body is not text".to_string()))
}
