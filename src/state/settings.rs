//! Globe settings.
//!
//! In the browser settings are persisted to localStorage so they survive page
//! reloads. Native builds read an optional JSON file named by
//! `TRADE_GLOBE_CONFIG`; `TRADE_GLOBE_API` overrides the API base URL.

use super::rotation::DEFAULT_DRAG_SENSITIVITY;
use serde::{Deserialize, Serialize};

/// Globe radius in pixels.
pub const DEFAULT_GLOBE_SCALE: f64 = 250.0;

pub const DEFAULT_BOUNDARIES_URL: &str =
    "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeSettings {
    /// Base URL of the trade backend, e.g. `/api`.
    pub api_base_url: String,
    /// World-boundaries dataset (TopoJSON or GeoJSON).
    pub boundaries_url: String,
    /// TopoJSON object holding the country geometries.
    pub boundaries_object: String,
    /// Globe radius in pixels.
    pub globe_scale: f64,
    /// Pixels of drag per degree of rotation.
    pub drag_sensitivity: f64,
    /// Drop trade/product results issued for an earlier selection.
    pub discard_stale_responses: bool,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url().to_string(),
            boundaries_url: DEFAULT_BOUNDARIES_URL.to_string(),
            boundaries_object: "countries".to_string(),
            globe_scale: DEFAULT_GLOBE_SCALE,
            drag_sensitivity: DEFAULT_DRAG_SENSITIVITY,
            discard_stale_responses: true,
        }
    }
}

impl GlobeSettings {
    /// localStorage key for persisting settings.
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "trade_globe_settings";

    /// Env var naming a JSON settings file.
    #[cfg(not(target_arch = "wasm32"))]
    const CONFIG_ENV: &'static str = "TRADE_GLOBE_CONFIG";

    /// Env var overriding the API base URL.
    #[cfg(not(target_arch = "wasm32"))]
    const API_ENV: &'static str = "TRADE_GLOBE_API";

    /// Served next to the page in the browser, local dev server natively.
    fn default_api_base_url() -> &'static str {
        if cfg!(target_arch = "wasm32") {
            "/api"
        } else {
            "http://localhost:5000/api"
        }
    }

    /// Parses settings JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str::<Self>(json)
            .map(Self::sanitized)
            .map_err(|e| format!("Failed to parse settings: {}", e))
    }

    /// Replaces values that cannot be used with their defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.globe_scale.is_finite() && self.globe_scale > 0.0) {
            log::warn!("Ignoring invalid globe scale {}", self.globe_scale);
            self.globe_scale = defaults.globe_scale;
        }
        if !(self.drag_sensitivity.is_finite() && self.drag_sensitivity > 0.0) {
            log::warn!("Ignoring invalid drag sensitivity {}", self.drag_sensitivity);
            self.drag_sensitivity = defaults.drag_sensitivity;
        }
        if self.boundaries_object.trim().is_empty() {
            self.boundaries_object = defaults.boundaries_object;
        }
        self
    }

    /// Load settings from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return Self::default(),
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded globe settings from localStorage");
                settings
            }
            Err(e) => {
                log::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load settings from the file named by `TRADE_GLOBE_CONFIG`, then apply
    /// the `TRADE_GLOBE_API` override.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = match std::env::var(Self::CONFIG_ENV) {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                    log::warn!("{} ({})", e, path);
                    Self::default()
                }),
                Err(e) => {
                    log::warn!("Failed to read settings file {}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        if let Ok(api) = std::env::var(Self::API_ENV) {
            if !api.trim().is_empty() {
                log::info!("Using API base URL from {}: {}", Self::API_ENV, api);
                settings.api_base_url = api;
            }
        }
        settings
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return,
        };

        let json = match serde_json::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize globe settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save globe settings: {:?}", e);
        } else {
            log::info!("Saved globe settings to localStorage");
        }
    }

    /// Native builds keep their settings in the config file; nothing to do.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}
