//! URL state encoding/decoding for shareable URLs.
//!
//! Encodes the selected country and globe rotation in the URL query string
//! so reloading restores the view and URLs can be shared.

/// Parsed URL parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UrlParams {
    pub country: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

/// Parses a query string such as `?country=840&lon=-100&lat=40`.
///
/// Unknown keys and unparseable values are ignored.
pub fn parse_query(query: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = query.trim_start_matches('?');
    if query.is_empty() {
        return params;
    }

    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = kv.next().unwrap_or("");
        let value = urlencoding::decode(value)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_string());
        match key {
            "country" if !value.is_empty() => params.country = Some(value),
            "lon" => params.lon = value.parse().ok().filter(|v: &f64| v.is_finite()),
            "lat" => params.lat = value.parse().ok().filter(|v: &f64| v.is_finite()),
            _ => {}
        }
    }

    params
}

/// Builds the query string for the given view.
pub fn build_query(country: Option<&str>, lon: f64, lat: f64) -> String {
    match country {
        Some(code) => format!(
            "?country={}&lon={:.2}&lat={:.2}",
            urlencoding::encode(code),
            lon,
            lat
        ),
        None => format!("?lon={:.2}&lat={:.2}", lon, lat),
    }
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    match window.location().search() {
        Ok(search) => parse_query(&search),
        Err(_) => UrlParams::default(),
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}

/// Push current state to the URL query string using `replaceState`.
#[cfg(target_arch = "wasm32")]
pub fn push_to_url(country: Option<&str>, lon: f64, lat: f64) {
    let query = build_query(country, lon, lat);

    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let state = wasm_bindgen::JsValue::NULL;
    if let Err(e) = history.replace_state_with_url(&state, "", Some(&query)) {
        log::debug!("replaceState failed: {:?}", e);
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn push_to_url(_country: Option<&str>, _lon: f64, _lat: f64) {}
