//! Static asset fetches.

use gloo_net::http::Request;
use whsk_core::AppConfig;

/// Optional overrides served next to `index.html`.
pub const CONFIG_URL: &str = "config.json";

/// Fetch a URL and return the body as a plain string.
pub async fn fetch_text(url: &str) -> Result<String, String> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(format!("{} {}", resp.status(), resp.status_text()));
    }
    resp.text().await.map_err(|e| format!("text error: {e}"))
}

/// Defaults merged with `config.json`. On failure the defaults are returned
/// together with the reason, since logging is not up yet.
pub async fn load_config() -> (AppConfig, Option<String>) {
    match fetch_text(CONFIG_URL).await {
        Ok(raw) => match AppConfig::from_json(&raw) {
            Ok(config) => (config, None),
            Err(e) => (AppConfig::default(), Some(format!("invalid {CONFIG_URL}: {e}"))),
        },
        Err(e) => (AppConfig::default(), Some(format!("{CONFIG_URL} not loaded: {e}"))),
    }
}
