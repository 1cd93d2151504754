use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no browser window available")]
    NoWindow,
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("HTTP error, status {0}")]
    Status(u16),
    #[error("response body is not text")]
    Body,
    #[error("invalid dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    /// Maps a rejected JS promise into a [`LoadError::Fetch`].
    pub fn from_js(err: wasm_bindgen::JsValue) -> Self {
        LoadError::Fetch(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("localStorage unavailable")]
    Storage,
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
