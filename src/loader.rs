use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::error::LoadError;
use crate::model::Dataset;

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let window = web_sys::window().ok_or(LoadError::NoWindow)?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(LoadError::from_js)?;
    let resp: Response = resp.dyn_into().map_err(LoadError::from_js)?;
    if !resp.ok() {
        return Err(LoadError::Status(resp.status()));
    }
    let body = resp.text().map_err(LoadError::from_js)?;
    let text = JsFuture::from(body).await.map_err(LoadError::from_js)?;
    text.as_string().ok_or(LoadError::Body)
}

pub async fn fetch_dataset(url: &str) -> Result<Dataset, LoadError> {
    let raw = fetch_text(url).await?;
    Dataset::from_json(&raw)
}

/// Loads the dataset, falling back to the built-in places on any failure.
pub async fn load_dataset(url: &str) -> Dataset {
    log::info!("loading dataset from {url}");
    match fetch_dataset(url).await {
        Ok(ds) => {
            let stats = ds.stats();
            log::info!(
                "dataset loaded: {} places, {} offices",
                stats.places,
                stats.offices
            );
            ds
        }
        Err(e) => {
            log::warn!("dataset load failed ({e}), using fallback data");
            Dataset::fallback()
        }
    }
}
