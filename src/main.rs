mod components;
mod config;
mod dom;
mod error;
mod loader;
mod model;
mod state;

use components::app::{App, AppProps};
use config::AppConfig;

fn main() {
    console_error_panic_hook::set_once();
    // Trace here so the config can only lower the level below
    if let Err(e) = console_log::init_with_level(log::Level::Trace) {
        web_sys::console::error_1(&format!("logger init failed: {e}").into());
    }
    let config = AppConfig::load();
    log::set_max_level(config.log_level().to_level_filter());
    log::info!("starting point map (log level {})", config.log_level());
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
