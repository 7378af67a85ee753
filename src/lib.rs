/// Tab Organizer - browser extension popup for grouping tabs
/// Built with Rust + WASM + Yew

mod config;
mod error;
mod gateway;
mod groups;
mod selection;
mod tab_data;
mod view_model;
pub mod ui;

#[cfg(test)]
mod testing;

pub use config::PopupConfig;
pub use error::{Result, TabError};
pub use gateway::{ChromeGateway, TabGateway};
pub use groups::GroupService;
pub use selection::SelectionSet;
pub use tab_data::{
    GroupColor, GroupId, GroupRef, GroupUpdate, HostGroup, HostTab, HostWindow, TabId, TabRef,
    WindowId, WindowRef, DEFAULT_FAVICON, UNGROUPED, UNNAMED_GROUP,
};
pub use view_model::{build_view_model, refresh_view, window_label, ViewModel};

use ui::popup::{App, AppProps};
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    // The logger passes everything; the max level decides what is printed
    wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));
    log::set_max_level(max_log_level(&PopupConfig::default()));
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<App>::new().render();
}

/// Start the popup with settings from the host page, e.g. `{ defaultColor: "green" }`.
/// Bad settings are logged and the defaults used instead.
#[wasm_bindgen]
pub fn start_popup_with_config(config: JsValue) {
    let config = load_config(config).unwrap_or_else(|e| {
        log::warn!("{}; using default popup config", e);
        PopupConfig::default()
    });
    log::set_max_level(max_log_level(&config));
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}

/// Mount the popup under an element the host page owns instead of `<body>`
#[wasm_bindgen]
pub fn mount_popup(root: web_sys::Element) {
    yew::Renderer::<App>::with_root(root).render();
}

fn load_config(value: JsValue) -> Result<PopupConfig> {
    if value.is_null() || value.is_undefined() {
        return Ok(PopupConfig::default());
    }
    let config: PopupConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| TabError::InvalidConfig(e.to_string()))?;
    config.validate()
}

fn max_log_level(config: &PopupConfig) -> log::LevelFilter {
    config.log_level().unwrap_or(log::LevelFilter::Info)
}
