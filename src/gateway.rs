/// Host gateway: the only code that talks to chrome.windows, chrome.tabs and chrome.tabGroups

use crate::error::{Result as TabResult, TabError};
use crate::tab_data::{GroupId, GroupUpdate, HostGroup, HostWindow, TabId, WindowId};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getCurrentWindow() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getAllWindows() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getGroup(group_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateGroup(group_id: i32, properties: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn groupTabs(tab_ids: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn focusWindow(window_id: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn activateTab(tab_id: i32) -> Result<(), JsValue>;
}

/// Async access to the host's windows, tabs and groups.
///
/// Every call suspends until the host answers. Implementations report a
/// rejected call as [`TabError::Host`] and never retry.
#[allow(async_fn_in_trait)]
pub trait TabGateway {
    /// The focused window, without tabs
    async fn current_window(&self) -> TabResult<HostWindow>;

    /// Every window with its tabs, in host enumeration order
    async fn all_windows(&self) -> TabResult<Vec<HostWindow>>;

    /// `Ok(None)` when the host no longer knows the group
    async fn group(&self, group_id: GroupId) -> TabResult<Option<HostGroup>>;

    async fn update_group(&self, group_id: GroupId, update: &GroupUpdate) -> TabResult<()>;

    /// Bundles the tabs into a fresh group and returns its id
    async fn group_tabs(&self, tab_ids: &[TabId]) -> TabResult<GroupId>;

    async fn focus_window(&self, window_id: WindowId) -> TabResult<()>;

    async fn activate_tab(&self, tab_id: TabId) -> TabResult<()>;
}

/// Gateway backed by the browser extension APIs through `popup.js`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChromeGateway;

impl TabGateway for ChromeGateway {
    async fn current_window(&self) -> TabResult<HostWindow> {
        let value = getCurrentWindow().await.map_err(|e| rejected("windows.getCurrent", e))?;
        decode("current window", value)
    }

    async fn all_windows(&self) -> TabResult<Vec<HostWindow>> {
        let value = getAllWindows().await.map_err(|e| rejected("windows.getAll", e))?;
        decode("window list", value)
    }

    async fn group(&self, group_id: GroupId) -> TabResult<Option<HostGroup>> {
        let value = getGroup(group_id).await.map_err(|e| rejected("tabGroups.get", e))?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        decode("tab group", value).map(Some)
    }

    async fn update_group(&self, group_id: GroupId, update: &GroupUpdate) -> TabResult<()> {
        let properties = encode("group update", update)?;
        updateGroup(group_id, properties)
            .await
            .map_err(|e| rejected("tabGroups.update", e))
    }

    async fn group_tabs(&self, tab_ids: &[TabId]) -> TabResult<GroupId> {
        let tab_ids_js = encode("tab ids", tab_ids)?;
        let value = groupTabs(tab_ids_js).await.map_err(|e| rejected("tabs.group", e))?;
        decode("group id", value)
    }

    async fn focus_window(&self, window_id: WindowId) -> TabResult<()> {
        focusWindow(window_id)
            .await
            .map_err(|e| rejected("windows.update", e))
    }

    async fn activate_tab(&self, tab_id: TabId) -> TabResult<()> {
        activateTab(tab_id)
            .await
            .map_err(|e| rejected("tabs.update", e))
    }
}

fn rejected(call: &'static str, error: JsValue) -> TabError {
    let message = js_message(&error);
    log::error!("Error calling {}: {}", call, message);
    TabError::Host { call, message }
}

fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

fn decode<T: DeserializeOwned>(what: &'static str, value: JsValue) -> TabResult<T> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        log::error!("Failed to parse {}: {}", what, e);
        TabError::Decode {
            what,
            message: e.to_string(),
        }
    })
}

fn encode<T: serde::Serialize + ?Sized>(what: &'static str, value: &T) -> TabResult<JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| TabError::Decode {
        what,
        message: e.to_string(),
    })
}
