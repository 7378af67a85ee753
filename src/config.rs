/// Popup settings the host page may override when it starts the app

use crate::error::{Result, TabError};
use crate::tab_data::GroupColor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PopupConfig {
    /// Selection size at which the "Create Group" button appears
    pub min_group_selection: usize,
    /// Color preselected in the create-group dialog
    pub default_color: GroupColor,
    pub log_level: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        PopupConfig {
            min_group_selection: 2,
            default_color: GroupColor::Blue,
            log_level: "info".to_string(),
        }
    }
}

impl PopupConfig {
    pub fn log_level(&self) -> Result<log::LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| TabError::InvalidConfig(format!("unknown log level {:?}", self.log_level)))
    }

    pub fn validate(self) -> Result<Self> {
        if self.min_group_selection == 0 {
            return Err(TabError::InvalidConfig(
                "minGroupSelection must be at least 1".to_string(),
            ));
        }
        self.log_level()?;
        Ok(self)
    }

    pub fn shows_create_button(&self, selected: usize) -> bool {
        selected >= self.min_group_selection
    }
}
