/// Data structures for windows, tabs and tab groups
use crate::error::TabError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TabId = i32;
pub type WindowId = i32;
pub type GroupId = i32;

/// Group id the host reports for tabs that are not in any group
pub const UNGROUPED: GroupId = -1;

pub const DEFAULT_FAVICON: &str = "default-favicon.png";

pub const UNNAMED_GROUP: &str = "Unnamed group";

/// Colors the host accepts for a tab group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
}

impl GroupColor {
    /// Dialog order
    pub const ALL: [GroupColor; 8] = [
        GroupColor::Grey,
        GroupColor::Blue,
        GroupColor::Red,
        GroupColor::Yellow,
        GroupColor::Green,
        GroupColor::Pink,
        GroupColor::Purple,
        GroupColor::Cyan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupColor::Grey => "grey",
            GroupColor::Blue => "blue",
            GroupColor::Red => "red",
            GroupColor::Yellow => "yellow",
            GroupColor::Green => "green",
            GroupColor::Pink => "pink",
            GroupColor::Purple => "purple",
            GroupColor::Cyan => "cyan",
        }
    }
}

impl Default for GroupColor {
    fn default() -> Self {
        GroupColor::Blue
    }
}

impl fmt::Display for GroupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupColor {
    type Err = TabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupColor::ALL
            .into_iter()
            .find(|color| color.as_str() == s)
            .ok_or_else(|| TabError::UnknownColor(s.to_string()))
    }
}

/// A tab as `chrome.windows.getAll({ populate: true })` reports it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostTab {
    #[serde(default)]
    pub id: Option<TabId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
    #[serde(default = "ungrouped")]
    pub group_id: GroupId,
}

fn ungrouped() -> GroupId {
    UNGROUPED
}

/// A window, with its tabs when fetched populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostWindow {
    pub id: WindowId,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub tabs: Option<Vec<HostTab>>,
}

/// Group metadata from `chrome.tabGroups.get`.
///
/// The color stays a string here: the host may report colors the popup
/// cannot offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostGroup {
    pub id: GroupId,
    #[serde(default)]
    pub title: Option<String>,
    pub color: String,
    #[serde(default)]
    pub collapsed: bool,
}

/// Properties for `chrome.tabGroups.update`; absent fields stay untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<GroupColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl GroupUpdate {
    pub fn title_and_color(title: String, color: GroupColor) -> GroupUpdate {
        GroupUpdate {
            title: Some(title),
            color: Some(color),
            collapsed: None,
        }
    }

    pub fn collapsed(collapsed: bool) -> GroupUpdate {
        GroupUpdate {
            collapsed: Some(collapsed),
            ..GroupUpdate::default()
        }
    }
}

/// Read-only copy of a tab held by the view
#[derive(Debug, Clone, PartialEq)]
pub struct TabRef {
    pub id: TabId,
    pub title: String,
    pub favicon_url: String,
    pub group_id: GroupId,
}

impl TabRef {
    /// Returns `None` for tabs the host has not assigned an id to
    pub fn from_host(tab: HostTab) -> Option<TabRef> {
        let id = tab.id?;
        Some(TabRef {
            id,
            title: tab.title.unwrap_or_default(),
            favicon_url: tab
                .fav_icon_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_FAVICON.to_string()),
            group_id: tab.group_id,
        })
    }

    pub fn is_grouped(&self) -> bool {
        self.group_id != UNGROUPED
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowRef {
    pub id: WindowId,
    pub is_current: bool,
    pub tabs: Vec<TabRef>,
}

impl WindowRef {
    pub fn from_host(window: HostWindow, current_window_id: WindowId) -> WindowRef {
        WindowRef {
            id: window.id,
            is_current: window.id == current_window_id,
            tabs: window
                .tabs
                .unwrap_or_default()
                .into_iter()
                .filter_map(TabRef::from_host)
                .collect(),
        }
    }

    pub fn has_group(&self, group_id: GroupId) -> bool {
        self.tabs.iter().any(|tab| tab.group_id == group_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRef {
    pub id: GroupId,
    pub title: String,
    pub color: GroupColor,
    pub collapsed: bool,
    pub is_active: bool,
}

impl GroupRef {
    /// Groups only reach the view through live tab membership, so they are always active.
    /// `None` for a group in a color outside [`GroupColor::ALL`].
    pub fn from_host(group: HostGroup) -> Option<GroupRef> {
        let color = match group.color.parse() {
            Ok(color) => color,
            Err(_) => {
                log::warn!(
                    "Group {} has unsupported color {:?}; leaving it out",
                    group.id,
                    group.color
                );
                return None;
            }
        };
        Some(GroupRef {
            id: group.id,
            title: group.title.unwrap_or_default(),
            color,
            collapsed: group.collapsed,
            is_active: true,
        })
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNNAMED_GROUP
        } else {
            &self.title
        }
    }
}
