/// Group mutations: create, collapse/expand, and focusing tabs and groups

use crate::error::{Result, TabError};
use crate::gateway::TabGateway;
use crate::tab_data::{GroupColor, GroupId, GroupUpdate, TabId, WindowId};
use crate::view_model::ViewModel;
use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Toggle,
    Focus,
}

impl Action {
    fn name(self) -> &'static str {
        match self {
            Action::Create => "create group",
            Action::Toggle => "toggle group",
            Action::Focus => "focus tab",
        }
    }
}

/// Marks an action as outstanding until dropped
struct InFlight<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> InFlight<'a> {
    fn begin(flag: &'a Cell<bool>, action: Action) -> Result<InFlight<'a>> {
        if flag.replace(true) {
            log::debug!("Ignoring {}: previous one still pending", action.name());
            return Err(TabError::Busy(action.name()));
        }
        Ok(InFlight { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Issues group mutations against the host, one outstanding call per action
#[derive(Debug, Default)]
pub struct GroupService<G> {
    gateway: G,
    creating: Cell<bool>,
    toggling: Cell<bool>,
    focusing: Cell<bool>,
}

impl<G: TabGateway> GroupService<G> {
    pub fn new(gateway: G) -> Self {
        GroupService {
            gateway,
            creating: Cell::new(false),
            toggling: Cell::new(false),
            focusing: Cell::new(false),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn flag(&self, action: Action) -> &Cell<bool> {
        match action {
            Action::Create => &self.creating,
            Action::Toggle => &self.toggling,
            Action::Focus => &self.focusing,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.creating.get() || self.toggling.get() || self.focusing.get()
    }

    /// Group the tabs, then title and color the new group.
    ///
    /// If the second call fails the group stays on the host with its default
    /// title and color, and the error is returned.
    pub async fn create_group(
        &self,
        tab_ids: &[TabId],
        name: &str,
        color: GroupColor,
    ) -> Result<GroupId> {
        let _guard = InFlight::begin(self.flag(Action::Create), Action::Create)?;

        let group_id = self.gateway.group_tabs(tab_ids).await?;
        let update = GroupUpdate::title_and_color(name.to_string(), color);
        self.gateway.update_group(group_id, &update).await?;

        log::info!("Created group {} with {} tab(s)", group_id, tab_ids.len());
        Ok(group_id)
    }

    /// Flip the collapse state; the caller passes the state it last rendered
    pub async fn toggle_group_collapse(
        &self,
        group_id: GroupId,
        currently_collapsed: bool,
    ) -> Result<()> {
        let _guard = InFlight::begin(self.flag(Action::Toggle), Action::Toggle)?;

        self.gateway
            .update_group(group_id, &GroupUpdate::collapsed(!currently_collapsed))
            .await
    }

    /// Focus the window first, then activate the tab inside it
    pub async fn focus_tab_in_window(&self, window_id: WindowId, tab_id: TabId) -> Result<()> {
        let _guard = InFlight::begin(self.flag(Action::Focus), Action::Focus)?;

        self.gateway.focus_window(window_id).await?;
        self.gateway.activate_tab(tab_id).await
    }

    /// Bring the group's window forward and collapse or expand the group.
    ///
    /// A group missing from the model is a stale reference and does nothing.
    pub async fn focus_group(&self, model: &ViewModel, group_id: GroupId) -> Result<()> {
        let (Some(group), Some(window_id)) =
            (model.group(group_id), model.window_for_group(group_id))
        else {
            log::debug!("Group {} is no longer in view", group_id);
            return Ok(());
        };

        let _guard = InFlight::begin(self.flag(Action::Toggle), Action::Toggle)?;

        self.gateway.focus_window(window_id).await?;
        self.gateway
            .update_group(group_id, &GroupUpdate::collapsed(!group.collapsed))
            .await
    }
}
