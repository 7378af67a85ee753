/// In-memory gateway used by the unit tests

use crate::error::{Result, TabError};
use crate::gateway::TabGateway;
use crate::tab_data::{
    GroupColor, GroupId, GroupUpdate, HostGroup, HostTab, HostWindow, TabId, WindowId, UNGROUPED,
};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// One recorded host call
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CurrentWindow,
    AllWindows,
    GetGroup(GroupId),
    UpdateGroup(GroupId, GroupUpdate),
    GroupTabs(Vec<TabId>),
    FocusWindow(WindowId),
    ActivateTab(TabId),
}

pub fn tab(id: TabId, title: &str, group_id: GroupId) -> HostTab {
    HostTab {
        id: Some(id),
        title: Some(title.to_string()),
        fav_icon_url: None,
        group_id,
    }
}

pub fn window(id: WindowId, tabs: Vec<HostTab>) -> HostWindow {
    HostWindow {
        id,
        focused: false,
        tabs: Some(tabs),
    }
}

pub fn group(id: GroupId, title: &str, color: GroupColor, collapsed: bool) -> HostGroup {
    HostGroup {
        id,
        title: Some(title.to_string()),
        color: color.to_string(),
        collapsed,
    }
}

#[derive(Default)]
pub struct FakeGateway {
    pub current: Option<WindowId>,
    pub windows: RefCell<Vec<HostWindow>>,
    pub groups: RefCell<BTreeMap<GroupId, HostGroup>>,
    /// Host call names that reject, e.g. "tabs.group"
    pub failing_calls: RefCell<BTreeSet<&'static str>>,
    /// Groups whose metadata fetch rejects
    pub failing_groups: RefCell<BTreeSet<GroupId>>,
    /// Suspend once inside every mutation before answering
    pub slow_mutations: Cell<bool>,
    pub next_group_id: Cell<GroupId>,
    pub calls: RefCell<Vec<HostCall>>,
}

impl FakeGateway {
    pub fn new(current: WindowId, windows: Vec<HostWindow>, groups: Vec<HostGroup>) -> Self {
        FakeGateway {
            current: Some(current),
            windows: RefCell::new(windows),
            groups: RefCell::new(groups.into_iter().map(|g| (g.id, g)).collect()),
            next_group_id: Cell::new(100),
            ..FakeGateway::default()
        }
    }

    pub fn fail(&self, call: &'static str) {
        self.failing_calls.borrow_mut().insert(call);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<HostCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                !matches!(
                    call,
                    HostCall::CurrentWindow | HostCall::AllWindows | HostCall::GetGroup(_)
                )
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, call: &'static str) -> Result<()> {
        if self.failing_calls.borrow().contains(call) {
            return Err(TabError::Host {
                call,
                message: "rejected by test host".to_string(),
            });
        }
        Ok(())
    }

    async fn settle(&self) {
        if self.slow_mutations.get() {
            YieldOnce(false).await;
        }
    }
}

impl TabGateway for FakeGateway {
    async fn current_window(&self) -> Result<HostWindow> {
        self.record(HostCall::CurrentWindow);
        self.check("windows.getCurrent")?;
        let id = self.current.ok_or_else(|| TabError::Host {
            call: "windows.getCurrent",
            message: "no focused window".to_string(),
        })?;
        Ok(HostWindow {
            id,
            focused: true,
            tabs: None,
        })
    }

    async fn all_windows(&self) -> Result<Vec<HostWindow>> {
        self.record(HostCall::AllWindows);
        self.check("windows.getAll")?;
        Ok(self.windows.borrow().clone())
    }

    async fn group(&self, group_id: GroupId) -> Result<Option<HostGroup>> {
        self.record(HostCall::GetGroup(group_id));
        if self.failing_groups.borrow().contains(&group_id) {
            return Err(TabError::Host {
                call: "tabGroups.get",
                message: format!("No group with id: {}", group_id),
            });
        }
        Ok(self.groups.borrow().get(&group_id).cloned())
    }

    async fn update_group(&self, group_id: GroupId, update: &GroupUpdate) -> Result<()> {
        self.record(HostCall::UpdateGroup(group_id, update.clone()));
        self.settle().await;
        self.check("tabGroups.update")?;
        let mut groups = self.groups.borrow_mut();
        let group = groups.get_mut(&group_id).ok_or_else(|| TabError::Host {
            call: "tabGroups.update",
            message: format!("No group with id: {}", group_id),
        })?;
        if let Some(title) = &update.title {
            group.title = Some(title.clone());
        }
        if let Some(color) = update.color {
            group.color = color.to_string();
        }
        if let Some(collapsed) = update.collapsed {
            group.collapsed = collapsed;
        }
        Ok(())
    }

    async fn group_tabs(&self, tab_ids: &[TabId]) -> Result<GroupId> {
        self.record(HostCall::GroupTabs(tab_ids.to_vec()));
        self.settle().await;
        self.check("tabs.group")?;
        let group_id = self.next_group_id.get();
        self.next_group_id.set(group_id + 1);
        for window in self.windows.borrow_mut().iter_mut() {
            for tab in window.tabs.iter_mut().flatten() {
                if tab.id.is_some_and(|id| tab_ids.contains(&id)) {
                    tab.group_id = group_id;
                }
            }
        }
        self.groups
            .borrow_mut()
            .insert(group_id, group(group_id, "", GroupColor::Grey, false));
        Ok(group_id)
    }

    async fn focus_window(&self, window_id: WindowId) -> Result<()> {
        self.record(HostCall::FocusWindow(window_id));
        self.settle().await;
        self.check("windows.update")
    }

    async fn activate_tab(&self, tab_id: TabId) -> Result<()> {
        self.record(HostCall::ActivateTab(tab_id));
        self.settle().await;
        self.check("tabs.update")
    }
}

/// Two windows: the focused one with loose tabs, the other holding group 1 "Work"
pub fn work_and_loose_tabs() -> FakeGateway {
    FakeGateway::new(
        1,
        vec![
            window(1, vec![tab(11, "T1", UNGROUPED), tab(12, "T2", UNGROUPED)]),
            window(2, vec![tab(13, "T3", 1), tab(14, "T4", 1)]),
        ],
        vec![group(1, "Work", GroupColor::Green, false)],
    )
}

struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
