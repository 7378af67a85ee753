/// Builds the renderable window/tab/group model from a fresh host snapshot

use crate::error::Result;
use crate::gateway::TabGateway;
use crate::selection::SelectionSet;
use crate::tab_data::{GroupId, GroupRef, TabId, WindowId, WindowRef};
use futures::future::{join, join_all};
use std::cell::RefCell;
use std::collections::HashSet;

/// Everything the popup renders, taken from one host snapshot.
///
/// Every group in `groups` has at least one member tab in `windows`. Groups
/// are kept in the order their first tab appears when walking the windows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub windows: Vec<WindowRef>,
    pub groups: Vec<GroupRef>,
    pub current_window_id: WindowId,
}

impl ViewModel {
    pub fn group(&self, group_id: GroupId) -> Option<&GroupRef> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    pub fn contains_tab(&self, tab_id: TabId) -> bool {
        self.windows
            .iter()
            .any(|window| window.tabs.iter().any(|tab| tab.id == tab_id))
    }

    /// First window, in enumeration order, holding a tab of the group
    pub fn window_for_group(&self, group_id: GroupId) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|window| window.has_group(group_id))
            .map(|window| window.id)
    }

    /// "Window 2", or "Window 1 (Current)" for the focused window
    pub fn window_label(&self, index: usize) -> String {
        let current = self
            .windows
            .get(index)
            .is_some_and(|window| window.is_current);
        window_label(index, current)
    }

    pub fn tab_count(&self) -> usize {
        self.windows.iter().map(|window| window.tabs.len()).sum()
    }
}

pub fn window_label(index: usize, is_current: bool) -> String {
    format!(
        "Window {}{}",
        index + 1,
        if is_current { " (Current)" } else { "" }
    )
}

/// Re-query the host and assemble a new model from scratch.
///
/// Fails only when either window fetch fails. A group whose metadata cannot
/// be fetched is left out; the gateway has already logged why.
pub async fn build_view_model<G: TabGateway>(gateway: &G) -> Result<ViewModel> {
    let (current, windows) = join(gateway.current_window(), gateway.all_windows()).await;
    let current_window_id = current?.id;
    let windows: Vec<WindowRef> = windows?
        .into_iter()
        .map(|window| WindowRef::from_host(window, current_window_id))
        .collect();

    let mut seen = HashSet::new();
    let group_ids: Vec<GroupId> = windows
        .iter()
        .flat_map(|window| window.tabs.iter())
        .filter(|tab| tab.is_grouped())
        .map(|tab| tab.group_id)
        .filter(|group_id| seen.insert(*group_id))
        .collect();

    let fetched = join_all(
        group_ids
            .iter()
            .map(|&group_id| async move { (group_id, gateway.group(group_id).await) }),
    )
    .await;

    let mut groups = Vec::with_capacity(fetched.len());
    for (group_id, result) in fetched {
        match result {
            Ok(Some(group)) => {
                if let Some(mut group) = GroupRef::from_host(group) {
                    group.id = group_id;
                    groups.push(group);
                }
            }
            Ok(None) => {
                log::debug!("Group {} disappeared before its metadata was read", group_id);
            }
            Err(_) => {
                log::debug!("Skipping group {}", group_id);
            }
        }
    }

    log::debug!(
        "Built view model: {} window(s), {} group(s)",
        windows.len(),
        groups.len()
    );

    Ok(ViewModel {
        windows,
        groups,
        current_window_id,
    })
}

/// Rebuild the model, then drop selected tabs that are gone from it.
///
/// The selection is left alone when the rebuild fails.
pub async fn refresh_view<G: TabGateway>(
    gateway: &G,
    selection: &RefCell<SelectionSet>,
) -> Result<ViewModel> {
    let model = build_view_model(gateway).await?;
    selection
        .borrow_mut()
        .retain(|tab_id| model.contains_tab(tab_id));
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabError;
    use crate::tab_data::{GroupColor, HostGroup, UNGROUPED};
    use crate::testing::{group, tab, window, work_and_loose_tabs, FakeGateway, HostCall};
    use futures::executor::block_on;

    #[test]
    fn test_build_two_windows_one_group() {
        let gateway = work_and_loose_tabs();

        let model = block_on(build_view_model(&gateway)).unwrap();

        assert_eq!(model.current_window_id, 1);
        assert_eq!(model.windows.len(), 2);
        assert!(model.windows[0].is_current);
        assert!(!model.windows[1].is_current);
        let ids: Vec<Vec<TabId>> = model
            .windows
            .iter()
            .map(|w| w.tabs.iter().map(|t| t.id).collect())
            .collect();
        assert_eq!(ids, vec![vec![11, 12], vec![13, 14]]);

        assert_eq!(model.groups.len(), 1);
        let work = model.group(1).unwrap();
        assert_eq!(work.title, "Work");
        assert_eq!(work.color, GroupColor::Green);
        assert!(!work.collapsed);
        assert!(work.is_active);
    }

    #[test]
    fn test_each_group_fetched_once() {
        let gateway = FakeGateway::new(
            1,
            vec![
                window(1, vec![tab(1, "a", 5), tab(2, "b", 5), tab(3, "c", 6)]),
                window(2, vec![tab(4, "d", 5)]),
            ],
            vec![
                group(5, "Five", GroupColor::Red, false),
                group(6, "Six", GroupColor::Cyan, true),
            ],
        );

        let model = block_on(build_view_model(&gateway)).unwrap();

        let fetches: Vec<HostCall> = gateway
            .calls()
            .into_iter()
            .filter(|c| matches!(c, HostCall::GetGroup(_)))
            .collect();
        assert_eq!(fetches, vec![HostCall::GetGroup(5), HostCall::GetGroup(6)]);
        assert_eq!(model.groups.len(), 2);
        assert!(model.group(6).unwrap().collapsed);
    }

    #[test]
    fn test_no_orphan_groups() {
        // group 9 exists on the host but no tab belongs to it
        let gateway = FakeGateway::new(
            1,
            vec![window(1, vec![tab(1, "a", 5), tab(2, "b", UNGROUPED)])],
            vec![
                group(5, "Live", GroupColor::Blue, false),
                group(9, "Empty", GroupColor::Pink, false),
            ],
        );

        let model = block_on(build_view_model(&gateway)).unwrap();

        assert!(model.group(9).is_none());
        for group in &model.groups {
            assert!(model.window_for_group(group.id).is_some());
        }
    }

    #[test]
    fn test_failed_group_fetch_is_omitted() {
        let gateway = FakeGateway::new(
            1,
            vec![window(1, vec![tab(1, "a", 5), tab(2, "b", 6)])],
            vec![
                group(5, "Kept", GroupColor::Blue, false),
                group(6, "Flaky", GroupColor::Red, false),
            ],
        );
        gateway.failing_groups.borrow_mut().insert(6);

        let model = block_on(build_view_model(&gateway)).unwrap();

        let ids: Vec<GroupId> = model.groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![5]);
        assert_eq!(model.tab_count(), 2);
    }

    #[test]
    fn test_vanished_group_is_omitted() {
        let gateway = FakeGateway::new(1, vec![window(1, vec![tab(1, "a", 5)])], vec![]);

        let model = block_on(build_view_model(&gateway)).unwrap();

        assert!(model.groups.is_empty());
    }

    #[test]
    fn test_window_fetch_failure_fails_build() {
        let gateway = work_and_loose_tabs();
        gateway.fail("windows.getAll");

        let result = block_on(build_view_model(&gateway));

        assert!(matches!(result, Err(TabError::Host { call: "windows.getAll", .. })));
        // both fetches were issued before the failure surfaced
        assert!(gateway.calls().contains(&HostCall::CurrentWindow));
    }

    #[test]
    fn test_no_focused_window_fails_build() {
        let mut gateway = work_and_loose_tabs();
        gateway.current = None;

        assert!(block_on(build_view_model(&gateway)).is_err());
    }

    #[test]
    fn test_window_labels() {
        let model = block_on(build_view_model(&work_and_loose_tabs())).unwrap();

        assert_eq!(model.window_label(0), "Window 1 (Current)");
        assert_eq!(model.window_label(1), "Window 2");
    }

    #[test]
    fn test_contains_tab() {
        let model = block_on(build_view_model(&work_and_loose_tabs())).unwrap();

        assert!(model.contains_tab(13));
        assert!(!model.contains_tab(99));
        assert_eq!(model.window_for_group(1), Some(2));
    }

    #[test]
    fn test_groups_follow_first_tab_order() {
        let gateway = FakeGateway::new(
            1,
            vec![
                window(1, vec![tab(1, "a", 9), tab(2, "b", 3), tab(3, "c", 9)]),
                window(2, vec![tab(4, "d", 5), tab(5, "e", 3)]),
            ],
            vec![
                group(3, "Second", GroupColor::Red, false),
                group(5, "Third", GroupColor::Blue, false),
                group(9, "First", GroupColor::Green, false),
            ],
        );

        let model = block_on(build_view_model(&gateway)).unwrap();

        let titles: Vec<&str> = model.groups.iter().map(|g| g.display_title()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_group_in_unsupported_color_is_omitted() {
        let gateway = FakeGateway::new(
            1,
            vec![window(1, vec![tab(1, "a", 4), tab(2, "b", 7)])],
            vec![
                group(4, "Kept", GroupColor::Yellow, false),
                HostGroup {
                    id: 7,
                    title: Some("Orange".to_string()),
                    color: "orange".to_string(),
                    collapsed: false,
                },
            ],
        );

        let model = block_on(build_view_model(&gateway)).unwrap();

        let ids: Vec<GroupId> = model.groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![4]);
        assert_eq!(model.tab_count(), 2);
    }

    #[test]
    fn test_refresh_prunes_closed_tabs_from_selection() {
        let gateway = work_and_loose_tabs();
        let selection = RefCell::new(SelectionSet::new());
        selection.borrow_mut().add(11);
        selection.borrow_mut().add(13);
        selection.borrow_mut().add(99);

        let model = block_on(refresh_view(&gateway, &selection)).unwrap();

        assert_eq!(selection.borrow().snapshot(), vec![11, 13]);
        assert_eq!(model.tab_count(), 4);
    }

    #[test]
    fn test_failed_refresh_keeps_selection() {
        let gateway = work_and_loose_tabs();
        gateway.fail("windows.getAll");
        let selection = RefCell::new(SelectionSet::new());
        selection.borrow_mut().add(99);

        let result = block_on(refresh_view(&gateway, &selection));

        assert!(result.is_err());
        assert_eq!(selection.borrow().snapshot(), vec![99]);
    }
}
