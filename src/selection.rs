/// The set of tabs the user has ticked for grouping

use crate::tab_data::TabId;
use std::collections::BTreeSet;
use std::fmt;

pub type SelectionObserver = Box<dyn Fn(&BTreeSet<TabId>)>;

/// Tab ids chosen by the user. The observer is told about every change,
/// and only about changes: idempotent calls stay silent.
#[derive(Default)]
pub struct SelectionSet {
    tabs: BTreeSet<TabId>,
    observer: Option<SelectionObserver>,
}

impl SelectionSet {
    pub fn new() -> Self {
        SelectionSet {
            tabs: BTreeSet::new(),
            observer: None,
        }
    }

    pub fn with_observer(observer: impl Fn(&BTreeSet<TabId>) + 'static) -> Self {
        SelectionSet {
            tabs: BTreeSet::new(),
            observer: Some(Box::new(observer)),
        }
    }

    pub fn add(&mut self, tab_id: TabId) {
        if self.tabs.insert(tab_id) {
            self.notify();
        }
    }

    pub fn remove(&mut self, tab_id: TabId) {
        if self.tabs.remove(&tab_id) {
            self.notify();
        }
    }

    /// Checkbox adapter
    pub fn toggle(&mut self, tab_id: TabId, checked: bool) {
        if checked {
            self.add(tab_id);
        } else {
            self.remove(tab_id);
        }
    }

    pub fn has(&self, tab_id: TabId) -> bool {
        self.tabs.contains(&tab_id)
    }

    pub fn clear(&mut self) {
        if !self.tabs.is_empty() {
            self.tabs.clear();
            self.notify();
        }
    }

    /// Drop ids whose tabs are gone from the latest snapshot
    pub fn retain(&mut self, mut live: impl FnMut(TabId) -> bool) {
        let before = self.tabs.len();
        self.tabs.retain(|&tab_id| live(tab_id));
        if self.tabs.len() != before {
            log::debug!("Dropped {} stale tab(s) from selection", before - self.tabs.len());
            self.notify();
        }
    }

    pub fn snapshot(&self) -> Vec<TabId> {
        self.tabs.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer(&self.tabs);
        }
    }
}

impl fmt::Debug for SelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionSet")
            .field("tabs", &self.tabs)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}
