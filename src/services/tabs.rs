use serde::{Deserialize, Serialize};

/// The three views of the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Search,
    Watchlist,
    Watched,
}

/// List that must be re-queried after a tab switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRequest {
    Watchlist,
    Watched,
}

/// Tracks the visible tab
///
/// Lists are never cached across switches: every selection of a list tab
/// asks for a fresh load, even when it is already active.
#[derive(Debug, Clone, Default)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn select(&mut self, tab: Tab) -> Option<LoadRequest> {
        if tab != self.active {
            tracing::debug!(from = ?self.active, to = ?tab, "Switching tab");
        }
        self.active = tab;

        match tab {
            Tab::Search => None,
            Tab::Watchlist => Some(LoadRequest::Watchlist),
            Tab::Watched => Some(LoadRequest::Watched),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_search() {
        assert_eq!(TabController::new().active(), Tab::Search);
    }

    #[test]
    fn test_list_tabs_always_request_load() {
        let mut tabs = TabController::new();

        assert_eq!(tabs.select(Tab::Watchlist), Some(LoadRequest::Watchlist));
        assert_eq!(tabs.select(Tab::Watchlist), Some(LoadRequest::Watchlist));
        assert_eq!(tabs.select(Tab::Watched), Some(LoadRequest::Watched));
        assert_eq!(tabs.active(), Tab::Watched);
    }

    #[test]
    fn test_search_tab_needs_no_load() {
        let mut tabs = TabController::new();
        tabs.select(Tab::Watched);

        assert_eq!(tabs.select(Tab::Search), None);
        assert_eq!(tabs.active(), Tab::Search);
    }

    #[test]
    fn test_tab_deserializes_lowercase() {
        let tab: Tab = serde_json::from_str(r#""watchlist""#).unwrap();
        assert_eq!(tab, Tab::Watchlist);
    }
}
