use loglens::views::{DetailView, StatsView};
use loglens::{ContainerAction, FollowUp, LogStreamLoader};

/// Top-level screens reachable from the tab bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Containers,
    Images,
    Volumes,
    Detail,
}

impl Screen {
    pub(crate) const TABS: [Screen; 4] = [
        Screen::Dashboard,
        Screen::Containers,
        Screen::Images,
        Screen::Volumes,
    ];

    pub(crate) fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Containers => "Containers",
            Screen::Images => "Images",
            Screen::Volumes => "Volumes",
            Screen::Detail => "Container",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DetailTab {
    Overview,
    Logs,
    Stats,
}

impl DetailTab {
    pub(crate) const ALL: [DetailTab; 3] = [DetailTab::Overview, DetailTab::Logs, DetailTab::Stats];

    pub(crate) fn title(&self) -> &'static str {
        match self {
            DetailTab::Overview => "Overview",
            DetailTab::Logs => "Logs",
            DetailTab::Stats => "Stats",
        }
    }

    pub(crate) fn next(self) -> Self {
        match self {
            DetailTab::Overview => DetailTab::Logs,
            DetailTab::Logs => DetailTab::Stats,
            DetailTab::Stats => DetailTab::Overview,
        }
    }

    pub(crate) fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }
}

/// Everything shown for the container currently open in the detail screen
pub(crate) struct DetailState {
    pub(crate) container_id: String,
    pub(crate) view: Option<DetailView>,
    pub(crate) stats: Option<Result<StatsView, String>>,
    pub(crate) tab: DetailTab,
    pub(crate) loader: LogStreamLoader,
    /// Screen to return to when the detail is closed
    pub(crate) back_to: Screen,
}

impl DetailState {
    pub(crate) fn new(container_id: String, back_to: Screen) -> Self {
        let loader = LogStreamLoader::new(container_id.clone(), 80, 20);
        Self {
            container_id,
            view: None,
            stats: None,
            tab: DetailTab::Overview,
            loader,
            back_to,
        }
    }

    /// Start or stop, once the detail has loaded
    pub(crate) fn toggle_action(&self) -> Option<ContainerAction> {
        match &self.view {
            Some(DetailView::Loaded(overview)) => Some(overview.toggle),
            _ => None,
        }
    }
}

/// Popups drawn over the current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Modal {
    Confirm(ContainerAction),
    /// Action is in flight
    Pending(ContainerAction),
    Alert {
        message: String,
        follow_up: Option<FollowUp>,
    },
}
