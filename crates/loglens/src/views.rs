//! View-models for the list, dashboard and detail screens.
//!
//! Every builder takes the raw fetch result and produces something a
//! renderer can draw without further decisions. Nothing here is cached: each
//! fetch rebuilds its view from scratch.

use chrono::{DateTime, Utc};

use crate::format::{
    container_name, format_size, image_age, relative_created, short_id, volume_display_name,
};
use crate::{
    ContainerAction, ContainerDetail, ContainerStats, ContainerSummary, DashboardSummary,
    FetchError, ImageSummary, VolumeSummary,
};

pub const NO_CONTAINERS: &str = "No containers available";
pub const NO_RUNNING_CONTAINERS: &str = "No running containers available";
pub const NO_IMAGES: &str = "No images present in system";
pub const NO_VOLUMES: &str = "No volumes present in system";
pub const DASHBOARD_FAILED: &str =
    "Failed to load dashboard data. Please refresh the page or try again later.";
pub const IMAGES_FAILED: &str = "Failed to load images. Please try again later.";
pub const VOLUMES_FAILED: &str = "Failed to load volumes. Please try again later.";
pub const DETAIL_FAILED_TITLE: &str = "Error loading container";

/// Visual class derived from a container state string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Running,
    Exited,
    Paused,
    Restarting,
    Created,
    Dead,
    Other,
}

impl StatusClass {
    pub fn from_state(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "running" => StatusClass::Running,
            "exited" | "stopped" => StatusClass::Exited,
            "paused" => StatusClass::Paused,
            "restarting" => StatusClass::Restarting,
            "created" => StatusClass::Created,
            "dead" | "removing" => StatusClass::Dead,
            _ => StatusClass::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Running => "running",
            StatusClass::Exited => "exited",
            StatusClass::Paused => "paused",
            StatusClass::Restarting => "restarting",
            StatusClass::Created => "created",
            StatusClass::Dead => "dead",
            StatusClass::Other => "unknown",
        }
    }
}

impl std::fmt::Display for StatusClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Content of a card grid: cards, an empty-state message, or an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grid<T> {
    Cards(Vec<T>),
    Empty(&'static str),
    Failed(String),
}

impl<T> Grid<T> {
    fn build(
        result: Result<Vec<T>, FetchError>,
        empty: &'static str,
        failed: impl FnOnce(FetchError) -> String,
    ) -> Self {
        match result {
            Ok(cards) if cards.is_empty() => Grid::Empty(empty),
            Ok(cards) => Grid::Cards(cards),
            Err(error) => Grid::Failed(failed(error)),
        }
    }

    pub fn cards(&self) -> &[T] {
        match self {
            Grid::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// The empty-state or error text, if there are no cards.
    pub fn message(&self) -> Option<&str> {
        match self {
            Grid::Cards(_) => None,
            Grid::Empty(message) => Some(*message),
            Grid::Failed(message) => Some(message.as_str()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Grid::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCard {
    pub id: String,
    pub short_id: String,
    pub name: String,
    pub image: String,
    pub state: String,
    pub status: StatusClass,
}

impl From<&ContainerSummary> for ContainerCard {
    fn from(container: &ContainerSummary) -> Self {
        Self {
            id: container.id.clone(),
            short_id: short_id(&container.id),
            name: container_name(container),
            image: container.image.clone(),
            state: container.state.clone(),
            status: StatusClass::from_state(&container.state),
        }
    }
}

pub fn containers_grid(result: Result<Vec<ContainerSummary>, FetchError>) -> Grid<ContainerCard> {
    Grid::build(
        result.map(|containers| containers.iter().map(ContainerCard::from).collect()),
        NO_CONTAINERS,
        |error| format!("Failed to load containers: {}", error),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub total_containers: Option<u64>,
    pub running_containers: Option<u64>,
    pub running: Grid<ContainerCard>,
}

pub fn dashboard_view(result: Result<DashboardSummary, FetchError>) -> DashboardView {
    match result {
        Ok(summary) => {
            let running: Vec<ContainerCard> = summary
                .containers
                .iter()
                .filter(|c| c.state.eq_ignore_ascii_case("running"))
                .map(ContainerCard::from)
                .collect();
            DashboardView {
                total_containers: Some(summary.total_containers),
                running_containers: Some(summary.total_running_containers),
                running: Grid::build(Ok(running), NO_RUNNING_CONTAINERS, |_| String::new()),
            }
        }
        Err(_) => DashboardView {
            total_containers: None,
            running_containers: None,
            running: Grid::Failed(DASHBOARD_FAILED.to_string()),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCard {
    pub name: String,
    pub short_id: String,
    pub created: String,
    pub size: String,
}

pub fn images_grid(
    result: Result<Vec<ImageSummary>, FetchError>,
    now: DateTime<Utc>,
) -> Grid<ImageCard> {
    let cards = result.map(|images| {
        images
            .iter()
            .map(|image| {
                let id = short_id(&image.id);
                ImageCard {
                    name: image.repo_tags.first().cloned().unwrap_or_else(|| id.clone()),
                    created: format!("Created {}", image_age(image.created, now)),
                    size: format_size(image.size),
                    short_id: id,
                }
            })
            .collect()
    });
    Grid::build(cards, NO_IMAGES, |_| IMAGES_FAILED.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeCard {
    pub display_name: String,
    pub name: String,
    pub scope: String,
    pub driver: String,
    pub mountpoint: String,
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

pub fn volumes_grid(result: Result<Vec<VolumeSummary>, FetchError>) -> Grid<VolumeCard> {
    let cards = result.map(|volumes| {
        volumes
            .iter()
            .map(|volume| VolumeCard {
                display_name: volume_display_name(&volume.name),
                name: volume.name.clone(),
                scope: or_default(&volume.scope, "Unknown"),
                driver: or_default(&volume.driver, "Unknown"),
                mountpoint: or_default(&volume.mounted, "Not mounted"),
            })
            .collect()
    });
    Grid::build(cards, NO_VOLUMES, |_| VOLUMES_FAILED.to_string())
}

/// Overview tab of a loaded container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerOverview {
    pub title: String,
    pub status: String,
    pub status_class: StatusClass,
    pub rows: Vec<(&'static str, String)>,
    /// Start or stop, depending on the status.
    pub toggle: ContainerAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Loaded(ContainerOverview),
    Failed { title: &'static str, message: String },
}

impl DetailView {
    pub fn title(&self) -> &str {
        match self {
            DetailView::Loaded(overview) => overview.title.as_str(),
            DetailView::Failed { title, .. } => *title,
        }
    }
}

pub fn detail_view(
    container_id: &str,
    result: Result<ContainerDetail, FetchError>,
    now: DateTime<Utc>,
) -> DetailView {
    match result {
        Ok(detail) => DetailView::Loaded(ContainerOverview {
            title: container_id.chars().take(12).collect(),
            status_class: StatusClass::from_state(&detail.status),
            toggle: ContainerAction::toggle_for_status(&detail.status),
            rows: vec![
                ("ID", detail.id),
                ("Image", detail.image),
                ("Created", relative_created(&detail.created, now)),
                ("Ports", detail.ports),
                ("Status", detail.status.clone()),
            ],
            status: detail.status,
        }),
        Err(error) => DetailView::Failed {
            title: DETAIL_FAILED_TITLE,
            message: format!("Failed to load container details: {}", error),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub cpu_total: String,
    pub cpu_user: String,
    pub system_cpu: String,
    pub memory_usage: String,
    pub memory_limit: String,
    /// Memory usage as a share of the limit, 0.0 to 100.0.
    pub memory_percent: Option<f64>,
}

pub fn stats_view(result: Result<ContainerStats, FetchError>) -> Result<StatsView, String> {
    let stats = result.map_err(|error| format!("Failed to load stats: {}", error))?;
    let memory = &stats.memory_usage;
    let memory_percent = if memory.limit > 0.0 {
        Some((memory.usage / memory.limit * 100.0).min(100.0))
    } else {
        None
    };

    Ok(StatsView {
        cpu_total: format!("{:.0}", stats.cpu_usage.total_usage),
        cpu_user: format!("{:.0}", stats.cpu_usage.usage_in_usermode),
        system_cpu: format!("{:.0}", stats.cpu_usage.system_cpu_usage),
        memory_usage: format_size(memory.usage.max(0.0) as u64),
        memory_limit: format_size(memory.limit.max(0.0) as u64),
        memory_percent,
    })
}
