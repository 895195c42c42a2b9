use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub mod actions;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod log_stream;
#[cfg(test)]
mod testing;
pub mod views;

pub use actions::{dispatch, ActionOutcome, ContainerAction, FollowUp};
pub use client::{Backend, HttpBackend, Method};
pub use error::FetchError;
pub use fetcher::{Completion, Fetcher, Job};
pub use log_stream::{
    Direction, LoadPhase, LogBuffer, LogPageState, LogRow, LogStreamLoader, PageRequest,
};

/// Format of the output produced by the `list` command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Json,
    JsonPretty,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(Format::Table),
            "json" => Ok(Format::Json),
            "json-pretty" => Ok(Format::JsonPretty),
            other => Err(format!(
                "invalid format '{}', expected table, json or json-pretty",
                other
            )),
        }
    }
}

/// Which containers `/containers` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerFilter {
    #[default]
    All,
    Running,
    Stopped,
}

impl ContainerFilter {
    pub const ALL: [ContainerFilter; 3] = [
        ContainerFilter::All,
        ContainerFilter::Running,
        ContainerFilter::Stopped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerFilter::All => "all",
            ContainerFilter::Running => "running",
            ContainerFilter::Stopped => "stopped",
        }
    }

    /// Cycles all -> running -> stopped -> all.
    pub fn next(self) -> Self {
        match self {
            ContainerFilter::All => ContainerFilter::Running,
            ContainerFilter::Running => ContainerFilter::Stopped,
            ContainerFilter::Stopped => ContainerFilter::All,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            ContainerFilter::All => ContainerFilter::Stopped,
            ContainerFilter::Running => ContainerFilter::All,
            ContainerFilter::Stopped => ContainerFilter::Running,
        }
    }
}

impl std::fmt::Display for ContainerFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContainerFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ContainerFilter::All),
            "running" => Ok(ContainerFilter::Running),
            "stopped" => Ok(ContainerFilter::Stopped),
            other => Err(format!(
                "invalid filter '{}', expected all, running or stopped",
                other
            )),
        }
    }
}

/// Go encodes an empty slice as `null`; treat that as the default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A container as returned by `/containers` and `/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSummary {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Names", default, deserialize_with = "null_as_default")]
    pub names: Vec<String>,
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Created", default, skip_serializing_if = "Option::is_none")]
    pub created: Option<serde_json::Value>,
    #[serde(rename = "Ports", default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<serde_json::Value>,
}

/// Body of `/containers?filter=...`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainersResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub containers: Vec<ContainerSummary>,
}

/// Body of `/container/{id}`. The backend pre-formats every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerDetail {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "Created", default)]
    pub created: String,
    #[serde(rename = "Ports", default)]
    pub ports: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

/// One entry of the `/images` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "RepoTags", default, deserialize_with = "null_as_default")]
    pub repo_tags: Vec<String>,
    /// Unix seconds.
    #[serde(rename = "Created", default)]
    pub created: i64,
    #[serde(rename = "Size", default)]
    pub size: u64,
    #[serde(rename = "Labels", default, deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
}

/// One entry of the `/volumes` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeSummary {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Driver", default)]
    pub driver: String,
    #[serde(rename = "Scope", default)]
    pub scope: String,
    #[serde(rename = "Mounted", default)]
    pub mounted: String,
    #[serde(rename = "Labels", default, deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
}

/// Body of `/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_containers: u64,
    #[serde(default)]
    pub total_running_containers: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub containers: Vec<ContainerSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuUsage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_usage: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage_in_usermode: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_cpu_usage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limit: f64,
}

/// Body of `/container-stats/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerStats {
    #[serde(default)]
    pub cpu_usage: CpuUsage,
    #[serde(default)]
    pub memory_usage: MemoryUsage,
}

/// Body returned by lifecycle actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub message: Option<String>,
}
