use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use ureq::Agent;

use crate::{
    ActionReply, ContainerAction, ContainerDetail, ContainerFilter, ContainerStats,
    ContainerSummary, ContainersResponse, DashboardSummary, FetchError, ImageSummary,
    VolumeSummary,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// HTTP verb used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// The container-management API this console talks to.
///
/// Every call is one request. A non-2xx status is always an error, whatever
/// the payload.
pub trait Backend {
    fn container(&self, id: &str) -> Result<ContainerDetail, FetchError>;

    /// One page of newline-delimited log text. Page 1 holds the most recent lines.
    fn container_logs(&self, id: &str, page: u32) -> Result<String, FetchError>;

    fn container_stats(&self, id: &str) -> Result<ContainerStats, FetchError>;

    fn containers(&self, filter: ContainerFilter) -> Result<Vec<ContainerSummary>, FetchError>;

    fn images(&self) -> Result<Vec<ImageSummary>, FetchError>;

    fn volumes(&self) -> Result<Vec<VolumeSummary>, FetchError>;

    fn dashboard(&self) -> Result<DashboardSummary, FetchError>;

    fn container_action(
        &self,
        action: ContainerAction,
        id: &str,
    ) -> Result<ActionReply, FetchError>;
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn container(&self, id: &str) -> Result<ContainerDetail, FetchError> {
        (**self).container(id)
    }

    fn container_logs(&self, id: &str, page: u32) -> Result<String, FetchError> {
        (**self).container_logs(id, page)
    }

    fn container_stats(&self, id: &str) -> Result<ContainerStats, FetchError> {
        (**self).container_stats(id)
    }

    fn containers(&self, filter: ContainerFilter) -> Result<Vec<ContainerSummary>, FetchError> {
        (**self).containers(filter)
    }

    fn images(&self) -> Result<Vec<ImageSummary>, FetchError> {
        (**self).images()
    }

    fn volumes(&self) -> Result<Vec<VolumeSummary>, FetchError> {
        (**self).volumes()
    }

    fn dashboard(&self) -> Result<DashboardSummary, FetchError> {
        (**self).dashboard()
    }

    fn container_action(
        &self,
        action: ContainerAction,
        id: &str,
    ) -> Result<ActionReply, FetchError> {
        (**self).container_action(action, id)
    }
}

/// Blocking [`Backend`] over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    agent: Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            agent: config.into(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_text(&self, method: Method, path: &str) -> Result<String, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "request");

        let result = match method {
            Method::Get => self.agent.get(&url).call(),
            Method::Post => self.agent.post(&url).send_empty(),
            Method::Delete => self.agent.delete(&url).call(),
        };
        let mut response = result.map_err(|e| {
            warn!(%method, %url, error = %e, "request failed");
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), "request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.body_mut().read_to_string()?)
    }

    fn request_json<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, FetchError> {
        let body = self.request_text(method, path)?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyPayload);
        }
        serde_json::from_str(&body).map_err(|e| {
            warn!(%path, error = %e, "unexpected response body");
            FetchError::from(e)
        })
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(5))
    }
}

impl Backend for HttpBackend {
    fn container(&self, id: &str) -> Result<ContainerDetail, FetchError> {
        self.request_json(Method::Get, &format!("/container/{}", id))
    }

    fn container_logs(&self, id: &str, page: u32) -> Result<String, FetchError> {
        self.request_text(Method::Get, &format!("/container-logs/{}?page={}", id, page))
    }

    fn container_stats(&self, id: &str) -> Result<ContainerStats, FetchError> {
        self.request_json(Method::Get, &format!("/container-stats/{}", id))
    }

    fn containers(&self, filter: ContainerFilter) -> Result<Vec<ContainerSummary>, FetchError> {
        let response: ContainersResponse =
            self.request_json(Method::Get, &format!("/containers?filter={}", filter))?;
        Ok(response.containers)
    }

    fn images(&self) -> Result<Vec<ImageSummary>, FetchError> {
        let images: Option<Vec<ImageSummary>> = self.request_json(Method::Get, "/images")?;
        Ok(images.unwrap_or_default())
    }

    fn volumes(&self) -> Result<Vec<VolumeSummary>, FetchError> {
        let volumes: Option<Vec<VolumeSummary>> = self.request_json(Method::Get, "/volumes")?;
        Ok(volumes.unwrap_or_default())
    }

    fn dashboard(&self) -> Result<DashboardSummary, FetchError> {
        self.request_json(Method::Get, "/dashboard")
    }

    fn container_action(
        &self,
        action: ContainerAction,
        id: &str,
    ) -> Result<ActionReply, FetchError> {
        let (method, path) = action.endpoint(id);
        self.request_json(method, &path)
    }
}
