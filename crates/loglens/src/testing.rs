//! In-memory backend for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{
    ActionReply, Backend, ContainerAction, ContainerDetail, ContainerFilter, ContainerStats,
    ContainerSummary, DashboardSummary, FetchError, ImageSummary, VolumeSummary,
};

#[derive(Default)]
pub(crate) struct StubBackend {
    pages: Mutex<HashMap<u32, Result<String, FetchError>>>,
    containers: Mutex<Vec<ContainerSummary>>,
    log_calls: AtomicUsize,
    action_calls: Mutex<Vec<(ContainerAction, String)>>,
}

impl StubBackend {
    pub(crate) fn with_page(self, page: u32, body: Result<String, FetchError>) -> Self {
        self.pages.lock().unwrap().insert(page, body);
        self
    }

    pub(crate) fn with_containers(self, containers: Vec<ContainerSummary>) -> Self {
        *self.containers.lock().unwrap() = containers;
        self
    }

    pub(crate) fn log_calls(&self) -> usize {
        self.log_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn action_calls(&self) -> Vec<(ContainerAction, String)> {
        self.action_calls.lock().unwrap().clone()
    }
}

impl Backend for StubBackend {
    fn container(&self, id: &str) -> Result<ContainerDetail, FetchError> {
        Ok(ContainerDetail {
            id: id.to_string(),
            status: "running".into(),
            ..Default::default()
        })
    }

    fn container_logs(&self, _id: &str, page: u32) -> Result<String, FetchError> {
        self.log_calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .unwrap_or_else(|| Ok(String::new()))
    }

    fn container_stats(&self, _id: &str) -> Result<ContainerStats, FetchError> {
        Err(FetchError::Status(404))
    }

    fn containers(&self, filter: ContainerFilter) -> Result<Vec<ContainerSummary>, FetchError> {
        let containers = self.containers.lock().unwrap();
        Ok(containers
            .iter()
            .filter(|c| match filter {
                ContainerFilter::All => true,
                ContainerFilter::Running => c.state == "running",
                ContainerFilter::Stopped => c.state == "exited",
            })
            .cloned()
            .collect())
    }

    fn images(&self) -> Result<Vec<ImageSummary>, FetchError> {
        Ok(Vec::new())
    }

    fn volumes(&self) -> Result<Vec<VolumeSummary>, FetchError> {
        Ok(Vec::new())
    }

    fn dashboard(&self) -> Result<DashboardSummary, FetchError> {
        Err(FetchError::Transport("connection refused".into()))
    }

    fn container_action(
        &self,
        action: ContainerAction,
        id: &str,
    ) -> Result<ActionReply, FetchError> {
        self.action_calls
            .lock()
            .unwrap()
            .push((action, id.to_string()));
        match action {
            ContainerAction::Delete => Err(FetchError::Status(409)),
            _ => Ok(ActionReply::default()),
        }
    }
}
