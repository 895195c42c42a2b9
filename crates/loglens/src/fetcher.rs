//! Background worker that performs backend requests one at a time.
//!
//! The UI thread submits [`Job`]s and drains [`Completion`]s between frames,
//! so it never blocks on the network and every result is applied on the UI
//! thread. Jobs run in submission order. Nothing is cancelled: a completion
//! nobody is waiting for any more is simply discarded by the receiver.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    ActionOutcome, Backend, ContainerAction, ContainerDetail, ContainerFilter, ContainerStats,
    ContainerSummary, DashboardSummary, FetchError, ImageSummary, PageRequest, VolumeSummary,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Dashboard,
    Containers(ContainerFilter),
    Images,
    Volumes,
    Detail(String),
    Stats(String),
    Logs(PageRequest),
    Action(ContainerAction, String),
}

#[derive(Debug, Clone)]
pub enum Completion {
    Dashboard(Result<DashboardSummary, FetchError>),
    Containers(ContainerFilter, Result<Vec<ContainerSummary>, FetchError>),
    Images(Result<Vec<ImageSummary>, FetchError>),
    Volumes(Result<Vec<VolumeSummary>, FetchError>),
    Detail(String, Result<ContainerDetail, FetchError>),
    Stats(String, Result<ContainerStats, FetchError>),
    Logs(PageRequest, Result<String, FetchError>),
    Action(String, ActionOutcome),
}

pub struct Fetcher {
    jobs: Sender<Job>,
    completions: Receiver<Completion>,
}

impl Fetcher {
    /// Starts the worker thread. It exits once the `Fetcher` is dropped.
    pub fn spawn<B>(backend: B) -> std::io::Result<Self>
    where
        B: Backend + Send + 'static,
    {
        let (jobs_tx, jobs_rx) = unbounded::<Job>();
        let (completions_tx, completions_rx) = unbounded::<Completion>();

        std::thread::Builder::new()
            .name("loglens-fetcher".into())
            .spawn(move || {
                while let Ok(job) = jobs_rx.recv() {
                    debug!(?job, "running job");
                    let completion = run_job(&backend, job);
                    if completions_tx.send(completion).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            jobs: jobs_tx,
            completions: completions_rx,
        })
    }

    pub fn submit(&self, job: Job) {
        if let Err(e) = self.jobs.send(job) {
            warn!(job = ?e.into_inner(), "fetch worker is gone, dropping job");
        }
    }

    /// Next finished job, if any, without blocking.
    pub fn try_recv(&self) -> Option<Completion> {
        self.completions.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

fn run_job<B: Backend + ?Sized>(backend: &B, job: Job) -> Completion {
    match job {
        Job::Dashboard => Completion::Dashboard(backend.dashboard()),
        Job::Containers(filter) => Completion::Containers(filter, backend.containers(filter)),
        Job::Images => Completion::Images(backend.images()),
        Job::Volumes => Completion::Volumes(backend.volumes()),
        Job::Detail(id) => {
            let result = backend.container(&id);
            Completion::Detail(id, result)
        }
        Job::Stats(id) => {
            let result = backend.container_stats(&id);
            Completion::Stats(id, result)
        }
        Job::Logs(request) => {
            let result = backend.container_logs(&request.container_id, request.page);
            Completion::Logs(request, result)
        }
        Job::Action(action, id) => {
            let outcome = crate::dispatch(backend, action, &id);
            Completion::Action(id, outcome)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubBackend;
    use crate::views::{containers_grid, dashboard_view};
    use crate::{FollowUp, LogStreamLoader};
    use std::sync::Arc;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_boundary_crossings_share_one_request() {
        let backend = Arc::new(
            StubBackend::default()
                .with_page(1, Ok("newest".into()))
                .with_page(2, Ok("older".into())),
        );
        let fetcher = Fetcher::spawn(Arc::clone(&backend)).unwrap();
        let mut loader = LogStreamLoader::new("abc", 80, 10);

        fetcher.submit(Job::Logs(loader.mount().unwrap()));
        let Some(Completion::Logs(request, result)) = fetcher.recv_timeout(WAIT) else {
            panic!("expected the first page");
        };
        assert!(loader.finish(&request, result));

        for _ in 0..2 {
            if let Some(request) = loader.on_scroll() {
                fetcher.submit(Job::Logs(request));
            }
        }
        let Some(Completion::Logs(request, result)) = fetcher.recv_timeout(WAIT) else {
            panic!("expected the older page");
        };
        assert!(loader.finish(&request, result));
        assert!(fetcher.recv_timeout(Duration::from_millis(100)).is_none());

        assert_eq!(backend.log_calls(), 2);
        let lines: Vec<&str> = loader.buffer().lines().collect();
        assert_eq!(lines, vec!["older", "newest"]);
    }

    #[test]
    fn test_container_filter_travels_with_completion() {
        let container = |id: &str, state: &str| ContainerSummary {
            id: id.into(),
            state: state.into(),
            ..Default::default()
        };
        let backend = StubBackend::default()
            .with_containers(vec![container("aaa", "running"), container("bbb", "exited")]);
        let fetcher = Fetcher::spawn(backend).unwrap();

        fetcher.submit(Job::Containers(ContainerFilter::Running));
        fetcher.submit(Job::Dashboard);

        let Some(Completion::Containers(filter, result)) = fetcher.recv_timeout(WAIT) else {
            panic!("expected the container list");
        };
        assert_eq!(filter, ContainerFilter::Running);
        let grid = containers_grid(result);
        let ids: Vec<&str> = grid.cards().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["aaa"]);
        assert!(!grid.is_failed());

        let Some(Completion::Dashboard(result)) = fetcher.recv_timeout(WAIT) else {
            panic!("expected the dashboard");
        };
        assert!(dashboard_view(result).running.is_failed());
    }

    #[test]
    fn test_jobs_complete_in_order() {
        let backend = Arc::new(StubBackend::default());
        let fetcher = Fetcher::spawn(Arc::clone(&backend)).unwrap();

        fetcher.submit(Job::Action(ContainerAction::Stop, "abc".into()));
        fetcher.submit(Job::Action(ContainerAction::Delete, "abc".into()));
        fetcher.submit(Job::Dashboard);

        let Some(Completion::Action(_, stopped)) = fetcher.recv_timeout(WAIT) else {
            panic!("expected the stop outcome");
        };
        assert_eq!(stopped.follow_up, Some(FollowUp::RefreshDetail));

        let Some(Completion::Action(_, deleted)) = fetcher.recv_timeout(WAIT) else {
            panic!("expected the delete outcome");
        };
        assert_eq!(
            deleted.message,
            "Failed to delete container: HTTP error! Status: 409"
        );

        assert!(matches!(
            fetcher.recv_timeout(WAIT),
            Some(Completion::Dashboard(Err(FetchError::Transport(_))))
        ));
        assert_eq!(
            backend.action_calls(),
            vec![
                (ContainerAction::Stop, "abc".to_string()),
                (ContainerAction::Delete, "abc".to_string()),
            ]
        );
    }
}
