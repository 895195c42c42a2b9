//! Start/stop/restart/delete handlers for the container detail screen.
//!
//! An action is: confirm, one request, then either refresh the detail view or
//! leave it (delete). Failures are reported, never retried or rolled back.

use tracing::{info, warn};

use crate::{ActionReply, Backend, FetchError, Method};

/// A lifecycle action on a single container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
    Delete,
}

/// What the caller should do after a successful action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    RefreshDetail,
    NavigateAway,
}

/// Result of one dispatched action, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub action: ContainerAction,
    pub message: String,
    /// `None` when the action failed.
    pub follow_up: Option<FollowUp>,
}

impl ActionOutcome {
    pub fn from_result(action: ContainerAction, result: Result<ActionReply, FetchError>) -> Self {
        match result {
            Ok(reply) => Self {
                action,
                message: action.success_message(&reply),
                follow_up: Some(action.follow_up()),
            },
            Err(error) => Self {
                action,
                message: action.failure_message(&error),
                follow_up: None,
            },
        }
    }

    pub fn succeeded(&self) -> bool {
        self.follow_up.is_some()
    }
}

impl ContainerAction {
    /// The start/stop toggle: a running container offers stop, anything else start.
    pub fn toggle_for_status(status: &str) -> Self {
        if status.eq_ignore_ascii_case("running") {
            ContainerAction::Stop
        } else {
            ContainerAction::Start
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            ContainerAction::Start => "start",
            ContainerAction::Stop => "stop",
            ContainerAction::Restart => "restart",
            ContainerAction::Delete => "delete",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            ContainerAction::Start => "started",
            ContainerAction::Stop => "stopped",
            ContainerAction::Restart => "restarted",
            ContainerAction::Delete => "deleted",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContainerAction::Start => "Start",
            ContainerAction::Stop => "Stop",
            ContainerAction::Restart => "Restart",
            ContainerAction::Delete => "Delete",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ContainerAction::Start => "▶",
            ContainerAction::Stop => "◼",
            ContainerAction::Restart => "↻",
            ContainerAction::Delete => "✖",
        }
    }

    pub fn confirm_message(&self) -> &'static str {
        match self {
            ContainerAction::Start => "Are you sure you want to start this container?",
            ContainerAction::Stop => "Are you sure you want to stop this container?",
            ContainerAction::Restart => "Are you sure you want to restart this container?",
            ContainerAction::Delete => {
                "Are you sure you want to delete this container? This action cannot be undone."
            }
        }
    }

    pub fn endpoint(&self, id: &str) -> (Method, String) {
        match self {
            ContainerAction::Start => (Method::Get, format!("/container-start/{}", id)),
            ContainerAction::Stop => (Method::Get, format!("/container-stop/{}", id)),
            ContainerAction::Restart => (Method::Post, format!("/container/{}/restart", id)),
            ContainerAction::Delete => (Method::Delete, format!("/container/{}", id)),
        }
    }

    pub fn follow_up(&self) -> FollowUp {
        match self {
            ContainerAction::Delete => FollowUp::NavigateAway,
            _ => FollowUp::RefreshDetail,
        }
    }

    pub fn success_message(&self, reply: &ActionReply) -> String {
        match self {
            ContainerAction::Start | ContainerAction::Stop => match reply.message.as_deref() {
                Some(message) if !message.is_empty() => message.to_string(),
                _ => format!("Container {} successfully", self.past_tense()),
            },
            ContainerAction::Restart | ContainerAction::Delete => {
                format!("Container {} successfully", self.past_tense())
            }
        }
    }

    pub fn failure_message(&self, error: &FetchError) -> String {
        format!("Failed to {} container: {}", self.verb(), error)
    }
}

/// Issues `action` against container `id` and turns the reply into a user-facing outcome.
pub fn dispatch<B: Backend + ?Sized>(backend: &B, action: ContainerAction, id: &str) -> ActionOutcome {
    let result = backend.container_action(action, id);
    match &result {
        Ok(_) => info!(action = action.verb(), container = id, "action succeeded"),
        Err(error) => warn!(action = action.verb(), container = id, %error, "action failed"),
    }
    ActionOutcome::from_result(action, result)
}
