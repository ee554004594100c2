//! Scripted in-memory implementations of the remote service traits.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::watch;

use octochat_types::build::{BuildRequest, BuildResult};
use octochat_types::chat::{DialogReply, DialogRequest};
use octochat_types::error::ServiceError;

use crate::readiness::poller::PollerStatus;
use crate::remote::builder::KnowledgeBaseBuilder;
use crate::remote::dialog::DialogRuntime;

pub fn not_ready() -> Result<DialogReply, ServiceError> {
    Err(ServiceError::NotReady("NotFoundException".to_string()))
}

pub fn reply(text: &str) -> Result<DialogReply, ServiceError> {
    Ok(DialogReply::text(text))
}

/// Dialog runtime answering from a fixed script, then `NotReady` forever.
pub struct ScriptedRuntime {
    script: Mutex<VecDeque<Result<DialogReply, ServiceError>>>,
    requests: Mutex<Vec<DialogRequest>>,
    observer: Mutex<Option<watch::Receiver<PollerStatus>>>,
    observed: Mutex<Vec<PollerStatus>>,
}

impl ScriptedRuntime {
    pub fn new(script: Vec<Result<DialogReply, ServiceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            observer: Mutex::new(None),
            observed: Mutex::new(Vec::new()),
        }
    }

    pub fn not_ready_then(n: usize, text: &str) -> Self {
        let mut script: Vec<_> = (0..n).map(|_| not_ready()).collect();
        script.push(reply(text));
        Self::new(script)
    }

    /// Record the poller status seen at the moment of each call.
    pub fn observe(&self, status: watch::Receiver<PollerStatus>) {
        *self.observer.lock().unwrap() = Some(status);
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<DialogRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn observed(&self) -> Vec<PollerStatus> {
        self.observed.lock().unwrap().clone()
    }
}

impl DialogRuntime for ScriptedRuntime {
    async fn post_text(&self, request: &DialogRequest) -> Result<DialogReply, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        let seen = self.observer.lock().unwrap().as_ref().map(|rx| *rx.borrow());
        if let Some(status) = seen {
            self.observed.lock().unwrap().push(status);
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(not_ready)
    }
}

/// Dialog runtime whose calls never complete.
pub struct StalledRuntime;

impl DialogRuntime for StalledRuntime {
    async fn post_text(&self, _request: &DialogRequest) -> Result<DialogReply, ServiceError> {
        std::future::pending().await
    }
}

/// Builder answering each call from a fixed script.
pub struct ScriptedBuilder {
    script: Mutex<VecDeque<Result<BuildResult, ServiceError>>>,
    requests: Mutex<Vec<BuildRequest>>,
}

impl ScriptedBuilder {
    pub fn new(script: Vec<Result<BuildResult, ServiceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<BuildRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl KnowledgeBaseBuilder for ScriptedBuilder {
    async fn build(&self, request: &BuildRequest) -> Result<BuildResult, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Transport("no scripted build result".to_string())))
    }
}

/// Builder whose calls never complete.
pub struct StalledBuilder;

impl KnowledgeBaseBuilder for StalledBuilder {
    async fn build(&self, _request: &BuildRequest) -> Result<BuildResult, ServiceError> {
        std::future::pending().await
    }
}
