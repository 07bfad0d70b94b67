//! Mock transport for testing without API access.
//!
//! Serves scripted response bodies per command, in the order they were
//! scripted, and records every URL it was asked for.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::Mutex;
use url::Url;

use crate::request::Command;

use super::error::ApiError;
use super::transport::Transport;

#[derive(Debug, Clone)]
enum Scripted {
    Body(String),
    Unreachable,
}

#[derive(Debug, Default)]
struct State {
    scripts: HashMap<String, VecDeque<Scripted>>,
    requests: Vec<Url>,
}

/// Mock transport that serves scripted bodies.
///
/// Clones share state, so a test can keep one handle while the client
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response body for the next request to `command`.
    pub async fn respond(&self, command: Command, body: impl Into<String>) {
        self.push(command, Scripted::Body(body.into())).await;
    }

    /// Queue a transport failure for the next request to `command`.
    pub async fn fail(&self, command: Command) {
        self.push(command, Scripted::Unreachable).await;
    }

    /// Every URL requested so far, in order.
    pub async fn requests(&self) -> Vec<Url> {
        self.state.lock().await.requests.clone()
    }

    /// Query parameters (excluding the API key) of each request made to
    /// `command`, in order.
    pub async fn requests_for(&self, command: Command) -> Vec<Vec<(String, String)>> {
        self.state
            .lock()
            .await
            .requests
            .iter()
            .filter(|url| command_of(url).as_deref() == Some(command.name()))
            .map(|url| {
                url.query_pairs()
                    .filter(|(k, _)| k != "key")
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .collect()
    }

    /// Number of scripted responses not yet consumed.
    pub async fn pending(&self) -> usize {
        self.state
            .lock()
            .await
            .scripts
            .values()
            .map(VecDeque::len)
            .sum()
    }

    async fn push(&self, command: Command, scripted: Scripted) {
        self.state
            .lock()
            .await
            .scripts
            .entry(command.name().to_string())
            .or_default()
            .push_back(scripted);
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> Result<String, ApiError> {
        let mut state = self.state.lock().await;
        state.requests.push(url.clone());

        let command = command_of(url).unwrap_or_default();
        let next = state
            .scripts
            .get_mut(&command)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Body(body)) => Ok(body),
            Some(Scripted::Unreachable) => Err(ApiError::Transport {
                message: format!("{command}: scripted transport failure"),
            }),
            None => Err(ApiError::Transport {
                message: format!("{command}: no scripted response"),
            }),
        }
    }
}

/// The command name is the last path segment of a request URL.
fn command_of(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(str::to_string)
}
