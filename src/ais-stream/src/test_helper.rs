use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{Connection, Connector, MessageSink, Result, error::RefusedSnafu};

/// In-memory [Connector] whose connection attempts are scripted by the test.
#[derive(Clone)]
pub struct MockConnector {
    state: Arc<MockState>,
}

/// Server side of the mock, yields one [MockSession] per accepted connection.
pub struct MockServer {
    sessions: mpsc::UnboundedReceiver<MockSession>,
}

/// Server side of a single accepted connection. Dropping it closes the connection.
pub struct MockSession {
    frames: mpsc::UnboundedSender<MockFrame>,
    closed: Arc<AtomicUsize>,
}

pub struct MockConnection {
    frames: mpsc::UnboundedReceiver<MockFrame>,
    live: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Accept,
    Refuse(String),
    Hang,
}

#[derive(Debug, Clone)]
enum MockFrame {
    Text(String),
    Error(String),
}

struct MockState {
    attempts: AtomicUsize,
    live: Arc<AtomicUsize>,
    script: Mutex<VecDeque<MockOutcome>>,
    sessions: mpsc::UnboundedSender<MockSession>,
}

/// [MessageSink] that records every payload.
#[derive(Clone, Default)]
pub struct RecordingSink {
    payloads: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    pub fn new() -> (MockConnector, MockServer) {
        let (sessions, rx) = mpsc::unbounded_channel();
        let connector = MockConnector {
            state: Arc::new(MockState {
                attempts: AtomicUsize::new(0),
                live: Arc::new(AtomicUsize::new(0)),
                script: Mutex::new(VecDeque::new()),
                sessions,
            }),
        };
        (connector, MockServer { sessions: rx })
    }

    /// Queues outcomes for the next attempts, attempts past the script are accepted.
    pub fn script(&self, outcomes: impl IntoIterator<Item = MockOutcome>) {
        self.state.script.lock().unwrap().extend(outcomes);
    }

    pub fn attempts(&self) -> usize {
        self.state.attempts.load(Ordering::SeqCst)
    }

    pub fn live_connections(&self) -> usize {
        self.state.live.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Connection = MockConnection;

    async fn connect(&self, _url: &str) -> Result<MockConnection> {
        self.state.attempts.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .state
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockOutcome::Accept);

        match outcome {
            MockOutcome::Accept => {
                let (tx, rx) = mpsc::unbounded_channel();
                let closed = Arc::new(AtomicUsize::new(0));
                self.state.live.fetch_add(1, Ordering::SeqCst);
                let _ = self.state.sessions.send(MockSession {
                    frames: tx,
                    closed: closed.clone(),
                });
                Ok(MockConnection {
                    frames: rx,
                    live: self.state.live.clone(),
                    closed,
                })
            }
            MockOutcome::Refuse(reason) => RefusedSnafu { reason }.fail(),
            MockOutcome::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn next_message(&mut self) -> Option<Result<String>> {
        match self.frames.recv().await? {
            MockFrame::Text(text) => Some(Ok(text)),
            MockFrame::Error(reason) => Some(RefusedSnafu { reason }.fail()),
        }
    }

    async fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockServer {
    pub async fn accept(&mut self) -> MockSession {
        self.sessions.recv().await.unwrap()
    }

    pub fn try_accept(&mut self) -> Option<MockSession> {
        self.sessions.try_recv().ok()
    }
}

impl MockSession {
    pub fn send(&self, payload: impl Into<String>) {
        let _ = self.frames.send(MockFrame::Text(payload.into()));
    }

    pub fn fail(&self, reason: &str) {
        let _ = self.frames.send(MockFrame::Error(reason.to_string()));
    }

    /// Number of times the client closed this connection.
    pub fn client_closes(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl RecordingSink {
    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

impl MessageSink for RecordingSink {
    fn handle(&mut self, payload: &str) {
        self.payloads.lock().unwrap().push(payload.to_string());
    }
}
