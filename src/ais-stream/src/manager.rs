use std::{future::pending, pin::Pin, sync::Arc};

use futures::future::BoxFuture;
use seawatch_core::ConnectionStatus;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Sleep, sleep},
};
use tracing::{Instrument, error, info, info_span, warn};

use crate::{
    Connection, Connector, MessageSink, ReconnectPolicy, Result, StreamSettings,
    lifecycle::{Action, Lifecycle, LifecycleEvent},
};

/// Owner side of a stream connection driver. Dropping the handle tears the driver down.
#[derive(Debug)]
pub struct StreamHandle {
    name: String,
    control: mpsc::UnboundedSender<Control>,
    status: watch::Receiver<ConnectionStatus>,
    last_message: watch::Receiver<Option<String>>,
    task: Option<JoinHandle<()>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Enable,
    Disable,
    Shutdown,
}

struct Driver<C: Connector, S> {
    url: String,
    connector: Arc<C>,
    sink: S,
    lifecycle: Lifecycle,
    status: watch::Sender<ConnectionStatus>,
    last_message: watch::Sender<Option<String>>,
    pending_connect: Option<BoxFuture<'static, Result<C::Connection>>>,
    connection: Option<C::Connection>,
    reconnect: Option<Pin<Box<Sleep>>>,
}

impl StreamHandle {
    pub fn from_settings<C: Connector, S: MessageSink>(
        settings: &StreamSettings,
        connector: C,
        sink: S,
    ) -> Self {
        Self::spawn(
            &settings.name,
            &settings.url,
            settings.enabled,
            ReconnectPolicy::new(settings.reconnect.clone()),
            connector,
            sink,
        )
    }

    /// Spawns the driver task, it connects right away when `enabled`.
    pub fn spawn<C: Connector, S: MessageSink>(
        name: &str,
        url: &str,
        enabled: bool,
        policy: ReconnectPolicy,
        connector: C,
        sink: S,
    ) -> Self {
        let (control, control_rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(ConnectionStatus::default());
        let (last_message_tx, last_message) = watch::channel(None);

        let driver = Driver {
            url: url.to_string(),
            connector: Arc::new(connector),
            sink,
            lifecycle: Lifecycle::new(enabled, policy),
            status: status_tx,
            last_message: last_message_tx,
            pending_connect: None,
            connection: None,
            reconnect: None,
        };

        let task = tokio::spawn(
            driver
                .run(control_rx)
                .instrument(info_span!("stream", name = %name)),
        );

        Self {
            name: name.to_string(),
            control,
            status,
            last_message,
            task: Some(task),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enable(&self) {
        let _ = self.control.send(Control::Enable);
    }

    pub fn disable(&self) {
        let _ = self.control.send(Control::Disable);
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    /// The most recent raw payload received on the stream.
    pub fn last_message(&self) -> Option<String> {
        self.last_message.borrow().clone()
    }

    /// Tears the driver down and waits for it to exit. No connection attempts are made
    /// after this returns.
    pub async fn close(mut self) {
        let _ = self.control.send(Control::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(stream = %self.name, "stream driver exited abnormally: {e:?}");
            }
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        let _ = self.control.send(Control::Shutdown);
    }
}

impl<C: Connector, S: MessageSink> Driver<C, S> {
    async fn run(mut self, mut control: mpsc::UnboundedReceiver<Control>) {
        self.apply(LifecycleEvent::Connect).await;

        loop {
            tokio::select! {
                command = control.recv() => match command {
                    Some(Control::Enable) => self.apply(LifecycleEvent::Enable).await,
                    Some(Control::Disable) => self.apply(LifecycleEvent::Disable).await,
                    Some(Control::Shutdown) | None => break,
                },
                result = connect_finished(&mut self.pending_connect) => {
                    self.pending_connect = None;
                    match result {
                        Ok(connection) => {
                            self.connection = Some(connection);
                            self.apply(LifecycleEvent::Opened).await;
                        }
                        Err(e) => {
                            warn!("connection attempt failed: {e}");
                            self.apply(LifecycleEvent::Failed(e.status_message())).await;
                            self.apply(LifecycleEvent::Closed).await;
                        }
                    }
                },
                message = next_message(&mut self.connection) => match message {
                    Some(Ok(payload)) => self.on_message(payload),
                    Some(Err(e)) => {
                        error!("stream transport failed: {e}");
                        self.connection = None;
                        self.apply(LifecycleEvent::Failed(e.status_message())).await;
                        self.apply(LifecycleEvent::Closed).await;
                    }
                    None => {
                        self.connection = None;
                        self.apply(LifecycleEvent::Closed).await;
                    }
                },
                _ = reconnect_due(&mut self.reconnect) => {
                    self.reconnect = None;
                    self.apply(LifecycleEvent::ReconnectDue).await;
                },
            }
        }

        self.apply(LifecycleEvent::Teardown).await;
        info!("stream driver stopped");
    }

    fn on_message(&mut self, payload: String) {
        self.sink.handle(&payload);
        self.last_message.send_replace(Some(payload));
    }

    async fn apply(&mut self, event: LifecycleEvent) {
        for action in self.lifecycle.handle(event) {
            match action {
                Action::Open => {
                    let connector = self.connector.clone();
                    let url = self.url.clone();
                    self.pending_connect =
                        Some(Box::pin(async move { connector.connect(&url).await }));
                }
                Action::Close => {
                    self.pending_connect = None;
                    if let Some(mut connection) = self.connection.take() {
                        connection.close().await;
                    }
                }
                Action::ScheduleReconnect(delay) => {
                    info!(?delay, "scheduling reconnect");
                    self.reconnect = Some(Box::pin(sleep(delay)));
                }
                Action::CancelReconnect => self.reconnect = None,
            }
        }

        let status = self.lifecycle.status();
        self.status.send_if_modified(|current| {
            if *current == *status {
                return false;
            }
            info!(
                from = %current.state,
                to = %status.state,
                error = ?status.last_error,
                "stream state changed"
            );
            *current = status.clone();
            true
        });
    }
}

async fn connect_finished<T>(slot: &mut Option<BoxFuture<'static, Result<T>>>) -> Result<T> {
    match slot {
        Some(attempt) => attempt.await,
        None => pending().await,
    }
}

async fn next_message<T: Connection>(connection: &mut Option<T>) -> Option<Result<String>> {
    match connection {
        Some(connection) => connection.next_message().await,
        None => pending().await,
    }
}

async fn reconnect_due(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => pending().await,
    }
}
