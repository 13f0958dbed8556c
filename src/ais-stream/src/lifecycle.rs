use std::time::Duration;

use seawatch_core::{ConnectionState, ConnectionStatus};

use crate::ReconnectPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Someone asked for a live connection.
    Connect,
    Opened,
    /// The transport reported a failure. A `Closed` event always follows.
    Failed(String),
    Closed,
    ReconnectDue,
    Enable,
    Disable,
    Teardown,
}

/// Side effects the driver has to carry out after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open,
    Close,
    ScheduleReconnect(Duration),
    CancelReconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Socket {
    Idle,
    Connecting,
    Open,
}

/// Connection lifecycle of a single stream endpoint, free of any I/O.
#[derive(Debug)]
pub struct Lifecycle {
    status: ConnectionStatus,
    enabled: bool,
    torn_down: bool,
    socket: Socket,
    reconnect_pending: bool,
    policy: ReconnectPolicy,
}

impl Lifecycle {
    pub fn new(enabled: bool, policy: ReconnectPolicy) -> Self {
        Self {
            status: ConnectionStatus::default(),
            enabled,
            torn_down: false,
            socket: Socket::Idle,
            reconnect_pending: false,
            policy,
        }
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.torn_down
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    pub fn handle(&mut self, event: LifecycleEvent) -> Vec<Action> {
        let mut actions = Vec::new();

        match event {
            LifecycleEvent::Connect => self.connect(&mut actions),
            LifecycleEvent::ReconnectDue => {
                self.reconnect_pending = false;
                self.connect(&mut actions);
            }
            LifecycleEvent::Opened => {
                if !self.is_enabled() {
                    actions.push(Action::Close);
                    self.socket = Socket::Idle;
                } else {
                    self.socket = Socket::Open;
                    self.status = ConnectionStatus {
                        state: ConnectionState::Connected,
                        last_error: None,
                    };
                    self.policy.reset();
                }
            }
            LifecycleEvent::Failed(message) => {
                if self.is_enabled() {
                    self.status = ConnectionStatus {
                        state: ConnectionState::Error,
                        last_error: Some(message),
                    };
                }
            }
            LifecycleEvent::Closed => {
                self.socket = Socket::Idle;
                if self.is_enabled() {
                    self.status.state = ConnectionState::Disconnected;
                    self.cancel_reconnect(&mut actions);
                    actions.push(Action::ScheduleReconnect(self.policy.next_delay()));
                    self.reconnect_pending = true;
                }
            }
            LifecycleEvent::Enable => {
                if !self.torn_down && !self.enabled {
                    self.enabled = true;
                    self.connect(&mut actions);
                }
            }
            LifecycleEvent::Disable => {
                if self.enabled {
                    self.enabled = false;
                    self.shut(&mut actions);
                }
            }
            LifecycleEvent::Teardown => {
                if !self.torn_down {
                    self.torn_down = true;
                    self.enabled = false;
                    self.shut(&mut actions);
                }
            }
        }

        actions
    }

    fn connect(&mut self, actions: &mut Vec<Action>) {
        if !self.is_enabled() || self.socket != Socket::Idle {
            return;
        }
        self.cancel_reconnect(actions);
        self.socket = Socket::Connecting;
        self.status.state = ConnectionState::Connecting;
        actions.push(Action::Open);
    }

    fn shut(&mut self, actions: &mut Vec<Action>) {
        self.cancel_reconnect(actions);
        if self.socket != Socket::Idle {
            actions.push(Action::Close);
            self.socket = Socket::Idle;
        }
        self.status = ConnectionStatus::default();
    }

    fn cancel_reconnect(&mut self, actions: &mut Vec<Action>) {
        if self.reconnect_pending {
            actions.push(Action::CancelReconnect);
            self.reconnect_pending = false;
        }
    }
}
