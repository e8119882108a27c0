//! Event kinds, mapped results, and the broadcast event stream.
//!
//! Defines the closed set of event kinds the bridge understands, the typed
//! results their payloads decode into, and a broadcast-based stream for
//! consumers that prefer pulling events over registering callbacks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use sb_core::config::StreamConfig;
use sb_core::error::{SbError, SbResult};

use crate::payload::{PayloadValue, SocketError};

/// Wire-level event names used by the socket.io client library.
pub mod wire {
    pub const CONNECT: &str = "connect";
    pub const CONNECTING: &str = "connecting";
    pub const DISCONNECT: &str = "disconnect";
    pub const ERROR: &str = "error";
    pub const CONNECT_ERROR: &str = "connect_error";
    pub const RECONNECT_ERROR: &str = "reconnect_error";
    pub const MESSAGE: &str = "message";
    pub const RECONNECT: &str = "reconnect";
    pub const RECONNECT_ATTEMPT: &str = "reconnect_attempt";
    pub const PING: &str = "ping";
    pub const PONG: &str = "pong";
}

/// Every event kind the bridge maps.
///
/// The set is closed: wire names outside the registry table are never
/// turned into an `EventKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The socket connected (`connect`).
    Connect,
    /// A connection attempt started (`connecting`).
    Connecting,
    /// The socket disconnected (`disconnect`).
    Disconnect,
    /// Any error-ish event (`error`, `connect_error`, `reconnect_error`).
    Error,
    /// An unnamed data message (`message`).
    Message,
    /// The socket reconnected (`reconnect`).
    Reconnect,
    /// A reconnection attempt is starting (`reconnect_attempt`).
    ReconnectAttempt,
    /// Heartbeat sent (`ping`).
    Ping,
    /// Heartbeat answered (`pong`).
    Pong,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [EventKind; 9] = [
        EventKind::Connect,
        EventKind::Connecting,
        EventKind::Disconnect,
        EventKind::Error,
        EventKind::Message,
        EventKind::Reconnect,
        EventKind::ReconnectAttempt,
        EventKind::Ping,
        EventKind::Pong,
    ];

    /// Stable lower-snake label, as used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Connecting => "connecting",
            Self::Disconnect => "disconnect",
            Self::Error => "error",
            Self::Message => "message",
            Self::Reconnect => "reconnect",
            Self::ReconnectAttempt => "reconnect_attempt",
            Self::Ping => "ping",
            Self::Pong => "pong",
        }
    }

    /// Whether payloads of this kind are ignored and decode to unit.
    pub fn is_unit(&self) -> bool {
        matches!(
            self,
            Self::Connect
                | Self::Connecting
                | Self::Disconnect
                | Self::Reconnect
                | Self::Ping
                | Self::Pong
        )
    }

    /// Parse a list of kind labels, e.g. from `[stream] kinds`.
    ///
    /// An empty list selects every kind.
    pub fn parse_list<S: AsRef<str>>(labels: &[S]) -> SbResult<Vec<EventKind>> {
        if labels.is_empty() {
            return Ok(Self::ALL.to_vec());
        }
        labels.iter().map(|s| s.as_ref().parse()).collect()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = SbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SbError::Config(format!("unknown event kind: {s}")))
    }
}

/// The typed value a payload decodes into.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedResult {
    /// Result of every kind whose payload is ignored.
    Unit,
    Error(SocketError),
    /// The untouched payload of a `message` event.
    Message(Vec<PayloadValue>),
    /// The attempt counter of a `reconnect_attempt` event.
    ReconnectAttempt(i32),
}

impl MappedResult {
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

/// A decoded event as delivered to observers and stream receivers.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedEvent {
    /// The kind the wire event was mapped to.
    pub kind: EventKind,
    /// The wire name that actually fired.
    pub wire_name: &'static str,
    /// The decoded payload.
    pub result: MappedResult,
}

impl MappedEvent {
    /// The error value, if this is an `Error` event.
    pub fn as_error(&self) -> Option<&SocketError> {
        match &self.result {
            MappedResult::Error(e) => Some(e),
            _ => None,
        }
    }

    /// The attempt counter, if this is a `ReconnectAttempt` event.
    pub fn as_reconnect_attempt(&self) -> Option<i32> {
        match self.result {
            MappedResult::ReconnectAttempt(n) => Some(n),
            _ => None,
        }
    }

    /// The raw message payload, if this is a `Message` event.
    pub fn as_message(&self) -> Option<&[PayloadValue]> {
        match &self.result {
            MappedResult::Message(values) => Some(values),
            _ => None,
        }
    }
}

/// Broadcast-based stream of mapped events.
///
/// Uses a tokio broadcast channel so multiple consumers can independently
/// receive events without blocking the transport callback that produced them.
#[derive(Clone)]
pub struct EventStream {
    sender: broadcast::Sender<MappedEvent>,
}

impl EventStream {
    /// Create a new EventStream with the given channel capacity.
    ///
    /// Panics if `capacity` is zero; use [`EventStream::from_config`] for
    /// validated construction.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a stream sized by the `[stream]` configuration section.
    pub fn from_config(config: &StreamConfig) -> SbResult<Self> {
        if config.capacity == 0 {
            return Err(SbError::Config("stream.capacity must be greater than 0".into()));
        }
        Ok(Self::new(config.capacity))
    }

    /// Subscribe to receive mapped events.
    ///
    /// Slow consumers that fall behind receive `RecvError::Lagged` and
    /// miss the overwritten events.
    pub fn subscribe(&self) -> broadcast::Receiver<MappedEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all active receivers. Never blocks.
    pub fn dispatch(&self, event: MappedEvent) {
        let kind = event.kind;
        match self.sender.send(event) {
            Ok(count) => debug!("streamed {kind} to {count} receiver(s)"),
            // No active receivers; the event is dropped.
            Err(_) => debug!("no receivers for {kind}"),
        }
    }

    /// Get the current number of active receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
