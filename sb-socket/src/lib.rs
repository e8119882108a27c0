//! socket-bridge socket - typed event mapping over a socket.io client.
//!
//! This crate maps the untyped, string-keyed events of a socket.io client
//! onto a closed set of typed event kinds:
//! - A static registry of event kinds and the wire names that trigger them
//! - Per-kind payload decoders (unit, error, message, reconnect attempt)
//! - A dispatch bridge that wires transport listeners to typed observers
//! - Event fan-out via a tokio broadcast channel
//!
//! Connection handling, reconnection policy, and the socket.io protocol
//! itself belong to the wrapped client, reached through [`Transport`].

pub mod bridge;
pub mod events;
pub mod mapper;
pub mod payload;
pub mod registry;
pub mod transport;
pub mod typed;

// Re-export key types
pub use bridge::{DispatchBridge, Subscription};
pub use events::{wire, EventKind, EventStream, MappedEvent, MappedResult};
pub use mapper::{DecodeError, Decoder};
pub use payload::{payload_from_json, PayloadValue, SocketError};
pub use transport::{Listener, ListenerId, LocalTransport, Transport};
pub use typed::TypedEvent;
