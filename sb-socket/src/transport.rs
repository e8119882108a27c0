//! The transport seam.
//!
//! The bridge never talks to a socket directly. It registers raw listeners
//! through [`Transport`], which a host implements on top of whatever
//! socket.io client it embeds. [`LocalTransport`] is an in-process
//! implementation: hosts forward their client's callbacks into
//! [`LocalTransport::emit`], and tests drive it directly.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::{debug, trace};

use crate::mapper::DecodeError;
use crate::payload::{payload_from_json, PayloadValue};

/// A raw listener registered for one wire name.
///
/// Listeners run synchronously in the transport's callback context and
/// return decode failures to the transport instead of swallowing them.
pub type Listener = Arc<dyn Fn(&[PayloadValue]) -> Result<(), DecodeError> + Send + Sync>;

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// The subscription surface of an underlying socket.io client.
pub trait Transport: Send + Sync {
    /// Register `listener` for `wire_name`.
    fn on(&self, wire_name: &str, listener: Listener) -> ListenerId;

    /// Remove a listener. Returns false if it was not registered.
    fn off(&self, wire_name: &str, id: ListenerId) -> bool;
}

/// In-process transport keyed by wire name.
#[derive(Default)]
pub struct LocalTransport {
    listeners: Mutex<HashMap<String, Vec<(ListenerId, Listener)>>>,
    next_id: AtomicU64,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a wire event to every listener registered for `wire_name`.
    ///
    /// Listeners are called in registration order. All of them run even if
    /// one fails; the first decode failure is returned. Returns the number
    /// of listeners invoked.
    pub fn emit(&self, wire_name: &str, payload: &[PayloadValue]) -> Result<usize, DecodeError> {
        // Snapshot so listeners may (un)subscribe while being called.
        let snapshot: Vec<Listener> = {
            let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            match listeners.get(wire_name) {
                Some(entries) => entries.iter().map(|(_, l)| Arc::clone(l)).collect(),
                None => Vec::new(),
            }
        };

        if snapshot.is_empty() {
            trace!("no listeners for wire event {wire_name}");
            return Ok(0);
        }

        let mut first_error = None;
        for listener in &snapshot {
            if let Err(e) = listener(payload) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(snapshot.len()),
        }
    }

    /// Deliver a wire event whose arguments arrived as JSON.
    pub fn emit_json(&self, wire_name: &str, args: Vec<Value>) -> Result<usize, DecodeError> {
        self.emit(wire_name, &payload_from_json(args))
    }

    /// Number of listeners registered for `wire_name`.
    pub fn listener_count(&self, wire_name: &str) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(wire_name)
            .map_or(0, Vec::len)
    }
}

impl Transport for LocalTransport {
    fn on(&self, wire_name: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(wire_name.to_string())
            .or_default()
            .push((id, listener));
        debug!("registered {id} for {wire_name}");
        id
    }

    fn off(&self, wire_name: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entries) = listeners.get_mut(wire_name) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            listeners.remove(wire_name);
        }
        if removed {
            debug!("removed {id} from {wire_name}");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_listener(counter: &Arc<AtomicUsize>) -> Listener {
        let counter = Arc::clone(counter);
        Arc::new(move |_payload: &[PayloadValue]| -> Result<(), DecodeError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_emit_reaches_registered_listeners() {
        let transport = LocalTransport::new();
        let counter = Arc::new(AtomicUsize::new(0));
        transport.on("ping", counting_listener(&counter));
        transport.on("ping", counting_listener(&counter));

        assert_eq!(transport.emit("ping", &[]).unwrap(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(transport.emit("pong", &[]).unwrap(), 0);
    }

    #[test]
    fn test_off_removes_only_that_listener() {
        let transport = LocalTransport::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let first = transport.on("ping", counting_listener(&counter));
        transport.on("ping", counting_listener(&counter));

        assert!(transport.off("ping", first));
        assert!(!transport.off("ping", first));
        assert!(!transport.off("pong", first));
        assert_eq!(transport.listener_count("ping"), 1);

        transport.emit("ping", &[]).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_runs_all_listeners_and_returns_first_error() {
        let transport = LocalTransport::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let failing: Listener = Arc::new(|_payload: &[PayloadValue]| -> Result<(), DecodeError> {
            Err(DecodeError::TypeMismatch {
                kind: crate::events::EventKind::ReconnectAttempt,
                index: 0,
                expected: "integer",
                found: "nothing",
            })
        });
        transport.on("reconnect_attempt", failing);
        transport.on("reconnect_attempt", counting_listener(&counter));

        assert!(transport.emit("reconnect_attempt", &[]).is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let transport = Arc::new(LocalTransport::new());
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let listener: Listener = {
            let transport = Arc::clone(&transport);
            let slot = Arc::clone(&slot);
            Arc::new(move |_payload: &[PayloadValue]| -> Result<(), DecodeError> {
                if let Some(id) = slot.lock().unwrap().take() {
                    transport.off("disconnect", id);
                }
                Ok(())
            })
        };
        let id = transport.on("disconnect", listener);
        *slot.lock().unwrap() = Some(id);

        assert_eq!(transport.emit("disconnect", &[]).unwrap(), 1);
        assert_eq!(transport.listener_count("disconnect"), 0);
    }

    #[test]
    fn test_emit_json() {
        let transport = LocalTransport::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listener: Listener = {
            let seen = Arc::clone(&seen);
            Arc::new(move |payload: &[PayloadValue]| -> Result<(), DecodeError> {
                seen.lock().unwrap().extend_from_slice(payload);
                Ok(())
            })
        };
        transport.on("message", listener);

        transport
            .emit_json("message", vec![serde_json::json!("hi"), serde_json::json!(1)])
            .unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![PayloadValue::from("hi"), PayloadValue::Int(1)]
        );
    }
}
