//! Dispatch bridge between a transport and typed observers.
//!
//! For every wire name the registry lists for a kind, the bridge registers
//! one raw listener on the transport. When a listener fires it decodes the
//! payload with the kind's decoder and hands the result to the observer.
//! Nothing here blocks or awaits; everything runs inside the transport's
//! own callback context.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info, warn};

use sb_core::config::StreamConfig;
use sb_core::error::SbResult;

use crate::events::{EventKind, EventStream, MappedEvent};
use crate::mapper::DecodeError;
use crate::payload::PayloadValue;
use crate::transport::{Listener, ListenerId, Transport};
use crate::typed::TypedEvent;

/// Handle for one `subscribe` call.
///
/// Pass it back to [`DispatchBridge::unsubscribe`] to remove exactly the
/// listeners that call registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
}

struct Registration {
    kind: EventKind,
    listeners: Vec<(&'static str, ListenerId)>,
}

/// Maps wire events from a transport onto typed observer calls.
///
/// Dropping the bridge removes every listener it registered.
pub struct DispatchBridge<T: Transport + ?Sized> {
    transport: Arc<T>,
    registrations: Mutex<HashMap<u64, Registration>>,
    next_id: AtomicU64,
}

impl<T: Transport + ?Sized> DispatchBridge<T> {
    /// Create a bridge over a shared transport.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            registrations: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Invoke `observer` with the decoded result of every wire event mapped
    /// to `kind`.
    ///
    /// Each wire name of the kind triggers the observer independently. A
    /// payload that fails to decode is reported back to the transport and
    /// the observer is not called.
    pub fn subscribe<F>(&self, kind: EventKind, observer: F) -> Subscription
    where
        F: Fn(MappedEvent) + Send + Sync + 'static,
    {
        let observer = Arc::new(observer);
        let listeners = kind
            .wire_names()
            .iter()
            .map(|&wire_name| {
                let listener = make_listener(kind, wire_name, Arc::clone(&observer));
                (wire_name, self.transport.on(wire_name, listener))
            })
            .collect::<Vec<_>>();

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        info!(
            "subscribed {kind} on {} wire name(s) as subscription {id}",
            listeners.len()
        );
        self.lock_registrations()
            .insert(id, Registration { kind, listeners });
        Subscription { id }
    }

    /// Typed variant of [`subscribe`](Self::subscribe): the observer receives
    /// the kind's result type directly.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sb_socket::{typed, DispatchBridge, LocalTransport, PayloadValue};
    ///
    /// let transport = Arc::new(LocalTransport::new());
    /// let bridge = DispatchBridge::new(Arc::clone(&transport));
    /// bridge.on::<typed::ReconnectAttempt, _>(|attempt| assert_eq!(attempt, 3));
    /// transport.emit("reconnect_attempt", &[PayloadValue::Int(3)]).unwrap();
    /// ```
    pub fn on<E, F>(&self, observer: F) -> Subscription
    where
        E: TypedEvent,
        F: Fn(E::Output) + Send + Sync + 'static,
    {
        self.subscribe(E::KIND, move |event| match E::from_result(event.result) {
            Some(value) => observer(value),
            None => error!("{} produced a result of the wrong shape", E::KIND),
        })
    }

    /// Remove the listeners added by `subscription`.
    ///
    /// Returns false if the subscription was already removed; that is not
    /// an error.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let registration = self.lock_registrations().remove(&subscription.id);
        match registration {
            Some(registration) => {
                self.release(registration);
                debug!("unsubscribed subscription {}", subscription.id);
                true
            }
            None => false,
        }
    }

    /// Remove every subscription this bridge made for `kind`.
    ///
    /// Returns the number of subscriptions removed.
    pub fn unsubscribe_kind(&self, kind: EventKind) -> usize {
        let removed: Vec<Registration> = {
            let mut registrations = self.lock_registrations();
            let ids: Vec<u64> = registrations
                .iter()
                .filter(|(_, r)| r.kind == kind)
                .map(|(id, _)| *id)
                .collect();
            ids.iter()
                .filter_map(|id| registrations.remove(id))
                .collect()
        };
        let count = removed.len();
        for registration in removed {
            self.release(registration);
        }
        if count > 0 {
            info!("unsubscribed {count} subscription(s) for {kind}");
        }
        count
    }

    /// Remove every subscription this bridge made.
    pub fn clear(&self) {
        let drained: Vec<Registration> = self
            .lock_registrations()
            .drain()
            .map(|(_, r)| r)
            .collect();
        for registration in drained {
            self.release(registration);
        }
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.lock_registrations().len()
    }

    /// Forward every event of `kinds` to `stream`. An empty slice means all
    /// kinds.
    pub fn attach_stream(&self, stream: &EventStream, kinds: &[EventKind]) -> Vec<Subscription> {
        let all = EventKind::ALL;
        let kinds: &[EventKind] = if kinds.is_empty() { &all } else { kinds };
        kinds
            .iter()
            .map(|&kind| {
                let stream = stream.clone();
                self.subscribe(kind, move |event| stream.dispatch(event))
            })
            .collect()
    }

    /// Build an [`EventStream`] from the `[stream]` config section and
    /// attach it for the configured kinds.
    pub fn attach_configured_stream(&self, config: &StreamConfig) -> SbResult<EventStream> {
        let kinds = EventKind::parse_list(config.kinds.as_slice())?;
        let stream = EventStream::from_config(config)?;
        self.attach_stream(&stream, &kinds);
        Ok(stream)
    }

    fn release(&self, registration: Registration) {
        for (wire_name, listener_id) in registration.listeners {
            if !self.transport.off(wire_name, listener_id) {
                debug!("{listener_id} for {wire_name} was already gone");
            }
        }
    }

    fn lock_registrations(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Registration>> {
        self.registrations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport + ?Sized> Drop for DispatchBridge<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

fn make_listener<F>(kind: EventKind, wire_name: &'static str, observer: Arc<F>) -> Listener
where
    F: Fn(MappedEvent) + Send + Sync + 'static,
{
    Arc::new(move |payload: &[PayloadValue]| -> Result<(), DecodeError> {
        let result = kind.decode(payload).map_err(|e| {
            warn!("dropping {wire_name} event: {e}");
            e
        })?;
        debug!("dispatching {wire_name} as {kind}");
        observer(MappedEvent {
            kind,
            wire_name,
            result,
        });
        Ok(())
    })
}
