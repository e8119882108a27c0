//! Marker types that tie each event kind to its result type.
//!
//! Used with [`DispatchBridge::on`](crate::bridge::DispatchBridge::on) to
//! register observers that receive the decoded value directly:
//! `bridge.on::<typed::Error, _>(|err: SocketError| ...)`.

use crate::events::{EventKind, MappedResult};
use crate::payload::{PayloadValue, SocketError};

/// An event kind with a statically known result type.
pub trait TypedEvent: 'static {
    const KIND: EventKind;
    type Output: Send + 'static;

    /// Extract the typed value from a result decoded for [`Self::KIND`].
    fn from_result(result: MappedResult) -> Option<Self::Output>;
}

macro_rules! unit_events {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("The `", stringify!($name), "` event; carries no data.")]
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl TypedEvent for $name {
                const KIND: EventKind = EventKind::$name;
                type Output = ();

                fn from_result(result: MappedResult) -> Option<()> {
                    result.is_unit().then_some(())
                }
            }
        )*
    };
}

unit_events!(Connect, Connecting, Disconnect, Reconnect, Ping, Pong);

/// Error-ish events from any of the error wire names.
#[derive(Debug, Clone, Copy)]
pub struct Error;

impl TypedEvent for Error {
    const KIND: EventKind = EventKind::Error;
    type Output = SocketError;

    fn from_result(result: MappedResult) -> Option<SocketError> {
        match result {
            MappedResult::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Raw `message` events; the payload is handed over untouched.
#[derive(Debug, Clone, Copy)]
pub struct Message;

impl TypedEvent for Message {
    const KIND: EventKind = EventKind::Message;
    type Output = Vec<PayloadValue>;

    fn from_result(result: MappedResult) -> Option<Vec<PayloadValue>> {
        match result {
            MappedResult::Message(values) => Some(values),
            _ => None,
        }
    }
}

/// Reconnection attempt counter.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectAttempt;

impl TypedEvent for ReconnectAttempt {
    const KIND: EventKind = EventKind::ReconnectAttempt;
    type Output = i32;

    fn from_result(result: MappedResult) -> Option<i32> {
        match result {
            MappedResult::ReconnectAttempt(n) => Some(n),
            _ => None,
        }
    }
}
