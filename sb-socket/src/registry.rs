//! The static event registry.
//!
//! One row per [`EventKind`], in declaration order: the wire names that
//! trigger the kind and the decoder applied to their payloads.

use crate::events::{wire, EventKind, MappedResult};
use crate::mapper::{
    decode_error, decode_message, decode_reconnect_attempt, decode_unit, DecodeError, Decoder,
};
use crate::payload::PayloadValue;

struct RegistryEntry {
    kind: EventKind,
    wire_names: &'static [&'static str],
    decoder: Decoder,
}

/// Indexed by `EventKind as usize`.
static REGISTRY: [RegistryEntry; 9] = [
    RegistryEntry {
        kind: EventKind::Connect,
        wire_names: &[wire::CONNECT],
        decoder: decode_unit,
    },
    RegistryEntry {
        kind: EventKind::Connecting,
        wire_names: &[wire::CONNECTING],
        decoder: decode_unit,
    },
    RegistryEntry {
        kind: EventKind::Disconnect,
        wire_names: &[wire::DISCONNECT],
        decoder: decode_unit,
    },
    RegistryEntry {
        kind: EventKind::Error,
        wire_names: &[wire::ERROR, wire::CONNECT_ERROR, wire::RECONNECT_ERROR],
        decoder: decode_error,
    },
    RegistryEntry {
        kind: EventKind::Message,
        wire_names: &[wire::MESSAGE],
        decoder: decode_message,
    },
    RegistryEntry {
        kind: EventKind::Reconnect,
        wire_names: &[wire::RECONNECT],
        decoder: decode_unit,
    },
    RegistryEntry {
        kind: EventKind::ReconnectAttempt,
        wire_names: &[wire::RECONNECT_ATTEMPT],
        decoder: decode_reconnect_attempt,
    },
    RegistryEntry {
        kind: EventKind::Ping,
        wire_names: &[wire::PING],
        decoder: decode_unit,
    },
    RegistryEntry {
        kind: EventKind::Pong,
        wire_names: &[wire::PONG],
        decoder: decode_unit,
    },
];

impl EventKind {
    fn entry(self) -> &'static RegistryEntry {
        &REGISTRY[self as usize]
    }

    /// The wire names that trigger this kind. Never empty; order is fixed.
    pub fn wire_names(self) -> &'static [&'static str] {
        self.entry().wire_names
    }

    /// Decode a raw payload into this kind's result.
    pub fn decode(self, payload: &[PayloadValue]) -> Result<MappedResult, DecodeError> {
        (self.entry().decoder)(payload)
    }

    /// Reverse lookup from a wire name.
    pub fn from_wire_name(name: &str) -> Option<EventKind> {
        REGISTRY
            .iter()
            .find(|entry| entry.wire_names.contains(&name))
            .map(|entry| entry.kind)
    }

    /// Every wire name in the registry, in table order.
    pub fn all_wire_names() -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().flat_map(|entry| entry.wire_names.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_kinds() {
        for (index, kind) in EventKind::ALL.into_iter().enumerate() {
            assert_eq!(REGISTRY[index].kind, kind);
            assert_eq!(kind as usize, index);
        }
    }

    #[test]
    fn test_wire_names_table() {
        let expected: [(EventKind, &[&str]); 9] = [
            (EventKind::Connect, &["connect"]),
            (EventKind::Connecting, &["connecting"]),
            (EventKind::Disconnect, &["disconnect"]),
            (EventKind::Error, &["error", "connect_error", "reconnect_error"]),
            (EventKind::Message, &["message"]),
            (EventKind::Reconnect, &["reconnect"]),
            (EventKind::ReconnectAttempt, &["reconnect_attempt"]),
            (EventKind::Ping, &["ping"]),
            (EventKind::Pong, &["pong"]),
        ];
        for (kind, names) in expected {
            assert_eq!(kind.wire_names(), names, "{kind}");
            assert!(!kind.wire_names().is_empty());
        }
    }

    #[test]
    fn test_from_wire_name() {
        assert_eq!(EventKind::from_wire_name("connect"), Some(EventKind::Connect));
        assert_eq!(EventKind::from_wire_name("connect_error"), Some(EventKind::Error));
        assert_eq!(EventKind::from_wire_name("reconnect_error"), Some(EventKind::Error));
        assert_eq!(
            EventKind::from_wire_name("reconnect_attempt"),
            Some(EventKind::ReconnectAttempt)
        );
        assert_eq!(EventKind::from_wire_name("new-message"), None);
    }

    #[test]
    fn test_every_wire_name_maps_back() {
        let names: Vec<_> = EventKind::all_wire_names().collect();
        assert_eq!(names.len(), 11);
        for kind in EventKind::ALL {
            for name in kind.wire_names() {
                assert_eq!(EventKind::from_wire_name(name), Some(kind));
            }
        }
    }

    #[test]
    fn test_unit_kinds_ignore_payload() {
        let noisy = [PayloadValue::from("junk"), PayloadValue::Int(9)];
        for kind in EventKind::ALL.into_iter().filter(EventKind::is_unit) {
            assert_eq!(kind.decode(&noisy).unwrap(), MappedResult::Unit, "{kind}");
            assert_eq!(kind.decode(&[]).unwrap(), MappedResult::Unit, "{kind}");
        }
    }

    #[test]
    fn test_decode_via_kind() {
        let payload = [PayloadValue::Int(3)];
        assert_eq!(
            EventKind::ReconnectAttempt.decode(&payload).unwrap(),
            MappedResult::ReconnectAttempt(3)
        );
        assert_eq!(EventKind::Pong.decode(&payload).unwrap(), MappedResult::Unit);
        assert!(EventKind::ReconnectAttempt.decode(&[]).is_err());
    }
}
