//! Live update messages pushed by the server over `/socket`.
//!
//! Every message is a JSON object `{"Type": ..., "Data": ...}`. The server
//! sends `register` with the full system list right after a client connects
//! and `update` with a single system whenever one publishes new data.

use crate::error::Result;
use crate::models::GardenSystem;
use crate::registry::{RegistryChange, SystemRegistry};
use serde::{Deserialize, Serialize};

pub const REGISTER_MESSAGE: &str = "register";
pub const UPDATE_MESSAGE: &str = "update";

/// Message envelope as it appears on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProtocolMessage<T> {
    #[serde(rename = "Type")]
    pub message_type: String,
    #[serde(rename = "Data")]
    pub data: T,
}

impl<T: Serialize> ProtocolMessage<T> {
    pub fn new(message_type: impl Into<String>, data: T) -> Self {
        Self {
            message_type: message_type.into(),
            data,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Into::into)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Full snapshot of every known system.
    Register(Vec<GardenSystem>),
    /// One system's state as of now.
    Update(GardenSystem),
    /// A message type this client does not handle.
    Unknown(String),
}

impl ServerEvent {
    pub fn parse(text: &str) -> Result<Self> {
        let msg: ProtocolMessage<serde_json::Value> = serde_json::from_str(text)?;

        let event = match msg.message_type.as_str() {
            REGISTER_MESSAGE => {
                let systems: Option<Vec<GardenSystem>> = serde_json::from_value(msg.data)?;
                ServerEvent::Register(systems.unwrap_or_default())
            },
            UPDATE_MESSAGE => ServerEvent::Update(serde_json::from_value(msg.data)?),
            _ => ServerEvent::Unknown(msg.message_type),
        };

        Ok(event)
    }
}

/// Apply one event to the registry. Unknown events leave it untouched.
pub fn apply_event(registry: &mut SystemRegistry, event: ServerEvent) -> Option<RegistryChange> {
    match event {
        ServerEvent::Register(systems) => Some(registry.initialize(systems)),
        ServerEvent::Update(system) => Some(registry.apply_update(system)),
        ServerEvent::Unknown(message_type) => {
            tracing::debug!("Ignoring unknown server message: {}", message_type);
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_register() {
        let text = r#"{"Type":"register","Data":[{"Identifier":"d1","Readings":[]},{"Identifier":"d2"}]}"#;
        match ServerEvent::parse(text).unwrap() {
            ServerEvent::Register(systems) => {
                let ids: Vec<_> = systems.iter().map(|s| s.id.as_str()).collect();
                assert_eq!(ids, vec!["d1", "d2"]);
            },
            other => panic!("Expected register, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_register_with_no_systems() {
        // The server encodes an empty system list as null
        let event = ServerEvent::parse(r#"{"Type":"register","Data":null}"#).unwrap();
        assert_eq!(event, ServerEvent::Register(vec![]));
    }

    #[test]
    fn test_parse_update() {
        let text = r#"{"Type":"update","Data":{"Identifier":"d1","LastReading":{"CreatedAt":"2021-06-01T12:30:00Z","Temperature":21.5}}}"#;
        match ServerEvent::parse(text).unwrap() {
            ServerEvent::Update(system) => {
                assert_eq!(system.id, "d1");
                assert_eq!(system.last_reading.unwrap().temperature, Some(21.5));
            },
            other => panic!("Expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_type() {
        let event = ServerEvent::parse(r#"{"Type":"alert","Data":{}}"#).unwrap();
        assert_eq!(event, ServerEvent::Unknown("alert".to_string()));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(ServerEvent::parse("not json").is_err());
        assert!(ServerEvent::parse(r#"{"Type":"update","Data":[]}"#).is_err());
    }

    #[test]
    fn test_envelope_round_trip() {
        let msg = ProtocolMessage::new(UPDATE_MESSAGE, GardenSystem::new("d1"));
        let event = ServerEvent::parse(&msg.to_json().unwrap()).unwrap();
        assert_eq!(event, ServerEvent::Update(msg.data));
    }

    #[test]
    fn test_apply_events_in_arrival_order() {
        let mut registry = SystemRegistry::new();

        apply_event(
            &mut registry,
            ServerEvent::Register(vec![GardenSystem::new("d1")]),
        );
        apply_event(&mut registry, ServerEvent::Update(GardenSystem::new("d2")));
        let change = apply_event(&mut registry, ServerEvent::Unknown("alert".into()));

        assert!(change.is_none());
        let ids: Vec<_> = registry.systems().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
    }
}
