//! JSON message codec

use crate::{BaseMessage, PairlinkError, Result, Serializer};

/// Encodes messages as JSON text
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, message: &BaseMessage) -> Result<String> {
        serde_json::to_string(message)
            .map_err(|err| PairlinkError::channel(format!("encode message {}: {err}", message.id)))
    }

    fn deserialize(&self, text: &str) -> Result<BaseMessage> {
        serde_json::from_str(text).map_err(|err| PairlinkError::decode(err.to_string()))
    }
}
