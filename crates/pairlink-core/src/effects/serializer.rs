//! Message codec capability

use crate::{BaseMessage, Result};

/// Converts structured messages to and from their text wire form
pub trait Serializer: Send + Sync {
    /// Encode a message
    fn serialize(&self, message: &BaseMessage) -> Result<String>;

    /// Decode a message, failing with `PairlinkError::Decode` on malformed input
    fn deserialize(&self, text: &str) -> Result<BaseMessage>;
}
