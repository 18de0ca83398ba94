use base64::Engine;
use serde::{Deserialize, Serialize};

use super::error::StreamError;

// ════════════════════════════════════════════════════════════════
//  Payload
// ════════════════════════════════════════════════════════════════

/// Opaque binary payload of one stream record.
///
/// The producer, stream and transform layers carry it as-is; only the
/// endpoints interpret the bytes. On the JSON wire it travels as a
/// standard-alphabet base64 string, so arbitrary bytes survive transport
/// through text protocols unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    bytes: Vec<u8>,
}

impl Payload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Payload holding the UTF-8 bytes of `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { bytes: text.into().into_bytes() }
    }

    /// Payload holding the compact JSON encoding of `value`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, StreamError> {
        Ok(Self { bytes: serde_json::to_vec(value)? })
    }

    /// Decode a base64 string into a payload.
    pub fn from_base64(encoded: &str) -> Result<Self, StreamError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// View the payload as UTF-8 text. Fails on non-UTF-8 bytes.
    pub fn as_utf8(&self) -> Result<&str, StreamError> {
        Ok(std::str::from_utf8(&self.bytes)?)
    }

    /// Parse the payload as a JSON value. Fails on non-UTF-8 or non-JSON.
    pub fn as_json(&self) -> Result<serde_json::Value, StreamError> {
        let text = std::str::from_utf8(&self.bytes)?;
        Ok(serde_json::from_str(text)?)
    }

    /// Base64 form, as it appears on the wire.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Serialize for Payload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Payload::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}
