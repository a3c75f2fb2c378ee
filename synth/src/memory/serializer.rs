//! Serializer for checkpoint state (state <-> bytes), used by persistent checkpointers.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::memory::checkpointer::CheckpointError;

/// Serializes and deserializes state for checkpoint storage.
///
/// `MemorySaver` keeps `Checkpoint<S>` as-is and does not use one.
pub trait Serializer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    fn serialize(&self, state: &S) -> Result<Vec<u8>, CheckpointError>;

    fn deserialize(&self, data: &[u8]) -> Result<S, CheckpointError>;
}

/// JSON serializer for any serde state type.
pub struct JsonSerializer<S> {
    _marker: PhantomData<fn() -> S>,
}

impl<S> JsonSerializer<S> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<S> Default for JsonSerializer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Serializer<S> for JsonSerializer<S>
where
    S: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    fn serialize(&self, state: &S) -> Result<Vec<u8>, CheckpointError> {
        serde_json::to_vec(state).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }

    fn deserialize(&self, data: &[u8]) -> Result<S, CheckpointError> {
        serde_json::from_slice(data).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_garbage_is_serialization_error() {
        let s = JsonSerializer::<Vec<String>>::new();
        let err = s.deserialize(b"not json").unwrap_err();
        assert!(matches!(err, CheckpointError::Serialization(_)));
    }

    #[test]
    fn serialize_writes_json() {
        let s = JsonSerializer::<Vec<String>>::new();
        let bytes = s.serialize(&vec!["a".to_string()]).unwrap();
        assert_eq!(bytes, br#"["a"]"#);
    }
}
