//! Round-trips the model through its persisted JSON form.
//!
//! Two layers meet here:
//!  - [entities] are serde structs mirroring the wire shape. Deserializing one checks that every
//!    field is present and well formed, ids and dates included.
//!  - [Codec] converts between such an entity and the model type, deriving computed fields and
//!    rejecting what serde can't see, like an interval that ends before it starts.
//!
//! For every valid value `x`, `decode(&encode(&x)?) == x`. The reverse does not hold: unknown keys
//! are dropped and derived fields are recomputed.

pub mod entities;
pub mod error;
pub mod iso_date;
pub mod maybe;
pub mod millis;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub use error::DecodeError;

pub trait Codec: Sized {
    /// Wire shape of the value.
    type Entity: Serialize + DeserializeOwned;

    fn from_entity(entity: Self::Entity) -> Result<Self, DecodeError>;

    fn to_entity(&self) -> Self::Entity;

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let entity: Self::Entity = serde_path_to_error::deserialize(value)?;
        Self::from_entity(entity)
    }

    fn encode(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.to_entity())
    }
}

/// Converts a list of entities, reporting a failure at `key[index]`.
pub fn from_entities<T: Codec>(entities: Vec<T::Entity>, key: &str) -> Result<Vec<T>, DecodeError> {
    entities
        .into_iter()
        .enumerate()
        .map(|(index, entity)| T::from_entity(entity).map_err(|e| e.at_index(index).at_key(key)))
        .collect()
}
