//! `#[serde(default, deserialize_with = "maybe::deserialize")]` for values that are nice to have:
//! anything the inner type doesn't accept becomes `None` instead of failing the whole document.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use tracing::trace;

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(T::deserialize(value)
        .inspect_err(|e| trace!("Discarding undecodable value: {e}"))
        .ok())
}
