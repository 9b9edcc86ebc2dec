//! `#[serde(with = "millis")]` for durations, which travel as whole milliseconds. Integral floats
//! are read as well, as long as they are exact.

use std::fmt;

use chrono::Duration;
use serde::{
    de::{self, Unexpected, Visitor},
    Deserializer, Serializer,
};

// Larger floats can't be told apart from their neighbours anymore.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.;

struct MillisVisitor;

impl Visitor<'_> for MillisVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("integer milliseconds")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Duration::try_milliseconds(v).ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .ok()
            .and_then(Duration::try_milliseconds)
            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.fract() == 0. && v.abs() <= MAX_SAFE_INTEGER {
            self.visit_i64(v as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }
}

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(duration.num_milliseconds())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(MillisVisitor)
}
