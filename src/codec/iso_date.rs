//! `#[serde(with = "iso_date")]` for moments.
//!
//! Reads RFC 3339 timestamps, offset-less timestamps (as UTC) and plain `YYYY-MM-DD` dates
//! (midnight UTC). Years outside `0..=9999` carry a sign, e.g. `+10000-01-01T00:00:00.000Z`.
//! Always writes `1981-10-12T00:00:00.000Z`. Read moments are cut to milliseconds.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{
    de::{self, Unexpected, Visitor},
    Deserializer, Serializer,
};

use crate::utils::time::{to_iso_string, to_millis};

pub const EXPECTED: &str = "ISO date string";

pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    let date = if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        date.with_timezone(&Utc)
    } else if let Ok(date) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ") {
        date.and_utc()
    } else if let Ok(date) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        date.and_utc()
    } else {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()?
            .and_time(NaiveTime::MIN)
            .and_utc()
    };
    Some(to_millis(date))
}

struct IsoDateVisitor;

impl Visitor<'_> for IsoDateVisitor {
    type Value = DateTime<Utc>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(EXPECTED)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}

pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_iso_string(*date))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(IsoDateVisitor)
}

/// Nullable moments: a missing key (with `#[serde(default)]`) or `null` is `None`, anything
/// else must be a valid date.
pub mod option {
    use std::fmt;

    use chrono::{DateTime, Utc};
    use serde::{
        de::{self, Visitor},
        Deserializer, Serializer,
    };

    struct OptionVisitor;

    impl<'de> Visitor<'de> for OptionVisitor {
        type Value = Option<DateTime<Utc>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "{} or null", super::EXPECTED)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            super::deserialize(deserializer).map(Some)
        }
    }

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => super::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionVisitor)
    }
}
