use std::{fmt::Display, str::FromStr, sync::Arc};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of freshly generated ids. Parsed ids may be longer.
pub const ID_LENGTH: usize = 21;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Expected nanoid string, but received \"{0}\"")]
pub struct InvalidId(pub String);

/// Random unique token identifying projects and todos. Made of at least [ID_LENGTH] characters
/// from the URL-safe alphabet `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Id(Arc<str>);

impl Id {
    pub fn generate(rng: &mut impl Rng) -> Self {
        let id = (0..ID_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect::<String>();
        Self(id.into())
    }

    pub fn parse(value: &str) -> Result<Self, InvalidId> {
        if value.len() >= ID_LENGTH && value.bytes().all(|b| ALPHABET.contains(&b)) {
            Ok(Self(value.into()))
        } else {
            Err(InvalidId(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Id {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::parse(s)
    }
}

impl TryFrom<String> for Id {
    type Error = InvalidId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Id::parse(&value)
    }
}

impl From<Id> for String {
    fn from(value: Id) -> Self {
        value.0.to_string()
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
