//! Record identifiers of the form `{EntityType}:{key}`.
//!
//! The entity type prefix lets the store and the scheduler cheaply verify that a record
//! fetched by id is of the expected type.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::store::InvalidRecordId;

/// Length of the random key suffix.
const KEY_LENGTH: usize = 22;

/// Globally unique record identifier namespaced by entity type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    table: String,
    key: String,
}

impl RecordId {
    /// Generates a fresh identifier for a record in `table`.
    ///
    /// The key is a random 22-character alphanumeric string, long enough that collisions
    /// within a single community's data set are not a practical concern.
    pub fn generate(table: &str) -> Self {
        Self {
            table: table.to_string(),
            key: Self::random_key(),
        }
    }

    /// Entity type name this id belongs to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Opaque unique suffix.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true if this id belongs to the given entity type.
    pub fn is_of(&self, table: &str) -> bool {
        self.table == table
    }

    fn random_key() -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                 abcdefghijklmnopqrstuvwxyz\
                                 0123456789";

        let mut rng = rand::rng();

        (0..KEY_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table, self.key)
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((table, key)) = s.split_once(':') else {
            return Err(InvalidRecordId(s.to_string()));
        };

        let valid_table = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid_table || key.is_empty() {
            return Err(InvalidRecordId(s.to_string()));
        }

        Ok(Self {
            table: table.to_string(),
            key: key.to_string(),
        })
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
