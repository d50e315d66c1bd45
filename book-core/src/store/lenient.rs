//! Sequence decoding that tolerates individual bad records.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::ops::Deref;
use tracing::warn;

/// A `Vec<T>` that serializes as a plain JSON array and, when decoding, skips
/// elements that do not decode as `T` instead of rejecting the whole array.
#[derive(Debug, Clone, PartialEq)]
pub struct LenientVec<T>(pub Vec<T>);

impl<T> LenientVec<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for LenientVec<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for LenientVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> Deref for LenientVec<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Serialize> Serialize for LenientVec<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for LenientVec<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<Value>::deserialize(deserializer)?;
        let total = raw.len();

        let items: Vec<T> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable record");
                    None
                }
            })
            .collect();

        if items.len() < total {
            warn!(kept = items.len(), total, "Some stored records were skipped");
        }

        Ok(Self(items))
    }
}
