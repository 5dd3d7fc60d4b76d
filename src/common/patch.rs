// src/common/patch.rs

use serde::{Deserialize, Deserializer};

/// Usado com `#[serde(default, deserialize_with = "present")]` em campos
/// `Option<Option<T>>`: campo ausente fica `None`, `null` explícito fica
/// `Some(None)` e um valor fica `Some(Some(v))`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
