use serde::{Deserialize, Deserializer};

/// Distingue campo ausente (`None`) de campo enviado como `null` (`Some(None)`)
/// em atualizações parciais. Use com `#[serde(default, deserialize_with = ...)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
