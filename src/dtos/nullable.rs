//! Campi annullabili nei body di update
//!
//! Un campo `Option<Option<T>>` distingue tre casi:
//! - assente dal JSON: `None`, la colonna resta com'è
//! - `null` esplicito: `Some(None)`, la colonna torna NULL
//! - valore: `Some(Some(v))`

use serde::{Deserialize, Deserializer};

/// Da usare con `#[serde(default, deserialize_with = "nullable")]`
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
