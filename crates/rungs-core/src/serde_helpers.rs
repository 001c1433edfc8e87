//! Shared serde helper functions used by the configuration types.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Accept a port written either as a number (`5432`) or a string (`"5432"`).
///
/// An empty string is treated as unset.
pub fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        Text(String),
    }

    match Option::<PortValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortValue::Number(port)) => Ok(Some(port)),
        Some(PortValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(PortValue::Text(text)) => text
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid port '{text}'"))),
    }
}
