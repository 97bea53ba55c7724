// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles namespaces, resource name lists, placeholders, and manifest defaulting.

use nonempty::NonEmpty;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::DEFAULT_MANIFEST;
use crate::types::{Namespace, ResourceName};

pub fn deserialize_namespace<'de, D>(deserializer: D) -> Result<Namespace, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Namespace::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<ResourceName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Option<Vec<String>> = Option::deserialize(deserializer)?;
    values
        .unwrap_or_default()
        .iter()
        .map(|s| {
            ResourceName::new(s)
                .map_err(|e| serde::de::Error::custom(format!("'{s}': {e}")))
        })
        .collect()
}

/// An empty list falls back to the conventional single manifest.
pub fn deserialize_manifests<'de, D>(deserializer: D) -> Result<NonEmpty<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Option<Vec<PathBuf>> = Option::deserialize(deserializer)?;
    Ok(values
        .and_then(NonEmpty::from_vec)
        .unwrap_or_else(|| NonEmpty::new(PathBuf::from(DEFAULT_MANIFEST))))
}

/// Placeholder values may be any YAML scalar; they are substituted as text.
pub fn deserialize_placeholders<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    values
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                _ => {
                    return Err(serde::de::Error::custom(format!(
                        "placeholder '{name}' must be a string, number or boolean"
                    )));
                }
            };
            Ok((name, text))
        })
        .collect()
}
