//! Capability list to `--allow-*` flag conversion.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// One granted capability, optionally narrowed to a list of scopes.
///
/// Deserializes from `"net"` or `["read", ["/tmp", "/var"]]`. Names are
/// not checked here; unknown capabilities are the interpreter's to reject.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Permission {
    Bare(String),
    Scoped(String, #[serde(deserialize_with = "stringified")] Vec<String>),
}

fn stringified<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

impl Permission {
    pub fn flag(&self) -> String {
        match self {
            Permission::Bare(name) => format!("--allow-{name}"),
            Permission::Scoped(name, values) => format!("--allow-{name}={}", values.join(",")),
        }
    }
}

/// Flags for every entry, in order, separated by single spaces.
pub fn format_flags(permissions: &[Permission]) -> String {
    permissions
        .iter()
        .map(Permission::flag)
        .collect::<Vec<_>>()
        .join(" ")
}

impl FromStr for Permission {
    type Err = String;

    /// `net` or `read=/tmp,/var`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('=') {
            Some(("", _)) => Err(format!("missing capability name in `{s}`")),
            Some((name, values)) => Ok(Permission::Scoped(
                name.to_string(),
                values
                    .split(',')
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            None if s.is_empty() => Err("empty capability".to_string()),
            None => Ok(Permission::Bare(s.to_string())),
        }
    }
}
