//! The per-block parameter bag.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::permissions::Permission;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::script::{Binding, Value, VariablePrefix};

/// How the snippet's result is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Capture the value of the body and print it.
    #[default]
    Value,
    /// Run the body as-is and take whatever it prints.
    Output,
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResultType::Value => "value",
            ResultType::Output => "output",
        })
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "value" => Ok(ResultType::Value),
            "output" => Ok(ResultType::Output),
            other => Err(format!("expected value or output, got `{other}`")),
        }
    }
}

/// Execution options for one code block.
///
/// Keys follow the block header names (`result-type`, `colname-names`, ...).
/// Unknown keys are ignored so a full header bag can be passed through.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExecutionParams {
    pub cmd: Option<String>,
    pub result_type: ResultType,
    /// Bindings in declaration order.
    pub var: serde_json::Map<String, serde_json::Value>,
    pub allow: Vec<Permission>,
    /// Field names per binding; a binding listed here renders as a record.
    pub colname_names: HashMap<String, Vec<String>>,
    pub prefix: Option<VariablePrefix>,
    pub prologue: Option<String>,
    pub epilogue: Option<String>,
    pub session: Option<String>,
}

impl ExecutionParams {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::invalid("params", e.to_string()))
    }

    /// Reject options this tool cannot honour.
    pub fn validate(&self) -> Result<()> {
        match self.session.as_deref().map(str::trim) {
            None | Some("") | Some("none") => Ok(()),
            Some(other) => Err(Error::SessionUnsupported(other.to_string())),
        }
    }

    /// Bindings with their array-or-record shape fixed.
    pub fn bindings(&self) -> Vec<Binding> {
        self.var
            .iter()
            .map(|(name, json)| {
                let fields = self
                    .colname_names
                    .get(name)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                Binding::new(name.clone(), Value::from(json.clone()), fields)
            })
            .collect()
    }

    pub fn prefix(&self, config: &Config) -> Result<VariablePrefix> {
        match self.prefix {
            Some(prefix) => Ok(prefix),
            None => config.variable_prefix(),
        }
    }

    pub fn command(&self, config: &Config) -> String {
        self.cmd
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| config.command())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_from_json_full_bag() {
        let params = ExecutionParams::from_json(
            r#"{
                "cmd": "deno run --quiet",
                "result-type": "output",
                "var": {"rows": [[1, 2], [3, 4]], "name": "deno"},
                "allow": ["net", ["read", ["/tmp"]]],
                "colname-names": {"rows": ["left", "right"]},
                "prefix": "const",
                "exports": "both"
            }"#,
        )
        .unwrap();
        assert_eq!(params.cmd.as_deref(), Some("deno run --quiet"));
        assert_eq!(params.result_type, ResultType::Output);
        assert_eq!(params.prefix, Some(VariablePrefix::Const));
        assert_eq!(params.allow.len(), 2);

        let decls: Vec<String> = params
            .bindings()
            .iter()
            .map(|b| b.declaration(VariablePrefix::Const))
            .collect();
        assert_eq!(
            decls,
            vec![
                "const rows = { left: [1, 2], right: [3, 4] };".to_string(),
                "const name = \"deno\";".to_string(),
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let params = ExecutionParams::from_json("{}").unwrap();
        assert_eq!(params.result_type, ResultType::Value);
        assert!(params.var.is_empty());
        let cfg = Config::from_file(Path::new("/nonexistent/.blockrunrc"));
        assert_eq!(params.command(&cfg), "deno run");
        assert_eq!(params.prefix(&cfg).unwrap(), VariablePrefix::Let);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(ExecutionParams::from_json(r#"{"result-type": "table"}"#).is_err());
        assert!(ExecutionParams::from_json(r#"{"prefix": "val"}"#).is_err());
        assert!(ExecutionParams::from_json(r#"{"var": [1, 2]}"#).is_err());
    }

    #[test]
    fn test_sessions_rejected() {
        let mut params = ExecutionParams::default();
        assert!(params.validate().is_ok());
        params.session = Some("none".into());
        assert!(params.validate().is_ok());
        params.session = Some("main".into());
        assert!(matches!(params.validate(), Err(Error::SessionUnsupported(s)) if s == "main"));
    }
}
