use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use blockrun::{
    execution::{ExecutionParams, Permission, ResultType},
    script::VariablePrefix,
};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "blockrun", about = "Run an annotated TypeScript code block with Deno", version)]
pub struct Cli {
    /// Snippet file. Read from stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// JSON file with the parameter bag; other options are layered on top.
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    /// Bind a variable. VALUE is parsed as JSON, or taken as a string.
    #[arg(long = "var", value_name = "NAME=VALUE", action = clap::ArgAction::Append)]
    pub vars: Vec<String>,

    /// Grant a capability, optionally scoped: `net`, `read=/tmp,/var`.
    #[arg(long = "allow", value_name = "NAME[=V1,V2]", action = clap::ArgAction::Append)]
    pub allow: Vec<Permission>,

    /// Field names for a binding, which then renders as a record.
    #[arg(long = "colnames", value_name = "NAME=A,B", action = clap::ArgAction::Append)]
    pub colnames: Vec<String>,

    /// `value` prints the body's value; `output` runs it as-is.
    #[arg(long = "result-type", value_name = "value|output")]
    pub result_type: Option<ResultType>,

    /// Declaration keyword for bindings (const, let or var).
    #[arg(long)]
    pub prefix: Option<VariablePrefix>,

    /// Interpreter command, replacing the configured `deno run`.
    #[arg(long)]
    pub cmd: Option<String>,

    /// Code placed after the bindings, before the body.
    #[arg(long)]
    pub prologue: Option<String>,

    /// Code placed after the body.
    #[arg(long)]
    pub epilogue: Option<String>,

    /// Print the assembled script instead of running it.
    #[arg(long)]
    pub expand: bool,

    /// Print the captured interpreter text without decoding it.
    #[arg(long)]
    pub raw: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parameter bag from `--params`, overlaid with the other options.
    pub fn params(&self) -> Result<ExecutionParams> {
        let mut params = match &self.params {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading params file: {}", path.display()))?;
                ExecutionParams::from_json(&text)
                    .with_context(|| format!("parsing params file: {}", path.display()))?
            }
            None => ExecutionParams::default(),
        };

        if let Some(cmd) = &self.cmd {
            params.cmd = Some(cmd.clone());
        }
        if let Some(result_type) = self.result_type {
            params.result_type = result_type;
        }
        if let Some(prefix) = self.prefix {
            params.prefix = Some(prefix);
        }
        if let Some(prologue) = &self.prologue {
            params.prologue = Some(prologue.clone());
        }
        if let Some(epilogue) = &self.epilogue {
            params.epilogue = Some(epilogue.clone());
        }
        for var in &self.vars {
            let (name, value) = parse_var(var)?;
            params.var.insert(name, value);
        }
        params.allow.extend(self.allow.iter().cloned());
        for spec in &self.colnames {
            let (name, fields) = spec
                .split_once('=')
                .ok_or_else(|| anyhow!("--colnames expects NAME=A,B, got `{}`", spec))?;
            params.colname_names.insert(
                name.trim().to_string(),
                fields.split(',').map(|f| f.trim().to_string()).collect(),
            );
        }
        Ok(params)
    }
}

fn parse_var(spec: &str) -> Result<(String, serde_json::Value)> {
    let (name, raw) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("--var expects NAME=VALUE, got `{}`", spec))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("--var is missing a name in `{}`", spec));
    }
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}
