//! Code block execution: expand a snippet into a script, run it, decode the result.

use std::io::Write;
use std::path::Path;

use tempfile::Builder;

pub mod params;
pub mod permissions;

pub use params::{ExecutionParams, ResultType};
pub use permissions::{format_flags, Permission};

use crate::config::Config;
use crate::decode::{decode, Decoded};
use crate::error::Result;
use crate::process::{shell::quote_path, Interpreter, ScopedEnv};
use crate::script::{split, Script};

/// Colour escapes in interpreter output would end up in the result text.
pub const NO_COLOR: &str = "NO_COLOR";

#[derive(Debug, Clone)]
pub struct Execution {
    /// The script that was run.
    pub script: String,
    /// Full command line, script path included.
    pub command: String,
    /// Captured interpreter text before decoding.
    pub output: String,
    pub status: Option<i32>,
    pub result: Decoded,
}

impl Execution {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Assemble the script for `snippet` without running it.
pub fn expand(params: &ExecutionParams, snippet: &str, config: &Config) -> Result<String> {
    params.validate()?;
    let prefix = params.prefix(config)?;
    let parts = split(snippet)?;
    let declarations = params
        .bindings()
        .iter()
        .map(|b| b.declaration(prefix))
        .collect();

    Script {
        imports: &parts.imports,
        declarations,
        prologue: params.prologue.as_deref(),
        body: &parts.rest,
        epilogue: params.epilogue.as_deref(),
        wrap_value: params.result_type == ResultType::Value,
    }
    .render()
}

/// `<cmd> <flags> <script>`, with the flags omitted when nothing is allowed.
pub fn command_line(params: &ExecutionParams, config: &Config, script: &Path) -> String {
    let mut line = params.command(config);
    let flags = format_flags(&params.allow);
    if !flags.is_empty() {
        line.push(' ');
        line.push_str(&flags);
    }
    line.push(' ');
    line.push_str(&quote_path(script));
    line
}

/// Run `snippet` through `interpreter` and decode what it prints.
///
/// Interpreter failures are not errors: their text becomes the result and
/// the exit status is kept on the returned [`Execution`].
pub async fn execute<I: Interpreter>(
    params: &ExecutionParams,
    snippet: &str,
    config: &Config,
    interpreter: &I,
) -> Result<Execution> {
    let script = expand(params, snippet, config)?;
    tracing::debug!(script = %script, "assembled script");

    let mut file = Builder::new().prefix("blockrun-").suffix(".ts").tempfile()?;
    file.write_all(script.as_bytes())?;
    file.flush()?;
    let path = file.into_temp_path();

    let command = command_line(params, config, &path);
    tracing::debug!(command = %command, "running interpreter");

    let captured = {
        let _no_color = ScopedEnv::set(NO_COLOR, "1");
        interpreter.run(&command).await?
    };

    let result = decode(&captured.text);
    if !captured.success() {
        tracing::warn!(status = ?captured.status, "returning failed interpreter output as result");
    }
    Ok(Execution {
        script,
        command,
        output: captured.text,
        status: captured.status,
        result,
    })
}
