mod cli;
mod printer;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use blockrun::{config::Config, execution, process::ShellInterpreter};
use is_terminal::IsTerminal;
use printer::ResultPrinter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = cli::Cli::parse();
    let cfg = Config::load();
    let params = args.params()?;
    let snippet = read_snippet(args.file.as_deref())?;

    if args.expand {
        print!("{}", execution::expand(&params, &snippet, &cfg)?);
        io::stdout().flush()?;
        return Ok(());
    }

    let interpreter = ShellInterpreter::from_config(&cfg);
    let run = execution::execute(&params, &snippet, &cfg, &interpreter).await?;

    let printer = ResultPrinter::new(run.success(), io::stdout().is_terminal());
    if args.raw {
        printer.print_text(run.output.trim_end_matches('\n'));
    } else {
        printer.print(&run.result);
    }

    // Mirror the interpreter's exit status.
    if !run.success() {
        io::stdout().flush()?;
        std::process::exit(run.status.unwrap_or(1));
    }
    Ok(())
}

fn read_snippet(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("reading snippet: {}", path.display())),
        _ => {
            let stdin = io::stdin();
            if file.is_none() && stdin.is_terminal() {
                bail!("Provide a snippet file or pipe one on stdin");
            }
            let mut buf = String::new();
            stdin.lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
