use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use blockrun::{
    config::Config,
    decode::Decoded,
    execution::{self, ExecutionParams, ResultType, NO_COLOR},
    process::{Captured, Interpreter},
    script::Value,
    Error,
};

// Tests that run the pipeline touch the process-wide NO_COLOR variable.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Returns canned output and records what it was asked to run.
struct FakeInterpreter {
    reply: std::result::Result<Captured, ()>,
    calls: Mutex<Vec<Call>>,
}

#[derive(Debug, Clone)]
struct Call {
    command: String,
    script_path: PathBuf,
    script: String,
    no_color: Option<String>,
}

impl FakeInterpreter {
    fn replying(text: &str, status: i32) -> Self {
        Self {
            reply: Ok(Captured {
                text: text.to_string(),
                status: Some(status),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Interpreter for FakeInterpreter {
    async fn run(&self, command_line: &str) -> blockrun::Result<Captured> {
        let (_, quoted) = command_line.rsplit_once(' ').unwrap();
        let script_path = PathBuf::from(quoted.trim_matches('\''));
        let script = std::fs::read_to_string(&script_path)?;
        self.calls.lock().unwrap().push(Call {
            command: command_line.to_string(),
            script_path,
            script,
            no_color: std::env::var(NO_COLOR).ok(),
        });
        match &self.reply {
            Ok(captured) => Ok(captured.clone()),
            Err(()) => Err(Error::Spawn {
                command: command_line.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such interpreter"),
            }),
        }
    }
}

fn config() -> Config {
    Config::from_file(Path::new("/nonexistent/blockrun/.blockrunrc"))
}

#[cfg(unix)]
#[tokio::test]
async fn test_value_block_round_trip() -> Result<()> {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let before = std::env::var_os(NO_COLOR);

    let params = ExecutionParams::from_json(
        r#"{"var": {"xs": [1, 2, 3]}, "allow": ["net", ["read", ["/tmp"]]]}"#,
    )?;
    let snippet = "import { double } from \"./double.ts\";\nxs.map(double)";
    let fake = FakeInterpreter::replying("[ 2, 4, 6 ]", 0);

    let run = execution::execute(&params, snippet, &config(), &fake).await?;

    assert!(run.success());
    assert_eq!(run.result, Decoded::Structured(Value::from(vec![2i64, 4, 6])));
    assert_eq!(run.output, "[ 2, 4, 6 ]");

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert!(call
        .command
        .starts_with("deno run --allow-net --allow-read=/tmp '"));
    assert!(call.command.ends_with(".ts'"));
    assert_eq!(call.script, run.script);
    assert!(call.script.starts_with(
        "import { double } from \"./double.ts\";\n\nlet xs = [1, 2, 3];\n"
    ));
    assert!(call.script.contains("return (xs.map(double));"));
    assert_eq!(call.no_color.as_deref(), Some("1"));

    // The temp script is gone and the environment is back as it was.
    assert!(!call.script_path.exists());
    assert_eq!(std::env::var_os(NO_COLOR), before);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_run_is_returned_as_text() -> Result<()> {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let params = ExecutionParams {
        result_type: ResultType::Output,
        ..Default::default()
    };
    let text = "error: Uncaught (in promise) ReferenceError: nope is not defined\n";
    let fake = FakeInterpreter::replying(text, 1);

    let run = execution::execute(&params, "console.log(nope)", &config(), &fake).await?;

    assert!(!run.success());
    assert_eq!(run.status, Some(1));
    assert_eq!(run.result, Decoded::Raw(text.to_string()));
    assert_eq!(fake.calls()[0].script, "\nconsole.log(nope)");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_environment_restored_when_interpreter_errors() -> Result<()> {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let before = std::env::var_os(NO_COLOR);

    let fake = FakeInterpreter::failing();
    let err = execution::execute(&ExecutionParams::default(), "1 + 1", &config(), &fake)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Spawn { .. }));
    assert_eq!(fake.calls()[0].no_color.as_deref(), Some("1"));
    assert_eq!(std::env::var_os(NO_COLOR), before);
    Ok(())
}

#[tokio::test]
async fn test_session_rejected_before_running() -> Result<()> {
    let params = ExecutionParams::from_json(r#"{"session": "main"}"#)?;
    let fake = FakeInterpreter::replying("unused", 0);

    let err = execution::execute(&params, "1", &config(), &fake)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SessionUnsupported(_)));
    assert!(fake.calls().is_empty());
    Ok(())
}

#[test]
fn test_expand_matches_declaration_scenario() -> Result<()> {
    let params = ExecutionParams::from_json(
        r#"{"var": {"x": [1, 2]}, "colname-names": {"x": ["a", "b"]}, "result-type": "output"}"#,
    )?;
    let script = execution::expand(&params, "console.log(x.a + x.b)", &config())?;
    assert_eq!(script, "\nlet x = { a: 1, b: 2 };\nconsole.log(x.a + x.b)");
    Ok(())
}
