//! Interpreter process invocation.

use crate::error::Result;

pub mod env;
pub mod shell;

pub use env::ScopedEnv;
pub use shell::ShellInterpreter;

/// Text captured from one interpreter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Stdout, followed by stderr when there was any.
    pub text: String,
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Something that can run a full interpreter command line.
#[allow(async_fn_in_trait)]
pub trait Interpreter {
    async fn run(&self, command_line: &str) -> Result<Captured>;
}
