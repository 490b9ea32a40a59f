//! Scoped overrides of process environment variables.

use std::env;
use std::ffi::{OsStr, OsString};

/// Sets an environment variable and restores the previous state on drop.
///
/// Restoration happens on every exit path of the owning scope, including
/// `?` returns and unwinding.
#[derive(Debug)]
#[must_use = "the override is undone as soon as the guard is dropped"]
pub struct ScopedEnv {
    key: OsString,
    previous: Option<OsString>,
}

impl ScopedEnv {
    pub fn set(key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        let key = key.as_ref().to_os_string();
        let previous = env::var_os(&key);
        env::set_var(&key, value);
        Self { key, previous }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => env::set_var(&self.key, value),
            None => env::remove_var(&self.key),
        }
    }
}
