use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

use crate::error::{Error, Result};
use crate::script::VariablePrefix;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    /// Defaults, then the rc file, then `BLOCKRUN_*` environment variables.
    pub fn load() -> Self {
        let mut cfg = Self::from_file(&default_config_path());

        for (k, v) in env::vars() {
            if is_config_key(&k) {
                cfg.inner.insert(k, v);
            }
        }
        cfg
    }

    /// Defaults overlaid with `KEY=VALUE` lines from `path`, if it exists.
    pub fn from_file(path: &Path) -> Self {
        let mut map = default_map();
        if let Ok(file) = fs::File::open(path) {
            let reader = BufReader::new(file);
            for line in reader.lines().map_while(|l| l.ok()) {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((k, v)) = line.split_once('=') {
                    map.insert(k.trim().to_string(), v.trim().to_string());
                }
            }
            tracing::debug!(path = %path.display(), "loaded config file");
        }
        Self { inner: map }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn binary(&self) -> String {
        self.get("BLOCKRUN_BINARY")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "deno".to_string())
    }

    /// Interpreter command used when a block does not set `cmd`.
    pub fn command(&self) -> String {
        self.get("BLOCKRUN_COMMAND")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("{} run", self.binary()))
    }

    pub fn variable_prefix(&self) -> Result<VariablePrefix> {
        match self.get("BLOCKRUN_VARIABLE_PREFIX") {
            Some(v) => v
                .parse()
                .map_err(|msg: String| Error::invalid("BLOCKRUN_VARIABLE_PREFIX", msg)),
            None => Ok(VariablePrefix::default()),
        }
    }

    /// `None` when unset or zero.
    pub fn timeout(&self) -> Option<Duration> {
        self.get_u64("BLOCKRUN_TIMEOUT")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("BLOCKRUN_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("blockrun").join(".blockrunrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("BLOCKRUN_BINARY".into(), "deno".into());
    m.insert("BLOCKRUN_VARIABLE_PREFIX".into(), "let".into());
    m.insert("BLOCKRUN_TIMEOUT".into(), "0".into());
    m
}
