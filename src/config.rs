use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::CompileError;

pub const CONFIG_FILE: &str = "j2lua.toml";

/// Knobs that shape the generated Lua text. Never affects semantics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslateOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Emit `-- Generated by j2lua from <name>` as the first line.
    pub header: bool,
    /// For classes without `main`, end the chunk with a table of the public static methods.
    pub module_exports: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self { indent_width: 4, header: true, module_exports: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub translate: TranslateOptions,
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Config, CompileError> {
        toml::from_str(text).map_err(|e| CompileError::config(e.message().to_string(), path.to_path_buf()))
    }

    pub fn load(path: &Path) -> Result<Config, CompileError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompileError::config(format!("cannot read {}: {e}", path.display()), path.to_path_buf()))?;
        let config = Config::parse(&text, path)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Walks from `start_dir` upward looking for `j2lua.toml`, stopping at a
    /// directory containing `.git` or at the filesystem root. Defaults when
    /// nothing is found.
    pub fn discover(start_dir: &Path) -> Result<Config, CompileError> {
        match find_config(start_dir) {
            Some(path) => Config::load(&path),
            None => Ok(Config::default()),
        }
    }
}

fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.canonicalize().unwrap_or_else(|_| start_dir.to_path_buf());
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        // .git may be a file in worktrees
        if dir.join(".git").exists() {
            return None;
        }
        if !dir.pop() {
            return None;
        }
    }
}
