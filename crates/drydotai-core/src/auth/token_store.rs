use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ENV_TOKEN_KEY;

/// Env file the token is persisted to, relative to the working directory
pub const DEFAULT_TOKEN_FILE: &str = ".env";

#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("Failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to save token to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Bearer token persistence.
///
/// Reads check the environment variable first and fall back to a
/// `KEY=value` line in the env file. Writes update the file in place
/// (keeping unrelated lines) and the process environment.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
    env_key: String,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE, ENV_TOKEN_KEY)
    }
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>, env_key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            env_key: env_key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn env_key(&self) -> &str {
        &self.env_key
    }

    /// Current token: environment first, then the env file
    pub fn get(&self) -> Option<String> {
        std::env::var(&self.env_key)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.read_file())
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Token from the env file only. Unreadable files count as no token.
    pub fn read_file(&self) -> Option<String> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Token file not readable");
                return None;
            }
        };

        let prefix = self.assignment_prefix();
        contents
            .lines()
            .find_map(|line| line.trim().strip_prefix(&prefix).map(str::to_string))
            .filter(|token| !token.is_empty())
    }

    /// Persist a token to the env file and the process environment.
    ///
    /// The first active or commented-out assignment is replaced in place
    /// and any further ones are dropped, so the file ends up with exactly
    /// one active line. With no existing assignment the line is appended.
    pub fn set(&self, token: &str) -> Result<(), TokenStoreError> {
        let existing = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(TokenStoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let assignment = format!("{}{}\n", self.assignment_prefix(), token);
        let mut output = String::with_capacity(existing.len() + assignment.len());
        let mut replaced = false;

        for line in existing.split_inclusive('\n') {
            if self.is_assignment(line) {
                if !replaced {
                    output.push_str(&assignment);
                    replaced = true;
                }
            } else {
                output.push_str(line);
                if !line.ends_with('\n') {
                    output.push('\n');
                }
            }
        }
        if !replaced {
            output.push_str(&assignment);
        }

        std::fs::write(&self.path, output).map_err(|source| TokenStoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        std::env::set_var(&self.env_key, token);
        info!(path = %self.path.display(), "Token stored");
        Ok(())
    }

    /// Remove the token from the process environment and the env file.
    ///
    /// Best effort: file errors are logged, never returned. Returns the
    /// number of lines removed from the file.
    pub fn clear(&self) -> usize {
        std::env::remove_var(&self.env_key);

        if !self.path.exists() {
            return 0;
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read token file");
                return 0;
            }
        };

        let mut removed = 0;
        let kept: String = contents
            .split_inclusive('\n')
            .filter(|line| {
                let matches = self.is_assignment(line);
                if matches {
                    removed += 1;
                }
                !matches
            })
            .collect();

        if removed == 0 {
            return 0;
        }

        if let Err(e) = std::fs::write(&self.path, kept) {
            warn!(path = %self.path.display(), error = %e, "Could not clear token from file");
            return 0;
        }

        info!(path = %self.path.display(), removed, "Token cleared");
        removed
    }

    fn assignment_prefix(&self) -> String {
        format!("{}=", self.env_key)
    }

    /// Active (`KEY=...`) or disabled (`# KEY=...`) assignment
    fn is_assignment(&self, line: &str) -> bool {
        let prefix = self.assignment_prefix();
        let line = line.trim();
        line.starts_with(&prefix) || line.starts_with(&format!("# {}", prefix))
    }
}
