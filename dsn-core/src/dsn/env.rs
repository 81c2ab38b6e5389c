//! Environment variable sources and `.env` file loading.
//!
//! The process environment is global, unsynchronized state. Loading files
//! with [`init_env_from`] writes to it and must not race with other threads
//! reading or writing the environment.

use super::{DataSource, DsnError, DsnResult, parse};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File loaded by [`init_env`] and by [`init_env_from`] when no path is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Source for environment variables.
pub trait EnvSource: Send + Sync {
    /// Get an environment variable value.
    fn get(&self, name: &str) -> Option<String>;
}

/// Process environment via `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment source backed by a HashMap.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create a new map-based environment source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Read a data source from a process environment variable.
///
/// See [`unmarshal_from`].
pub fn unmarshal(key: &str, defaults: &[&str]) -> Option<DataSource> {
    unmarshal_from(&StdEnvSource, key, defaults)
}

/// Read a data source from the variable `key` of `source`.
///
/// When the variable is unset, `defaults` joined with `;` are used instead.
/// Returns `None` if the resulting value is blank or is not a valid DSN;
/// a malformed value is indistinguishable from a missing one.
///
/// ```rust
/// use dsn_core::dsn::{MapEnvSource, unmarshal_from};
///
/// let env = MapEnvSource::new().set("BROKEN", "p://h/d?a=%zz");
/// assert!(unmarshal_from(&env, "BROKEN", &[]).is_none());
///
/// let ds = unmarshal_from(&env, "MISSING", &["mysql://localhost/app"]).unwrap();
/// assert_eq!(ds.database(), "app");
/// ```
pub fn unmarshal_from<S>(source: &S, key: &str, defaults: &[&str]) -> Option<DataSource>
where
    S: EnvSource + ?Sized,
{
    let raw = source.get(key).unwrap_or_else(|| defaults.join(";"));
    let raw = raw.trim();
    if raw.is_empty() {
        debug!(key, "No data source configured");
        return None;
    }

    match parse(raw) {
        Ok(ds) => Some(ds),
        Err(_) => {
            debug!(key, "Ignoring malformed data source");
            None
        }
    }
}

/// Parse `KEY=value` lines.
///
/// Each line is split on its first `=`. Lines without `=`, or with nothing
/// before or after it, are skipped. Keys are upper-cased and trimmed, values
/// trimmed. A repeated key keeps its last value.
pub fn parse_env_lines<R: BufRead>(reader: R) -> io::Result<BTreeMap<String, String>> {
    let mut vars = BTreeMap::new();
    for line in reader.lines() {
        let line = line?;
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.is_empty() || value.is_empty() {
            continue;
        }
        vars.insert(key.to_uppercase().trim().to_string(), value.trim().to_string());
    }
    Ok(vars)
}

/// Read the variables of a `.env`-style file.
pub fn read_env_file(path: impl AsRef<Path>) -> DsnResult<BTreeMap<String, String>> {
    let path = path.as_ref();
    let file_access = |source| DsnError::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(file_access)?;
    parse_env_lines(BufReader::new(file)).map_err(file_access)
}

/// Load [`DEFAULT_ENV_FILE`] into the process environment, if it exists.
pub fn init_env() -> DsnResult<()> {
    init_env_from([DEFAULT_ENV_FILE])
}

/// Load `.env`-style files into the process environment.
///
/// With no paths, [`DEFAULT_ENV_FILE`] is loaded. Empty paths, missing files
/// and directories are skipped. The first read or set failure aborts the
/// remaining files.
pub fn init_env_from<I, P>(paths: I) -> DsnResult<()>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut paths: Vec<PathBuf> = paths
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .collect();
    if paths.is_empty() {
        paths.push(PathBuf::from(DEFAULT_ENV_FILE));
    }

    for path in &paths {
        if path.as_os_str().is_empty() {
            continue;
        }

        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => {
                debug!(path = %path.display(), "Skipping directory");
                continue;
            }
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Skipping missing env file");
                continue;
            }
            Err(source) => {
                return Err(DsnError::FileAccess {
                    path: path.clone(),
                    source,
                });
            }
        }

        let vars = read_env_file(path)?;
        for (key, value) in &vars {
            set_env(key, value)?;
        }
        info!(path = %path.display(), count = vars.len(), "Environment file loaded");
    }

    Ok(())
}

fn set_env(key: &str, value: &str) -> DsnResult<()> {
    let reason = if key.is_empty() {
        Some("empty key")
    } else if key.contains('=') {
        Some("key contains '='")
    } else if key.contains('\0') {
        Some("key contains a NUL byte")
    } else if value.contains('\0') {
        Some("value contains a NUL byte")
    } else {
        None
    };
    if let Some(reason) = reason {
        return Err(DsnError::EnvSet {
            key: key.to_string(),
            reason: reason.to_string(),
        });
    }

    // SAFETY: the process environment is not synchronized; callers of
    // `init_env_from` are documented to serialize environment access.
    unsafe {
        std::env::set_var(key, value);
    }
    Ok(())
}
