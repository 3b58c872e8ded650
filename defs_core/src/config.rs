//! # Generator Configuration
//!
//! The generator takes no arguments; everything adjustable comes from the
//! environment. Values are layered, later sources winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file named by `QUESTDEFS_CONFIG`
//! 3. Individual `QUESTDEFS_*` variables
//!
//! Path-valued variables are taken as raw OS strings. The others must be
//! valid UTF-8; anything else is a configuration error, never "unset".
//!
//! ```toml
//! output = "deps/QuEST_h.jl"
//! library = "/opt/quest/lib/libQuEST.so"
//! quest_version = "3.7.0"
//! # precision_code = 2     # skip loading the library
//! # qureg_size = 112       # override the mirrored layout
//! ```

use std::ffi::OsString;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::errors::{DefsError, DefsResult};
use crate::library::default_library_name;

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "QuEST_h.jl";

/// QuEST release assumed when none is configured
pub const DEFAULT_QUEST_VERSION: &str = "3.7.0";

pub const ENV_CONFIG: &str = "QUESTDEFS_CONFIG";
pub const ENV_OUTPUT: &str = "QUESTDEFS_OUTPUT";
pub const ENV_LIBRARY: &str = "QUESTDEFS_LIBRARY";
pub const ENV_PRECISION: &str = "QUESTDEFS_PRECISION";
pub const ENV_QUREG_SIZE: &str = "QUESTDEFS_QUREG_SIZE";
pub const ENV_QUEST_VERSION: &str = "QUESTDEFS_QUEST_VERSION";

/// Resolved generator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// File to (over)write
    pub output: PathBuf,
    /// Shared library to query for `QuEST_PREC`
    pub library: PathBuf,
    /// Pinned precision code; when set the library is not loaded
    pub precision_code: Option<i32>,
    /// Override for the byte size of `struct Qureg`
    pub qureg_size: Option<usize>,
    /// QuEST release libQuEST was built from
    pub quest_version: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output: PathBuf::from(DEFAULT_OUTPUT),
            library: PathBuf::from(default_library_name()),
            precision_code: None,
            qureg_size: None,
            quest_version: DEFAULT_QUEST_VERSION.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load from the process environment.
    pub fn load() -> DefsResult<Self> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Load using `lookup` in place of the process environment.
    pub fn from_lookup<F>(lookup: F) -> DefsResult<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut config = match lookup(ENV_CONFIG) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> DefsResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DefsError::file_error("read config", path.display().to_string(), e.to_string())
        })?;
        toml::from_str(&contents).map_err(|e| {
            DefsError::config_error(ENV_CONFIG, path.display().to_string(), e.to_string())
        })
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> DefsResult<()>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(output) = lookup(ENV_OUTPUT) {
            self.output = PathBuf::from(output);
        }
        if let Some(library) = lookup(ENV_LIBRARY) {
            self.library = PathBuf::from(library);
        }
        if let Some(code) = lookup(ENV_PRECISION) {
            self.precision_code = Some(parse_value(ENV_PRECISION, &utf8_value(ENV_PRECISION, code)?)?);
        }
        if let Some(size) = lookup(ENV_QUREG_SIZE) {
            self.qureg_size = Some(parse_value(ENV_QUREG_SIZE, &utf8_value(ENV_QUREG_SIZE, size)?)?);
        }
        if let Some(version) = lookup(ENV_QUEST_VERSION) {
            self.quest_version = utf8_value(ENV_QUEST_VERSION, version)?;
        }
        Ok(())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> DefsResult<()> {
        if self.output.as_os_str().is_empty() {
            return Err(DefsError::config_error("output", "", "output path is empty"));
        }
        if self.precision_code.is_none() && self.library.as_os_str().is_empty() {
            return Err(DefsError::config_error(
                "library",
                "",
                "no library to load and no precision_code given",
            ));
        }
        self.quest_version()?;
        Ok(())
    }

    /// Parsed `quest_version`
    pub fn quest_version(&self) -> DefsResult<Version> {
        Version::parse(self.quest_version.trim()).map_err(|e| {
            DefsError::config_error("quest_version", &self.quest_version, e.to_string())
        })
    }
}

fn utf8_value(key: &str, raw: OsString) -> DefsResult<String> {
    raw.into_string().map_err(|raw| {
        DefsError::config_error(key, raw.to_string_lossy(), "not valid UTF-8")
    })
}

fn parse_value<T>(key: &str, raw: &str) -> DefsResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| DefsError::config_error(key, raw, e.to_string()))
}
