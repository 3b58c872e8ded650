//! Runtime access to libQuEST's precision accessor.
//!
//! `getQuEST_PREC` is not part of the documented QuEST API; it lives in
//! `QuEST.c` and returns the `QuEST_PREC` the library was compiled with.
//! The library is opened with `libloading` so the generator builds without
//! libQuEST present and only needs it when actually run.

use std::ffi::{c_int, OsString};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use log::debug;

use crate::errors::{DefsError, DefsResult};
use crate::precision::PrecisionSource;

/// Name of the undocumented precision accessor
pub const PRECISION_SYMBOL: &str = "getQuEST_PREC";

type PrecisionFn = unsafe extern "C" fn() -> c_int;

/// Platform file name of the QuEST shared library (`libQuEST.so`, `QuEST.dll`, ...)
pub fn default_library_name() -> OsString {
    libloading::library_filename("QuEST")
}

/// An opened libQuEST. Unloaded when dropped.
pub struct QuestLibrary {
    path: PathBuf,
    lib: Library,
}

impl QuestLibrary {
    /// Open the shared library at `path` (or by bare name via the loader's search path).
    pub fn open(path: &Path) -> DefsResult<Self> {
        debug!("loading {}", path.display());
        // SAFETY: libQuEST's initialisers only set up its own globals.
        let lib = unsafe { Library::new(path) }.map_err(|e| {
            DefsError::library_error("load", path.display().to_string(), e.to_string())
        })?;
        Ok(QuestLibrary {
            path: path.to_path_buf(),
            lib,
        })
    }

    /// Path the library was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PrecisionSource for QuestLibrary {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn precision_code(&self) -> DefsResult<i32> {
        let symbol_name = format!("{}\0", PRECISION_SYMBOL);
        // SAFETY: the accessor is declared in QuEST.c as `int getQuEST_PREC(void)`.
        let code = unsafe {
            let accessor: Symbol<PrecisionFn> =
                self.lib.get(symbol_name.as_bytes()).map_err(|e| {
                    DefsError::library_error(
                        format!("resolve {}", PRECISION_SYMBOL),
                        self.path.display().to_string(),
                        e.to_string(),
                    )
                })?;
            accessor()
        };
        Ok(code)
    }
}
