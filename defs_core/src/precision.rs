//! # Precision Resolution
//!
//! libQuEST is built with a single floating-point type, `qreal`, selected by
//! its `QuEST_PREC` setting: 1 for `float`, 2 for `double`, 4 for `long double`.
//! The code multiplied by 4 is the byte width of `qreal`. Only 4- and 8-byte
//! widths have a Julia counterpart.
//!
//! The generator is itself compiled for one width (the `single-precision`
//! feature), and refuses to emit definitions for a library built otherwise.
//!
//! ## Example
//!
//! ```rust
//! use defs_core::precision::{resolve, FixedPrecision, FloatWidth, compiled_width};
//!
//! let code = if compiled_width() == FloatWidth::Double { 2 } else { 1 };
//! let width = resolve(&FixedPrecision(code)).unwrap();
//! assert_eq!(width, compiled_width());
//! ```

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{DefsError, DefsResult};

/// The generator's own notion of libQuEST's `qreal`.
#[cfg(feature = "single-precision")]
pub type QReal = f32;

/// The generator's own notion of libQuEST's `qreal`.
#[cfg(not(feature = "single-precision"))]
pub type QReal = f64;

/// Supported widths of `qreal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatWidth {
    /// 4-byte `float`
    Single,
    /// 8-byte `double`
    Double,
}

impl FloatWidth {
    /// Convert a precision code as reported by `getQuEST_PREC`.
    pub fn from_code(code: i32) -> DefsResult<Self> {
        // Widened so negative and huge codes report their real width
        let width = i64::from(code) * 4;
        match width {
            4 => Ok(FloatWidth::Single),
            8 => Ok(FloatWidth::Double),
            _ => Err(DefsError::UnsupportedPrecision { code, width }),
        }
    }

    /// Width in bytes
    pub fn bytes(&self) -> u32 {
        match self {
            FloatWidth::Single => 4,
            FloatWidth::Double => 8,
        }
    }

    /// Precision code libQuEST reports for this width
    pub fn code(&self) -> i32 {
        (self.bytes() / 4) as i32
    }

    /// Julia type name used for every float field of the emitted module
    pub fn julia_type(&self) -> &'static str {
        match self {
            FloatWidth::Single => "Float32",
            FloatWidth::Double => "Float64",
        }
    }
}

impl fmt::Display for FloatWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-byte qreal ({})", self.bytes(), self.julia_type())
    }
}

/// Width this generator was compiled for.
pub fn compiled_width() -> FloatWidth {
    match std::mem::size_of::<QReal>() {
        4 => FloatWidth::Single,
        _ => FloatWidth::Double,
    }
}

/// Anything that can report libQuEST's precision code.
pub trait PrecisionSource {
    /// Short description for log and error messages
    fn describe(&self) -> String;

    /// Query the precision code (`QuEST_PREC`)
    fn precision_code(&self) -> DefsResult<i32>;
}

/// A pinned precision code, used when the library is not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPrecision(pub i32);

impl PrecisionSource for FixedPrecision {
    fn describe(&self) -> String {
        format!("fixed precision code {}", self.0)
    }

    fn precision_code(&self) -> DefsResult<i32> {
        Ok(self.0)
    }
}

/// Query `source` and check the result against the compiled width.
pub fn resolve(source: &dyn PrecisionSource) -> DefsResult<FloatWidth> {
    let code = source.precision_code()?;
    debug!("{} reports QuEST_PREC = {}", source.describe(), code);

    let width = FloatWidth::from_code(code)?;
    check_against(width, compiled_width())?;
    Ok(width)
}

/// Fail unless the library width equals the width this build expects.
pub fn check_against(library: FloatWidth, compiled: FloatWidth) -> DefsResult<()> {
    if library != compiled {
        return Err(DefsError::PrecisionMismatch {
            library_width: library.bytes(),
            compiled_width: compiled.bytes(),
        });
    }
    Ok(())
}
