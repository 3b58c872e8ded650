//! # defs_core - Julia definitions for libQuEST
//!
//! `defs_core` produces `QuEST_h.jl`, the Julia module that mirrors the
//! plain-data structs of the QuEST quantum simulator (complex numbers,
//! matrices, vectors, environment handles) so Julia code can `ccall` into
//! libQuEST. The only inputs are libQuEST's floating-point precision and the
//! byte size of its `Qureg` handle.
//!
//! ## Quick Start
//!
//! ```rust
//! use defs_core::declarations::{render_module, RenderContext};
//! use defs_core::layout::qureg_size;
//! use defs_core::precision::FloatWidth;
//!
//! let julia = render_module(&RenderContext::new(FloatWidth::Double, qureg_size()));
//! assert!(julia.ends_with("end # module QuEST_h\n"));
//! ```
//!
//! ## Modules
//!
//! - [`precision`] - `qreal` width: precision codes and the compiled-in width
//! - [`library`] - Loading libQuEST and calling its precision accessor
//! - [`layout`] - `#[repr(C)]` mirror of `struct Qureg` and its contract
//! - [`declarations`] - The nine Julia declaration blocks
//! - [`emitter`] - Writing, flushing and closing the output file
//! - [`generator`] - The run sequence tying everything together
//! - [`config`] - Environment and TOML configuration
//! - [`errors`] - Structured error types

pub mod config;
pub mod declarations;
pub mod emitter;
pub mod errors;
pub mod generator;
pub mod layout;
pub mod library;
pub mod precision;

// Re-export commonly used types at crate root for convenience
pub use config::GeneratorConfig;
pub use errors::{DefsError, DefsResult};
pub use generator::{GenerationReport, Generator, Stage};
pub use precision::FloatWidth;
