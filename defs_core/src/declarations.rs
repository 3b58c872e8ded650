//! # Declaration Blocks
//!
//! The generated `QuEST_h.jl` is a single Julia module holding one block per
//! mirrored C type, always in the order of [`ALL_DECLARATIONS`]. Each block
//! is rendered independently from a [`RenderContext`]; nothing else goes into
//! the text, so the output is a pure function of the context.
//!
//! ## Usage
//!
//! ```rust
//! use defs_core::declarations::{render_module, RenderContext};
//! use defs_core::precision::FloatWidth;
//!
//! let ctx = RenderContext::new(FloatWidth::Double, 112);
//! let julia = render_module(&ctx);
//! assert!(julia.starts_with("module QuEST_h\n"));
//! assert!(julia.contains("primitive type Qureg 896 end"));
//! ```

use serde::{Deserialize, Serialize};

use crate::precision::FloatWidth;

/// Name of the generated Julia module
pub const MODULE_NAME: &str = "QuEST_h";

/// Everything a block may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Width of `qreal`
    pub float: FloatWidth,
    /// Byte size of `struct Qureg`
    pub qureg_size: usize,
}

impl RenderContext {
    pub fn new(float: FloatWidth, qureg_size: usize) -> Self {
        Self { float, qureg_size }
    }
}

/// One declaration block of the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Declaration {
    /// `ComplexArray`: pointers to the real and imaginary amplitude arrays
    ComplexArray,
    /// `PAULI_I` .. `PAULI_Z` operator tags
    PauliOpTypes,
    /// Scalar `Complex`
    Complex,
    /// 2x2 `ComplexMatrix2`
    ComplexMatrix2,
    /// 4x4 `ComplexMatrix4`
    ComplexMatrix4,
    /// Heap-allocated `ComplexMatrixN`
    ComplexMatrixN,
    /// 3-component `Vector`
    Vector,
    /// Opaque `Qureg` blob
    Qureg,
    /// `QuESTEnv` rank information
    QuESTEnv,
}

/// Every block, in emission order.
pub const ALL_DECLARATIONS: [Declaration; 9] = [
    Declaration::ComplexArray,
    Declaration::PauliOpTypes,
    Declaration::Complex,
    Declaration::ComplexMatrix2,
    Declaration::ComplexMatrix4,
    Declaration::ComplexMatrixN,
    Declaration::Vector,
    Declaration::Qureg,
    Declaration::QuESTEnv,
];

impl Declaration {
    /// Julia name the block introduces (first name for the constant group)
    pub fn julia_name(&self) -> &'static str {
        match self {
            Declaration::ComplexArray => "ComplexArray",
            Declaration::PauliOpTypes => "PAULI_I",
            Declaration::Complex => "Complex",
            Declaration::ComplexMatrix2 => "ComplexMatrix2",
            Declaration::ComplexMatrix4 => "ComplexMatrix4",
            Declaration::ComplexMatrixN => "ComplexMatrixN",
            Declaration::Vector => "Vector",
            Declaration::Qureg => "Qureg",
            Declaration::QuESTEnv => "QuESTEnv",
        }
    }

    /// Render this block, newline-terminated.
    pub fn render(&self, ctx: &RenderContext) -> String {
        let f = ctx.float.julia_type();
        match self {
            Declaration::ComplexArray => format!(
                "struct ComplexArray\n  real ::Ptr{{{f}}}\n  imag ::Ptr{{{f}}}\nend\n"
            ),
            Declaration::PauliOpTypes => ["I", "X", "Y", "Z"]
                .iter()
                .enumerate()
                .map(|(value, tag)| format!("const PAULI_{}=Int32({})\n", tag, value))
                .collect(),
            Declaration::Complex => format!("struct Complex\n  real ::{f}\n  imag ::{f}\nend\n"),
            Declaration::ComplexMatrix2 => square_matrix("ComplexMatrix2", 2, f),
            Declaration::ComplexMatrix4 => square_matrix("ComplexMatrix4", 4, f),
            Declaration::ComplexMatrixN => format!(
                "struct ComplexMatrixN\n  numQubits ::Int32\n  real      ::Ptr{{Ptr{{{f}}}}}\n  imag      ::Ptr{{Ptr{{{f}}}}}\nend\n"
            ),
            Declaration::Vector => format!("struct Vector\n  x ::{f}\n  y ::{f}\n  z ::{f}\nend\n"),
            // Julia sizes primitive types in bits
            Declaration::Qureg => format!("primitive type Qureg {} end\n", ctx.qureg_size * 8),
            Declaration::QuESTEnv => {
                "struct QuESTEnv\n  rank     ::Int32\n  numRanks ::Int32\nend\n".to_string()
            }
        }
    }
}

fn square_matrix(name: &str, n: usize, f: &str) -> String {
    format!(
        "struct {name}\n  real ::NTuple{{{n},NTuple{{{n},{f}}}}}\n  imag ::NTuple{{{n},NTuple{{{n},{f}}}}}\nend\n"
    )
}

/// Opening line of the module
pub fn module_header() -> String {
    format!("module {}\n", MODULE_NAME)
}

/// Closing marker line of the module
pub fn module_footer() -> String {
    format!("end # module {}\n", MODULE_NAME)
}

/// Render the complete `QuEST_h.jl` text.
pub fn render_module(ctx: &RenderContext) -> String {
    let mut output = String::with_capacity(1024);
    output.push_str(&module_header());
    for declaration in ALL_DECLARATIONS {
        output.push_str(&declaration.render(ctx));
    }
    output.push_str(&module_footer());
    output
}
