//! # Mirrored C Layouts
//!
//! Julia only sees `Qureg` as an opaque blob, so the one thing the generated
//! module must get right is its byte size. That size comes from a
//! `#[repr(C)]` mirror of the CPU build of `struct Qureg` in QuEST 3.x,
//! laid out by the compiler for the build target exactly as the C compiler
//! would.
//!
//! The mirror is a pinned contract, not a reflection of the installed
//! header: [`SUPPORTED_QUEST`] names the releases it was checked against and
//! [`check_version`] rejects anything else. GPU and cuQuantum builds add
//! fields and are not covered; use the `qureg_size` override for those.
//!
//! ```text
//! offset  field
//!      0  isDensityMatrix, numQubitsRepresented, numQubitsInStateVec (int)
//!     16  numAmpsPerChunk, numAmpsTotal (long long)
//!     32  chunkId, numChunks (int)
//!     40  stateVec, pairStateVec, deviceStateVec (ComplexArray)
//!     88  firstLevelReduction, secondLevelReduction (qreal*)
//!    104  qasmLog (QASMLogger*)
//!    112  -- end (LP64)
//! ```

use std::ffi::{c_int, c_longlong, c_void};
use std::mem::{align_of, size_of};

use log::warn;
use semver::{Version, VersionReq};

use crate::errors::{DefsError, DefsResult};
use crate::precision::QReal;

/// QuEST releases whose `Qureg` layout matches [`Qureg`]
pub const SUPPORTED_QUEST: &str = ">=3.0.0, <4.0.0";

/// Alignment the Julia `primitive type` declaration relies on
pub const QUREG_ALIGN: usize = 8;

/// `ComplexArray`: split real/imaginary amplitude buffers
#[repr(C)]
#[allow(non_snake_case, dead_code)]
pub struct ComplexArray {
    real: *mut QReal,
    imag: *mut QReal,
}

/// CPU-build `struct Qureg`
#[repr(C)]
#[allow(non_snake_case, dead_code)]
pub struct Qureg {
    isDensityMatrix: c_int,
    numQubitsRepresented: c_int,
    numQubitsInStateVec: c_int,
    numAmpsPerChunk: c_longlong,
    numAmpsTotal: c_longlong,
    chunkId: c_int,
    numChunks: c_int,
    stateVec: ComplexArray,
    pairStateVec: ComplexArray,
    deviceStateVec: ComplexArray,
    firstLevelReduction: *mut QReal,
    secondLevelReduction: *mut QReal,
    qasmLog: *mut c_void,
}

const _: () = assert!(
    align_of::<Qureg>() == QUREG_ALIGN,
    "Weird alignment of struct Qureg"
);

/// Byte size of `struct Qureg` on the build target.
pub const fn qureg_size() -> usize {
    size_of::<Qureg>()
}

/// Reject QuEST versions the mirrored layout was not checked against.
pub fn check_version(version: &Version) -> DefsResult<()> {
    let supported = VersionReq::parse(SUPPORTED_QUEST)
        .map_err(|e| DefsError::layout_contract("supported QuEST versions", e.to_string()))?;
    if !supported.matches(version) {
        return Err(DefsError::layout_contract(
            "struct Qureg",
            format!("QuEST {} is outside the mirrored range {}", version, SUPPORTED_QUEST),
        ));
    }
    Ok(())
}

/// Size to declare for `Qureg`: the mirrored size, or a validated override.
pub fn resolve_qureg_size(size_override: Option<usize>) -> DefsResult<usize> {
    let Some(size) = size_override else {
        return Ok(qureg_size());
    };

    if size == 0 || size % QUREG_ALIGN != 0 {
        return Err(DefsError::layout_contract(
            "struct Qureg",
            format!("size {} is not a positive multiple of its {}-byte alignment", size, QUREG_ALIGN),
        ));
    }
    if size != qureg_size() {
        warn!(
            "Qureg size override {} differs from the mirrored layout ({} bytes)",
            size,
            qureg_size()
        );
    }
    Ok(size)
}
