//! # Generation Run
//!
//! One run is a straight line through [`Stage`]:
//!
//! ```text
//! Start -> PrecisionResolved -> FileOpened -> DeclarationsWritten
//!       -> Flushed -> Closed -> Done
//!
//! (any stage) -> Failed
//! ```
//!
//! Any step may fail; the run then moves to `Failed` and the error is
//! returned. [`Generator::last_completed`] still names the last stage that
//! succeeded. All consistency checks happen before `FileOpened`, so a
//! configuration problem never creates or truncates the output file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use defs_core::config::GeneratorConfig;
//! use defs_core::generator::{precision_source, Generator};
//!
//! let config = GeneratorConfig::load()?;
//! let source = precision_source(&config)?;
//! let report = Generator::new(&config).run(source.as_ref())?;
//! println!("wrote {}", report.output.display());
//! # Ok::<(), defs_core::errors::DefsError>(())
//! ```

use std::path::PathBuf;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::declarations::RenderContext;
use crate::emitter::OutputFile;
use crate::errors::{DefsError, DefsResult};
use crate::layout;
use crate::library::QuestLibrary;
use crate::precision::{self, FixedPrecision, FloatWidth, PrecisionSource};

/// Progress of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Start,
    PrecisionResolved,
    FileOpened,
    DeclarationsWritten,
    Flushed,
    Closed,
    Done,
    Failed,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub output: PathBuf,
    pub float: FloatWidth,
    pub qureg_size: usize,
    pub bytes_written: usize,
}

/// Reject any command-line arguments. Runs before anything touches the filesystem.
///
/// Arguments are never inspected, so they need not be valid UTF-8.
pub fn check_args<S>(program: &str, args: &[S]) -> DefsResult<()> {
    if !args.is_empty() {
        return Err(DefsError::usage(program, args.len()));
    }
    Ok(())
}

/// Pick where the precision code comes from: a pinned code, or libQuEST itself.
pub fn precision_source(config: &GeneratorConfig) -> DefsResult<Box<dyn PrecisionSource>> {
    match config.precision_code {
        Some(code) => Ok(Box::new(FixedPrecision(code))),
        None => {
            let lib = QuestLibrary::open(&config.library)?;
            info!("querying precision from {}", lib.path().display());
            Ok(Box::new(lib))
        }
    }
}

/// Drives one generation run.
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    stage: Stage,
    last_completed: Stage,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Generator {
            config,
            stage: Stage::Start,
            last_completed: Stage::Start,
        }
    }

    /// Current stage; `Failed` once a step has failed
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Last stage that completed successfully
    pub fn last_completed(&self) -> Stage {
        self.last_completed
    }

    fn advance(&mut self, next: Stage) {
        debug!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
        self.last_completed = next;
    }

    /// Run all stages.
    pub fn run(&mut self, source: &dyn PrecisionSource) -> DefsResult<GenerationReport> {
        let result = self.run_stages(source);
        if let Err(e) = &result {
            debug!("failed after {:?}: {}", self.last_completed, e);
            self.stage = Stage::Failed;
        }
        result
    }

    fn run_stages(&mut self, source: &dyn PrecisionSource) -> DefsResult<GenerationReport> {
        let ctx = self.resolve(source)?;
        self.advance(Stage::PrecisionResolved);

        let mut out = OutputFile::create(&self.config.output)?;
        self.advance(Stage::FileOpened);

        let bytes_written = out.write_declarations(&ctx)?;
        self.advance(Stage::DeclarationsWritten);

        out.flush()?;
        self.advance(Stage::Flushed);

        let output = out.path().to_path_buf();
        out.close()?;
        self.advance(Stage::Closed);

        info!("wrote {} bytes to {}", bytes_written, output.display());
        self.advance(Stage::Done);

        Ok(GenerationReport {
            output,
            float: ctx.float,
            qureg_size: ctx.qureg_size,
            bytes_written,
        })
    }

    /// Every check that must pass before the output file is touched.
    fn resolve(&self, source: &dyn PrecisionSource) -> DefsResult<RenderContext> {
        let float = precision::resolve(source)?;
        layout::check_version(&self.config.quest_version()?)?;
        let qureg_size = layout::resolve_qureg_size(self.config.qureg_size)?;
        info!("{}, Qureg {} bytes", float, qureg_size);
        Ok(RenderContext::new(float, qureg_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::render_module;
    use crate::precision::compiled_width;
    use std::fs;

    fn config_in(dir: &tempfile::TempDir) -> GeneratorConfig {
        GeneratorConfig {
            output: dir.path().join("QuEST_h.jl"),
            ..GeneratorConfig::default()
        }
    }

    fn other_width() -> FloatWidth {
        match compiled_width() {
            FloatWidth::Single => FloatWidth::Double,
            FloatWidth::Double => FloatWidth::Single,
        }
    }

    #[test]
    fn test_check_args() {
        assert!(check_args::<&str>("write-defs", &[]).is_ok());
        let err = check_args("write-defs", &["extra"]).unwrap_err();
        assert_eq!(err, DefsError::usage("write-defs", 1));
    }

    #[test]
    #[cfg(unix)]
    fn test_check_args_accepts_non_utf8() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let args = vec![OsString::from_vec(vec![0xff]), OsString::from("b")];
        let err = check_args("write-defs", &args).unwrap_err();
        assert_eq!(err, DefsError::usage("write-defs", 2));
    }

    #[test]
    fn test_successful_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let mut generator = Generator::new(&config);

        let report = generator.run(&FixedPrecision(compiled_width().code())).unwrap();
        assert_eq!(generator.stage(), Stage::Done);
        assert_eq!(generator.last_completed(), Stage::Done);
        assert_eq!(report.float, compiled_width());
        assert_eq!(report.qureg_size, layout::qureg_size());

        let written = fs::read_to_string(&config.output).unwrap();
        assert_eq!(written.len(), report.bytes_written);
        assert_eq!(written, render_module(&RenderContext::new(report.float, report.qureg_size)));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let source = FixedPrecision(compiled_width().code());

        Generator::new(&config).run(&source).unwrap();
        let first = fs::read(&config.output).unwrap();
        Generator::new(&config).run(&source).unwrap();
        let second = fs::read(&config.output).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsupported_precision_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let mut generator = Generator::new(&config);

        let err = generator.run(&FixedPrecision(4)).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_PRECISION");
        assert_eq!(generator.stage(), Stage::Failed);
        assert_eq!(generator.last_completed(), Stage::Start);
        assert!(!config.output.exists());
    }

    #[test]
    fn test_mismatched_precision_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let mut generator = Generator::new(&config);

        let err = generator.run(&FixedPrecision(other_width().code())).unwrap_err();
        assert_eq!(err.error_code(), "PRECISION_MISMATCH");
        assert!(!config.output.exists());
    }

    #[test]
    fn test_failed_check_leaves_existing_output_alone() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        fs::write(&config.output, "previous contents").unwrap();

        assert!(Generator::new(&config).run(&FixedPrecision(0)).is_err());
        assert_eq!(fs::read_to_string(&config.output).unwrap(), "previous contents");
    }

    #[test]
    fn test_unsupported_quest_version() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            quest_version: "4.0.0".to_string(),
            ..config_in(&dir)
        };
        let err = Generator::new(&config)
            .run(&FixedPrecision(compiled_width().code()))
            .unwrap_err();
        assert_eq!(err.error_code(), "LAYOUT_CONTRACT");
        assert!(!config.output.exists());
    }

    #[test]
    fn test_qureg_size_override() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            qureg_size: Some(144),
            ..config_in(&dir)
        };
        Generator::new(&config)
            .run(&FixedPrecision(compiled_width().code()))
            .unwrap();
        let written = fs::read_to_string(&config.output).unwrap();
        assert!(written.contains("primitive type Qureg 1152 end\n"));
    }

    #[test]
    fn test_open_failure_stops_before_file_opened() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            output: dir.path().join("missing/QuEST_h.jl"),
            ..GeneratorConfig::default()
        };
        let mut generator = Generator::new(&config);

        let err = generator.run(&FixedPrecision(compiled_width().code())).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
        assert_eq!(generator.stage(), Stage::Failed);
        assert_eq!(generator.last_completed(), Stage::PrecisionResolved);
    }

    #[test]
    fn test_precision_source_prefers_fixed_code() {
        let config = GeneratorConfig {
            precision_code: Some(2),
            library: PathBuf::from("/nonexistent/libQuEST.so"),
            ..GeneratorConfig::default()
        };
        let source = precision_source(&config).unwrap();
        assert_eq!(source.precision_code().unwrap(), 2);
    }

    #[test]
    fn test_precision_source_missing_library() {
        let config = GeneratorConfig {
            library: PathBuf::from("/nonexistent/libQuEST.so"),
            ..GeneratorConfig::default()
        };
        let err = match precision_source(&config) {
            Ok(_) => panic!("loading should fail"),
            Err(e) => e,
        };
        assert_eq!(err.error_code(), "LIBRARY_ERROR");
    }
}
