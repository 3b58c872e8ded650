//! # write-defs
//!
//! Generates `QuEST_h.jl` for the Julia QuEST bindings.
//!
//! ## Usage
//!
//! ```bash
//! QUESTDEFS_LIBRARY=/opt/quest/lib/libQuEST.so cargo run --bin write-defs
//! ```
//!
//! Takes no arguments; see `defs_core::config` for the environment
//! variables it reads. Exits 0 after printing `<program>: Done.`, or 1 with
//! a single error line on stderr.

use std::ffi::OsString;
use std::process;

use defs_core::generator::{check_args, precision_source, Generator};
use defs_core::{DefsResult, GenerationReport, GeneratorConfig};
use log::info;

fn run() -> DefsResult<GenerationReport> {
    let config = GeneratorConfig::load()?;
    info!("output {}, library {}", config.output.display(), config.library.display());

    let source = precision_source(&config)?;
    Generator::new(&config).run(source.as_ref())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args_os();
    let program = args
        .next()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "write-defs".to_string());
    let rest: Vec<OsString> = args.collect();

    if let Err(e) = check_args(&program, &rest) {
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }

    match run() {
        Ok(report) => {
            info!("{} ({} bytes)", report.output.display(), report.bytes_written);
            println!("{}: Done.", program);
        }
        Err(e) => {
            if !e.is_pre_output() {
                info!("output may be partially written");
            }
            eprintln!("{}: {}", program, e);
            process::exit(e.exit_code());
        }
    }
}
