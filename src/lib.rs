//! ferrite-tf: finds broken json hiding in terraform heredocs
//!
//! Container definitions, IAM policies, event patterns and friends are often
//! written as `<<DEFINITION` heredocs inside `.tf` files, where nothing checks
//! them until `apply`. This crate pulls those bodies out, stubs the `${...}`
//! interpolations, parses what is left and points at the broken line in the
//! original file.
//!
//! ```ignore
//! use ferrite_tf::{run, Config};
//!
//! let code = run(&Config::new("./terraform"), &mut std::io::stdout())?;
//! std::process::exit(code.into());
//! ```

pub mod config;
pub mod correct;
pub mod discover;
pub mod error;
pub mod extract;
mod hints;
pub mod report;
pub mod substitute;
pub mod validator;

use std::io::Write;

use miette::IntoDiagnostic;
use tracing::info;

pub use config::Config;
pub use error::ScanError;
pub use report::Report;
pub use validator::{BlockJsonSyntaxError, FileFailures};

/// Runs discover → extract → validate → correct and returns the report.
pub fn scan(config: &Config) -> Result<Report, ScanError> {
    let files = discover::discover(&config.directory)?;
    let extraction = extract::extract_all(&files);
    let blocks_found = extraction.block_count();
    let failures = correct::correct_all(validator::validate_all(&extraction.files));

    info!(
        files = files.len(),
        files_with_blocks = extraction.files.len(),
        blocks = blocks_found,
        unreadable = extraction.unreadable.len(),
        failing_files = failures.len(),
        "scan finished"
    );

    Ok(Report {
        directory: config.directory.clone(),
        files_scanned: files.len(),
        files_with_blocks: extraction.files.len(),
        blocks_found,
        unreadable: extraction.unreadable,
        failures,
    })
}

/// Scans, prints the report to `out` and returns the process exit code.
pub fn run(config: &Config, out: &mut impl Write) -> miette::Result<u8> {
    let report = scan(config)?;
    report.write_to(out).into_diagnostic()?;
    Ok(report.exit_code())
}
