use std::io::{self, Write};
use std::path::PathBuf;

use crate::validator::FileFailures;

/// Outcome of one run, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub directory: PathBuf,
    pub files_scanned: usize,
    /// Files holding at least one heredoc block.
    pub files_with_blocks: usize,
    pub blocks_found: usize,
    /// Files that couldn't be read, so weren't checked.
    pub unreadable: Vec<PathBuf>,
    pub failures: Vec<FileFailures>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.unreadable.is_empty()
    }

    /// 0 when every file was read and every block parsed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        if self.is_clean() {
            writeln!(
                out,
                "Scanned {} Terraform files and {} definitions ({} heredoc blocks) in \"{}\"",
                self.files_scanned,
                self.files_with_blocks,
                self.blocks_found,
                self.directory.display()
            )?;
            writeln!(out, "All JSONs seem to be valid - You are good to go!")?;
            return Ok(());
        }

        if !self.unreadable.is_empty() {
            writeln!(out, "Some files could not be read and were not checked:")?;
            for path in &self.unreadable {
                writeln!(out, "===> {}", path.display())?;
            }
            if self.failures.is_empty() {
                return Ok(());
            }
            writeln!(out)?;
        }

        writeln!(out, "Invalid JSON found!")?;
        for failure in &self.failures {
            writeln!(out)?;
            let noun = if failure.errors.len() == 1 { "error was" } else { "errors were" };
            writeln!(
                out,
                "In \"{}\" the following JSON {noun} found:",
                failure.file.path.display()
            )?;
            for error in &failure.errors {
                writeln!(
                    out,
                    "===> [{} block opened on line {}] {}: {}",
                    error.enclosure,
                    error.start_line,
                    error.fault.describe(),
                    error.message
                )?;
                if let Some(help) = &error.help {
                    writeln!(out, "     help: {help}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::SourceFile;
    use crate::extract::Enclosure;
    use crate::validator::{BlockJsonSyntaxError, Fault};

    fn render(report: &Report) -> String {
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn clean_run_prints_summary() {
        let report = Report {
            directory: PathBuf::from("./terraform"),
            files_scanned: 0,
            files_with_blocks: 0,
            blocks_found: 0,
            unreadable: vec![],
            failures: vec![],
        };
        assert_eq!(report.exit_code(), 0);
        assert_eq!(
            render(&report),
            "Scanned 0 Terraform files and 0 definitions (0 heredoc blocks) in \"./terraform\"\n\
             All JSONs seem to be valid - You are good to go!\n"
        );
    }

    #[test]
    fn failures_print_each_file_and_exit_one() {
        let report = Report {
            directory: PathBuf::from("infra"),
            files_scanned: 3,
            files_with_blocks: 2,
            blocks_found: 4,
            unreadable: vec![],
            failures: vec![FileFailures {
                file: SourceFile {
                    path: PathBuf::from("infra/ecs.tf"),
                },
                errors: vec![BlockJsonSyntaxError {
                    enclosure: Enclosure::Definition,
                    start_line: 5,
                    line: 6,
                    column: 9,
                    message: "trailing comma at line 6 column 9".to_string(),
                    fault: Fault::TrailingComma,
                    help: Some("remove the trailing comma".to_string()),
                }],
            }],
        };
        assert_eq!(report.exit_code(), 1);
        let text = render(&report);
        assert!(text.starts_with("Invalid JSON found!\n"));
        assert!(text.contains("In \"infra/ecs.tf\" the following JSON error was found:"));
        assert!(text.contains(
            "===> [DEFINITION block opened on line 5] trailing comma: trailing comma at line 6 column 9"
        ));
        assert!(text.contains("     help: remove the trailing comma"));
        assert!(!text.contains("Scanned"));
    }

    #[test]
    fn unreadable_files_fail_the_run() {
        let report = Report {
            directory: PathBuf::from("infra"),
            files_scanned: 2,
            files_with_blocks: 1,
            blocks_found: 1,
            unreadable: vec![PathBuf::from("infra/locked.tf")],
            failures: vec![],
        };
        assert!(!report.is_clean());
        assert_eq!(report.exit_code(), 1);
        let text = render(&report);
        assert!(text.starts_with("Some files could not be read and were not checked:\n"));
        assert!(text.contains("===> infra/locked.tf"));
        assert!(!text.contains("good to go"));
        assert!(!text.contains("Invalid JSON found!"));
    }
}
