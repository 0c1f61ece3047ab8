use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ScanError {
    #[error("directory `{}` does not exist or is not a directory", .0.display())]
    #[diagnostic(
        code(ferrite_tf::directory_not_found),
        help("pass a folder that exists with `--directory <DIR>`")
    )]
    DirectoryNotFound(PathBuf),

    #[error("failed to read `{}`", path.display())]
    #[diagnostic(code(ferrite_tf::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The parser message had no `line N column` part to relocate.
#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
#[error("no `line <N> column` position in message: {0}")]
#[diagnostic(code(ferrite_tf::unexpected_message_format))]
pub struct UnexpectedMessageFormat(pub String);
