use miette::Diagnostic;
use serde_json::error::Category;
use thiserror::Error;
use tracing::debug;

use crate::discover::SourceFile;
use crate::extract::{Enclosure, ExtractedBlock, FileBlocks};
use crate::hints::BlockContext;

/// What kind of mistake the parser tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    TrailingComma,
    MissingComma,
    MissingColon,
    KeyMustBeString,
    InvalidEscape,
    InvalidNumber,
    ControlCharacter,
    UnexpectedEnd,
    Syntax,
}

impl Fault {
    pub fn describe(self) -> &'static str {
        match self {
            Fault::TrailingComma => "trailing comma",
            Fault::MissingComma => "missing comma",
            Fault::MissingColon => "missing colon",
            Fault::KeyMustBeString => "unquoted key",
            Fault::InvalidEscape => "invalid escape",
            Fault::InvalidNumber => "invalid number",
            Fault::ControlCharacter => "control character in string",
            Fault::UnexpectedEnd => "unexpected end of block",
            Fault::Syntax => "syntax error",
        }
    }
}

/// A heredoc body that isn't valid JSON.
///
/// `line` and `column` start out relative to the block body; the corrector
/// moves `line` (and the position inside `message`) into file coordinates.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[error("{message}")]
#[diagnostic(code(ferrite_tf::block_json_syntax))]
pub struct BlockJsonSyntaxError {
    pub enclosure: Enclosure,
    /// 0-based line of the block's opener.
    pub start_line: usize,
    pub line: usize,
    pub column: usize,
    /// serde_json's own message, e.g. `trailing comma at line 1 column 9`.
    pub message: String,
    pub fault: Fault,
    #[help]
    pub help: Option<String>,
}

/// Every failing block of one file, ordered by tag then position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailures {
    pub file: SourceFile,
    pub errors: Vec<BlockJsonSyntaxError>,
}

pub fn validate_block(
    enclosure: Enclosure,
    block: &ExtractedBlock,
) -> Result<(), BlockJsonSyntaxError> {
    serde_json::from_str::<serde_json::Value>(&block.content)
        .map(|_| ())
        .map_err(|err| {
            let ctx = BlockContext::new(&block.content, err.line(), err.column());
            let (fault, help) = classify(&err, &ctx);
            BlockJsonSyntaxError {
                enclosure,
                start_line: block.start_line,
                line: err.line(),
                column: err.column(),
                message: err.to_string(),
                fault,
                help,
            }
        })
}

/// Checks every block of every file. Files whose blocks all parse are left
/// out; every failing block is kept, not just the last one per tag.
pub fn validate_all(files: &[FileBlocks]) -> Vec<FileFailures> {
    files
        .iter()
        .filter_map(|found| {
            let errors: Vec<_> = found
                .blocks
                .iter()
                .flat_map(|(&enclosure, blocks)| {
                    blocks
                        .iter()
                        .filter_map(move |block| validate_block(enclosure, block).err())
                })
                .collect();
            debug!(
                path = %found.file.path.display(),
                failures = errors.len(),
                "validated"
            );
            (!errors.is_empty()).then(|| FileFailures {
                file: found.file.clone(),
                errors,
            })
        })
        .collect()
}

fn classify(err: &serde_json::Error, ctx: &BlockContext<'_>) -> (Fault, Option<String>) {
    let msg = err.to_string();

    let dangling_comma = msg.starts_with("expected value") && ctx.is_trailing_comma();

    if msg.starts_with("trailing comma") || dangling_comma {
        (Fault::TrailingComma, Some(ctx.trailing_comma()))
    } else if msg.starts_with("expected `,`") {
        (Fault::MissingComma, Some(ctx.missing_comma()))
    } else if msg.starts_with("key must be a string") {
        (Fault::KeyMustBeString, Some(ctx.unquoted_key()))
    } else if msg.starts_with("expected `:`") {
        (Fault::MissingColon, Some(ctx.missing_colon()))
    } else if msg.starts_with("control character") {
        (
            Fault::ControlCharacter,
            Some("replace raw tabs and newlines with \\t or \\n".to_string()),
        )
    } else if msg.contains("escape") {
        (Fault::InvalidEscape, Some(ctx.bad_escape()))
    } else if msg.contains("number") {
        (Fault::InvalidNumber, Some(ctx.bad_number()))
    } else if err.classify() == Category::Eof {
        (Fault::UnexpectedEnd, Some(ctx.unexpected_end()))
    } else {
        (Fault::Syntax, ctx.unquoted_interpolation())
    }
}
