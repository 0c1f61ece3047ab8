use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::UnexpectedMessageFormat;
use crate::validator::{BlockJsonSyntaxError, FileFailures};

static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"line\s([0-9]+)\scolumn").expect("position pattern is valid"));

/// Shifts the `line N column` position in `message` down by `offset` lines.
///
/// Only the number inside the matched position is rewritten, so other numbers
/// in the message are never touched.
pub fn relocate_message(message: &str, offset: usize) -> Result<String, UnexpectedMessageFormat> {
    let number = POSITION
        .captures(message)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| UnexpectedMessageFormat(message.to_owned()))?;
    let line: usize = number
        .as_str()
        .parse()
        .map_err(|_| UnexpectedMessageFormat(message.to_owned()))?;

    Ok(format!(
        "{}{}{}",
        &message[..number.start()],
        line + offset,
        &message[number.end()..]
    ))
}

/// Moves a block-relative error into file coordinates.
///
/// A message without a recognisable position is passed through as is.
pub fn correct(mut error: BlockJsonSyntaxError) -> BlockJsonSyntaxError {
    if error.message.is_empty() {
        return error;
    }
    match relocate_message(&error.message, error.start_line) {
        Ok(message) => {
            error.message = message;
            error.line += error.start_line;
        }
        Err(err) => debug!(%err, "leaving parser message as is"),
    }
    error
}

pub fn correct_all(failures: Vec<FileFailures>) -> Vec<FileFailures> {
    failures
        .into_iter()
        .map(|failure| FileFailures {
            file: failure.file,
            errors: failure.errors.into_iter().map(correct).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Enclosure;
    use crate::validator::Fault;

    fn error(message: &str, line: usize, start_line: usize) -> BlockJsonSyntaxError {
        BlockJsonSyntaxError {
            enclosure: Enclosure::Definition,
            start_line,
            line,
            column: 10,
            message: message.to_string(),
            fault: Fault::TrailingComma,
            help: None,
        }
    }

    #[test]
    fn shifts_line_by_block_offset() {
        assert_eq!(
            relocate_message("trailing comma at line 1 column 10", 5).unwrap(),
            "trailing comma at line 6 column 10"
        );
    }

    #[test]
    fn other_numbers_are_left_alone() {
        assert_eq!(
            relocate_message("expected 1 at line 1 column 1", 10).unwrap(),
            "expected 1 at line 11 column 1"
        );
        assert_eq!(
            relocate_message("line 12 column 3", 100).unwrap(),
            "line 112 column 3"
        );
    }

    #[test]
    fn message_without_position_is_unexpected() {
        assert_eq!(
            relocate_message("something odd", 3),
            Err(UnexpectedMessageFormat("something odd".to_string()))
        );
    }

    #[test]
    fn correct_updates_message_and_line() {
        let fixed = correct(error("trailing comma at line 1 column 10", 1, 5));
        assert_eq!(fixed.message, "trailing comma at line 6 column 10");
        assert_eq!(fixed.line, 6);
        assert!(fixed.line >= fixed.start_line);
    }

    #[test]
    fn correct_passes_odd_messages_through() {
        let odd = error("no position here", 1, 5);
        assert_eq!(correct(odd.clone()), odd);
        let empty = error("", 1, 5);
        assert_eq!(correct(empty.clone()), empty);
    }
}
