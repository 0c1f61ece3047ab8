use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::discover::SourceFile;
use crate::error::ScanError;
use crate::substitute::substitute_vars;

/// Heredoc tags whose bodies are expected to hold JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Enclosure {
    Definition,
    Eof,
    Input,
    Pattern,
    Policy,
}

impl Enclosure {
    pub const ALL: [Enclosure; 5] = [
        Enclosure::Definition,
        Enclosure::Eof,
        Enclosure::Input,
        Enclosure::Pattern,
        Enclosure::Policy,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Enclosure::Definition => "DEFINITION",
            Enclosure::Eof => "EOF",
            Enclosure::Input => "INPUT",
            Enclosure::Pattern => "PATTERN",
            Enclosure::Policy => "POLICY",
        }
    }
}

impl fmt::Display for Enclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Body of one heredoc, interpolations already substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBlock {
    pub content: String,
    /// 0-based line of the `<<TAG` opener in the source file.
    pub start_line: usize,
}

/// Every block found in one file, partitioned by tag, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlocks {
    pub file: SourceFile,
    pub blocks: BTreeMap<Enclosure, Vec<ExtractedBlock>>,
}

impl FileBlocks {
    pub fn block_count(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }
}

/// Pulls the heredoc bodies tagged `enclosure` out of `content`.
///
/// A block opens on a line shaped like `name = <<TAG` (or `<<-TAG`) and closes
/// on the next line holding nothing but `TAG`, indentation allowed. The closer
/// is never part of the body; a body line that merely mentions `TAG` (inside a
/// JSON string, say) is. Line endings are kept so parser positions line up with
/// the source. A block still open at end of input is dropped.
pub fn extract_blocks(content: &str, enclosure: Enclosure) -> Vec<ExtractedBlock> {
    let keyword = enclosure.keyword();
    let mut blocks = Vec::new();
    let mut open: Option<(usize, String)> = None;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        if let Some((start_line, body)) = open.as_mut() {
            if line.trim() == keyword {
                blocks.push(ExtractedBlock {
                    content: std::mem::take(body),
                    start_line: *start_line,
                });
                open = None;
            } else {
                body.push_str(&substitute_vars(line));
            }
        } else if opens_block(line, keyword) {
            open = Some((index, String::new()));
        }
    }

    if let Some((start_line, _)) = open {
        debug!(%enclosure, start_line, "heredoc never closed, ignoring it");
    }
    blocks
}

fn opens_block(line: &str, keyword: &str) -> bool {
    let Some((name, value)) = line.split_once('=') else {
        return false;
    };
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return false;
    }
    let Some(tag) = value.trim_start().strip_prefix("<<") else {
        return false;
    };
    tag.strip_prefix('-').unwrap_or(tag).trim_end() == keyword
}

/// Reads `file` and extracts blocks for every known tag.
///
/// Bytes that aren't UTF-8 (a Latin-1 comment, say) are replaced rather than
/// failing the whole file.
pub fn extract_file(file: &SourceFile) -> Result<FileBlocks, ScanError> {
    let bytes = fs::read(&file.path).map_err(|source| ScanError::Read {
        path: file.path.clone(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    if matches!(content, Cow::Owned(_)) {
        debug!(path = %file.path.display(), "replaced invalid UTF-8");
    }

    let blocks = Enclosure::ALL
        .into_iter()
        .map(|enclosure| (enclosure, extract_blocks(&content, enclosure)))
        .filter(|(_, found)| !found.is_empty())
        .collect();

    Ok(FileBlocks {
        file: file.clone(),
        blocks,
    })
}

/// Blocks from every file that had any, plus the files that couldn't be read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub files: Vec<FileBlocks>,
    pub unreadable: Vec<PathBuf>,
}

impl Extraction {
    pub fn block_count(&self) -> usize {
        self.files.iter().map(FileBlocks::block_count).sum()
    }
}

/// Extracts from every file. Unreadable files are logged and listed so the
/// run can't pass without having looked at them.
pub fn extract_all(files: &[SourceFile]) -> Extraction {
    let mut extraction = Extraction::default();
    for file in files {
        match extract_file(file) {
            Ok(found) => {
                debug!(
                    path = %found.file.path.display(),
                    blocks = found.block_count(),
                    "extracted"
                );
                if !found.blocks.is_empty() {
                    extraction.files.push(found);
                }
            }
            Err(err) => {
                warn!(error = ?err, "skipping file");
                extraction.unreadable.push(file.path.clone());
            }
        }
    }
    extraction
}
