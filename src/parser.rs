/*!
 * Line-oriented parser for project export documents
 *
 * A document is read line by line and every line is classified as a file
 * heading, a code fence, a horizontal rule or plain text. A small state
 * machine (preamble, heading, body) turns that stream into file sections.
 *
 * The body of a section runs from its opening fence up to the last bare
 * closing fence before the next file heading. Fences inside file content
 * therefore survive a round trip; a content line that itself starts with the
 * file heading marker does not.
 */

use crate::ensure;
use crate::error::Result;
use crate::exporter::{CONTENTS_MARKER, STRUCTURE_MARKER};
use crate::serializer::{FENCE, FILE_HEADING, RULE};
use crate::types::FileSection;

/// Classification of a single document line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    /// `### 📝 \`path\`` with the text after the marker
    Heading(&'a str),
    /// A code fence with its (possibly empty) language tag
    Fence(&'a str),
    /// `---`
    Rule,
    /// Anything else
    Text(&'a str),
}

impl<'a> Line<'a> {
    fn classify(raw: &'a str) -> Self {
        if let Some(rest) = raw.strip_prefix(FILE_HEADING) {
            return Self::Heading(rest);
        }
        let trimmed = raw.trim_end();
        if let Some(tag) = trimmed.strip_prefix(FENCE) {
            return Self::Fence(tag.trim());
        }
        if trimmed == RULE {
            return Self::Rule;
        }
        Self::Text(raw)
    }

    fn is_closing_fence(&self) -> bool {
        matches!(self, Self::Fence(tag) if tag.is_empty())
    }

    fn is_blank_or_rule(&self) -> bool {
        match self {
            Self::Rule => true,
            Self::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }
}

/// Parser state between lines
enum State<'a> {
    /// Title, timestamp and tree section before the first file heading
    Preamble,
    /// Saw a heading, waiting for the opening fence
    Heading { path: String },
    /// Collecting raw lines, line endings included, after the opening fence
    Body {
        path: String,
        language: String,
        lines: Vec<&'a str>,
    },
}

/// Reject documents lacking either required marker
pub fn validate_document(document: &str) -> Result<()> {
    ensure!(
        document.contains(STRUCTURE_MARKER),
        InvalidDocument,
        "missing `{}` marker",
        STRUCTURE_MARKER
    );
    ensure!(
        document.contains(CONTENTS_MARKER),
        InvalidDocument,
        "missing `{}` marker",
        CONTENTS_MARKER
    );
    Ok(())
}

/// Split a document into its file sections, in document order
///
/// Sections without an opening fence are logged and dropped.
pub fn parse_document(document: &str) -> Vec<FileSection> {
    let mut sections = Vec::new();
    let mut state = State::Preamble;

    for raw in document.split_inclusive('\n') {
        let line = Line::classify(strip_eol(raw));

        if let Line::Heading(rest) = line {
            finish(state, &mut sections);
            state = State::Heading {
                path: clean_path(rest),
            };
            continue;
        }

        state = match state {
            State::Preamble => State::Preamble,
            State::Heading { path } => match line {
                Line::Fence(tag) => State::Body {
                    path,
                    language: tag.to_string(),
                    lines: Vec::new(),
                },
                Line::Text(text) if text.trim().is_empty() => State::Heading { path },
                _ => {
                    log::warn!("Section `{}` has no opening code fence; skipping", path);
                    State::Preamble
                }
            },
            State::Body {
                path,
                language,
                mut lines,
            } => {
                lines.push(raw);
                State::Body {
                    path,
                    language,
                    lines,
                }
            }
        };
    }

    finish(state, &mut sections);
    sections
}

fn finish(state: State<'_>, sections: &mut Vec<FileSection>) {
    match state {
        State::Preamble => {}
        State::Heading { path } => {
            log::warn!("Section `{}` ends before its code fence; skipping", path);
        }
        State::Body {
            path,
            language,
            lines,
        } => {
            let end = body_end(&lines);
            let content = lines[..end].concat().trim().to_string();
            sections.push(FileSection {
                path,
                language,
                content,
            });
        }
    }
}

/// Index one past the last body line: the last bare closing fence, or the
/// end of the section minus trailing blank lines and rules when unclosed
fn body_end(lines: &[&str]) -> usize {
    let classified: Vec<Line<'_>> = lines.iter().map(|l| Line::classify(strip_eol(l))).collect();
    if let Some(idx) = classified.iter().rposition(Line::is_closing_fence) {
        return idx;
    }
    let mut end = classified.len();
    while end > 0 && classified[end - 1].is_blank_or_rule() {
        end -= 1;
    }
    end
}

/// A raw line without its `\n` or `\r\n` terminator
fn strip_eol(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}

fn clean_path(heading_rest: &str) -> String {
    heading_rest.replace('`', "").trim().to_string()
}
