//! Strict parsing of string-encoded author lists.
//!
//! Document tables produced by the offline pipeline often store the author list
//! as the textual form of a list literal, e.g. `"['Ada Lovelace', 'Alan Turing']"`.
//! [`parse_list_literal`] accepts exactly that shape: a bracketed (or
//! parenthesized) sequence of single- or double-quoted strings separated by
//! commas, with an optional trailing comma. Anything else is rejected; the
//! caller chooses a fallback via [`AuthorsFallback`].

use crate::document::AuthorsField;
use std::fmt;

/// Reason a list literal was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorsParseError {
    /// Input ended before the closing bracket or quote.
    UnexpectedEnd,
    /// An unexpected character was found at the given byte offset.
    UnexpectedChar { offset: usize, found: char },
    /// Closing delimiter does not match the opening one.
    MismatchedDelimiter { offset: usize },
    /// Non-whitespace content after the closing delimiter.
    TrailingInput { offset: usize },
}

impl fmt::Display for AuthorsParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorsParseError::UnexpectedEnd => write!(f, "unexpected end of input"),
            AuthorsParseError::UnexpectedChar { offset, found } => {
                write!(f, "unexpected character {found:?} at offset {offset}")
            }
            AuthorsParseError::MismatchedDelimiter { offset } => {
                write!(f, "mismatched closing delimiter at offset {offset}")
            }
            AuthorsParseError::TrailingInput { offset } => {
                write!(f, "trailing input at offset {offset}")
            }
        }
    }
}

impl std::error::Error for AuthorsParseError {}

/// What to return when a textual author list cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorsFallback {
    /// Drop the value and return an empty list.
    Empty,
    /// Keep the raw (trimmed) text as a single author.
    Verbatim,
}

/// Parse a list literal of strings such as `['A', "B"]` or `("A",)`.
pub fn parse_list_literal(input: &str) -> Result<Vec<String>, AuthorsParseError> {
    let mut chars = input.char_indices().peekable();
    skip_whitespace(&mut chars);

    let close = match chars.next() {
        Some((_, '[')) => ']',
        Some((_, '(')) => ')',
        Some((offset, found)) => return Err(AuthorsParseError::UnexpectedChar { offset, found }),
        None => return Err(AuthorsParseError::UnexpectedEnd),
    };

    let mut items = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        match chars.next() {
            Some((offset, c)) if c == ']' || c == ')' => {
                if c != close {
                    return Err(AuthorsParseError::MismatchedDelimiter { offset });
                }
                break;
            }
            Some((_, quote)) if quote == '\'' || quote == '"' => {
                items.push(parse_quoted(&mut chars, quote)?);
                skip_whitespace(&mut chars);
                match chars.next() {
                    Some((_, ',')) => continue,
                    Some((offset, c)) if c == ']' || c == ')' => {
                        if c != close {
                            return Err(AuthorsParseError::MismatchedDelimiter { offset });
                        }
                        break;
                    }
                    Some((offset, found)) => {
                        return Err(AuthorsParseError::UnexpectedChar { offset, found })
                    }
                    None => return Err(AuthorsParseError::UnexpectedEnd),
                }
            }
            Some((offset, found)) => return Err(AuthorsParseError::UnexpectedChar { offset, found }),
            None => return Err(AuthorsParseError::UnexpectedEnd),
        }
    }

    skip_whitespace(&mut chars);
    if let Some((offset, _)) = chars.next() {
        return Err(AuthorsParseError::TrailingInput { offset });
    }
    Ok(items)
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) {
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
}

fn parse_quoted(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
) -> Result<String, AuthorsParseError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            Some((_, c)) if c == quote => return Ok(out),
            Some((_, '\\')) => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, c @ ('\\' | '\'' | '"'))) => out.push(c),
                // Unknown escapes are kept as written.
                Some((_, c)) => {
                    out.push('\\');
                    out.push(c);
                }
                None => return Err(AuthorsParseError::UnexpectedEnd),
            },
            Some((_, c)) => out.push(c),
            None => return Err(AuthorsParseError::UnexpectedEnd),
        }
    }
}

/// Coerce a stored authors value into a clean list of names.
///
/// Lists pass through with each name trimmed. Text is parsed with
/// [`parse_list_literal`]; empty text yields an empty list and unparsable text
/// is handled according to `fallback`.
pub fn normalize_authors(value: &AuthorsField, fallback: AuthorsFallback) -> Vec<String> {
    match value {
        AuthorsField::Missing => Vec::new(),
        AuthorsField::List(names) => names.iter().map(|n| n.trim().to_string()).collect(),
        AuthorsField::Text(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            match parse_list_literal(trimmed) {
                Ok(names) => names.into_iter().map(|n| n.trim().to_string()).collect(),
                Err(e) => {
                    tracing::debug!("Unparsable authors value {:?}: {}", trimmed, e);
                    match fallback {
                        AuthorsFallback::Empty => Vec::new(),
                        AuthorsFallback::Verbatim => vec![trimmed.to_string()],
                    }
                }
            }
        }
    }
}
