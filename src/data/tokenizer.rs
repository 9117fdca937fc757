//! Include-file tokenizer
//!
//! Splits raw include-file text into a flat token stream. Every delimiter is
//! emitted as its own token, every maximal run of non-delimiter characters as
//! one token, and whitespace is dropped. Quoted literals are kept opaque: no
//! delimiter splitting happens inside them.

use super::ParseError;

/// Delimiter class of the include format. The whitespace members separate
/// tokens without being emitted.
const DELIMITERS: &[char] = &['(', ')', '{', '}', '=', ',', ';', '\n', '\r', '\t', ' '];

/// Tokenize include-file text into slices of the source.
///
/// Quoted literals are returned with their quotes intact so the parser can
/// tell them apart from bare words. An unterminated quote fails the whole
/// input rather than silently splitting the tail.
pub fn tokenize(source: &str) -> Result<Vec<&str>, ParseError> {
    let mut tokens = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut chars = source.char_indices();

    while let Some((index, c)) = chars.next() {
        if c == '"' {
            if let Some(start) = run_start.take() {
                tokens.push(&source[start..index]);
            }

            let mut closing = None;
            for (end, candidate) in chars.by_ref() {
                if candidate == '"' {
                    closing = Some(end);
                    break;
                }
            }

            match closing {
                Some(end) => tokens.push(&source[index..=end]),
                None => return Err(ParseError::UnterminatedLiteral(index)),
            }
        } else if DELIMITERS.contains(&c) {
            if let Some(start) = run_start.take() {
                tokens.push(&source[start..index]);
            }
            if !c.is_whitespace() {
                tokens.push(&source[index..index + c.len_utf8()]);
            }
        } else if run_start.is_none() {
            run_start = Some(index);
        }
    }

    if let Some(start) = run_start {
        tokens.push(&source[start..]);
    }

    Ok(tokens)
}
