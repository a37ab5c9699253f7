use log::{debug, trace};

use crate::error::{AnyVerError, Result};

/// Structural decomposition of a version string, as produced by [`parse`].
///
/// `format` regenerates the component-bearing prefix of the input when its
/// `{0}`, `{1}`, … placeholders are interpolated with `components`;
/// `suffix_format` regenerates the trailing text, with `{hash}` standing in
/// for the detected hash token. Literal braces in the input are kept
/// doubled so both templates stay unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    pub format: String,
    pub components: Vec<u64>,
    pub hash: Option<String>,
    pub suffix_format: String,
}

/// Decomposes a version string into numeric components, an optional
/// trailing hash token and the templates that reproduce the original text.
///
/// The hash is isolated before numeric extraction: hash-like tokens
/// usually contain digit runs that must not become version components.
pub fn parse(input: &str) -> Result<ParsedVersion> {
    let escaped = escape_braces(input);

    let (head, hash, tail) = match rightmost_hash_token(&escaped) {
        Some((start, end)) => {
            let token = &escaped[start..end];
            trace!("hash token {token:?} at bytes {start}..{end}");
            (&escaped[..start], Some(token.to_string()), &escaped[end..])
        }
        None => (escaped.as_str(), None, ""),
    };

    let (format, components, trailing) = extract_components(head)?;

    if components.is_empty() && hash.is_none() {
        return Err(AnyVerError::Unparseable(input.to_string()));
    }

    let mut suffix_format = trailing;
    if hash.is_some() {
        suffix_format.push_str("{hash}");
        suffix_format.push_str(tail);
    }

    debug!("parsed {input:?}: components {components:?}, format {format:?}, suffix {suffix_format:?}");
    Ok(ParsedVersion {
        format,
        components,
        hash,
        suffix_format,
    })
}

/// Doubles literal braces so they survive template interpolation.
fn escape_braces(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            _ => out.push(c),
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A hash token is a whole word of hex digits containing at least one
/// decimal digit and at least one letter a-f. A purely numeric word is a
/// version component, a purely alphabetic one is ordinary text.
fn is_hash_token(word: &str) -> bool {
    let mut has_digit = false;
    let mut has_letter = false;
    for c in word.chars() {
        match c {
            '0'..='9' => has_digit = true,
            'a'..='f' | 'A'..='F' => has_letter = true,
            _ => return false,
        }
    }
    has_digit && has_letter
}

/// Byte range of the rightmost hash-qualifying word. Build and commit
/// hashes trail the semantic version, so later candidates shadow earlier
/// ones.
fn rightmost_hash_token(text: &str) -> Option<(usize, usize)> {
    let mut best = None;
    let mut word_start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        if is_word_char(c) {
            word_start.get_or_insert(i);
        } else if let Some(start) = word_start.take()
            && is_hash_token(&text[start..i])
        {
            best = Some((start, i));
        }
    }
    if let Some(start) = word_start
        && is_hash_token(&text[start..])
    {
        best = Some((start, text.len()));
    }
    best
}

/// Replaces every maximal decimal digit run in `head` with a `{i}`
/// placeholder. Returns the format template (up to the end of the last
/// placeholder), the component values, and the literal text left after the
/// last component.
fn extract_components(head: &str) -> Result<(String, Vec<u64>, String)> {
    let bytes = head.as_bytes();
    let mut out = String::with_capacity(head.len());
    let mut components: Vec<u64> = Vec::new();
    let mut format_end = 0;
    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let run_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let run = &head[run_start..i];
            let value: u64 = run
                .parse()
                .map_err(|_| AnyVerError::ComponentOverflow(run.to_string()))?;
            out.push_str(&head[literal_start..run_start]);
            let index = components.len();
            out.push_str(&format!("{{{index}}}"));
            format_end = out.len();
            components.push(value);
            literal_start = i;
        } else {
            i += 1;
        }
    }
    out.push_str(&head[literal_start..]);

    let trailing = out[format_end..].to_string();
    out.truncate(format_end);
    Ok((out, components, trailing))
}
