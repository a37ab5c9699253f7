use std::fmt;

use crate::error::{AnyVerError, Result};

use super::storage::Components;

/// One piece of a format template: literal text, a positional component
/// placeholder `{N}`, or the `{hash}` placeholder. `{{` and `}}` decode to
/// literal braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    Literal(&'a str),
    Component(usize),
    Hash,
}

pub(crate) fn parse(template: &str) -> Result<Vec<Piece<'_>>> {
    let bytes = template.as_bytes();
    let mut pieces = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                push_literal(&mut pieces, template, literal_start, i);
                pieces.push(Piece::Literal(&template[i..i + 1]));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                let Some(close) = template[i + 1..].find('}').map(|p| i + 1 + p) else {
                    return Err(invalid(template, "unmatched '{'"));
                };
                let name = &template[i + 1..close];
                let piece = if name == "hash" {
                    Piece::Hash
                } else if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
                    let index = name
                        .parse::<usize>()
                        .map_err(|_| invalid(template, format!("placeholder index {name:?} is too large")))?;
                    Piece::Component(index)
                } else {
                    return Err(invalid(template, format!("unknown placeholder {name:?}")));
                };
                push_literal(&mut pieces, template, literal_start, i);
                pieces.push(piece);
                i = close + 1;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                push_literal(&mut pieces, template, literal_start, i);
                pieces.push(Piece::Literal(&template[i..i + 1]));
                i += 2;
                literal_start = i;
            }
            b'}' => return Err(invalid(template, "unmatched '}'")),
            _ => i += 1,
        }
    }
    push_literal(&mut pieces, template, literal_start, bytes.len());
    Ok(pieces)
}

/// A component template must reference exactly the indices `0..len` and may
/// not use `{hash}`.
pub(crate) fn validate_component_template(template: &str, len: usize) -> Result<()> {
    let mut referenced = vec![false; len];
    for piece in parse(template)? {
        match piece {
            Piece::Component(index) if index < len => referenced[index] = true,
            Piece::Component(index) => {
                return Err(invalid(
                    template,
                    format!("references component {index} but the version has {len} components"),
                ));
            }
            Piece::Hash => {
                return Err(invalid(
                    template,
                    "the hash placeholder is not allowed in a component format",
                ));
            }
            Piece::Literal(_) => {}
        }
    }
    if let Some(index) = referenced.iter().position(|seen| !seen) {
        return Err(invalid(template, format!("component {index} is never referenced")));
    }
    Ok(())
}

/// A suffix template may reference only `{hash}`.
pub(crate) fn validate_suffix_template(template: &str) -> Result<()> {
    for piece in parse(template)? {
        if let Piece::Component(index) = piece {
            return Err(invalid(
                template,
                format!("positional placeholder {{{index}}} is not allowed after the components"),
            ));
        }
    }
    Ok(())
}

pub(crate) fn render_into(
    f: &mut fmt::Formatter<'_>,
    template: &str,
    components: &Components,
    hash: Option<&str>,
) -> fmt::Result {
    let Ok(pieces) = parse(template) else {
        // templates are validated at construction
        return f.write_str(template);
    };
    for piece in pieces {
        match piece {
            Piece::Literal(text) => f.write_str(text)?,
            Piece::Component(index) => {
                if let Some(value) = components.get(index) {
                    write!(f, "{value}")?;
                }
            }
            Piece::Hash => {
                if let Some(hash) = hash {
                    f.write_str(hash)?;
                }
            }
        }
    }
    Ok(())
}

fn push_literal<'a>(pieces: &mut Vec<Piece<'a>>, template: &'a str, start: usize, end: usize) {
    if start < end {
        pieces.push(Piece::Literal(&template[start..end]));
    }
}

fn invalid(template: &str, reason: impl Into<String>) -> AnyVerError {
    AnyVerError::InvalidTemplate {
        template: template.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placeholders_and_literals() {
        let pieces = parse("{0}.{1}-x").unwrap();
        assert_eq!(
            pieces,
            vec![
                Piece::Component(0),
                Piece::Literal("."),
                Piece::Component(1),
                Piece::Literal("-x"),
            ]
        );
    }

    #[test]
    fn test_parse_escaped_braces() {
        let pieces = parse("{{{0}}}").unwrap();
        assert_eq!(
            pieces,
            vec![Piece::Literal("{"), Piece::Component(0), Piece::Literal("}")]
        );
    }

    #[test]
    fn test_parse_hash_placeholder() {
        let pieces = parse("-{hash}!").unwrap();
        assert_eq!(
            pieces,
            vec![Piece::Literal("-"), Piece::Hash, Piece::Literal("!")]
        );
    }

    #[test]
    fn test_parse_split_escape_pair() {
        // a format cut right after a placeholder can leave the escape pair
        // in the suffix half; each half must still parse on its own
        assert_eq!(parse("{0}.{{{1}").unwrap().len(), 4);
        assert_eq!(parse("}}").unwrap(), vec![Piece::Literal("}")]);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse("{0").is_err());
        assert!(parse("}x").is_err());
        assert!(parse("{nope}").is_err());
        assert!(parse("{}").is_err());
    }

    #[test]
    fn test_validate_component_template_arity() {
        assert!(validate_component_template("{0}.{1}", 2).is_ok());
        assert!(validate_component_template("{0}.{2}", 2).is_err());
        assert!(validate_component_template("{0}", 2).is_err());
        assert!(validate_component_template("{0}-{hash}", 1).is_err());
    }

    #[test]
    fn test_validate_suffix_template() {
        assert!(validate_suffix_template("").is_ok());
        assert!(validate_suffix_template("-{hash}").is_ok());
        assert!(validate_suffix_template("-beta").is_ok());
        assert!(validate_suffix_template("{0}").is_err());
    }
}
