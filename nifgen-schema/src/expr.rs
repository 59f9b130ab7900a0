//! Parser for the condition and arithmetic expressions embedded in nif.xml.
//!
//! nif.xml writes operators either as `#TOKEN#` names or as their C
//! spellings, with optional grouping parentheses and a unary prefix such as
//! `!`. The output is a Rust infix expression over converted field names.
//! There is no precedence table; every compound operand is parenthesized.

use crate::error::ParseError;
use crate::naming::{convert_field_name, is_numeric};
use regex::Regex;
use std::sync::LazyLock;

/// Symbolic operator tokens and their native spellings.
pub const OPERATORS: [(&str, &str); 16] = [
    ("#ADD#", "+"),
    ("#SUB#", "-"),
    ("#MUL#", "*"),
    ("#DIV#", "/"),
    ("#AND#", "&&"),
    ("#OR#", "||"),
    ("#LT#", "<"),
    ("#GT#", ">"),
    ("#LTE#", "<="),
    ("#GTE#", ">="),
    ("#EQ#", "=="),
    ("#NEQ#", "!="),
    ("#RSH#", ">>"),
    ("#LSH#", "<<"),
    ("#BITAND#", "&"),
    ("#BITOR#", "|"),
];

/// A space-delimited token that may be a binary operator.
static OPERATOR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" (#[A-Z]+#|[^\w\s()#]+) ").expect("operator token pattern must compile")
});

/// Run of unary operators in front of a parenthesized group.
static UNARY_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[!~-]*").expect("unary prefix pattern must compile"));

/// The binary expression shapes, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Both operands parenthesized, optional unary prefix.
    Grouped,
    /// Whole binary expression parenthesized, optional unary prefix.
    Parenthesized,
    /// No parentheses and no unary prefix.
    Bare,
}

impl Shape {
    /// All shapes in matching order.
    pub const ORDER: [Shape; 3] = [Shape::Grouped, Shape::Parenthesized, Shape::Bare];
}

/// Result of splitting an expression into its binary parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMatch<'a> {
    /// Which shape matched.
    pub shape: Shape,
    /// Unary prefix, if the shape allows one and it is non-empty.
    pub unary: Option<&'a str>,
    /// Left operand text.
    pub lhs: &'a str,
    /// Operator text as written.
    pub op: &'a str,
    /// Right operand text.
    pub rhs: &'a str,
}

fn is_operator(op: &str) -> bool {
    OPERATORS
        .iter()
        .any(|(token, native)| op == *token || op == *native)
}

fn is_balanced(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Returns the inside of `text` if it is one parenthesized group.
fn unwrap_group(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('(')?.strip_suffix(')')?;
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}

/// Splits balanced `text` at its last operator outside any parentheses.
fn split_binary(text: &str) -> Option<(&str, &str, &str)> {
    let mut depths = Vec::with_capacity(text.len() + 1);
    let mut depth = 0usize;
    depths.push(0);
    for b in text.bytes() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        depths.push(depth);
    }

    let mut split = None;
    let mut from = 0;
    while let Some(caps) = OPERATOR_TOKEN.captures_at(text, from) {
        let (Some(whole), Some(op)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let (lhs, rhs) = (&text[..whole.start()], &text[whole.end()..]);
        if depths[whole.start()] == 0
            && is_operator(op.as_str())
            && !lhs.is_empty()
            && !rhs.is_empty()
        {
            split = Some((lhs, op.as_str(), rhs));
        }
        // Operator tokens share their delimiting spaces with neighbours.
        from = op.end();
    }
    split
}

/// Splits `text` using the first shape that matches it.
///
/// Operands always have balanced parentheses and operators are always
/// entries of [`OPERATORS`]; text that cannot be split that way matches no
/// shape.
#[must_use]
pub fn match_shape(text: &str) -> Option<ShapeMatch<'_>> {
    if !is_balanced(text) {
        return None;
    }
    let unary_len = UNARY_PREFIX.find(text).map_or(0, |m| m.end());
    let (unary, rest) = text.split_at(unary_len);
    let unary = Some(unary).filter(|u| !u.is_empty());

    if let Some((lhs, op, rhs)) = split_binary(rest) {
        if let (Some(lhs), Some(rhs)) = (unwrap_group(lhs), unwrap_group(rhs)) {
            return Some(ShapeMatch { shape: Shape::Grouped, unary, lhs, op, rhs });
        }
    }

    if let Some((lhs, op, rhs)) = unwrap_group(rest).and_then(split_binary) {
        return Some(ShapeMatch { shape: Shape::Parenthesized, unary, lhs, op, rhs });
    }

    split_binary(text).map(|(lhs, op, rhs)| ShapeMatch {
        shape: Shape::Bare,
        unary: None,
        lhs,
        op,
        rhs,
    })
}

/// Returns the native spelling of `op`, or `op` unchanged if it is not a
/// symbolic token.
#[must_use]
pub fn native_operator(op: &str) -> &str {
    OPERATORS
        .iter()
        .find(|(token, _)| *token == op)
        .map_or(op, |(_, native)| *native)
}

fn is_compound(text: &str) -> bool {
    text.contains('(')
        || text.contains(')')
        || OPERATORS
            .iter()
            .any(|(token, native)| text.contains(token) || text.contains(native))
}

fn wrap_operand(expr: String) -> String {
    if expr.contains(' ') && !expr.starts_with("FileVersion") {
        format!("({expr})")
    } else {
        expr
    }
}

/// Converts a nif.xml expression into a Rust expression.
///
/// # Arguments
/// * `text` - Expression as written in the XML
///
/// # Returns
/// The normalized infix expression.
///
/// # Errors
/// Returns [`ParseError::Expression`] if a compound expression (or one of
/// its operands) matches none of the recognized shapes.
pub fn parse_expression(text: &str) -> Result<String, ParseError> {
    if !is_compound(text) {
        return Ok(if is_numeric(text) {
            text.to_string()
        } else {
            convert_field_name(text)
        });
    }

    let matched = match_shape(text).ok_or_else(|| ParseError::expression(text))?;

    let lhs = wrap_operand(parse_expression(matched.lhs)?);
    let op = native_operator(matched.op);

    // `|` selects whichever side exists in the file; the right side is always
    // a vendor field, so only the left one is kept.
    if op.trim() == "|" {
        return Ok(lhs);
    }

    let rhs = wrap_operand(parse_expression(matched.rhs)?);

    let joined = format!("{lhs} {op} {rhs}");
    Ok(match matched.unary {
        Some(unary) => format!("{unary}({joined})"),
        None => joined,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> String {
        parse_expression(text).expect("expression should parse")
    }

    #[test]
    fn test_grouped_operands() {
        assert_eq!(parse("(fizz) #ADD# (buzz)"), "fizz + buzz");
    }

    #[test]
    fn test_unary_parenthesized() {
        assert_eq!(parse("!(fizz #ADD# buzz)"), "!(fizz + buzz)");
    }

    #[test]
    fn test_bare_binary() {
        assert_eq!(parse("fizz #AND# buzz"), "fizz && buzz");
    }

    #[test]
    fn test_token_and_native_spellings_agree() {
        for (token, native) in OPERATORS {
            let symbolic = parse(&format!("Num Vertices {token} 4"));
            let spelled = parse(&format!("Num Vertices {native} 4"));
            assert_eq!(symbolic, spelled, "operator {token}");
        }
    }

    #[test]
    fn test_leaves() {
        assert_eq!(parse("12"), "12");
        assert_eq!(parse("Num Vertices"), "num_vertices");
        assert_eq!(parse("#ARG#"), "arg");
        assert_eq!(parse(""), "");
    }

    #[test]
    fn test_field_names_are_converted_inside_expressions() {
        assert_eq!(parse("Has Vertex Colors #EQ# 1"), "has_vertex_colors == 1");
        assert_eq!(parse("#ARG# #NEQ# 0"), "arg != 0");
    }

    #[test]
    fn test_version_literal_is_not_parenthesized() {
        assert_eq!(
            parse("User Version #GTE# 10.0.1.2"),
            "user_version >= FileVersion(10, 0, 1, 2)"
        );
    }

    #[test]
    fn test_compound_operands_are_parenthesized() {
        assert_eq!(
            parse("(Num Vertices #GT# 0) #AND# (Has Normals)"),
            "(num_vertices > 0) && has_normals"
        );
        assert_eq!(
            parse("(Flags #BITAND# 4) #MUL# Count"),
            "(flags & 4) * count"
        );
    }

    #[test]
    fn test_unary_wraps_whole_expression() {
        assert_eq!(parse("!(Flags #BITAND# 1)"), "!(flags & 1)");
        assert_eq!(
            parse("!(Num Blocks #GT# 0)"),
            "!(num_blocks > 0)"
        );
    }

    #[test]
    fn test_bitor_keeps_left_operand() {
        assert_eq!(parse("Has UV | BS Num UV Sets"), "has_uv");
        assert_eq!(parse("Has UV #BITOR# BS Num UV Sets"), "has_uv");
    }

    #[test]
    fn test_shape_order() {
        let grouped = match_shape("!(a) #ADD# (b)").unwrap();
        assert_eq!(grouped.shape, Shape::Grouped);
        assert_eq!(grouped.unary, Some("!"));
        assert_eq!((grouped.lhs, grouped.op, grouped.rhs), ("a", "#ADD#", "b"));

        let parenthesized = match_shape("(a #SUB# b)").unwrap();
        assert_eq!(parenthesized.shape, Shape::Parenthesized);
        assert_eq!(parenthesized.unary, None);

        let bare = match_shape("a #MUL# b").unwrap();
        assert_eq!(bare.shape, Shape::Bare);
        assert_eq!(bare.unary, None);
    }

    #[test]
    fn test_nested_groups() {
        assert_eq!(
            parse("((Data Flags #BITOR# BS Data Flags) #BITAND# 4096) #NEQ# 0"),
            "(data_flags & 4096) != 0"
        );
        assert_eq!(
            parse("Num Vertices #MUL# (Num UV Sets #BITAND# 63)"),
            "num_vertices * (num_uv_sets & 63)"
        );
        assert_eq!(
            parse("(A #AND# B) #OR# (C #AND# (D #GT# 1))"),
            "(a && b) || (c && (d > 1))"
        );
    }

    #[test]
    fn test_last_top_level_operator_splits() {
        assert_eq!(parse("A #ADD# B #SUB# C"), "(a + b) - c");
    }

    #[test]
    fn test_parentheses_never_leak_into_operands() {
        let m = match_shape("((a #ADD# b) #MUL# c) #EQ# 0").unwrap();
        assert_eq!(m.shape, Shape::Bare);
        assert_eq!((m.lhs, m.op, m.rhs), ("((a #ADD# b) #MUL# c)", "#EQ#", "0"));
        assert_eq!(match_shape("a #ADD# (b"), None);
        assert_eq!(match_shape("a) #ADD# (b"), None);
    }

    #[test]
    fn test_malformed_expression_is_an_error() {
        assert!(matches!(
            parse_expression("(broken"),
            Err(ParseError::Expression { .. })
        ));
        assert!(matches!(
            parse_expression("((Flags #BITAND# 4) #NEQ# 0"),
            Err(ParseError::Expression { .. })
        ));
    }
}
