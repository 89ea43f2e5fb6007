//! `${variable}` interpolation for entry-point templates.
//!
//! # Syntax
//!
//! - `${variable_name}` is replaced with the variable's value
//! - `$${escaped}` produces a literal `${escaped}`
//!
//! Go source rarely contains `${`, so templates are otherwise copied
//! through untouched.

use crate::error::{BuilderError, Result};
use std::collections::BTreeSet;

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied as is.
    Literal(String),
    /// A `${name}` reference.
    Variable(String),
}

/// Split `input` into literal text and variable references.
pub fn parse(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            literal.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                if chars.peek() == Some(&'{') {
                    // $${...} -> literal ${...}
                    chars.next();
                    literal.push_str("${");
                    for c in chars.by_ref() {
                        literal.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                } else {
                    literal.push_str("$$");
                }
            }
            Some('{') => {
                chars.next();
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }

                let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
                segments.push(Segment::Variable(name.trim().to_string()));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}

/// Names of all variables referenced by `input`.
pub fn variables(input: &str) -> BTreeSet<String> {
    parse(input)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Variable(name) => Some(name),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Replace every variable in `input` using `lookup`.
///
/// # Errors
///
/// Returns `TemplateError` naming the first variable `lookup` cannot resolve.
pub fn render<F>(input: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(input.len());

    for segment in parse(input) {
        match segment {
            Segment::Literal(text) => output.push_str(&text),
            Segment::Variable(name) => {
                let value = lookup(&name).ok_or_else(|| BuilderError::TemplateError {
                    message: format!("unresolved variable ${{{name}}}"),
                })?;
                output.push_str(&value);
            }
        }
    }

    Ok(output)
}
