//! Text rendering of patterns
//!
//! Identifiers are escaped only when unsafe, labels and relationship types are
//! always backtick-quoted. Inline content binds its values through the shared
//! [`ParameterTable`].

use super::{
    Direction, HopBound, Inline, NodePattern, Pattern, PatternElement, PatternError,
    RelationshipPattern,
};
use crate::parameters::ParameterTable;
use crate::predicate::{bind, Where, WhereParams};
use crate::utils::{escape_identifier, escape_label};

/// `(identifier:`Label` { inline })`
pub fn render_node(node: &NodePattern, table: &mut ParameterTable) -> Result<String, PatternError> {
    let mut head = node
        .identifier
        .as_deref()
        .map(escape_identifier)
        .unwrap_or_default();
    for label in &node.labels {
        head.push(':');
        head.push_str(&escape_label(label));
    }
    let inline = render_inline(&node.inline, table)?;
    Ok(format!("({})", join_head_and_inline(head, inline)))
}

/// `-[identifier:`TYPE`*min..max { inline }]->`
pub fn render_relationship(
    rel: &RelationshipPattern,
    table: &mut ParameterTable,
) -> Result<String, PatternError> {
    let mut head = rel
        .identifier
        .as_deref()
        .map(escape_identifier)
        .unwrap_or_default();
    if let Some(name) = &rel.name {
        head.push(':');
        head.push_str(&escape_label(name));
    }
    head.push_str(&render_hops(rel.min_hops, rel.max_hops)?);
    let inline = render_inline(&rel.inline, table)?;

    let (left, right) = match rel.direction {
        Direction::Out => ("-", "->"),
        Direction::In => ("<-", "-"),
        Direction::None => ("-", "-"),
    };
    Ok(format!(
        "{}[{}]{}",
        left,
        join_head_and_inline(head, inline),
        right
    ))
}

pub fn render_pattern(pattern: &Pattern, table: &mut ParameterTable) -> Result<String, PatternError> {
    match pattern {
        Pattern::Node(node) => render_node(node, table),
        Pattern::Related(elements) => {
            validate_chain(elements)?;
            let mut rendered = String::new();
            for element in elements {
                match element {
                    PatternElement::Node(node) => rendered.push_str(&render_node(node, table)?),
                    PatternElement::Relationship(rel) => {
                        rendered.push_str(&render_relationship(rel, table)?)
                    }
                }
            }
            Ok(rendered)
        }
        Pattern::Multiple(nodes) => {
            if nodes.is_empty() {
                return Err(PatternError::EmptyPattern);
            }
            let rendered = nodes
                .iter()
                .map(|node| render_node(node, table))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rendered.join(", "))
        }
    }
}

/// Variable-length notation:
///
/// | min  | max       | output   |
/// |------|-----------|----------|
/// | -    | -         | ``       |
/// | N    | -         | `*N..`   |
/// | -    | M         | `*..M`   |
/// | N    | N         | `*N`     |
/// | N    | M         | `*N..M`  |
/// | -    | unbounded | `*`      |
/// | N    | unbounded | `*N..`   |
pub fn render_hops(min: Option<u32>, max: Option<HopBound>) -> Result<String, PatternError> {
    let rendered = match (min, max) {
        (None, None) => String::new(),
        (None, Some(HopBound::Unbounded)) => "*".to_string(),
        (Some(min), None) | (Some(min), Some(HopBound::Unbounded)) => format!("*{}..", min),
        (None, Some(HopBound::Finite(max))) => format!("*..{}", max),
        (Some(min), Some(HopBound::Finite(max))) => {
            if min > max {
                return Err(PatternError::InvalidHopRange { min, max });
            }
            if min == max {
                format!("*{}", min)
            } else {
                format!("*{}..{}", min, max)
            }
        }
    };
    Ok(rendered)
}

fn validate_chain(elements: &[PatternElement]) -> Result<(), PatternError> {
    if elements.is_empty() {
        return Err(PatternError::EmptyChain);
    }
    for (position, element) in elements.iter().enumerate() {
        let expects_node = position % 2 == 0;
        match (expects_node, element) {
            (true, PatternElement::Node(_)) | (false, PatternElement::Relationship(_)) => {}
            (true, _) => {
                return Err(PatternError::MalformedChain {
                    position,
                    expected: "node",
                })
            }
            (false, _) => {
                return Err(PatternError::MalformedChain {
                    position,
                    expected: "relationship",
                })
            }
        }
    }
    // a chain must end on a node
    if elements.len() % 2 == 0 {
        return Err(PatternError::MalformedChain {
            position: elements.len(),
            expected: "node",
        });
    }
    Ok(())
}

fn render_inline(inline: &Inline, table: &mut ParameterTable) -> Result<String, PatternError> {
    match inline {
        Inline::None => Ok(String::new()),
        Inline::Where(filters) if filters.is_empty() => Ok(String::new()),
        Inline::Where(filters) => {
            let predicate = Where::new(WhereParams::for_identifier("", filters.clone()), table)?;
            Ok(predicate.object()?)
        }
        Inline::Properties(properties) if properties.is_empty() => Ok(String::new()),
        Inline::Properties(properties) => {
            let mut parts = Vec::with_capacity(properties.len());
            for (property, value) in properties {
                let name = bind("", property, value, table)?;
                parts.push(format!("{}: ${}", escape_identifier(property), name));
            }
            Ok(format!("{{ {} }}", parts.join(", ")))
        }
    }
}

fn join_head_and_inline(head: String, inline: String) -> String {
    match (head.is_empty(), inline.is_empty()) {
        (_, true) => head,
        (true, false) => inline,
        (false, false) => format!("{} {}", head, inline),
    }
}
