//! A small CSS selector matcher.
//!
//! Supports what the composer needs: type selectors, `.class`, `[attr]`,
//! `[attr="v"]`, `[attr*="v"]`, the descendant combinator, and comma lists.

use std::str::FromStr;

use crate::error::PortError;

/// Something a selector can be matched against.
pub(crate) trait SelectorNode: Sized {
    /// Lower-case tag name.
    fn tag_name(&self) -> &str;
    /// Attribute value.
    fn attr(&self, name: &str) -> Option<String>;
    /// Parent element.
    fn parent_node(&self) -> Option<Self>;
}

// ============================================================================
// Parsed Selector
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn matches<N: SelectorNode>(&self, node: &N) -> bool {
        if let Some(tag) = &self.tag {
            if !node.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if !self.classes.is_empty() {
            let class_attr = node.attr("class").unwrap_or_default();
            let has = |wanted: &String| class_attr.split_whitespace().any(|c| c == wanted);
            if !self.classes.iter().all(has) {
                return false;
            }
        }

        self.attrs.iter().all(|m| match (&m.op, node.attr(&m.name)) {
            (_, None) => false,
            (AttrOp::Exists, Some(_)) => true,
            (AttrOp::Equals(v), Some(actual)) => &actual == v,
            (AttrOp::Contains(v), Some(actual)) => actual.contains(v.as_str()),
        })
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList {
    // Each entry is a chain of compounds joined by descendant combinators.
    alternatives: Vec<Vec<Compound>>,
}

impl SelectorList {
    /// Returns true if any alternative matches `node`.
    pub(crate) fn matches<N: SelectorNode>(&self, node: &N) -> bool {
        self.alternatives
            .iter()
            .any(|chain| matches_chain(chain, node))
    }
}

fn matches_chain<N: SelectorNode>(chain: &[Compound], node: &N) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !last.matches(node) {
        return false;
    }

    let mut cursor = node.parent_node();
    for compound in ancestors.iter().rev() {
        loop {
            let Some(candidate) = cursor else {
                return false;
            };
            cursor = candidate.parent_node();
            if compound.matches(&candidate) {
                break;
            }
        }
    }
    true
}

// ============================================================================
// Parsing
// ============================================================================

impl FromStr for SelectorList {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PortError::InvalidSelector(s.to_string());

        let alternatives = split_top_level(s, |c| c == ',')
            .into_iter()
            .map(|part| {
                let chain = split_top_level(part, char::is_whitespace)
                    .into_iter()
                    .filter(|c| !c.is_empty())
                    .map(parse_compound)
                    .collect::<Option<Vec<_>>>()?;
                (!chain.is_empty()).then_some(chain)
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        if alternatives.is_empty() {
            return Err(invalid());
        }
        Ok(Self { alternatives })
    }
}

/// Splits on `sep` outside brackets and quotes.
fn split_top_level(input: &str, sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && sep(c) => {
                parts.push(input[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(rest: &str) -> (&str, &str) {
    let end = rest
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map_or(rest.len(), |(i, _)| i);
    rest.split_at(end)
}

fn parse_compound(input: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = input;

    if rest.starts_with('*') {
        rest = &rest[1..];
    } else {
        let (tag, tail) = take_ident(rest);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = tail;
    }

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix('.') {
            let (class, tail) = take_ident(tail);
            if class.is_empty() {
                return None;
            }
            compound.classes.push(class.to_string());
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('[') {
            let close = closing_bracket(tail)?;
            compound.attrs.push(parse_attr(&tail[..close])?);
            rest = &tail[close + 1..];
        } else {
            return None;
        }
    }

    let empty = compound.tag.is_none() && compound.classes.is_empty() && compound.attrs.is_empty();
    (!empty || input == "*").then_some(compound)
}

fn closing_bracket(input: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_attr(inner: &str) -> Option<AttrMatch> {
    let Some(eq) = inner.find('=') else {
        let name = inner.trim();
        return (!name.is_empty() && name.chars().all(is_ident_char)).then(|| AttrMatch {
            name: name.to_string(),
            op: AttrOp::Exists,
        });
    };

    let (lhs, rhs) = (&inner[..eq], &inner[eq + 1..]);
    let (name, contains) = match lhs.strip_suffix('*') {
        Some(name) => (name.trim(), true),
        None => (lhs.trim(), false),
    };
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return None;
    }

    let rhs = rhs.trim();
    let value = ['"', '\'']
        .iter()
        .find_map(|q| rhs.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)))
        .unwrap_or(rhs)
        .to_string();

    Some(AttrMatch {
        name: name.to_string(),
        op: if contains {
            AttrOp::Contains(value)
        } else {
            AttrOp::Equals(value)
        },
    })
}
