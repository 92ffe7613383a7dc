//! Line-oriented recognizer for the flowchart subset.
//!
//! Input is free-form model output, so parsing never fails: every line is run
//! through [`LINE_RULES`] in order and the first rule that matches decides what
//! the line means. Lines no rule recognizes are dropped.

use crate::ir::{Diagram, Direction, Edge, EdgeStyle};
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)flowchart\s+(TD|LR|RL|BT)").unwrap());
static NODE_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<id>[A-Za-z0-9_-]+)\s*\[(?:"(?P<dq>[^\[\]]+)"|'(?P<sq>[^\[\]]+)'|(?P<bare>[^\[\]]+))\]"#,
    )
    .unwrap()
});
static CONNECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<source>[A-Za-z0-9_-]+)\s*(?P<arrow>--(?:[^-]+)?->|-->|==>|-.+->|=.+=>)(?:\|(?P<pipe>[^|]*)\|)? *(?P<target>[A-Za-z0-9_-]+)",
    )
    .unwrap()
});
static SIMPLE_CONNECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<source>[A-Za-z0-9_-]+)\s*-->\s*(?P<target>[A-Za-z0-9_-]+)").unwrap());
static SUBGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"subgraph\s+(?P<id>[A-Za-z0-9_-]+)").unwrap());

/// What a single recognized line contributes to the diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Node { id: String, label: String },
    Edge(Edge),
    Subgraph(String),
}

/// Line classifiers, tried in this order; the first match wins.
///
/// A node definition is checked before any connection pattern so that
/// `A[Start] --> B` registers `A` rather than being read as an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    NodeDefinition,
    Connection,
    SimpleConnection,
    Subgraph,
}

pub const LINE_RULES: [LineRule; 4] = [
    LineRule::NodeDefinition,
    LineRule::Connection,
    LineRule::SimpleConnection,
    LineRule::Subgraph,
];

impl LineRule {
    pub fn apply(self, line: &str) -> Option<Statement> {
        match self {
            Self::NodeDefinition => match_node_definition(line),
            Self::Connection => match_connection(line),
            Self::SimpleConnection => match_simple_connection(line),
            Self::Subgraph => SUBGRAPH_RE
                .captures(line)
                .map(|caps| Statement::Subgraph(caps["id"].to_string())),
        }
    }
}

/// Runs `line` through [`LINE_RULES`] and returns the first statement produced.
pub fn classify_line(line: &str) -> Option<(LineRule, Statement)> {
    LINE_RULES
        .iter()
        .find_map(|rule| rule.apply(line).map(|statement| (*rule, statement)))
}

pub fn parse_flowchart(input: &str) -> Diagram {
    let mut diagram = Diagram::new();

    if let Some(first) = input.lines().find(|line| !line.trim().is_empty()) {
        diagram.orientation = HEADER_RE
            .captures(first)
            .and_then(|caps| Direction::from_token(&caps[1]));
    }

    for (line_no, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || is_header_line(line) {
            continue;
        }

        match classify_line(line) {
            Some((rule, statement)) => {
                trace!("line {}: {:?}", line_no + 1, rule);
                match statement {
                    Statement::Node { id, label } => diagram.ensure_node(&id, Some(label)),
                    Statement::Edge(edge) => diagram.add_edge(edge),
                    Statement::Subgraph(_) => {}
                }
            }
            None => trace!("line {}: unrecognized, skipped", line_no + 1),
        }
    }

    debug!(
        "parsed flowchart: orientation={:?} nodes={} edges={}",
        diagram.orientation,
        diagram.nodes.len(),
        diagram.edges.len()
    );
    diagram
}

fn is_header_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.eq_ignore_ascii_case("flowchart"))
}

fn match_node_definition(line: &str) -> Option<Statement> {
    let caps = NODE_DEF_RE.captures(line)?;
    let label = caps
        .name("dq")
        .or_else(|| caps.name("sq"))
        .or_else(|| caps.name("bare"))?
        .as_str()
        .trim()
        .to_string();
    Some(Statement::Node {
        id: caps["id"].to_string(),
        label,
    })
}

fn match_connection(line: &str) -> Option<Statement> {
    let caps = CONNECTION_RE.captures(line)?;
    let arrow = &caps["arrow"];
    let label = caps
        .name("pipe")
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| inline_arrow_label(arrow))
        .filter(|label| !label.is_empty());
    Some(Statement::Edge(Edge {
        source: caps["source"].to_string(),
        target: caps["target"].to_string(),
        label,
        style: arrow_style(arrow),
        directed: arrow.ends_with('>'),
    }))
}

fn match_simple_connection(line: &str) -> Option<Statement> {
    let caps = SIMPLE_CONNECTION_RE.captures(line)?;
    Some(Statement::Edge(Edge {
        source: caps["source"].to_string(),
        target: caps["target"].to_string(),
        label: None,
        style: EdgeStyle::Solid,
        directed: true,
    }))
}

/// Text embedded between the dashes, e.g. `-- yes -->` or `-. maybe .->`.
fn inline_arrow_label(arrow: &str) -> Option<String> {
    let inner = arrow
        .trim_start_matches(['-', '=', '.'])
        .trim_end_matches(['-', '=', '.', '>'])
        .trim();
    (!inner.is_empty()).then(|| inner.to_string())
}

fn arrow_style(arrow: &str) -> EdgeStyle {
    if arrow.starts_with('=') {
        EdgeStyle::Thick
    } else if arrow.starts_with("-.") || arrow.ends_with(".->") {
        EdgeStyle::Dotted
    } else {
        EdgeStyle::Solid
    }
}
