use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    #[serde(rename = "TD")]
    TopDown,
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
    #[serde(rename = "BT")]
    BottomTop,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "TD" => Some(Self::TopDown),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            "BT" => Some(Self::BottomTop),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::TopDown => "TD",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
            Self::BottomTop => "BT",
        }
    }

    /// Row-based directions lay every node out on a single line.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    Solid,
    Dotted,
    Thick,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub directed: bool,
}

/// Parsed flowchart. `nodes` keeps first-mention order, which the layout
/// engine relies on for ordinal placement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagram {
    pub orientation: Option<Direction>,
    pub nodes: IndexMap<String, Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` if unseen and, when given, overwrites its label.
    pub fn ensure_node(&mut self, id: &str, label: Option<String>) {
        let entry = self.nodes.entry(id.to_string()).or_insert_with(|| Node {
            id: id.to_string(),
            label: id.to_string(),
            kind: NodeKind::Default,
        });
        if let Some(label) = label {
            entry.label = label;
        }
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.ensure_node(&edge.source, None);
        self.ensure_node(&edge.target, None);
        self.edges.push(edge);
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).map(|node| node.label.as_str())
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation.is_some_and(Direction::is_horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tokens_are_case_insensitive() {
        assert_eq!(Direction::from_token("lr"), Some(Direction::LeftRight));
        assert_eq!(Direction::from_token("Bt"), Some(Direction::BottomTop));
        assert_eq!(Direction::from_token("TB"), None);
        assert!(Direction::RightLeft.is_horizontal());
        assert!(!Direction::TopDown.is_horizontal());
    }

    #[test]
    fn ensure_node_keeps_first_mention_order() {
        let mut diagram = Diagram::new();
        diagram.ensure_node("B", None);
        diagram.ensure_node("A", Some("Alpha".to_string()));
        diagram.ensure_node("B", Some("Beta".to_string()));
        let ids: Vec<_> = diagram.nodes.keys().cloned().collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(diagram.label_of("B"), Some("Beta"));
    }

    #[test]
    fn edges_materialize_placeholder_nodes() {
        let mut diagram = Diagram::new();
        diagram.ensure_node("A", Some("Start".to_string()));
        diagram.add_edge(Edge {
            source: "A".to_string(),
            target: "Z".to_string(),
            label: None,
            style: EdgeStyle::Solid,
            directed: true,
        });
        assert_eq!(diagram.label_of("A"), Some("Start"));
        assert_eq!(diagram.label_of("Z"), Some("Z"));
    }
}
