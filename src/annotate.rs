//! Icon annotation of node labels.
//!
//! An [`IconMap`] assigns a short icon token to node ids. It can be applied
//! structurally, while shapes are created ([`IconMap::label_for`]), or
//! textually, by rewriting node definitions in the flowchart source
//! ([`merge_icons`]). Both produce `"<icon> <label>"` for the same node.
//!
//! [`merge_icons`] does not detect labels it already prefixed; running it twice
//! on the same source prefixes twice.

use crate::error::{Error, Result};
use crate::ir::Node;
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconMap(IndexMap<String, String>);

impl IconMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a flat `{"nodeId": "icon"}` object. Anything else is rejected.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(Error::InvalidIconMap)
    }

    pub fn insert(&mut self, id: impl Into<String>, icon: impl Into<String>) {
        self.0.insert(id.into(), icon.into());
    }

    /// Tokens are trimmed; blank ones count as "no icon".
    pub fn icon(&self, id: &str) -> Option<&str> {
        self.0
            .get(id)
            .map(|icon| icon.trim())
            .filter(|icon| !icon.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(id, icon)| (id.as_str(), icon.as_str()))
    }

    /// Display text for `node` when its shape is created.
    pub fn label_for(&self, node: &Node) -> String {
        decorate_label(&node.label, self.icon(&node.id))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IconMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(id, icon)| (id.into(), icon.into()))
                .collect(),
        )
    }
}

/// Label text as the parser would read it back after [`merge_icons`].
pub fn decorate_label(label: &str, icon: Option<&str>) -> String {
    let label = label.trim();
    match icon {
        Some(icon) if label.is_empty() => icon.to_string(),
        Some(icon) => format!("{icon} {label}"),
        None => label.to_string(),
    }
}

/// Rewrites every `id[label]` definition for mapped ids to `id[<icon> label]`,
/// keeping any quotes around the label. All other text is left untouched.
pub fn merge_icons(source: &str, icons: &IconMap) -> String {
    let mut merged = source.to_string();
    for (id, _) in icons.iter() {
        let Some(icon) = icons.icon(id) else {
            continue;
        };
        let pattern = format!(
            r#"(?P<lead>^|[^A-Za-z0-9_-])(?P<open>{}\s*\[)(?:"(?P<dq>[^\[\]]+)"|'(?P<sq>[^\[\]]+)'|(?P<bare>[^\[\]]+))\]"#,
            regex::escape(id)
        );
        let Ok(node_re) = Regex::new(&format!("(?m){pattern}")) else {
            continue;
        };
        merged = node_re
            .replace_all(&merged, |caps: &Captures| {
                let (quote, label) = if let Some(m) = caps.name("dq") {
                    ("\"", m.as_str())
                } else if let Some(m) = caps.name("sq") {
                    ("'", m.as_str())
                } else {
                    ("", caps.name("bare").map_or("", |m| m.as_str()))
                };
                format!(
                    "{}{}{quote}{icon} {}{quote}]",
                    &caps["lead"],
                    &caps["open"],
                    label.trim()
                )
            })
            .into_owned();
    }
    merged
}
