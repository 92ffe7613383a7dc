use crate::registry::{ElementKind, Registry};
use serde::Serialize;

/// JSON view of a registry: `{ "elements": [ { id, type, text, position } ] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualRepresentation {
    pub elements: Vec<ElementDump>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementDump {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub text: String,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl VisualRepresentation {
    pub fn from_registry(registry: &Registry) -> Self {
        let elements = registry
            .snapshot()
            .into_iter()
            .map(|view| ElementDump {
                id: view.id,
                kind: view.kind,
                text: view.text,
                position: Position {
                    x: view.geometry.x,
                    y: view.geometry.y,
                    width: view.geometry.width,
                    height: view.geometry.height,
                },
            })
            .collect();
        Self { elements }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::IconMap;
    use crate::config::Config;
    use crate::deck::build_flowchart;
    use serde_json::json;

    #[test]
    fn snapshot_matches_export_schema() {
        let registry = build_flowchart(
            "flowchart TD\nA[Start]\nB[End]\nA-->B",
            &IconMap::new(),
            &Config::default(),
        );
        let value = serde_json::to_value(VisualRepresentation::from_registry(&registry)).unwrap();
        assert_eq!(
            value,
            json!({
                "elements": [
                    {"id": "A", "type": "shape", "text": "Start",
                     "position": {"x": 1.0, "y": 2.0, "width": 2.0, "height": 1.0}},
                    {"id": "B", "type": "shape", "text": "End",
                     "position": {"x": 3.5, "y": 2.0, "width": 2.0, "height": 1.0}},
                    {"id": "connector_A_B", "type": "connector", "text": "",
                     "position": {"x": 3.0, "y": 2.5, "width": 0.5, "height": 0.0}}
                ]
            })
        );
    }

    #[test]
    fn empty_registry_has_no_elements() {
        let json = VisualRepresentation::from_registry(&Registry::default())
            .to_json()
            .unwrap();
        assert!(json.contains("\"elements\": []"));
    }
}
