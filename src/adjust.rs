//! Incremental edits against a built [`Registry`].
//!
//! Commands arrive as a JSON array of objects tagged by `type`. They run in
//! order and are not rolled back: when one fails, everything before it stays
//! applied. Move, resize and restyle commands aimed at an unknown id do
//! nothing beyond logging a warning.

use crate::error::{Error, Result};
use crate::registry::{ArrowType, ConnectorOptions, Registry, ShapeKind, ShapeOptions, VisualElement};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Adjustment {
    MoveNode {
        node_id: String,
        x: f32,
        y: f32,
    },
    ResizeNode {
        node_id: String,
        width: f32,
        height: f32,
    },
    ChangeNodeStyle {
        node_id: String,
        fill: Option<String>,
        line: Option<String>,
        line_width: Option<f32>,
        font_size: Option<f32>,
    },
    AddNode {
        node_id: Option<String>,
        text: String,
        shape: Option<ShapeKind>,
        x: Option<f32>,
        y: Option<f32>,
        width: Option<f32>,
        height: Option<f32>,
        fill: Option<String>,
        line: Option<String>,
        line_width: Option<f32>,
        font_size: Option<f32>,
        text_color: Option<String>,
    },
    AddConnector {
        from_id: String,
        to_id: String,
        arrow_type: Option<ArrowType>,
        line_color: Option<String>,
        line_width: Option<f32>,
    },
}

/// Validates a JSON array of adjustment commands.
pub fn parse_adjustments(input: &str) -> Result<Vec<Adjustment>> {
    serde_json::from_str(input).map_err(Error::InvalidAdjustments)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub applied: usize,
    /// Ids named by move/resize/style commands that matched nothing.
    pub unknown_ids: Vec<String>,
}

pub fn apply(registry: &mut Registry, commands: &[Adjustment]) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();
    for command in commands {
        if apply_one(registry, command)? {
            report.applied += 1;
        } else if let Some(id) = command.target_id() {
            warn!("adjustment {} targets unknown element {id}; ignored", command.name());
            report.unknown_ids.push(id.to_string());
        }
    }
    debug!(
        "applied {} of {} adjustments",
        report.applied,
        commands.len()
    );
    Ok(report)
}

impl Adjustment {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveNode { .. } => "moveNode",
            Self::ResizeNode { .. } => "resizeNode",
            Self::ChangeNodeStyle { .. } => "changeNodeStyle",
            Self::AddNode { .. } => "addNode",
            Self::AddConnector { .. } => "addConnector",
        }
    }

    /// The existing element a command edits, for commands that edit one.
    fn target_id(&self) -> Option<&str> {
        match self {
            Self::MoveNode { node_id, .. }
            | Self::ResizeNode { node_id, .. }
            | Self::ChangeNodeStyle { node_id, .. } => Some(node_id.as_str()),
            Self::AddNode { .. } | Self::AddConnector { .. } => None,
        }
    }
}

/// Returns `Ok(false)` when the command's target does not exist.
fn apply_one(registry: &mut Registry, command: &Adjustment) -> Result<bool> {
    match command {
        Adjustment::MoveNode { node_id, x, y } => {
            let Some(element) = registry.get_mut(node_id) else {
                return Ok(false);
            };
            match element {
                VisualElement::Shape(shape) => {
                    shape.geometry.x = *x;
                    shape.geometry.y = *y;
                }
                VisualElement::Connector(connector) => {
                    connector.geometry.anchor_x = *x;
                    connector.geometry.anchor_y = *y;
                }
            }
        }
        Adjustment::ResizeNode {
            node_id,
            width,
            height,
        } => {
            let Some(element) = registry.get_mut(node_id) else {
                return Ok(false);
            };
            if *width < 0.0 || *height < 0.0 {
                warn!("resizeNode {node_id}: negative size {width}x{height} clamped to zero");
            }
            let (width, height) = (width.max(0.0), height.max(0.0));
            match element {
                VisualElement::Shape(shape) => {
                    shape.geometry.width = width;
                    shape.geometry.height = height;
                }
                VisualElement::Connector(connector) => {
                    let geometry = &mut connector.geometry;
                    geometry.dx = if geometry.dx < 0.0 { -width } else { width };
                    geometry.dy = if geometry.dy < 0.0 { -height } else { height };
                }
            }
        }
        Adjustment::ChangeNodeStyle {
            node_id,
            fill,
            line,
            line_width,
            font_size,
        } => {
            let Some(element) = registry.get_mut(node_id) else {
                return Ok(false);
            };
            match element {
                VisualElement::Shape(shape) => {
                    let style = &mut shape.style;
                    if let Some(fill) = fill {
                        style.fill_color = fill.clone();
                    }
                    if let Some(line) = line {
                        style.line_color = line.clone();
                        style.line_width = line_width.unwrap_or(1.0);
                    } else if let Some(width) = line_width {
                        style.line_width = *width;
                    }
                    if let Some(size) = font_size {
                        style.font_size = *size;
                    }
                }
                VisualElement::Connector(connector) => {
                    let style = &mut connector.style;
                    if let Some(line) = line {
                        style.line_color = line.clone();
                        style.line_width = line_width.unwrap_or(1.0);
                    } else if let Some(width) = line_width {
                        style.line_width = *width;
                    }
                }
            }
        }
        Adjustment::AddNode {
            node_id,
            text,
            shape,
            x,
            y,
            width,
            height,
            fill,
            line,
            line_width,
            font_size,
            text_color,
        } => {
            registry.create_shape(
                shape.unwrap_or_default(),
                text,
                ShapeOptions {
                    id: node_id.clone(),
                    x: *x,
                    y: *y,
                    width: *width,
                    height: *height,
                    fill_color: fill.clone(),
                    line_color: line.clone(),
                    line_width: *line_width,
                    font_size: *font_size,
                    text_color: text_color.clone(),
                    ..ShapeOptions::default()
                },
            );
        }
        Adjustment::AddConnector {
            from_id,
            to_id,
            arrow_type,
            line_color,
            line_width,
        } => {
            registry.create_connector(
                from_id,
                to_id,
                ConnectorOptions {
                    arrow: arrow_type.unwrap_or_default(),
                    line_color: line_color.clone(),
                    line_width: *line_width,
                },
            )?;
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::IconMap;
    use crate::config::Config;
    use crate::layout::Rect;
    use crate::parser::parse_flowchart;

    fn built() -> Registry {
        let config = Config::default();
        let mut registry = Registry::new(config.theme, config.layout);
        let diagram = parse_flowchart("flowchart TD\nA[Start]\nB[End]\nA-->B");
        registry.build_from_diagram(&diagram, &IconMap::new());
        registry
    }

    #[test]
    fn parse_adjustment_payload() {
        let commands = parse_adjustments(
            r#"[
                {"type": "moveNode", "nodeId": "A", "x": 4, "y": 5.5},
                {"type": "changeNodeStyle", "nodeId": "B", "fill": "FF0000"},
                {"type": "addNode", "nodeId": "C", "text": "Extra"},
                {"type": "addConnector", "fromId": "B", "toId": "C", "arrowType": "line"}
            ]"#,
        )
        .unwrap();
        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[0],
            Adjustment::MoveNode {
                node_id: "A".to_string(),
                x: 4.0,
                y: 5.5
            }
        );
        assert!(matches!(
            &commands[3],
            Adjustment::AddConnector { arrow_type: Some(ArrowType::Line), .. }
        ));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(matches!(
            parse_adjustments(r#"[{"type": "moveNode", "nodeId": "A", "x": 1}]"#),
            Err(Error::InvalidAdjustments(_))
        ));
        assert!(parse_adjustments(r#"[{"type": "explode", "nodeId": "A"}]"#).is_err());
        assert!(parse_adjustments(r#"{"type": "moveNode"}"#).is_err());
    }

    #[test]
    fn move_resize_and_restyle() {
        let mut registry = built();
        let commands = vec![
            Adjustment::MoveNode {
                node_id: "A".to_string(),
                x: 5.0,
                y: 4.0,
            },
            Adjustment::ResizeNode {
                node_id: "B".to_string(),
                width: 3.0,
                height: 1.5,
            },
            Adjustment::ChangeNodeStyle {
                node_id: "A".to_string(),
                fill: Some("00FF00".to_string()),
                line: Some("000000".to_string()),
                line_width: None,
                font_size: Some(16.0),
            },
        ];
        let report = apply(&mut registry, &commands).unwrap();
        assert_eq!(report.applied, 3);

        let a = registry.get("A").and_then(VisualElement::as_shape).unwrap();
        assert_eq!(a.geometry, Rect::new(5.0, 4.0, 2.0, 1.0));
        assert_eq!(a.style.fill_color, "00FF00");
        assert_eq!(a.style.line_color, "000000");
        assert_eq!(a.style.line_width, 1.0);
        assert_eq!(a.style.font_size, 16.0);
        assert_eq!(a.style.text_color, "FFFFFF");
        assert_eq!(registry.get("B").map(VisualElement::geometry), Some(Rect::new(3.5, 2.0, 3.0, 1.5)));
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let mut registry = built();
        let before = registry.snapshot();
        let commands = vec![
            Adjustment::MoveNode {
                node_id: "Nope".to_string(),
                x: 9.0,
                y: 9.0,
            },
            Adjustment::ResizeNode {
                node_id: "Nope".to_string(),
                width: 1.0,
                height: 1.0,
            },
        ];
        let report = apply(&mut registry, &commands).unwrap();
        assert_eq!(report.applied, 0);
        assert_eq!(report.unknown_ids, vec!["Nope", "Nope"]);
        assert_eq!(registry.snapshot(), before);
    }

    #[test]
    fn add_node_then_connect() {
        let mut registry = built();
        let commands = parse_adjustments(
            r#"[
                {"type": "addNode", "nodeId": "C", "text": "Review", "x": 6, "y": 2},
                {"type": "addConnector", "fromId": "B", "toId": "C"}
            ]"#,
        )
        .unwrap();
        apply(&mut registry, &commands).unwrap();
        let c = registry.get("C").and_then(VisualElement::as_shape).unwrap();
        assert_eq!(c.geometry, Rect::new(6.0, 2.0, 2.0, 1.0));
        assert_eq!(c.style.fill_color, "4472C4");
        assert_eq!(c.style.font_size, 12.0);
        let connector = registry
            .get("connector_B_C")
            .and_then(VisualElement::as_connector)
            .unwrap();
        assert!(connector.is_directed());
    }

    #[test]
    fn failing_connector_stops_without_rollback() {
        let mut registry = built();
        let commands = vec![
            Adjustment::MoveNode {
                node_id: "A".to_string(),
                x: 2.0,
                y: 2.0,
            },
            Adjustment::AddConnector {
                from_id: "A".to_string(),
                to_id: "Typo".to_string(),
                arrow_type: None,
                line_color: None,
                line_width: None,
            },
            Adjustment::MoveNode {
                node_id: "B".to_string(),
                x: 8.0,
                y: 8.0,
            },
        ];
        let err = apply(&mut registry, &commands).unwrap_err();
        assert!(matches!(err, Error::MissingEndpoint { .. }));
        assert_eq!(registry.get("A").map(|e| e.geometry().x), Some(2.0));
        assert_eq!(registry.get("B").map(|e| e.geometry().x), Some(3.5));
    }

    #[test]
    fn negative_resize_is_clamped() {
        let mut registry = built();
        apply(
            &mut registry,
            &[Adjustment::ResizeNode {
                node_id: "A".to_string(),
                width: -1.0,
                height: 2.0,
            }],
        )
        .unwrap();
        assert_eq!(registry.get("A").map(|e| e.geometry().width), Some(0.0));
    }
}
