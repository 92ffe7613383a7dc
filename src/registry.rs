//! Owning store of the visual elements on one slide.
//!
//! Elements are keyed by id and kept in insertion order, which doubles as
//! z-order. Re-creating an element under an existing id replaces it in place.

use crate::annotate::IconMap;
use crate::error::{Error, Result};
use crate::ir::Diagram;
use crate::layout::{self, ConnectorGeometry, LayoutConfig, Rect};
use crate::theme::{ConnectorStyle, HAlign, ShapeStyle, TextStyle, Theme, VAlign};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    RoundRect,
    Ellipse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowType {
    #[default]
    Arrow,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    pub id: String,
    pub kind: ShapeKind,
    pub text: String,
    pub geometry: Rect,
    pub style: ShapeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorElement {
    pub id: String,
    pub from: String,
    pub to: String,
    pub geometry: ConnectorGeometry,
    pub arrow: ArrowType,
    pub style: ConnectorStyle,
}

impl ConnectorElement {
    pub fn is_directed(&self) -> bool {
        self.arrow == ArrowType::Arrow
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VisualElement {
    Shape(ShapeElement),
    Connector(ConnectorElement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Shape,
    Connector,
}

impl VisualElement {
    pub fn id(&self) -> &str {
        match self {
            Self::Shape(shape) => &shape.id,
            Self::Connector(connector) => &connector.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Shape(_) => ElementKind::Shape,
            Self::Connector(_) => ElementKind::Connector,
        }
    }

    /// Connectors carry no text.
    pub fn text(&self) -> &str {
        match self {
            Self::Shape(shape) => &shape.text,
            Self::Connector(_) => "",
        }
    }

    pub fn geometry(&self) -> Rect {
        match self {
            Self::Shape(shape) => shape.geometry,
            Self::Connector(connector) => connector.geometry.bounds(),
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeElement> {
        match self {
            Self::Shape(shape) => Some(shape),
            Self::Connector(_) => None,
        }
    }

    pub fn as_connector(&self) -> Option<&ConnectorElement> {
        match self {
            Self::Connector(connector) => Some(connector),
            Self::Shape(_) => None,
        }
    }
}

/// Caller overrides for [`Registry::create_shape`]; `None` falls back to the
/// theme and layout defaults.
#[derive(Debug, Clone, Default)]
pub struct ShapeOptions {
    pub id: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fill_color: Option<String>,
    pub line_color: Option<String>,
    pub line_width: Option<f32>,
    pub font_size: Option<f32>,
    pub text_color: Option<String>,
    pub align: Option<HAlign>,
    pub valign: Option<VAlign>,
}

impl ShapeOptions {
    pub fn at(id: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: Some(id.into()),
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectorOptions {
    pub arrow: ArrowType,
    pub line_color: Option<String>,
    pub line_width: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub text_color: Option<String>,
    pub fill_color: Option<String>,
    pub align: Option<HAlign>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub text: String,
    pub geometry: Rect,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HistoryEntry {
    AddShape { id: String, kind: ShapeKind },
    AddConnector { id: String, from: String, to: String },
    AddText { text: String },
    BuildFromDiagram { nodes: usize, edges: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildSummary {
    pub shapes: usize,
    pub connectors: usize,
    /// `(source, target)` pairs dropped because an endpoint had no shape.
    pub skipped: Vec<(String, String)>,
}

pub fn connector_id(from: &str, to: &str) -> String {
    format!("connector_{from}_{to}")
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    elements: IndexMap<String, VisualElement>,
    texts: Vec<TextBox>,
    history: Vec<HistoryEntry>,
    next_shape: usize,
    theme: Theme,
    layout: LayoutConfig,
}

impl Registry {
    pub fn new(theme: Theme, layout: LayoutConfig) -> Self {
        Self {
            theme,
            layout,
            ..Self::default()
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&VisualElement> {
        self.elements.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut VisualElement> {
        self.elements.get_mut(id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &VisualElement> {
        self.elements.values()
    }

    pub fn texts(&self) -> &[TextBox] {
        &self.texts
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Drops all flowchart elements; free text boxes and history survive.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn create_shape(&mut self, kind: ShapeKind, text: &str, options: ShapeOptions) -> String {
        let id = options.id.unwrap_or_else(|| {
            self.next_shape += 1;
            format!("shape_{}", self.next_shape)
        });
        let defaults = &self.layout.default_shape;
        let geometry = Rect::new(
            options.x.unwrap_or(defaults.x),
            options.y.unwrap_or(defaults.y),
            options.width.unwrap_or(defaults.width).max(0.0),
            options.height.unwrap_or(defaults.height).max(0.0),
        );
        let base = &self.theme.shape;
        let style = ShapeStyle {
            fill_color: options.fill_color.unwrap_or_else(|| base.fill_color.clone()),
            line_color: options.line_color.unwrap_or_else(|| base.line_color.clone()),
            line_width: options.line_width.unwrap_or(base.line_width),
            font_size: options.font_size.unwrap_or(base.font_size),
            text_color: options.text_color.unwrap_or_else(|| base.text_color.clone()),
            align: options.align.unwrap_or(base.align),
            valign: options.valign.unwrap_or(base.valign),
        };
        self.elements.insert(
            id.clone(),
            VisualElement::Shape(ShapeElement {
                id: id.clone(),
                kind,
                text: text.to_string(),
                geometry,
                style,
            }),
        );
        self.history.push(HistoryEntry::AddShape {
            id: id.clone(),
            kind,
        });
        id
    }

    /// Connects two existing shapes. Unlike the parser, nothing is created on
    /// demand: a missing endpoint, or one naming a connector, is an error.
    pub fn create_connector(&mut self, from: &str, to: &str, options: ConnectorOptions) -> Result<String> {
        let source = self.elements.get(from).and_then(VisualElement::as_shape);
        let target = self.elements.get(to).and_then(VisualElement::as_shape);
        let (Some(source), Some(target)) = (source, target) else {
            return Err(Error::MissingEndpoint {
                from: from.to_string(),
                to: to.to_string(),
            });
        };
        let geometry = layout::connector_geometry(&source.geometry, &target.geometry);
        let base = &self.theme.connector;
        let style = ConnectorStyle {
            line_color: options.line_color.unwrap_or_else(|| base.line_color.clone()),
            line_width: options.line_width.unwrap_or(base.line_width),
        };
        let id = connector_id(from, to);
        self.elements.insert(
            id.clone(),
            VisualElement::Connector(ConnectorElement {
                id: id.clone(),
                from: from.to_string(),
                to: to.to_string(),
                geometry,
                arrow: options.arrow,
                style,
            }),
        );
        self.history.push(HistoryEntry::AddConnector {
            id: id.clone(),
            from: from.to_string(),
            to: to.to_string(),
        });
        Ok(id)
    }

    pub fn add_text(&mut self, text: &str, options: TextOptions) {
        let defaults = &self.layout.text_box;
        let base = &self.theme.text;
        self.texts.push(TextBox {
            text: text.to_string(),
            geometry: Rect::new(
                options.x.unwrap_or(defaults.x),
                options.y.unwrap_or(defaults.y),
                options.width.unwrap_or(defaults.width).max(0.0),
                options.height.unwrap_or(defaults.height).max(0.0),
            ),
            style: TextStyle {
                font_size: options.font_size.unwrap_or(base.font_size),
                bold: options.bold.unwrap_or(base.bold),
                text_color: options.text_color.or_else(|| base.text_color.clone()),
                fill_color: options.fill_color.or_else(|| base.fill_color.clone()),
                align: options.align.or(base.align),
            },
        });
        self.history.push(HistoryEntry::AddText {
            text: text.to_string(),
        });
    }

    /// Replaces the flowchart with one shape per node (first-mention order)
    /// and one connector per edge. Edges whose endpoints have no shape are
    /// skipped with a warning instead of failing the build.
    pub fn build_from_diagram(&mut self, diagram: &Diagram, icons: &IconMap) -> BuildSummary {
        self.clear();
        let mut summary = BuildSummary::default();

        let placed = layout::place(diagram, &self.layout);
        for (node, rect) in diagram.nodes.values().zip(placed.values()) {
            let text = icons.label_for(node);
            self.create_shape(ShapeKind::Rectangle, &text, ShapeOptions::at(&node.id, *rect));
            summary.shapes += 1;
        }

        for edge in &diagram.edges {
            let options = ConnectorOptions {
                arrow: if edge.directed {
                    ArrowType::Arrow
                } else {
                    ArrowType::Line
                },
                ..ConnectorOptions::default()
            };
            match self.create_connector(&edge.source, &edge.target, options) {
                Ok(_) => summary.connectors += 1,
                Err(err) => {
                    warn!("skipping connection {} -> {}: {err}", edge.source, edge.target);
                    summary
                        .skipped
                        .push((edge.source.clone(), edge.target.clone()));
                }
            }
        }

        self.history.push(HistoryEntry::BuildFromDiagram {
            nodes: diagram.nodes.len(),
            edges: diagram.edges.len(),
        });
        debug!(
            "built flowchart: {} shapes, {} connectors, {} skipped",
            summary.shapes,
            summary.connectors,
            summary.skipped.len()
        );
        summary
    }

    /// Flat view of every element: id, kind, text and geometry. Styles are
    /// left out.
    pub fn snapshot(&self) -> Vec<ElementView> {
        self.elements
            .values()
            .map(|element| ElementView {
                id: element.id().to_string(),
                kind: element.kind(),
                text: element.text().to_string(),
                geometry: element.geometry(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementView {
    pub id: String,
    pub kind: ElementKind,
    pub text: String,
    pub geometry: Rect,
}
