//! Slides handed to a [`PresentationWriter`].

use crate::annotate::{IconMap, merge_icons};
use crate::collab::{FlowchartDraft, PresentationWriter};
use crate::config::Config;
use crate::parser::parse_flowchart;
use crate::registry::{ConnectorElement, Registry, ShapeElement, TextBox, TextOptions, VisualElement};
use crate::theme::TextStyle;
use serde::Serialize;

pub const TITLE_SLIDE: &str = "Flowchart Presentation";
pub const FLOWCHART_SLIDE: &str = "Flowchart";

/// A drawing instruction for the file writer, in z-order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "primitive", rename_all = "lowercase")]
pub enum SlidePrimitive {
    Title {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    Text(TextBox),
    Shape(ShapeElement),
    Connector(ConnectorElement),
}

#[derive(Debug, Clone)]
pub struct Slide {
    pub title: Option<String>,
    pub registry: Registry,
}

impl Slide {
    pub fn primitives(&self) -> Vec<SlidePrimitive> {
        let mut primitives = Vec::new();
        if let Some(title) = &self.title {
            let layout = self.registry.layout_config();
            primitives.push(SlidePrimitive::Title {
                text: title.clone(),
                x: layout.title_x,
                y: layout.title_y,
                style: self.registry.theme().title.clone(),
            });
        }
        primitives.extend(self.registry.texts().iter().cloned().map(SlidePrimitive::Text));
        primitives.extend(self.registry.elements().map(|element| match element {
            VisualElement::Shape(shape) => SlidePrimitive::Shape(shape.clone()),
            VisualElement::Connector(connector) => SlidePrimitive::Connector(connector.clone()),
        }));
        primitives
    }
}

#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
    config: Config,
}

impl Deck {
    pub fn new(config: Config) -> Self {
        Self {
            slides: Vec::new(),
            config,
        }
    }

    /// Appends a slide; an empty title means no title.
    pub fn create_slide(&mut self, title: &str) -> &mut Slide {
        self.slides.push(Slide {
            title: (!title.is_empty()).then(|| title.to_string()),
            registry: Registry::new(self.config.theme.clone(), self.config.layout.clone()),
        });
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// The registry of the most recent flowchart slide.
    pub fn flowchart(&self) -> Option<&Registry> {
        self.slides
            .iter()
            .rev()
            .find(|slide| slide.title.as_deref() == Some(FLOWCHART_SLIDE))
            .map(|slide| &slide.registry)
    }

    pub fn flowchart_mut(&mut self) -> Option<&mut Registry> {
        self.slides
            .iter_mut()
            .rev()
            .find(|slide| slide.title.as_deref() == Some(FLOWCHART_SLIDE))
            .map(|slide| &mut slide.registry)
    }

    /// Summary slide followed by the flowchart slide. Icons are merged into
    /// the flowchart text first, so shapes are built without a second prefix.
    pub fn flowchart_presentation(draft: &FlowchartDraft, icons: &IconMap, config: Config) -> Self {
        let mut deck = Self::new(config);
        let summary = if draft.summary.trim().is_empty() {
            "Generated Flowchart"
        } else {
            draft.summary.as_str()
        };
        let text_box = deck.config.layout.text_box;
        deck.create_slide(TITLE_SLIDE).registry.add_text(
            summary,
            TextOptions {
                x: Some(text_box.x),
                y: Some(text_box.y),
                width: Some(text_box.width),
                height: Some(text_box.height),
                font_size: Some(14.0),
                ..TextOptions::default()
            },
        );

        let source = merge_icons(&draft.mermaid, icons);
        let diagram = parse_flowchart(&source);
        deck.create_slide(FLOWCHART_SLIDE)
            .registry
            .build_from_diagram(&diagram, &IconMap::new());
        deck
    }

    pub fn primitives(&self) -> Vec<Vec<SlidePrimitive>> {
        self.slides.iter().map(Slide::primitives).collect()
    }

    pub fn write(&self, writer: &mut dyn PresentationWriter) -> anyhow::Result<Vec<u8>> {
        writer.write(&self.slides)
    }
}

/// Fresh registry holding the flowchart described by `source`.
pub fn build_flowchart(source: &str, icons: &IconMap, config: &Config) -> Registry {
    let diagram = parse_flowchart(source);
    let mut registry = Registry::new(config.theme.clone(), config.layout.clone());
    registry.build_from_diagram(&diagram, icons);
    registry
}
