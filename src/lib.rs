pub mod adjust;
pub mod annotate;
pub mod collab;
pub mod config;
pub mod deck;
pub mod error;
pub mod ir;
pub mod layout;
pub mod parser;
pub mod registry;
pub mod snapshot;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

pub use adjust::{Adjustment, apply, parse_adjustments};
pub use annotate::{IconMap, merge_icons};
pub use config::{Config, load_config};
pub use deck::{Deck, build_flowchart};
pub use error::{Error, Result};
pub use ir::{Diagram, Direction, Edge, Node};
pub use layout::{LayoutConfig, Rect, connector_geometry, place};
pub use parser::parse_flowchart;
pub use registry::{Registry, VisualElement};
pub use snapshot::VisualRepresentation;
pub use theme::Theme;

#[cfg(feature = "cli")]
pub use cli::run;
