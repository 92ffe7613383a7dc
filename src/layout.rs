//! Deterministic slide placement.
//!
//! Geometry depends only on the diagram orientation and a node's position in
//! first-mention order; edges never influence where a node lands. Units are
//! inches measured from the top-left corner of the slide.

use crate::ir::{Diagram, Direction};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub start_x: f32,
    pub start_y: f32,
    pub spacing: f32,
    pub row_height: f32,
    pub grid_columns: usize,
    pub node_width: f32,
    pub node_height: f32,
    /// Used by shapes created without an explicit position.
    pub default_shape: Rect,
    pub text_box: Rect,
    pub title_x: f32,
    pub title_y: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: 1.0,
            start_y: 2.0,
            spacing: 2.5,
            row_height: 1.5,
            grid_columns: 3,
            node_width: 2.0,
            node_height: 1.0,
            default_shape: Rect::new(1.0, 1.0, 2.0, 1.0),
            text_box: Rect::new(1.0, 1.0, 8.0, 1.0),
            title_x: 0.5,
            title_y: 0.5,
        }
    }
}

/// Slot for the `index`-th node. Horizontal orientations use one row, every
/// other orientation (including none) wraps into a grid.
pub fn node_rect(orientation: Option<Direction>, index: usize, config: &LayoutConfig) -> Rect {
    let horizontal = orientation.is_some_and(Direction::is_horizontal);
    let (column, row) = if horizontal {
        (index, 0)
    } else {
        let columns = config.grid_columns.max(1);
        (index % columns, index / columns)
    };
    Rect::new(
        config.start_x + column as f32 * config.spacing,
        config.start_y + row as f32 * config.row_height,
        config.node_width,
        config.node_height,
    )
}

pub fn place(diagram: &Diagram, config: &LayoutConfig) -> IndexMap<String, Rect> {
    diagram
        .nodes
        .keys()
        .enumerate()
        .map(|(index, id)| (id.clone(), node_rect(diagram.orientation, index, config)))
        .collect()
}

/// Straight line from the source's right-middle point towards the target's
/// top-left corner. `dx`/`dy` keep their sign; [`ConnectorGeometry::bounds`]
/// gives the normalized box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorGeometry {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub dx: f32,
    pub dy: f32,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl ConnectorGeometry {
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.anchor_x.min(self.anchor_x + self.dx),
            self.anchor_y.min(self.anchor_y + self.dy),
            self.dx.abs(),
            self.dy.abs(),
        )
    }
}

pub fn connector_geometry(source: &Rect, target: &Rect) -> ConnectorGeometry {
    let anchor_x = source.right();
    let anchor_y = source.center_y();
    let dy = target.y - source.y;
    ConnectorGeometry {
        anchor_x,
        anchor_y,
        dx: target.x - anchor_x,
        dy,
        flip_h: target.x < source.x,
        flip_v: dy < 0.0,
    }
}
