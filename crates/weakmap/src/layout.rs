//! Grid layout of layered topic graphs.
//!
//! The [`LayoutEngine`] maps each node's (layer, index-within-layer) pair onto
//! a fixed grid and computes the anchor points of every edge. In the
//! [`Orientation::Horizontal`] flow layers are columns and arrows run left to
//! right; in [`Orientation::Vertical`] layers are rows and arrows run top to
//! bottom.

use std::{fmt, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};

use weakmap_core::geometry::{Bounds, Point, Size};

use crate::{
    config::LayoutConfig,
    graph::{NodeIndex, TopicGraph},
    layering::Layering,
};

/// Direction in which prerequisite arrows flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Layers are columns, arrows flow left to right.
    #[default]
    Horizontal,
    /// Layers are rows, arrows flow top to bottom.
    Vertical,
}

impl FromStr for Orientation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            _ => Err("Unsupported orientation"),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// Where one node sits on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePlacement {
    node: NodeIndex,
    layer: usize,
    index: usize,
    bounds: Bounds,
}

impl NodePlacement {
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Index of the node within its layer.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Top-left corner of the node box.
    pub fn position(&self) -> Point {
        self.bounds.min_point()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The point outgoing edges leave from.
    pub fn source_anchor(&self, orientation: Orientation) -> Point {
        match orientation {
            Orientation::Horizontal => Point::new(self.bounds.max_x(), self.bounds.center().y()),
            Orientation::Vertical => Point::new(self.bounds.center().x(), self.bounds.max_y()),
        }
    }

    /// The point incoming edges arrive at.
    pub fn target_anchor(&self, orientation: Orientation) -> Point {
        match orientation {
            Orientation::Horizontal => Point::new(self.bounds.min_x(), self.bounds.center().y()),
            Orientation::Vertical => Point::new(self.bounds.center().x(), self.bounds.min_y()),
        }
    }
}

/// The drawn path of one edge: a cubic Bézier from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRoute {
    from: NodeIndex,
    to: NodeIndex,
    start: Point,
    end: Point,
    controls: (Point, Point),
}

impl EdgeRoute {
    fn new(from: NodeIndex, to: NodeIndex, start: Point, end: Point, orientation: Orientation) -> Self {
        let mid = start.midpoint(end);
        let controls = match orientation {
            Orientation::Horizontal => (Point::new(mid.x(), start.y()), Point::new(mid.x(), end.y())),
            Orientation::Vertical => (Point::new(start.x(), mid.y()), Point::new(end.x(), mid.y())),
        };
        Self {
            from,
            to,
            start,
            end,
            controls,
        }
    }

    pub fn from(&self) -> NodeIndex {
        self.from
    }

    pub fn to(&self) -> NodeIndex {
        self.to
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Both Bézier control points, at the midpoint along the flow direction.
    pub fn control_points(&self) -> (Point, Point) {
        self.controls
    }
}

/// Positions for every node, routes for every edge and the canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    orientation: Orientation,
    nodes: Vec<NodePlacement>,
    slots: Vec<Option<usize>>,
    edges: Vec<EdgeRoute>,
    canvas: Size,
}

impl Layout {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Node placements in layer order, then index-within-layer order.
    pub fn nodes(&self) -> &[NodePlacement] {
        &self.nodes
    }

    pub fn node(&self, node: NodeIndex) -> Option<&NodePlacement> {
        self.slots
            .get(node.index())
            .copied()
            .flatten()
            .map(|slot| &self.nodes[slot])
    }

    pub fn edges(&self) -> &[EdgeRoute] {
        &self.edges
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// The node whose box contains `point`, if any.
    pub fn node_at(&self, point: Point) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .find(|placement| placement.bounds.contains(point))
            .map(NodePlacement::node)
    }
}

/// Computes a [`Layout`] from a graph and its layering.
///
/// # Examples
///
/// ```
/// use weakmap::{graph::GraphBuilder, layering::Layerizer, layout::LayoutEngine};
/// use weakmap_core::{geometry::Point, topic::Topic};
///
/// let topics = vec![
///     Topic::new("a", "A"),
///     Topic::new("b", "B").with_prerequisites(["a"]),
/// ];
/// let (graph, _) = GraphBuilder::new().build(&topics);
/// let layering = Layerizer::new().layerize(&graph);
/// let layout = LayoutEngine::default().layout(&graph, &layering);
///
/// let b = graph.index_of("b".into()).unwrap();
/// assert_eq!(layout.node(b).unwrap().position(), Point::new(276.0, 16.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self { config: *config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self, graph: &TopicGraph, layering: &Layering) -> Layout {
        let orientation = self.config.orientation();
        let origin = self.config.origin();
        let node_size = self.config.node_size();
        let (column_pitch, row_pitch) = (self.config.column_pitch(), self.config.row_pitch());

        let mut nodes = Vec::with_capacity(graph.len());
        let mut slots = vec![None; graph.len()];
        for (layer, members) in layering.layers().iter().enumerate() {
            for (index, node) in members.iter().enumerate() {
                let (column, row) = match orientation {
                    Orientation::Horizontal => (layer, index),
                    Orientation::Vertical => (index, layer),
                };
                let offset = Point::new(column as f32 * column_pitch, row as f32 * row_pitch);
                if let Some(slot) = slots.get_mut(node.index()) {
                    *slot = Some(nodes.len());
                }
                nodes.push(NodePlacement {
                    node: *node,
                    layer,
                    index,
                    bounds: Bounds::new_from_top_left(origin.add_point(offset), node_size),
                });
            }
        }

        let placement =
            |node: NodeIndex| slots.get(node.index()).copied().flatten().map(|slot| &nodes[slot]);
        let edges: Vec<EdgeRoute> = graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let from = placement(edge.from())?;
                let to = placement(edge.to())?;
                Some(EdgeRoute::new(
                    edge.from(),
                    edge.to(),
                    from.source_anchor(orientation),
                    to.target_anchor(orientation),
                    orientation,
                ))
            })
            .collect();

        let canvas = self.canvas_size(layering);
        debug!(
            nodes_count = nodes.len(),
            edges_count = edges.len(),
            width = canvas.width(),
            height = canvas.height();
            "Layout computed"
        );

        Layout {
            orientation,
            nodes,
            slots,
            edges,
            canvas,
        }
    }

    fn canvas_size(&self, layering: &Layering) -> Size {
        let layers = layering.layer_count() as f32;
        let widest = layering.max_layer_len() as f32;
        let (columns, rows) = match self.config.orientation() {
            Orientation::Horizontal => (layers, widest),
            Orientation::Vertical => (widest, layers),
        };
        let origin = self.config.origin();
        let margin = self.config.margin();
        let needed = Size::new(
            origin.x() + columns * self.config.column_pitch() + margin.width(),
            origin.y() + rows * self.config.row_pitch() + margin.height(),
        );
        needed.max(self.config.min_canvas())
    }
}

#[cfg(test)]
mod tests {
    use weakmap_core::topic::Topic;

    use super::*;
    use crate::{graph::GraphBuilder, layering::Layerizer};

    fn layout_with(topics: &[Topic], config: LayoutConfig) -> (TopicGraph, Layout) {
        let (graph, _) = GraphBuilder::new().build(topics);
        let layering = Layerizer::new().layerize(&graph);
        let layout = LayoutEngine::from_config(&config).layout(&graph, &layering);
        (graph, layout)
    }

    fn diamond() -> Vec<Topic> {
        vec![
            Topic::new("1", "A"),
            Topic::new("2", "B").with_prerequisites(["1"]),
            Topic::new("3", "C").with_prerequisites(["1"]),
            Topic::new("4", "D").with_prerequisites(["2", "3"]),
        ]
    }

    fn position(graph: &TopicGraph, layout: &Layout, id: &str) -> Point {
        let node = graph.index_of(id.into()).unwrap();
        layout.node(node).unwrap().position()
    }

    #[test]
    fn test_empty_layout_uses_min_canvas() {
        let (_, layout) = layout_with(&[], LayoutConfig::default());

        assert!(layout.nodes().is_empty());
        assert!(layout.edges().is_empty());
        assert_eq!(layout.canvas(), Size::new(640.0, 320.0));
    }

    #[test]
    fn test_horizontal_positions() {
        let (graph, layout) = layout_with(&diamond(), LayoutConfig::default());

        assert_eq!(position(&graph, &layout, "1"), Point::new(16.0, 16.0));
        assert_eq!(position(&graph, &layout, "2"), Point::new(276.0, 16.0));
        assert_eq!(position(&graph, &layout, "3"), Point::new(276.0, 100.0));
        assert_eq!(position(&graph, &layout, "4"), Point::new(536.0, 16.0));
    }

    #[test]
    fn test_horizontal_anchors() {
        let (graph, layout) = layout_with(&diamond(), LayoutConfig::default());

        let first = layout.edges()[0];
        assert_eq!(graph.topic(first.from()).unwrap().id(), "1");
        assert_eq!(first.start(), Point::new(186.0, 44.0));
        assert_eq!(first.end(), Point::new(276.0, 44.0));
        assert_eq!(
            first.control_points(),
            (Point::new(231.0, 44.0), Point::new(231.0, 44.0))
        );

        let second = layout.edges()[1];
        assert_eq!(second.end(), Point::new(276.0, 128.0));
        assert_eq!(
            second.control_points(),
            (Point::new(231.0, 44.0), Point::new(231.0, 128.0))
        );
    }

    #[test]
    fn test_canvas_grows_with_layers() {
        let topics: Vec<Topic> = (0..5)
            .map(|i| {
                let topic = Topic::new(format!("t{i}").as_str(), format!("T{i}"));
                if i == 0 {
                    topic
                } else {
                    topic.with_prerequisites([format!("t{}", i - 1).as_str()])
                }
            })
            .collect();
        let (_, layout) = layout_with(&topics, LayoutConfig::default());

        // 16 + 5 * 260 + 120
        assert_eq!(layout.canvas(), Size::new(1436.0, 320.0));
    }

    #[test]
    fn test_vertical_orientation() {
        let config = LayoutConfig::default().with_orientation(Orientation::Vertical);
        let (graph, layout) = layout_with(&diamond(), config);

        assert_eq!(position(&graph, &layout, "2"), Point::new(16.0, 100.0));
        assert_eq!(position(&graph, &layout, "3"), Point::new(276.0, 100.0));
        assert_eq!(position(&graph, &layout, "4"), Point::new(16.0, 184.0));

        let first = layout.edges()[0];
        assert_eq!(first.start(), Point::new(101.0, 72.0));
        assert_eq!(first.end(), Point::new(101.0, 100.0));
        // 16 + 3 * 84 + 40 is below the minimum height
        assert_eq!(layout.canvas(), Size::new(656.0, 320.0));
    }

    #[test]
    fn test_node_at() {
        let (graph, layout) = layout_with(&diamond(), LayoutConfig::default());

        let hit = layout.node_at(Point::new(300.0, 120.0)).unwrap();
        assert_eq!(graph.topic(hit).unwrap().id(), "3");
        assert_eq!(layout.node_at(Point::new(200.0, 20.0)), None);
        assert_eq!(layout.node_at(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_orientation_from_str() {
        assert_eq!("vertical".parse::<Orientation>(), Ok(Orientation::Vertical));
        assert!("diagonal".parse::<Orientation>().is_err());
        assert_eq!(Orientation::Horizontal.to_string(), "horizontal");
    }
}
