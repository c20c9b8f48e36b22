//! The finished weakness map.
//!
//! [`WeaknessMap`] runs the full pipeline (graph, layering, layout) once and
//! keeps every intermediate result, so renderers and interactive front ends
//! can query positions, anchors and the original topic records without
//! recomputing anything.

use log::{debug, info};

use weakmap_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    mastery::MasteryBand,
    topic::Topic,
};

use crate::{
    config::AppConfig,
    diagnostic::Diagnostic,
    graph::{GraphBuilder, TopicGraph},
    layering::{Layerizer, Layering, Rescue},
    layout::{EdgeRoute, Layout, LayoutEngine, NodePlacement, Orientation},
    viewport::Viewport,
};

/// A laid-out prerequisite map of curriculum topics.
///
/// # Examples
///
/// ```
/// use weakmap::{config::AppConfig, map::WeaknessMap};
/// use weakmap_core::{geometry::Point, topic::Topic};
///
/// let topics = vec![
///     Topic::new("fractions", "分数").with_mastery(82),
///     Topic::new("ratio", "割合").with_prerequisites(["fractions"]).with_mastery(65),
/// ];
/// let map = WeaknessMap::build(&topics, &AppConfig::default());
///
/// assert_eq!(map.layer_of("ratio"), Some(1));
/// assert_eq!(map.position("fractions"), Some(Point::new(16.0, 16.0)));
///
/// let mut selected = None;
/// map.select("ratio", |topic| selected = topic.mastery());
/// assert_eq!(selected, Some(65));
/// ```
#[derive(Debug, Clone)]
pub struct WeaknessMap {
    graph: TopicGraph,
    layering: Layering,
    layout: Layout,
    diagnostics: Vec<Diagnostic>,
}

impl WeaknessMap {
    /// Builds the map. Never fails; problems in the input become diagnostics.
    pub fn build(topics: &[Topic], config: &AppConfig) -> Self {
        info!(topics_count = topics.len(); "Building weakness map");

        let (graph, mut diagnostics) = GraphBuilder::new()
            .with_edge_source(config.graph().edge_source())
            .with_consistency_check(config.graph().check_consistency())
            .build(topics);

        let layering = Layerizer::new().layerize(&graph);
        let layout = LayoutEngine::from_config(config.layout()).layout(&graph, &layering);

        for cycle in graph.cycles() {
            let members = cycle
                .iter()
                .filter_map(|node| graph.topic(*node).map(Topic::id))
                .collect();
            diagnostics.push(Diagnostic::Cycle { members });
        }
        diagnostics.extend(
            layering
                .rescues()
                .iter()
                .filter_map(|rescue| rescue.to_diagnostic(&graph)),
        );

        debug!(
            layers_count = layering.layer_count(),
            diagnostics_count = diagnostics.len();
            "Weakness map built"
        );

        Self {
            graph,
            layering,
            layout,
            diagnostics,
        }
    }

    /// Topics in input order, duplicates removed.
    pub fn topics(&self) -> &[Topic] {
        self.graph.topics()
    }

    pub fn topic(&self, id: impl Into<Id>) -> Option<&Topic> {
        let node = self.graph.index_of(id.into())?;
        self.graph.topic(node)
    }

    pub fn graph(&self) -> &TopicGraph {
        &self.graph
    }

    pub fn layering(&self) -> &Layering {
        &self.layering
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn orientation(&self) -> Orientation {
        self.layout.orientation()
    }

    /// Top-left corner of the topic's box.
    pub fn position(&self, id: impl Into<Id>) -> Option<Point> {
        self.placement(id.into()).map(NodePlacement::position)
    }

    pub fn layer_of(&self, id: impl Into<Id>) -> Option<usize> {
        self.placement(id.into()).map(NodePlacement::layer)
    }

    pub fn layer_count(&self) -> usize {
        self.layering.layer_count()
    }

    /// Every placed topic in layer order.
    pub fn nodes(&self) -> impl Iterator<Item = MapNode<'_>> {
        self.layout.nodes().iter().filter_map(|placement| {
            self.graph
                .topic(placement.node())
                .map(|topic| MapNode { topic, placement })
        })
    }

    /// Every drawn edge in discovery order.
    pub fn edges(&self) -> impl Iterator<Item = MapEdge<'_>> {
        self.layout.edges().iter().filter_map(|route| {
            let from = self.graph.topic(route.from())?;
            let to = self.graph.topic(route.to())?;
            Some(MapEdge { from, to, route })
        })
    }

    pub fn canvas(&self) -> Size {
        self.layout.canvas()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn rescues(&self) -> &[Rescue] {
        self.layering.rescues()
    }

    /// The topic whose box contains the layout-space `point`.
    pub fn node_at(&self, point: Point) -> Option<&Topic> {
        self.layout
            .node_at(point)
            .and_then(|node| self.graph.topic(node))
    }

    /// Invokes `callback` with the full record of topic `id`.
    ///
    /// Returns `false` without calling back when the topic is unknown.
    pub fn select(&self, id: impl Into<Id>, callback: impl FnOnce(&Topic)) -> bool {
        match self.topic(id) {
            Some(topic) => {
                callback(topic);
                true
            }
            None => false,
        }
    }

    /// Hit-tests a screen-space point through `viewport` and selects the topic under it.
    pub fn activate(
        &self,
        screen_point: Point,
        viewport: &Viewport,
        callback: impl FnOnce(&Topic),
    ) -> Option<Id> {
        let topic = self.node_at(viewport.to_layout(screen_point))?;
        callback(topic);
        Some(topic.id())
    }

    fn placement(&self, id: Id) -> Option<&NodePlacement> {
        self.layout.node(self.graph.index_of(id)?)
    }
}

/// One placed topic.
#[derive(Debug, Clone, Copy)]
pub struct MapNode<'a> {
    topic: &'a Topic,
    placement: &'a NodePlacement,
}

impl<'a> MapNode<'a> {
    pub fn topic(&self) -> &'a Topic {
        self.topic
    }

    pub fn id(&self) -> Id {
        self.topic.id()
    }

    pub fn position(&self) -> Point {
        self.placement.position()
    }

    pub fn bounds(&self) -> Bounds {
        self.placement.bounds()
    }

    pub fn layer(&self) -> usize {
        self.placement.layer()
    }

    /// Index within the layer.
    pub fn index(&self) -> usize {
        self.placement.index()
    }

    pub fn band(&self) -> MasteryBand {
        self.topic.band()
    }
}

/// One drawn edge with both endpoint records.
#[derive(Debug, Clone, Copy)]
pub struct MapEdge<'a> {
    from: &'a Topic,
    to: &'a Topic,
    route: &'a EdgeRoute,
}

impl<'a> MapEdge<'a> {
    /// The prerequisite.
    pub fn from(&self) -> &'a Topic {
        self.from
    }

    /// The topic that builds on the prerequisite.
    pub fn to(&self) -> &'a Topic {
        self.to
    }

    pub fn start(&self) -> Point {
        self.route.start()
    }

    pub fn end(&self) -> Point {
        self.route.end()
    }

    pub fn control_points(&self) -> (Point, Point) {
        self.route.control_points()
    }
}
