//! JSON layout document export.
//!
//! The document carries everything a front end needs to draw the map itself:
//! canvas size, one entry per node with its grid slot and box, one entry per
//! edge with its anchors and control points, and the diagnostics.

use std::io;

use log::info;
use serde::Serialize;

use weakmap_core::{
    geometry::{Point, Size},
    identifier::Id,
    mastery::MasteryBand,
};

use crate::{
    diagnostic::Diagnostic,
    export::{self, Exporter},
    layout::Orientation,
    map::{MapEdge, MapNode, WeaknessMap},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutDocument<'a> {
    orientation: Orientation,
    canvas: Size,
    layer_count: usize,
    nodes: Vec<NodeEntry<'a>>,
    edges: Vec<EdgeEntry>,
    diagnostics: &'a [Diagnostic],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeEntry<'a> {
    id: Id,
    name: &'a str,
    layer: usize,
    index: usize,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    mastery: Option<u8>,
    band: MasteryBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    question_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<&'a str>,
}

impl<'a> From<MapNode<'a>> for NodeEntry<'a> {
    fn from(node: MapNode<'a>) -> Self {
        let topic = node.topic();
        let bounds = node.bounds();
        Self {
            id: topic.id(),
            name: topic.name(),
            layer: node.layer(),
            index: node.index(),
            x: bounds.min_x(),
            y: bounds.min_y(),
            width: bounds.width(),
            height: bounds.height(),
            mastery: topic.mastery(),
            band: topic.band(),
            question_count: topic.question_count(),
            subject: topic.subject(),
            domain: topic.domain(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EdgeEntry {
    from: Id,
    to: Id,
    start: Point,
    end: Point,
    controls: [Point; 2],
}

impl From<MapEdge<'_>> for EdgeEntry {
    fn from(edge: MapEdge<'_>) -> Self {
        let (ctrl1, ctrl2) = edge.control_points();
        Self {
            from: edge.from().id(),
            to: edge.to().id(),
            start: edge.start(),
            end: edge.end(),
            controls: [ctrl1, ctrl2],
        }
    }
}

/// JSON exporter.
#[derive(Debug, Clone, Copy)]
pub struct Json {
    pretty: bool,
}

impl Default for Json {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Json {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit compact single-line JSON instead of indented output.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl Exporter for Json {
    fn export_map(&self, map: &WeaknessMap, out: &mut dyn io::Write) -> Result<(), export::Error> {
        info!(nodes_count = map.topics().len(); "Exporting JSON layout");
        let document = LayoutDocument {
            orientation: map.orientation(),
            canvas: map.canvas(),
            layer_count: map.layer_count(),
            nodes: map.nodes().map(NodeEntry::from).collect(),
            edges: map.edges().map(EdgeEntry::from).collect(),
            diagnostics: map.diagnostics(),
        };

        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &document)
        } else {
            serde_json::to_writer(&mut *out, &document)
        };
        result.map_err(|err| export::Error::Render(err.to_string()))?;
        writeln!(out)?;
        Ok(())
    }
}
