//! SVG export backend.
//!
//! [`SvgBuilder`] resolves the configured style into an [`Svg`] exporter,
//! which draws one rounded box per topic colored by its mastery band, one
//! Bézier arrow per prerequisite edge, and an optional band legend.

mod arrows;
mod label;

use std::io;

use log::{debug, info};
use svg::{
    Document, Node,
    node::{
        Text as SvgText,
        element::{Element, Group, Rectangle, Text},
    },
};

use weakmap_core::{
    color::Color,
    geometry::{Point, Size},
    mastery::{BandPalette, MasteryBand},
    topic::Topic,
};

use crate::{
    config::StyleConfig,
    export::{self, Exporter},
    map::{MapNode, WeaknessMap},
};

const NAME_FONT_SIZE: f32 = 13.0;
const CAPTION_FONT_SIZE: f32 = 11.0;
const TEXT_PADDING: f32 = 12.0;
const CORNER_RADIUS: f32 = 12.0;

/// Builder that validates a [`StyleConfig`] into an [`Svg`] exporter.
#[derive(Debug, Default)]
pub struct SvgBuilder {
    style: StyleConfig,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Resolves every configured color.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a configured color is invalid.
    pub fn build(self) -> Result<Svg, export::Error> {
        let palettes = MasteryBand::ALL
            .iter()
            .map(|band| self.style.palette(*band).map(|palette| (*band, palette)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(export::Error::Render)?;

        Ok(Svg {
            background: self.style.background_color().map_err(export::Error::Render)?,
            edge_color: self.style.edge_color().map_err(export::Error::Render)?,
            palettes,
            show_legend: self.style.show_legend(),
            font_family: self.style.font_family().to_string(),
        })
    }
}

/// SVG exporter with a resolved style.
#[derive(Debug, Clone)]
pub struct Svg {
    background: Option<Color>,
    edge_color: Color,
    palettes: Vec<(MasteryBand, BandPalette)>,
    show_legend: bool,
    font_family: String,
}

impl Svg {
    fn palette(&self, band: MasteryBand) -> BandPalette {
        self.palettes
            .iter()
            .find(|(candidate, _)| *candidate == band)
            .map_or_else(|| band.default_palette(), |(_, palette)| *palette)
    }

    /// Builds the SVG document for `map`.
    pub fn render_document(&self, map: &WeaknessMap) -> Document {
        let canvas = map.canvas();
        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", canvas.width(), canvas.height()))
            .set("width", canvas.width())
            .set("height", canvas.height())
            .set("font-family", self.font_family.as_str());

        if let Some(background) = self.background {
            doc = doc.add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", canvas.width())
                    .set("height", canvas.height())
                    .set("fill", background),
            );
        }

        doc = doc.add(arrows::create_marker_definitions(self.edge_color));

        let mut edges = Group::new().set("class", "edges");
        for edge in map.edges() {
            edges = edges.add(arrows::create_edge_path(&edge, self.edge_color));
        }
        doc = doc.add(edges);

        let mut nodes = Group::new().set("class", "nodes");
        for node in map.nodes() {
            nodes = nodes.add(self.render_node(&node));
        }
        doc = doc.add(nodes);

        if self.show_legend {
            doc = doc.add(self.render_legend(canvas));
        }

        debug!(nodes_count = map.topics().len(); "SVG document rendered");
        doc
    }

    fn render_node(&self, node: &MapNode<'_>) -> Group {
        let topic = node.topic();
        let palette = self.palette(node.band());
        let bounds = node.bounds();
        let origin = bounds.min_point();
        let max_label_width = bounds.width() - 2.0 * TEXT_PADDING;

        let mut title = Element::new("title");
        title.append(SvgText::new(topic.name()));

        let rect = Rectangle::new()
            .set("x", origin.x())
            .set("y", origin.y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", CORNER_RADIUS)
            .set("fill", palette.fill())
            .set("stroke", palette.stroke());

        let name = Text::new("")
            .set("x", origin.x() + TEXT_PADDING)
            .set("y", origin.y() + 22.0)
            .set("font-size", NAME_FONT_SIZE)
            .set("font-weight", 600)
            .set("fill", palette.text())
            .add(SvgText::new(label::fit_to_width(
                topic.name(),
                max_label_width,
                NAME_FONT_SIZE,
                &self.font_family,
            )));

        let details = Text::new("")
            .set("x", origin.x() + TEXT_PADDING)
            .set("y", origin.y() + 42.0)
            .set("font-size", CAPTION_FONT_SIZE)
            .set("fill", palette.text())
            .add(SvgText::new(caption(topic)));

        Group::new()
            .set("class", format!("topic {}", node.band()))
            .set("data-id", node.id().to_string())
            .set("data-layer", node.layer().to_string())
            .add(title)
            .add(rect)
            .add(name)
            .add(details)
    }

    fn render_legend(&self, canvas: Size) -> Group {
        let baseline = canvas.height() - 16.0;
        let mut cursor = Point::new(TEXT_PADDING + 4.0, baseline);
        let mut legend = Group::new().set("class", "legend");

        for band in MasteryBand::ALL {
            let palette = self.palette(band);
            let text = format!("{band} {}", band.range_label());
            legend = legend
                .add(
                    Rectangle::new()
                        .set("x", cursor.x())
                        .set("y", cursor.y() - 10.0)
                        .set("width", 12)
                        .set("height", 12)
                        .set("rx", 3)
                        .set("fill", palette.fill())
                        .set("stroke", palette.stroke()),
                )
                .add(
                    Text::new("")
                        .set("x", cursor.x() + 16.0)
                        .set("y", cursor.y())
                        .set("font-size", CAPTION_FONT_SIZE)
                        .set("fill", palette.text())
                        .add(SvgText::new(text.as_str())),
                );
            let advance = 16.0
                + label::measure_width(&text, CAPTION_FONT_SIZE, &self.font_family)
                + 14.0;
            cursor = cursor.add_point(Point::new(advance, 0.0));
        }

        legend
    }
}

/// The `65% · 12` line under a topic name.
fn caption(topic: &Topic) -> String {
    let mastery = topic
        .mastery()
        .map_or_else(|| "no data".to_string(), |mastery| format!("{mastery}%"));
    match topic.question_count() {
        Some(count) => format!("{mastery} · {count}"),
        None => mastery,
    }
}

impl Exporter for Svg {
    fn export_map(&self, map: &WeaknessMap, out: &mut dyn io::Write) -> Result<(), export::Error> {
        info!(nodes_count = map.topics().len(); "Exporting SVG");
        let doc = self.render_document(map);
        svg::write(out, &doc)?;
        Ok(())
    }
}
