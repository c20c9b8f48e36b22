//! Weakmap - prerequisite maps of curriculum topics.
//!
//! Builds a prerequisite graph from topic records, assigns every topic a
//! layer consistent with prerequisite order, places the layers on a fixed
//! grid, and renders the result as SVG or as a JSON layout document.
//!
//! The pipeline never fails on bad data: dangling references, duplicate ids
//! and cycles are reported as [`Diagnostic`]s next to a complete map.

pub mod cache;
pub mod config;
pub mod diagnostic;
pub mod export;
pub mod graph;
pub mod layering;
pub mod layout;
pub mod map;
pub mod scope;
pub mod viewport;

mod error;

pub use weakmap_core::{color, geometry, identifier, mastery, topic};

pub use diagnostic::Diagnostic;
pub use error::WeakmapError;
pub use map::WeaknessMap;

use log::{debug, info, trace};
use serde::Deserialize;

use config::AppConfig;
use export::Exporter;
use scope::TopicScope;
use topic::Topic;

/// Topic data wrapped in an object, as exported by the admin screens.
#[derive(Deserialize)]
struct TopicDocument {
    topics: Vec<Topic>,
}

/// Builder for parsing topic data and rendering weakness maps.
///
/// # Examples
///
/// ```
/// use weakmap::{MapBuilder, config::AppConfig};
///
/// let source = r#"[
///     {"id": "n1", "name": "整数・小数・分数", "mastery": 82},
///     {"id": "n2", "name": "割合", "mastery": 58, "prerequisites": ["n1"]}
/// ]"#;
///
/// let builder = MapBuilder::new(AppConfig::default());
/// let topics = builder.parse(source).expect("Failed to parse");
/// let map = builder.build(&topics);
/// assert_eq!(map.layer_of("n2"), Some(1));
///
/// let svg = builder.render_svg(&map).expect("Failed to render");
/// assert!(svg.contains("割合"));
/// ```
#[derive(Debug, Default)]
pub struct MapBuilder {
    config: AppConfig,
    scope: TopicScope,
}

impl MapBuilder {
    /// Create a new map builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            scope: TopicScope::default(),
        }
    }

    /// Restrict built maps to one subject and/or domain.
    pub fn with_scope(mut self, scope: TopicScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scope(&self) -> &TopicScope {
        &self.scope
    }

    /// Parse topic records from JSON.
    ///
    /// Accepts either an array of topics or an object with a `topics` array.
    ///
    /// # Errors
    ///
    /// Returns [`WeakmapError::Input`] with the source attached when the text
    /// is not valid JSON or a record is missing a required field.
    pub fn parse(&self, source: &str) -> Result<Vec<Topic>, WeakmapError> {
        info!("Parsing topic data");

        let result = if source.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Topic>>(source)
        } else {
            serde_json::from_str::<TopicDocument>(source).map(|document| document.topics)
        };
        let topics = result.map_err(|err| WeakmapError::new_input_error(err, source))?;

        debug!(topics_count = topics.len(); "Topic data parsed successfully");
        trace!(topics:?; "Parsed topics");

        Ok(topics)
    }

    /// Build the map for the topics inside the configured scope.
    pub fn build(&self, topics: &[Topic]) -> WeaknessMap {
        if self.scope.is_unscoped() {
            return WeaknessMap::build(topics, &self.config);
        }

        let scoped = self.scope.apply(topics);
        info!(
            subject = self.scope.subject().unwrap_or("*"),
            domain = self.scope.domain().unwrap_or("*"),
            topics_count = scoped.len();
            "Applied topic scope"
        );
        WeaknessMap::build(&scoped, &self.config)
    }

    /// Render a map to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`WeakmapError::Export`] if the configured style is invalid.
    pub fn render_svg(&self, map: &WeaknessMap) -> Result<String, WeakmapError> {
        let exporter = export::svg::SvgBuilder::new()
            .with_style(self.config.style())
            .build()?;
        let svg = exporter.export_to_string(map)?;

        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Render a map to a JSON layout document.
    ///
    /// # Errors
    ///
    /// Returns [`WeakmapError::Export`] if serialization fails.
    pub fn render_json(&self, map: &WeaknessMap) -> Result<String, WeakmapError> {
        let json = export::json::Json::new().export_to_string(map)?;

        info!("JSON layout rendered successfully");
        Ok(json)
    }
}
