//! CLI logic for the Weakmap tool.
//!
//! Reads a topic file, builds the weakness map for the requested scope and
//! writes it as SVG or as a JSON layout document.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::{info, warn};

use weakmap::{MapBuilder, WeakmapError, scope::TopicScope};

/// Run the Weakmap CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `WeakmapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed topic data
/// - Rendering errors
///
/// Dangling references and cycles are not errors; they are logged as
/// warnings and the map is written anyway.
pub fn run(args: &Args) -> Result<(), WeakmapError> {
    let output_path = args.output_path();
    info!(
        input_path = args.input,
        output_path = output_path;
        "Processing topics"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = MapBuilder::new(app_config).with_scope(scope_from_args(args));
    let topics = builder.parse(&source)?;
    let map = builder.build(&topics);

    for diagnostic in map.diagnostics() {
        warn!(code = diagnostic.code(); "{diagnostic}");
    }
    if !map.diagnostics().is_empty() {
        warn!(
            diagnostics_count = map.diagnostics().len();
            "Map built with data problems"
        );
    }

    let output = match args.format {
        OutputFormat::Svg => builder.render_svg(&map)?,
        OutputFormat::Json => builder.render_json(&map)?,
    };

    fs::write(&output_path, output)?;

    info!(output_file = output_path; "Map exported successfully");

    Ok(())
}

fn scope_from_args(args: &Args) -> TopicScope {
    let mut scope = TopicScope::new();
    if let Some(subject) = &args.subject {
        scope = scope.with_subject(subject.as_str());
    }
    if let Some(domain) = &args.domain {
        scope = scope.with_domain(domain.as_str());
    }
    scope
}
