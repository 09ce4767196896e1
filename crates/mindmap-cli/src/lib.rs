//! CLI logic for the mindmap tool.
//!
//! The CLI stands in for the summarization service: it reads a payload from
//! disk, feeds it through one [`Session`] cycle and writes the exported SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use mindmap::{
    MindmapBuilder, MindmapError,
    export::svg::SvgAdapter,
    session::{Ingest, Session, SubmissionRequest},
};

/// Run the mindmap CLI application
///
/// This function decodes the input payload, lays it out and writes the
/// exported SVG to the output file.
///
/// # Errors
///
/// Returns `MindmapError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Payload format errors
/// - Layout errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), MindmapError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing mindmap"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    args.apply_overrides(&mut app_config);

    let source = fs::read_to_string(&args.input)?;
    let payload = MindmapBuilder::new(app_config.clone()).decode(&source)?;

    let adapter = SvgAdapter::from_style(app_config.style())?;
    let model = app_config.export().model().to_string();
    let size = app_config.export().size();
    let mut session = Session::new(app_config, adapter);

    let request = SubmissionRequest::new(args.input.as_str()).with_model(model);
    let ticket = session
        .begin_submission(request)
        .map_err(|err| MindmapError::from_session_error(err, ""))?;
    session
        .complete_submission(ticket, Ingest::new(payload).with_source_text(source.as_str()))
        .map_err(|err| MindmapError::from_session_error(err, source.as_str()))?;

    let blob = session
        .export(size)
        .map_err(|err| MindmapError::from_session_error(err, ""))?;

    fs::write(&args.output, &blob.bytes)?;

    info!(output_file = args.output, bytes = blob.bytes.len(); "SVG exported successfully");

    Ok(())
}
