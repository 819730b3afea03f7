//! CLI logic for the Dagscope pipeline DAG viewer.
//!
//! The CLI replays a recorded execution result: the inspection engine already
//! ran the pipeline and wrote its DAG, inspections and checks as JSON. The
//! result is laid out and exported as SVG; a node can then be selected by id
//! or by scene coordinates and its details printed as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::{debug, info};
use serde::Serialize;

use dagscope::{
    DagScope, DagscopeError,
    engine::{EngineError, InspectionEngine},
    geometry::Point,
    identifier::Id,
    request::{
        DEFAULT_PROBABILITY_THRESHOLD_PERCENT, DEFAULT_RATIO_THRESHOLD_PERCENT, ExecutionRequest,
    },
    semantic::{Check, EnabledKinds, ExecutionResult, ResultKind},
    session::PickTarget,
};

/// Engine that replays an execution result recorded as JSON.
///
/// The request's pipeline names the recording to read.
#[derive(Debug, Default)]
pub struct RecordedEngine;

impl InspectionEngine for RecordedEngine {
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, EngineError> {
        let src = fs::read_to_string(request.pipeline())?;
        serde_json::from_str(&src).map_err(|err| {
            let offset = byte_offset(&src, err.line(), err.column());
            EngineError::Decode {
                message: err.to_string(),
                src,
                offset,
            }
        })
    }
}

/// Byte offset of a 1-based line and column in `src`.
fn byte_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}

/// Run the Dagscope CLI application
///
/// Output other than the SVG file (selection details, summary) is written
/// to standard output.
///
/// # Errors
///
/// Returns `DagscopeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Decoding errors of the recorded result
/// - Graph and layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), DagscopeError> {
    let stdout = io::stdout();
    run_to(args, &mut stdout.lock())
}

/// Like [`run`], writing printed output to `out`.
///
/// # Errors
///
/// See [`run`].
pub fn run_to(args: &Args, out: &mut impl Write) -> Result<(), DagscopeError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing execution result"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let enabled = enabled_kinds(&args.enable)?;
    let target = pick_target(args)?;

    let dagscope = DagScope::new(app_config);
    let session = dagscope.session();
    let epoch = session.execute(&RecordedEngine, &build_request(args))?;

    dagscope.export_svg(epoch.scene(), Path::new(&args.output))?;
    info!(output_file = args.output; "SVG exported successfully");

    if let Some(target) = target {
        let selection = session.select(target, &enabled);
        if selection.is_none() {
            info!(pick:? = target; "No node at selection");
        }
        print_json(out, &selection)?;
    }

    if args.summary {
        print_json(out, &session.summary())?;
    }

    Ok(())
}

/// Request for the recorded result; a bias check is added when sensitive
/// columns are given, so problem nodes of that check are highlighted.
fn build_request(args: &Args) -> ExecutionRequest {
    let request = ExecutionRequest::new(args.input.clone());
    if args.sensitive_columns.is_empty() {
        return request;
    }

    request.with_check(Check::NoBiasIntroducedFor {
        sensitive_columns: args.sensitive_columns.clone(),
        min_allowed_relative_ratio_change: DEFAULT_RATIO_THRESHOLD_PERCENT / 100.0,
        max_allowed_probability_difference: DEFAULT_PROBABILITY_THRESHOLD_PERCENT / 100.0,
    })
}

/// Parses the `--enable` list; an empty list enables every kind.
fn enabled_kinds(names: &[String]) -> Result<EnabledKinds, DagscopeError> {
    if names.is_empty() {
        return Ok(EnabledKinds::all());
    }

    names
        .iter()
        .map(|name| {
            name.trim()
                .parse::<ResultKind>()
                .map_err(|err| DagscopeError::Config(err.to_string()))
        })
        .collect()
}

fn pick_target(args: &Args) -> Result<Option<PickTarget>, DagscopeError> {
    if let Some(node) = &args.select_node {
        return Ok(Some(PickTarget::Node(Id::new(node))));
    }

    let Some(point) = &args.select_point else {
        return Ok(None);
    };
    let invalid = || DagscopeError::Config(format!("invalid point `{point}`, expected `x,y`"));
    let (x, y) = point.split_once(',').ok_or_else(invalid)?;
    let x: f32 = x.trim().parse().map_err(|_| invalid())?;
    let y: f32 = y.trim().parse().map_err(|_| invalid())?;
    debug!(x, y; "Selecting by scene coordinates");

    Ok(Some(PickTarget::Point(Point::new(x, y))))
}

fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), DagscopeError> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    writeln!(out, "{json}")?;
    Ok(())
}
