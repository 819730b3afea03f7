//! Dagscope - Inspection views for ML pipeline DAGs
//!
//! This library turns the result of an inspected pipeline run into something
//! a front end can draw and interact with: a layered layout of the operator
//! DAG, a scene of node markers and edge curves, highlighted problem nodes,
//! hit-testing from scene coordinates back to nodes and per-node detail
//! payloads for the enabled inspections and checks.
//!
//! Running the pipeline itself is delegated to an [`engine::InspectionEngine`].
//! Interactive front ends keep a [`session::Session`]; batch tools use the
//! [`DagScope`] facade.

pub mod config;
pub mod details;
pub mod draw;
pub mod engine;
pub mod export;
pub mod highlight;
pub mod layout;
pub mod locate;
pub mod request;
pub mod scene;
pub mod session;
pub mod structure;
pub mod summary;

mod error;

pub use dagscope_core::{color, geometry, identifier, semantic};

pub use error::{DagscopeError, LayoutError};

use std::path::Path;

use log::{debug, info};

use config::AppConfig;
use export::Exporter;
use layout::PositionIndex;
use scene::Scene;
use semantic::{CheckResult, DagSpec, ExecutionResult};
use session::Session;
use structure::Dag;

/// Facade over the processing stages of one execution result.
///
/// # Examples
///
/// ```rust
/// use dagscope::{
///     DagScope,
///     config::AppConfig,
///     identifier::Id,
///     semantic::{CodeReference, DagNode, DagSpec, ExecutionResult, OperatorType},
/// };
///
/// let result = ExecutionResult::new(DagSpec {
///     nodes: vec![
///         DagNode::new(Id::new("a"), OperatorType::DataSource, CodeReference::new(1)),
///         DagNode::new(Id::new("b"), OperatorType::Selection, CodeReference::new(2)),
///     ],
///     edges: vec![(Id::new("a"), Id::new("b"))],
/// });
///
/// let dagscope = DagScope::new(AppConfig::default());
/// let scene = dagscope.scene(&result, &[]).expect("valid pipeline");
/// let svg = dagscope.render_svg(&scene).expect("valid style");
/// assert!(svg.contains(r#"data-node-id="b""#));
/// ```
#[derive(Debug, Default)]
pub struct DagScope {
    config: AppConfig,
}

impl DagScope {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Builds the graph of a DAG description.
    ///
    /// # Errors
    ///
    /// Returns [`DagscopeError::Graph`] for duplicate node ids or edges that
    /// reference unknown nodes.
    pub fn build_dag(&self, spec: &DagSpec) -> Result<Dag, DagscopeError> {
        let dag = Dag::from_spec(spec)?;
        debug!(nodes = dag.len(), edges = dag.edge_count(); "DAG built");
        Ok(dag)
    }

    /// Lays out `dag` with the configured engine.
    ///
    /// # Errors
    ///
    /// Returns [`DagscopeError::Layout`] if the graph has a cycle or the
    /// engine fails.
    pub fn compute_layout(&self, dag: &Dag) -> Result<PositionIndex, DagscopeError> {
        Ok(layout::compute_layout(dag, self.config.layout())?)
    }

    /// Builds the undecorated scene of a laid out DAG.
    pub fn build_scene(&self, dag: &Dag, positions: &PositionIndex) -> Scene {
        scene::build_scene(dag, positions, &self.config.edge().curve_params())
    }

    /// Adds the problem node highlight series to `scene`.
    pub fn highlight(
        &self,
        scene: Scene,
        sensitive_columns: &[String],
        checks: &[CheckResult],
    ) -> Scene {
        highlight::highlight(scene, sensitive_columns, checks)
    }

    /// Runs all stages up to the highlighted scene.
    ///
    /// # Errors
    ///
    /// See [`Self::build_dag`] and [`Self::compute_layout`].
    pub fn scene(
        &self,
        result: &ExecutionResult,
        sensitive_columns: &[String],
    ) -> Result<Scene, DagscopeError> {
        info!(nodes = result.dag.nodes.len(); "Building scene");
        let dag = self.build_dag(&result.dag)?;
        let positions = self.compute_layout(&dag)?;
        let scene = self.build_scene(&dag, &positions);
        Ok(self.highlight(scene, sensitive_columns, &result.checks))
    }

    /// Renders `scene` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`DagscopeError::Export`] if the style holds an invalid color.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, DagscopeError> {
        let svg = export::svg::render_svg(scene, self.config.style())?;
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Writes `scene` as an SVG file.
    ///
    /// # Errors
    ///
    /// Returns [`DagscopeError::Export`] for invalid colors and write failures.
    pub fn export_svg(&self, scene: &Scene, path: &Path) -> Result<(), DagscopeError> {
        let mut exporter =
            export::svg::Svg::new(&path.to_string_lossy(), self.config.style().clone());
        exporter.export_scene(scene)?;
        Ok(())
    }

    /// Starts an interactive session with this configuration.
    pub fn session(&self) -> Session {
        Session::new(self.config.clone())
    }
}
