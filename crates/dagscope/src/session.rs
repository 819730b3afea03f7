//! Execution epochs and the session that owns the current one.
//!
//! Every successful execute produces a new [`Epoch`]: the DAG, its layout,
//! the highlighted scene and all results, frozen together. The [`Session`]
//! swaps the current epoch atomically, so hover and select calls always read
//! one complete epoch, either the previous or the new one.

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info, warn};
use serde::Serialize;

use dagscope_core::{
    geometry::Point,
    identifier::Id,
    semantic::{CheckResult, CodeReference, EnabledKinds, ExecutionResult, InspectionResult, Table},
};

use crate::{
    config::AppConfig,
    details::{DisplayPayload, details_header, project_details},
    engine::InspectionEngine,
    error::DagscopeError,
    highlight::highlight,
    layout::{PositionIndex, compute_layout},
    locate::NodeLocator,
    request::ExecutionRequest,
    scene::{Scene, build_scene},
    structure::Dag,
    summary::summarize,
};

/// What a hover or select event points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickTarget {
    /// The node id carried by the picked marker.
    Node(Id),
    /// Bare scene coordinates.
    Point(Point),
}

/// Everything shown for a selected node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub node: Id,
    pub header: String,
    pub code_reference: CodeReference,
    pub payloads: Vec<DisplayPayload>,
}

/// The complete, immutable state of one execution.
#[derive(Debug)]
pub struct Epoch {
    dag: Dag,
    positions: PositionIndex,
    locator: NodeLocator,
    scene: Scene,
    inspections: Vec<InspectionResult>,
    checks: Vec<CheckResult>,
    summary: Table,
    pipeline_output: String,
}

impl Epoch {
    /// Lays out and decorates an execution result.
    ///
    /// # Errors
    ///
    /// Returns [`DagscopeError::Graph`] for a malformed DAG and
    /// [`DagscopeError::Layout`] if it cannot be laid out.
    pub fn build(
        result: ExecutionResult,
        sensitive_columns: &[String],
        config: &AppConfig,
    ) -> Result<Self, DagscopeError> {
        let dag = Dag::from_spec(&result.dag)?;
        let positions = compute_layout(&dag, config.layout())?;
        let locator = NodeLocator::new(&positions).with_tolerance(config.locate().tolerance());
        let scene = build_scene(&dag, &positions, &config.edge().curve_params());
        let scene = highlight(scene, sensitive_columns, &result.checks);
        let summary = summarize(&result.checks);

        Ok(Self {
            dag,
            positions,
            locator,
            scene,
            inspections: result.inspections,
            checks: result.checks,
            summary,
            pipeline_output: result.pipeline_output,
        })
    }

    pub fn dag(&self) -> &Dag {
        &self.dag
    }

    pub fn positions(&self) -> &PositionIndex {
        &self.positions
    }

    pub fn locator(&self) -> &NodeLocator {
        &self.locator
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn inspections(&self) -> &[InspectionResult] {
        &self.inspections
    }

    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// Check summary table, one row per check result.
    pub fn summary(&self) -> &Table {
        &self.summary
    }

    /// Text the pipeline printed while running.
    pub fn pipeline_output(&self) -> &str {
        &self.pipeline_output
    }

    /// Resolves a pick to a node of this epoch.
    pub fn pick(&self, target: PickTarget) -> Option<Id> {
        match target {
            PickTarget::Node(id) => self.locator.resolve(id),
            PickTarget::Point(point) => self.locator.locate(point),
        }
    }

    /// Source location of the picked node.
    pub fn hover(&self, target: PickTarget) -> Option<CodeReference> {
        let node = self.pick(target)?;
        self.dag.node(node).map(|node| node.code_reference())
    }

    /// Header, source location and detail payloads of the picked node.
    pub fn select(&self, target: PickTarget, enabled: &EnabledKinds) -> Option<Selection> {
        let id = self.pick(target)?;
        let node = self.dag.node(id)?;
        Some(Selection {
            node: id,
            header: details_header(node),
            code_reference: node.code_reference(),
            payloads: project_details(id, enabled, &self.dag, &self.inspections, &self.checks),
        })
    }
}

/// Owner of the current epoch.
///
/// All methods take `&self`; the session can be shared between the thread
/// that executes pipelines and the ones that answer hover and select events.
#[derive(Debug, Default)]
pub struct Session {
    config: AppConfig,
    current: RwLock<Option<Arc<Epoch>>>,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs `request` on `engine` and makes the result the current epoch.
    ///
    /// The call blocks until the engine returns. On failure the previous
    /// epoch stays current.
    ///
    /// # Errors
    ///
    /// Returns the engine failure, or the graph and layout errors of
    /// [`Epoch::build`].
    pub fn execute<E>(
        &self,
        engine: &E,
        request: &ExecutionRequest,
    ) -> Result<Arc<Epoch>, DagscopeError>
    where
        E: InspectionEngine + ?Sized,
    {
        info!(pipeline = request.pipeline(); "Executing pipeline");
        let result = engine.execute(request).inspect_err(|err| {
            warn!(err:%; "Pipeline execution failed");
        })?;
        self.install(result, request.sensitive_columns())
    }

    /// Makes an already computed execution result the current epoch.
    ///
    /// # Errors
    ///
    /// See [`Epoch::build`]. On failure the previous epoch stays current.
    pub fn install(
        &self,
        result: ExecutionResult,
        sensitive_columns: &[String],
    ) -> Result<Arc<Epoch>, DagscopeError> {
        let epoch = Arc::new(Epoch::build(result, sensitive_columns, &self.config)?);

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(Arc::clone(&epoch));
        drop(current);

        info!(
            nodes = epoch.dag().len(),
            problem_nodes = epoch
                .scene()
                .highlights()
                .iter()
                .map(|series| series.len())
                .sum::<usize>();
            "Epoch installed"
        );
        Ok(epoch)
    }

    /// The current epoch, `None` before the first successful execute.
    pub fn current(&self) -> Option<Arc<Epoch>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Source location of the picked node, `None` on a miss.
    pub fn hover(&self, target: PickTarget) -> Option<CodeReference> {
        let reference = self.current()?.hover(target);
        if reference.is_none() {
            debug!(pick:? = target; "Hover missed");
        }
        reference
    }

    /// Details of the picked node for the enabled kinds, `None` on a miss.
    pub fn select(&self, target: PickTarget, enabled: &EnabledKinds) -> Option<Selection> {
        let selection = self.current()?.select(target, enabled);
        if selection.is_none() {
            debug!(pick:? = target; "Select missed");
        }
        selection
    }

    /// Check summary of the current epoch.
    pub fn summary(&self) -> Option<Table> {
        self.current().map(|epoch| epoch.summary().clone())
    }
}
