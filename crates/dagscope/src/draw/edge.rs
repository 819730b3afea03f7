//! Edge curves: a trimmed straight segment plus an arrowhead.
//!
//! An [`EdgeCurve`] is recomputed on every scene build and never stored
//! beyond the scene it belongs to. Its [`vertices`](EdgeCurve::vertices)
//! end every polyline with [`PathVertex::Break`], so many curves can be
//! concatenated into one line series without being joined.

use log::debug;
use serde::Deserialize;

use dagscope_core::geometry::Point;

/// Edges shorter than this are drawn as a single point.
const DEGENERATE_LENGTH: f32 = 1e-4;

/// Where the arrowhead of an edge is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowPosition {
    /// At the consumer end of the drawn segment.
    #[default]
    End,
    /// Halfway along the drawn segment.
    Middle,
    /// No arrowhead.
    None,
}

/// Shape parameters of an edge curve.
///
/// # Examples
///
/// ```
/// # use dagscope::draw::{ArrowPosition, EdgeCurveParams};
/// let params = EdgeCurveParams::default()
///     .with_arrow(130.0, 5.0)
///     .with_dot_size(10.0);
///
/// assert_eq!(params.length_fraction(), 1.0);
/// assert_eq!(params.arrow_position(), ArrowPosition::End);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCurveParams {
    length_fraction: f32,
    arrow_length: f32,
    arrow_angle_degrees: f32,
    dot_size: f32,
    arrow_position: ArrowPosition,
}

impl Default for EdgeCurveParams {
    fn default() -> Self {
        Self {
            length_fraction: 1.0,
            arrow_length: 12.0,
            arrow_angle_degrees: 20.0,
            dot_size: 0.0,
            arrow_position: ArrowPosition::End,
        }
    }
}

impl EdgeCurveParams {
    /// Fraction of the segment that is drawn, clamped to `0..=1`.
    pub fn with_length_fraction(mut self, fraction: f32) -> Self {
        self.length_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Length of the arrowhead strokes and their angle to the edge.
    pub fn with_arrow(mut self, length: f32, angle_degrees: f32) -> Self {
        self.arrow_length = length.max(0.0);
        self.arrow_angle_degrees = angle_degrees;
        self
    }

    /// Distance kept free at each end, usually the marker radius.
    pub fn with_dot_size(mut self, dot_size: f32) -> Self {
        self.dot_size = dot_size.max(0.0);
        self
    }

    pub fn with_arrow_position(mut self, position: ArrowPosition) -> Self {
        self.arrow_position = position;
        self
    }

    pub fn length_fraction(&self) -> f32 {
        self.length_fraction
    }

    pub fn arrow_length(&self) -> f32 {
        self.arrow_length
    }

    pub fn arrow_angle_degrees(&self) -> f32 {
        self.arrow_angle_degrees
    }

    pub fn dot_size(&self) -> f32 {
        self.dot_size
    }

    pub fn arrow_position(&self) -> ArrowPosition {
        self.arrow_position
    }
}

/// One element of a concatenated line path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathVertex {
    Point(Point),
    /// Ends the current polyline.
    Break,
}

/// Drawn geometry of one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeCurve {
    main: Vec<Point>,
    arrowhead: Option<[[Point; 2]; 2]>,
}

impl EdgeCurve {
    /// The main segment: two points, or one for a degenerate edge.
    pub fn main(&self) -> &[Point] {
        &self.main
    }

    /// The two arrowhead strokes, each running from the tip outwards.
    pub fn arrowhead(&self) -> Option<&[[Point; 2]; 2]> {
        self.arrowhead.as_ref()
    }

    /// True if the edge collapsed to a single point.
    pub fn is_degenerate(&self) -> bool {
        self.main.len() < 2
    }

    /// Main segment then each arrowhead stroke, every polyline closed by a break.
    pub fn vertices(&self) -> Vec<PathVertex> {
        let mut vertices: Vec<PathVertex> = self.main.iter().copied().map(PathVertex::Point).collect();
        vertices.push(PathVertex::Break);
        for stroke in self.arrowhead.iter().flatten() {
            vertices.extend(stroke.iter().copied().map(PathVertex::Point));
            vertices.push(PathVertex::Break);
        }
        vertices
    }
}

/// Computes the drawn geometry of an edge from `source` to `destination`.
///
/// The segment is shortened symmetrically to `length_fraction` of its length
/// and by `dot_size` at each end. When nothing is left to draw, the curve
/// collapses to one point without an arrowhead; coincident endpoints are not
/// an error.
pub fn edge_curve(source: Point, destination: Point, params: &EdgeCurveParams) -> EdgeCurve {
    let delta = destination.sub_point(source);
    let length = delta.hypot();

    if length < DEGENERATE_LENGTH {
        debug!(x = source.x(), y = source.y(); "Degenerate edge drawn as a point");
        return EdgeCurve {
            main: vec![source],
            arrowhead: None,
        };
    }

    let drawn = (length * params.length_fraction - 2.0 * params.dot_size).max(0.0);
    if drawn < DEGENERATE_LENGTH {
        debug!(length; "Edge fully covered by its markers");
        return EdgeCurve {
            main: vec![source.midpoint(destination)],
            arrowhead: None,
        };
    }

    let direction = delta.scale(1.0 / length);
    let skip = (length - drawn) / 2.0;
    let start = source.add_point(direction.scale(skip));
    let end = destination.sub_point(direction.scale(skip));

    let tip = match params.arrow_position {
        ArrowPosition::End => Some(end),
        ArrowPosition::Middle => Some(start.midpoint(end)),
        ArrowPosition::None => None,
    };
    let arrowhead = tip
        .filter(|_| params.arrow_length > 0.0)
        .map(|tip| {
            let back = direction.scale(-params.arrow_length);
            let angle = params.arrow_angle_degrees.to_radians();
            [
                [tip, tip.add_point(back.rotate(angle))],
                [tip, tip.add_point(back.rotate(-angle))],
            ]
        });

    EdgeCurve {
        main: vec![start, end],
        arrowhead,
    }
}
