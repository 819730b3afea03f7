//! SVG rendering of scenes.
//!
//! Node markers become circles carrying a `data-node-id` attribute and a
//! `<title>` tooltip, so a browser front end can report picks by id. All edge
//! curves share one `path` element; every polyline starts a new `M` subpath.

mod layer;

use std::{fmt::Write as _, fs::File, io::Write as _};

use log::{debug, error, info};
use svg::{Document, Node as _, node::element as svg_element};

use dagscope_core::geometry::Bounds;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};

use crate::{
    config::StyleConfig,
    draw::PathVertex,
    export,
    scene::{Marker, Scene},
};

/// Space around the scene content, on every side.
const MARGIN: f32 = 50.0;

/// SVG exporter writing to a file.
#[derive(Debug, Clone)]
pub struct Svg {
    file_name: String,
    style: StyleConfig,
}

impl Svg {
    pub fn new(file_name: &str, style: StyleConfig) -> Self {
        Self {
            file_name: file_name.to_string(),
            style,
        }
    }

    /// Renders `scene` to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a configured color is invalid.
    pub fn render_scene(&self, scene: &Scene) -> Result<Document, export::Error> {
        let style = &self.style;
        let node_color = style.node_color().map_err(export::Error::Render)?;
        let node_stroke_color = style.node_stroke_color().map_err(export::Error::Render)?;
        let highlight_color = style.highlight_color().map_err(export::Error::Render)?;
        let edge_color = style.edge_color().map_err(export::Error::Render)?;
        let background_color = style.background_color().map_err(export::Error::Render)?;

        let view = self.view_bounds(scene);
        let mut output = LayeredOutput::new();

        if let Some(color) = background_color {
            let background = svg_element::Rectangle::new()
                .set("x", view.min_x())
                .set("y", view.min_y())
                .set("width", view.width())
                .set("height", view.height())
                .set("fill", color);
            output.add_to_layer(RenderLayer::Background, Box::new(background));
        }

        let path_data = path_data(scene.edge_lines().vertices());
        if !path_data.is_empty() {
            let edges = svg_element::Path::new()
                .set("d", path_data)
                .set("fill", "none")
                .set("stroke", &edge_color)
                .set("stroke-width", style.edge_width())
                .set("stroke-linecap", "round");
            output.add_to_layer(RenderLayer::Edge, Box::new(edges));
        }

        let radius = style.marker_size() / 2.0;
        for marker in scene.node_markers().markers() {
            let circle = self
                .marker_circle(marker, radius)
                .set("fill", &node_color)
                .set("stroke", &node_stroke_color);
            output.add_to_layer(RenderLayer::Node, Box::new(circle));
        }

        for series in scene.highlights() {
            for marker in series.markers() {
                let circle = self
                    .marker_circle(marker, radius)
                    .set("fill", &highlight_color)
                    .set("stroke", &node_stroke_color)
                    .set("data-series", series.name());
                output.add_to_layer(RenderLayer::Highlight, Box::new(circle));
            }
        }

        for annotation in scene.annotations() {
            let text = svg_element::Text::new(annotation.text())
                .set("x", annotation.position().x())
                .set("y", annotation.position().y())
                .set("text-anchor", "middle")
                .set("dominant-baseline", "middle")
                .set("font-size", style.font_size())
                .set("pointer-events", "none");
            output.add_to_layer(RenderLayer::Text, Box::new(text));
        }

        let doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    view.min_x(),
                    view.min_y(),
                    view.width(),
                    view.height()
                ),
            )
            .set("width", view.width())
            .set("height", view.height());

        let doc = output
            .render()
            .into_iter()
            .fold(doc, |doc, group| doc.add(group));
        debug!(
            markers = scene.node_markers().len(),
            highlights = scene.highlights().len();
            "SVG document rendered"
        );

        Ok(doc)
    }

    fn marker_circle(&self, marker: &Marker, radius: f32) -> svg_element::Circle {
        let mut title = svg_element::Element::new("title");
        title.append(svg::node::Text::new(marker.tooltip()));

        svg_element::Circle::new()
            .set("cx", marker.position().x())
            .set("cy", marker.position().y())
            .set("r", radius)
            .set("data-node-id", marker.node().to_string())
            .add(title)
    }

    /// Scene bounds grown by the marker radius and the margin.
    fn view_bounds(&self, scene: &Scene) -> Bounds {
        scene
            .bounds()
            .unwrap_or_default()
            .expand(self.style.marker_size() / 2.0 + MARGIN)
    }

    /// Writes an SVG document to the configured file.
    pub fn write_document(&self, doc: &Document) -> Result<(), export::Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(&f, "{doc}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_scene(&mut self, scene: &Scene) -> Result<(), export::Error> {
        let doc = self.render_scene(scene)?;
        self.write_document(&doc)
    }
}

/// Renders `scene` to an SVG string without touching the file system.
///
/// # Errors
///
/// Returns [`export::Error::Render`] if a configured color is invalid.
pub fn render_svg(scene: &Scene, style: &StyleConfig) -> Result<String, export::Error> {
    let svg = Svg::new("", style.clone());
    Ok(svg.render_scene(scene)?.to_string())
}

/// Path data of all polylines; a polyline of one point becomes a dot.
fn path_data(vertices: &[PathVertex]) -> String {
    let mut data = String::new();
    let mut run_len = 0;

    for vertex in vertices {
        match vertex {
            PathVertex::Point(point) => {
                let command = if run_len == 0 { 'M' } else { 'L' };
                if !data.is_empty() {
                    data.push(' ');
                }
                let _ = write!(data, "{command} {} {}", point.x(), point.y());
                run_len += 1;
            }
            PathVertex::Break => {
                if run_len == 1 {
                    data.push_str(" h 0");
                }
                run_len = 0;
            }
        }
    }
    if run_len == 1 {
        data.push_str(" h 0");
    }

    data
}
