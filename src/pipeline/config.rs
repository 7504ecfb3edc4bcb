use crate::layers::BoundaryLayerParams;
use crate::prelude::*;

use super::mapbc::MapBc;
use super::tool::ExternalTool;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the extrusion tool's `key: value` input file. Every field defaults to
/// the value the pipeline has always used, so a TOML table only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtrusionConfig {
    pub direction: String,
    pub smooth_normals: bool,
    pub smooth_normals_iterations: u32,
    pub smooth_null_space: bool,
    pub null_space_iterations: u32,
    pub null_space_limit: f64,
    pub null_space_relaxation: f64,
    pub eigenvector_threshold: f64,
    pub smooth_curvature: bool,
    pub curvature_factor: f64,
    pub symmetry: String,
    pub symmetry_threshold: f64,
    pub unmodified_layers: u32,
    pub debug_mode: bool,
    pub debug_start_layer: u32,
}

impl Default for ExtrusionConfig {
    fn default() -> Self {
        Self {
            direction: "nominal".into(),
            smooth_normals: true,
            smooth_normals_iterations: 15,
            smooth_null_space: true,
            null_space_iterations: 30,
            null_space_limit: 2.0,
            null_space_relaxation: 0.6,
            eigenvector_threshold: 0.5,
            smooth_curvature: true,
            curvature_factor: 4.0,
            symmetry: "none".into(),
            symmetry_threshold: 2.0,
            unmodified_layers: 5,
            debug_mode: false,
            debug_start_layer: 1,
        }
    }
}

impl ExtrusionConfig {
    /// Write the input file of the extrusion tool. The three file names are written as
    /// given and are resolved by the tool relative to its working directory.
    pub fn render<W: Write>(
        &self,
        input_file: &str,
        layers_file: &str,
        output_file: &str,
        mut writer: W,
    ) -> Result<(), Error> {
        writeln!(writer, "input_file: {input_file}")?;
        writeln!(writer, "layers_file: {layers_file}")?;
        writeln!(writer, "output_file: {output_file}")?;
        writeln!(writer, "direction: {}", self.direction)?;
        writeln!(writer, "smooth_normals: {}", self.smooth_normals)?;
        writeln!(
            writer,
            "smooth_normals_iterations: {}",
            self.smooth_normals_iterations
        )?;
        writeln!(writer, "smooth_null_space: {}", self.smooth_null_space)?;
        writeln!(writer, "null_space_iterations: {}", self.null_space_iterations)?;
        writeln!(
            writer,
            "null_space_limit: {}",
            utils::shortest(self.null_space_limit)
        )?;
        writeln!(
            writer,
            "null_space_relaxation: {}",
            utils::shortest(self.null_space_relaxation)
        )?;
        writeln!(
            writer,
            "eigenvector_threshold: {}",
            utils::shortest(self.eigenvector_threshold)
        )?;
        writeln!(writer, "smooth_curvature: {}", self.smooth_curvature)?;
        writeln!(
            writer,
            "curvature_factor: {}",
            utils::shortest(self.curvature_factor)
        )?;
        writeln!(writer, "symmetry: {}", self.symmetry)?;
        writeln!(
            writer,
            "symmetry_threshold: {}",
            utils::shortest(self.symmetry_threshold)
        )?;
        writeln!(writer, "unmodified_layers: {}", self.unmodified_layers)?;
        writeln!(writer, "debug_mode: {}", self.debug_mode)?;
        writeln!(writer, "debug_start_layer: {}", self.debug_start_layer)?;

        writer.flush()?;
        Ok(())
    }
}

/// the external programs a boundary layer job shells out to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// `.ugrid` to `.vtp` converter. Unset by default, in which case the surface is
    /// written with [`write_vtp`](crate::pipeline::write_vtp).
    pub converter: Option<ExternalTool>,
    pub extruder: ExternalTool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            converter: None,
            extruder: ExternalTool::new("extrude"),
        }
    }
}

/// Everything the boundary layer pipeline reads from a TOML file.
///
/// ```toml
/// [boundary_layer]
/// initial_spacing = 1e-5
/// layers = 20
///
/// [extrusion]
/// smooth_normals_iterations = 30
///
/// [tools.extruder]
/// program = "/opt/mesh_tools/bin/extrude"
///
/// [[boundary_conditions]]
/// tag = 1
/// condition = 3000
/// name = "wall"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub boundary_layer: BoundaryLayerParams,
    pub extrusion: ExtrusionConfig,
    pub tools: ToolsConfig,
    pub boundary_conditions: MapBc,
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded pipeline configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::BoundaryCondition;

    #[test]
    fn render_defaults() {
        let mut out = Vec::new();
        ExtrusionConfig::default()
            .render("wing.vtp", "layers.csv", "wing_BLMESH.ugrid", &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "\
input_file: wing.vtp
layers_file: layers.csv
output_file: wing_BLMESH.ugrid
direction: nominal
smooth_normals: true
smooth_normals_iterations: 15
smooth_null_space: true
null_space_iterations: 30
null_space_limit: 2.0
null_space_relaxation: 0.6
eigenvector_threshold: 0.5
smooth_curvature: true
curvature_factor: 4.0
symmetry: none
symmetry_threshold: 2.0
unmodified_layers: 5
debug_mode: false
debug_start_layer: 1
";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn partial_tables() {
        let text = r#"
            [boundary_layer]
            initial_spacing = 1e-5
            layers = 20

            [extrusion]
            symmetry = "y"

            [tools]
            extruder = { program = "/opt/bin/extrude", args = ["--quiet"] }

            [[boundary_conditions]]
            tag = 1
            condition = 3000
            name = "wall"

            [[boundary_conditions]]
            tag = 3
            condition = 5050
            name = "farfield"
        "#;

        let config = PipelineConfig::from_toml_str(text).unwrap();

        assert_eq!(config.boundary_layer.initial_spacing, 1e-5);
        assert_eq!(config.boundary_layer.layers, 20);
        assert_eq!(config.boundary_layer.growth_rate, 1.2);
        assert_eq!(config.extrusion.symmetry, "y");
        assert_eq!(config.extrusion.smooth_normals_iterations, 15);
        assert_eq!(config.tools.extruder.program, "/opt/bin/extrude");
        assert_eq!(config.tools.extruder.args, vec!["--quiet".to_string()]);
        assert!(config.tools.converter.is_none());

        let entries = config.boundary_conditions.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].condition, BoundaryCondition::Tangency);
        assert_eq!(entries[1].condition, BoundaryCondition::Freestream);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = PipelineConfig::from_toml_str("[extrusion]\nsmoothing = 3\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
