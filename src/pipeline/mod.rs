//! # Boundary layer pipeline
//!
//! Glue around the external programs that turn a tagged wall surface into a
//! boundary-layer volume mesh. The mesh library itself never depends on this module;
//! it only stages files for the tools, runs them in an explicit working directory and
//! reads their results back.
//!
//! ```text
//! surface.ugrid ──► surface.vtp ──► extrude ──► surface_BLMESH.ugrid ──► surface_BLMESH.msh
//!  layers.csv ────────────────────────┘
//!  extrude.inputs ────────────────────┘
//! ```

mod config;
pub mod mapbc;
mod tool;

pub use config::{ExtrusionConfig, PipelineConfig, ToolsConfig};
pub use mapbc::{BoundaryCondition, MapBc, MapBcEntry};
pub use tool::{ExternalTool, ExternalToolFailure, ToolOutput};

use crate::layers::{write_layers_csv, BoundaryLayerParams};
use crate::prelude::*;
pub use crate::write_vtp::{write_vtp, Encoding};

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// name of the layer table handed to the extrusion tool
pub const LAYERS_FILE: &str = "layers.csv";
/// name of the extrusion tool's input file
pub const EXTRUDE_INPUTS_FILE: &str = "extrude.inputs";

/// files produced by a finished [`BoundaryLayerJob`]
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLayerOutput {
    pub mesh: Mesh,
    pub ugrid_path: PathBuf,
    pub msh_path: PathBuf,
}

/// Extrudes a surface into a boundary-layer mesh. All files are read and written
/// inside `work_dir`, which must already exist.
#[derive(Debug, Clone)]
pub struct BoundaryLayerJob {
    work_dir: PathBuf,
    surface_stem: String,
    params: BoundaryLayerParams,
    extrusion: ExtrusionConfig,
    converter: Option<ExternalTool>,
    extruder: ExternalTool,
}

impl BoundaryLayerJob {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(
        work_dir: P,
        surface_stem: S,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            work_dir: work_dir.into(),
            surface_stem: surface_stem.into(),
            params: config.boundary_layer.clone(),
            extrusion: config.extrusion.clone(),
            converter: config.tools.converter.clone(),
            extruder: config.tools.extruder.clone(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.work_dir.join(file)
    }

    fn surface_ugrid(&self) -> String {
        format!("{}.ugrid", self.surface_stem)
    }

    fn surface_vtp(&self) -> String {
        format!("{}.vtp", self.surface_stem)
    }

    fn blmesh_ugrid(&self) -> String {
        format!("{}_BLMESH.ugrid", self.surface_stem)
    }

    fn blmesh_msh(&self) -> String {
        format!("{}_BLMESH.msh", self.surface_stem)
    }

    /// Write every input the tools need into the work directory: the surface as
    /// `.ugrid`, the layer table and the extrusion input file.
    pub fn stage(&self, surface: &Mesh) -> Result<(), Error> {
        let offsets = self.params.offsets()?;
        log::info!(
            "staging {} boundary faces with {} layer offsets in {}",
            surface.num_boundary_elements(),
            offsets.len(),
            self.work_dir.display()
        );

        crate::Ugrid::write_file(surface, &self.path(&self.surface_ugrid()))?;

        let layers = BufWriter::new(File::create(self.path(LAYERS_FILE))?);
        write_layers_csv(&offsets, layers)?;

        let inputs = BufWriter::new(File::create(self.path(EXTRUDE_INPUTS_FILE))?);
        self.extrusion
            .render(&self.surface_vtp(), LAYERS_FILE, &self.blmesh_ugrid(), inputs)?;

        Ok(())
    }

    /// produce `{stem}.vtp` next to the staged `.ugrid`
    fn convert_surface(&self, surface: &Mesh) -> Result<(), Error> {
        let vtp = self.path(&self.surface_vtp());

        match &self.converter {
            Some(converter) => {
                converter
                    .with_args(["-i".to_string(), self.surface_ugrid()])
                    .run_in(&self.work_dir)?;
                converter.require_output(&vtp)?;
            }
            None => {
                log::debug!("writing {} directly", vtp.display());
                let writer = BufWriter::new(File::create(&vtp)?);
                write_vtp(surface, writer, Encoding::Base64)?;
            }
        }

        Ok(())
    }

    /// Stage, convert, extrude and read the result back. The extruded mesh is also
    /// written in the legacy ASCII format for the farfield mesher. Any failing step
    /// aborts the job.
    pub fn run(&self, surface: &Mesh) -> Result<BoundaryLayerOutput, Error> {
        self.stage(surface)?;
        self.convert_surface(surface)?;

        self.extruder.run_in(&self.work_dir)?;
        let ugrid_path = self.path(&self.blmesh_ugrid());
        self.extruder.require_output(&ugrid_path)?;

        let mesh = crate::Ugrid::read_file(&ugrid_path)?;

        let msh_path = self.path(&self.blmesh_msh());
        crate::MshV2::write_file(&mesh, &msh_path)?;

        Ok(BoundaryLayerOutput {
            mesh,
            ugrid_path,
            msh_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn wall() -> Mesh {
        let nodes = array![
            [0., 0., 0.],
            [1., 0., 0.],
            [1., 1., 0.],
            [0., 1., 0.],
            [0.5, 0.5, 0.25],
        ];
        let tris = ElementGroup::new(ElementKind::Triangle, array![[0, 1, 4], [1, 2, 4]], vec![1, 1])
            .unwrap();
        let quads =
            ElementGroup::new(ElementKind::Quadrilateral, array![[0, 1, 2, 3]], vec![2]).unwrap();

        Mesh::new(nodes)
            .unwrap()
            .with_group(tris)
            .unwrap()
            .with_group(quads)
            .unwrap()
    }

    fn config_with_extruder(extruder: ExternalTool) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.tools.extruder = extruder;
        config
    }

    #[test]
    fn stage_writes_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let job = BoundaryLayerJob::new(dir.path(), "wing", &PipelineConfig::default());

        job.stage(&wall()).unwrap();

        let layers = std::fs::read_to_string(dir.path().join(LAYERS_FILE)).unwrap();
        assert_eq!(layers.trim_end().split(',').count(), 11);
        assert!(layers.starts_with("0.0001,"));

        let inputs = std::fs::read_to_string(dir.path().join(EXTRUDE_INPUTS_FILE)).unwrap();
        assert!(inputs.starts_with("input_file: wing.vtp\nlayers_file: layers.csv\n"));
        assert!(inputs.contains("output_file: wing_BLMESH.ugrid\n"));

        let staged = crate::Ugrid::read_file(&dir.path().join("wing.ugrid")).unwrap();
        assert_eq!(staged, wall());
    }

    #[test]
    fn invalid_spacing_stops_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.boundary_layer.growth_rate = 0.0;

        let err = BoundaryLayerJob::new(dir.path(), "wing", &config)
            .stage(&wall())
            .unwrap_err();

        assert!(matches!(err, Error::LayerSpacing(_)));
        assert!(!dir.path().join("wing.ugrid").exists());
    }

    #[cfg(unix)]
    #[test]
    fn run_with_copying_extruder() {
        let dir = tempfile::tempdir().unwrap();
        let extruder = ExternalTool::new("sh")
            .arg("-c")
            .arg("test -f wing.vtp && cp wing.ugrid wing_BLMESH.ugrid");
        let job = BoundaryLayerJob::new(dir.path(), "wing", &config_with_extruder(extruder));

        let output = job.run(&wall()).unwrap();

        assert_eq!(output.ugrid_path, dir.path().join("wing_BLMESH.ugrid"));
        assert_eq!(output.mesh, wall());

        let msh = crate::MshV2::read_file(&output.msh_path).unwrap();
        assert_eq!(msh, wall());
    }

    #[cfg(unix)]
    #[test]
    fn failing_extruder() {
        let dir = tempfile::tempdir().unwrap();
        let job = BoundaryLayerJob::new(
            dir.path(),
            "wing",
            &config_with_extruder(ExternalTool::new("false")),
        );

        let err = job.run(&wall()).unwrap_err();
        assert!(matches!(
            err,
            Error::ExternalToolFailure(ExternalToolFailure::ExitStatus { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn extruder_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let job = BoundaryLayerJob::new(
            dir.path(),
            "wing",
            &config_with_extruder(ExternalTool::new("true")),
        );

        let err = job.run(&wall()).unwrap_err();
        assert!(matches!(
            err,
            Error::ExternalToolFailure(ExternalToolFailure::MissingOutput { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn external_converter_gets_the_surface_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_extruder(
            ExternalTool::new("sh")
                .arg("-c")
                .arg("cp wing.ugrid wing_BLMESH.ugrid"),
        );
        config.tools.converter = Some(
            ExternalTool::new("sh")
                .arg("-c")
                .arg("test \"$1\" = -i && touch \"${2%.ugrid}.vtp\"")
                .arg("convert"),
        );

        let job = BoundaryLayerJob::new(dir.path(), "wing", &config);
        job.run(&wall()).unwrap();

        assert!(dir.path().join("wing.vtp").is_file());
    }
}
