#![doc = include_str!("../README.md")]

pub mod layers;
pub mod mesh;
pub mod msh;
pub mod parse;
pub mod pipeline;
pub mod prelude;
mod traits;
pub mod ugrid;
mod utils;
mod write_vtp;

pub use traits::MeshFormat;

pub use mesh::{ElementGroup, ElementKind, Mesh, MeshError, Tag};
pub use parse::{ParseError, Parsed, Warning};

pub use layers::{layer_spacing, write_layers_csv, BoundaryLayerParams, LayerSpacingError};
pub use pipeline::ExternalToolFailure;

pub use ndarray;

use std::path::{Path, PathBuf};

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Could not parse mesh file: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("Invalid mesh: {0}")]
    Mesh(#[from] mesh::MeshError),
    #[error("Unrecognized mesh file extension: `{}`", .0.display())]
    UnrecognizedFileExtension(PathBuf),
    #[error("External tool failed: {0}")]
    ExternalToolFailure(#[from] pipeline::ExternalToolFailure),
    #[error("Invalid boundary layer spacing: {0}")]
    LayerSpacing(#[from] layers::LayerSpacingError),
    #[error("Could not write XML data to file: `{0}`")]
    XmlWrite(#[from] quick_xml::Error),
    #[error("Could not decode configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// structured-grid (`.ugrid`) format marker type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ugrid;

/// legacy ASCII `.msh` (version 2.2) format marker type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MshV2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Ugrid,
    MshV2,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, Error> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        if extension.eq_ignore_ascii_case(Ugrid::EXTENSION) {
            Ok(Format::Ugrid)
        } else if extension.eq_ignore_ascii_case(MshV2::EXTENSION) {
            Ok(Format::MshV2)
        } else {
            Err(Error::UnrecognizedFileExtension(path.to_path_buf()))
        }
    }
}

/// Read a mesh file, choosing the codec from the extension (`.ugrid` or `.msh`).
///
/// Tolerated anomalies are logged. Use [`MeshFormat::parse`] directly to inspect them.
pub fn read_mesh(path: &Path) -> Result<Mesh, Error> {
    match Format::from_path(path)? {
        Format::Ugrid => Ugrid::read_file(path),
        Format::MshV2 => MshV2::read_file(path),
    }
}

/// Write a mesh file, choosing the codec from the extension (`.ugrid` or `.msh`).
///
/// The extension is checked before anything is created on disk.
pub fn write_mesh(mesh: &Mesh, path: &Path) -> Result<(), Error> {
    match Format::from_path(path)? {
        Format::Ugrid => Ugrid::write_file(mesh, path),
        Format::MshV2 => MshV2::write_file(mesh, path),
    }
}

/// read `input` and write it back out as `output`, each in the format its extension names
pub fn convert_mesh(input: &Path, output: &Path) -> Result<Mesh, Error> {
    // fail on a bad output extension before doing any reading
    Format::from_path(output)?;

    let mesh = read_mesh(input)?;
    write_mesh(&mesh, output)?;
    Ok(mesh)
}
