//! # Traits
//!
//! [`MeshFormat`] ties a file extension to a reader and a writer. The two formats this
//! crate understands are the marker types [`Ugrid`](crate::Ugrid) and
//! [`MshV2`](crate::MshV2); [`read_mesh`](crate::read_mesh) and
//! [`write_mesh`](crate::write_mesh) pick between them by extension.

use crate::parse::Parsed;
use crate::prelude::*;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// describes how a single on-disk mesh format is read and written
pub trait MeshFormat {
    /// file extension (without the leading dot) that selects this format
    const EXTENSION: &'static str;

    /// parse a whole document from `reader`. `name` identifies the source in errors
    fn parse<R: BufRead>(reader: R, name: &str) -> Result<Parsed, Error>;

    /// serialize a whole mesh to `writer`
    fn write<W: Write>(mesh: &Mesh, writer: W) -> Result<(), Error>;

    /// Read a mesh from a file. Warnings are logged and dropped; use [`MeshFormat::parse`]
    /// to inspect them.
    fn read_file(path: &Path) -> Result<Mesh, Error> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let parsed = Self::parse(reader, &path.display().to_string())?;

        log::info!(
            "read {}: {} nodes, {} boundary faces, {} volume cells",
            path.display(),
            parsed.mesh.num_nodes(),
            parsed.mesh.num_boundary_elements(),
            parsed.mesh.num_volume_elements()
        );

        Ok(parsed.mesh)
    }

    /// Write a mesh to a file, creating or truncating it. If this fails the file is left
    /// in whatever state it reached.
    fn write_file(mesh: &Mesh, path: &Path) -> Result<(), Error> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        Self::write(mesh, writer)?;

        log::info!(
            "wrote {}: {} nodes, {} elements",
            path.display(),
            mesh.num_nodes(),
            mesh.num_elements()
        );

        Ok(())
    }
}

impl MeshFormat for crate::Ugrid {
    const EXTENSION: &'static str = "ugrid";

    fn parse<R: BufRead>(reader: R, name: &str) -> Result<Parsed, Error> {
        crate::ugrid::parse(reader, name)
    }

    fn write<W: Write>(mesh: &Mesh, writer: W) -> Result<(), Error> {
        crate::ugrid::write(mesh, writer)
    }
}

impl MeshFormat for crate::MshV2 {
    const EXTENSION: &'static str = "msh";

    fn parse<R: BufRead>(reader: R, name: &str) -> Result<Parsed, Error> {
        crate::msh::parse(reader, name)
    }

    fn write<W: Write>(mesh: &Mesh, writer: W) -> Result<(), Error> {
        crate::msh::write(mesh, writer)
    }
}
