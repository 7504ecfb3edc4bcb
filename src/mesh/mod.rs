//! # Mesh Entity Model
//!
//! A [`Mesh`] is a list of node coordinates plus six homogeneous element groups, one per
//! [`ElementKind`]. Node indices inside the model are always 0-based; the file formats
//! are 1-based and the codecs are responsible for the conversion.
//!
//! Both codecs rely on the groups being visited in canonical order (triangles, quads,
//! tets, pyramids, prisms, hexes), so all iteration accessors here yield groups in that
//! order.
//!
//! A mesh is either built up front (with [`Mesh::new`] and [`Mesh::with_group`]) or produced
//! whole by a codec read. After that only whole-mesh transforms are available: uniform
//! scaling with [`Mesh::scale`] and boundary extraction with [`Mesh::extract_surface`].

mod error;
mod group;
mod kind;
mod surface;

pub use error::{DanglingNode, InvalidElementArity, MeshError};
pub use group::ElementGroup;
pub use kind::ElementKind;

use crate::prelude::*;
use std::collections::BTreeSet;

/// boundary / physical group identifier attached to every element
pub type Tag = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    nodes: Array2<f64>,
    groups: [ElementGroup; 6],
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            nodes: Array2::zeros((0, 3)),
            groups: ElementKind::ALL.map(ElementGroup::empty),
        }
    }
}

impl Mesh {
    /// create a mesh with the given `(n, 3)` node coordinates and no elements
    pub fn new(nodes: Array2<f64>) -> Result<Self, MeshError> {
        if nodes.ncols() != 3 {
            return Err(MeshError::NodeDimension {
                columns: nodes.ncols(),
            });
        }

        Ok(Self {
            nodes,
            ..Default::default()
        })
    }

    /// replace the group of `group.kind()` with `group`, checking that every node it
    /// references exists
    pub fn with_group(mut self, group: ElementGroup) -> Result<Self, MeshError> {
        group.check_nodes(self.num_nodes())?;
        let idx = group.kind().index();
        self.groups[idx] = group;
        Ok(self)
    }

    /// assemble a mesh whose connectivity has already been validated by a codec
    pub(crate) fn from_parts(nodes: Array2<f64>, groups: [ElementGroup; 6]) -> Self {
        debug_assert!(groups
            .iter()
            .zip(ElementKind::ALL)
            .all(|(group, kind)| group.kind() == kind));

        Self { nodes, groups }
    }

    /// `(n, 3)` array of node coordinates
    pub fn nodes(&self) -> &Array2<f64> {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> Option<[f64; 3]> {
        if idx < self.num_nodes() {
            let row = self.nodes.row(idx);
            Some([row[0], row[1], row[2]])
        } else {
            None
        }
    }

    pub fn group(&self, kind: ElementKind) -> &ElementGroup {
        &self.groups[kind.index()]
    }

    /// all six groups in canonical order
    pub fn groups(&self) -> impl Iterator<Item = &ElementGroup> {
        self.groups.iter()
    }

    /// triangle then quad groups
    pub fn boundary_groups(&self) -> impl Iterator<Item = &ElementGroup> {
        ElementKind::BOUNDARY.into_iter().map(|kind| self.group(kind))
    }

    /// tet, pyramid, prism then hex groups
    pub fn volume_groups(&self) -> impl Iterator<Item = &ElementGroup> {
        ElementKind::VOLUME.into_iter().map(|kind| self.group(kind))
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.nrows()
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.group(kind).len()
    }

    pub fn num_tris(&self) -> usize {
        self.count(ElementKind::Triangle)
    }

    pub fn num_quads(&self) -> usize {
        self.count(ElementKind::Quadrilateral)
    }

    pub fn num_tets(&self) -> usize {
        self.count(ElementKind::Tetrahedron)
    }

    pub fn num_pyramids(&self) -> usize {
        self.count(ElementKind::Pyramid)
    }

    pub fn num_prisms(&self) -> usize {
        self.count(ElementKind::Prism)
    }

    pub fn num_hexes(&self) -> usize {
        self.count(ElementKind::Hexahedron)
    }

    pub fn num_boundary_elements(&self) -> usize {
        self.boundary_groups().map(ElementGroup::len).sum()
    }

    pub fn num_volume_elements(&self) -> usize {
        self.volume_groups().map(ElementGroup::len).sum()
    }

    pub fn num_elements(&self) -> usize {
        self.num_boundary_elements() + self.num_volume_elements()
    }

    /// node count followed by the element count of every kind in canonical order
    pub fn counts(&self) -> [usize; 7] {
        let mut counts = [0; 7];
        counts[0] = self.num_nodes();
        for (slot, group) in counts[1..].iter_mut().zip(self.groups()) {
            *slot = group.len();
        }
        counts
    }

    /// every distinct tag carried by a triangle or quad
    pub fn boundary_tags(&self) -> BTreeSet<Tag> {
        self.boundary_groups()
            .flat_map(|group| group.tags().iter().copied())
            .collect()
    }

    /// multiply every node coordinate by `factor`. Topology is untouched
    pub fn scale(&mut self, factor: f64) {
        self.nodes *= factor;
    }
}
