use crate::prelude::*;

use super::error::{DanglingNode, InvalidElementArity, MeshError};

/// A homogeneous collection of elements of a single [`ElementKind`].
///
/// Connectivity is stored as an `(elements, arity)` array of 0-based node indices
/// and every element carries exactly one tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementGroup {
    kind: ElementKind,
    connectivity: Array2<usize>,
    tags: Vec<Tag>,
}

impl ElementGroup {
    /// a group of `kind` with no elements in it
    pub fn empty(kind: ElementKind) -> Self {
        Self {
            kind,
            connectivity: Array2::zeros((0, kind.arity())),
            tags: Vec::new(),
        }
    }

    /// construct a group from a connectivity array and one tag per row
    pub fn new(
        kind: ElementKind,
        connectivity: Array2<usize>,
        tags: Vec<Tag>,
    ) -> Result<Self, MeshError> {
        let (elements, columns) = connectivity.dim();

        if columns != kind.arity() {
            return Err(InvalidElementArity::new(kind, kind.arity(), columns).into());
        }

        if elements != tags.len() {
            return Err(MeshError::TagCountMismatch {
                kind,
                elements,
                tags: tags.len(),
            });
        }

        Ok(Self {
            kind,
            connectivity,
            tags,
        })
    }

    /// construct a group from row-major connectivity, `arity` indices per element
    pub fn from_flat(kind: ElementKind, flat: Vec<usize>, tags: Vec<Tag>) -> Result<Self, MeshError> {
        let arity = kind.arity();

        if flat.len() != tags.len() * arity {
            let actual = flat.len() / tags.len().max(1);
            return Err(InvalidElementArity::new(kind, arity, actual).into());
        }

        let connectivity = Array2::from_shape_vec((tags.len(), arity), flat)
            .map_err(|_| InvalidElementArity::new(kind, arity, 0))?;

        Self::new(kind, connectivity, tags)
    }

    /// volume elements carry no meaningful tag, they are all assigned `0`
    pub fn untagged(kind: ElementKind, connectivity: Array2<usize>) -> Result<Self, MeshError> {
        let tags = vec![0; connectivity.nrows()];
        Self::new(kind, connectivity, tags)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// `(elements, arity)` array of 0-based node indices
    pub fn connectivity(&self) -> &Array2<usize> {
        &self.connectivity
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// the nodes of a single element
    pub fn element(&self, idx: usize) -> Option<ArrayView1<'_, usize>> {
        if idx < self.len() {
            Some(self.connectivity.row(idx))
        } else {
            None
        }
    }

    /// iterate over every element's nodes together with its tag
    pub fn iter(&self) -> impl Iterator<Item = (ArrayView1<'_, usize>, Tag)> + '_ {
        self.connectivity
            .outer_iter()
            .zip(self.tags.iter().copied())
    }

    /// a new group holding only the elements whose tag equals `tag`, in their original order
    pub fn filter_by_tag(&self, tag: Tag) -> ElementGroup {
        let rows: Vec<usize> = self
            .tags
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == tag)
            .map(|(idx, _)| idx)
            .collect();

        ElementGroup {
            kind: self.kind,
            connectivity: utils::take_rows(&self.connectivity, &rows),
            tags: vec![tag; rows.len()],
        }
    }

    /// apply `f` to every node index in the group
    pub(crate) fn map_nodes<F: Fn(usize) -> usize>(&self, f: F) -> ElementGroup {
        ElementGroup {
            kind: self.kind,
            connectivity: self.connectivity.mapv(f),
            tags: self.tags.clone(),
        }
    }

    /// ensure every referenced node exists in a mesh with `node_count` nodes
    pub(crate) fn check_nodes(&self, node_count: usize) -> Result<(), MeshError> {
        for (element, row) in self.connectivity.outer_iter().enumerate() {
            if let Some(node) = row.iter().find(|n| **n >= node_count) {
                return Err(DanglingNode::new(self.kind, element, *node, node_count).into());
            }
        }

        Ok(())
    }
}
