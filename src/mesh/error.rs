use crate::prelude::*;

/// A connectivity tuple whose length does not match the arity of its element kind
#[derive(Display, Debug, Clone, PartialEq, Eq, Constructor)]
#[display(fmt = "{kind} elements are defined by {expected} nodes, got {actual}")]
pub struct InvalidElementArity {
    pub kind: ElementKind,
    pub expected: usize,
    pub actual: usize,
}

impl std::error::Error for InvalidElementArity {}

/// A connectivity entry that points past the end of the node list
#[derive(Display, Debug, Clone, PartialEq, Eq, Constructor)]
#[display(
    fmt = "{kind} element {element} references node {node} but the mesh only has {node_count} nodes"
)]
pub struct DanglingNode {
    pub kind: ElementKind,
    pub element: usize,
    pub node: usize,
    pub node_count: usize,
}

impl std::error::Error for DanglingNode {}

/// violations of the in-memory mesh invariants
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("{0}")]
    InvalidElementArity(#[from] InvalidElementArity),
    #[error("{0}")]
    DanglingNode(#[from] DanglingNode),
    #[error("{kind} group has {elements} elements but {tags} tags")]
    TagCountMismatch {
        kind: ElementKind,
        elements: usize,
        tags: usize,
    },
    #[error("node coordinates must have 3 columns, got {columns}")]
    NodeDimension { columns: usize },
}
