use crate::prelude::*;

/// The six element shapes a [`Mesh`](crate::Mesh) can hold.
///
/// The declaration order is the canonical order both file formats use: boundary
/// faces (triangles, quads) first, then volume cells (tets, pyramids, prisms, hexes).
/// Anything that iterates over kinds should go through [`ElementKind::ALL`] (or the
/// `BOUNDARY` / `VOLUME` halves) so that ordering stays identical everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum ElementKind {
    #[display(fmt = "triangle")]
    Triangle,
    #[display(fmt = "quadrilateral")]
    Quadrilateral,
    #[display(fmt = "tetrahedron")]
    Tetrahedron,
    #[display(fmt = "pyramid")]
    Pyramid,
    #[display(fmt = "prism")]
    Prism,
    #[display(fmt = "hexahedron")]
    Hexahedron,
}

impl ElementKind {
    /// every kind in canonical order
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Triangle,
        ElementKind::Quadrilateral,
        ElementKind::Tetrahedron,
        ElementKind::Pyramid,
        ElementKind::Prism,
        ElementKind::Hexahedron,
    ];

    /// the 2D surface kinds, in canonical order
    pub const BOUNDARY: [ElementKind; 2] = [ElementKind::Triangle, ElementKind::Quadrilateral];

    /// the 3D volume kinds, in canonical order
    pub const VOLUME: [ElementKind; 4] = [
        ElementKind::Tetrahedron,
        ElementKind::Pyramid,
        ElementKind::Prism,
        ElementKind::Hexahedron,
    ];

    /// number of nodes that define a single element of this kind
    pub const fn arity(self) -> usize {
        match self {
            ElementKind::Triangle => 3,
            ElementKind::Quadrilateral => 4,
            ElementKind::Tetrahedron => 4,
            ElementKind::Pyramid => 5,
            ElementKind::Prism => 6,
            ElementKind::Hexahedron => 8,
        }
    }

    pub const fn is_boundary(self) -> bool {
        matches!(self, ElementKind::Triangle | ElementKind::Quadrilateral)
    }

    pub const fn is_volume(self) -> bool {
        !self.is_boundary()
    }

    /// position of this kind in [`ElementKind::ALL`]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// element type code used by the legacy ASCII (`.msh` v2.2) format
    pub const fn legacy_code(self) -> u32 {
        match self {
            ElementKind::Triangle => 2,
            ElementKind::Quadrilateral => 3,
            ElementKind::Tetrahedron => 4,
            ElementKind::Hexahedron => 5,
            ElementKind::Prism => 6,
            ElementKind::Pyramid => 7,
        }
    }

    /// inverse of [`ElementKind::legacy_code`]. Codes for shapes that are not modeled
    /// (points, lines, second order elements, ...) return `None`
    pub const fn from_legacy_code(code: u32) -> Option<ElementKind> {
        match code {
            2 => Some(ElementKind::Triangle),
            3 => Some(ElementKind::Quadrilateral),
            4 => Some(ElementKind::Tetrahedron),
            5 => Some(ElementKind::Hexahedron),
            6 => Some(ElementKind::Prism),
            7 => Some(ElementKind::Pyramid),
            _ => None,
        }
    }
}
