#![allow(dead_code)]

use umesh::ndarray::array;
use umesh::{ElementGroup, ElementKind, Mesh};

/// A unit cube hex with a pyramid on its top face, a tet and a prism hanging off one
/// side, and boundary faces tagged 1, 2 and 3.
pub fn mixed_mesh() -> Mesh {
    let nodes = array![
        [0., 0., 0.],
        [1., 0., 0.],
        [1., 1., 0.],
        [0., 1., 0.],
        [0., 0., 1.],
        [1., 0., 1.],
        [1., 1., 1.],
        [0., 1., 1.],
        [0.5, 0.5, 1.5],
        [2., 0., 0.],
        [-0.125, 0.3333333333333333, 1e-7],
    ];

    let tris = ElementGroup::new(
        ElementKind::Triangle,
        array![[1, 9, 2], [4, 5, 8]],
        vec![3, 1],
    )
    .unwrap();
    let quads = ElementGroup::new(
        ElementKind::Quadrilateral,
        array![[0, 1, 2, 3], [0, 1, 5, 4]],
        vec![2, 2],
    )
    .unwrap();
    let tets = ElementGroup::untagged(ElementKind::Tetrahedron, array![[1, 9, 2, 5]]).unwrap();
    let pyramids = ElementGroup::untagged(ElementKind::Pyramid, array![[4, 5, 6, 7, 8]]).unwrap();
    let prisms =
        ElementGroup::untagged(ElementKind::Prism, array![[0, 1, 3, 4, 5, 10]]).unwrap();
    let hexes =
        ElementGroup::untagged(ElementKind::Hexahedron, array![[0, 1, 2, 3, 4, 5, 6, 7]]).unwrap();

    [tris, quads, tets, pyramids, prisms, hexes]
        .into_iter()
        .try_fold(Mesh::new(nodes).unwrap(), Mesh::with_group)
        .unwrap()
}
