mod common;

use umesh::{ElementKind, MeshFormat, MshV2, Ugrid};

#[test]
fn ugrid_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.ugrid");
    let mesh = common::mixed_mesh();

    umesh::write_mesh(&mesh, &path).unwrap();
    let back = umesh::read_mesh(&path).unwrap();

    assert_eq!(back, mesh);
    assert_eq!(back.counts(), [11, 2, 2, 1, 1, 1, 1]);
}

#[test]
fn msh_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.msh");
    let mesh = common::mixed_mesh();

    umesh::write_mesh(&mesh, &path).unwrap();
    let back = umesh::read_mesh(&path).unwrap();

    assert_eq!(back, mesh);
}

#[test]
fn ugrid_output_has_no_exponents() {
    let mut out = Vec::new();
    Ugrid::write(&common::mixed_mesh(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let nodes: Vec<&str> = text.lines().skip(1).take(11).collect();
    for line in &nodes {
        assert!(!line.contains(['e', 'E']), "exponent in `{line}`");
    }
    assert!(nodes[10].starts_with("-0.125"));
}

#[test]
fn pyramid_through_both_formats() {
    let mesh = common::mixed_mesh();

    let mut msh = Vec::new();
    MshV2::write(&mesh, &mut msh).unwrap();
    let msh = String::from_utf8(msh).unwrap();

    // tris and quads take indices 1..=4, the tet is 5
    assert!(msh.lines().any(|line| line == "6 7 2 0 0 5 8 9 6 7"));

    let from_msh = MshV2::parse(msh.as_bytes(), "mixed.msh").unwrap().mesh;
    let mut ugrid = Vec::new();
    Ugrid::write(&from_msh, &mut ugrid).unwrap();
    let from_ugrid = Ugrid::parse(ugrid.as_slice(), "mixed.ugrid").unwrap().mesh;

    let pyramid = from_ugrid.group(ElementKind::Pyramid).element(0).unwrap();
    assert_eq!(pyramid.to_vec(), vec![4, 5, 6, 7, 8]);
    assert_eq!(from_ugrid, mesh);
}

#[test]
fn convert_between_formats() {
    let dir = tempfile::tempdir().unwrap();
    let ugrid = dir.path().join("in.ugrid");
    let msh = dir.path().join("out.msh");

    umesh::write_mesh(&common::mixed_mesh(), &ugrid).unwrap();
    let converted = umesh::convert_mesh(&ugrid, &msh).unwrap();

    assert_eq!(converted, common::mixed_mesh());
    assert_eq!(MshV2::read_file(&msh).unwrap(), converted);
}

#[test]
fn scaled_mesh_keeps_topology() {
    let mut mesh = common::mixed_mesh();
    mesh.scale(0.5);

    assert_eq!(mesh.node(8), Some([0.25, 0.25, 0.75]));
    assert_eq!(mesh.counts(), common::mixed_mesh().counts());
    assert_eq!(
        mesh.group(ElementKind::Hexahedron),
        common::mixed_mesh().group(ElementKind::Hexahedron)
    );
}
