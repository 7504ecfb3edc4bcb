use crate::prelude::*;
use std::collections::BTreeSet;

impl Mesh {
    /// Build a new surface-only mesh out of every triangle and quad tagged with `tag`.
    ///
    /// The output keeps only the nodes the selected faces reference, in ascending order
    /// of their original index, and the connectivity is renumbered onto that contiguous
    /// range. Volume groups of the output are empty. If nothing carries `tag` the result
    /// is an empty mesh.
    pub fn extract_surface(&self, tag: Tag) -> Mesh {
        log::info!("extracting boundary faces tagged with {tag}");

        let selected: Vec<ElementGroup> = self
            .boundary_groups()
            .map(|group| group.filter_by_tag(tag))
            .collect();

        let referenced: BTreeSet<usize> = selected
            .iter()
            .flat_map(|group| group.connectivity().iter().copied())
            .collect();
        let old_indices: Vec<usize> = referenced.into_iter().collect();

        // dense old -> new lookup, only the referenced slots are ever read
        let mut renumber = vec![0; self.num_nodes()];
        for (new, old) in old_indices.iter().enumerate() {
            renumber[*old] = new;
        }

        let nodes = utils::take_rows(self.nodes(), &old_indices);

        let mut groups = ElementKind::ALL.map(ElementGroup::empty);
        for group in selected {
            let idx = group.kind().index();
            groups[idx] = group.map_nodes(|old| renumber[old]);
        }

        let out = Mesh::from_parts(nodes, groups);

        if out.num_boundary_elements() == 0 {
            log::warn!("no boundary faces carry tag {tag}, extracted surface is empty");
        } else {
            log::debug!(
                "extracted {} triangles and {} quads over {} nodes",
                out.num_tris(),
                out.num_quads(),
                out.num_nodes()
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// a strip of faces in the z = 0 plane tagged 1, one slanted triangle tagged 2
    fn two_faces() -> Mesh {
        let nodes = array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];

        Mesh::new(nodes)
            .unwrap()
            .with_group(
                ElementGroup::new(
                    ElementKind::Triangle,
                    array![[1, 2, 5], [0, 1, 6], [1, 5, 4]],
                    vec![1, 2, 1],
                )
                .unwrap(),
            )
            .unwrap()
            .with_group(
                ElementGroup::new(ElementKind::Quadrilateral, array![[0, 1, 4, 3]], vec![1])
                    .unwrap(),
            )
            .unwrap()
            .with_group(ElementGroup::untagged(ElementKind::Tetrahedron, array![[0, 1, 3, 6]]).unwrap())
            .unwrap()
    }

    #[test]
    fn renumbers_contiguously() {
        let mesh = two_faces();
        let surface = mesh.extract_surface(1);

        // node 6 is only used by the tag 2 triangle and the tet
        assert_eq!(surface.num_nodes(), 6);
        assert_eq!(surface.nodes(), &mesh.nodes().slice(ndarray::s![0..6, ..]).to_owned());

        assert_eq!(
            surface.group(ElementKind::Triangle).connectivity(),
            &array![[1, 2, 5], [1, 5, 4]]
        );
        assert_eq!(
            surface.group(ElementKind::Quadrilateral).connectivity(),
            &array![[0, 1, 4, 3]]
        );
        assert_eq!(surface.num_volume_elements(), 0);
    }

    #[test]
    fn skips_unreferenced_nodes() {
        let mesh = two_faces();
        let surface = mesh.extract_surface(2);

        assert_eq!(surface.num_nodes(), 3);
        assert_eq!(surface.node(2), Some([0.0, 0.0, 1.0]));
        assert_eq!(
            surface.group(ElementKind::Triangle).connectivity(),
            &array![[0, 1, 2]]
        );
        assert_eq!(surface.group(ElementKind::Triangle).tags(), &[2]);
        assert!(surface.group(ElementKind::Quadrilateral).is_empty());
    }

    #[test]
    fn missing_tag_is_empty() {
        let surface = two_faces().extract_surface(7);

        assert_eq!(surface.num_nodes(), 0);
        assert_eq!(surface.num_elements(), 0);
        assert_eq!(surface.nodes().dim(), (0, 3));
    }
}
