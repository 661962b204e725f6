//! Post-generation consistency checks.
//!
//! Every failure here is a builder defect, reported as a topology error.

use std::collections::HashSet;

use crate::error::{RodMeshError, RodMeshResult};

use super::model::{Block, BlockMeshModel, PatchKind, VertexId};

/// Checks index ranges, block shapes, coupling symmetry and merge pairs.
///
/// # Errors
/// Returns the first violated invariant as a topology error.
pub fn check_topology(model: &BlockMeshModel) -> RodMeshResult<()> {
    let count = model.vertices.len();
    let in_range = |id: VertexId, what: &str| {
        if id < count {
            Ok(())
        } else {
            Err(RodMeshError::topology(format!(
                "{what} references vertex {id} of {count}"
            )))
        }
    };

    for (i, block) in model.blocks.iter().enumerate() {
        for &id in &block.vertices {
            in_range(id, &format!("block {i}"))?;
        }
        if !is_well_formed(block) {
            return Err(RodMeshError::topology(format!(
                "block {i} ({}) repeats vertices {:?}",
                block.name, block.vertices
            )));
        }
        if block.cells.contains(&0) {
            return Err(RodMeshError::topology(format!(
                "block {i} ({}) has an empty cell count {:?}",
                block.name, block.cells
            )));
        }
    }

    for edge in &model.edges {
        in_range(edge.start, "arc")?;
        in_range(edge.end, "arc")?;
        if edge.start == edge.end {
            return Err(RodMeshError::topology(format!(
                "arc starts and ends at vertex {}",
                edge.start
            )));
        }
    }

    for projection in &model.projections {
        for &id in &projection.face {
            in_range(id, "projected face")?;
        }
        if projection.sphere >= model.spheres.len() {
            return Err(RodMeshError::topology(format!(
                "face {:?} projects onto missing sphere {}",
                projection.face, projection.sphere
            )));
        }
    }

    for patch in model.patches.iter() {
        for face in &patch.faces {
            for &id in face {
                in_range(id, &format!("patch `{}`", patch.name))?;
            }
        }
        if let PatchKind::Coupled { neighbour, owner } = &patch.kind {
            let partner = model.patches.get(neighbour).ok_or_else(|| {
                RodMeshError::topology(format!(
                    "patch `{}` is coupled to missing patch `{neighbour}`",
                    patch.name
                ))
            })?;
            match &partner.kind {
                PatchKind::Coupled {
                    neighbour: back,
                    owner: partner_owner,
                } if back == &patch.name && partner_owner != owner => {}
                other => {
                    return Err(RodMeshError::topology(format!(
                        "patch `{}` and `{neighbour}` are not a coupled pair ({other:?})",
                        patch.name
                    )));
                }
            }
        }
    }

    let mut merged = HashSet::new();
    for pair in &model.merge_pairs {
        for name in [&pair.master, &pair.slave] {
            let patch = model.patches.get(name).ok_or_else(|| {
                RodMeshError::topology(format!("merge pair names missing patch `{name}`"))
            })?;
            if patch.kind != PatchKind::Patch {
                return Err(RodMeshError::topology(format!(
                    "merged patch `{name}` is {}, not a plain patch",
                    patch.kind.type_name()
                )));
            }
            if !merged.insert(name.as_str()) {
                return Err(RodMeshError::topology(format!(
                    "patch `{name}` appears in two merge pairs"
                )));
            }
        }
    }
    Ok(())
}

/// Eight distinct vertices, or a wedge collapsed onto the axis on its first
/// and last corner of each face.
fn is_well_formed(block: &Block) -> bool {
    let v = block.vertices;
    let distinct = v.iter().collect::<HashSet<_>>().len();
    distinct == 8 || (distinct == 6 && v[0] == v[3] && v[4] == v[7])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point3;

    fn eight_vertex_model() -> BlockMeshModel {
        let mut model = BlockMeshModel::new(1.0);
        for _ in 0..10 {
            model.vertices.push(Point3::new(0.0, 0.0, 0.0));
        }
        model.push_block([0, 2, 3, 1, 4, 6, 7, 5], "fuel", [4, 1, 10]);
        model
    }

    #[test]
    fn collapsed_wedge_is_accepted() {
        let mut model = eight_vertex_model();
        model.push_block([8, 0, 1, 8, 9, 4, 5, 9], "cladding", [4, 1, 10]);
        assert!(check_topology(&model).is_ok());
    }

    #[test]
    fn out_of_range_vertex_is_rejected() {
        let mut model = eight_vertex_model();
        model.push_arc(3, 12, Point3::new(0.0, 0.0, 0.0));
        let err = check_topology(&model).unwrap_err();
        assert!(err.to_string().contains("vertex 12"));
    }

    #[test]
    fn one_sided_coupling_is_rejected() {
        let mut model = eight_vertex_model();
        model
            .patches
            .extend("fuelOuter", PatchKind::coupled("cladInner", true), [[2, 3, 7, 6]])
            .unwrap();
        assert!(check_topology(&model).is_err());

        model
            .patches
            .extend("cladInner", PatchKind::coupled("fuelOuter", false), [[1, 0, 4, 5]])
            .unwrap();
        assert!(check_topology(&model).is_ok());
    }

    #[test]
    fn merge_pair_needs_both_patches() {
        let mut model = eight_vertex_model();
        model
            .patches
            .extend("fuelTop_1", PatchKind::Patch, [[6, 7, 5, 4]])
            .unwrap();
        model.push_merge_pair("fuelTop_1", "fuelBottom_2");
        let err = check_topology(&model).unwrap_err();
        assert!(err.to_string().contains("fuelBottom_2"));
    }
}
