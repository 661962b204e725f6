//! Counts describing a generated block mesh.

use std::fmt;

use serde::Serialize;

use super::model::{BlockMeshModel, PatchKind};

/// Size and patch statistics of one [`BlockMeshModel`].
///
/// Returned by `rod-mesh check` and logged after generation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshSummary {
    pub vertex_count: usize,
    pub block_count: usize,
    /// Arc edges.
    pub edge_count: usize,
    pub sphere_count: usize,
    pub projected_face_count: usize,
    pub patch_count: usize,
    /// Patches of type `wedge`.
    pub wedge_patch_count: usize,
    /// Patches of type `empty`.
    pub empty_patch_count: usize,
    /// Region-coupled patches, both sides counted.
    pub coupled_patch_count: usize,
    pub boundary_face_count: usize,
    pub merge_pair_count: usize,
    /// Product of the block cell counts, summed.
    pub cell_count: u64,
}

impl MeshSummary {
    #[must_use]
    pub fn of(model: &BlockMeshModel) -> Self {
        let mut summary = Self {
            vertex_count: model.vertices.len(),
            block_count: model.blocks.len(),
            edge_count: model.edges.len(),
            sphere_count: model.spheres.len(),
            projected_face_count: model.projections.len(),
            patch_count: model.patches.len(),
            merge_pair_count: model.merge_pairs.len(),
            cell_count: model.cell_count(),
            ..Self::default()
        };
        for patch in model.patches.iter() {
            summary.boundary_face_count += patch.faces.len();
            match patch.kind {
                PatchKind::Wedge => summary.wedge_patch_count += 1,
                PatchKind::Empty => summary.empty_patch_count += 1,
                PatchKind::Coupled { .. } => summary.coupled_patch_count += 1,
                PatchKind::Patch => {}
            }
        }
        summary
    }

    /// Returns `true` when the mesh has curved geometry (arcs or projections).
    #[must_use]
    pub fn is_curved(&self) -> bool {
        self.edge_count > 0 || self.projected_face_count > 0
    }

    /// Short one-line report for logs.
    ///
    /// Format: `"V:{vertices} B:{blocks} C:{cells} [extras...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "V:{} B:{} C:{}",
            self.vertex_count, self.block_count, self.cell_count
        )];
        if self.edge_count > 0 {
            parts.push(format!("arcs:{}", self.edge_count));
        }
        if self.projected_face_count > 0 {
            parts.push(format!(
                "projected:{} on {} spheres",
                self.projected_face_count, self.sphere_count
            ));
        }
        parts.push(format!("patches:{}", self.patch_count));
        if self.coupled_patch_count > 0 {
            parts.push(format!("coupled:{}", self.coupled_patch_count));
        }
        if self.merge_pair_count > 0 {
            parts.push(format!("merge:{}", self.merge_pair_count));
        }
        parts.join(" ")
    }
}

impl fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block mesh summary:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Blocks: {}", self.block_count)?;
        writeln!(f, "  Cells: {}", self.cell_count)?;
        if self.is_curved() {
            writeln!(f, "  Curved geometry:")?;
            writeln!(f, "    - Arc edges: {}", self.edge_count)?;
            writeln!(f, "    - Spheres: {}", self.sphere_count)?;
            writeln!(f, "    - Projected faces: {}", self.projected_face_count)?;
        }
        writeln!(
            f,
            "  Patches: {} ({} faces)",
            self.patch_count, self.boundary_face_count
        )?;
        if self.wedge_patch_count > 0 {
            writeln!(f, "    - Wedge: {}", self.wedge_patch_count)?;
        }
        if self.empty_patch_count > 0 {
            writeln!(f, "    - Empty: {}", self.empty_patch_count)?;
        }
        if self.coupled_patch_count > 0 {
            writeln!(f, "    - Region coupled: {}", self.coupled_patch_count)?;
        }
        writeln!(f, "  Merge patch pairs: {}", self.merge_pair_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rod::fixtures;
    use crate::rod::generator::generate;
    use crate::rod::layout::GeometryMode;

    #[test]
    fn test_default_is_flat() {
        let summary = MeshSummary::default();
        assert!(!summary.is_curved());
        assert_eq!(summary.summary(), "V:0 B:0 C:0 patches:0");
    }

    #[test]
    fn test_counts_patch_kinds() {
        let model = generate(&fixtures::smeared_layout(GeometryMode::OneD)).unwrap();
        let summary = MeshSummary::of(&model);
        assert_eq!(summary.vertex_count, 16);
        assert_eq!(summary.wedge_patch_count, 4);
        assert_eq!(summary.empty_patch_count, 2);
        assert_eq!(summary.coupled_patch_count, 2);
        assert_eq!(summary.cell_count, 10 * 50 + 4 * 20);
    }

    #[test]
    fn test_display_lists_curved_geometry() {
        let layout = fixtures::pellet_layout(GeometryMode::ThreeD, &fixtures::dished_pellet(0.001), 1);
        let model = generate(&layout).unwrap();
        let output = MeshSummary::of(&model).to_string();
        assert!(output.contains("Arc edges"));
        assert!(output.contains("Spheres: 2"));
        assert!(output.contains("Projected faces: 8"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(MeshSummary::default()).unwrap();
        assert!(json.get("vertexCount").is_some());
        assert!(json.get("mergePairCount").is_some());
    }
}
