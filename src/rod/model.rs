//! The in-memory block mesh description handed to the serializer.

use std::collections::HashMap;

use crate::error::{RodMeshError, RodMeshResult};
use crate::geom::Point3;

/// Position of a vertex in the append-only vertex list.
pub type VertexId = usize;

/// A quadrilateral face, possibly with a repeated vertex on collapsed wedges.
pub type Face = [VertexId; 4];

/// Append-only vertex store shared by every segment.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VertexArena {
    points: Vec<Point3>,
}

impl VertexArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next pushed vertex will receive.
    #[must_use]
    pub fn cursor(&self) -> VertexId {
        self.points.len()
    }

    pub fn push(&mut self, point: Point3) -> VertexId {
        self.points.push(point);
        self.points.len() - 1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: VertexId) -> Option<Point3> {
        self.points.get(id).copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Point3] {
        &self.points
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub vertices: [VertexId; 8],
    pub name: String,
    /// Cells along the block's local (radial, tangential, axial) directions.
    pub cells: [u32; 3],
}

impl Block {
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        self.cells.iter().map(|&n| u64::from(n)).product()
    }
}

/// Circular arc through `midpoint` replacing the straight block edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcEdge {
    pub start: VertexId,
    pub end: VertexId,
    pub midpoint: Point3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub centre: Point3,
    pub radius: f64,
}

impl Sphere {
    /// Name used in the geometry section, `sphere_<index>`.
    #[must_use]
    pub fn name(index: usize) -> String {
        format!("sphere_{index}")
    }
}

/// Face bent onto a previously emitted sphere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceProjection {
    pub face: Face,
    pub sphere: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchKind {
    Patch,
    Wedge,
    Empty,
    /// Region-coupled interface with a named partner patch in the same region.
    Coupled { neighbour: String, owner: bool },
}

impl PatchKind {
    #[must_use]
    pub fn coupled(neighbour: impl Into<String>, owner: bool) -> Self {
        Self::Coupled {
            neighbour: neighbour.into(),
            owner,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Wedge => "wedge",
            Self::Empty => "empty",
            Self::Coupled { .. } => "regionCoupledOFFBEAT",
        }
    }

    #[must_use]
    pub fn neighbour(&self) -> Option<&str> {
        match self {
            Self::Coupled { neighbour, .. } => Some(neighbour),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub name: String,
    pub kind: PatchKind,
    pub faces: Vec<Face>,
}

/// Boundary patches keyed by name, iterated in creation order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PatchSet {
    patches: Vec<Patch>,
    index: HashMap<String, usize>,
}

impl PatchSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named patch, creating it on first reference.
    ///
    /// # Errors
    /// Fails when the patch already exists with a different kind.
    pub fn open(&mut self, name: &str, kind: PatchKind) -> RodMeshResult<&mut Patch> {
        let slot = match self.index.get(name) {
            Some(&slot) => {
                if self.patches[slot].kind != kind {
                    return Err(RodMeshError::topology(format!(
                        "patch `{name}` reopened as {:?} after {:?}",
                        kind, self.patches[slot].kind
                    )));
                }
                slot
            }
            None => {
                self.patches.push(Patch {
                    name: name.to_owned(),
                    kind,
                    faces: Vec::new(),
                });
                self.index.insert(name.to_owned(), self.patches.len() - 1);
                self.patches.len() - 1
            }
        };
        Ok(&mut self.patches[slot])
    }

    /// Appends faces to the named patch, creating it on first reference.
    ///
    /// # Errors
    /// Fails when the patch already exists with a different kind.
    pub fn extend(
        &mut self,
        name: &str,
        kind: PatchKind,
        faces: impl IntoIterator<Item = Face>,
    ) -> RodMeshResult<()> {
        self.open(name, kind)?.faces.extend(faces);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Patch> {
        self.index.get(name).map(|&slot| &self.patches[slot])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.patches.iter().map(|patch| patch.name.as_str()).collect()
    }
}

/// Two face-congruent external patches to be stitched by the mesher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePair {
    pub master: String,
    pub slave: String,
}

/// Everything one generation pass produces, in emission order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlockMeshModel {
    pub convert_to_meters: f64,
    pub vertices: VertexArena,
    pub blocks: Vec<Block>,
    pub edges: Vec<ArcEdge>,
    pub spheres: Vec<Sphere>,
    pub projections: Vec<FaceProjection>,
    pub patches: PatchSet,
    pub merge_pairs: Vec<MergePair>,
}

impl BlockMeshModel {
    #[must_use]
    pub fn new(convert_to_meters: f64) -> Self {
        Self {
            convert_to_meters,
            ..Self::default()
        }
    }

    pub fn push_block(&mut self, vertices: [VertexId; 8], name: &str, cells: [u32; 3]) {
        self.blocks.push(Block {
            vertices,
            name: name.to_owned(),
            cells,
        });
    }

    pub fn push_arc(&mut self, start: VertexId, end: VertexId, midpoint: Point3) {
        self.edges.push(ArcEdge {
            start,
            end,
            midpoint,
        });
    }

    pub fn push_merge_pair(&mut self, master: impl Into<String>, slave: impl Into<String>) {
        self.merge_pairs.push(MergePair {
            master: master.into(),
            slave: slave.into(),
        });
    }

    #[must_use]
    pub fn cell_count(&self) -> u64 {
        self.blocks.iter().map(Block::cell_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_hands_out_sequential_ids() {
        let mut arena = VertexArena::new();
        assert_eq!(arena.cursor(), 0);
        assert_eq!(arena.push(Point3::new(0.0, 0.0, 0.0)), 0);
        assert_eq!(arena.push(Point3::new(1.0, 0.0, 0.0)), 1);
        assert_eq!(arena.cursor(), 2);
        assert_eq!(arena.get(1), Some(Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(arena.get(2), None);
    }

    #[test]
    fn patches_accumulate_faces_in_creation_order() {
        let mut set = PatchSet::new();
        set.extend("fuelOuter", PatchKind::coupled("cladInner", true), [[2, 3, 7, 6]])
            .unwrap();
        set.extend("fuelFront", PatchKind::Wedge, [[0, 2, 6, 4]]).unwrap();
        set.extend("fuelOuter", PatchKind::coupled("cladInner", true), [[10, 11, 15, 14]])
            .unwrap();

        assert_eq!(set.names(), vec!["fuelOuter", "fuelFront"]);
        assert_eq!(set.get("fuelOuter").unwrap().faces.len(), 2);
        assert_eq!(set.get("fuelOuter").unwrap().kind.neighbour(), Some("cladInner"));
    }

    #[test]
    fn reopening_with_another_kind_is_a_topology_error() {
        let mut set = PatchSet::new();
        set.open("fuelBottom", PatchKind::Empty).unwrap();
        let err = set.open("fuelBottom", PatchKind::Patch).unwrap_err();
        assert!(matches!(err, RodMeshError::Topology(_)));
    }

    #[test]
    fn block_cell_count_multiplies_axes() {
        let mut model = BlockMeshModel::new(1.0);
        model.push_block([0, 2, 3, 1, 4, 6, 7, 5], "fuel", [10, 1, 20]);
        model.push_block([0, 1, 2, 3, 4, 5, 6, 7], "fuel", [4, 4, 20]);
        assert_eq!(model.cell_count(), 200 + 320);
    }
}
