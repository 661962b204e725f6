//! Fuel rod geometry and topology generation.
//!
//! The pass walks the fuel stack and then the cladding stack, one segment at a
//! time. Each segment runs four builders against a shared [`BlockMeshModel`]:
//! vertices, blocks, curves (arcs, spheres, projections) and patches.

pub mod blocks;
pub mod curves;
pub mod faces;
pub mod generator;
pub mod layout;
pub mod model;
pub mod patches;
pub mod shape;
pub mod summary;
pub mod validate;
pub mod vertices;

#[cfg(test)]
pub(crate) mod fixtures;

pub use generator::{generate, generate_with_rng};
pub use layout::{
    Cap, CapEnd, Chamfer, CladBlock, Dish, Eccentricity, FuelSegment, GeometryMode, Pellet,
    PelletCells, RodLayout, WedgeBlock,
};
pub use model::{
    ArcEdge, Block, BlockMeshModel, Face, FaceProjection, MergePair, Patch, PatchKind, PatchSet,
    Sphere, VertexArena, VertexId,
};
pub use shape::{Band, PelletShape, Ring, SurfaceRole};
pub use summary::MeshSummary;
