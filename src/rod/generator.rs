//! The generation pass: folds the fuel and cladding stacks into one model.

use std::f64::consts::TAU;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{RodMeshError, RodMeshResult, SegmentRef};
use crate::geom::Vec3;

use super::blocks;
use super::curves::{self, Level};
use super::layout::{CladBlock, Eccentricity, FuelSegment, GeometryMode, Pellet, RodLayout, WedgeBlock};
use super::model::{BlockMeshModel, VertexId};
use super::patches::{self, StackEnds};
use super::shape::{radial_bands, ring_profile};
use super::validate::check_topology;
use super::vertices;

/// Generates the block mesh of a rod.
///
/// Random eccentricity without a seed draws from the thread-local generator,
/// so its output is not reproducible.
///
/// # Errors
/// Returns a configuration error for invalid input and a topology error when an
/// internal invariant breaks.
pub fn generate(layout: &RodLayout) -> RodMeshResult<BlockMeshModel> {
    match layout.eccentricity {
        Eccentricity::Random { seed: Some(seed) } => {
            generate_with_rng(layout, &mut StdRng::seed_from_u64(seed))
        }
        Eccentricity::Random { seed: None } => {
            warn!("random eccentricity without a seed; the mesh is not reproducible");
            generate_with_rng(layout, &mut rand::rng())
        }
        _ => generate_with_rng(layout, &mut StdRng::seed_from_u64(0)),
    }
}

/// Same as [`generate`], drawing random eccentricity from `rng`.
///
/// # Errors
/// See [`generate`].
pub fn generate_with_rng<R: Rng + ?Sized>(
    layout: &RodLayout,
    rng: &mut R,
) -> RodMeshResult<BlockMeshModel> {
    layout.validate()?;
    let shifts = pellet_shifts(layout, rng);

    let mut mesher = RodMesher::new(layout);
    let mut offset = layout.fuel_offset;
    for (i, segment) in layout.fuel.iter().enumerate() {
        let shift = shifts.get(i).copied().unwrap_or(Vec3::ZERO);
        mesher.fuel_segment(i + 1, segment, offset, shift)?;
        offset += segment.height();
    }
    let mut offset = layout.clad_offset;
    for (i, block) in layout.clad.iter().enumerate() {
        mesher.clad_block(i + 1, block, offset)?;
        offset += block.height;
    }

    let model = mesher.finish();
    check_topology(&model)?;
    info!(
        "{} rod: {} vertices, {} blocks, {} edges, {} patches, {} merge pairs, ~{} cells",
        layout.mode.label(),
        model.vertices.len(),
        model.blocks.len(),
        model.edges.len(),
        model.patches.len(),
        model.merge_pairs.len(),
        model.cell_count()
    );
    Ok(model)
}

/// Lateral offset of every pellet, bottom to top.
fn pellet_shifts<R: Rng + ?Sized>(layout: &RodLayout, rng: &mut R) -> Vec<Vec3> {
    match &layout.eccentricity {
        Eccentricity::Centred => vec![Vec3::ZERO; layout.fuel.len()],
        Eccentricity::Random { .. } => {
            let gap = layout.min_gap();
            (0..layout.fuel.len())
                .map(|_| {
                    let u: f64 = rng.random();
                    let v: f64 = rng.random();
                    let r = gap * u.sqrt();
                    let (sin, cos) = (TAU * v).sin_cos();
                    Vec3::planar(r * cos, r * sin)
                })
                .collect()
        }
        Eccentricity::Manual(shifts) => shifts.clone(),
    }
}

/// Mutable state of one generation pass.
struct RodMesher<'a> {
    layout: &'a RodLayout,
    model: BlockMeshModel,
    fuel_ends: StackEnds,
    clad_ends: StackEnds,
}

impl<'a> RodMesher<'a> {
    fn new(layout: &'a RodLayout) -> Self {
        Self {
            layout,
            model: BlockMeshModel::new(layout.convert_to_meters),
            fuel_ends: StackEnds::fuel(layout),
            clad_ends: StackEnds::clad(layout),
        }
    }

    fn finish(self) -> BlockMeshModel {
        self.model
    }

    fn fuel_segment(
        &mut self,
        index: usize,
        segment: &FuelSegment,
        offset: f64,
        shift: Vec3,
    ) -> RodMeshResult<()> {
        let at = SegmentRef::fuel(index);
        let base = self.model.vertices.cursor();
        let expected = match segment {
            FuelSegment::Wedge(block) => {
                self.wedge_fuel(index, base, block, offset)?;
                8
            }
            FuelSegment::Pellet(pellet) => {
                let mode = self.layout.mode;
                match mode {
                    GeometryMode::TwoDDiscrete => self.discrete_pellet(index, base, pellet, offset)?,
                    GeometryMode::ThreeD => self.solid_pellet(index, base, pellet, offset, shift)?,
                    GeometryMode::OneD | GeometryMode::TwoDSmeared => {
                        return Err(RodMeshError::topology(format!(
                            "{at} is a discrete pellet in {} mode",
                            mode.label()
                        )));
                    }
                }
                debug!("{at}: {} pellet at z = {offset}", pellet.shape());
                pellet.shape().vertex_count(mode)
            }
        };
        self.check_vertices(at, base, expected)
    }

    fn wedge_fuel(
        &mut self,
        index: usize,
        base: VertexId,
        block: &WedgeBlock,
        offset: f64,
    ) -> RodMeshResult<()> {
        vertices::push_wedge(
            &mut self.model.vertices,
            block.r_inner,
            block.r_outer,
            block.height,
            self.layout.wedge_angle,
            offset,
            false,
        );
        blocks::push_wedge_block(&mut self.model, base, &block.name, block.cells_r, block.cells_z);
        patches::push_wedge_fuel_patches(
            &mut self.model,
            &self.fuel_ends,
            index,
            base,
            block.r_inner > 0.0,
        )?;
        debug!("{}: smeared block at z = {offset}", SegmentRef::fuel(index));
        Ok(())
    }

    fn discrete_pellet(
        &mut self,
        index: usize,
        base: VertexId,
        pellet: &Pellet,
        offset: f64,
    ) -> RodMeshResult<()> {
        let mode = self.layout.mode;
        let angle = self.layout.wedge_angle;
        let rings = ring_profile(pellet, mode);
        let bands = radial_bands(pellet, mode, SegmentRef::fuel(index))?;
        let half = 2 * rings.len();

        vertices::push_discrete_pellet(&mut self.model.vertices, pellet, &rings, angle, offset);
        blocks::push_discrete_pellet_blocks(
            &mut self.model,
            base,
            half,
            &pellet.name,
            &bands,
            pellet.cells.axial,
        );
        let level = Level {
            offset,
            height: pellet.height,
            shift: Vec3::ZERO,
        };
        curves::push_discrete_dish_arcs(&mut self.model, base, half, pellet, &rings, angle, level);
        patches::push_discrete_pellet_patches(
            &mut self.model,
            &self.fuel_ends,
            index,
            base,
            half,
            &bands,
            !pellet.is_solid(),
        )
    }

    fn solid_pellet(
        &mut self,
        index: usize,
        base: VertexId,
        pellet: &Pellet,
        offset: f64,
        shift: Vec3,
    ) -> RodMeshResult<()> {
        let mode = self.layout.mode;
        let rings = ring_profile(pellet, mode);
        let bands = radial_bands(pellet, mode, SegmentRef::fuel(index))?;
        let half = 4 * rings.len();
        let square = pellet.has_square(mode);
        let level = Level {
            offset,
            height: pellet.height,
            shift,
        };

        vertices::push_solid_pellet(&mut self.model.vertices, pellet, &rings, offset, shift);
        blocks::push_solid_pellet_blocks(&mut self.model, base, half, pellet, &bands);
        curves::push_solid_pellet_arcs(&mut self.model, base, half, pellet, &rings, level);
        if let Some(dish) = pellet.dish.filter(|_| curves::needs_spheres(pellet, mode)) {
            let sphere = curves::push_dish_spheres(&mut self.model, dish, level);
            curves::push_dish_projections(&mut self.model, base, half, square, sphere);
        }
        patches::push_solid_pellet_patches(
            &mut self.model,
            &self.fuel_ends,
            index,
            base,
            half,
            &bands,
            square,
        )
    }

    fn clad_block(&mut self, index: usize, block: &CladBlock, offset: f64) -> RodMeshResult<()> {
        let at = SegmentRef::clad(index);
        let base = self.model.vertices.cursor();
        let capped = block.cap.is_some();
        let expected = if self.layout.mode.is_wedge() {
            vertices::push_wedge(
                &mut self.model.vertices,
                block.r_inner,
                block.r_outer,
                block.height,
                self.layout.wedge_angle,
                offset,
                capped,
            );
            blocks::push_wedge_block(&mut self.model, base, &block.name, block.cells_r, block.cells_z);
            if let Some(cap) = block.cap {
                blocks::push_wedge_cap_block(
                    &mut self.model,
                    base,
                    &block.name,
                    cap.cells_r_inner,
                    block.cells_z,
                );
            }
            patches::push_wedge_clad_patches(&mut self.model, &self.clad_ends, index, base, block.cap)?;
            if capped { 10 } else { 8 }
        } else {
            let half = if capped { 12 } else { 8 };
            vertices::push_clad_rings(&mut self.model.vertices, block, offset);
            blocks::push_clad_blocks(&mut self.model, base, half, block);
            let level = Level {
                offset,
                height: block.height,
                shift: Vec3::ZERO,
            };
            curves::push_clad_arcs(
                &mut self.model,
                base,
                half,
                block.r_inner,
                block.r_outer,
                capped,
                level,
            );
            patches::push_solid_clad_patches(&mut self.model, &self.clad_ends, index, base, half, block.cap)?;
            2 * half
        };
        debug!(
            "{at}: {} block at z = {offset}",
            if capped { "cap" } else { "tube" }
        );
        self.check_vertices(at, base, expected)
    }

    fn check_vertices(&self, at: SegmentRef, base: VertexId, expected: usize) -> RodMeshResult<()> {
        let emitted = self.model.vertices.cursor() - base;
        if emitted == expected {
            Ok(())
        } else {
            Err(RodMeshError::topology(format!(
                "{at} emitted {emitted} vertices, expected {expected}"
            )))
        }
    }
}
