//! Boundary patch routing.
//!
//! End faces of a segment are grouped by surface role. The group route decides
//! the patch: the plain stack boundary on the first and last segment, the
//! numbered interface patch between neighbours (coupled or merged), the
//! `dishChamfer` diagnostic patch for recessed bands, or a cap's inner patch.

use crate::error::{RodMeshResult, Stack};

use super::faces::{
    Facing, lift, offset_face, quadrant_faces, quadrant_ring_faces, wedge_band_sides,
    wedge_ring_face,
};
use super::layout::{Cap, CapEnd, GeometryMode, RodLayout};
use super::model::{BlockMeshModel, Face, PatchKind, VertexId};
use super::shape::{Band, SurfaceRole};

/// End of a segment along the rod axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bottom,
    Top,
}

impl Side {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bottom => "Bottom",
            Self::Top => "Top",
        }
    }
}

/// Where the faces of an end-face group go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Band(SurfaceRole),
    /// Cap plug faces that close the fuel stack.
    CapInner(CapEnd),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceGroup {
    pub route: Route,
    pub faces: Vec<Face>,
}

impl FaceGroup {
    fn new(route: Route, faces: impl IntoIterator<Item = Face>) -> Self {
        Self {
            route,
            faces: faces.into_iter().collect(),
        }
    }

    fn contact(faces: impl IntoIterator<Item = Face>) -> Self {
        Self::new(Route::Band(SurfaceRole::Contact), faces)
    }

    fn lifted(&self, half: usize) -> Self {
        Self::new(self.route, self.faces.iter().map(|&face| lift(face, half)))
    }
}

/// Naming and coupling rules of one stack's axial patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEnds {
    pub stack: Stack,
    pub count: usize,
    pub merge: bool,
    pub bottom: PatchKind,
    pub top: PatchKind,
}

impl StackEnds {
    #[must_use]
    pub fn fuel(layout: &RodLayout) -> Self {
        let end = |capped: bool, neighbour: &str, owner: bool| {
            if layout.mode == GeometryMode::OneD {
                PatchKind::Empty
            } else if capped {
                PatchKind::coupled(neighbour, owner)
            } else {
                PatchKind::Patch
            }
        };
        Self {
            stack: Stack::Fuel,
            count: layout.fuel.len(),
            merge: layout.merge_fuel,
            bottom: end(layout.bottom_cap(), CapEnd::Bottom.inner_patch(), true),
            top: end(layout.top_cap(), CapEnd::Top.inner_patch(), false),
        }
    }

    #[must_use]
    pub fn clad(layout: &RodLayout) -> Self {
        Self {
            stack: Stack::Clad,
            count: layout.clad.len(),
            merge: layout.merge_clad,
            bottom: PatchKind::Patch,
            top: PatchKind::Patch,
        }
    }

    fn name(&self, side: Side) -> String {
        format!("{}{}", self.stack.label(), side.label())
    }

    fn numbered(&self, side: Side, index: usize) -> String {
        format!("{}_{index}", self.name(side))
    }

    fn is_boundary(&self, side: Side, index: usize) -> bool {
        match side {
            Side::Bottom => index == 1,
            Side::Top => index == self.count,
        }
    }

    /// Interface patch of segment `index` facing its neighbour across `side`.
    fn interface(&self, side: Side, index: usize) -> (String, PatchKind) {
        let name = self.numbered(side, index);
        if self.merge {
            return (name, PatchKind::Patch);
        }
        let kind = match side {
            Side::Bottom => PatchKind::coupled(self.numbered(Side::Top, index - 1), false),
            Side::Top => PatchKind::coupled(self.numbered(Side::Bottom, index + 1), true),
        };
        (name, kind)
    }
}

fn cap_inner_kind(end: CapEnd) -> PatchKind {
    match end {
        CapEnd::Bottom => PatchKind::coupled("fuelBottom", false),
        CapEnd::Top => PatchKind::coupled("fuelTop", true),
    }
}

/// Routes one end of segment `index` (1-based) into the patch set.
///
/// # Errors
/// Fails when a patch would be reopened with a different kind.
pub fn push_end_faces(
    model: &mut BlockMeshModel,
    ends: &StackEnds,
    index: usize,
    side: Side,
    groups: &[FaceGroup],
) -> RodMeshResult<()> {
    let boundary = ends.is_boundary(side, index);
    for group in groups {
        let faces = group.faces.iter().copied();
        match group.route {
            Route::CapInner(end) => {
                model.patches.extend(end.inner_patch(), cap_inner_kind(end), faces)?;
            }
            Route::Band(_) if boundary => {
                let kind = match side {
                    Side::Bottom => ends.bottom.clone(),
                    Side::Top => ends.top.clone(),
                };
                model.patches.extend(&ends.name(side), kind, faces)?;
            }
            Route::Band(SurfaceRole::Recessed) => {
                let name = format!("dishChamfer{}_{index}", side.label());
                model.patches.extend(&name, PatchKind::Patch, faces)?;
            }
            Route::Band(SurfaceRole::Contact) => {
                let (name, kind) = ends.interface(side, index);
                model.patches.extend(&name, kind, faces)?;
            }
        }
    }
    if !boundary && side == Side::Top && ends.merge {
        model.push_merge_pair(
            ends.numbered(Side::Top, index),
            ends.numbered(Side::Bottom, index + 1),
        );
    }
    Ok(())
}

fn push_both_ends(
    model: &mut BlockMeshModel,
    ends: &StackEnds,
    index: usize,
    bottom: &[FaceGroup],
    top: &[FaceGroup],
) -> RodMeshResult<()> {
    push_end_faces(model, ends, index, Side::Bottom, bottom)?;
    push_end_faces(model, ends, index, Side::Top, top)
}

fn wedge_sides(
    model: &mut BlockMeshModel,
    stack: Stack,
    sides: impl IntoIterator<Item = (Face, Face)>,
) -> RodMeshResult<()> {
    let (front, back): (Vec<Face>, Vec<Face>) = sides.into_iter().unzip();
    model
        .patches
        .extend(&format!("{}Front", stack.label()), PatchKind::Wedge, front)?;
    model
        .patches
        .extend(&format!("{}Back", stack.label()), PatchKind::Wedge, back)
}

fn fuel_radial(
    model: &mut BlockMeshModel,
    inner: Option<impl IntoIterator<Item = Face>>,
    outer: impl IntoIterator<Item = Face>,
) -> RodMeshResult<()> {
    if let Some(inner) = inner {
        model.patches.extend("fuelInner", PatchKind::Patch, inner)?;
    }
    model
        .patches
        .extend("fuelOuter", PatchKind::coupled("cladInner", true), outer)
}

fn clad_radial(
    model: &mut BlockMeshModel,
    inner: Option<impl IntoIterator<Item = Face>>,
    outer: impl IntoIterator<Item = Face>,
) -> RodMeshResult<()> {
    if let Some(inner) = inner {
        model
            .patches
            .extend("cladInner", PatchKind::coupled("fuelOuter", false), inner)?;
    }
    model.patches.extend("cladOuter", PatchKind::Patch, outer)
}

/// Smeared fuel block (1D, 2D-smeared).
///
/// # Errors
/// Fails when a patch would be reopened with a different kind.
pub fn push_wedge_fuel_patches(
    model: &mut BlockMeshModel,
    ends: &StackEnds,
    index: usize,
    base: VertexId,
    hollow: bool,
) -> RodMeshResult<()> {
    let bottom = FaceGroup::contact([offset_face(base, [0, 1, 3, 2])]);
    let top = bottom.lifted(4);
    push_both_ends(model, ends, index, &[bottom], &[top])?;
    wedge_sides(model, Stack::Fuel, [wedge_band_sides(base, base + 2, 4)])?;
    fuel_radial(
        model,
        hollow.then(|| [wedge_ring_face(base, 4, Facing::Inward)]),
        [wedge_ring_face(base + 2, 4, Facing::Outward)],
    )
}

/// Wedge cladding block, with the collapsed plug block for caps.
///
/// # Errors
/// Fails when a patch would be reopened with a different kind.
pub fn push_wedge_clad_patches(
    model: &mut BlockMeshModel,
    ends: &StackEnds,
    index: usize,
    base: VertexId,
    cap: Option<Cap>,
) -> RodMeshResult<()> {
    let wall = FaceGroup::contact([offset_face(base, [0, 1, 3, 2])]);
    let mut bottom = vec![wall.clone()];
    let mut top = vec![wall.lifted(4)];
    let mut sides = vec![wedge_band_sides(base, base + 2, 4)];
    if let Some(cap) = cap {
        bottom.push(FaceGroup::new(
            core_route(cap.end, Side::Bottom),
            [offset_face(base, [8, 1, 0, 8])],
        ));
        top.push(FaceGroup::new(
            core_route(cap.end, Side::Top),
            [offset_face(base, [9, 4, 5, 9])],
        ));
        sides.push((offset_face(base, [8, 0, 4, 9]), offset_face(base, [8, 9, 5, 1])));
    }
    push_both_ends(model, ends, index, &bottom, &top)?;
    wedge_sides(model, Stack::Clad, sides)?;
    clad_radial(
        model,
        cap.is_none().then(|| [wedge_ring_face(base, 4, Facing::Inward)]),
        [wedge_ring_face(base + 2, 4, Facing::Outward)],
    )
}

/// The plug core faces the fuel stack on the cap's inner end only.
fn core_route(end: CapEnd, side: Side) -> Route {
    match (end, side) {
        (CapEnd::Bottom, Side::Top) | (CapEnd::Top, Side::Bottom) => Route::CapInner(end),
        _ => Route::Band(SurfaceRole::Contact),
    }
}

/// 2D-discrete pellet: one end face and one front/back pair per band.
///
/// # Errors
/// Fails when a patch would be reopened with a different kind.
pub fn push_discrete_pellet_patches(
    model: &mut BlockMeshModel,
    ends: &StackEnds,
    index: usize,
    base: VertexId,
    half: usize,
    bands: &[Band],
    hollow: bool,
) -> RodMeshResult<()> {
    let bottom: Vec<FaceGroup> = bands
        .iter()
        .enumerate()
        .map(|(k, band)| {
            let a = base + 2 * k;
            FaceGroup::new(Route::Band(band.role), [[a, a + 1, a + 3, a + 2]])
        })
        .collect();
    let top: Vec<FaceGroup> = bottom.iter().map(|group| group.lifted(half)).collect();
    push_both_ends(model, ends, index, &bottom, &top)?;

    let sides = (0..bands.len()).map(|k| wedge_band_sides(base + 2 * k, base + 2 * k + 2, half));
    wedge_sides(model, Stack::Fuel, sides)?;
    fuel_radial(
        model,
        hollow.then(|| [wedge_ring_face(base, half, Facing::Inward)]),
        [wedge_ring_face(base + half - 2, half, Facing::Outward)],
    )
}

/// 3D pellet: the optional square takes the role of the first band.
///
/// # Errors
/// Fails when a patch would be reopened with a different kind.
pub fn push_solid_pellet_patches(
    model: &mut BlockMeshModel,
    ends: &StackEnds,
    index: usize,
    base: VertexId,
    half: usize,
    bands: &[Band],
    square: bool,
) -> RodMeshResult<()> {
    let mut bottom = Vec::with_capacity(bands.len() + 1);
    if let (true, Some(first)) = (square, bands.first()) {
        bottom.push(FaceGroup::new(
            Route::Band(first.role),
            [offset_face(base, [0, 3, 2, 1])],
        ));
    }
    for (k, band) in bands.iter().enumerate() {
        let ring = 4 * k;
        let face = offset_face(base, [ring + 4, ring, ring + 1, ring + 5]);
        bottom.push(FaceGroup::new(Route::Band(band.role), quadrant_faces(face)));
    }
    let top: Vec<FaceGroup> = bottom.iter().map(|group| group.lifted(half)).collect();
    push_both_ends(model, ends, index, &bottom, &top)?;

    fuel_radial(
        model,
        (!square).then(|| quadrant_ring_faces(base, half, Facing::Inward)),
        quadrant_ring_faces(base + half - 4, half, Facing::Outward),
    )
}

/// 3D cladding block. Caps add the plug square and the square-to-tube quadrants.
///
/// # Errors
/// Fails when a patch would be reopened with a different kind.
pub fn push_solid_clad_patches(
    model: &mut BlockMeshModel,
    ends: &StackEnds,
    index: usize,
    base: VertexId,
    half: usize,
    cap: Option<Cap>,
) -> RodMeshResult<()> {
    let (bottom, top) = match cap {
        Some(cap) => {
            let core: Vec<Face> = std::iter::once(offset_face(base, [0, 3, 2, 1]))
                .chain(quadrant_faces(offset_face(base, [4, 0, 1, 5])))
                .collect();
            let wall = FaceGroup::contact(quadrant_faces(offset_face(base, [8, 4, 5, 9])));
            let lifted_core = core.iter().map(|&face| lift(face, half)).collect::<Vec<_>>();
            (
                vec![
                    FaceGroup::new(core_route(cap.end, Side::Bottom), core),
                    wall.clone(),
                ],
                vec![
                    FaceGroup::new(core_route(cap.end, Side::Top), lifted_core),
                    wall.lifted(half),
                ],
            )
        }
        None => {
            let wall = FaceGroup::contact(quadrant_faces(offset_face(base, [4, 0, 1, 5])));
            let top = wall.lifted(half);
            (vec![wall], vec![top])
        }
    };
    push_both_ends(model, ends, index, &bottom, &top)?;
    clad_radial(
        model,
        cap.is_none().then(|| quadrant_ring_faces(base, half, Facing::Inward)),
        quadrant_ring_faces(base + half - 4, half, Facing::Outward),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegmentRef;
    use crate::rod::fixtures;
    use crate::rod::shape::radial_bands;

    fn fuel_ends(count: usize, merge: bool) -> StackEnds {
        StackEnds {
            stack: Stack::Fuel,
            count,
            merge,
            bottom: PatchKind::Patch,
            top: PatchKind::Patch,
        }
    }

    #[test]
    fn one_d_fuel_ends_are_empty() {
        let layout = fixtures::smeared_layout(GeometryMode::OneD);
        let ends = StackEnds::fuel(&layout);
        assert_eq!(ends.bottom, PatchKind::Empty);
        assert_eq!(ends.top, PatchKind::Empty);
        assert_eq!(StackEnds::clad(&layout).bottom, PatchKind::Patch);
    }

    #[test]
    fn capped_fuel_ends_couple_to_the_plugs() {
        let layout = fixtures::with_caps(fixtures::smeared_layout(GeometryMode::TwoDSmeared));
        let ends = StackEnds::fuel(&layout);
        assert_eq!(ends.bottom, PatchKind::coupled("bottomCapInner", true));
        assert_eq!(ends.top, PatchKind::coupled("topCapInner", false));
    }

    #[test]
    fn merged_interfaces_record_a_pair() {
        let ends = fuel_ends(2, true);
        let mut model = BlockMeshModel::new(1.0);
        push_wedge_fuel_patches(&mut model, &ends, 1, 0, false).unwrap();
        push_wedge_fuel_patches(&mut model, &ends, 2, 8, false).unwrap();

        assert_eq!(model.merge_pairs.len(), 1);
        assert_eq!(model.merge_pairs[0].master, "fuelTop_1");
        assert_eq!(model.merge_pairs[0].slave, "fuelBottom_2");
        assert_eq!(model.patches.get("fuelTop_1").unwrap().kind, PatchKind::Patch);
        assert_eq!(model.patches.get("fuelBottom").unwrap().faces, vec![[0, 1, 3, 2]]);
        assert_eq!(model.patches.get("fuelTop").unwrap().faces, vec![[14, 15, 13, 12]]);
        assert!(!model.patches.contains("fuelInner"));
    }

    #[test]
    fn eager_interfaces_name_each_other() {
        let ends = fuel_ends(3, false);
        let mut model = BlockMeshModel::new(1.0);
        for (i, base) in [(1, 0), (2, 8), (3, 16)] {
            push_wedge_fuel_patches(&mut model, &ends, i, base, true).unwrap();
        }
        assert!(model.merge_pairs.is_empty());
        assert_eq!(
            model.patches.get("fuelTop_2").unwrap().kind,
            PatchKind::coupled("fuelBottom_3", true)
        );
        assert_eq!(
            model.patches.get("fuelBottom_2").unwrap().kind,
            PatchKind::coupled("fuelTop_1", false)
        );
        assert_eq!(model.patches.get("fuelInner").unwrap().faces.len(), 3);
    }

    #[test]
    fn dished_interfaces_split_recessed_faces() {
        let pellet = fixtures::dished_chamfered_pellet(0.0);
        let bands = radial_bands(&pellet, GeometryMode::TwoDDiscrete, SegmentRef::fuel(1)).unwrap();
        let ends = fuel_ends(2, true);
        let mut model = BlockMeshModel::new(1.0);
        push_discrete_pellet_patches(&mut model, &ends, 1, 0, 8, &bands, false).unwrap();

        // boundary keeps every band
        assert_eq!(model.patches.get("fuelBottom").unwrap().faces.len(), 3);
        // interior top: land couples, dish and chamfer are diagnostic
        assert_eq!(model.patches.get("fuelTop_1").unwrap().faces, vec![[12, 13, 11, 10]]);
        assert_eq!(model.patches.get("dishChamferTop_1").unwrap().faces.len(), 2);
        assert_eq!(model.patches.get("fuelOuter").unwrap().faces, vec![[6, 7, 15, 14]]);
        assert_eq!(model.patches.get("fuelFront").unwrap().faces.len(), 3);
    }

    #[test]
    fn wedge_cap_plug_faces_the_fuel() {
        let layout = fixtures::with_caps(fixtures::smeared_layout(GeometryMode::TwoDSmeared));
        let ends = StackEnds::clad(&layout);
        let mut model = BlockMeshModel::new(1.0);
        push_wedge_clad_patches(&mut model, &ends, 1, 0, layout.clad[0].cap).unwrap();

        let inner = model.patches.get("bottomCapInner").unwrap();
        assert_eq!(inner.faces, vec![[9, 4, 5, 9]]);
        assert_eq!(inner.kind, PatchKind::coupled("fuelBottom", false));
        assert_eq!(
            model.patches.get("cladBottom").unwrap().faces,
            vec![[0, 1, 3, 2], [8, 1, 0, 8]]
        );
        assert_eq!(model.patches.get("cladFront").unwrap().faces.len(), 2);
        assert!(!model.patches.contains("cladInner"));
    }

    #[test]
    fn solid_top_cap_core_faces_down() {
        let layout = fixtures::with_caps(fixtures::pellet_layout(
            GeometryMode::ThreeD,
            &fixtures::flat_pellet(0.0),
            1,
        ));
        let ends = StackEnds::clad(&layout);
        let mut model = BlockMeshModel::new(1.0);
        push_solid_clad_patches(&mut model, &ends, 3, 100, 12, layout.clad[2].cap).unwrap();

        let inner = model.patches.get("topCapInner").unwrap();
        assert_eq!(inner.kind, PatchKind::coupled("fuelTop", true));
        assert_eq!(inner.faces.len(), 5);
        assert_eq!(inner.faces[0], [100, 103, 102, 101]);
        assert_eq!(model.patches.get("cladBottom_3").unwrap().faces.len(), 4);
        assert_eq!(model.patches.get("cladTop").unwrap().faces.len(), 9);
        assert_eq!(model.patches.get("cladOuter").unwrap().faces.len(), 4);
    }

    #[test]
    fn solid_pellet_with_bore_has_inner_patch() {
        let pellet = fixtures::flat_pellet(0.001);
        let bands = radial_bands(&pellet, GeometryMode::ThreeD, SegmentRef::fuel(1)).unwrap();
        let ends = fuel_ends(1, true);
        let mut model = BlockMeshModel::new(1.0);
        push_solid_pellet_patches(&mut model, &ends, 1, 0, 8, &bands, false).unwrap();
        assert_eq!(model.patches.get("fuelInner").unwrap().faces[0], [1, 0, 8, 9]);
        assert_eq!(model.patches.get("fuelOuter").unwrap().faces[0], [4, 5, 13, 12]);
        assert_eq!(model.patches.get("fuelBottom").unwrap().faces.len(), 4);
    }
}
