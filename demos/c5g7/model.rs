//! Two-dimensional C5G7 benchmark geometry.
//!
//! A quarter core of four fuel assemblies (two UO2, two MOX) surrounded by
//! water reflector assemblies. Both the plain core ("Root") and the variant
//! with a water gap around every assembly ("Gap Root") are registered, and
//! share the same pin universes; [`Configuration::gap`] picks the root.

use csgeo::math::BoundaryType;
use csgeo::model::{CellId, UniverseId};
use csgeo::surface::{Cylinder, Plane, Sense};
use csgeo::{CellSpec, CsgError, LatticeSpec, MaterialId, ModelBuilder, Region};

pub const PIN_PITCH: f64 = 1.26;
pub const FUEL_RADIUS: f64 = 0.54;
pub const PINS: usize = 17;
pub const ASSEMBLY_WIDTH: f64 = PIN_PITCH * 17.0;
pub const GAP_WIDTH: f64 = 0.1;

/// Material handles, standing in for an external cross-section library.
pub mod materials {
    use csgeo::MaterialId;

    pub const UO2: MaterialId = MaterialId(0);
    pub const MOX_43: MaterialId = MaterialId(1);
    pub const MOX_70: MaterialId = MaterialId(2);
    pub const MOX_87: MaterialId = MaterialId(3);
    pub const GUIDE_TUBE: MaterialId = MaterialId(4);
    pub const FISSION_CHAMBER: MaterialId = MaterialId(5);
    pub const CONTROL_ROD: MaterialId = MaterialId(6);
    pub const WATER: MaterialId = MaterialId(7);

    #[must_use]
    pub fn name(material: MaterialId) -> &'static str {
        match material.0 {
            0 => "UO2",
            1 => "MOX-4.3%",
            2 => "MOX-7%",
            3 => "MOX-8.7%",
            4 => "Guide Tube",
            5 => "Fission Chamber",
            6 => "Control Rod",
            7 => "Water",
            _ => "unknown",
        }
    }

    #[must_use]
    pub fn is_fissionable(material: MaterialId) -> bool {
        matches!(material.0, 0..=3 | 5)
    }
}

/// Guide tube positions as (row, column), rows counted from the top.
pub const GUIDE_TUBES: [(usize, usize); 24] = [
    (2, 5), (2, 8), (2, 11),
    (3, 3), (3, 13),
    (5, 2), (5, 5), (5, 8), (5, 11), (5, 14),
    (8, 2), (8, 5), (8, 11), (8, 14),
    (11, 2), (11, 5), (11, 8), (11, 11), (11, 14),
    (13, 3), (13, 13),
    (14, 5), (14, 8), (14, 11),
];

pub const FISSION_CHAMBER: (usize, usize) = (8, 8);

/// Which variant of the core to use as root.
#[derive(Debug, Clone, Copy, Default)]
pub struct Configuration {
    /// Use the core with water gaps between assemblies.
    pub gap: bool,
    /// Insert control rods into the top-left UO2 assembly.
    pub rodded: bool,
}

struct Pins {
    uo2: UniverseId,
    mox43: UniverseId,
    mox70: UniverseId,
    mox87: UniverseId,
    guide_tube: UniverseId,
    fission_chamber: UniverseId,
    control_rod: UniverseId,
    moderator: UniverseId,
}

struct Assemblies {
    uo2_unrodded: UniverseId,
    uo2_rodded: UniverseId,
    mox_unrodded: UniverseId,
    reflector_right: UniverseId,
    reflector_bottom: UniverseId,
    reflector_corner: UniverseId,
}

/// Registers every surface, cell, universe and lattice of the benchmark and
/// sets the root chosen by `config`.
///
/// # Errors
///
/// Returns an error if the model cannot be built.
pub fn build(config: Configuration) -> Result<ModelBuilder, CsgError> {
    let mut b = ModelBuilder::new();

    let pin = b.add_surface("Fuel Pin", Cylinder::z(0.0, 0.0, FUEL_RADIUS)?)?;
    let moderator = b.create_cell(
        CellSpec::new("Moderator")
            .halfspace(pin, Sense::Positive)
            .material(materials::WATER),
    )?;
    let pins = Pins {
        uo2: pin_universe(&mut b, "UO2", "UO2", pin, moderator, materials::UO2)?,
        mox43: pin_universe(&mut b, "MOX 4.3%", "MOX 4.3%", pin, moderator, materials::MOX_43)?,
        mox70: pin_universe(&mut b, "MOX 7.0%", "MOX 7.0%", pin, moderator, materials::MOX_70)?,
        mox87: pin_universe(&mut b, "MOX 8.7%", "MOX 8.7%", pin, moderator, materials::MOX_87)?,
        guide_tube: pin_universe(
            &mut b,
            "Guide Tube",
            "Guide Tube",
            pin,
            moderator,
            materials::GUIDE_TUBE,
        )?,
        fission_chamber: pin_universe(
            &mut b,
            "Fission Chamber",
            "Fission Chamber",
            pin,
            moderator,
            materials::FISSION_CHAMBER,
        )?,
        control_rod: pin_universe(
            &mut b,
            "Control Rod",
            "Control Rod",
            pin,
            moderator,
            materials::CONTROL_ROD,
        )?,
        moderator: pin_universe(
            &mut b,
            "Moderator Pin",
            "Moderator in Pin",
            pin,
            moderator,
            materials::WATER,
        )?,
    };

    let reflector = b.add_universe("Reflector")?;
    let water = b.create_cell(CellSpec::new("Reflector").unbounded().material(materials::WATER))?;
    b.add_cell(reflector, water)?;

    let refined = pin_lattice(&mut b, "Refined Reflector Lattice", |_, _| reflector)?;
    let refined_mesh = wrap(&mut b, "Refined Reflector Mesh", refined, None)?;

    let uo2_unrodded = pin_lattice(&mut b, "UO2 Unrodded Lattice", |r, c| {
        fuel_pin(&pins, pins.uo2, r, c, false)
    })?;
    let uo2_rodded = pin_lattice(&mut b, "UO2 Rodded Lattice", |r, c| {
        fuel_pin(&pins, pins.uo2, r, c, true)
    })?;
    let mox_unrodded = pin_lattice(&mut b, "MOX Unrodded Lattice", |r, c| {
        fuel_pin(&pins, mox_zone(&pins, r, c), r, c, false)
    })?;
    let mox_rodded = pin_lattice(&mut b, "MOX Rodded Lattice", |r, c| {
        fuel_pin(&pins, mox_zone(&pins, r, c), r, c, true)
    })?;
    let reflector_rodded = pin_lattice(&mut b, "Reflector Rodded Lattice", |r, c| {
        if GUIDE_TUBES.contains(&(r, c)) {
            pins.control_rod
        } else {
            pins.moderator
        }
    })?;

    let plain = Assemblies {
        uo2_unrodded: wrap(&mut b, "UO2 Unrodded Assembly", uo2_unrodded, None)?,
        uo2_rodded: wrap(&mut b, "UO2 Rodded Assembly", uo2_rodded, None)?,
        mox_unrodded: wrap(&mut b, "MOX Unrodded Assembly", mox_unrodded, None)?,
        reflector_right: wrap(&mut b, "Reflector Right Assembly", refined_mesh, None)?,
        reflector_bottom: wrap(&mut b, "Reflector Bottom Assembly", refined_mesh, None)?,
        reflector_corner: wrap(&mut b, "Reflector Corner Assembly", refined_mesh, None)?,
    };
    wrap(&mut b, "MOX Rodded Assembly", mox_rodded, None)?;
    wrap(&mut b, "Reflector Unrodded Assembly", refined_mesh, None)?;
    wrap(&mut b, "Reflector Rodded Assembly", reflector_rodded, None)?;
    wrap(&mut b, "Reflector Assembly", reflector, None)?;

    let edge = b.add_rectangular_prism(
        "Assembly Edge",
        [ASSEMBLY_WIDTH, ASSEMBLY_WIDTH],
        [0.0, 0.0],
        BoundaryType::Interface,
    )?;
    let gap = b.create_cell(
        CellSpec::new("Assembly Gap")
            .region(edge.clone().complement())
            .material(materials::WATER),
    )?;
    let gap = Some((&edge, gap));
    let gapped = Assemblies {
        uo2_unrodded: wrap(&mut b, "Gap UO2 Unrodded Assembly", uo2_unrodded, gap)?,
        uo2_rodded: wrap(&mut b, "Gap UO2 Rodded Assembly", uo2_rodded, gap)?,
        mox_unrodded: wrap(&mut b, "Gap MOX Unrodded Assembly", mox_unrodded, gap)?,
        reflector_right: wrap(&mut b, "Gap Reflector Right Assembly", refined_mesh, gap)?,
        reflector_bottom: wrap(&mut b, "Gap Reflector Bottom Assembly", refined_mesh, gap)?,
        reflector_corner: wrap(&mut b, "Gap Reflector Corner Assembly", refined_mesh, gap)?,
    };
    wrap(&mut b, "Gap MOX Rodded Assembly", mox_rodded, gap)?;
    wrap(&mut b, "Gap Reflector Rodded Assembly", reflector_rodded, gap)?;

    let root = core(&mut b, "Root", &plain, ASSEMBLY_WIDTH, config.rodded)?;
    let gap_pitch = ASSEMBLY_WIDTH + 2.0 * GAP_WIDTH;
    let gap_root = core(&mut b, "Gap Root", &gapped, gap_pitch, config.rodded)?;
    b.set_root(if config.gap { gap_root } else { root })?;
    Ok(b)
}

fn pin_universe(
    b: &mut ModelBuilder,
    universe: &str,
    cell: &str,
    pin: csgeo::model::SurfaceId,
    moderator: CellId,
    material: MaterialId,
) -> Result<UniverseId, CsgError> {
    let u = b.add_universe(universe)?;
    let inner =
        b.create_cell(CellSpec::new(cell).halfspace(pin, Sense::Negative).material(material))?;
    b.add_cell(u, inner)?;
    b.add_cell(u, moderator)?;
    Ok(u)
}

fn pin_lattice(
    b: &mut ModelBuilder,
    name: &str,
    pick: impl Fn(usize, usize) -> UniverseId,
) -> Result<UniverseId, CsgError> {
    let lattice = b.add_lattice(name, LatticeSpec::planar(PINS, PINS, PIN_PITCH, PIN_PITCH))?;
    let rows: Vec<Vec<UniverseId>> = (0..PINS)
        .map(|r| (0..PINS).map(|c| pick(r, c)).collect())
        .collect();
    b.fill_lattice_rows(lattice, &rows)?;
    Ok(lattice)
}

fn fuel_pin(pins: &Pins, fuel: UniverseId, row: usize, col: usize, rodded: bool) -> UniverseId {
    if (row, col) == FISSION_CHAMBER {
        pins.fission_chamber
    } else if GUIDE_TUBES.contains(&(row, col)) {
        if rodded {
            pins.control_rod
        } else {
            pins.guide_tube
        }
    } else {
        fuel
    }
}

/// MOX enrichment zoned by ring: 4.3% on the outer ring, 7.0% on the next
/// two, 8.7% inside.
fn mox_zone(pins: &Pins, row: usize, col: usize) -> UniverseId {
    let ring = row.min(col).min(PINS - 1 - row).min(PINS - 1 - col);
    match ring {
        0 => pins.mox43,
        1 | 2 => pins.mox70,
        _ => pins.mox87,
    }
}

/// Registers a universe holding one cell filled with `content`, bounded by
/// the assembly edge and surrounded by the shared gap cell when `gap` is set.
fn wrap(
    b: &mut ModelBuilder,
    name: &str,
    content: UniverseId,
    gap: Option<(&Region, CellId)>,
) -> Result<UniverseId, CsgError> {
    let universe = b.add_universe(name)?;
    let spec = CellSpec::new(name).fill_universe(content);
    let spec = match gap {
        Some((edge, _)) => spec.region(edge.clone()),
        None => spec.unbounded(),
    };
    let cell = b.create_cell(spec)?;
    b.add_cell(universe, cell)?;
    if let Some((_, gap_cell)) = gap {
        b.add_cell(universe, gap_cell)?;
    }
    Ok(universe)
}

/// Registers the 3 x 3 core lattice and the root universe bounding it.
///
/// The inner corner (left, top) is reflective, the outer faces are vacuum.
fn core(
    b: &mut ModelBuilder,
    name: &str,
    assemblies: &Assemblies,
    pitch: f64,
    rodded: bool,
) -> Result<UniverseId, CsgError> {
    let a = assemblies;
    let top_left = if rodded { a.uo2_rodded } else { a.uo2_unrodded };
    let lattice = b.add_lattice(
        &format!("{name} Core Lattice"),
        LatticeSpec::planar(3, 3, pitch, pitch),
    )?;
    b.fill_lattice_rows(
        lattice,
        &[
            vec![top_left, a.mox_unrodded, a.reflector_right],
            vec![a.mox_unrodded, a.uo2_unrodded, a.reflector_right],
            vec![a.reflector_bottom, a.reflector_bottom, a.reflector_corner],
        ],
    )?;

    let half = 1.5 * pitch;
    let mut face = |label: &str, plane: Plane, boundary: BoundaryType| {
        b.add_surface_with_boundary(&format!("{name} {label}"), plane, boundary)
    };
    let min_x = face("min x", Plane::x(-half)?, BoundaryType::Reflective)?;
    let max_x = face("max x", Plane::x(half)?, BoundaryType::Vacuum)?;
    let min_y = face("min y", Plane::y(-half)?, BoundaryType::Vacuum)?;
    let max_y = face("max y", Plane::y(half)?, BoundaryType::Reflective)?;

    let universe = b.add_universe(name)?;
    let cell = b.create_cell(
        CellSpec::new(name)
            .halfspace(min_x, Sense::Positive)
            .halfspace(max_x, Sense::Negative)
            .halfspace(min_y, Sense::Positive)
            .halfspace(max_y, Sense::Negative)
            .fill_universe(lattice),
    )?;
    b.add_cell(universe, cell)?;
    Ok(universe)
}
