//! End-to-end tests against the two-dimensional C5G7 benchmark core.
#![allow(clippy::unwrap_used)]

#[path = "../demos/c5g7/model.rs"]
#[allow(dead_code)]
mod model;

use csgeo::error::QueryError;
use csgeo::math::{BoundaryType, Face, Point3};
use csgeo::{CsgError, Geometry, GeometryOptions};

use model::{materials, Configuration, ASSEMBLY_WIDTH, GAP_WIDTH};

fn core(config: Configuration) -> Geometry {
    model::build(config).unwrap().finalize(GeometryOptions::default()).unwrap()
}

fn p(x: f64, y: f64) -> Point3 {
    Point3::new(x, y, 0.0)
}

fn cell_names(geometry: &Geometry, point: &Point3) -> Vec<String> {
    geometry
        .find_cell_containing_point(point)
        .unwrap()
        .cells()
        .map(|(_, cell)| geometry.cell(cell).unwrap().name.clone())
        .collect()
}

// ============================================================================
// Plain core
// ============================================================================

#[test]
fn test_fuel_assembly_pins() {
    let geometry = core(Configuration::default());
    let a = ASSEMBLY_WIDTH;

    // Top-left UO2 assembly.
    assert_eq!(geometry.material_at(&p(-a, a)).unwrap(), materials::FISSION_CHAMBER);
    assert_eq!(geometry.material_at(&p(-a - 3.78, a + 7.56)).unwrap(), materials::GUIDE_TUBE);
    assert_eq!(geometry.material_at(&p(-a - 10.08, a + 10.08)).unwrap(), materials::UO2);
    assert_eq!(geometry.material_at(&p(-a - 9.48, a + 10.08)).unwrap(), materials::WATER);

    // Top-middle MOX assembly.
    assert_eq!(geometry.material_at(&p(0.0, a)).unwrap(), materials::FISSION_CHAMBER);
    assert_eq!(geometry.material_at(&p(-10.08, a + 10.08)).unwrap(), materials::MOX_43);
    assert_eq!(geometry.material_at(&p(-8.82, a + 8.82)).unwrap(), materials::MOX_70);
    assert_eq!(geometry.material_at(&p(-5.04, a + 5.04)).unwrap(), materials::MOX_87);
}

#[test]
fn test_containment_chain() {
    let geometry = core(Configuration::default());
    let a = ASSEMBLY_WIDTH;

    let chain = geometry.find_cell_containing_point(&p(-a - 10.08, a + 10.08)).unwrap();
    assert_eq!(chain.depth(), 5);
    assert_eq!(
        cell_names(&geometry, &p(-a - 10.08, a + 10.08)),
        vec!["Root", "UO2 Unrodded Assembly", "UO2"]
    );
    let local = chain.local_point().unwrap();
    assert!(local.x.hypot(local.y) < 1e-9);

    let names = cell_names(&geometry, &p(a, -a));
    assert_eq!(names[1], "Reflector Corner Assembly");
    assert_eq!(names[2], "Refined Reflector Mesh");
    assert_eq!(geometry.material_at(&p(a, -a)).unwrap(), materials::WATER);
}

#[test]
fn test_core_boundaries() {
    let geometry = core(Configuration::default());
    assert_eq!(geometry.boundary(Face::MinX), BoundaryType::Reflective);
    assert_eq!(geometry.boundary(Face::MaxY), BoundaryType::Reflective);
    assert_eq!(geometry.boundary(Face::MaxX), BoundaryType::Vacuum);
    assert_eq!(geometry.boundary(Face::MinY), BoundaryType::Vacuum);
    assert!((geometry.bounds().max_point().x - 1.5 * ASSEMBLY_WIDTH).abs() < 1e-9);

    assert!(matches!(
        geometry.find_cell_containing_point(&p(40.0, 0.0)).unwrap_err(),
        CsgError::Query(QueryError::OutsideGeometry { .. })
    ));
}

#[test]
fn test_rodded_core() {
    let geometry = core(Configuration {
        rodded: true,
        ..Configuration::default()
    });
    let a = ASSEMBLY_WIDTH;
    assert_eq!(geometry.material_at(&p(-a - 3.78, a + 7.56)).unwrap(), materials::CONTROL_ROD);
    // The centre UO2 assembly stays unrodded.
    assert_eq!(geometry.material_at(&p(-3.78, 7.56)).unwrap(), materials::GUIDE_TUBE);
}

#[test]
fn test_moderator_cell_is_shared() {
    let geometry = core(Configuration::default());
    let moderator = geometry.cell_by_name("Moderator").unwrap();
    let holders = geometry
        .universes()
        .filter(|(_, u)| u.cells().contains(&moderator))
        .count();
    assert_eq!(holders, 8);
}

#[test]
fn test_fissionability() {
    let geometry = core(Configuration::default());
    let fissionable = geometry.compute_fissionability(&materials::is_fissionable).unwrap();
    let by_name = |name: &str| fissionable[&geometry.universe_by_name(name).unwrap()];

    assert!(by_name("Root"));
    assert!(by_name("Gap Root"));
    assert!(by_name("UO2"));
    assert!(by_name("MOX Unrodded Lattice"));
    assert!(!by_name("Control Rod"));
    assert!(!by_name("Reflector Rodded Assembly"));
    assert!(!by_name("Reflector Corner Assembly"));
}

// ============================================================================
// Core with assembly gaps
// ============================================================================

#[test]
fn test_gap_core() {
    let geometry = core(Configuration {
        gap: true,
        ..Configuration::default()
    });
    let a = ASSEMBLY_WIDTH + 2.0 * GAP_WIDTH;

    assert_eq!(geometry.material_at(&p(-a, a)).unwrap(), materials::FISSION_CHAMBER);
    let point = p(-a + 0.5 * ASSEMBLY_WIDTH + 0.05, a);
    assert_eq!(geometry.material_at(&point).unwrap(), materials::WATER);
    assert_eq!(
        cell_names(&geometry, &point),
        vec!["Gap Root", "Assembly Gap"]
    );
    assert_eq!(geometry.boundary(Face::MinX), BoundaryType::Reflective);
    assert!((geometry.bounds().max_point().x - 1.5 * a).abs() < 1e-9);
}
