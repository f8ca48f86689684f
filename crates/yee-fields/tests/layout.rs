//! Integration tests: layout equality, total volume under symmetry, and
//! the boundary table a field set starts with.

use yee_core::{BoundarySide, Dimensionality, Direction};
use yee_fields::{FieldSet, FieldsConfig};
use yee_space::{BoundaryCondition, SymmetryGroup};
use yee_test_utils::{chunked_square, cuboid, cylinder, line, mirrored_square, square};

fn fields_for(structure: &yee_arena::Structure) -> FieldSet {
    FieldSet::new(structure, FieldsConfig::default()).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

// ── equal_layout ─────────────────────────────────────────────────────

#[test]
fn equal_layout_is_reflexive_and_symmetric() {
    let a = fields_for(&chunked_square(10, 2));
    let b = fields_for(&chunked_square(10, 2));
    assert!(a.equal_layout(&a));
    assert!(a.equal_layout(&b));
    assert!(b.equal_layout(&a));
}

#[test]
fn changing_bloch_vector_breaks_layout_equality() {
    let a = fields_for(&chunked_square(10, 2));
    let mut b = fields_for(&chunked_square(10, 2));
    b.use_bloch(Direction::Y, 0.3).unwrap();
    assert!(!a.equal_layout(&b));
    assert!(!b.equal_layout(&a));
}

#[test]
fn different_chunking_or_symmetry_breaks_layout_equality() {
    let two = fields_for(&chunked_square(10, 2));
    let three = fields_for(&chunked_square(10, 3));
    assert!(!two.equal_layout(&three));

    let plain = fields_for(&square(10).build().unwrap());
    let mut mirrored = fields_for(&square(10).build().unwrap());
    mirrored.set_symmetry(SymmetryGroup::mirror(Direction::Y, 0.0, 1.0).unwrap());
    assert!(!plain.equal_layout(&mirrored));
}

#[test]
fn resolution_mismatch_breaks_layout_equality() {
    let coarse = fields_for(&square(10).build().unwrap());
    let grid = yee_space::GridVolume::new(Dimensionality::D2, 20.0, &[10, 10]).unwrap();
    let fine = fields_for(&yee_arena::StructureBuilder::new(grid).build().unwrap());
    assert!(!coarse.equal_layout(&fine));
}

// ── total_volume ─────────────────────────────────────────────────────

#[test]
fn total_volume_without_symmetry_is_the_interior() {
    let fields = fields_for(&chunked_square(10, 2));
    assert_eq!(fields.total_volume(), fields.grid().interior());
    assert!(close(fields.total_volume().computed_volume(), 1.0));
}

#[test]
fn mirror_through_the_middle_restores_the_full_cell() {
    let structure = mirrored_square(10, 0.5, 1.0);
    assert_eq!(structure.grid().num_direction(Direction::X), 5);
    let fields = fields_for(&structure);
    let total = fields.total_volume();
    assert!(close(total.in_direction_min(Direction::X), 0.0));
    assert!(close(total.in_direction_max(Direction::X), 1.0));
    assert!(close(total.computed_volume(), 1.0));
}

#[test]
fn mirror_on_the_edge_doubles_without_overlap() {
    let structure = mirrored_square(10, 0.0, -1.0);
    let fields = fields_for(&structure);
    let interior = fields.grid().interior().computed_volume();
    let total = fields.total_volume();
    assert!(close(total.in_direction_min(Direction::X), -1.0));
    assert!(close(total.computed_volume(), 2.0 * interior));
}

#[test]
fn cylindrical_total_volume_clamps_at_the_axis() {
    let fields = fields_for(&cylinder(4, 8).build().unwrap());
    assert_eq!(fields.symmetry().multiplicity(), 2);
    let total = fields.total_volume();
    assert_eq!(total.in_direction_min(Direction::R), 0.0);
    assert!(close(total.in_direction_max(Direction::R), 0.4));
    assert!(close(total.in_direction_max(Direction::Z), 0.8));
}

#[test]
fn odd_angular_mode_flips_the_axis_identification() {
    let structure = cylinder(4, 8).build().unwrap();
    let config = FieldsConfig {
        m: 1.0,
        ..FieldsConfig::default()
    };
    let fields = FieldSet::new(&structure, config).unwrap();
    let ez = yee_core::Component::new(yee_core::FieldKind::Electric, Direction::Z);
    assert_eq!(fields.symmetry().component_phase(ez, 1), -1.0);
    assert_eq!(fields.m(), 1.0);
}

// ── Boundaries ───────────────────────────────────────────────────────

#[test]
fn thin_axes_become_periodic_automatically() {
    let fields = fields_for(&cuboid(4, 4, 1).build().unwrap());
    assert_eq!(fields.boundary(BoundarySide::Low, Direction::Z), BoundaryCondition::Periodic);
    assert_eq!(fields.boundary(BoundarySide::High, Direction::Z), BoundaryCondition::Periodic);
    assert_eq!(fields.k()[Direction::Z.index()], 0.0);
    assert!(fields.nosize_direction(Direction::Z));
    assert!(!fields.nosize_direction(Direction::X));
    assert_eq!(fields.boundary(BoundarySide::High, Direction::X), BoundaryCondition::Metallic);
}

#[test]
fn one_dimensional_walls_are_metallic() {
    let fields = fields_for(&line(16).build().unwrap());
    assert_eq!(fields.dim(), Dimensionality::D1);
    assert_eq!(fields.boundary(BoundarySide::Low, Direction::Z), BoundaryCondition::Metallic);
    assert_eq!(fields.boundary(BoundarySide::Low, Direction::X), BoundaryCondition::None);
    assert!(!fields.nosize_direction(Direction::Z));
}

#[test]
fn radial_axis_is_never_made_periodic() {
    let fields = fields_for(&cylinder(1, 8).build().unwrap());
    assert_ne!(fields.boundary(BoundarySide::High, Direction::R), BoundaryCondition::Periodic);
    assert_eq!(fields.boundary(BoundarySide::Low, Direction::R), BoundaryCondition::None);
}

#[test]
fn set_boundary_overrides_a_single_face() {
    let mut fields = fields_for(&square(6).build().unwrap());
    fields.set_boundary(BoundarySide::High, Direction::Y, BoundaryCondition::None);
    assert_eq!(fields.boundary(BoundarySide::High, Direction::Y), BoundaryCondition::None);
    assert_eq!(fields.boundary(BoundarySide::Low, Direction::Y), BoundaryCondition::Metallic);
}
