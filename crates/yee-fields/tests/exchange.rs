//! Integration tests: exchange ledger sizing, buffers and invalidation.

use yee_core::components::*;
use yee_core::{BoundarySide, ChunkId, Direction, FieldKind};
use yee_fields::{ConnectionPhase, ExchangeKey, FieldSet, FieldsConfig};
use yee_space::{BoundaryCondition, SymmetryGroup};
use yee_test_utils::{chunked_square, mirrored_square, square};

fn fields_for(structure: &yee_arena::Structure) -> FieldSet {
    FieldSet::new(structure, FieldsConfig::default()).unwrap()
}

fn key(kind: FieldKind, from: u32, to: u32) -> ExchangeKey {
    ExchangeKey {
        kind,
        from: ChunkId(from),
        to: ChunkId(to),
    }
}

fn assert_buffers_match_counts(fields: &FieldSet) {
    let ledger = fields.ledger();
    assert!(ledger.is_valid());
    for (k, counts) in ledger.iter() {
        assert_eq!(ledger.buffer(k).map(<[f64]>::len), Some(counts.total()), "{k:?}");
    }
}

#[test]
fn no_components_means_nothing_to_exchange() {
    let mut fields = fields_for(&chunked_square(10, 2));
    let ledger = fields.connect_chunks();
    assert!(ledger.is_valid());
    assert_eq!(ledger.total_values(), 0);
    assert_eq!(ledger.iter().count(), 0);
}

#[test]
fn shared_face_carries_one_column_per_read_component() {
    let mut fields = fields_for(&chunked_square(10, 2));
    fields.allocate_component(Ez).unwrap();
    let ledger = fields.connect_chunks();

    // Split along x: a 10-point column crosses in each direction, for the
    // electric and the magnetic partner read along x, real and imaginary.
    for (from, to) in [(0, 1), (1, 0)] {
        for kind in [FieldKind::Electric, FieldKind::Magnetic] {
            let k = key(kind, from, to);
            assert_eq!(ledger.size(&k, ConnectionPhase::Copy), Some(20));
            assert_eq!(ledger.size(&k, ConnectionPhase::Phase), Some(0));
            assert_eq!(ledger.size(&k, ConnectionPhase::Negate), Some(0));
        }
    }
    assert_eq!(ledger.size(&key(FieldKind::Electric, 0, 0), ConnectionPhase::Copy), Some(0));
    assert_eq!(ledger.total_values(), 80);
    assert_buffers_match_counts(&fields);
}

#[test]
fn real_fields_halve_the_exchange() {
    let mut fields = fields_for(&chunked_square(10, 2));
    fields.allocate_component(Ez).unwrap();
    let complex = fields.connect_chunks().total_values();
    fields.use_real_fields().unwrap();
    assert!(!fields.ledger().is_valid());
    let real = fields.connect_chunks().total_values();
    assert_eq!(real * 2, complex);
}

#[test]
fn bloch_phase_marks_periodic_transfers() {
    let mut fields = fields_for(&square(10).build().unwrap());
    fields.allocate_component(Ez).unwrap();
    fields.use_bloch(Direction::X, 0.3).unwrap();
    let ledger = fields.connect_chunks();
    let wrap = key(FieldKind::Electric, 0, 0);
    assert!(ledger.size(&wrap, ConnectionPhase::Phase).unwrap() > 0);
    assert_eq!(ledger.size(&wrap, ConnectionPhase::Copy), Some(0));
    assert_buffers_match_counts(&fields);

    fields.use_bloch(Direction::X, 0.0).unwrap();
    let ledger = fields.connect_chunks();
    assert_eq!(ledger.size(&wrap, ConnectionPhase::Phase), Some(0));
    assert!(ledger.size(&wrap, ConnectionPhase::Copy).unwrap() > 0);
}

#[test]
fn single_chunk_wrap_counts_one_column_per_read_component() {
    let mut fields = fields_for(&square(10).build().unwrap());
    fields.allocate_component(Ez).unwrap();
    fields.use_bloch(Direction::X, 0.3).unwrap();
    let ledger = fields.connect_chunks();
    for kind in [FieldKind::Electric, FieldKind::Magnetic] {
        assert_eq!(ledger.size(&key(kind, 0, 0), ConnectionPhase::Phase), Some(20));
    }
    assert_eq!(ledger.total_values(), 40);
}

#[test]
fn periodic_wrap_between_two_chunks_goes_both_ways() {
    let mut fields = fields_for(&chunked_square(10, 2));
    fields.allocate_component(Ez).unwrap();
    fields.use_bloch(Direction::X, 0.3).unwrap();
    let ledger = fields.connect_chunks();
    for (from, to) in [(0, 1), (1, 0)] {
        let k = key(FieldKind::Electric, from, to);
        assert_eq!(ledger.size(&k, ConnectionPhase::Copy), Some(20));
        assert_eq!(ledger.size(&k, ConnectionPhase::Phase), Some(20));
    }
    assert_eq!(ledger.size(&key(FieldKind::Electric, 0, 0), ConnectionPhase::Phase), Some(0));
}

#[test]
fn even_mirror_negates_magnetic_and_copies_electric() {
    let mut fields = fields_for(&mirrored_square(10, 0.5, 1.0));
    fields.allocate_component(Ez).unwrap();
    let ledger = fields.connect_chunks();
    let e = key(FieldKind::Electric, 0, 0);
    let h = key(FieldKind::Magnetic, 0, 0);
    assert_eq!(ledger.size(&e, ConnectionPhase::Copy), Some(20));
    assert_eq!(ledger.size(&e, ConnectionPhase::Negate), Some(0));
    assert_eq!(ledger.size(&h, ConnectionPhase::Negate), Some(20));
    assert_eq!(ledger.size(&h, ConnectionPhase::Copy), Some(0));
    assert_buffers_match_counts(&fields);
}

#[test]
fn odd_mirror_swaps_the_signs() {
    let mut fields = fields_for(&mirrored_square(10, 0.5, -1.0));
    fields.allocate_component(Ez).unwrap();
    let ledger = fields.connect_chunks();
    assert_eq!(
        ledger.size(&key(FieldKind::Electric, 0, 0), ConnectionPhase::Negate),
        Some(20)
    );
    assert_eq!(
        ledger.size(&key(FieldKind::Magnetic, 0, 0), ConnectionPhase::Copy),
        Some(20)
    );
}

#[test]
fn receive_buffers_are_writable_only_while_valid() {
    let mut fields = fields_for(&chunked_square(10, 2));
    fields.allocate_component(Ez).unwrap();
    fields.connect_chunks();
    let k = key(FieldKind::Magnetic, 1, 0);
    fields.ledger_mut().buffer_mut(&k).unwrap().fill(2.5);
    assert!(fields.ledger().buffer(&k).unwrap().iter().all(|&v| v == 2.5));

    fields.set_boundary(BoundarySide::Low, Direction::X, BoundaryCondition::None);
    assert!(fields.ledger_mut().buffer_mut(&k).is_none());
    assert_eq!(fields.ledger().size(&k, ConnectionPhase::Copy), None);
    let rebuilt = fields.connect_chunks();
    assert!(rebuilt.buffer(&k).unwrap().iter().all(|&v| v == 0.0));
}

#[test]
fn every_layout_change_invalidates_the_ledger() {
    let old = chunked_square(10, 2);
    let mut fields = fields_for(&old);
    fields.allocate_component(Ez).unwrap();

    let changes: Vec<Box<dyn Fn(&mut FieldSet)>> = vec![
        Box::new(|f: &mut FieldSet| f.allocate_component(Ex).unwrap()),
        Box::new(|f: &mut FieldSet| f.use_bloch(Direction::Y, 0.0).unwrap()),
        Box::new(|f: &mut FieldSet| f.set_boundary(BoundarySide::High, Direction::X, BoundaryCondition::None)),
        Box::new(|f: &mut FieldSet| f.set_symmetry(SymmetryGroup::identity())),
        Box::new(|f: &mut FieldSet| f.finish_phase_in()),
        Box::new(|f: &mut FieldSet| {
            f.chunk_mut(0);
        }),
        Box::new(|f: &mut FieldSet| f.use_real_fields().unwrap()),
    ];
    for (i, change) in changes.iter().enumerate() {
        fields.connect_chunks();
        assert!(fields.ledger().is_valid());
        change(&mut fields);
        assert!(!fields.ledger().is_valid(), "change {i} left the ledger valid");
    }
}

#[test]
fn repeat_allocation_keeps_the_ledger() {
    let mut fields = fields_for(&chunked_square(10, 2));
    fields.allocate_component(Ez).unwrap();
    fields.connect_chunks();
    fields.allocate_component(Ez).unwrap();
    fields.allocate_component(Dz).unwrap();
    assert!(fields.ledger().is_valid());
}

#[test]
fn connecting_is_timed() {
    let mut fields = fields_for(&chunked_square(10, 2));
    fields.allocate_component(Ez).unwrap();
    fields.connect_chunks();
    let spent = fields.times().time_spent_on(yee_fields::Activity::Connecting);
    assert!(spent <= std::time::Duration::from_secs(60));
    assert_eq!(fields.times().working_on(), yee_fields::Activity::Other);
}
