use mutrun_core::{unique_runs, MutationRun, RunInterner, RunPool, SharedRun};
use mutrun_test_utils::handles;
use proptest::prelude::*;
use std::collections::HashSet;

fn run_of(raw: &[u32]) -> MutationRun {
    MutationRun::from_handles(&handles(raw)).unwrap()
}

proptest! {
    #[test]
    fn prop_equal_content_implies_equal_hash(
        raw in proptest::collection::vec(0..50u32, 0..64)
    ) {
        let a = run_of(&raw);
        let b = run_of(&raw);
        prop_assert!(a.structurally_equal(&b));
        prop_assert!(b.structurally_equal(&a));
        prop_assert!(a.structurally_equal(&a));
        prop_assert_eq!(a.structural_hash(), b.structural_hash());
    }

    #[test]
    fn prop_unequal_hash_implies_unequal_content(
        left in proptest::collection::vec(0..8u32, 0..16),
        right in proptest::collection::vec(0..8u32, 0..16),
    ) {
        let a = run_of(&left);
        let b = run_of(&right);
        if a.structural_hash() != b.structural_hash() {
            prop_assert!(!a.structurally_equal(&b));
        }
        prop_assert_eq!(a.structurally_equal(&b), left == right);
    }
}

#[test]
fn identical_handles_compare_and_hash_equal() {
    let a = run_of(&[5, 12, 40]);
    let b = run_of(&[5, 12, 40]);
    let c = run_of(&[5, 12, 41]);

    assert!(a.structurally_equal(&b));
    assert_eq!(a.structural_hash(), b.structural_hash());
    assert!(!a.structurally_equal(&c));
}

#[test]
fn runs_work_as_hash_set_keys() {
    let mut set = HashSet::new();
    set.insert(run_of(&[1, 2, 3]));
    set.insert(run_of(&[1, 2, 3]));
    set.insert(run_of(&[1, 2]));
    assert_eq!(set.len(), 2);
}

#[test]
fn interning_a_population_collapses_duplicates() {
    let pool = RunPool::new();
    let haplotypes: [&[u32]; 3] = [&[1, 5, 9], &[1, 5], &[2, 6, 10, 14, 18]];

    let mut genomes: Vec<SharedRun> = (0..30)
        .map(|i| {
            let mut run = pool.acquire();
            run.get_mut()
                .extend_from_slice(&handles(haplotypes[i % 3]))
                .unwrap();
            run
        })
        .collect();

    let stats = unique_runs(&mut genomes);
    assert_eq!(stats.examined, 30);
    assert_eq!(stats.distinct, 3);
    assert_eq!(stats.merged, 27);

    for (i, genome) in genomes.iter().enumerate() {
        assert!(genome.ptr_eq(&genomes[i % 3]));
        assert_eq!(genome.owners(), 10);
    }
    assert_eq!(pool.retained(), 27);
}

#[test]
fn interning_is_idempotent() {
    let pool = RunPool::new();
    let mut genomes: Vec<SharedRun> = (0..4)
        .map(|_| {
            let mut run = pool.acquire();
            run.get_mut().extend_from_slice(&handles(&[7, 8])).unwrap();
            run
        })
        .collect();

    unique_runs(&mut genomes);
    let second = unique_runs(&mut genomes);
    assert_eq!(second.merged, 0);
    assert_eq!(second.distinct, 1);
}

#[test]
fn interner_returns_canonical_instance() {
    let pool = RunPool::new();
    let mut interner = RunInterner::new();

    let mut first = pool.acquire();
    first.get_mut().extend_from_slice(&handles(&[3, 4])).unwrap();
    let mut second = pool.acquire();
    second.get_mut().extend_from_slice(&handles(&[3, 4])).unwrap();

    let a = interner.intern(first);
    let b = interner.intern(second);
    assert!(a.ptr_eq(&b));
    assert_eq!(interner.stats().merged, 1);
    assert!(!interner.is_empty());
}
