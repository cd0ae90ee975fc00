use mutrun_core::{GrowthPolicy, MutationIndex, MutationRun, PoolConfig, RunPool, INLINE_CAPACITY};
use mutrun_test_utils::{handles, init_test_tracing};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_release_then_acquire_never_shrinks(len in 0..200u32) {
        let pool = RunPool::new();
        let mut run = pool.acquire();
        for raw in 0..len {
            run.get_mut().push(MutationIndex::new(raw)).unwrap();
        }
        let capacity = run.borrow().capacity();
        drop(run);

        let reused = pool.acquire();
        prop_assert_eq!(reused.borrow().len(), 0);
        prop_assert!(reused.borrow().capacity() >= capacity);
    }
}

#[test]
fn fifth_append_grows_capacity_to_eight() {
    init_test_tracing();
    let pool = RunPool::new();
    let mut run = pool.acquire();
    assert_eq!(run.borrow().capacity(), INLINE_CAPACITY);

    for raw in 0..5 {
        run.get_mut().push(MutationIndex::new(raw)).unwrap();
    }

    assert_eq!(run.borrow().len(), 5);
    assert_eq!(run.borrow().capacity(), 8);
}

#[test]
fn steady_state_stops_allocating() {
    let pool = RunPool::new();

    for _ in 0..10 {
        let live: Vec<_> = (0..50)
            .map(|_| {
                let mut run = pool.acquire();
                run.get_mut().extend_from_slice(&handles(&[1, 2, 3, 4, 5])).unwrap();
                run
            })
            .collect();
        drop(live);
    }

    let stats = pool.stats();
    assert_eq!(stats.fresh_allocations, 50);
    assert_eq!(stats.acquisitions, 500);
    assert_eq!(stats.reuses, 450);
    assert_eq!(pool.retained(), 50);
}

#[test]
fn reused_run_starts_unstamped_and_empty() {
    let pool = RunPool::new();
    let run = pool.acquire();
    run.run_if_not_stamped(mutrun_core::next_global_epoch(), |r| {
        r.push(MutationIndex::new(1)).unwrap();
    });
    drop(run);

    let reused = pool.acquire();
    assert!(reused.borrow().is_empty());
    assert_eq!(reused.borrow().epoch(), mutrun_core::Epoch::UNSTAMPED);
}

#[test]
fn config_from_toml_drives_pool() {
    let config = PoolConfig::from_toml_str(
        r#"
        preallocate = 2

        [growth]
        doubling_limit = 8
        linear_step = 4
        "#,
    )
    .unwrap();
    let pool = RunPool::with_config(config).unwrap();
    assert_eq!(pool.retained(), 2);

    let mut run = pool.acquire();
    assert_eq!(run.borrow().policy(), GrowthPolicy::new(8, 4));
    for raw in 0..9 {
        run.get_mut().push(MutationIndex::new(raw)).unwrap();
    }
    // 4 -> 8 -> 12
    assert_eq!(run.borrow().capacity(), 12);
}

#[test]
fn acquire_copy_of_matches_source() {
    let pool = RunPool::new();
    let source = MutationRun::from_handles(&handles(&[4, 8, 15, 16, 23, 42])).unwrap();
    let copy = pool.acquire_copy_of(&source).unwrap();
    assert_eq!(copy.borrow().as_slice(), source.as_slice());
    assert!(copy.is_uniquely_owned());
}
