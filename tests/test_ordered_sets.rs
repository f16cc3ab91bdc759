use balanced_trees::avl_tree::{AvlSet, IterativeAvlSet};
use balanced_trees::red_black_tree::RedBlackSet;
use balanced_trees::OrderedSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 100_000;
const KEY_RANGE: i32 = 2_000;
const VALIDATE_INTERVAL: usize = 997;

fn random_operations(seed: u64) -> Vec<(bool, i32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..NUM_OF_OPERATIONS)
        .map(|_| (rng.gen_bool(0.55), rng.gen_range(0..KEY_RANGE)))
        .collect()
}

fn log2(n: usize) -> f64 {
    (n as f64).log2()
}

macro_rules! ordered_set_tests {
    ($($module_name:ident: $type_name:ident,)*) => {
        $(
            mod $module_name {
                use super::*;

                #[test]
                fn int_test_random_operations() {
                    let mut set = $type_name::new();
                    let mut expected = BTreeSet::new();

                    for (i, (is_insert, key)) in random_operations(1).into_iter().enumerate() {
                        if is_insert {
                            assert_eq!(set.insert(key), expected.insert(key));
                            assert!(set.contains(key));
                        } else {
                            assert_eq!(set.remove(key), expected.remove(&key));
                            assert!(!set.contains(key));
                        }

                        if i % VALIDATE_INTERVAL == 0 {
                            assert_eq!(set.validate(), Ok(()));
                            assert_eq!(set.len(), expected.len());
                        }
                    }

                    assert_eq!(set.validate(), Ok(()));
                    assert_eq!(
                        set.to_sorted_vec(),
                        expected.iter().cloned().collect::<Vec<i32>>(),
                    );
                }

                #[test]
                fn int_test_remove_even_keys() {
                    let mut set = $type_name::new();
                    for key in 1..=1000 {
                        set.insert(key);
                    }
                    for key in (2..=1000).step_by(2) {
                        set.remove(key);
                    }

                    let expected: BTreeSet<i32> = (1..1000).step_by(2).collect();
                    assert_eq!(set.validate(), Ok(()));
                    assert_eq!(
                        set.to_sorted_vec(),
                        expected.into_iter().collect::<Vec<i32>>(),
                    );
                }

                #[test]
                fn int_test_insert_idempotent() {
                    let mut set: $type_name = vec![5, 3, 8, 1].into_iter().collect();
                    let before = set.to_sorted_vec();
                    let height = set.height();

                    for key in &[5, 3, 8, 1] {
                        assert!(!set.insert(*key));
                    }
                    assert_eq!(set.to_sorted_vec(), before);
                    assert_eq!(set.height(), height);
                    assert_eq!(set.len(), 4);
                }

                #[test]
                fn int_test_remove_absent() {
                    let mut set: $type_name = vec![5, 3, 8].into_iter().collect();
                    assert!(!set.remove(4));
                    assert!(!set.remove(-1));
                    assert_eq!(set.to_sorted_vec(), vec![3, 5, 8]);

                    let mut empty = $type_name::new();
                    assert!(!empty.remove(0));
                    assert_eq!(empty.validate(), Ok(()));
                }

                #[test]
                fn int_test_contains_after_mutation() {
                    let mut set = $type_name::new();
                    for key in &[i32::min_value(), -7, 0, 7, i32::max_value()] {
                        set.insert(*key);
                        assert!(set.contains(*key));
                    }
                    for key in &[i32::min_value(), 0, i32::max_value()] {
                        set.remove(*key);
                        assert!(!set.contains(*key));
                    }
                    assert_eq!(set.to_sorted_vec(), vec![-7, 7]);
                    assert_eq!(set.validate(), Ok(()));
                }

                #[test]
                fn int_test_sequential() {
                    let mut set = $type_name::new();
                    for key in 0..4096 {
                        set.insert(key);
                    }
                    assert_eq!(set.validate(), Ok(()));
                    for key in (0..4096).rev() {
                        set.insert(-key);
                    }
                    assert_eq!(set.validate(), Ok(()));
                    assert_eq!(set.len(), 8191);

                    for key in -4095..4096 {
                        assert!(set.remove(key));
                        if key % 512 == 0 {
                            assert_eq!(set.validate(), Ok(()));
                        }
                    }
                    assert!(set.is_empty());
                    assert_eq!(set.height(), 0);
                }

                #[test]
                fn int_test_clear() {
                    let mut set: $type_name = (0..1000).collect();
                    set.clear();
                    assert!(set.is_empty());
                    assert_eq!(set.height(), 0);
                    assert_eq!(set.to_sorted_vec(), Vec::<i32>::new());
                    assert_eq!(set.validate(), Ok(()));

                    set.extend(vec![3, 1, 2]);
                    assert_eq!(set.to_sorted_vec(), vec![1, 2, 3]);
                    assert_eq!(set.validate(), Ok(()));
                }

                #[test]
                fn int_test_height_bound() {
                    let mut rng = StdRng::seed_from_u64(7);
                    let mut set = $type_name::new();
                    for _ in 0..50_000 {
                        set.insert(rng.gen());
                    }
                    let n = set.len();
                    assert!(set.height() as f64 <= 2.0 * log2(n + 1));
                }

                #[test]
                fn int_test_iter_restartable() {
                    let set: $type_name = (0..100).rev().collect();
                    let first = set.iter().collect::<Vec<i32>>();
                    let second = (&set).into_iter().collect::<Vec<i32>>();
                    assert_eq!(first, second);
                    assert_eq!(first, (0..100).collect::<Vec<i32>>());
                    assert_eq!(set.min(), Some(0));
                    assert_eq!(set.max(), Some(99));
                }
            }
        )*
    };
}

ordered_set_tests!(
    avl_set: AvlSet,
    iterative_avl_set: IterativeAvlSet,
    red_black_set: RedBlackSet,
);

fn apply<S: OrderedSet + Default>(operations: &[(bool, i32)]) -> S {
    let mut set = S::default();
    for &(is_insert, key) in operations {
        if is_insert {
            set.insert(key);
        } else {
            set.remove(key);
        }
    }
    set
}

#[test]
fn int_test_cross_implementation() {
    for seed in 0..4 {
        let operations = random_operations(seed);
        let expected = operations
            .iter()
            .fold(BTreeSet::new(), |mut expected, &(is_insert, key)| {
                if is_insert {
                    expected.insert(key);
                } else {
                    expected.remove(&key);
                }
                expected
            });

        let avl = apply::<AvlSet>(&operations);
        let iterative_avl = apply::<IterativeAvlSet>(&operations);
        let red_black = apply::<RedBlackSet>(&operations);

        let expected = expected.into_iter().collect::<Vec<i32>>();
        assert_eq!(avl.to_sorted_vec(), expected);
        assert_eq!(iterative_avl.to_sorted_vec(), expected);
        assert_eq!(red_black.to_sorted_vec(), expected);
    }
}

#[test]
fn int_test_avl_variants_agree_on_height() {
    let operations = random_operations(11);
    let avl = apply::<AvlSet>(&operations);
    let iterative_avl = apply::<IterativeAvlSet>(&operations);

    let n = avl.len();
    assert!(avl.height() as f64 <= 1.45 * log2(n + 2));
    assert!(iterative_avl.height() as f64 <= 1.45 * log2(n + 2));
}

#[test]
fn int_test_avl_insert_scenario() {
    let mut avl = AvlSet::new();
    let mut iterative_avl = IterativeAvlSet::new();
    for key in 1..=3 {
        avl.insert(key);
        iterative_avl.insert(key);
    }
    assert_eq!(avl.to_sorted_vec(), vec![1, 2, 3]);
    assert_eq!(avl.height(), 2);
    assert_eq!(iterative_avl.to_sorted_vec(), vec![1, 2, 3]);
    assert_eq!(iterative_avl.height(), 2);
}

#[test]
fn int_test_red_black_scenario() {
    let set: RedBlackSet = vec![10, 20, 30, 40, 50, 60, 70].into_iter().collect();
    assert_eq!(set.to_sorted_vec(), vec![10, 20, 30, 40, 50, 60, 70]);
    assert_eq!(set.validate(), Ok(()));
    assert_eq!(set.black_height(), 2);
}
