use std::collections::BTreeSet;

use super::istree::{FilterMode, IsTree};
use super::mining::apriori_algorithm;
use super::storage::FrequentLevel;

type SetWithSupport = (Vec<usize>, usize);

fn mine(
    transactions: &[&[usize]],
    supp: usize,
    filter: Option<FilterMode>,
) -> BTreeSet<SetWithSupport> {
    let owned: Vec<Vec<usize>> = transactions.iter().map(|t| t.to_vec()).collect();
    apriori_algorithm(&owned, supp, filter)
        .iter()
        .flat_map(|level| level.iter().map(|(set, supp)| (set.to_vec(), supp)))
        .collect()
}

fn sets(expected: &[(&[usize], usize)]) -> BTreeSet<SetWithSupport> {
    expected.iter().map(|&(set, supp)| (set.to_vec(), supp)).collect()
}

/// Drive the tree by hand with flat transaction counting, without the
/// recoding and transaction tree machinery. Items must already be dense
/// ids and each transaction sorted ascending.
fn mine_flat(transactions: &[&[usize]], item_cnt: usize, supp: usize) -> IsTree {
    let mut ist = IsTree::new(item_cnt, supp);
    for item in 0..item_cnt {
        let frq = transactions.iter().filter(|t| t.contains(&item)).count();
        ist.seed_item_count(item, frq);
    }
    ist.set_transaction_count(transactions.len());

    let max = transactions.iter().map(|t| t.len()).max().unwrap_or(0);
    while ist.height() < max {
        if !ist.add_level() {
            break;
        }
        for t in transactions {
            ist.count(t);
        }
    }
    ist
}

const S1: &[&[usize]] = &[&[1, 2, 3], &[1, 2], &[1, 3], &[2, 3], &[1, 2, 3]];

#[test]
fn all_frequent_sets_at_support_two() {
    assert_eq!(
        mine(S1, 2, None),
        sets(&[
            (&[1], 4),
            (&[2], 4),
            (&[3], 4),
            (&[1, 2], 3),
            (&[1, 3], 3),
            (&[2, 3], 3),
            (&[1, 2, 3], 2),
        ])
    );
}

#[test]
fn all_frequent_sets_at_support_three() {
    assert_eq!(
        mine(S1, 3, None),
        sets(&[
            (&[1], 4),
            (&[2], 4),
            (&[3], 4),
            (&[1, 2], 3),
            (&[1, 3], 3),
            (&[2, 3], 3),
        ])
    );
}

#[test]
fn maximal_filter_keeps_only_the_pairs() {
    assert_eq!(
        mine(S1, 3, Some(FilterMode::Maximal)),
        sets(&[(&[1, 2], 3), (&[1, 3], 3), (&[2, 3], 3)])
    );
}

#[test]
fn closed_filter_absorbs_equal_support_subsets() {
    // {a}, {b} and {c} disappear into {a,b} resp. {a,b,c}, and {a,b}
    // stays because its support exceeds the one of {a,b,c}.
    let transactions: &[&[usize]] = &[&[0, 1, 2], &[0, 1, 2], &[0, 1]];
    assert_eq!(
        mine(transactions, 2, Some(FilterMode::Closed)),
        sets(&[(&[0, 1], 3), (&[0, 1, 2], 2)])
    );
}

#[test]
fn single_item_database_stops_at_depth_one() {
    let tract = [1usize];
    let transactions: Vec<&[usize]> = std::iter::repeat(&tract[..]).take(10_000).collect();
    assert_eq!(mine(&transactions, 1, None), sets(&[(&[1], 10_000)]));
}

#[test]
fn disjoint_pairs_prune_the_cross_combinations() {
    assert_eq!(
        mine(&[&[1, 2], &[3, 4]], 1, None),
        sets(&[
            (&[1], 1),
            (&[2], 1),
            (&[3], 1),
            (&[4], 1),
            (&[1, 2], 1),
            (&[3, 4], 1),
        ])
    );
}

#[test]
fn nothing_is_frequent_above_the_transaction_count() {
    assert!(mine(S1, 6, None).is_empty());
    assert!(mine(&[], 1, None).is_empty());
}

#[test]
fn flat_counting_matches_the_transaction_tree_path() {
    let dense: &[&[usize]] = &[&[0, 1, 2], &[0, 1], &[0, 2], &[1, 2], &[0, 1, 2]];
    let ist = mine_flat(dense, 3, 2);
    let flat: BTreeSet<SetWithSupport> = ist.frequent_sets().collect();
    assert_eq!(flat, mine(dense, 2, None));
}

#[test]
fn extraction_reports_sizes_in_ascending_order() {
    let ist = mine_flat(&[&[0, 1, 2], &[0, 1, 2], &[0, 1]], 3, 2);
    let sizes: Vec<usize> = ist.frequent_sets().map(|(set, _)| set.len()).collect();
    let mut sorted = sizes.clone();
    sorted.sort_unstable();
    assert_eq!(sizes, sorted);
}

#[test]
fn extracted_paths_are_ascending_and_distinct() {
    let ist = mine_flat(&[&[0, 1, 2, 3], &[0, 1, 3], &[0, 2, 3], &[1, 2, 3]], 4, 2);
    for (set, supp) in ist.frequent_sets() {
        assert!(set.windows(2).all(|w| w[0] < w[1]), "not ascending: {set:?}");
        assert!(supp >= 2);
    }
}

#[test]
fn every_subset_of_a_counted_set_is_frequent() {
    // Downward closure: any represented frequent set of size k has k
    // frequent subsets of size k - 1.
    let found = mine(S1, 2, None);
    for (set, _) in &found {
        if set.len() < 2 {
            continue;
        }
        for skip in 0..set.len() {
            let mut subset = set.clone();
            subset.remove(skip);
            assert!(
                found.iter().any(|(s, _)| *s == subset),
                "missing subset {subset:?} of {set:?}"
            );
        }
    }
}

#[test]
fn maximal_filter_is_idempotent() {
    let transactions: Vec<Vec<usize>> = S1.iter().map(|t| t.to_vec()).collect();
    let once = apriori_algorithm(&transactions, 2, Some(FilterMode::Maximal));

    let dense: &[&[usize]] = &[&[0, 1, 2], &[0, 1], &[0, 2], &[1, 2], &[0, 1, 2]];
    let mut ist = mine_flat(dense, 3, 2);
    ist.filter(FilterMode::Maximal);
    let first: BTreeSet<SetWithSupport> = ist.frequent_sets().collect();
    ist.filter(FilterMode::Maximal);
    let second: BTreeSet<SetWithSupport> = ist.frequent_sets().collect();
    assert_eq!(first, second);
    assert_eq!(once.iter().map(|l| l.len()).sum::<usize>(), first.len());
}

#[test]
fn used_item_check_drops_items_without_live_counters() {
    // Item 2 is frequent on its own but occurs in no frequent pair, so
    // it is dead weight for all further levels.
    let transactions: &[&[usize]] = &[&[0, 1], &[0, 1], &[2], &[2]];
    let mut ist = IsTree::new(3, 2);
    for item in 0..3 {
        let frq = transactions.iter().filter(|t| t.contains(&item)).count();
        ist.seed_item_count(item, frq);
    }
    ist.set_transaction_count(transactions.len());
    assert!(ist.add_level());
    for t in transactions {
        ist.count(t);
    }

    let mut marks = vec![false; 3];
    assert_eq!(ist.mark_used_items(&mut marks), 2);
    assert!(marks[0] && marks[1]);
    assert!(!marks[2]);
}

#[test]
fn frequent_level_stores_sets_with_supports() {
    let mut level = FrequentLevel::new(2);
    level.push_set(vec![5, 2], 7);
    level.push_set(vec![1, 3], 4);

    assert_eq!(level.itemset_size(), 2);
    assert_eq!(level.len(), 2);
    assert!(!level.is_empty());
    assert_eq!(level.get_itemset(0), &[2, 5]);
    assert_eq!(level.support(0), 7);
    let pairs: Vec<(&[usize], usize)> = level.iter().collect();
    assert_eq!(pairs[1], (&[1, 3][..], 4));
}
