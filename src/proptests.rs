use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::apriori::{apriori_algorithm, FilterMode, FrequentLevel};

const UNIVERSE: usize = 7;

/// Exhaustive reference miner: count every non-empty subset of the item
/// universe directly against the transactions.
fn brute_force(transactions: &[Vec<usize>], supp: usize) -> BTreeMap<Vec<usize>, usize> {
    let cleaned: Vec<Vec<usize>> = transactions
        .iter()
        .map(|t| {
            let mut t = t.clone();
            t.sort_unstable();
            t.dedup();
            t
        })
        .collect();

    let mut frequent = BTreeMap::new();
    for mask in 1u32..1 << UNIVERSE {
        let set: Vec<usize> = (0..UNIVERSE).filter(|i| mask & (1 << i) != 0).collect();
        let support = cleaned
            .iter()
            .filter(|t| set.iter().all(|item| t.contains(item)))
            .count();
        if support >= supp {
            frequent.insert(set, support);
        }
    }
    frequent
}

fn flatten(levels: &[FrequentLevel]) -> BTreeMap<Vec<usize>, usize> {
    levels
        .iter()
        .flat_map(|level| level.iter().map(|(set, supp)| (set.to_vec(), supp)))
        .collect()
}

fn is_proper_superset(a: &[usize], b: &[usize]) -> bool {
    a.len() > b.len() && b.iter().all(|item| a.contains(item))
}

fn database() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..UNIVERSE, 0..5), 0..12)
}

proptest! {
    #[test]
    fn mining_matches_the_brute_force_model(db in database(), supp in 1usize..4) {
        let mined = flatten(&apriori_algorithm(&db, supp, None));
        prop_assert_eq!(mined, brute_force(&db, supp));
    }

    #[test]
    fn maximal_output_is_the_maximal_subfamily(db in database(), supp in 1usize..4) {
        let all = brute_force(&db, supp);
        let maximal = flatten(&apriori_algorithm(&db, supp, Some(FilterMode::Maximal)));

        for (set, supp) in &maximal {
            prop_assert_eq!(all.get(set), Some(supp));
            prop_assert!(
                !all.keys().any(|other| is_proper_superset(other, set)),
                "{:?} has a frequent proper superset", set
            );
        }
        for set in all.keys() {
            if !all.keys().any(|other| is_proper_superset(other, set)) {
                prop_assert!(maximal.contains_key(set), "maximal {:?} missing", set);
            }
        }
    }

    #[test]
    fn closed_output_is_the_closed_subfamily(db in database(), supp in 1usize..4) {
        let all = brute_force(&db, supp);
        let closed = flatten(&apriori_algorithm(&db, supp, Some(FilterMode::Closed)));

        for (set, support) in &closed {
            prop_assert_eq!(all.get(set), Some(support));
            prop_assert!(
                !all.iter().any(|(other, s)| s == support && is_proper_superset(other, set)),
                "{:?} has an equal support proper superset", set
            );
        }
        for (set, support) in &all {
            let absorbed = all
                .iter()
                .any(|(other, s)| s == support && is_proper_superset(other, set));
            if !absorbed {
                prop_assert!(closed.contains_key(set), "closed {:?} missing", set);
            }
        }
    }
}
