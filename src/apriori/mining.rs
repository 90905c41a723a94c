use std::time::{Duration, Instant};

use super::istree::{FilterMode, IsTree};
use super::storage::FrequentLevel;
use super::tatree::{TaTree, TransactionSet};

/// Mine all frequent item sets of `transactions` with the given minimum
/// absolute support, optionally reduced to maximal or closed sets.
///
/// Transactions are plain item id lists; order and duplicates inside one
/// transaction do not matter. The result holds one level per item set
/// size, each set reported with the caller's original ids and its
/// absolute support. The empty set is not reported.
pub fn apriori_algorithm(
    transactions: &[Vec<usize>],
    min_support: usize,
    filter: Option<FilterMode>,
) -> Vec<FrequentLevel> {
    let supp = min_support.max(1);

    // Per-item frequencies, one occurrence per transaction.
    let universe = transactions
        .iter()
        .flat_map(|t| t.iter().copied())
        .max()
        .map_or(0, |max| max + 1);
    let mut frqs = vec![0usize; universe];
    let mut taset = TransactionSet::new();
    for tract in transactions {
        let mut tract = tract.clone();
        tract.sort_unstable();
        tract.dedup();
        for &item in &tract {
            frqs[item] += 1;
        }
        taset.add(tract);
    }

    // Renumber the frequent items by decreasing frequency.
    let mut order: Vec<usize> = (0..universe).filter(|&i| frqs[i] >= supp).collect();
    order.sort_by(|&a, &b| frqs[b].cmp(&frqs[a]).then(a.cmp(&b)));
    let mut map = vec![None; universe];
    for (new_id, &old_id) in order.iter().enumerate() {
        map[old_id] = Some(new_id);
    }
    if order.is_empty() {
        return Vec::new();
    }
    taset.recode(&map);

    let mut ist = IsTree::new(order.len(), supp);
    for (new_id, &old_id) in order.iter().enumerate() {
        ist.seed_item_count(new_id, frqs[old_id]);
    }
    ist.set_transaction_count(taset.len());

    let (tatree, build_time) = timed(|| TaTree::new(&taset));
    grow_to_saturation(&mut ist, &mut taset, tatree, build_time);

    if let Some(mode) = filter {
        ist.filter(mode);
    }

    collect_levels(&ist, &order)
}

/// Run the level loop until no further level can be added: check item
/// usage, grow, rebuild the transaction tree when the time balance says
/// the smaller tree pays for its construction, count.
fn grow_to_saturation(
    ist: &mut IsTree,
    taset: &mut TransactionSet,
    mut tatree: TaTree,
    mut build_time: Duration,
) {
    let mut max = taset.max_len();
    let mut live = ist.item_count();
    let mut count_time = Duration::ZERO;
    let mut marks = vec![false; ist.item_count()];

    while ist.height() < max {
        let used = ist.mark_used_items(&mut marks);
        max = max.min(used);
        if ist.height() >= used {
            break;
        }
        if !ist.add_level() {
            break;
        }
        if used < live
            && (used as f64) * build_time.as_secs_f64()
                < 0.1 * (live as f64) * count_time.as_secs_f64()
        {
            live = used;
            taset.filter_items(&marks);
            let rebuilt = timed(|| TaTree::new(taset));
            tatree = rebuilt.0;
            build_time = rebuilt.1;
        }
        let counted = timed(|| ist.count_tree(&tatree));
        count_time = counted.1;
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Drain the tree into per-size levels, translating recoded ids back to
/// the ids the caller supplied.
fn collect_levels(ist: &IsTree, order: &[usize]) -> Vec<FrequentLevel> {
    let mut levels: Vec<FrequentLevel> = Vec::new();
    for (set, supp) in ist.frequent_sets() {
        let size = set.len();
        while levels.len() < size {
            levels.push(FrequentLevel::new(levels.len() + 1));
        }
        let unmapped: Vec<usize> = set.iter().map(|&item| order[item]).collect();
        levels[size - 1].push_set(unmapped, supp);
    }
    levels
}
