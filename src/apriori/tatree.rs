/// A plain list of recoded transactions.
///
/// Items inside one transaction are kept sorted ascending once the set
/// has been recoded; the maximum transaction length is tracked because
/// the mining loop uses it as an upper bound on the tree height.
#[derive(Debug, Default, Clone)]
pub struct TransactionSet {
    tracts: Vec<Vec<usize>>,
    max_len: usize,
}

impl TransactionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tract: Vec<usize>) {
        self.max_len = self.max_len.max(tract.len());
        self.tracts.push(tract);
    }

    pub fn len(&self) -> usize {
        self.tracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracts.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn tracts(&self) -> &[Vec<usize>] {
        &self.tracts
    }

    /// Apply an old-id to new-id map. Unmapped items are dropped and the
    /// surviving items are re-sorted, since the map permutes the order.
    pub fn recode(&mut self, map: &[Option<usize>]) {
        self.max_len = 0;
        for tract in &mut self.tracts {
            let mut recoded: Vec<usize> =
                tract.iter().filter_map(|&item| map[item]).collect();
            recoded.sort_unstable();
            self.max_len = self.max_len.max(recoded.len());
            *tract = recoded;
        }
    }

    /// Drop all items whose mark is false. Item order is preserved.
    pub fn filter_items(&mut self, marks: &[bool]) {
        self.max_len = 0;
        for tract in &mut self.tracts {
            tract.retain(|&item| marks[item]);
            self.max_len = self.max_len.max(tract.len());
        }
    }
}

#[derive(Debug)]
struct TaNode {
    /// Maximum number of items on any path below this node.
    max: usize,
    /// Transactions represented below this node (the multiplicity, for a
    /// leaf).
    cnt: usize,
    /// Edge items ascending (internal) or the remaining suffix (leaf).
    items: Vec<usize>,
    /// Child node per edge item; empty marks a leaf.
    children: Vec<usize>,
}

/// Prefix-compacted transaction tree.
///
/// Transactions are sorted lexicographically and merged: equal prefixes
/// share a path, and as soon as a group of transactions collapses to a
/// single distinct remainder, that remainder is stored verbatim in a
/// leaf together with its multiplicity. Counting one leaf then stands in
/// for all its duplicate transactions at once.
#[derive(Debug)]
pub struct TaTree {
    nodes: Vec<TaNode>,
    root: usize,
}

impl TaTree {
    pub fn new(taset: &TransactionSet) -> Self {
        let mut sorted: Vec<&[usize]> =
            taset.tracts().iter().map(|t| t.as_slice()).collect();
        sorted.sort_unstable();

        let mut tree = TaTree { nodes: Vec::new(), root: 0 };
        tree.root = tree.build(&sorted, 0);
        tree
    }

    /// Build the subtree for a sorted group of transactions, all sharing
    /// the first `depth` items, and return its node index.
    fn build(&mut self, group: &[&[usize]], depth: usize) -> usize {
        let cnt = group.len();

        // One distinct remainder left: store it in a leaf.
        let single = match (group.first(), group.last()) {
            (Some(first), Some(last)) => first[depth..] == last[depth..],
            _ => true,
        };
        if single {
            let suffix: Vec<usize> =
                group.first().map_or(Vec::new(), |t| t[depth..].to_vec());
            let max = suffix.len();
            return self.push(TaNode { max, cnt, items: suffix, children: Vec::new() });
        }

        // Transactions exhausted at this depth sort first and only
        // contribute to the through-count.
        let mut lo = group.partition_point(|t| t.len() == depth);
        let mut items = Vec::new();
        let mut children = Vec::new();
        let mut max = 0;
        while lo < group.len() {
            let item = group[lo][depth];
            let hi = lo
                + group[lo..].partition_point(|t| t[depth] == item);
            let child = self.build(&group[lo..hi], depth + 1);
            max = max.max(1 + self.nodes[child].max);
            items.push(item);
            children.push(child);
            lo = hi;
        }
        self.push(TaNode { max, cnt, items, children })
    }

    fn push(&mut self, node: TaNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Total number of transactions in the tree.
    pub fn transaction_count(&self) -> usize {
        self.nodes[self.root].cnt
    }

    /// Maximum number of items on any path below `t`.
    pub fn max(&self, t: usize) -> usize {
        self.nodes[t].max
    }

    pub fn is_leaf(&self, t: usize) -> bool {
        self.nodes[t].children.is_empty()
    }

    /// Number of outgoing edges of an internal node.
    pub fn size(&self, t: usize) -> usize {
        self.nodes[t].children.len()
    }

    /// Edge items of an internal node, or the stored suffix of a leaf.
    pub fn items(&self, t: usize) -> &[usize] {
        &self.nodes[t].items
    }

    pub fn item(&self, t: usize, k: usize) -> usize {
        self.nodes[t].items[k]
    }

    pub fn child(&self, t: usize, k: usize) -> usize {
        self.nodes[t].children[k]
    }

    /// Multiplicity of a leaf, or the through-count of an internal node.
    pub fn cnt(&self, t: usize) -> usize {
        self.nodes[t].cnt
    }
}
