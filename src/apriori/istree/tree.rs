/// Result filter applied after the search has saturated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Keep only sets with no frequent proper superset.
    Maximal,
    /// Keep only sets with no proper superset of equal support.
    Closed,
}

/// One node of the item set tree.
///
/// The path of node ids from the root down to a node, extended by
/// `offset + i`, names the item set counted in `cnts[i]`. Counters are
/// dense over the contiguous item range `offset..offset + cnts.len()`;
/// every covered item is strictly greater than each id on the path.
#[derive(Debug)]
pub(crate) struct IsNode {
    /// Item this node contributes to the path (unused for the root).
    pub(crate) id: usize,
    pub(crate) parent: Option<usize>,
    /// Next node on the same level, in creation order.
    pub(crate) succ: Option<usize>,
    /// Item corresponding to `cnts[0]`.
    pub(crate) offset: usize,
    pub(crate) cnts: Vec<usize>,
    /// Dense child vector indexed by `child.id - chfirst`; empty until
    /// the node has been extended by a new level.
    pub(crate) children: Vec<Option<usize>>,
    /// Id of the first child once `children` is populated.
    pub(crate) chfirst: usize,
    /// Subtree holds no counters of the newest generation; counting
    /// passes it over, subset lookups do not.
    pub(crate) skip: bool,
}

/// Level-wise prefix tree of candidate and frequent item sets.
///
/// Nodes live in an arena and refer to each other by index, so growing a
/// level never invalidates existing links. Depth k of the tree stores
/// the sets of size k; the root counter vector covers the single items.
#[derive(Debug)]
pub struct IsTree {
    pub(crate) nodes: Vec<IsNode>,
    /// Head of the sibling list of each level.
    pub(crate) levels: Vec<usize>,
    pub(crate) supp: usize,
    pub(crate) tacnt: usize,
}

pub(crate) const ROOT: usize = 0;

impl IsTree {
    /// Create a tree over `item_cnt` recoded items with the given
    /// minimum absolute support (at least 1).
    pub fn new(item_cnt: usize, supp: usize) -> Self {
        let root = IsNode {
            id: 0,
            parent: None,
            succ: None,
            offset: 0,
            cnts: vec![0; item_cnt],
            children: Vec::new(),
            chfirst: 0,
            skip: false,
        };
        IsTree {
            nodes: vec![root],
            levels: vec![ROOT],
            supp: supp.max(1),
            tacnt: 0,
        }
    }

    pub fn item_count(&self) -> usize {
        self.nodes[ROOT].cnts.len()
    }

    pub fn min_support(&self) -> usize {
        self.supp
    }

    /// Current height: the size of the largest sets that have counters.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Seed the support of a single item, normally from the catalog
    /// frequencies gathered while reading.
    pub fn seed_item_count(&mut self, item: usize, cnt: usize) {
        if item < self.nodes[ROOT].cnts.len() {
            self.nodes[ROOT].cnts[item] = cnt;
        }
    }

    pub fn set_transaction_count(&mut self, cnt: usize) {
        self.tacnt = cnt;
    }

    pub fn transaction_count(&self) -> usize {
        self.tacnt
    }

    /// Iterate all frequent item sets as `(set, support)` pairs.
    ///
    /// Order: increasing set size; within a size, node creation order;
    /// within a node, ascending counter index.
    pub fn frequent_sets(&self) -> FrequentSets<'_> {
        FrequentSets {
            tree: self,
            size: 1,
            node: ROOT,
            index: 0,
        }
    }
}

/// Cursor over the frequent item sets of a saturated tree.
pub struct FrequentSets<'a> {
    tree: &'a IsTree,
    /// Size of the sets currently being emitted (1-based level).
    size: usize,
    node: usize,
    index: usize,
}

impl Iterator for FrequentSets<'_> {
    type Item = (Vec<usize>, usize);

    fn next(&mut self) -> Option<(Vec<usize>, usize)> {
        loop {
            if self.size > self.tree.height() {
                return None;
            }
            let node = &self.tree.nodes[self.node];
            if self.index >= node.cnts.len() {
                match node.succ {
                    Some(succ) => self.node = succ,
                    None => {
                        self.size += 1;
                        if self.size > self.tree.height() {
                            return None;
                        }
                        self.node = self.tree.levels[self.size - 1];
                    }
                }
                self.index = 0;
                continue;
            }
            let slot = self.index;
            self.index += 1;
            let supp = node.cnts[slot];
            if supp < self.tree.supp {
                continue;
            }

            let mut set = vec![0; self.size];
            set[self.size - 1] = node.offset + slot;
            let mut pos = self.size - 1;
            let mut cur = node;
            while let Some(parent) = cur.parent {
                pos -= 1;
                set[pos] = cur.id;
                cur = &self.tree.nodes[parent];
            }
            return Some((set, supp));
        }
    }
}
