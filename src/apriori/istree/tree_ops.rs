use super::tree::{FilterMode, IsNode, IsTree, ROOT};
use crate::apriori::tatree::TaTree;

impl IsTree {
    /// Count one transaction: add 1 to every counter whose item set is a
    /// subset of `set`. Items must be ascending and distinct.
    pub fn count(&mut self, set: &[usize]) {
        if set.len() >= self.height() {
            self.count_node(ROOT, set, self.height(), 1);
        }
        self.tacnt += 1;
    }

    /// Count a whole transaction tree, each leaf weighted by its
    /// multiplicity. Resets the transaction baseline to the tree total.
    pub fn count_tree(&mut self, tat: &TaTree) {
        self.count_tree_node(ROOT, tat, tat.root(), self.height());
        self.tacnt = tat.transaction_count();
    }

    /// Descend the counter tree along `set`. `min` is the number of items
    /// that must still be consumable to reach the deepest counters; any
    /// branch that cannot supply them is cut off.
    fn count_node(&mut self, node: usize, set: &[usize], min: usize, weight: usize) {
        if self.nodes[node].skip {
            return;
        }
        if self.nodes[node].children.is_empty() {
            // Counter node of the newest level.
            let offset = self.nodes[node].offset;
            let size = self.nodes[node].cnts.len();
            let mut rest = set;
            while let Some((&x, tail)) = rest.split_first() {
                if x >= offset {
                    break;
                }
                rest = tail;
            }
            for &x in rest {
                let i = x - offset;
                if i >= size {
                    return;
                }
                self.nodes[node].cnts[i] += weight;
            }
        } else {
            let chfirst = self.nodes[node].chfirst;
            let chcnt = self.nodes[node].children.len();
            let min = min - 1; // descending consumes one item
            let mut rest = set;
            while rest.len() > min && rest[0] < chfirst {
                rest = &rest[1..];
            }
            while rest.len() > min {
                let x = rest[0];
                rest = &rest[1..];
                let j = x - chfirst;
                if j >= chcnt {
                    return;
                }
                if let Some(child) = self.nodes[node].children[j] {
                    self.count_node(child, rest, min, weight);
                }
            }
        }
    }

    /// Descend the transaction tree and the counter tree together. Every
    /// edge item may be skipped (same counter node, deeper transaction
    /// node) or consumed (both trees descend).
    fn count_tree_node(&mut self, node: usize, tat: &TaTree, t: usize, min: usize) {
        if tat.max(t) < min || self.nodes[node].skip {
            return;
        }
        if tat.is_leaf(t) {
            self.count_node(node, tat.items(t), min, tat.cnt(t));
            return;
        }
        for k in 0..tat.size(t) {
            self.count_tree_node(node, tat, tat.child(t, k), min);
        }
        if self.nodes[node].children.is_empty() {
            let offset = self.nodes[node].offset;
            let size = self.nodes[node].cnts.len();
            for k in 0..tat.size(t) {
                let x = tat.item(t, k);
                if x < offset {
                    continue;
                }
                let i = x - offset;
                if i >= size {
                    break;
                }
                let weight = tat.cnt(tat.child(t, k));
                self.nodes[node].cnts[i] += weight;
            }
        } else {
            let chfirst = self.nodes[node].chfirst;
            let chcnt = self.nodes[node].children.len();
            for k in 0..tat.size(t) {
                let x = tat.item(t, k);
                if x < chfirst {
                    continue;
                }
                let j = x - chfirst;
                if j >= chcnt {
                    break;
                }
                if let Some(child) = self.nodes[node].children[j] {
                    self.count_tree_node(child, tat, tat.child(t, k), min - 1);
                }
            }
        }
    }

    /// Support of the set `path(node) ∪ set`, or `None` when the set is
    /// not represented (its support is below the minimum).
    pub(crate) fn get_support(&self, node: usize, set: &[usize]) -> Option<usize> {
        let mut cur = node;
        let (&last, prefix) = set.split_last()?;
        for &item in prefix {
            let n = &self.nodes[cur];
            let j = item.checked_sub(n.chfirst)?;
            cur = (*n.children.get(j)?)?;
        }
        let n = &self.nodes[cur];
        let i = last.checked_sub(n.offset)?;
        n.cnts.get(i).copied()
    }

    /// Clear the counter of `path(node) ∪ set`: unconditionally when
    /// `keep` is `None`, otherwise only when it equals `keep`.
    fn clear_support(&mut self, node: usize, set: &[usize], keep: Option<usize>) {
        let mut cur = node;
        let (&last, prefix) = match set.split_last() {
            Some(split) => split,
            None => return,
        };
        for &item in prefix {
            let n = &self.nodes[cur];
            let j = match item.checked_sub(n.chfirst) {
                Some(j) if j < n.children.len() => j,
                _ => return,
            };
            cur = match n.children[j] {
                Some(child) => child,
                None => return,
            };
        }
        let n = &mut self.nodes[cur];
        if let Some(i) = last.checked_sub(n.offset) {
            if i < n.cnts.len() && keep.map_or(true, |s| n.cnts[i] == s) {
                n.cnts[i] = 0;
            }
        }
    }

    /// Extend the tree by one level of candidate counters. Returns false
    /// when no candidate survives the subset checks, i.e. the search has
    /// saturated.
    pub fn add_level(&mut self) -> bool {
        let depth = self.levels.len();
        let mut buf = vec![0usize; depth + 2];
        let mut accepted = Vec::new();

        let mut head: Option<usize> = None;
        let mut tail: Option<usize> = None;
        let mut cursor = Some(self.levels[depth - 1]);
        while let Some(np) = cursor {
            cursor = self.nodes[np].succ;

            let mut first: Option<usize> = None;
            let mut last = 0;
            for i in 0..self.nodes[np].cnts.len() {
                let child = match self.make_child(np, i, &mut buf, &mut accepted) {
                    Some(child) => child,
                    None => continue,
                };
                let idx = self.nodes.len();
                self.nodes.push(child);
                match tail {
                    Some(t) => self.nodes[t].succ = Some(idx),
                    None => head = Some(idx),
                }
                tail = Some(idx);
                first.get_or_insert(idx);
                last = idx;
            }

            match first {
                None => self.nodes[np].skip = true,
                Some(first) => {
                    // Materialize the dense child vector of the parent.
                    let chfirst = self.nodes[first].id;
                    let span = self.nodes[last].id - chfirst + 1;
                    let mut vec = vec![None; span];
                    let mut cur = Some(first);
                    while let Some(c) = cur {
                        vec[self.nodes[c].id - chfirst] = Some(c);
                        cur = if c == last { None } else { self.nodes[c].succ };
                    }
                    self.nodes[np].children = vec;
                    self.nodes[np].chfirst = chfirst;
                }
            }
        }

        match head {
            None => false,
            Some(head) => {
                self.levels.push(head);
                self.tacnt = 0;
                self.propagate_skips(ROOT);
                true
            }
        }
    }

    /// Build the candidate child extending the set of `node`'s slot
    /// `index`, or `None` when no extension passes the subset checks.
    ///
    /// A slot `j > index` qualifies when it is frequent itself and every
    /// other subset of the extended set, found by climbing the ancestors
    /// while growing the tail path in `buf`, is frequent too. Accepted
    /// items span the new counter vector; rejected items inside the span
    /// keep a permanently zero slot, which is cheaper than a sparse
    /// layout and never reaches the minimum support.
    fn make_child(
        &self,
        node: usize,
        index: usize,
        buf: &mut [usize],
        accepted: &mut Vec<usize>,
    ) -> Option<IsNode> {
        let n = &self.nodes[node];
        if n.cnts[index] < self.supp {
            return None;
        }
        let item = n.offset + index;
        let blen = buf.len();
        buf[blen - 2] = item;

        accepted.clear();
        for j in index + 1..n.cnts.len() {
            if n.cnts[j] < self.supp {
                continue;
            }
            let cand = n.offset + j;
            buf[blen - 1] = cand;
            let mut start = blen - 2;
            let mut cur = node;
            let ok = loop {
                let parent = match self.nodes[cur].parent {
                    Some(parent) => parent,
                    None => break true,
                };
                match self.get_support(parent, &buf[start..]) {
                    Some(supp) if supp >= self.supp => {}
                    _ => break false,
                }
                start -= 1;
                buf[start] = self.nodes[cur].id;
                cur = parent;
            };
            if ok {
                accepted.push(cand);
            }
        }

        let (&first, _) = accepted.split_first()?;
        let last = accepted[accepted.len() - 1];
        Some(IsNode {
            id: item,
            parent: Some(node),
            succ: None,
            offset: first,
            cnts: vec![0; last - first + 1],
            children: Vec::new(),
            chfirst: 0,
            skip: false,
        })
    }

    /// Mark every subtree whose descendants are all marked, so counting
    /// can pass it over wholesale. Fresh counter nodes are never marked.
    fn propagate_skips(&mut self, node: usize) -> bool {
        if self.nodes[node].skip {
            return true;
        }
        if self.nodes[node].children.is_empty() {
            return false;
        }
        let mut all = true;
        for j in 0..self.nodes[node].children.len() {
            if let Some(child) = self.nodes[node].children[j] {
                all &= self.propagate_skips(child);
            }
        }
        if all {
            self.nodes[node].skip = true;
        }
        all
    }

    /// Mark every item that still occurs in a frequent counter of a
    /// subtree that future counting will visit. Returns how many items
    /// are marked; the driver drops the others from the transaction tree.
    pub fn mark_used_items(&self, marks: &mut [bool]) -> usize {
        for mark in marks.iter_mut() {
            *mark = false;
        }
        self.mark_node(ROOT, marks);
        marks.iter().filter(|&&mark| mark).count()
    }

    fn mark_node(&self, node: usize, marks: &mut [bool]) -> bool {
        let n = &self.nodes[node];
        let mut used = false;
        if n.skip {
            return false;
        }
        if n.children.is_empty() {
            for (i, &cnt) in n.cnts.iter().enumerate() {
                if cnt >= self.supp {
                    marks[n.offset + i] = true;
                    used = true;
                }
            }
        } else {
            for j in 0..n.children.len() {
                if let Some(child) = n.children[j] {
                    used |= self.mark_node(child, marks);
                }
            }
        }
        if used && n.parent.is_some() {
            marks[n.id] = true;
        }
        used
    }

    /// Reduce the counters to maximal or closed sets.
    ///
    /// Every frequent counter at depth 2 or more clears the counters of
    /// all its one-smaller subsets: unconditionally for maximal sets,
    /// only at equal support for closed sets. A cleared counter falls
    /// below the minimum support and disappears from extraction, so no
    /// nodes need to be removed.
    pub fn filter(&mut self, mode: FilterMode) {
        let height = self.height();
        let mut buf = vec![0usize; height + 1];
        for level in 1..height {
            let mut cursor = Some(self.levels[level]);
            while let Some(np) = cursor {
                cursor = self.nodes[np].succ;
                for i in 0..self.nodes[np].cnts.len() {
                    let cnt = self.nodes[np].cnts[i];
                    if cnt < self.supp {
                        continue;
                    }
                    let keep = match mode {
                        FilterMode::Maximal => None,
                        FilterMode::Closed => Some(cnt),
                    };
                    let item = self.nodes[np].offset + i;
                    let id = self.nodes[np].id;
                    let parent = match self.nodes[np].parent {
                        Some(parent) => parent,
                        None => continue,
                    };
                    let blen = buf.len();
                    buf[blen - 1] = item;
                    self.clear_support(parent, &buf[blen - 1..], keep);
                    buf[blen - 2] = id;
                    self.clear_support(parent, &buf[blen - 2..blen - 1], keep);

                    let mut start = blen - 2;
                    let mut cur = parent;
                    while let Some(grand) = self.nodes[cur].parent {
                        self.clear_support(grand, &buf[start..], keep);
                        start -= 1;
                        buf[start] = self.nodes[cur].id;
                        cur = grand;
                    }
                }
            }
        }
    }
}
