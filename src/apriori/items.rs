use std::collections::HashMap;
use std::io::BufRead;

use super::error::MinerError;
use super::tatree::TransactionSet;

/// Catalog of item symbols.
///
/// Interns raw tokens to dense ids and tracks per-item frequencies
/// (occurrences per record). `recode` filters and reorders the catalog so
/// that ids are assigned by decreasing frequency, which keeps the busiest
/// counters near the front of every counter vector in the item set tree.
#[derive(Debug, Default)]
pub struct ItemCatalog {
    ids: HashMap<String, usize>,
    names: Vec<String>,
    frqs: Vec<usize>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: usize) -> &str {
        &self.names[id]
    }

    pub fn frq(&self, id: usize) -> usize {
        self.frqs[id]
    }

    /// Intern a token, returning its id. Does not touch frequencies.
    pub fn intern(&mut self, token: &str) -> usize {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = self.names.len();
        self.ids.insert(token.to_string(), id);
        self.names.push(token.to_string());
        self.frqs.push(0);
        id
    }

    pub fn add_occurrence(&mut self, id: usize) {
        self.frqs[id] += 1;
    }

    /// Drop items below `supp` and renumber the rest by decreasing
    /// frequency, ties broken by first appearance. Returns the old-id to
    /// new-id map; dropped items map to `None`.
    pub fn recode(&mut self, supp: usize) -> Vec<Option<usize>> {
        let mut order: Vec<usize> = (0..self.names.len())
            .filter(|&id| self.frqs[id] >= supp)
            .collect();
        order.sort_by(|&a, &b| self.frqs[b].cmp(&self.frqs[a]).then(a.cmp(&b)));

        let mut map = vec![None; self.names.len()];
        let mut names = Vec::with_capacity(order.len());
        let mut frqs = Vec::with_capacity(order.len());
        for (new_id, &old_id) in order.iter().enumerate() {
            map[old_id] = Some(new_id);
            names.push(std::mem::take(&mut self.names[old_id]));
            frqs.push(self.frqs[old_id]);
        }
        self.ids = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();
        self.names = names;
        self.frqs = frqs;
        map
    }
}

/// Read one transaction per line into `taset`, interning tokens into
/// `catalog` and counting one occurrence per record.
///
/// Fields are whitespace separated; a field may itself hold a
/// comma-separated item list. An empty piece between commas is a
/// malformed record, as is an item repeated within one record. `path` is
/// only used to label errors.
pub fn read_transactions<R: BufRead>(
    reader: R,
    path: &str,
    catalog: &mut ItemCatalog,
    taset: &mut TransactionSet,
) -> Result<(), MinerError> {
    for (record, line) in reader.lines().enumerate() {
        let record = record + 1;
        let line = line.map_err(|source| MinerError::FileRead {
            path: path.to_string(),
            source,
        })?;
        let mut tract = Vec::new();
        for field in line.split_whitespace() {
            for token in field.split(',') {
                if token.is_empty() {
                    return Err(MinerError::ItemExpected {
                        path: path.to_string(),
                        record,
                    });
                }
                let id = catalog.intern(token);
                if tract.contains(&id) {
                    return Err(MinerError::DuplicateItem {
                        path: path.to_string(),
                        record,
                        item: token.to_string(),
                    });
                }
                catalog.add_occurrence(id);
                tract.push(id);
            }
        }
        taset.add(tract);
    }
    Ok(())
}
