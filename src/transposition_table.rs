use log::debug;

/// How a stored score relates to the true minimax value of its node
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Bound {
    Exact,
    /// the node failed high, the true value is at least the score
    Lower,
    /// the node failed low, the true value is at most the score
    Upper,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Entry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
}

/// The default number of slots, a prime to spread keys evenly
pub const DEFAULT_CAPACITY: usize = (1 << 20) + 7;

/// A fixed-size, direct-mapped cache of search results.
///
/// A new key evicts whatever occupied its slot. An entry for the same key is
/// only overwritten by a search at least as deep.
#[derive(Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<Entry>>,
    len: usize,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: vec![None; capacity.max(1)],
            len: 0,
        }
    }

    pub fn set(&mut self, entry: Entry) {
        let i = self.index(entry.key);
        match self.entries[i] {
            Some(existing) if existing.key == entry.key && existing.depth > entry.depth => return,
            Some(_) => {}
            None => self.len += 1,
        }
        self.entries[i] = Some(entry);
    }

    pub fn get(&self, key: u64) -> Option<Entry> {
        match self.entries[self.index(key)] {
            Some(entry) if entry.key == key => Some(entry),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        debug!("clearing transposition table ({} entries)", self.len);
        self.entries.iter_mut().for_each(|entry| *entry = None);
        self.len = 0;
    }

    /// The number of occupied slots
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: u64, depth: u8, score: i32) -> Entry {
        Entry {
            key,
            depth,
            score,
            bound: Bound::Exact,
        }
    }

    #[test]
    fn deeper_entries_are_kept() {
        let mut table = TranspositionTable::with_capacity(17);
        table.set(entry(5, 4, 10));
        table.set(entry(5, 2, -3));
        assert_eq!(table.get(5), Some(entry(5, 4, 10)));

        table.set(entry(5, 6, 7));
        assert_eq!(table.get(5), Some(entry(5, 6, 7)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn colliding_keys_evict() {
        let mut table = TranspositionTable::with_capacity(17);
        table.set(entry(3, 9, 1));
        table.set(entry(3 + 17, 1, 2));
        assert_eq!(table.get(3), None);
        assert_eq!(table.get(20), Some(entry(20, 1, 2)));
    }

    #[test]
    fn clear_empties_the_table() {
        let mut table = TranspositionTable::with_capacity(8);
        table.set(entry(1, 1, 1));
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.get(1), None);
        assert_eq!(table.capacity(), 8);
    }
}
