use std::collections::BTreeSet;

use blake3::Hash;

/// Remembers the last painted content of every screen row so the renderer
/// only rewrites rows whose content hash changed.
#[derive(Debug, Default)]
pub struct RowRegistry {
    hashes: Vec<Option<Hash>>,
    dirty: BTreeSet<usize>,
}

impl RowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything, e.g. after the terminal was resized or cleared.
    pub fn invalidate(&mut self) {
        self.hashes.clear();
        self.dirty.clear();
    }

    /// Record a freshly composed frame and return the rows that need painting.
    pub fn sync_rows(&mut self, rows: &[String]) -> Vec<(usize, String)> {
        if self.hashes.len() != rows.len() {
            self.hashes.resize(rows.len(), None);
        }

        for (idx, row) in rows.iter().enumerate() {
            let new_hash = blake3::hash(row.as_bytes());
            if self.hashes[idx].map(|h| h != new_hash).unwrap_or(true) {
                self.hashes[idx] = Some(new_hash);
                self.dirty.insert(idx);
            }
        }

        let dirty: Vec<usize> = std::mem::take(&mut self.dirty).into_iter().collect();
        dirty
            .into_iter()
            .filter_map(|idx| rows.get(idx).map(|row| (idx, row.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|row| row.to_string()).collect()
    }

    #[test]
    fn first_sync_marks_every_row_dirty() {
        let mut registry = RowRegistry::new();
        let dirty = registry.sync_rows(&frame(&["a", "b"]));
        assert_eq!(dirty.len(), 2);
    }

    #[test]
    fn unchanged_rows_are_skipped() {
        let mut registry = RowRegistry::new();
        registry.sync_rows(&frame(&["a", "b", "c"]));
        let dirty = registry.sync_rows(&frame(&["a", "B", "c"]));
        assert_eq!(dirty, vec![(1, "B".to_string())]);
        assert!(registry.sync_rows(&frame(&["a", "B", "c"])).is_empty());
    }

    #[test]
    fn invalidate_forces_full_repaint() {
        let mut registry = RowRegistry::new();
        registry.sync_rows(&frame(&["a", "b"]));
        registry.invalidate();
        assert_eq!(
            registry.sync_rows(&frame(&["a", "b"])),
            vec![(0, "a".to_string()), (1, "b".to_string())]
        );
    }
}
