use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use super::loader::{load_file, LoadOptions};
use super::model::Table;

/// Memoizes loaded tables for the lifetime of the process.
///
/// Tables are treated as static once read: there is no invalidation, and a
/// failed load is not remembered so it can be retried.
#[derive(Default)]
pub struct TableCache {
    tables: HashMap<LoadOptions, Arc<Table>>,
    loads: usize,
}

impl TableCache {
    /// Return the cached table for `options`, reading the file on first use.
    pub fn get_or_load(&mut self, options: &LoadOptions) -> Result<Arc<Table>> {
        if let Some(table) = self.tables.get(options) {
            log::debug!("Cache hit for {}", options.path.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load_file(options)?);
        self.loads += 1;
        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            table.len(),
            table.column_names().collect::<Vec<_>>(),
            options.path.display()
        );
        self.tables.insert(options.clone(), Arc::clone(&table));
        Ok(table)
    }

    /// Number of files actually read so far.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn second_load_reuses_the_first_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Country_Region,Survival_Years\nA,1.5\nB,2.5").unwrap();
        drop(file);

        let mut cache = TableCache::default();
        let options = LoadOptions::new(&path);
        let first = cache.get_or_load(&options).unwrap();

        // The file is gone; only the memoized copy can answer now.
        std::fs::remove_file(&path).unwrap();
        let second = cache.get_or_load(&options).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
        assert_eq!(
            second.column_names().collect::<Vec<_>>(),
            vec!["Country_Region", "Survival_Years"]
        );
        assert_eq!(cache.loads(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let options = LoadOptions::new(&path);
        let mut cache = TableCache::default();

        assert!(cache.get_or_load(&options).is_err());
        assert_eq!(cache.loads(), 0);

        std::fs::write(&path, "a\n1\n").unwrap();
        assert_eq!(cache.get_or_load(&options).unwrap().len(), 1);
        assert_eq!(cache.loads(), 1);
    }

    #[test]
    fn different_options_are_different_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "skip me\na\n1\n").unwrap();

        let mut cache = TableCache::default();
        let plain = cache.get_or_load(&LoadOptions::new(&path)).unwrap();
        let skipped = cache
            .get_or_load(&LoadOptions {
                skip_rows: 1,
                ..LoadOptions::new(&path)
            })
            .unwrap();

        assert_eq!(plain.column_names().collect::<Vec<_>>(), vec!["skip me"]);
        assert_eq!(skipped.column_names().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(cache.loads(), 2);
    }
}
