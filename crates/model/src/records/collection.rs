use crate::records::batch::Batch;

/// Ordered set of named batches handed between pipeline steps.
///
/// Insertion order is preserved; re-inserting an existing name replaces the
/// batch in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchCollection {
    entries: Vec<(String, Batch)>,
}

impl BatchCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(name: impl Into<String>, batch: Batch) -> Self {
        let mut collection = Self::new();
        collection.insert(name, batch);
        collection
    }

    pub fn insert(&mut self, name: impl Into<String>, batch: Batch) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = batch,
            None => self.entries.push((name, batch)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Batch> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, batch)| batch)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the first batch in insertion order.
    pub fn take_first(&mut self) -> Option<(String, Batch)> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_replace() {
        let mut collection = BatchCollection::new();
        collection.insert("a", Batch::with_id("1", vec![]));
        collection.insert("b", Batch::with_id("2", vec![]));
        collection.insert("a", Batch::with_id("3", vec![]));

        assert_eq!(collection.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(collection.get("a").map(|b| b.id.as_str()), Some("3"));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_take_first() {
        let mut collection = BatchCollection::single("only", Batch::with_id("x", vec![]));
        let (name, batch) = collection.take_first().unwrap();
        assert_eq!(name, "only");
        assert_eq!(batch.id.as_str(), "x");
        assert!(collection.take_first().is_none());
    }
}
