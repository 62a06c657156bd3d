/// Locations searched during this session, oldest first.
///
/// Append-only and unbounded; nothing is written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, location: impl Into<String>) {
        self.entries.push(location.into());
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_duplicates() {
        let mut history = SearchHistory::new();
        history.push("Paris,FR");
        history.push("Oslo");
        history.push("Paris,FR");

        assert_eq!(history.len(), 3);
        assert_eq!(history.entries(), ["Paris,FR", "Oslo", "Paris,FR"]);
        assert_eq!(history.get(1), Some("Oslo"));
        assert_eq!(history.get(3), None);
    }
}
