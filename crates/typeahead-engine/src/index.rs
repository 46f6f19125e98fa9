//! Category index: category name to catalog slots.
//!
//! Every item is filed under its own category and, when it has a distinct
//! one, under its parent category too. Buckets keep catalog order.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};

use typeahead_core::types::Item;

#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    buckets: HashMap<String, Vec<usize>>,
}

impl CategoryIndex {
    pub fn build<T: Borrow<Item>>(items: &[T]) -> Self {
        let mut index = Self::default();
        for (slot, item) in items.iter().enumerate() {
            let item: &Item = item.borrow();
            index.insert(slot, item);
        }
        tracing::debug!(items = items.len(), categories = index.buckets.len(), "category index built");
        index
    }

    /// File `item` (stored at `slot`) under its category and parent.
    /// An empty parent name counts as no parent.
    pub fn insert(&mut self, slot: usize, item: &Item) {
        self.buckets.entry(item.category.clone()).or_default().push(slot);
        if let Some(parent) = item.parent_category.as_deref().filter(|p| !p.is_empty() && *p != item.category) {
            self.buckets.entry(parent.to_string()).or_default().push(slot);
        }
    }

    /// Slots filed under `category`; empty for unknown names.
    pub fn get(&self, category: &str) -> &[usize] {
        self.buckets.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Items of `category` itself plus items whose parent is `category`,
    /// each once, in bucket order.
    pub fn with_sub_categories<T: Borrow<Item>>(&self, category: &str, items: &[T]) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.get(category)
            .iter()
            .copied()
            .filter(|&slot| {
                let item: &Item = items[slot].borrow();
                (item.category == category || item.parent_category.as_deref() == Some(category))
                    && seen.insert(item.id.as_str())
            })
            .collect()
    }

    /// Buckets of every listed category concatenated in the given order,
    /// keeping the first occurrence of each item id.
    pub fn union_of<T: Borrow<Item>, S: AsRef<str>>(&self, categories: &[S], items: &[T]) -> Vec<usize> {
        let mut seen = HashSet::new();
        categories
            .iter()
            .flat_map(|category| self.get(category.as_ref()).iter().copied())
            .filter(|&slot| {
                let item: &Item = items[slot].borrow();
                seen.insert(item.id.as_str())
            })
            .collect()
    }

    /// Category names with bucket sizes, largest first, then by name.
    pub fn categories(&self) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = self.buckets.iter().map(|(name, slots)| (name.as_str(), slots.len())).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        out
    }

    pub fn len(&self) -> usize { self.buckets.len() }

    pub fn is_empty(&self) -> bool { self.buckets.is_empty() }
}
