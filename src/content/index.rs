//! The two derived artifacts: the sorted content index and the tag set.

use super::{date::PublishDate, item::ContentItem};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Compare two items for the index order (newest first).
///
/// - Items with a valid date come before items without one
/// - Equal dates, and undated items, are ordered by id
fn compare_newest_first(a: &ContentItem, b: &ContentItem) -> Ordering {
    compare_dates(a.date(), b.date()).then_with(|| a.id.cmp(&b.id))
}

fn compare_dates(a: Option<PublishDate>, b: Option<PublishDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Content items sorted by date, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentIndex {
    items: Vec<ContentItem>,
}

impl ContentIndex {
    /// Build the index, sorting `items` into index order.
    pub fn new(mut items: Vec<ContentItem>) -> Self {
        items.sort_by(compare_newest_first);
        Self { items }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ContentItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Union of all tags, in order of first appearance.
    pub fn tags(&self) -> TagSet {
        TagSet::from_items(&self.items)
    }

    /// Compact JSON, stable across runs for the same input.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Unique tag strings across the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn from_items(items: &[ContentItem]) -> Self {
        let mut seen = FxHashSet::default();
        let tags = items
            .iter()
            .flat_map(ContentItem::tags)
            .filter(|tag| seen.insert(tag.clone()))
            .collect();
        Self(tags)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, header: &str) -> ContentItem {
        ContentItem::parse(id, &format!("---\n{header}\n---\nbody of {id}"))
            .unwrap()
            .0
    }

    fn ids(index: &ContentIndex) -> Vec<&str> {
        index.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_sorted_newest_first() {
        let index = ContentIndex::new(vec![
            post("a", "title: Alpha\ndate: 2024-01-10\ntags: [x, y]"),
            post("b", "title: Beta\ndate: 2024-03-01\ntags: [y, z]"),
            post("c", "date: 2023-12-31T23:59:59Z"),
        ]);

        assert_eq!(ids(&index), vec!["b", "a", "c"]);
        for pair in index.items().windows(2) {
            assert!(pair[0].date() >= pair[1].date());
        }
    }

    #[test]
    fn test_undated_sort_last_by_id() {
        let index = ContentIndex::new(vec![
            post("zeta", "title: no date"),
            post("old", "date: 2001-01-01"),
            post("alpha", "date: not-a-date"),
            post("new", "date: 2030-06-01"),
        ]);

        assert_eq!(ids(&index), vec!["new", "old", "alpha", "zeta"]);
    }

    #[test]
    fn test_equal_dates_tie_break_by_id() {
        let index = ContentIndex::new(vec![
            post("b", "date: 2024-01-01"),
            post("a", "date: 2024-01-01"),
        ]);

        assert_eq!(ids(&index), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_independent_of_input_order() {
        let items = vec![
            post("a", "date: 2024-01-10"),
            post("b", "date: 2024-03-01"),
            post("c", "title: undated"),
        ];
        let mut reversed = items.clone();
        reversed.reverse();

        assert_eq!(ContentIndex::new(items), ContentIndex::new(reversed));
    }

    #[test]
    fn test_tags_deduplicated() {
        let index = ContentIndex::new(vec![
            post("a", "date: 2024-01-10\ntags: [x, y]"),
            post("b", "date: 2024-03-01\ntags: [y, z]"),
            post("c", "title: untagged"),
        ]);
        let tags = index.tags();

        // first appearance in index order: b (y, z) then a (x)
        assert_eq!(tags.as_slice(), ["y", "z", "x"]);
        assert_eq!(tags.len(), 3);
        assert!(tags.contains("x"));
        assert!(!tags.contains("w"));
    }

    #[test]
    fn test_tags_empty() {
        let index = ContentIndex::new(vec![post("a", "title: t")]);
        assert!(index.tags().is_empty());
        assert_eq!(index.tags().to_json().unwrap(), "[]");
    }

    #[test]
    fn test_get() {
        let index = ContentIndex::new(vec![post("a", "title: A"), post("b", "title: B")]);
        assert_eq!(index.get("b").and_then(ContentItem::title), Some("B"));
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_to_json_shape() {
        let index = ContentIndex::new(vec![
            post("a", "title: Alpha\ndate: 2024-01-10"),
            post("b", "title: Beta\ndate: 2024-03-01"),
        ]);

        assert_eq!(
            index.to_json().unwrap(),
            concat!(
                r#"[{"id":"b","date":"2024-03-01","title":"Beta","content":"body of b"},"#,
                r#"{"id":"a","date":"2024-01-10","title":"Alpha","content":"body of a"}]"#
            )
        );
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let index = ContentIndex::new(vec![
            post("a", "date: 2024-01-10"),
            post("b", "date: 2024-03-01"),
        ]);
        let parsed: ContentIndex = serde_json::from_str(&index.to_json().unwrap()).unwrap();
        assert_eq!(parsed, index);
    }
}
