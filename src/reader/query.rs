//! In-memory queries over fetched items.

use crate::content::ContentItem;

/// Items carrying `tag` exactly.
pub fn filter_by_tag<'a, I>(items: I, tag: &str) -> Vec<&'a ContentItem>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    items.into_iter().filter(|item| item.has_tag(tag)).collect()
}

/// Case-insensitive substring match on the title or any tag.
///
/// An empty term matches every item.
pub fn search<'a, I>(items: I, term: &str) -> Vec<&'a ContentItem>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    let term = term.to_lowercase();
    items
        .into_iter()
        .filter(|item| term.is_empty() || matches_term(item, &term))
        .collect()
}

fn matches_term(item: &ContentItem, term: &str) -> bool {
    item.title()
        .is_some_and(|title| title.to_lowercase().contains(term))
        || item
            .tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ContentItem> {
        [
            ("async", "title: Async Rust in Practice\ntags: [rust, concurrency]"),
            ("garden", "title: Notes from the Garden\ntags: [life]"),
            ("untitled", "tags: [Rustacean]"),
            ("bare", "summary: nothing to match"),
        ]
        .into_iter()
        .map(|(id, header)| {
            ContentItem::parse(id, &format!("---\n{header}\n---\n"))
                .unwrap()
                .0
        })
        .collect()
    }

    fn ids(found: Vec<&ContentItem>) -> Vec<&str> {
        found.into_iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn test_filter_by_tag_is_exact() {
        let items = items();
        assert_eq!(ids(filter_by_tag(&items, "rust")), vec!["async"]);
        assert!(filter_by_tag(&items, "Rust").is_empty());
        assert!(filter_by_tag(&items, "rus").is_empty());
    }

    #[test]
    fn test_search_title_and_tags() {
        let items = items();
        assert_eq!(ids(search(&items, "RUST")), vec!["async", "untitled"]);
        assert_eq!(ids(search(&items, "garden")), vec!["garden"]);
        assert_eq!(ids(search(&items, "concur")), vec!["async"]);
        assert!(search(&items, "nothing").is_empty());
    }

    #[test]
    fn test_filters_compose() {
        let items = items();
        let tagged = filter_by_tag(&items, "life");
        assert_eq!(ids(search(tagged, "garden")), vec!["garden"]);
        assert!(search(filter_by_tag(&items, "life"), "rust").is_empty());
    }

    #[test]
    fn test_search_empty_term_matches_all() {
        let items = items();
        assert_eq!(search(&items, "").len(), items.len());
    }
}
