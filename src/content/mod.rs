//! Content model shared by the indexer and the reader.
//!
//! ```text
//! posts/*.md ──► frontmatter::split ──► ContentItem ──► ContentIndex ──► posts-index.json
//!                                                            │
//!                                                            └──► TagSet ──► tags.json
//! ```

pub mod date;
pub mod frontmatter;
pub mod index;
pub mod item;

pub use date::PublishDate;
pub use frontmatter::ParseError;
pub use index::{ContentIndex, TagSet};
pub use item::ContentItem;
