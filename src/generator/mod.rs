//! Optional artifacts derived from the content index.

pub mod rss;
