//! Folio - content indexing and retrieval for a markdown portfolio blog.
//!
//! The indexer turns a directory of front-matter markdown files into two JSON
//! artifacts (a date-sorted content index and a tag set); the reader fetches
//! them back from a directory or a static host.

pub mod cli;
pub mod config;
pub mod content;
pub mod generator;
pub mod indexer;
pub mod init;
pub mod logger;
pub mod reader;
pub mod serve;
pub mod watch;
