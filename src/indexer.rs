//! Build-time indexing of the content directory.
//!
//! # Pipeline
//!
//! ```text
//! run()
//!     │
//!     ├── collect()
//!     │       ├── enumerate `*.{extension}` (non-recursive, by file name)
//!     │       ├── ContentItem::parse per file
//!     │       │       └── failures → Diagnostic (file skipped, run continues)
//!     │       └── ContentIndex::new (date descending)
//!     │
//!     ├── render index + tags + render_rss() (optional)
//!     └── publish()
//!             ├── stage each artifact as a hidden temp file
//!             └── rename every temp file over its artifact
//! ```
//!
//! Nothing is written unless at least one item parsed and every artifact
//! rendered. Readers only ever see a complete previous or complete new
//! artifact. A run over the same directory always produces byte-identical
//! artifacts.

use crate::{
    config::SiteConfig,
    content::{ContentIndex, ContentItem, ParseError},
    generator::rss::render_rss,
    log,
};
use anyhow::{Context, Result};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

/// Operator-facing problems with the content directory itself.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(
        "content directory `{0}` did not exist and has been created; add some .{1} files to it and run again"
    )]
    MissingDirectory(PathBuf, String),

    #[error("no .{1} files to index in `{0}`; add some and run again")]
    NoContent(PathBuf, String),

    #[error("failed to create content directory `{0}`")]
    CreateDirectory(PathBuf, #[source] std::io::Error),

    #[error("failed to scan content directory `{0}`")]
    Scan(PathBuf, #[source] walkdir::Error),
}

impl ConfigurationError {
    /// Whether the CLI should exit with a failure status.
    ///
    /// A missing directory has already been fixed by creating it; the
    /// operator only has to add content and run again.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::MissingDirectory(..))
    }
}

/// A per-file problem found while indexing.
#[derive(Debug)]
pub enum Diagnostic {
    /// The file was left out of the index.
    Skipped { path: PathBuf, error: ParseError },
    /// The file was indexed, but something in it looks wrong.
    Warning { path: PathBuf, message: String },
}

impl Diagnostic {
    pub fn path(&self) -> &Path {
        match self {
            Self::Skipped { path, .. } | Self::Warning { path, .. } => path,
        }
    }

    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped { path, error } => {
                write!(f, "{}: skipped, {error}", path.display())?;
                if let ParseError::Io(source) = error {
                    write!(f, " ({source})")?;
                }
                Ok(())
            }
            Self::Warning { path, message } => write!(f, "{}: {message}", path.display()),
        }
    }
}

/// Parsed content of one directory scan.
#[derive(Debug, Default)]
pub struct Collection {
    /// Number of files with the content extension.
    pub eligible: usize,
    pub index: ContentIndex,
    pub diagnostics: Vec<Diagnostic>,
}

/// What a successful run produced.
#[derive(Debug)]
pub struct IndexReport {
    pub items: usize,
    pub tags: usize,
    pub index_path: PathBuf,
    pub tags_path: PathBuf,
    pub rss_path: Option<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl IndexReport {
    pub fn skipped(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_skipped()).count()
    }
}

/// Scan `dir` for `*.{extension}` files and parse them into an index.
///
/// A missing directory is created empty and reported as
/// [`ConfigurationError::MissingDirectory`]. Files that fail to parse are
/// skipped and recorded in [`Collection::diagnostics`].
pub fn collect(dir: &Path, extension: &str) -> Result<Collection, ConfigurationError> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|err| ConfigurationError::CreateDirectory(dir.to_path_buf(), err))?;
        return Err(ConfigurationError::MissingDirectory(
            dir.to_path_buf(),
            extension.to_owned(),
        ));
    }

    let files = eligible_files(dir, extension)?;
    if files.is_empty() {
        return Err(ConfigurationError::NoContent(
            dir.to_path_buf(),
            extension.to_owned(),
        ));
    }

    let mut items = Vec::with_capacity(files.len());
    let mut diagnostics = Vec::new();

    for path in &files {
        match parse_file(path) {
            Ok((item, warnings)) => {
                diagnostics.extend(warnings.into_iter().map(|message| Diagnostic::Warning {
                    path: path.clone(),
                    message,
                }));
                items.push(item);
            }
            Err(error) => diagnostics.push(Diagnostic::Skipped {
                path: path.clone(),
                error,
            }),
        }
    }

    Ok(Collection {
        eligible: files.len(),
        index: ContentIndex::new(items),
        diagnostics,
    })
}

/// Files directly inside `dir` whose extension is `extension`, by file name.
fn eligible_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ConfigurationError> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => {
                let is_match = entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == extension);
                is_match.then(|| Ok(entry.into_path()))
            }
            Err(err) => Some(Err(ConfigurationError::Scan(dir.to_path_buf(), err))),
        })
        .collect()
}

fn parse_file(path: &Path) -> Result<(ContentItem, Vec<String>), ParseError> {
    let text = fs::read_to_string(path)?;
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    ContentItem::parse(id, &text)
}

/// An artifact written to a temp file next to its destination.
///
/// The temp file is removed on drop unless it was renamed into place.
struct Staged {
    tmp: PathBuf,
    dest: PathBuf,
}

impl Staged {
    fn write(dest: &Path, contents: &str) -> Result<Self> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let name = dest.file_name().unwrap_or_default().to_string_lossy();
        let staged = Self {
            tmp: dest.with_file_name(format!(".{name}.{}.tmp", std::process::id())),
            dest: dest.to_path_buf(),
        };
        fs::write(&staged.tmp, contents)
            .with_context(|| format!("Failed to write {}", staged.tmp.display()))?;
        Ok(staged)
    }

    fn commit(&self) -> Result<()> {
        fs::rename(&self.tmp, &self.dest)
            .with_context(|| format!("Failed to replace {}", self.dest.display()))
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if self.tmp.exists() {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

/// Replace every artifact in `artifacts` with its new contents.
///
/// All contents are staged before the first rename, so a failed write
/// leaves every existing artifact untouched.
fn publish(artifacts: &[(&Path, &str)]) -> Result<()> {
    let staged = artifacts
        .iter()
        .map(|(path, contents)| Staged::write(path, contents))
        .collect::<Result<Vec<_>>>()?;

    staged.iter().try_for_each(Staged::commit)
}

/// Run the indexer for `config`: scan, parse, sort, and write the artifacts.
pub fn run(config: &SiteConfig) -> Result<IndexReport> {
    let build = &config.build;
    let collection = collect(&build.content, &build.extension)?;

    for diagnostic in &collection.diagnostics {
        log!("warn"; "{diagnostic}");
    }

    if collection.index.is_empty() {
        anyhow::bail!(ConfigurationError::NoContent(
            build.content.clone(),
            build.extension.clone()
        ));
    }

    let tags = collection.index.tags();
    let index_json = collection
        .index
        .to_json()
        .context("Failed to serialize content index")?;
    let tags_json = tags.to_json().context("Failed to serialize tag set")?;

    let rss_xml = render_rss(config, &collection.index)?;

    let index_path = config.index_path();
    let tags_path = config.tags_path();
    let rss_path = rss_xml.as_ref().map(|_| config.rss_path());

    let mut artifacts = vec![
        (index_path.as_path(), index_json.as_str()),
        (tags_path.as_path(), tags_json.as_str()),
    ];
    if let (Some(path), Some(xml)) = (&rss_path, &rss_xml) {
        artifacts.push((path.as_path(), xml.as_str()));
    }
    publish(&artifacts)?;

    if let Some(path) = &rss_path {
        log!("rss"; "{}", path.file_name().unwrap_or_default().to_string_lossy());
    }

    let report = IndexReport {
        items: collection.index.len(),
        tags: tags.len(),
        index_path,
        tags_path,
        rss_path,
        diagnostics: collection.diagnostics,
    };

    match report.skipped() {
        0 => log!("index"; "indexed {} posts, {} tags", report.items, report.tags),
        skipped => log!("index"; "indexed {} posts, {} tags ({} skipped)", report.items, report.tags, skipped),
    }

    Ok(report)
}
