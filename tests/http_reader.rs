//! Index a site, serve its output with the preview server, read it back.

use folio::{
    config::SiteConfig,
    indexer,
    reader::{ContentReader, DirSource, FetchError, HttpSource, Source},
    serve::{handle_request, try_bind_port},
};
use std::{
    fs,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
    thread::JoinHandle,
    time::Duration,
};
use tempfile::TempDir;
use tiny_http::Server;

const TIMEOUT: Duration = Duration::from_secs(5);

struct TestServer {
    server: Arc<Server>,
    addr: SocketAddr,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start(root: PathBuf) -> Self {
        let (server, addr) = try_bind_port(IpAddr::from([127, 0, 0, 1]), 0, 1).unwrap();
        let server = Arc::new(server);

        let worker = Arc::clone(&server);
        let handle = std::thread::spawn(move || {
            for request in worker.incoming_requests() {
                handle_request(request, &root).ok();
            }
        });

        Self {
            server,
            addr,
            handle: Some(handle),
        }
    }

    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

fn indexed_site() -> (TempDir, SiteConfig) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SiteConfig::default();
    config.build.content = dir.path().join("public/posts");
    config.build.output = dir.path().join("public");

    fs::create_dir_all(&config.build.content).unwrap();
    fs::write(
        config.build.content.join("a.md"),
        "---\ntitle: \"Alpha\"\ndate: 2024-01-10\ntags: [x, y]\n---\nAlpha body\n",
    )
    .unwrap();
    fs::write(
        config.build.content.join("b.md"),
        "---\ntitle: \"Beta\"\ndate: 2024-03-01\ntags: [y, z]\n---\nBeta body\n",
    )
    .unwrap();

    indexer::run(&config).unwrap();
    (dir, config)
}

#[test]
fn http_reader_matches_dir_reader() {
    let (_dir, config) = indexed_site();
    let server = TestServer::start(config.build.output.clone());

    let over_http = ContentReader::new(HttpSource::new(&server.base_url(), TIMEOUT).unwrap());
    let from_dir = ContentReader::new(DirSource::new(&config.build.output));

    let http_items = over_http.fetch_all().unwrap();
    assert_eq!(http_items, from_dir.fetch_all().unwrap());
    assert_eq!(http_items[0].id, "b");
    assert_eq!(http_items[1].id, "a");

    assert_eq!(over_http.fetch_tags().unwrap(), from_dir.fetch_tags().unwrap());

    let alpha = over_http.fetch_by_id("a").unwrap().unwrap();
    assert_eq!(alpha.title(), Some("Alpha"));
    assert_eq!(alpha.body, "Alpha body\n");
    assert_eq!(over_http.fetch_by_id("nope").unwrap(), None);

    let overview = over_http.fetch_overview().unwrap();
    assert_eq!(overview.items.len(), 2);
    assert_eq!(overview.tags.len(), 3);
}

#[test]
fn http_reader_through_config() {
    let (_dir, mut config) = indexed_site();
    let server = TestServer::start(config.build.output.clone());
    config.reader.source = Some(server.base_url());

    let reader = ContentReader::from_config(&config).unwrap();
    assert!(matches!(reader.source(), Source::Http(_)));
    assert_eq!(reader.fetch_all().unwrap().len(), 2);
}

#[test]
fn http_reader_missing_artifact_is_status_error() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(dir.path().to_path_buf());

    let reader = ContentReader::new(HttpSource::new(&server.base_url(), TIMEOUT).unwrap());
    match reader.fetch_tags() {
        Err(FetchError::Status { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/tags.json"));
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[test]
fn http_reader_reflects_reindex() {
    let (_dir, config) = indexed_site();
    let server = TestServer::start(config.build.output.clone());
    let reader = ContentReader::new(HttpSource::new(&server.base_url(), TIMEOUT).unwrap());
    assert_eq!(reader.fetch_all().unwrap().len(), 2);

    fs::write(
        config.build.content.join("c.md"),
        "---\ntitle: Gamma\ndate: 2024-05-05\ntags: [w]\n---\n",
    )
    .unwrap();
    indexer::run(&config).unwrap();

    let items = reader.fetch_all().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, "c");
    assert!(reader.fetch_tags().unwrap().contains(&"w".to_string()));
}
