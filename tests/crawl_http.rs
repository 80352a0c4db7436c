// End-to-end crawls through the real reqwest transport against a small HTTP
// server running on localhost.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use site_crawler::{crawl_website, write_results, CrawlConfig, Record, RetryPolicy};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

type RequestLog = Arc<Mutex<Vec<String>>>;

// Status line plus HTML body for one path
type Response = (&'static str, String);

fn ok(body: &str) -> Response {
    ("200 OK", body.to_string())
}

// Reads one request head off the stream and returns the requested path
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let request = String::from_utf8_lossy(&buf);
    request.split_whitespace().nth(1).unwrap_or("/").to_string()
}

// Serves `pages` (path -> status and HTML) and logs every requested path.
// Unknown paths get a 404 with an empty body.
async fn serve(pages: HashMap<&'static str, Response>) -> (SocketAddr, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let pages = Arc::new(pages);

    let log = Arc::clone(&requests);
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let pages = Arc::clone(&pages);
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let path = read_request(&mut stream).await;
                log.lock().unwrap().push(path.clone());

                let (status, body) = pages
                    .get(path.as_str())
                    .cloned()
                    .unwrap_or(("404 Not Found", String::new()));
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (addr, requests)
}

// Accepts connections, reads the request, then hangs up without answering.
// Returns the number of connections accepted so far.
async fn serve_hang_up() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                read_request(&mut stream).await;
                drop(stream);
            });
        }
    });

    (addr, accepted)
}

fn config(output_dir: &std::path::Path) -> CrawlConfig {
    CrawlConfig {
        depth_limit: 3,
        rate_limit: 2,
        retry: RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(10),
        },
        request_timeout: Duration::from_secs(5),
        output_dir: output_dir.to_path_buf(),
        ..CrawlConfig::default()
    }
}

#[tokio::test]
async fn test_crawl_local_site_and_export() {
    let mut pages = HashMap::new();
    pages.insert(
        "/",
        ok(r#"<html><head><title>홈페이지</title></head><body>
            <a href="/about">About</a>
            <a href="/about#team">Team</a>
            <a href="/blog/">Blog</a>
            <a href="/missing">Broken</a>
            <a href="http://elsewhere.invalid/">Elsewhere</a>
        </body></html>"#),
    );
    pages.insert(
        "/about",
        ok(r#"<title>About</title><meta property="og:image" content="https://cdn.invalid/about.png"><a href="/">Home</a>"#),
    );
    pages.insert(
        "/blog/",
        ok(r#"<title>Blog</title><img src="img/cover.png"><a href="post-1">First post</a>"#),
    );
    pages.insert(
        "/blog/post-1",
        ok(r#"<title>Post 1</title><a href="/deep">Too deep</a>"#),
    );
    pages.insert("/deep", ok("<title>Deep</title>"));

    let (addr, requests) = serve(pages).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let start = format!("http://{}/", addr);

    let report = crawl_website(&start, &config).await.unwrap();

    // Every reachable path once, nothing beyond depth 3, nothing off-site
    let requested = requests.lock().unwrap().clone();
    let unique: HashSet<&str> = requested.iter().map(String::as_str).collect();
    assert_eq!(requested.len(), unique.len(), "duplicate requests: {:?}", requested);
    assert_eq!(
        unique,
        HashSet::from(["/", "/about", "/blog/", "/missing", "/blog/post-1"])
    );

    let pages: HashMap<String, (String, Option<String>)> = report
        .records
        .iter()
        .filter_map(|r| match r {
            Record::Page(p) => Some((p.url.clone(), (p.title.clone(), p.image.clone()))),
            Record::Run(_) => None,
        })
        .collect();
    assert_eq!(pages.len(), 4);
    assert!(matches!(&report.records[0], Record::Run(meta) if meta.host == start));

    assert_eq!(pages[&start].0, "홈페이지");
    assert_eq!(
        pages[&format!("{}about", start)],
        ("About".to_string(), Some("https://cdn.invalid/about.png".to_string()))
    );
    assert_eq!(
        pages[&format!("{}blog/", start)].1,
        Some(format!("{}img/cover.png", start))
    );

    let path = write_results(&config.output_dir, &report.host, &report.records).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with(&format!("127_0_0_1:{}_", addr.port())), "{}", name);

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"title\": \"홈페이지\""));
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_error_status_page_with_body_is_recorded() {
    let mut pages = HashMap::new();
    pages.insert("/", ok(r#"<title>Home</title><a href="/gone">Old link</a>"#));
    pages.insert(
        "/gone",
        (
            "404 Not Found",
            r#"<title>Not Found Page</title><a href="/x">Somewhere else</a>"#.to_string(),
        ),
    );
    pages.insert(
        "/x",
        ("500 Internal Server Error", "<title>Broken</title>".to_string()),
    );

    let (addr, requests) = serve(pages).await;
    let dir = tempfile::tempdir().unwrap();
    let start = format!("http://{}/", addr);

    let report = crawl_website(&start, &config(dir.path())).await.unwrap();

    let titles: HashMap<String, String> = report
        .records
        .iter()
        .filter_map(|r| match r {
            Record::Page(p) => Some((p.url.clone(), p.title.clone())),
            Record::Run(_) => None,
        })
        .collect();
    assert_eq!(titles.len(), 3);
    assert_eq!(titles[&format!("{}gone", start)], "Not Found Page");
    assert_eq!(titles[&format!("{}x", start)], "Broken");

    let requested = requests.lock().unwrap().clone();
    assert_eq!(requested.iter().filter(|p| *p == "/x").count(), 1);
}

#[tokio::test]
async fn test_server_hanging_up_is_retried_then_abandoned() {
    let (addr, accepted) = serve_hang_up().await;
    let dir = tempfile::tempdir().unwrap();

    let report = crawl_website(&format!("http://{}/", addr), &config(dir.path()))
        .await
        .unwrap();

    assert_eq!(accepted.load(Ordering::SeqCst), 3);
    assert_eq!(report.records.len(), 1);
    assert!(matches!(report.records[0], Record::Run(_)));
}

#[tokio::test]
async fn test_unreachable_host_yields_only_metadata() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    // No trailing slash: the metadata keeps the host as typed
    let start = format!("http://{}", addr);
    let dir = tempfile::tempdir().unwrap();
    let report = crawl_website(&start, &config(dir.path())).await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert!(matches!(&report.records[0], Record::Run(meta) if meta.host == start));
    assert_eq!(report.summary.pages, 0);
    assert_eq!(report.host.as_str(), format!("{}/", start));
}
