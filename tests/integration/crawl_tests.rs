//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small board and run full crawls
//! through the HTTP fetcher, the checkpoint file and the CSV sink.

use ptt_camera_crawler::config::{BoardConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use ptt_camera_crawler::crawler::Coordinator;
use ptt_camera_crawler::storage::{CheckpointStore, FileCheckpoint};
use ptt_camera_crawler::CrawlerError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for a board served at `host`
fn create_test_config(host: &str, pages: u32, dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            pages,
            max_concurrent_posts: 2,
        },
        board: BoardConfig {
            host: host.to_string(),
            name: "photo-buy".to_string(),
            start_page: "index5.html".to_string(),
            source: "ptt".to_string(),
            sale_marker: "出售".to_string(),
            reply_marker: "Re:".to_string(),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            records_dir: dir.join("records").to_string_lossy().into_owned(),
            checkpoint_path: dir.join("cache").to_string_lossy().into_owned(),
        },
    }
}

fn listing_html(posts: &[&str], next_page: Option<u32>) -> String {
    let rows: String = posts
        .iter()
        .map(|id| {
            format!(
                r#"<div class="r-ent"><div class="title"><a href="/bbs/photo-buy/{id}.html">post {id}</a></div></div>"#
            )
        })
        .collect();
    let older = match next_page {
        Some(n) => format!(r#"<a class="btn wide" href="/bbs/photo-buy/index{n}.html">‹ 上頁</a>"#),
        None => r#"<a class="btn wide disabled">‹ 上頁</a>"#.to_string(),
    };

    format!(
        r#"<html><head><title>看板 photo-buy</title></head><body>
<div id="action-bar-container"><div class="action-bar"><div class="btn-group btn-group-paging">
<a class="btn wide" href="/bbs/photo-buy/index1.html">最舊</a>
{older}
<a class="btn wide" href="/bbs/photo-buy/index.html">最新</a>
</div></div></div>
<div class="r-list-container">
{rows}
<div class="r-ent"><div class="title">(本文已被刪除)</div></div>
</div></body></html>"#
    )
}

fn post_html(title: &str, body: &str) -> String {
    format!(
        r#"<html><body><div id="main-content" class="bbs-screen bbs-content">
<div class="article-metaline"><span class="article-meta-tag">作者</span><span class="article-meta-value">lensfan (鏡頭迷)</span></div>
<div class="article-metaline-right"><span class="article-meta-tag">看板</span><span class="article-meta-value">photo-buy</span></div>
<div class="article-metaline"><span class="article-meta-tag">標題</span><span class="article-meta-value">{title}</span></div>
<div class="article-metaline"><span class="article-meta-tag">時間</span><span class="article-meta-value">Tue Mar 15 21:43:12 2016</span></div>
{body}
--
<span class="f2">※ 發信站: 批踢踢實業坊(ptt.cc)</span>
</div></body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Page 5 holds a valid offer, a reply and a zero-price post
async fn mount_board(server: &MockServer) {
    mount_page(server, "/bbs/photo-buy/index5.html", listing_html(&["A", "B", "C"], Some(4))).await;
    mount_page(server, "/bbs/photo-buy/index4.html", listing_html(&["D"], Some(3))).await;
    mount_page(server, "/bbs/photo-buy/A.html", post_html("[出售] Nikon FM2 黑機", "售價 1500 元 面交")).await;
    mount_page(server, "/bbs/photo-buy/B.html", post_html("Re: [出售] Nikon FM2 黑機", "1500 還在嗎")).await;
    mount_page(server, "/bbs/photo-buy/C.html", post_html("[出售] Nikon F3", "售價 000")).await;
    mount_page(server, "/bbs/photo-buy/D.html", post_html("[出售］ Contax T2", "18000 含運")).await;
}

#[tokio::test]
async fn test_crawl_writes_only_valid_offers() {
    let server = MockServer::start().await;
    mount_board(&server).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 1, dir.path());

    let mut coordinator = Coordinator::new(&config, false).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    let content = std::fs::read_to_string(dir.path().join("records/5.csv")).unwrap();
    let expected = format!(
        "Nikon FM2 黑機,1500,ptt,lensfan,2016-03-15 21:43:12,{}/bbs/photo-buy/A.html\n",
        server.uri()
    );
    assert_eq!(content, expected);
    assert_eq!(stats.records_saved, 1);
    assert_eq!(stats.total_skipped(), 2);

    let checkpoint = FileCheckpoint::new(dir.path().join("cache"));
    assert_eq!(
        checkpoint.read().unwrap(),
        Some(format!("{}/bbs/photo-buy/index4.html", server.uri()))
    );
}

#[tokio::test]
async fn test_second_run_resumes_at_checkpoint() {
    let server = MockServer::start().await;
    mount_board(&server).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 1, dir.path());

    Coordinator::new(&config, false).unwrap().run().await.unwrap();
    Coordinator::new(&config, false).unwrap().run().await.unwrap();

    let page4 = std::fs::read_to_string(dir.path().join("records/4.csv")).unwrap();
    assert!(page4.starts_with("Contax T2,18000,ptt,lensfan,"));

    let checkpoint = FileCheckpoint::new(dir.path().join("cache"));
    assert_eq!(
        checkpoint.read().unwrap(),
        Some(format!("{}/bbs/photo-buy/index3.html", server.uri()))
    );
}

#[tokio::test]
async fn test_rerun_after_lost_checkpoint_rewrites_same_file() {
    let server = MockServer::start().await;
    mount_board(&server).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 1, dir.path());
    let page5_url = format!("{}/bbs/photo-buy/index5.html", server.uri());

    Coordinator::new(&config, false).unwrap().run().await.unwrap();
    let first = std::fs::read(dir.path().join("records/5.csv")).unwrap();

    // Simulate a crash between saving page 5 and advancing the checkpoint
    FileCheckpoint::new(dir.path().join("cache"))
        .write(&page5_url)
        .unwrap();

    Coordinator::new(&config, false).unwrap().run().await.unwrap();
    let second = std::fs::read(dir.path().join("records/5.csv")).unwrap();

    assert_eq!(first, second);
    assert!(!dir.path().join("records/4.csv").exists());

    let requests = server.received_requests().await.unwrap();
    let listing_hits = requests
        .iter()
        .filter(|r| r.url.path() == "/bbs/photo-buy/index5.html")
        .count();
    assert_eq!(listing_hits, 2);
}

#[tokio::test]
async fn test_broken_listing_surfaces_error() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/bbs/photo-buy/index5.html",
        "<html><body><p>maintenance</p></body></html>".to_string(),
    )
    .await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 3, dir.path());

    let result = Coordinator::new(&config, false).unwrap().run().await;

    assert!(matches!(result, Err(CrawlerError::PageStructure { .. })));
    assert!(!dir.path().join("cache").exists());
    assert!(!dir.path().join("records/5.csv").exists());
}

#[tokio::test]
async fn test_unreachable_posts_are_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/bbs/photo-buy/index5.html", listing_html(&["X", "A"], Some(4))).await;
    mount_page(&server, "/bbs/photo-buy/A.html", post_html("[出售] Nikon FM2", "3000")).await;
    Mock::given(method("GET"))
        .and(path("/bbs/photo-buy/X.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), 1, dir.path());

    let stats = Coordinator::new(&config, false).unwrap().run().await.unwrap();

    assert_eq!(stats.records_saved, 1);
    let content = std::fs::read_to_string(dir.path().join("records/5.csv")).unwrap();
    assert_eq!(content.lines().count(), 1);
}
