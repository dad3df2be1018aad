//! End-to-end scrape pipeline tests against a mock archive

use crate::common::{card_page, create_store, page, scratch, test_config, text_page, MELOS};
use litlite::scrape::{FetchError, PageFetcher, Pipeline};
use litlite::storage::{SqliteStorage, Storage};
use litlite::LitError;
use std::path::Path;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Roster of three authors: one with works, one without, one broken
async fn mount_archive(server: &MockServer) {
    mount_html(
        server,
        "/index_pages/person_all.html",
        page(
            r#"<ol>
                <li><a href="person1.html#sakuhin_list_1">作家一</a></li>
                <li><a href="person2.html">作家二</a></li>
                <li><a href="person3.html">作家三</a></li>
                <li><a href="person1.html">作家一</a></li>
                <li><a href="../index.html">トップ</a></li>
            </ol>"#,
        ),
    )
    .await;

    mount_html(
        server,
        "/index_pages/person1.html",
        page(
            r#"<ol>
                <li><a href="../cards/000001/card1.html">走れメロス</a></li>
                <li><a href="../cards/000001/card2.html">欠けた作品</a></li>
                <li><a href="../cards/000001/card3.html">短すぎる作品</a></li>
                <li><a href="../cards/000001/card4.html">四番目の作品</a></li>
            </ol>"#,
        ),
    )
    .await;
    mount_html(server, "/index_pages/person2.html", page("<p>作品はありません</p>")).await;
    mount_status(server, "/index_pages/person3.html", 500).await;

    mount_html(server, "/cards/000001/card1.html", card_page("./files/1_1.html")).await;
    mount_html(server, "/cards/000001/card2.html", card_page("./files/2_1.html")).await;
    mount_html(server, "/cards/000001/card3.html", card_page("./files/3_1.html")).await;

    mount_html(
        server,
        "/cards/000001/files/1_1.html",
        text_page(&format!(
            "<ruby><rb>{}</rb><rp>（</rp><rt>めろす</rt><rp>）</rp></ruby>［＃ここから本文］<br>{}",
            "メロス",
            MELOS.repeat(5)
        )),
    )
    .await;
    mount_status(server, "/cards/000001/files/2_1.html", 404).await;
    mount_html(server, "/cards/000001/files/3_1.html", text_page("短い。")).await;
}

#[tokio::test]
async fn test_full_scrape_skips_failing_works() {
    let server = MockServer::start().await;
    mount_archive(&server).await;

    let dir = scratch();
    let config = test_config(&server.uri(), dir.path());
    create_store(&config);

    let mut pipeline = Pipeline::new(config.clone()).expect("Failed to build pipeline");
    let report = pipeline.run().await.expect("Scrape failed");

    // Fragment-only duplicate of 作家一 is dropped, トップ does not match
    assert_eq!(report.authors_in_roster, 3);
    assert_eq!(report.authors_selected, 1);
    assert_eq!(report.works_stored, 1);
    assert_eq!(report.works_skipped, 2);

    let storage = SqliteStorage::open(Path::new(&config.output.database_path)).unwrap();
    let works = storage.list_works().unwrap();
    assert_eq!(works.len(), 1);

    let work = &works[0];
    assert_eq!(work.title, "走れメロス");
    assert_eq!(work.author, "作家一");
    assert_eq!(
        work.source_url.as_deref(),
        Some(format!("{}/cards/000001/card1.html", server.uri()).as_str())
    );
    assert!(work.summary.starts_with("メロス メロスは激怒した。"));
    assert!(!work.summary.contains("めろす"));
    assert!(!work.summary.contains("［＃"));
    assert!(!work.summary.contains('\n'));
}

#[tokio::test]
async fn test_fourth_work_not_fetched() {
    let server = MockServer::start().await;
    mount_archive(&server).await;
    Mock::given(method("GET"))
        .and(path("/cards/000001/card4.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = scratch();
    let config = test_config(&server.uri(), dir.path());
    create_store(&config);

    Pipeline::new(config).unwrap().run().await.unwrap();
}

#[tokio::test]
async fn test_summary_truncated_to_budget() {
    let server = MockServer::start().await;
    mount_archive(&server).await;

    let dir = scratch();
    let mut config = test_config(&server.uri(), dir.path());
    config.summary.max_chars = 10;
    create_store(&config);

    Pipeline::new(config.clone()).unwrap().run().await.unwrap();

    let storage = SqliteStorage::open(Path::new(&config.output.database_path)).unwrap();
    let works = storage.list_works().unwrap();
    assert_eq!(works[0].summary, "メロス メロスは激怒...");
}

#[tokio::test]
async fn test_shift_jis_text_page() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/index_pages/person_all.html",
        page(r#"<a href="person9.html">夏目漱石</a>"#),
    )
    .await;
    mount_html(
        &server,
        "/index_pages/person9.html",
        page(r#"<a href="../cards/000148/card789.html">吾輩は猫である</a>"#),
    )
    .await;
    mount_html(
        &server,
        "/cards/000148/card789.html",
        card_page("./files/789_14547.html"),
    )
    .await;

    let text = "吾輩は猫である。名前はまだ無い。".repeat(10);
    let html = format!(
        r#"<html><head><meta http-equiv="Content-Type" content="text/html;charset=Shift_JIS"></head><body><div class="main_text">{}</div></body></html>"#,
        text
    );
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(&html);
    Mock::given(method("GET"))
        .and(path("/cards/000148/files/789_14547.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(bytes.into_owned(), "text/html"))
        .mount(&server)
        .await;

    let dir = scratch();
    let config = test_config(&server.uri(), dir.path());
    create_store(&config);

    let report = Pipeline::new(config.clone()).unwrap().run().await.unwrap();
    assert_eq!(report.works_stored, 1);

    let storage = SqliteStorage::open(Path::new(&config.output.database_path)).unwrap();
    let works = storage.list_works().unwrap();
    assert!(works[0].summary.starts_with("吾輩は猫である。名前はまだ無い。"));
    assert_eq!(works[0].author, "夏目漱石");
}

#[tokio::test]
async fn test_missing_store_is_fatal_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = scratch();
    let config = test_config(&server.uri(), dir.path());

    let result = Pipeline::new(config).unwrap().run().await;
    assert!(matches!(result, Err(LitError::StoreMissing { .. })));
}

#[tokio::test]
async fn test_empty_roster_is_fatal() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/index_pages/person_all.html",
        page(r#"<a href="../index.html">トップ</a>"#),
    )
    .await;

    let dir = scratch();
    let config = test_config(&server.uri(), dir.path());
    create_store(&config);

    let result = Pipeline::new(config).unwrap().run().await;
    assert!(matches!(result, Err(LitError::EmptyInput(_))));
}

#[tokio::test]
async fn test_roster_fetch_failure_is_fatal() {
    let server = MockServer::start().await;
    mount_status(&server, "/index_pages/person_all.html", 503).await;

    let dir = scratch();
    let config = test_config(&server.uri(), dir.path());
    create_store(&config);

    let result = Pipeline::new(config).unwrap().run().await;
    assert!(matches!(result, Err(LitError::Fetch(_))));
}

#[tokio::test]
async fn test_no_author_with_works_is_fatal() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/index_pages/person_all.html",
        page(r#"<a href="person2.html">作家二</a>"#),
    )
    .await;
    mount_html(&server, "/index_pages/person2.html", page("<p>作品はありません</p>")).await;

    let dir = scratch();
    let config = test_config(&server.uri(), dir.path());
    create_store(&config);

    let result = Pipeline::new(config).unwrap().run().await;
    assert!(matches!(result, Err(LitError::EmptyInput(_))));
}

#[tokio::test]
async fn test_max_authors_limits_probing() {
    let server = MockServer::start().await;
    let roster: String = (1..=4)
        .map(|i| format!(r#"<a href="person{}.html">作家{}番</a>"#, i, i))
        .collect();
    mount_html(&server, "/index_pages/person_all.html", page(&roster)).await;

    for i in 1..=2 {
        mount_html(
            &server,
            &format!("/index_pages/person{}.html", i),
            page(&format!(r#"<a href="../cards/{0}/card{0}.html">作品{0}</a>"#, i)),
        )
        .await;
        mount_html(
            &server,
            &format!("/cards/{0}/card{0}.html", i),
            card_page(&format!("./files/{}.html", i)),
        )
        .await;
        mount_html(
            &server,
            &format!("/cards/{0}/files/{0}.html", i),
            text_page(&MELOS.repeat(5)),
        )
        .await;
    }
    for i in 3..=4 {
        Mock::given(method("GET"))
            .and(path(format!("/index_pages/person{}.html", i)))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }

    let dir = scratch();
    let mut config = test_config(&server.uri(), dir.path());
    config.scraper.max_authors = 2;
    create_store(&config);

    let report = Pipeline::new(config).unwrap().run().await.unwrap();
    assert_eq!(report.authors_in_roster, 4);
    assert_eq!(report.authors_selected, 2);
    assert_eq!(report.works_stored, 2);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page("遅い"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let dir = scratch();
    let mut config = test_config(&server.uri(), dir.path());
    config.scraper.request_timeout_secs = 1;

    let fetcher = PageFetcher::new(&config.scraper, &config.user_agent).unwrap();
    let url = Url::parse(&format!("{}/slow.html", server.uri())).unwrap();
    let result = fetcher.fetch(&url).await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_timed_out_work_is_skipped() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/index_pages/person_all.html",
        page(r#"<a href="person1.html">作家一</a>"#),
    )
    .await;
    mount_html(
        &server,
        "/index_pages/person1.html",
        page(
            r#"<a href="../cards/000001/card1.html">走れメロス</a>
               <a href="../cards/000001/card2.html">遅い作品</a>"#,
        ),
    )
    .await;
    mount_html(&server, "/cards/000001/card1.html", card_page("./files/1_1.html")).await;
    mount_html(&server, "/cards/000001/card2.html", card_page("./files/2_1.html")).await;
    mount_html(&server, "/cards/000001/files/1_1.html", text_page(&MELOS.repeat(5))).await;
    Mock::given(method("GET"))
        .and(path("/cards/000001/files/2_1.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(text_page(&MELOS.repeat(5)))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let dir = scratch();
    let mut config = test_config(&server.uri(), dir.path());
    config.scraper.request_timeout_secs = 1;
    create_store(&config);

    let report = Pipeline::new(config.clone()).unwrap().run().await.unwrap();
    assert_eq!(report.works_stored, 1);
    assert_eq!(report.works_skipped, 1);

    let storage = SqliteStorage::open(Path::new(&config.output.database_path)).unwrap();
    let works = storage.list_works().unwrap();
    assert_eq!(works.len(), 1);
    assert_eq!(works[0].title, "走れメロス");
}
