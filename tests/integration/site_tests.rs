//! Store-to-site tests

use crate::common::{create_store, scratch, test_config};
use litlite::output::{generate_site, load_statistics};
use litlite::storage::{load_sample_data, migrate_legacy, open_storage, NewWork, Storage};
use litlite::LitError;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

#[test]
fn test_sample_store_renders_full_site() {
    let dir = scratch();
    let config = test_config("http://unused.invalid", dir.path());
    let mut storage = create_store(&config);
    load_sample_data(&mut storage).unwrap();
    drop(storage);

    let storage = open_storage(Path::new(&config.output.database_path)).unwrap();
    let report = generate_site(&storage, &config).unwrap();
    assert_eq!(report.detail_pages, 5);
    assert_eq!(report.listing_pages, 4);

    let site = Path::new(&config.output.site_dir);
    let detail_pages = fs::read_dir(site)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| {
            !["index.html", "by_author.html", "by_genre.html", "by_year.html"]
                .contains(&name.as_str())
        })
        .count();
    assert_eq!(detail_pages, 5);

    let index = fs::read_to_string(site.join("index.html")).unwrap();
    assert!(index.contains(r#"data-stat="works">5<"#));
    // 太宰治 wrote two of the five sample works
    assert!(index.contains(r#"data-stat="authors">4<"#));
    assert!(index.contains(r#"data-stat="genres">3<"#));

    let by_author = fs::read_to_string(site.join("by_author.html")).unwrap();
    assert!(by_author.contains("太宰治 (2作品)"));

    let melos = fs::read_to_string(site.join("走れメロス.html")).unwrap();
    assert!(melos.contains("https://www.aozora.gr.jp/cards/000035/card1567.html"));
    assert!(melos.contains("📅 1940年"));
}

#[test]
fn test_generate_from_missing_store() {
    let dir = scratch();
    let config = test_config("http://unused.invalid", dir.path());

    let result = open_storage(Path::new(&config.output.database_path));
    assert!(matches!(result, Err(LitError::StoreMissing { .. })));
}

#[test]
fn test_unknown_metadata_grouped_last() {
    let dir = scratch();
    let config = test_config("http://unused.invalid", dir.path());
    let mut storage = create_store(&config);
    storage
        .insert_works(&[
            NewWork::new("無題", "作者不詳", "本文"),
            NewWork {
                year: Some(1915),
                genre: Some("短編小説".to_string()),
                ..NewWork::new("羅生門", "芥川龍之介", "或日の暮方の事である。")
            },
        ])
        .unwrap();

    generate_site(&storage, &config).unwrap();
    let site = Path::new(&config.output.site_dir);

    let by_genre = fs::read_to_string(site.join("by_genre.html")).unwrap();
    assert!(by_genre.find("短編小説 (1作品)").unwrap() < by_genre.find("分類なし (1作品)").unwrap());

    let by_year = fs::read_to_string(site.join("by_year.html")).unwrap();
    assert!(by_year.find("1915年 (1作品)").unwrap() < by_year.find("不明 (1作品)").unwrap());
}

#[test]
fn test_migrated_store_generates() {
    let dir = scratch();
    let old = dir.path().join("legacy.db");
    Connection::open(&old)
        .unwrap()
        .execute_batch(
            "CREATE TABLE summaries (id INTEGER PRIMARY KEY, title TEXT, author TEXT, summary TEXT, source_url TEXT);
             INSERT INTO summaries (title, author, summary, source_url)
                 VALUES ('こころ', '夏目漱石', '私はその人を常に先生と呼んでいた。', 'https://www.aozora.gr.jp/cards/000148/card773.html');",
        )
        .unwrap();

    let config = test_config("http://unused.invalid", dir.path());
    let target = Path::new(&config.output.database_path);
    assert_eq!(migrate_legacy(&old, target).unwrap(), 1);

    let storage = open_storage(target).unwrap();
    let stats = load_statistics(&storage).unwrap();
    assert_eq!(stats.total_works, 1);
    assert_eq!(stats.total_genres, 0);

    let report = generate_site(&storage, &config).unwrap();
    assert_eq!(report.detail_pages, 1);
    assert!(Path::new(&config.output.site_dir).join("こころ.html").is_file());
}
