//! Store-level tests against the SQLite backend.

use super::*;
use proptest::prelude::*;
use std::collections::HashSet;
use tempfile::TempDir;

fn file(rel: &str, size: u64, file_type: FileType) -> EntryRecord {
    let name = rel.rsplit('/').next().unwrap_or(rel);
    EntryRecord::file(format!("/r/{rel}"), name, rel, size, file_type, 1_600_000_000)
}

fn dir(rel: &str) -> EntryRecord {
    let name = rel.rsplit('/').next().unwrap_or(rel);
    EntryRecord::directory(format!("/r/{rel}"), name, rel, 1_600_000_000)
}

fn fixture() -> Vec<EntryRecord> {
    vec![
        file("a.txt", 10, FileType::Text),
        dir("docs"),
        file("docs/report.docx", 300, FileType::Document),
        file("docs/summary.docx", 200, FileType::Document),
        file("docs/notes.txt", 5, FileType::Text),
        dir("src"),
        file("src/app.js", 40, FileType::JavaScript),
    ]
}

fn seeded() -> IndexStore {
    let store = IndexStore::memory().unwrap();
    store.insert_or_replace(&fixture(), 100).unwrap();
    store
}

fn names(page: &SearchPage) -> Vec<&str> {
    page.entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_insert_and_count() {
    let store = seeded();
    assert_eq!(store.count().unwrap(), 7);
}

#[test]
fn test_empty_batch_is_a_no_op() {
    let store = IndexStore::memory().unwrap();
    assert_eq!(store.insert_or_replace(&[], 1).unwrap(), 0);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_clear_removes_everything() {
    let store = seeded();
    store.clear().unwrap();
    assert_eq!(store.count().unwrap(), 0);
    assert_eq!(store.stats().unwrap(), IndexStats::default());
}

#[test]
fn test_upsert_overwrites_metadata_and_keeps_created_at() {
    let store = IndexStore::memory().unwrap();
    store
        .insert_or_replace(&[file("a.txt", 10, FileType::Text)], 100)
        .unwrap();
    store
        .insert_or_replace(
            &[EntryRecord::file("/r/a.txt", "a.txt", "a.txt", 99, FileType::Text, 5)],
            200,
        )
        .unwrap();

    assert_eq!(store.count().unwrap(), 1);
    let page = store.search(&SearchParams::new()).unwrap();
    let entry = &page.entries[0];
    assert_eq!(entry.size_bytes, 99);
    assert_eq!(entry.modified_at, 5);
    assert_eq!(entry.created_at, 100);
    assert_eq!(entry.updated_at, 200);
}

#[test]
fn test_search_without_filters_returns_all_sorted_by_name() {
    let page = seeded().search(&SearchParams::new()).unwrap();
    assert_eq!(page.total, 7);
    assert_eq!(
        names(&page),
        vec![
            "a.txt",
            "app.js",
            "docs",
            "notes.txt",
            "report.docx",
            "src",
            "summary.docx"
        ]
    );
}

#[test]
fn test_term_matches_name_or_relative_path() {
    let store = seeded();

    let by_name = store.search(&SearchParams::new().term("report")).unwrap();
    assert_eq!(names(&by_name), vec!["report.docx"]);

    // "docs" only appears in the relative path of the files below it.
    let by_path = store.search(&SearchParams::new().term("docs")).unwrap();
    assert_eq!(by_path.total, 4);
}

#[test]
fn test_type_filter_is_exact() {
    let store = seeded();
    let page = store
        .search(&SearchParams::new().type_filter("document"))
        .unwrap();
    assert_eq!(names(&page), vec!["report.docx", "summary.docx"]);

    let none = store.search(&SearchParams::new().type_filter("doc")).unwrap();
    assert_eq!(none.total, 0);
}

#[test]
fn test_term_and_type_combine() {
    let page = seeded()
        .search(&SearchParams::new().term("docs").type_filter("text"))
        .unwrap();
    assert_eq!(names(&page), vec!["notes.txt"]);
}

#[test]
fn test_like_wildcards_match_literally() {
    let store = IndexStore::memory().unwrap();
    store
        .insert_or_replace(
            &[
                file("100%.txt", 1, FileType::Text),
                file("1000.txt", 1, FileType::Text),
                file("a_b.txt", 1, FileType::Text),
                file("axb.txt", 1, FileType::Text),
            ],
            1,
        )
        .unwrap();

    let percent = store.search(&SearchParams::new().term("0%")).unwrap();
    assert_eq!(names(&percent), vec!["100%.txt"]);

    let underscore = store.search(&SearchParams::new().term("a_b")).unwrap();
    assert_eq!(names(&underscore), vec!["a_b.txt"]);
}

#[test]
fn test_total_ignores_pagination() {
    let page = seeded()
        .search(&SearchParams::new().limit(2).offset(1))
        .unwrap();
    assert_eq!(page.total, 7);
    assert_eq!(names(&page), vec!["app.js", "docs"]);
}

#[test]
fn test_offset_past_end_is_empty_page() {
    let page = seeded()
        .search(&SearchParams::new().offset(1_000))
        .unwrap();
    assert!(page.entries.is_empty());
    assert_eq!(page.total, 7);
}

#[test]
fn test_negative_pagination_is_normalized() {
    let page = seeded()
        .search(&SearchParams::new().limit(-1).offset(-1))
        .unwrap();
    assert_eq!(page.entries.len(), 7);
}

#[test]
fn test_stats() {
    let stats = seeded().stats().unwrap();
    assert_eq!(stats.total_files, 5);
    assert_eq!(stats.total_directories, 2);
    assert_eq!(stats.total_size_bytes, 555);
    assert_eq!(
        stats.file_types,
        vec![
            TypeCount {
                type_label: "document".into(),
                count: 2
            },
            TypeCount {
                type_label: "text".into(),
                count: 2
            },
            TypeCount {
                type_label: "javascript".into(),
                count: 1
            },
        ]
    );
}

#[test]
fn test_file_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("index.db");

    {
        let store = IndexStore::file(&path).unwrap();
        store.insert_or_replace(&fixture(), 1).unwrap();
    }

    let store = IndexStore::file(&path).unwrap();
    assert_eq!(store.count().unwrap(), 7);
    let page = store.search(&SearchParams::new().term("app")).unwrap();
    assert_eq!(names(&page), vec!["app.js"]);
}

#[test]
fn test_clones_share_the_backend() {
    let store = IndexStore::memory().unwrap();
    let other = store.clone();
    store.insert_or_replace(&fixture(), 1).unwrap();
    assert_eq!(other.count().unwrap(), 7);
}

proptest! {
    #[test]
    fn prop_pages_cover_total_without_duplicates(count in 0usize..40, limit in 1i64..10) {
        let store = IndexStore::memory().unwrap();
        let records: Vec<_> = (0..count)
            .map(|i| file(&format!("f{:02}.txt", i % 7), i as u64, FileType::Text))
            .map(|r| {
                // Names collide on purpose; paths stay unique.
                let path = format!("{}-{}", r.full_path(), r.size_bytes());
                EntryRecord::file(path, r.name(), r.relative_path(), r.size_bytes(), FileType::Text, 0)
            })
            .collect();
        store.insert_or_replace(&records, 1).unwrap();

        let mut seen = HashSet::new();
        let mut offset = 0;
        loop {
            let page = store.search(&SearchParams::new().limit(limit).offset(offset)).unwrap();
            prop_assert_eq!(page.total, count as u64);
            prop_assert!(page.entries.len() as i64 <= limit);
            if page.entries.is_empty() {
                break;
            }
            for entry in page.entries {
                prop_assert!(seen.insert(entry.full_path));
            }
            offset += limit;
        }
        prop_assert_eq!(seen.len(), count);
    }
}
