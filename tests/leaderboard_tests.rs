use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crisis_market::leaderboard::LeaderboardStore;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn temp_path() -> PathBuf {
    let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "crisis-market-lb-test-{}-{}.json",
        std::process::id(),
        id
    ));
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn missing_file_opens_as_an_empty_board() {
    let path = temp_path();
    let board = LeaderboardStore::open(&path).unwrap();
    assert!(board.is_empty());
    assert_eq!(board.score_for("anyone"), None);
}

#[test]
fn records_persist_across_reopen() {
    let path = temp_path();
    {
        let mut board = LeaderboardStore::open(&path).unwrap();
        board.record("maria", 2_345.67).unwrap();
        board.record("casey", -512.50).unwrap();
    }
    let board = LeaderboardStore::open(&path).unwrap();
    assert_eq!(board.len(), 2);
    assert!((board.score_for("maria").unwrap() - 2_345.67).abs() < 1e-9);
    assert!((board.score_for("casey").unwrap() + 512.50).abs() < 1e-9);
    let _ = std::fs::remove_file(path);
}

#[test]
fn recording_the_same_username_overwrites() {
    let path = temp_path();
    let mut board = LeaderboardStore::open(&path).unwrap();
    board.record("maria", 100.0).unwrap();
    board.record("maria", -40.0).unwrap();
    assert_eq!(board.len(), 1);
    assert!((board.score_for("maria").unwrap() + 40.0).abs() < 1e-9);
    let _ = std::fs::remove_file(path);
}

#[test]
fn entries_sort_by_score_descending_with_stable_ties() {
    let path = temp_path();
    let mut board = LeaderboardStore::open(&path).unwrap();
    board.record("zoe", 50.0).unwrap();
    board.record("amir", 50.0).unwrap();
    board.record("lee", 900.0).unwrap();
    board.record("pat", -10.0).unwrap();

    let entries = board.sorted_entries();
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["lee", "amir", "zoe", "pat"]);
    let _ = std::fs::remove_file(path);
}

#[test]
fn reset_clears_the_board_and_the_file() {
    let path = temp_path();
    {
        let mut board = LeaderboardStore::open(&path).unwrap();
        board.record("maria", 1.0).unwrap();
        board.reset().unwrap();
        assert!(board.is_empty());
    }
    let board = LeaderboardStore::open(&path).unwrap();
    assert!(board.is_empty());
    let _ = std::fs::remove_file(path);
}
