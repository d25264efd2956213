//! End-to-end collection runs over a scripted in-memory feed client.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;

use feed_harvester::client::{ClientError, ClientResult, FeedClient, QuerySpec};
use feed_harvester::collector::config::CollectorConfig;
use feed_harvester::runner::Harvester;
use feed_harvester::shutdown::ShutdownCoordinator;
use feed_harvester::{Cursor, FeedPost, RecordPage};

struct ScriptedClient {
    responses: Mutex<VecDeque<ClientResult<RecordPage>>>,
}

impl ScriptedClient {
    fn new(responses: Vec<ClientResult<RecordPage>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl FeedClient for ScriptedClient {
    async fn search_latest(&self, _: &QuerySpec, _: u32) -> ClientResult<RecordPage> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }

    async fn fetch_next(&self, _: &Cursor) -> ClientResult<RecordPage> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted")
    }
}

fn post(id: &str) -> FeedPost {
    FeedPost {
        id: id.to_string(),
        author: "acct1".to_string(),
        text: format!("post {id}"),
        created_at: "2022-01-01T12:00:00Z".to_string(),
        repost_count: 5,
        like_count: 9,
        reply_count: 0,
        quote_count: 0,
    }
}

fn page(ids: &[&str], cursor: Option<&str>) -> RecordPage {
    RecordPage {
        posts: ids.iter().map(|id| post(id)).collect(),
        next_cursor: cursor.map(Cursor::new),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config() -> CollectorConfig {
    CollectorConfig {
        probe: false,
        ..CollectorConfig::default()
    }
}

fn read_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .filter_map(Result::ok)
        .map(|record| record.iter().map(str::to_string).collect())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn half_year_range_collects_three_posts_in_one_window() {
    // 180-day window over [2022-01-01, 2022-07-01): exactly one window,
    // truncated to 2022-06-30. The feed answers with pages of 2, 1, and 0
    // posts.
    let client = ScriptedClient::new(vec![
        Ok(page(&["101", "102"], Some("c1"))),
        Ok(page(&["103"], Some("c2"))),
        Ok(RecordPage::empty()),
    ]);

    let dir = TempDir::new().unwrap();
    let harvester = Harvester::new(
        client,
        config(),
        dir.path().to_path_buf(),
        ShutdownCoordinator::shared(),
    );

    let summary = harvester
        .execute("acct1", date(2022, 1, 1), date(2022, 7, 1))
        .await
        .unwrap();

    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.windows_completed, 1);

    let path = dir.path().join("posts_2022-01-01_2022-06-30.csv");
    let rows = read_rows(&path);
    assert_eq!(rows.len(), 3);

    // Sequence numbers 1..=3 in arrival order
    let seqs: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(seqs, vec!["1", "2", "3"]);
    let ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, vec!["101", "102", "103"]);

    // Full projection for the first row
    assert_eq!(
        rows[0],
        vec![
            "101",
            "1",
            "acct1",
            "post 101",
            "2022-01-01T12:00:00Z",
            "5",
            "9",
            "0",
            "0",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn abandoned_window_keeps_partial_results_and_run_continues() {
    // First window: one good page then six consecutive transient failures,
    // exhausting the retry budget of 5. Second window: one page of one post.
    let mut responses: Vec<ClientResult<RecordPage>> =
        vec![Ok(page(&["201", "202"], Some("c1")))];
    for _ in 0..6 {
        responses.push(Err(ClientError::Transient("socket closed".to_string())));
    }
    responses.push(Ok(page(&["203"], None)));

    let client = ScriptedClient::new(responses);
    let dir = TempDir::new().unwrap();
    let harvester = Harvester::new(
        client,
        CollectorConfig {
            window_days: 100,
            probe: false,
            ..CollectorConfig::default()
        },
        dir.path().to_path_buf(),
        ShutdownCoordinator::shared(),
    );

    let summary = harvester
        .execute("acct1", date(2022, 1, 1), date(2022, 6, 1))
        .await
        .unwrap();

    // Both the abandoned window's partial count and the healthy window count
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.windows_completed, 2);

    let first = read_rows(&dir.path().join("posts_2022-01-01_2022-04-11.csv"));
    assert_eq!(first.len(), 2);
    let second = read_rows(&dir.path().join("posts_2022-04-12_2022-06-01.csv"));
    assert_eq!(second.len(), 1);
    // Run-wide sequencing continues past the abandoned window
    assert_eq!(second[0][1], "3");
}

#[tokio::test(start_paused = true)]
async fn rerunning_a_window_appends_without_new_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("posts_2022-01-01_2022-06-30.csv");

    for ids in [&["301"][..], &["302"][..]] {
        let client = ScriptedClient::new(vec![Ok(page(ids, None))]);
        let harvester = Harvester::new(
            client,
            config(),
            dir.path().to_path_buf(),
            ShutdownCoordinator::shared(),
        );
        harvester
            .execute("acct1", date(2022, 1, 1), date(2022, 7, 1))
            .await
            .unwrap();
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let header_lines = contents
        .lines()
        .filter(|line| line.starts_with("post_id"))
        .count();
    assert_eq!(header_lines, 1);

    // Both runs' rows survive; each run numbers from its own start
    let rows = read_rows(&path);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "301");
    assert_eq!(rows[1][0], "302");
}

#[tokio::test(start_paused = true)]
async fn inverted_range_produces_failure_report_with_zero_total() {
    let client = ScriptedClient::new(vec![]);
    let dir = TempDir::new().unwrap();
    let harvester = Harvester::new(
        client,
        config(),
        dir.path().to_path_buf(),
        ShutdownCoordinator::shared(),
    );

    let failure = harvester
        .execute("acct1", date(2022, 7, 1), date(2022, 1, 1))
        .await
        .unwrap_err();

    assert_eq!(failure.total_records, 0);
    assert!(failure.to_string().contains("invalid range"));
}
