// src/scheduler/run.rs
// =============================================================================
// This module implements the bounded fan-out/fan-in over the URL list.
//
// How it works:
// 1. Validate the concurrency cap (k must be >= 1)
// 2. For each non-blank URL, acquire one semaphore permit - this is the
//    admission token; when all k permits are out, the loop waits here
// 3. Spawn an independent task that fetches, counts (or captures the
//    error), appends to the shared ResultStore, and drops its permit
// 4. Drain the JoinSet so the caller only ever sees a complete store
//
// Backpressure is the point: a stalled fetch holds its permit and throttles
// new admissions, but the cap is never exceeded and no URL's failure can
// touch any other URL's outcome.
//
// Rust concepts:
// - Semaphore: A pool of k permits; acquire waits when the pool is empty
// - OwnedSemaphorePermit: RAII token; dropping it releases the permit on
//   every exit path, no matter how the task ends
// - JoinSet: Tracks spawned tasks and lets us await them all
// - Arc: Shared ownership so every task can reach the same store
// =============================================================================

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::store::{ResultStore, TaskResult};
use crate::fetch::Fetcher;

// Runs every non-blank URL through fetch-and-count with at most
// `concurrency` requests in flight, and returns the completed store.
//
// Parameters:
//   urls: the input lines; blank/whitespace-only entries are skipped
//   concurrency: the cap k; anything below 1 is a configuration error
//   fetcher: the injected transport (real HTTP in main, fakes in tests)
//   counter: the injected body scan, e.g. "count 'Go' occurrences"
//
// Returns only after every admitted task has appended its result and
// released its permit, so the store is complete and stable. A fetch error
// for one URL becomes that URL's TaskResult and nothing more.
pub async fn run<F, C>(
    urls: Vec<String>,
    concurrency: i64,
    fetcher: F,
    counter: C,
) -> Result<ResultStore>
where
    F: Fetcher,
    C: Fn(&[u8]) -> usize + Send + Sync + 'static,
{
    // Fail fast on a bad cap - nothing has been scheduled yet
    if concurrency < 1 {
        bail!("concurrency must be at least 1, got {concurrency}");
    }

    let semaphore = Arc::new(Semaphore::new(concurrency as usize));
    let store = Arc::new(ResultStore::default());
    let fetcher = Arc::new(fetcher);
    let counter = Arc::new(counter);
    let mut tasks = JoinSet::new();

    for url in urls {
        // Blank lines are ignored: not scheduled, not reported
        if url.trim().is_empty() {
            continue;
        }

        // The admission step. This blocks the scheduling loop (not the
        // tasks already running) until one of the k permits frees up.
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore is never closed");

        let store = store.clone();
        let fetcher = fetcher.clone();
        let counter = counter.clone();

        tasks.spawn(async move {
            // Held for the whole task; dropped (= released) on every exit
            let _permit = permit;

            let result = match fetcher.fetch(&url).await {
                Ok(body) => TaskResult::counted(url, (*counter)(&body)),
                Err(error) => TaskResult::failed(url, error),
            };

            store.add_result(result);
        });
    }

    // Fan-in: wait for every admitted task. After this loop the store can
    // never change again.
    while let Some(joined) = tasks.join_next().await {
        joined.context("a fetch task panicked")?;
    }

    // All task handles are gone, so ours is the last Arc standing
    let store = Arc::try_unwrap(store).expect("no tasks left holding the store");
    Ok(store)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why acquire the permit BEFORE spawning?
//    - If we acquired inside the task, we'd happily spawn a million tasks
//      that all sit waiting; the input loop would never feel backpressure
//    - Acquiring first means the loop itself slows down once k are in flight
//
// 2. Why acquire_owned() instead of acquire()?
//    - acquire() borrows the semaphore, but the permit must move INTO the
//      spawned task and outlive the loop iteration
//    - acquire_owned() works off an Arc and gives a permit with no borrow
//
// 3. Why is dropping the permit enough?
//    - OwnedSemaphorePermit releases itself in its Drop impl
//    - Whether the task finishes normally or early, Rust runs the drop
//    - That's the "release on all exit paths" guarantee, for free
//
// 4. Completion order vs input order:
//    - Results land in the store as tasks finish, which varies run to run
//    - The total doesn't care: addition is commutative
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::count_occurrences;
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn go_counter(body: &[u8]) -> usize {
        count_occurrences(body, b"Go")
    }

    // Serves canned bodies or canned errors, no network involved
    struct CannedFetcher {
        responses: HashMap<String, Result<Vec<u8>, String>>,
    }

    impl CannedFetcher {
        fn new(entries: Vec<(&str, Result<&str, &str>)>) -> Self {
            let responses = entries
                .into_iter()
                .map(|(url, outcome)| {
                    let outcome = match outcome {
                        Ok(body) => Ok(body.as_bytes().to_vec()),
                        Err(message) => Err(message.to_string()),
                    };
                    (url.to_string(), outcome)
                })
                .collect();
            CannedFetcher { responses }
        }
    }

    impl Fetcher for CannedFetcher {
        async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
            match self.responses.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(message)) => Err(anyhow!("{message}")),
                None => Err(anyhow!("no canned response for {url}")),
            }
        }
    }

    // Fails every fetch and counts how many times it was called
    struct AlwaysFailFetcher {
        calls: Arc<AtomicUsize>,
    }

    impl Fetcher for AlwaysFailFetcher {
        async fn fetch(&self, _url: &str) -> anyhow::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("connection refused"))
        }
    }

    // Records the peak number of concurrent fetches it ever observed
    struct GaugeFetcher {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl Fetcher for GaugeFetcher {
        async fn fetch(&self, _url: &str) -> anyhow::Result<Vec<u8>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            // Keep the permit held long enough for overlap to show up
            tokio::time::sleep(Duration::from_millis(20)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(b"Go".to_vec())
        }
    }

    #[tokio::test]
    async fn empty_input_yields_empty_store() {
        let fetcher = CannedFetcher::new(vec![]);
        let store = run(vec![], 5, fetcher, go_counter).await.unwrap();

        let (results, total) = store.into_parts();
        assert!(results.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let fetcher = CannedFetcher::new(vec![
            ("http://a", Ok("Go")),
            ("http://b", Ok("GoGo")),
        ]);
        let urls = vec![
            "http://a".to_string(),
            String::new(),
            "   ".to_string(),
            "http://b".to_string(),
            String::new(),
        ];

        let store = run(urls, 5, fetcher, go_counter).await.unwrap();

        let (results, total) = store.into_parts();
        assert_eq!(results.len(), 2);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn zero_concurrency_is_a_configuration_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = AlwaysFailFetcher {
            calls: calls.clone(),
        };

        let outcome = run(vec!["http://a".to_string()], 0, fetcher, go_counter).await;

        assert!(outcome.is_err());
        // Fail-fast: no task ever ran
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn negative_concurrency_is_a_configuration_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = AlwaysFailFetcher {
            calls: calls.clone(),
        };

        let outcome = run(vec!["http://a".to_string()], -3, fetcher, go_counter).await;

        assert!(outcome.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn all_failures_still_report_every_url() {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = AlwaysFailFetcher {
            calls: calls.clone(),
        };
        let urls: Vec<String> = (0..6).map(|i| format!("http://host-{i}")).collect();

        let store = run(urls, 3, fetcher, go_counter).await.unwrap();

        let (results, total) = store.into_parts();
        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|r| !r.is_ok()));
        assert_eq!(total, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn one_failure_never_affects_other_urls() {
        let fetcher = CannedFetcher::new(vec![
            ("http://good-1", Ok("Go says Go")),
            ("http://bad", Err("dns lookup failed")),
            ("http://good-2", Ok("GoGoGo")),
        ]);
        let urls = vec![
            "http://good-1".to_string(),
            "http://bad".to_string(),
            "http://good-2".to_string(),
        ];

        let store = run(urls, 2, fetcher, go_counter).await.unwrap();

        let (results, total) = store.into_parts();
        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn concurrent_fetches_never_exceed_the_cap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let fetcher = GaugeFetcher {
            in_flight: in_flight.clone(),
            peak: peak.clone(),
        };
        let urls: Vec<String> = (0..20).map(|i| format!("http://host-{i}")).collect();

        let store = run(urls, 3, fetcher, go_counter).await.unwrap();

        let (results, total) = store.into_parts();
        assert_eq!(results.len(), 20);
        assert_eq!(total, 20);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn serial_cap_still_processes_everything() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let fetcher = GaugeFetcher {
            in_flight: in_flight.clone(),
            peak: peak.clone(),
        };
        let urls: Vec<String> = (0..5).map(|i| format!("http://host-{i}")).collect();

        let store = run(urls, 1, fetcher, go_counter).await.unwrap();

        assert_eq!(store.len(), 5);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    // End-to-end mix: one good URL with three "Go"s, one blank line, one
    // URL that errors, cap of one.
    #[tokio::test]
    async fn mixed_scenario_with_serial_cap() {
        let fetcher = CannedFetcher::new(vec![
            ("http://a", Ok("Go home, Go team, Go!")),
            ("http://b", Err("connection reset by peer")),
        ]);
        let urls = vec![
            "http://a".to_string(),
            String::new(),
            "http://b".to_string(),
        ];

        let store = run(urls, 1, fetcher, go_counter).await.unwrap();

        let (results, total) = store.into_parts();
        assert_eq!(results.len(), 2);
        assert_eq!(total, 3);

        let lines: Vec<String> = results.iter().map(|r| r.to_string()).collect();
        assert!(lines.contains(&"Count for http://a: 3".to_string()));
        assert!(lines
            .iter()
            .any(|l| l == "http://b: Error 'connection reset by peer'"));
    }
}
