// src/scheduler/store.rs
// =============================================================================
// This module holds the result types shared by all worker tasks.
//
// Key functionality:
// - TaskResult: one URL's outcome - either a count or an error message
// - ResultStore: a thread-safe accumulator of TaskResults plus a running total
//
// The store is the ONLY shared mutable state in the whole program. Every
// mutation goes through one mutex-guarded append, so concurrent workers can
// never lose an update or tear the total.
//
// Rust concepts:
// - Mutex: Mutual exclusion lock; only one thread can hold the data at a time
// - Interior mutability: add_result takes &self but still mutates (via Mutex)
// - Display trait: Lets us format a TaskResult with {} in println!
// =============================================================================

use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

// The outcome of fetching and counting one URL.
//
// Exactly one of the two is meaningful: when `error` is Some, the fetch
// failed and `count` is zero; when `error` is None, `count` holds the
// number of "Go" occurrences. Never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    /// The URL this result belongs to
    pub url: String,
    /// Occurrences found in the response body (0 when the fetch failed)
    pub count: usize,
    /// The fetch error message, if the task failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskResult {
    /// A successful fetch-and-count outcome
    pub fn counted(url: String, count: usize) -> Self {
        TaskResult {
            url,
            count,
            error: None,
        }
    }

    /// A failed fetch; the error is flattened to its display message here
    /// because one "task failed" kind is all the report distinguishes
    pub fn failed(url: String, error: anyhow::Error) -> Self {
        TaskResult {
            url,
            count: 0,
            error: Some(format!("{error:#}")),
        }
    }

    /// Helper to check whether this task succeeded
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

// One report line per result:
//   Count for <url>: <n>       (success)
//   <url>: Error '<message>'   (failure)
impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(message) => write!(f, "{}: Error '{}'", self.url, message),
            None => write!(f, "Count for {}: {}", self.url, self.count),
        }
    }
}

// What the mutex actually protects: the results in completion order and the
// running total. Kept private so the only way in is add_result.
#[derive(Debug, Default)]
struct StoreInner {
    results: Vec<TaskResult>,
    total: usize,
}

// Concurrency-safe accumulator shared by all worker tasks.
//
// Invariant: `total` always equals the sum of `count` over stored results
// without an error. Results keep arrival order, which is completion order,
// not input order.
#[derive(Debug, Default)]
pub struct ResultStore {
    inner: Mutex<StoreInner>,
}

impl ResultStore {
    /// Appends one result and folds its count into the total.
    ///
    /// Errored results are stored too (they show up in the report) but
    /// contribute nothing to the total. Safe to call from any number of
    /// tasks at once; the mutex serializes every append.
    pub fn add_result(&self, result: TaskResult) {
        let mut inner = self.inner.lock().expect("result store lock poisoned");
        if result.error.is_none() {
            inner.total += result.count;
        }
        inner.results.push(result);
    }

    /// The running total of counts across successful results
    pub fn total(&self) -> usize {
        self.inner.lock().expect("result store lock poisoned").total
    }

    /// How many results have been stored so far
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("result store lock poisoned")
            .results
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the store, yielding the results (completion order) and the
    /// total. Called once, after the scheduler has drained every task.
    pub fn into_parts(self) -> (Vec<TaskResult>, usize) {
        let inner = self
            .inner
            .into_inner()
            .expect("result store lock poisoned");
        (inner.results, inner.total)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Mutex instead of just a Vec?
//    - Many tasks finish at unpredictable times and all want to append
//    - Rust won't even compile shared mutation without synchronization
//    - The Mutex makes "append + update total" one atomic step
//
// 2. What is lock poisoning?
//    - If a thread panics while holding the lock, the Mutex is "poisoned"
//    - lock() then returns an Err to warn you the data may be half-updated
//    - Our appends can't panic halfway, so we treat poisoning as a bug
//
// 3. Why into_parts(self) instead of a getter for the Vec?
//    - Taking self by value means the store can have no other users left
//    - That makes "read only after all tasks finished" a compile-time fact
// -----------------------------------------------------------------------------
