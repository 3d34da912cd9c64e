//! Command as data: a queue of boxed closures run later against some state,
//! and an async variant holding boxed futures.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::VecDeque;
use std::future::Future;
use std::time::{Duration, Instant};

pub type Job<S> = Box<dyn FnOnce(&mut S) -> Result<String>>;

pub struct CommandQueue<S> {
    jobs: VecDeque<(String, Job<S>)>,
}

impl<S> Default for CommandQueue<S> {
    fn default() -> Self {
        Self { jobs: VecDeque::new() }
    }
}

impl<S> CommandQueue<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue<F>(&mut self, label: &str, job: F) -> &mut Self
    where
        F: FnOnce(&mut S) -> Result<String> + 'static,
    {
        self.jobs.push_back((label.to_string(), Box::new(job)));
        self
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Runs every job in FIFO order. A failing job is reported in its slot
    /// and the rest still run. The queue is empty afterwards.
    pub fn run_all(&mut self, state: &mut S) -> Vec<Result<String>> {
        let mut results = Vec::with_capacity(self.jobs.len());
        while let Some((label, job)) = self.jobs.pop_front() {
            let result = job(state);
            if let Err(err) = &result {
                tracing::warn!(command = %label, error = %err, "command failed");
            }
            results.push(result);
        }
        results
    }
}

pub struct AsyncCommandQueue {
    latency: Duration,
    jobs: VecDeque<(String, BoxFuture<'static, Result<String>>)>,
}

impl AsyncCommandQueue {
    /// `latency` is slept before each job to fake a remote call.
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            jobs: VecDeque::new(),
        }
    }

    pub fn enqueue<F>(&mut self, label: &str, job: F) -> &mut Self
    where
        F: Future<Output = Result<String>> + Send + 'static,
    {
        self.jobs.push_back((label.to_string(), job.boxed()));
        self
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Awaits the jobs one at a time, in the order they were queued.
    pub async fn drain(&mut self) -> Vec<Result<String>> {
        let mut results = Vec::with_capacity(self.jobs.len());
        while let Some((label, job)) = self.jobs.pop_front() {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let result = job.await;
            tracing::debug!(command = %label, ok = result.is_ok(), "async command finished");
            results.push(result);
        }
        results
    }
}

#[derive(Debug, Default)]
pub struct Document {
    pub text: String,
}

fn editor_queue() -> CommandQueue<Document> {
    let mut queue = CommandQueue::new();
    queue
        .enqueue("append title", |doc: &mut Document| {
            doc.text.push_str("# Patterns\n");
            Ok("title appended".into())
        })
        .enqueue("append body", |doc: &mut Document| {
            doc.text.push_str("Commands are just values.\n");
            Ok(format!("document is {} bytes", doc.text.len()))
        })
        .enqueue("delete line 9", |doc: &mut Document| {
            let lines = doc.text.lines().count();
            Err(PatternError::Validation(format!("line 9 out of range ({lines} lines)")))
        })
        .enqueue("uppercase", |doc: &mut Document| {
            doc.text = doc.text.to_uppercase();
            Ok("uppercased".into())
        });
    queue
}

async fn fetch(resource: &'static str) -> Result<String> {
    tokio::task::yield_now().await;
    Ok(format!("fetched {resource}"))
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.section("Synchronous queue");
    let mut queue = editor_queue();
    println!("{} commands queued", queue.len());
    let mut doc = Document::default();
    for result in queue.run_all(&mut doc) {
        match result {
            Ok(message) => println!("  ok    {message}"),
            Err(err) => println!("  error {err}"),
        }
    }
    print!("{}", doc.text);

    ctx.section("Async queue");
    let mut jobs = AsyncCommandQueue::new(ctx.latency());
    jobs.enqueue("users", fetch("/users"))
        .enqueue("orders", fetch("/orders"))
        .enqueue("broken", async { Err::<String, _>(PatternError::AccessDenied("/admin".into())) })
        .enqueue("stock", fetch("/stock"));

    let started = Instant::now();
    let results = ctx.runtime()?.block_on(jobs.drain());
    for result in &results {
        match result {
            Ok(message) => println!("  ok    {message}"),
            Err(err) => println!("  error {err}"),
        }
    }
    println!("{} jobs in {:?}", results.len(), started.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_in_order_and_survives_failure() {
        let mut queue = editor_queue();
        assert_eq!(queue.len(), 4);
        let mut doc = Document::default();
        let results = queue.run_all(&mut doc);

        assert_eq!(results.len(), 4);
        assert!(results[0].is_ok());
        assert!(matches!(results[2], Err(PatternError::Validation(_))));
        assert_eq!(results[3].as_ref().unwrap(), "uppercased");
        assert_eq!(doc.text, "# PATTERNS\nCOMMANDS ARE JUST VALUES.\n");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_jobs_capture_values() {
        let mut queue: CommandQueue<Vec<u32>> = CommandQueue::new();
        for n in 1..=3 {
            queue.enqueue("push", move |v: &mut Vec<u32>| {
                v.push(n * 10);
                Ok(n.to_string())
            });
        }
        let mut state = Vec::new();
        let labels: Vec<String> = queue.run_all(&mut state).into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(state, [10, 20, 30]);
        assert_eq!(labels, ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_async_drain_fifo() {
        let mut jobs = AsyncCommandQueue::new(Duration::ZERO);
        jobs.enqueue("a", fetch("/a"))
            .enqueue("fail", async { Err::<String, _>(PatternError::Validation("x".into())) })
            .enqueue("b", fetch("/b"));
        assert_eq!(jobs.len(), 3);

        let results = jobs.drain().await;
        assert_eq!(results[0].as_ref().unwrap(), "fetched /a");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap(), "fetched /b");
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_async_latency_per_job() {
        let mut jobs = AsyncCommandQueue::new(Duration::from_millis(20));
        jobs.enqueue("a", fetch("/a")).enqueue("b", fetch("/b"));
        let started = Instant::now();
        jobs.drain().await;
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
