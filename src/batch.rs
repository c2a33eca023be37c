//! Parallel processing of many pages.
//!
//! Pages are independent, so they run on a bounded rayon pool. Workers
//! report back over a channel in completion order and results are put back
//! into page-number order at the end. A page that panics is replaced by an
//! empty placeholder so its siblings still complete.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use crossbeam_channel::unbounded;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};
use crate::layout::{LayoutOptions, LayoutProcessor};
use crate::model::{DocumentLayout, Page, PageResult};

/// Runs the layout pipeline over a batch of pages.
#[derive(Debug)]
pub struct BatchProcessor {
    processor: LayoutProcessor,
    max_workers: usize,
}

impl BatchProcessor {
    /// Create a batch processor from options.
    pub fn new(options: LayoutOptions) -> Self {
        let max_workers = options.max_workers.max(1);
        Self {
            processor: LayoutProcessor::new(options),
            max_workers,
        }
    }

    /// Use a preconfigured page processor.
    pub fn with_processor(mut self, processor: LayoutProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// Set the maximum number of workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    /// Process all pages and collect the results in page-number order.
    pub fn process(&self, pages: Vec<Page>) -> DocumentLayout {
        let start = Instant::now();
        let results = run_pages(pages, self.max_workers, |page| self.processor.process(page));
        let elapsed = start.elapsed();

        let layout = DocumentLayout::new(results, elapsed);
        log::debug!(
            "Processed {} pages ({} reordered, {} failed) in {:?}",
            layout.page_count(),
            layout.reordered_page_count(),
            layout.failed_pages().len(),
            elapsed
        );
        layout
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

/// Process pages with the given options.
pub fn process_pages(pages: Vec<Page>, options: &LayoutOptions) -> DocumentLayout {
    BatchProcessor::new(options.clone()).process(pages)
}

/// Apply `process` to every page using at most `max_workers` threads.
///
/// Results come back sorted by page number. A page whose processing panics
/// yields [`PageResult::placeholder`].
pub fn run_pages<F>(pages: Vec<Page>, max_workers: usize, process: F) -> Vec<PageResult>
where
    F: Fn(Page) -> PageResult + Sync,
{
    let workers = max_workers.min(pages.len());
    let mut results = if workers <= 1 {
        run_sequential(pages, &process)
    } else {
        match build_pool(workers) {
            Ok(pool) => run_parallel(&pool, pages, &process),
            Err(e) => {
                log::warn!("{}, processing pages sequentially", e);
                run_sequential(pages, &process)
            }
        }
    };

    results.sort_by_key(|r| r.number);
    results
}

fn build_pool(workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("colflow-page-{}", i))
        .build()
        .map_err(Error::from)
}

fn run_sequential<F>(pages: Vec<Page>, process: &F) -> Vec<PageResult>
where
    F: Fn(Page) -> PageResult + Sync,
{
    pages
        .into_iter()
        .map(|page| process_guarded(page, process))
        .collect()
}

fn run_parallel<F>(pool: &ThreadPool, pages: Vec<Page>, process: &F) -> Vec<PageResult>
where
    F: Fn(Page) -> PageResult + Sync,
{
    let (tx, rx) = unbounded::<(usize, PageResult)>();

    pool.scope(|scope| {
        for (index, page) in pages.into_iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = process_guarded(page, process);
                // The receiver outlives the scope, so sending cannot fail.
                let _ = tx.send((index, result));
            });
        }
    });
    drop(tx);

    let mut collected: Vec<(usize, PageResult)> = rx.iter().collect();
    collected.sort_by_key(|(index, _)| *index);
    collected.into_iter().map(|(_, result)| result).collect()
}

/// Run one page, turning a panic into a placeholder result.
fn process_guarded<F>(page: Page, process: &F) -> PageResult
where
    F: Fn(Page) -> PageResult + Sync,
{
    let number = page.number;
    match catch_unwind(AssertUnwindSafe(|| process(page))) {
        Ok(result) => result,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("Page {} failed: {}", number, message);
            PageResult::placeholder(number)
        }
    }
}
