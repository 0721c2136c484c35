//! Harvest orchestrator.
//!
//! Declares the fixed set of (source, parameters) tasks, dispatches them
//! concurrently through the shared [`Fetcher`], isolates per-task
//! failures, and flattens the surviving results into one record
//! collection. The run is a fixed fan-out/fan-in: every dispatched task
//! reaches a terminal state before `run` returns, and no failure of one
//! task cancels or affects its siblings.

use crate::fetch::Fetcher;
use crate::harvest::sources::{CatalogPageExtractor, RankedListExtractor, SearchApiExtractor};
use crate::harvest::traits::SourceExtractor;
use crate::model::Book;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info};
use url::Url;

/// Catalogue pagination root.
pub const CATALOG_BASE_URL: &str = "https://books.toscrape.com/catalogue/";

/// Search API endpoint.
pub const SEARCH_API_URL: &str = "https://openlibrary.org/search.json";

/// Ranked top-downloads page.
pub const RANKED_LIST_URL: &str = "https://www.gutenberg.org/browse/scores/top";

/// Failure to construct the declared task table.
///
/// This is the only fatal error class around a harvest run: a plan that
/// cannot be built is a configuration defect, raised before any fetch.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid task URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// One (source, parameters) unit of work: a URL to fetch and the
/// extractor that turns its payload into records.
pub struct HarvestTask {
    url: Url,
    extractor: Arc<dyn SourceExtractor>,
}

impl HarvestTask {
    pub fn new(url: Url, extractor: Arc<dyn SourceExtractor>) -> Self {
        Self { url, extractor }
    }
}

/// Coordinates one bounded harvest batch over a static task table.
pub struct HarvestOrchestrator {
    fetcher: Arc<Fetcher>,
    tasks: Vec<HarvestTask>,
}

impl HarvestOrchestrator {
    /// Creates an orchestrator with an empty task table.
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            tasks: Vec::new(),
        }
    }

    /// Replaces the task table.
    pub fn with_tasks(mut self, tasks: Vec<HarvestTask>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Declares the fixed production plan: three catalogue pages, two
    /// search queries, and the ranked top list.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] if a task URL cannot be constructed.
    pub fn default_plan(fetcher: Fetcher) -> Result<Self, PlanError> {
        let catalog = Arc::new(CatalogPageExtractor::new());
        let search = Arc::new(SearchApiExtractor::new());
        let ranked = Arc::new(RankedListExtractor::new());

        let mut tasks = Vec::new();
        for page in 1..=3 {
            let url = Url::parse(&format!("{CATALOG_BASE_URL}page-{page}.html"))?;
            tasks.push(HarvestTask::new(url, Arc::clone(&catalog) as Arc<dyn SourceExtractor>));
        }
        for query in ["python programming", "data science"] {
            let url = Url::parse_with_params(SEARCH_API_URL, [("q", query), ("limit", "20")])?;
            tasks.push(HarvestTask::new(url, Arc::clone(&search) as Arc<dyn SourceExtractor>));
        }
        tasks.push(HarvestTask::new(Url::parse(RANKED_LIST_URL)?, ranked));

        Ok(Self::new(fetcher).with_tasks(tasks))
    }

    /// Runs every declared task concurrently and returns the flattened
    /// record collection.
    ///
    /// Each task composes one fetch with one extraction. A failed fetch
    /// degrades that task to zero records (the fetcher already logged the
    /// failure); an unexpected task defect (e.g. a panic) is caught at
    /// the join point, logged, and likewise contributes zero records.
    /// Cross-task completion order is unspecified; records from one task
    /// keep their extractor's emission order.
    pub async fn run(&self) -> Vec<Book> {
        let start = Instant::now();
        let mut set = JoinSet::new();

        for task in &self.tasks {
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&task.extractor);
            let url = task.url.clone();
            set.spawn(async move {
                match fetcher.fetch(&url).await {
                    Ok(body) => extractor.extract(&body, &url),
                    Err(_) => Vec::new(),
                }
            });
        }

        let mut records = Vec::new();
        let mut failed_tasks = 0usize;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(batch) => records.extend(batch),
                Err(err) => {
                    failed_tasks += 1;
                    error!(error = %err, "harvest task failed");
                }
            }
        }

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            tasks = self.tasks.len(),
            failed_tasks,
            records = records.len(),
            "harvest run completed"
        );

        records
    }
}
