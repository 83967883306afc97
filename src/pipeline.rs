//! Case Pipeline Orchestrator: drives one browser session through every
//! configured query and aggregates the extracted records.
//!
//! Containment increases outward: a bad row or field block is handled
//! inside the locator/extractor, a bad case is skipped by
//! [`collect_cases`], and a failed query commits an empty result set and
//! lets the run continue. Only browser launch failure is fatal.

use crate::config::{Config, Timeouts};
use crate::portal::results::{ResultLink, SearchOutcome};
use crate::portal;
use crate::store::{CaseRecord, ResultStore, Snapshot};
use crate::Result;
use eoka::{Browser, Page};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Counters for one finished run.
#[derive(Debug)]
pub struct RunSummary {
    /// Queries processed.
    pub queries: usize,
    /// Records extracted across all queries.
    pub records: usize,
    /// Queries aborted before their cases could be visited.
    pub failed_queries: usize,
    /// Cases skipped after their query's results page was parsed.
    pub failed_cases: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Executes scrape runs over a single browser session.
pub struct Scraper {
    browser: Browser,
    page: Page,
    config: Config,
    store: ResultStore,
}

impl Scraper {
    /// Launch the browser session.
    pub async fn launch(config: &Config) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless: config.browser.headless,
            proxy: config.browser.proxy.clone(),
            user_agent: config.browser.user_agent.clone(),
            viewport_width: config
                .browser
                .viewport
                .as_ref()
                .map(|v| v.width)
                .unwrap_or(1920),
            viewport_height: config
                .browser
                .viewport
                .as_ref()
                .map(|v| v.height)
                .unwrap_or(1080),
            ..Default::default()
        };

        debug!(
            "Launching browser (headless: {}, proxy: {:?})",
            config.browser.headless, config.browser.proxy
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            config: config.clone(),
            store: ResultStore::new(),
        })
    }

    /// Process every configured name in order, containing per-query
    /// failures. Every submitted name ends up keyed in the store, with an
    /// empty list when its query failed or matched nothing.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let start = Instant::now();
        let mut failed_queries = 0;
        let mut failed_cases = 0;

        let names = self.config.names.clone();
        let total = names.len();
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 && self.config.timeouts.query_pause_ms > 0 {
                // Pacing toward the portal, not a readiness wait.
                tokio::time::sleep(Duration::from_millis(self.config.timeouts.query_pause_ms))
                    .await;
            }

            info!("Query {}/{}: '{}'", i + 1, total, name);
            let results = match self.run_query(&name).await {
                Ok((records, skipped)) => {
                    failed_cases += skipped;
                    records
                }
                Err(e) => {
                    warn!("Query '{}' failed: {}", name, e);
                    failed_queries += 1;
                    self.save_failure_screenshot(&name).await;
                    Vec::new()
                }
            };
            self.store.record(name, results);
        }

        Ok(RunSummary {
            queries: self.store.queries(),
            records: self.store.total_records(),
            failed_queries,
            failed_cases,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn run_query(&mut self, name: &str) -> Result<(Vec<CaseRecord>, usize)> {
        let timeouts = &self.config.timeouts;
        portal::open_search(&self.page, &self.config.portal.url, timeouts).await?;
        portal::submit_query(&self.page, name, timeouts).await?;

        match portal::results::locate(&self.page, name).await? {
            SearchOutcome::NoResults => Ok((Vec::new(), 0)),
            SearchOutcome::Matches(links) => {
                Ok(collect_cases(&self.page, name, &links, timeouts).await)
            }
        }
    }

    async fn save_failure_screenshot(&self, name: &str) {
        if !self.config.output.failure_screenshots {
            return;
        }
        let dir = PathBuf::from(&self.config.output.dir);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Failed to create screenshot dir: {}", e);
            return;
        }
        let path = dir.join(format!(
            "falha_{}_{}.png",
            name.to_lowercase().replace(' ', "_"),
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ));
        info!("Saving failure screenshot to: {}", path.display());
        if let Ok(data) = self.page.screenshot().await {
            if let Err(e) = std::fs::write(&path, data) {
                warn!("Failed to save screenshot: {}", e);
            }
        }
    }

    /// Serializable view of everything extracted so far.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot(&self.config.portal.url)
    }

    /// Close the browser.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

/// Visit each link in order and extract its case record.
///
/// A failed case is logged with its row and URL and skipped; it never
/// aborts the remaining links. Returns the extracted records and the
/// number of skipped cases.
pub async fn collect_cases(
    page: &Page,
    name: &str,
    links: &[ResultLink],
    timeouts: &Timeouts,
) -> (Vec<CaseRecord>, usize) {
    let mut records = Vec::with_capacity(links.len());
    let mut skipped = 0;
    for link in links {
        match visit_case(page, link, timeouts).await {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(
                    "Case at row {} for '{}' skipped ({}): {}",
                    link.row, name, link.url, e
                );
                skipped += 1;
            }
        }
    }
    (records, skipped)
}

async fn visit_case(page: &Page, link: &ResultLink, timeouts: &Timeouts) -> Result<CaseRecord> {
    portal::open_case(page, &link.url, timeouts).await?;
    portal::detail::extract(page).await
}
