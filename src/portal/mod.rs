//! Navigation against the eproc consultation portal.

pub mod detail;
pub mod results;

use crate::config::Timeouts;
use crate::{Error, Result};
use eoka::Page;
use tracing::{debug, info};

/// Party-name input on the consultation form.
pub const SEARCH_INPUT: &str = "#txtStrParte";

/// Submit control of the consultation form.
pub const SEARCH_SUBMIT: &str = "#sbmNovo";

/// Container holding either the results table or the no-results notice.
pub const RESULTS_AREA: &str = "#divInfraAreaTabela";

/// Case-summary container on a detail page.
pub const CASE_SUMMARY: &str = "#fldAssuntos";

/// Open the consultation page and wait for the search form.
pub async fn open_search(page: &Page, url: &str, timeouts: &Timeouts) -> Result<()> {
    info!("Navigating to: {}", url);
    page.goto(url)
        .await
        .map_err(|e| Error::Navigation(format!("{}: {}", url, e)))?;
    page.wait_for(SEARCH_INPUT, timeouts.element_ms)
        .await
        .map_err(|_| Error::Navigation(format!("search form did not appear at {}", url)))?;
    Ok(())
}

/// Fill the party-name field, submit, and wait for the results area.
pub async fn submit_query(page: &Page, name: &str, timeouts: &Timeouts) -> Result<()> {
    page.wait_for(SEARCH_INPUT, timeouts.element_ms)
        .await
        .map_err(|_| Error::ElementNotFound(format!("search input {}", SEARCH_INPUT)))?;
    debug!("fill: {} = '{}'", SEARCH_INPUT, name);
    page.fill(SEARCH_INPUT, name)
        .await
        .map_err(|e| Error::ElementNotFound(format!("search input {}: {}", SEARCH_INPUT, e)))?;

    page.wait_for(SEARCH_SUBMIT, timeouts.element_ms)
        .await
        .map_err(|_| Error::ElementNotFound(format!("submit control {}", SEARCH_SUBMIT)))?;
    debug!("click: {}", SEARCH_SUBMIT);
    page.click(SEARCH_SUBMIT)
        .await
        .map_err(|e| Error::ElementNotFound(format!("submit control {}: {}", SEARCH_SUBMIT, e)))?;

    page.wait_for(RESULTS_AREA, timeouts.element_ms)
        .await
        .map_err(|_| {
            Error::Navigation(format!(
                "results area did not appear after submitting '{}'",
                name
            ))
        })?;
    Ok(())
}

/// Open a case detail page and wait for its summary container.
///
/// A loaded page without the summary container is a structure error so the
/// caller can skip the case rather than abort the query.
pub async fn open_case(page: &Page, url: &str, timeouts: &Timeouts) -> Result<()> {
    debug!("goto case: {}", url);
    page.goto(url)
        .await
        .map_err(|e| Error::Navigation(format!("{}: {}", url, e)))?;
    page.wait_for(CASE_SUMMARY, timeouts.element_ms)
        .await
        .map_err(|_| {
            Error::Structure(format!("case summary {} missing at {}", CASE_SUMMARY, url))
        })?;
    Ok(())
}
