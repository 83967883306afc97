//! Results Locator: finds the rows of a results page whose anchor text
//! matches the queried name and collects their detail-page links.
//!
//! The page is harvested once via JavaScript into plain row data; all
//! matching and filtering decisions happen in Rust so they can be tested
//! without a browser.

use super::RESULTS_AREA;
use crate::{Error, Result};
use eoka::Page;
use serde::Deserialize;
use tracing::{debug, info};

/// A detail-page link discovered on a results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLink {
    /// Absolute URL of the case detail page.
    pub url: String,
    /// 1-based table row the link came from, for failure logs.
    pub row: usize,
}

/// What the results area held for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The portal displayed its explicit no-results notice.
    NoResults,
    /// The results table was present; zero or more rows matched the name.
    Matches(Vec<ResultLink>),
}

#[derive(Deserialize)]
struct RawResults {
    no_results: bool,
    has_table: bool,
    rows: Vec<RawRow>,
}

#[derive(Deserialize)]
struct RawRow {
    /// Rows without an inner cell are header or formatting rows.
    has_cell: bool,
    /// Rendered text of the first anchor in the first cell, if any.
    label: Option<String>,
    /// Resolved target of that anchor.
    href: Option<String>,
}

/// JavaScript that harvests the results area into row data.
///
/// Expects `__results_area` to hold the area's selector. The no-results
/// notice is a direct child `<label>` of the area; the results table a
/// direct child `<table>`. Anchor text is rendered text: trimmed, with
/// internal whitespace collapsed.
const RESULTS_JS: &str = r#"
(() => {
    const area = document.querySelector(__results_area);
    if (!area) return JSON.stringify(null);

    const noResults = area.querySelector(':scope > label') !== null;
    const table = area.querySelector(':scope > table');

    const rows = [];
    if (table) {
        for (const tr of table.querySelectorAll('tr')) {
            const cell = tr.querySelector('td');
            if (!cell) {
                rows.push({ has_cell: false, label: null, href: null });
                continue;
            }
            const a = cell.querySelector('a');
            rows.push({
                has_cell: true,
                label: a ? (a.textContent || '').trim().replace(/\s+/g, ' ') : null,
                href: a ? a.href : null,
            });
        }
    }

    return JSON.stringify({ no_results: noResults, has_table: table !== null, rows });
})()
"#;

/// Harvest the current page's results area and select links for `name`.
pub async fn locate(page: &Page, name: &str) -> Result<SearchOutcome> {
    let js = format!("var __results_area = '{}'; {}", RESULTS_AREA, RESULTS_JS);
    let json: String = page.evaluate(&js).await?;

    let raw: Option<RawResults> = serde_json::from_str(&json)
        .map_err(|e| Error::Structure(format!("results harvest parse error: {}", e)))?;
    let raw = raw
        .ok_or_else(|| Error::Structure(format!("results area {} missing", RESULTS_AREA)))?;

    let outcome = select_links(&raw, name)?;
    match &outcome {
        SearchOutcome::NoResults => info!("No results for '{}'", name),
        SearchOutcome::Matches(links) => {
            info!("Found {} matching case(s) for '{}'", links.len(), name)
        }
    }
    Ok(outcome)
}

/// Decide the outcome for one query from harvested row data.
///
/// Header rows (no inner cell) and rows without an anchor are skipped; a
/// bad row never aborts the enumeration of the remaining rows.
fn select_links(raw: &RawResults, name: &str) -> Result<SearchOutcome> {
    if raw.no_results {
        return Ok(SearchOutcome::NoResults);
    }
    if !raw.has_table {
        return Err(Error::Structure(format!(
            "results table missing under {}",
            RESULTS_AREA
        )));
    }

    let mut links = Vec::new();
    for (i, row) in raw.rows.iter().enumerate() {
        let row_no = i + 1;
        if !row.has_cell {
            continue;
        }
        let Some(label) = row.label.as_deref() else {
            debug!("row {}: no anchor, skipping", row_no);
            continue;
        };
        if !label_matches(label, name) {
            continue;
        }
        match row.href.as_deref() {
            Some(href) if !href.is_empty() => links.push(ResultLink {
                url: href.to_string(),
                row: row_no,
            }),
            _ => debug!("row {}: matched '{}' but anchor has no target", row_no, name),
        }
    }
    Ok(SearchOutcome::Matches(links))
}

/// Whether a row's anchor text identifies the queried party.
///
/// Strict equality on the rendered text, no case folding and no accent or
/// whitespace normalization. The portal echoes party names verbatim; if
/// the live site ever normalizes, this is the one place to change.
fn label_matches(label: &str, name: &str) -> bool {
    label == name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> RawRow {
        RawRow {
            has_cell: false,
            label: None,
            href: None,
        }
    }

    fn row(label: &str, href: &str) -> RawRow {
        RawRow {
            has_cell: true,
            label: Some(label.into()),
            href: Some(href.into()),
        }
    }

    fn table(rows: Vec<RawRow>) -> RawResults {
        RawResults {
            no_results: false,
            has_table: true,
            rows,
        }
    }

    fn links(outcome: SearchOutcome) -> Vec<ResultLink> {
        match outcome {
            SearchOutcome::Matches(links) => links,
            other => panic!("expected matches, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_match_filters_rows() {
        let raw = table(vec![
            row("ADILSON DA SILVA", "https://portal/case/1"),
            row("OUTRO NOME", "https://portal/case/2"),
        ]);
        let found = links(select_links(&raw, "ADILSON DA SILVA").unwrap());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "https://portal/case/1");
        assert_eq!(found[0].row, 1);
    }

    #[test]
    fn test_header_row_skipped() {
        let raw = table(vec![header(), row("X", "https://portal/case/1")]);
        let found = links(select_links(&raw, "X").unwrap());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "https://portal/case/1");
        assert_eq!(found[0].row, 2);
    }

    #[test]
    fn test_no_results_signal() {
        let raw = RawResults {
            no_results: true,
            has_table: false,
            rows: vec![],
        };
        assert_eq!(
            select_links(&raw, "ADILSON DA SILVA").unwrap(),
            SearchOutcome::NoResults
        );
    }

    #[test]
    fn test_missing_table_is_structure_error() {
        let raw = RawResults {
            no_results: false,
            has_table: false,
            rows: vec![],
        };
        let err = select_links(&raw, "ADILSON DA SILVA").unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_anchorless_row_skipped() {
        let raw = table(vec![
            RawRow {
                has_cell: true,
                label: None,
                href: None,
            },
            row("ADILSON DA SILVA", "https://portal/case/2"),
        ]);
        let found = links(select_links(&raw, "ADILSON DA SILVA").unwrap());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].row, 2);
    }

    #[test]
    fn test_matching_is_strict() {
        let raw = table(vec![
            row("Adilson da Silva", "https://portal/case/1"),
            row("ADILSON DA SILVA ", "https://portal/case/2"),
            row("ADILSON  DA SILVA", "https://portal/case/3"),
        ]);
        let found = links(select_links(&raw, "ADILSON DA SILVA").unwrap());
        assert!(found.is_empty());
    }

    #[test]
    fn test_matches_keep_row_order() {
        let raw = table(vec![
            row("ADILSON DA SILVA", "https://portal/case/1"),
            row("OUTRO NOME", "https://portal/case/2"),
            row("ADILSON DA SILVA", "https://portal/case/3"),
        ]);
        let found = links(select_links(&raw, "ADILSON DA SILVA").unwrap());
        assert_eq!(
            found,
            vec![
                ResultLink {
                    url: "https://portal/case/1".into(),
                    row: 1
                },
                ResultLink {
                    url: "https://portal/case/3".into(),
                    row: 3
                },
            ]
        );
    }

    #[test]
    fn test_matched_row_without_target_skipped() {
        let raw = table(vec![
            RawRow {
                has_cell: true,
                label: Some("ADILSON DA SILVA".into()),
                href: Some("".into()),
            },
            row("ADILSON DA SILVA", "https://portal/case/2"),
        ]);
        let found = links(select_links(&raw, "ADILSON DA SILVA").unwrap());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].row, 2);
    }

    #[test]
    fn test_empty_table_yields_no_matches() {
        let raw = table(vec![]);
        let found = links(select_links(&raw, "ADILSON DA SILVA").unwrap());
        assert!(found.is_empty());
    }
}
