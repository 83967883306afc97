//! Detail-Page Field Extractor: turns the case-summary container of a
//! detail page into a field-name to field-value record.
//!
//! The summary has no fixed schema; field sets vary per case type. Each
//! immediate child block of the container contributes one pair, decided
//! purely by the structural role of its elements.

use super::CASE_SUMMARY;
use crate::store::CaseRecord;
use crate::{Error, Result};
use eoka::Page;
use serde::Deserialize;
use tracing::debug;

/// Role of one element inside a field block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Sets the pending field name.
    Label,
    /// Sets the pending field value.
    Value,
    /// Takes no part in the pairing.
    Ignored,
}

/// Default element-role classifier for the portal's summary markup:
/// `<label>` elements carry field names, `<span>` elements field values.
pub fn classify_tag(tag: &str) -> FieldRole {
    match tag {
        "label" => FieldRole::Label,
        "span" => FieldRole::Value,
        _ => FieldRole::Ignored,
    }
}

#[derive(Deserialize)]
struct FieldNode {
    tag: String,
    text: String,
}

/// JavaScript that harvests the case-summary container into field blocks.
///
/// Expects `__case_summary` to hold the container's selector. Each direct
/// child `<div>` is one block; a block lists its descendant elements in
/// document order with rendered (whitespace-collapsed) text.
const DETAIL_JS: &str = r#"
(() => {
    const container = document.querySelector(__case_summary);
    if (!container) return JSON.stringify(null);

    const blocks = [];
    for (const div of container.querySelectorAll(':scope > div')) {
        const nodes = [];
        for (const el of div.querySelectorAll('*')) {
            nodes.push({
                tag: el.tagName.toLowerCase(),
                text: (el.textContent || '').trim().replace(/\s+/g, ' '),
            });
        }
        blocks.push(nodes);
    }

    return JSON.stringify(blocks);
})()
"#;

/// Harvest the case summary on the current page into a record.
pub async fn extract(page: &Page) -> Result<CaseRecord> {
    extract_with(page, classify_tag).await
}

/// Harvest the case summary using a custom element-role classifier.
pub async fn extract_with<F>(page: &Page, classify: F) -> Result<CaseRecord>
where
    F: Fn(&str) -> FieldRole,
{
    let js = format!("var __case_summary = '{}'; {}", CASE_SUMMARY, DETAIL_JS);
    let json: String = page.evaluate(&js).await?;

    let blocks: Option<Vec<Vec<FieldNode>>> = serde_json::from_str(&json)
        .map_err(|e| Error::Structure(format!("summary harvest parse error: {}", e)))?;
    let blocks = blocks
        .ok_or_else(|| Error::Structure(format!("case summary {} missing", CASE_SUMMARY)))?;

    let record = build_record(blocks, classify);
    debug!("Extracted {} field(s)", record.len());
    Ok(record)
}

/// Pair each block's label and value elements into one committed field.
///
/// Within a block, later labels and values overwrite earlier ones; the
/// pair is committed even when no label was seen (empty-string key).
/// Repeated field names across blocks keep the last value.
fn build_record<F>(blocks: Vec<Vec<FieldNode>>, classify: F) -> CaseRecord
where
    F: Fn(&str) -> FieldRole,
{
    let mut record = CaseRecord::new();
    for block in blocks {
        let mut field = String::new();
        let mut value = String::new();
        for node in block {
            match classify(&node.tag) {
                FieldRole::Label => field = node.text,
                FieldRole::Value => value = node.text,
                FieldRole::Ignored => {}
            }
        }
        record.insert(field, value);
    }
    record
}
