//! Scroll driver.
//!
//! Pages through a scrolled search until the store returns an empty page.
//! The loop is bounded twice: by `ScrollConfig::max_pages` and by an overall
//! deadline. Dropping the returned future cancels it between round-trips.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::ScrollConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchConnector;
use crate::types::{ScrollEnd, ScrollOutcome, ScrollPage};
use search_demo_shared::SearchHit;

/// Run `query` against `index` as a scrolled search and collect every hit.
///
/// Each field of each hit is logged as it arrives. The scroll context is
/// cleared once the loop ends; a failure to clear it is only logged.
///
/// # Returns
///
/// * `Ok(ScrollOutcome)` - With `ScrollEnd::Exhausted` when an empty page was
///   seen, or `ScrollEnd::PageLimit` when `max_pages` pages were fetched first
/// * `Err(SearchError::Timeout)` - When the whole scroll exceeds `config.deadline`
/// * `Err(SearchError)` - When any page request fails
#[instrument(skip(connector, query, config), fields(page_size = config.page_size))]
pub async fn scroll_all<C>(
    connector: &C,
    index: &str,
    query: &Value,
    config: &ScrollConfig,
) -> Result<ScrollOutcome, SearchError>
where
    C: SearchConnector + ?Sized,
{
    let mut last_scroll_id = None;

    let result = tokio::time::timeout(
        config.deadline,
        drive(connector, index, query, config, &mut last_scroll_id),
    )
    .await
    .unwrap_or_else(|_| Err(SearchError::timeout("scroll", config.deadline)));

    if let Some(scroll_id) = last_scroll_id {
        if let Err(e) = connector.clear_scroll(&scroll_id).await {
            warn!(error = %e, "Failed to clear scroll context");
        }
    }

    let outcome = result?;
    info!(
        hits = outcome.hits.len(),
        pages = outcome.pages,
        end = ?outcome.end,
        "Scroll finished"
    );
    Ok(outcome)
}

async fn drive<C>(
    connector: &C,
    index: &str,
    query: &Value,
    config: &ScrollConfig,
    last_scroll_id: &mut Option<String>,
) -> Result<ScrollOutcome, SearchError>
where
    C: SearchConnector + ?Sized,
{
    let mut hits = Vec::new();
    let mut page = connector.open_scroll(index, query, config).await?;
    let mut pages = 1;

    loop {
        if page.scroll_id.is_some() {
            last_scroll_id.clone_from(&page.scroll_id);
        }

        if page.is_empty() {
            return Ok(ScrollOutcome {
                hits,
                pages,
                end: ScrollEnd::Exhausted,
            });
        }

        log_page(&page, hits.len());
        hits.extend(page.hits);

        let Some(scroll_id) = page.scroll_id else {
            return Ok(ScrollOutcome {
                hits,
                pages,
                end: ScrollEnd::Exhausted,
            });
        };

        if pages >= config.max_pages {
            warn!(
                max_pages = config.max_pages,
                hits = hits.len(),
                "Scroll stopped at page limit"
            );
            return Ok(ScrollOutcome {
                hits,
                pages,
                end: ScrollEnd::PageLimit,
            });
        }

        page = connector
            .next_scroll_page(&scroll_id, config.keep_alive)
            .await?;
        pages += 1;
        debug!(page = pages, hits = page.hits.len(), "Fetched scroll page");
    }
}

fn log_page(page: &ScrollPage, offset: usize) {
    for (i, hit) in page.hits.iter().enumerate() {
        log_hit(offset + i + 1, hit);
    }
}

fn log_hit(position: usize, hit: &SearchHit) {
    for (key, value) in &hit.source {
        info!(hit = position, id = %hit.id, field = %key, value = %value, "Search hit");
    }
}
