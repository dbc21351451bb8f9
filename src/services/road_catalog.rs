//! Trait and pagination logic for discovering road names in a city.

use anyhow::Result;
use tracing::{debug, info};

/// One page of a place-search response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoiPage {
    /// `true` when the provider reported status `"1"`.
    pub ok: bool,
    pub info: Option<String>,
    /// Place names on the page, in provider order. Entries without a name
    /// are already dropped.
    pub names: Vec<String>,
}

/// Abstraction over a place-search provider (e.g., AMap).
#[async_trait::async_trait]
pub trait RoadCatalog: Send + Sync {
    /// Fetches one page (1-based) of roads matching `keyword` in `city`.
    async fn fetch_page(&self, city: &str, keyword: &str, page: u32) -> Result<PoiPage>;
}

/// Collects up to `pages` pages of road names, deduplicated in first-seen
/// order.
///
/// Stops early on the first page with a non-success status or no results.
#[tracing::instrument(skip(catalog))]
pub async fn list_roads<C: RoadCatalog + ?Sized>(
    catalog: &C,
    city: &str,
    keyword: &str,
    pages: u32,
) -> Result<Vec<String>> {
    let mut roads: Vec<String> = Vec::new();

    for page in 1..=pages {
        let result = catalog.fetch_page(city, keyword, page).await?;
        if !result.ok {
            info!(page, info = result.info.as_deref().unwrap_or(""), "Road search stopped");
            break;
        }
        if result.names.is_empty() {
            debug!(page, "Empty road search page");
            break;
        }

        for name in result.names {
            if !roads.contains(&name) {
                roads.push(name);
            }
        }
    }

    info!(total = roads.len(), "Road names collected");
    Ok(roads)
}
