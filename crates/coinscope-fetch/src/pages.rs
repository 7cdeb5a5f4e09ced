//! Paginated market listing.

use coinscope_types::{InputError, MarketEntry, Result};
use tracing::{debug, info};

use crate::schema::MarketItem;
use crate::{ApiClient, RequestDescriptor, Transport};

/// Maximum entries the listing endpoint returns per page.
pub const MAX_PER_PAGE: usize = 250;

/// Parameters of a market listing, besides paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketsQuery {
    /// Quote currency (e.g., "usd").
    pub vs_currency: String,
    /// Sort order (e.g., "market_cap_desc").
    pub order: String,
    /// Restrict to a category slug.
    pub category: Option<String>,
    /// Restrict to comma-separated coin ids.
    pub ids: Option<String>,
}

impl Default for MarketsQuery {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            order: "market_cap_desc".to_string(),
            category: None,
            ids: None,
        }
    }
}

impl MarketsQuery {
    /// Creates a query for the given quote currency with default ordering.
    #[must_use]
    pub fn new(vs_currency: impl Into<String>) -> Self {
        Self {
            vs_currency: vs_currency.into(),
            ..Self::default()
        }
    }

    /// Builds the request for one page.
    #[must_use]
    pub fn page_request(&self, per_page: usize, page: usize) -> RequestDescriptor {
        RequestDescriptor::new("/coins/markets")
            .param("vs_currency", &self.vs_currency)
            .param("order", &self.order)
            .param_opt("category", self.category.as_deref())
            .param_opt("ids", self.ids.as_deref())
            .param("per_page", per_page)
            .param("page", page)
            .param("sparkline", false)
    }
}

/// Progress after one page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// Page just fetched, starting at 1.
    pub page: usize,
    /// Pages planned for the requested total.
    pub pages_needed: usize,
    /// Entries accumulated so far.
    pub fetched: usize,
}

/// Fetches the top `total` market entries, paging at [`MAX_PER_PAGE`].
///
/// # Errors
///
/// See [`fetch_markets_paged`].
pub async fn fetch_markets<T: Transport>(
    client: &ApiClient<T>,
    total: usize,
    query: &MarketsQuery,
) -> Result<Vec<MarketEntry>> {
    fetch_markets_paged(client, total, MAX_PER_PAGE, query, |_| {}).await
}

/// Fetches the top `total` market entries with sequential page requests.
///
/// A `total` of zero is treated as one. Every request asks for
/// `min(page_size, total)` entries; iteration stops at the first page shorter
/// than that, and the result is truncated to `total`.
///
/// # Errors
///
/// Returns the classified failure of the first failing page, discarding pages
/// already fetched, or [`InputError::EmptyResult`] if the listing is empty.
pub async fn fetch_markets_paged<T: Transport>(
    client: &ApiClient<T>,
    total: usize,
    page_size: usize,
    query: &MarketsQuery,
    mut on_page: impl FnMut(PageProgress),
) -> Result<Vec<MarketEntry>> {
    let total = total.max(1);
    let page_size = page_size.max(1);
    let pages_needed = total.div_ceil(page_size);
    let per_page = page_size.min(total);

    let mut entries: Vec<MarketEntry> = Vec::with_capacity(per_page.min(MAX_PER_PAGE));

    for page in 1..=pages_needed {
        let request = query.page_request(per_page, page);
        let items: Vec<MarketItem> = client.execute_as(&request).await?;
        let received = items.len();
        entries.extend(items.into_iter().map(MarketEntry::from));

        info!(page, pages_needed, received, "fetched market page");
        on_page(PageProgress {
            page,
            pages_needed,
            fetched: entries.len(),
        });

        if received < per_page {
            debug!(page, received, per_page, "short page, listing exhausted");
            break;
        }
    }

    if entries.is_empty() {
        return Err(InputError::EmptyResult(format!(
            "market listing in {}",
            query.vs_currency
        ))
        .into());
    }

    entries.truncate(total);
    Ok(entries)
}
