//! Free-text search and ticker symbol resolution.

use coinscope_types::{InputError, Result, SearchCandidate};
use tracing::{debug, warn};

use crate::schema::SearchResponse;
use crate::{ApiClient, RequestDescriptor, Transport};

/// Searches coins matching a free-text query.
///
/// # Errors
///
/// Returns the classified failure of the search request.
pub async fn search<T: Transport>(
    client: &ApiClient<T>,
    query: &str,
) -> Result<Vec<SearchCandidate>> {
    let request = RequestDescriptor::new("/search").param("query", query.trim());
    let response: SearchResponse = client.execute_as(&request).await?;

    Ok(response
        .coins
        .unwrap_or_default()
        .into_iter()
        .map(SearchCandidate::from)
        .collect())
}

/// Resolves one ticker symbol to a coin identifier.
///
/// Returns the first search candidate whose symbol equals `symbol`, ignoring
/// case, or `None` if no candidate matches.
///
/// # Errors
///
/// Returns the classified failure of the search request.
pub async fn resolve_symbol<T: Transport>(
    client: &ApiClient<T>,
    symbol: &str,
) -> Result<Option<String>> {
    let folded = symbol.trim().to_lowercase();
    if folded.is_empty() {
        return Ok(None);
    }

    let candidates = search(client, &folded).await?;
    Ok(candidates
        .into_iter()
        .find(|candidate| candidate.matches_symbol(&folded))
        .map(|candidate| candidate.id))
}

/// Resolves ticker symbols to coin identifiers, one search per symbol.
///
/// The output follows input order. Unmatched symbols are skipped with a
/// warning and duplicates are resolved independently.
///
/// # Errors
///
/// Returns [`InputError::NoSymbolsResolved`] if no symbol matched, or the
/// classified failure of the first failing search request.
pub async fn resolve_symbols<T, S>(client: &ApiClient<T>, symbols: &[S]) -> Result<Vec<String>>
where
    T: Transport,
    S: AsRef<str>,
{
    let mut ids = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let symbol = symbol.as_ref();
        match resolve_symbol(client, symbol).await? {
            Some(id) => {
                debug!(symbol, id = %id, "resolved symbol");
                ids.push(id);
            }
            None => warn!(symbol, "no coin matches symbol, skipping"),
        }
    }

    if ids.is_empty() {
        let requested = symbols.iter().map(|s| s.as_ref().to_string()).collect();
        return Err(InputError::NoSymbolsResolved(requested).into());
    }

    Ok(ids)
}
