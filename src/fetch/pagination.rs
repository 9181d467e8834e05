// src/fetch/pagination.rs

use super::session::Session;
use crate::error::{FetchError, FetchResult};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Append `per_page`/`page` query parameters to an endpoint.
pub fn page_endpoint(endpoint: &str, per_page: usize, page: usize) -> String {
    let sep = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}per_page={}&page={}", endpoint, sep, per_page, page)
}

impl Session {
    /// Walk pages of a list resource in order, collecting at most `cap` items.
    /// Stops on a short page, a not-found page, or once `cap` is reached
    /// (possibly mid-page).
    pub async fn fetch_paginated(
        &self,
        endpoint: &str,
        per_page: usize,
        cap: usize,
    ) -> FetchResult<Vec<Value>> {
        let mut items = Vec::new();
        if per_page == 0 || cap == 0 {
            return Ok(items);
        }

        let mut page = 1;
        loop {
            let page_items = match self.fetch(&page_endpoint(endpoint, per_page, page)).await? {
                Value::Array(values) => values,
                Value::Null => break,
                _ => {
                    return Err(FetchError::Decode(format!(
                        "{}: expected a list on page {}",
                        endpoint, page
                    )))
                }
            };

            let received = page_items.len();
            let room = cap - items.len();
            items.extend(page_items.into_iter().take(room));

            if items.len() >= cap || received < per_page {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Typed variant of [`Session::fetch_paginated`].
    pub async fn fetch_paginated_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        per_page: usize,
        cap: usize,
    ) -> FetchResult<Vec<T>> {
        self.fetch_paginated(endpoint, per_page, cap)
            .await?
            .into_iter()
            .map(|v| {
                serde_json::from_value(v)
                    .map_err(|e| FetchError::Decode(format!("{}: {}", endpoint, e)))
            })
            .collect()
    }

    /// Fetch pages `1..=pages` concurrently and flatten them in page order.
    /// A page that fails or is not a list counts as empty; items that do not
    /// decode as `T` are dropped with a warning.
    pub async fn fetch_pages_parallel<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        per_page: usize,
        pages: usize,
    ) -> Vec<T> {
        let requests = (1..=pages).map(|page| {
            let url = page_endpoint(endpoint, per_page, page);
            async move {
                let items: Vec<T> = match self.fetch(&url).await {
                    Ok(Value::Array(values)) => values
                        .into_iter()
                        .filter_map(|v| match serde_json::from_value::<T>(v) {
                            Ok(item) => Some(item),
                            Err(e) => {
                                warn!(%url, error = %e, "dropping list item that failed to decode");
                                None
                            }
                        })
                        .collect(),
                    Ok(_) => Vec::new(),
                    Err(e) => {
                        warn!(
                            %url,
                            kind = e.kind(),
                            error = %e,
                            "page fetch failed, treating as empty"
                        );
                        Vec::new()
                    }
                };
                items
            }
        });

        join_all(requests).await.into_iter().flatten().collect()
    }
}
