//! Link-chained pagination with concurrent per-page handling.
//!
//! Fetches are strictly sequential: the server only reveals page N+1 in the
//! `Link` header of page N. Each page body is handed to the handler on its own
//! blocking task so a slow parse never delays the next fetch. Every dispatched
//! handler is joined before [`Client::paginate`] returns, on success and on
//! failure alike.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::Method;
use tokio::task::JoinSet;
use url::Url;

use crate::error::{ClientError, Result, PAYMENT_REQUIRED};
use crate::http::{Client, RequestBody, ACCEPT_JSON};

/// One page of a paginated response.
#[derive(Debug, Clone)]
pub struct Page {
    /// Zero-based position in fetch order.
    pub number: usize,
    pub body: Bytes,
}

/// Summary of a completed pagination run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationStats {
    pub pages: usize,
    pub bytes: usize,
}

impl Client {
    /// Walk the `next` relation from `start`, dispatching each page to
    /// `handler`.
    ///
    /// A failed fetch stops the walk immediately; handlers already dispatched
    /// still run to completion and the fetch error is returned. Otherwise the
    /// first handler error, if any, is returned. A panicking handler is
    /// re-raised after every other handler has finished.
    pub async fn paginate<F>(&self, start: Url, handler: F) -> Result<PaginationStats>
    where
        F: Fn(Page) -> Result<()> + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let mut tasks = JoinSet::new();
        let mut stats = PaginationStats { pages: 0, bytes: 0 };
        let mut endpoint = start;

        let fetched: Result<()> = loop {
            if self.is_cancelled() {
                break Err(ClientError::Cancelled);
            }

            let response = match self
                .request(Method::GET, endpoint.clone(), RequestBody::Empty, ACCEPT_JSON)
                .await
                .and_then(|r| r.error_for_status(&[PAYMENT_REQUIRED]))
            {
                Ok(response) => response,
                Err(e) => break Err(e),
            };

            let next = response.next_link().map(|uri| self.resolve(uri)).transpose();

            let page = Page {
                number: stats.pages,
                body: response.body,
            };
            stats.pages += 1;
            stats.bytes += page.body.len();

            tracing::debug!(page = page.number, bytes = page.body.len(), "Dispatching page");
            let handler = Arc::clone(&handler);
            tasks.spawn_blocking(move || handler(page));

            match next {
                Ok(Some(url)) => endpoint = url,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        let handled = join_all(&mut tasks).await;

        if let Err(e) = &fetched {
            tracing::debug!(pages = stats.pages, error = %e, "Pagination stopped early");
        }
        fetched?;
        handled?;
        Ok(stats)
    }
}

/// Wait for every task, keeping the first handler error.
async fn join_all(tasks: &mut JoinSet<Result<()>>) -> Result<()> {
    let mut first_error = None;
    let mut panic = None;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                first_error.get_or_insert(e);
            }
            Err(join_error) if join_error.is_panic() => {
                panic.get_or_insert(join_error.into_panic());
            }
            // Blocking tasks are never aborted.
            Err(_) => {}
        }
    }

    if let Some(payload) = panic {
        std::panic::resume_unwind(payload);
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
