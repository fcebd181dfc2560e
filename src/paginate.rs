//! Pagination driver
//!
//! Collects the items of a paginated resource in page order. The first page
//! announces the page count; later pages are fetched one by one until the
//! count is exhausted or a page comes back missing or empty.

use std::future::Future;
use tracing::debug;

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of pages, as announced by the page
    pub page_count: usize,
}

/// Fetch pages `1..=N` through `fetch_page`, accumulating their items
///
/// `fetch_page` returns `Ok(None)` when a page has no data (e.g. a non-200
/// response). A missing first page yields no items.
pub async fn collect_pages<T, E, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Option<Page<T>>, E>>,
{
    let Some(first) = fetch_page(1).await? else {
        debug!("first page missing");
        return Ok(vec![]);
    };

    let page_count = first.page_count;
    let mut items = first.items;

    for page_number in 2..=page_count {
        let page = match fetch_page(page_number).await? {
            Some(page) if !page.items.is_empty() => page,
            _ => {
                debug!(page = page_number, "stopping at empty page");
                break;
            }
        };
        items.extend(page.items);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    type PageResult = Result<Option<Page<u32>>, Infallible>;

    fn pages(data: Vec<Vec<u32>>) -> impl FnMut(usize) -> std::future::Ready<PageResult> {
        let count = data.len();
        move |n| {
            std::future::ready(Ok(data.get(n - 1).map(|items| Page {
                items: items.clone(),
                page_count: count,
            })))
        }
    }

    #[tokio::test]
    async fn test_collects_in_page_order() {
        let items = collect_pages(pages(vec![vec![1, 2], vec![3], vec![4, 5]])).await.unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_single_page() {
        let items = collect_pages(pages(vec![vec![7]])).await.unwrap();
        assert_eq!(items, vec![7]);
    }

    #[tokio::test]
    async fn test_stops_at_empty_page() {
        let requested = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requested);
        let data = vec![vec![1], vec![2], vec![], vec![4]];

        let items = collect_pages(move |n| {
            log.lock().unwrap().push(n);
            let page = Page {
                items: data[n - 1].clone(),
                page_count: data.len(),
            };
            async move { Ok::<_, Infallible>(Some(page)) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2]);
        assert_eq!(*requested.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_missing_first_page() {
        let items = collect_pages(|_| async { Ok::<Option<Page<u32>>, Infallible>(None) })
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let result = collect_pages(|n| async move {
            if n == 2 {
                Err("boom")
            } else {
                Ok(Some(Page {
                    items: vec![n],
                    page_count: 3,
                }))
            }
        })
        .await;
        assert_eq!(result, Err("boom"));
    }
}
