//! Sequential page accumulation
//!
//! A page is requested only after the previous one has been yielded, so
//! pages are never fetched in parallel.

use crate::error::{Error, Result};
use crate::types::Page;
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// Hard stop for runaway pagination
const MAX_PAGES: u32 = 1000;

/// Stream the items of each page until the server reports no next page
pub fn paginate<'a, T, F, Fut>(mut fetch: F) -> impl Stream<Item = Result<Vec<T>>> + 'a
where
    T: 'a,
    F: FnMut(u32) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>>> + 'a,
{
    stream::try_unfold(Some(1_u32), move |cursor| {
        let request = cursor.map(|page| (page, fetch(page)));
        async move {
            let Some((page, request)) = request else {
                return Ok(None);
            };
            if page > MAX_PAGES {
                return Err(Error::Internal(format!(
                    "pagination exceeded {MAX_PAGES} pages"
                )));
            }
            let Page { items, next } = request.await?;
            // A server that points back at an earlier page would loop forever
            let next = next.filter(|n| *n > page);
            Ok(Some((items, next)))
        }
    })
}

/// Fetch every page and concatenate the items
pub async fn load_all<'a, T, F, Fut>(fetch: F) -> Result<Vec<T>>
where
    T: 'a,
    F: FnMut(u32) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>>> + 'a,
{
    paginate(fetch).try_concat().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_load_all_follows_next_pages() {
        let requested = Mutex::new(Vec::new());
        let items = load_all(|page| {
            requested.lock().unwrap().push(page);
            async move {
                Ok(match page {
                    1 => Page { items: vec!["a", "b"], next: Some(2) },
                    2 => Page { items: vec!["c"], next: Some(3) },
                    _ => Page::last(vec!["d"]),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["a", "b", "c", "d"]);
        assert_eq!(*requested.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_load_all_stops_on_error() {
        let requested = Mutex::new(Vec::new());
        let result: Result<Vec<u8>> = load_all(|page| {
            requested.lock().unwrap().push(page);
            async move {
                if page == 2 {
                    Err(Error::Store("boom".to_string()))
                } else {
                    Ok(Page { items: vec![1], next: Some(page + 1) })
                }
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(*requested.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_backwards_next_page_terminates() {
        let items = load_all(|_page| async { Ok(Page { items: vec![7], next: Some(1) }) })
            .await
            .unwrap();
        assert_eq!(items, vec![7]);
    }
}
