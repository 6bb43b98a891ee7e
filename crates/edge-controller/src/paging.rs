//! Following paginated listings to the end.

use std::future::Future;

use edge_core::{EdgeResult, Page, Pager};

/// Reads every page of a listing.
///
/// Only a listing read this way may mark a cache complete.
pub(crate) async fn read_all<T, F, Fut>(mut fetch: F) -> EdgeResult<Vec<T>>
where
    F: FnMut(Option<Pager>) -> Fut,
    Fut: Future<Output = EdgeResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut pager = None;
    loop {
        let page = fetch(pager.take()).await?;
        items.extend(page.items);
        match page.next_start_key {
            Some(start_key) => {
                pager = Some(Pager {
                    start_key: Some(start_key),
                    limit: None,
                })
            }
            None => return Ok(items),
        }
    }
}
