use std::{future::Future, time::Duration};

use crate::core::errors::{ItemListError, ItemListResult};

/// Awaits a collaborator call, failing with `Timeout` once `limit` elapses.
/// `None` waits indefinitely.
pub async fn call<T, F>(limit: Option<Duration>, operation: &'static str, fut: F) -> ItemListResult<T>
where
    F: Future<Output = ItemListResult<T>>,
{
    tracing::debug!(operation, "remote call");
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| ItemListError::Timeout(operation))?,
        None => fut.await,
    }
}
