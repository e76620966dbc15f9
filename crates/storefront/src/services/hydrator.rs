//! Content hydrator.
//!
//! Loads the products and banners a listing page shows. Both fetches run
//! concurrently and fail independently. A failed fetch, like an empty one,
//! leaves its list empty and the page falls back to placeholder content.

use std::sync::Arc;

use easyshop_core::Liveness;
use easyshop_core::catalog::{
    BANNERS_PAGE_SIZE, BANNERS_TABLE, Banner, Listing, PRODUCTS_PAGE_SIZE, PRODUCTS_TABLE, Product,
};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::backend::DataStore;

/// Fetches listing content from the row store.
#[derive(Clone)]
pub struct ContentHydrator {
    data: Arc<dyn DataStore>,
}

impl ContentHydrator {
    #[must_use]
    pub fn new(data: Arc<dyn DataStore>) -> Self {
        Self { data }
    }

    /// Fetch products (up to 20) and banners (up to 5) concurrently.
    ///
    /// Never fails. Errors are logged and produce an empty list.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Listing {
        let (products, banners) = tokio::join!(
            self.load::<Product>(PRODUCTS_TABLE, PRODUCTS_PAGE_SIZE),
            self.load::<Banner>(BANNERS_TABLE, BANNERS_PAGE_SIZE),
        );
        Listing { products, banners }
    }

    /// Run [`fetch`](Self::fetch) as an independent task on behalf of a page
    /// mount.
    ///
    /// The task resolves to `None` when the mount ended before the data
    /// arrived; a late result is dropped and never reaches the page.
    #[must_use]
    pub fn spawn(self, liveness: Liveness) -> JoinHandle<Option<Listing>> {
        tokio::spawn(async move {
            let listing = self.fetch().await;
            let delivered = liveness.deliver(listing);
            if delivered.is_none() {
                debug!("Page unmounted before content arrived, discarding");
            }
            delivered
        })
    }

    async fn load<T: DeserializeOwned>(&self, table: &str, limit: u32) -> Vec<T> {
        match self.data.list(table, limit).await {
            Ok(rows) => decode_rows(table, rows),
            Err(e) => {
                warn!(table, error = %e, "Content fetch failed");
                Vec::new()
            }
        }
    }
}

/// Decode rows, skipping (and logging) any that fail validation.
fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<serde_json::Value>) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(table, index, error = %e, "Skipping invalid row");
                None
            }
        })
        .collect()
}
