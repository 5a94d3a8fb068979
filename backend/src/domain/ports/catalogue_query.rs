//! Driving port for product search.

use async_trait::async_trait;

use crate::domain::{Error, Product, SearchQuery};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Products whose name contains the query text.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, Error>;
}
