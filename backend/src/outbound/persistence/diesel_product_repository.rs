//! SQLite-backed `ProductRepository` implementation.
//!
//! Search uses a bound `LIKE` pattern with `\` as the escape character, so
//! `%` and `_` typed by a caller match literally.

use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::ports::{ProductPersistenceError, ProductRepository};
use crate::domain::{Product, SearchQuery};

use super::error_mapping::run;
use super::models::ProductRow;
use super::pool::DbHandle;
use super::schema::products;

/// Diesel-backed implementation of the product repository port.
#[derive(Clone)]
pub struct DieselProductRepository {
    db: DbHandle,
}

impl DieselProductRepository {
    pub fn new(db: DbHandle) -> Self {
        Self { db }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
        }
    }
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, ProductPersistenceError> {
        let pattern = query.like_pattern();
        let rows: Vec<ProductRow> = run(&self.db, move |conn| {
            products::table
                .filter(products::name.like(pattern).escape('\\'))
                .order(products::id.asc())
                .select(ProductRow::as_select())
                .load(conn)
        })
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}
