//! Catalogue and comment board use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    CatalogueQuery, CommentPersistenceError, CommentRepository, CommentsCommand, CommentsQuery,
    ProductPersistenceError, ProductRepository, RECENT_COMMENTS,
};
use crate::domain::{Comment, CommentText, Error, NewComment, Product, SearchQuery};

/// Product search over the catalogue repository.
pub struct CatalogueService<P> {
    products: Arc<P>,
}

impl<P> CatalogueService<P> {
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }
}

fn map_product_error(error: ProductPersistenceError) -> Error {
    Error::internal(format!("product repository error: {error}"))
}

#[async_trait]
impl<P> CatalogueQuery for CatalogueService<P>
where
    P: ProductRepository,
{
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, Error> {
        self.products.search(query).await.map_err(map_product_error)
    }
}

/// Comment board over the comment repository.
pub struct CommentService<C> {
    comments: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> CommentService<C> {
    pub fn new(comments: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { comments, clock }
    }
}

fn map_comment_error(error: CommentPersistenceError) -> Error {
    Error::internal(format!("comment repository error: {error}"))
}

#[async_trait]
impl<C> CommentsCommand for CommentService<C>
where
    C: CommentRepository,
{
    async fn post(&self, body: CommentText, author: String) -> Result<i32, Error> {
        let comment = NewComment {
            body,
            author,
            created_at: self.clock.utc(),
        };
        self.comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)
    }
}

#[async_trait]
impl<C> CommentsQuery for CommentService<C>
where
    C: CommentRepository,
{
    async fn recent(&self) -> Result<Vec<Comment>, Error> {
        self.comments
            .recent(RECENT_COMMENTS)
            .await
            .map_err(map_comment_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockCommentRepository, MockProductRepository};
    use crate::test_support::MutableClock;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn search_passes_query_through() {
        let mut products = MockProductRepository::new();
        products
            .expect_search()
            .withf(|query| query.as_str() == "' OR 1=1 --")
            .return_once(|_| Ok(Vec::new()));
        let service = CatalogueService::new(Arc::new(products));

        let query = SearchQuery::new("' OR 1=1 --").expect("query");
        let found = service.search(&query).await.expect("search");
        assert!(found.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn search_failure_is_internal() {
        let mut products = MockProductRepository::new();
        products
            .expect_search()
            .return_once(|_| Err(ProductPersistenceError::query("no such table")));
        let service = CatalogueService::new(Arc::new(products));

        let query = SearchQuery::new("x").expect("query");
        let err = service.search(&query).await.expect_err("fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn post_stamps_comment_with_clock_time() {
        let now = Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
            .single()
            .expect("timestamp");
        let mut comments = MockCommentRepository::new();
        comments
            .expect_insert()
            .withf(move |c| c.created_at == now && c.author == "Anonymous")
            .return_once(|_| Ok(3));
        let service = CommentService::new(Arc::new(comments), Arc::new(MutableClock::new(now)));

        let body = CommentText::new("hello").expect("text");
        let id = service
            .post(body, "Anonymous".to_owned())
            .await
            .expect("stored");
        assert_eq!(id, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn recent_requests_fixed_page() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_recent()
            .withf(|limit| *limit == RECENT_COMMENTS)
            .return_once(|_| Ok(Vec::new()));
        let service = CommentService::new(
            Arc::new(comments),
            Arc::new(mockable::DefaultClock),
        );
        assert!(service.recent().await.expect("listed").is_empty());
    }
}
