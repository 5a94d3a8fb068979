//! Catalogue search and guestbook handlers.
//!
//! These endpoints answer with HTML. Every caller-controlled or stored value
//! passes through [`html_escape::encode_safe`] before it is written into the
//! page, so markup is echoed as text.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, post, web};
use html_escape::encode_safe;
use serde::{Deserialize, Serialize};

use crate::domain::{ANONYMOUS_AUTHOR, Comment, CommentText, Product, SearchQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MaybePrincipal;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};
use crate::inbound::http::schemas::ErrorSchema;

/// Query parameters for `GET /search`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchParams {
    /// Substring to look for in product names.
    #[serde(default)]
    pub q: String,
}

fn page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n{body}</body></html>\n"
    ))
}

fn render_product(product: &Product) -> String {
    let description = product.description.as_deref().unwrap_or_default();
    format!(
        "<li><strong>{}</strong> - ${:.2}<br>{}</li>\n",
        encode_safe(&product.name),
        product.price,
        encode_safe(description),
    )
}

fn render_search(query: &SearchQuery, products: &[Product]) -> String {
    let heading = format!(
        "<h1>Search Results for: {}</h1>\n",
        encode_safe(query.as_str())
    );
    if products.is_empty() {
        return format!("{heading}<p>No results found</p>\n");
    }
    let items: String = products.iter().map(render_product).collect();
    format!("{heading}<ul>\n{items}</ul>\n")
}

/// Search products by name.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "HTML results page", content_type = "text/html"),
        (status = 400, description = "Query too long", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "search",
    security([])
)]
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let query = SearchQuery::new(params.into_inner().q)
        .map_err(|err| invalid_field_error(FieldName::new("q"), err))?;
    let products = state.catalogue.search(&query).await?;
    Ok(page("Search", &render_search(&query, &products)))
}

/// Request body for `POST /comment`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct CommentRequest {
    #[schema(example = "Great mouse!")]
    pub comment: String,
}

/// Stored comment acknowledgement.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub success: bool,
    pub id: i32,
}

/// Store a guestbook comment.
#[utoipa::path(
    post,
    path = "/comment",
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment stored", body = CommentResponse),
        (status = 400, description = "Invalid comment", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "postComment",
    security([])
)]
#[post("/comment")]
pub async fn post_comment(
    state: web::Data<HttpState>,
    author: MaybePrincipal,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<CommentResponse>> {
    let body = CommentText::new(&payload.comment)
        .map_err(|err| invalid_field_error(FieldName::new("comment"), err))?;
    let author = author.user().map_or_else(
        || ANONYMOUS_AUTHOR.to_owned(),
        |user| user.username().to_string(),
    );
    let id = state.comments.post(body, author).await?;
    Ok(web::Json(CommentResponse { success: true, id }))
}

fn render_comments(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "<h1>Comments</h1>\n<p>No comments yet</p>\n".to_owned();
    }
    let items: String = comments
        .iter()
        .map(|comment| {
            format!(
                "<li><p>{}</p><small>{} at {}</small></li>\n",
                encode_safe(&comment.body),
                encode_safe(&comment.author),
                comment.created_at.to_rfc3339(),
            )
        })
        .collect();
    format!("<h1>Comments</h1>\n<ul>\n{items}</ul>\n")
}

/// Render the most recent guestbook comments.
#[utoipa::path(
    get,
    path = "/comments",
    responses(
        (status = 200, description = "HTML comment list", content_type = "text/html"),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listComments",
    security([])
)]
#[get("/comments")]
pub async fn list_comments(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let comments = state.comments_query.recent().await?;
    Ok(page("Comments", &render_comments(&comments)))
}

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod tests;
