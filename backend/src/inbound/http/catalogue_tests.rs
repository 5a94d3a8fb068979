//! Tests for catalogue search and guestbook handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{App, test};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::Role;
use crate::domain::ports::{
    MockCatalogueQuery, MockCommentsCommand, MockCommentsQuery, MockTokenIssuer, TokenSubject,
};
use crate::domain::UserId;
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{state_with, untouched_ports, user, users_knowing};

const XSS: &str = "<script>alert(document.cookie)</script>";

async fn send(ports: HttpStatePorts, request: test::TestRequest) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(ports)))
            .service(search)
            .service(post_comment)
            .service(list_comments),
    )
    .await;
    let res = test::call_service(&app, request.to_request()).await;
    let status = res.status();
    if status == StatusCode::OK && res.request().path() != "/comment" {
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(content_type.starts_with("text/html"), "got {content_type}");
    }
    let body = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8");
    (status, body)
}

#[fixture]
fn products() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "Laptop".to_owned(),
            price: 999.99,
            description: Some("High-end laptop".to_owned()),
        },
        Product {
            id: 3,
            name: "<b>Bold</b> & brash".to_owned(),
            price: 5.0,
            description: None,
        },
    ]
}

fn catalogue_returning(products: Vec<Product>) -> MockCatalogueQuery {
    let mut catalogue = MockCatalogueQuery::new();
    catalogue
        .expect_search()
        .return_once(move |_| Ok(products));
    catalogue
}

#[rstest]
#[actix_web::test]
async fn search_escapes_the_echoed_query() {
    let mut ports = untouched_ports();
    ports.catalogue = Arc::new(catalogue_returning(Vec::new()));
    let uri = format!("/search?q={}", "%3Cscript%3Ealert(document.cookie)%3C%2Fscript%3E");
    let (status, body) = send(ports, test::TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains(XSS), "raw markup echoed: {body}");
    assert!(body.contains("Search Results for: &lt;script&gt;alert(document.cookie)&lt;&#x2F;script&gt;"));
    assert!(body.contains("No results found"));
}

#[rstest]
#[actix_web::test]
async fn search_lists_products_with_escaped_fields(products: Vec<Product>) {
    let mut catalogue = MockCatalogueQuery::new();
    catalogue
        .expect_search()
        .withf(|query| query.as_str() == "a")
        .return_once(move |_| Ok(products));
    let mut ports = untouched_ports();
    ports.catalogue = Arc::new(catalogue);
    let (status, body) = send(ports, test::TestRequest::get().uri("/search?q=a")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<strong>Laptop</strong> - $999.99<br>High-end laptop"));
    assert!(body.contains("&lt;b&gt;Bold&lt;&#x2F;b&gt; &amp; brash"));
    assert!(!body.contains("<b>Bold</b>"));
}

#[rstest]
#[actix_web::test]
async fn missing_query_searches_everything(products: Vec<Product>) {
    let mut catalogue = MockCatalogueQuery::new();
    catalogue
        .expect_search()
        .withf(|query| query.as_str().is_empty())
        .return_once(move |_| Ok(products));
    let mut ports = untouched_ports();
    ports.catalogue = Arc::new(catalogue);
    let (status, body) = send(ports, test::TestRequest::get().uri("/search")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Laptop"));
}

#[rstest]
#[actix_web::test]
async fn overlong_query_is_rejected() {
    let uri = format!("/search?q={}", "a".repeat(201));
    let (status, _) = send(untouched_ports(), test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[case::anonymous(None, ANONYMOUS_AUTHOR)]
#[case::logged_in(Some("Bearer alice-token"), "alice")]
#[actix_web::test]
async fn comments_are_attributed_to_the_caller(
    #[case] authorization: Option<&str>,
    #[case] expected_author: &'static str,
) {
    let mut comments = MockCommentsCommand::new();
    comments
        .expect_post()
        .withf(move |body, author| body.as_str() == XSS && author == expected_author)
        .times(1)
        .returning(|_, _| Ok(11));
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_verify().returning(|_| {
        Ok(TokenSubject {
            user_id: UserId::new(5),
        })
    });
    let mut ports = untouched_ports();
    ports.comments = Arc::new(comments);
    ports.tokens = Arc::new(tokens);
    ports.users = Arc::new(users_knowing(user(5, "alice", Role::User)));

    let mut request = test::TestRequest::post()
        .uri("/comment")
        .set_json(json!({ "comment": format!("  {XSS}  ") }));
    if let Some(value) = authorization {
        request = request.insert_header((AUTHORIZATION, value));
    }
    let (status, body) = send(ports, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).expect("json"),
        json!({"success": true, "id": 11})
    );
}

#[rstest]
#[case("   ")]
#[case(&"x".repeat(1001))]
#[actix_web::test]
async fn invalid_comments_are_rejected(#[case] comment: &str) {
    let request = test::TestRequest::post()
        .uri("/comment")
        .set_json(json!({ "comment": comment }));
    let (status, _) = send(untouched_ports(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn stored_comments_render_escaped() {
    let mut query = MockCommentsQuery::new();
    query.expect_recent().returning(|| {
        Ok(vec![Comment {
            id: 1,
            body: XSS.to_owned(),
            author: "<img src=x onerror=alert(1)>".to_owned(),
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        }])
    });
    let mut ports = untouched_ports();
    ports.comments_query = Arc::new(query);
    let (status, body) = send(ports, test::TestRequest::get().uri("/comments")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("<script>"));
    assert!(!body.contains("<img"));
    assert!(body.contains("&lt;script&gt;"));
    assert!(body.contains("2025-03-01T12:00:00+00:00"));
}

#[rstest]
#[actix_web::test]
async fn empty_comment_list_has_placeholder() {
    assert!(render_comments(&[]).contains("No comments yet"));
}
