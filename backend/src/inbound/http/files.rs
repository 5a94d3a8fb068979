//! `GET /download?file=`: serve a file from the uploads directory.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::warn;

use crate::domain::ports::FileStoreError;
use crate::domain::{DownloadPath, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};
use crate::inbound::http::schemas::ErrorSchema;

/// Query parameters for `GET /download`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DownloadQuery {
    /// Path relative to the uploads directory.
    pub file: String,
}

fn map_store_error(error: FileStoreError) -> Error {
    match error {
        FileStoreError::NotFound => Error::not_found("file not found"),
        FileStoreError::Escape => invalid_field_error(
            FieldName::new("file"),
            "file must be a relative path inside the uploads directory",
        ),
        FileStoreError::Io { message } => Error::internal(format!("download failed: {message}")),
    }
}

/// Download a file as an attachment.
#[utoipa::path(
    get,
    path = "/download",
    params(DownloadQuery),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream"),
        (status = 400, description = "Path rejected", body = ErrorSchema),
        (status = 404, description = "File not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["files"],
    operation_id = "download",
    security([])
)]
#[get("/download")]
pub async fn download(
    state: web::Data<HttpState>,
    query: web::Query<DownloadQuery>,
) -> ApiResult<HttpResponse> {
    let path = DownloadPath::parse(&query.file).map_err(|err| {
        warn!(error = %err, "rejected download path");
        invalid_field_error(FieldName::new("file"), err)
    })?;
    let bytes = state.files.read(&path).await.map_err(map_store_error)?;
    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(path.file_name().to_owned())],
        })
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::http::header::CONTENT_DISPOSITION;
    use actix_web::{App, test};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockFileStore;
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{state_with, untouched_ports};

    async fn get(ports: HttpStatePorts, uri: &str) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ports)))
                .service(download),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await
    }

    #[rstest]
    #[case("/download?file=../../etc/passwd")]
    #[case("/download?file=%2Fetc%2Fpasswd")]
    #[case("/download?file=..%5C..%5Cwindows")]
    #[case("/download?file=a%00b")]
    #[case("/download?file=")]
    #[actix_web::test]
    async fn traversal_is_rejected_before_touching_storage(#[case] uri: &str) {
        let res = get(untouched_ports(), uri).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn serves_attachment_bytes() {
        let mut files = MockFileStore::new();
        files
            .expect_read()
            .withf(|path| path.as_path() == std::path::Path::new("reports/q1.txt"))
            .returning(|_| Ok(b"revenue".to_vec()));
        let mut ports = untouched_ports();
        ports.files = Arc::new(files);
        let res = get(ports, "/download?file=reports/q1.txt").await;

        assert_eq!(res.status(), StatusCode::OK);
        let disposition = res
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .expect("content disposition")
            .to_owned();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("q1.txt"));
        assert_eq!(test::read_body(res).await, "revenue");
    }

    #[rstest]
    #[case(FileStoreError::NotFound, StatusCode::NOT_FOUND)]
    #[case(FileStoreError::Escape, StatusCode::BAD_REQUEST)]
    #[case(FileStoreError::io("permission denied"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[actix_web::test]
    async fn store_errors_map_to_statuses(
        #[case] error: FileStoreError,
        #[case] expected: StatusCode,
    ) {
        let mut files = MockFileStore::new();
        files.expect_read().return_once(move |_| Err(error));
        let mut ports = untouched_ports();
        ports.files = Arc::new(files);
        let res = get(ports, "/download?file=missing.txt").await;
        assert_eq!(res.status(), expected);
    }
}
