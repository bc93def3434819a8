use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use folio_core::contact::CreateContact;
use folio_core::upload::{IMAGE_FIELD, MAX_IMAGE_BYTES};
use folio_core::ImageUpload;
use folio_service::ServiceError;
use serde_json::{json, Value};
use tracing::debug;

use super::{msg, server_error, AppState};

/// Room for the text fields and multipart framing on top of a maximum-size
/// image, so oversized images reach validation instead of the transport cap.
const CONTACT_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 256 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contact", get(list_contacts).post(submit_contact))
        .layer(DefaultBodyLimit::max(CONTACT_BODY_LIMIT))
}

async fn list_contacts(State(state): State<AppState>) -> Result<Json<Value>, Response> {
    state
        .service
        .list_contacts()
        .await
        .map(|c| Json(json!(c)))
        .map_err(to_error)
}

async fn submit_contact(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Value>), Response> {
    let multipart =
        multipart.map_err(|rejection| msg(StatusCode::BAD_REQUEST, rejection.body_text()))?;
    let (input, image) = read_submission(multipart).await?;
    let contact = state
        .service
        .submit_contact(input, image)
        .await
        .map_err(to_error)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": contact })),
    ))
}

/// Collect the text fields and at most one file part named `image`.
async fn read_submission(
    mut multipart: Multipart,
) -> Result<(CreateContact, Option<ImageUpload>), Response> {
    let mut input = CreateContact::default();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            if image.is_some() {
                return Err(msg(
                    StatusCode::BAD_REQUEST,
                    "Only one image may be attached",
                ));
            }
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            image = Some(ImageUpload {
                filename,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        if field.file_name().is_some() {
            return Err(msg(
                StatusCode::BAD_REQUEST,
                format!("Unexpected file field '{name}'"),
            ));
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "name" => input.name = value,
            "email" => input.email = value,
            "subject" => input.subject = value,
            "message" => input.message = value,
            other => debug!("ignoring form field '{other}'"),
        }
    }

    Ok((input, image))
}

fn multipart_error(e: MultipartError) -> Response {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        msg(
            StatusCode::BAD_REQUEST,
            format!("Request too large: limit is {CONTACT_BODY_LIMIT} bytes"),
        )
    } else {
        msg(StatusCode::BAD_REQUEST, e.body_text())
    }
}

fn to_error(e: ServiceError) -> Response {
    match e {
        ServiceError::InvalidInput(reason) => msg(StatusCode::BAD_REQUEST, reason),
        ServiceError::NotFound(_) | ServiceError::Internal(_) => server_error(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use folio_core::upload::MAX_IMAGE_BYTES;
    use serde_json::Value;
    use tower::ServiceExt;

    use folio_service::ServiceError;

    use super::to_error;
    use crate::test_helpers::test_router;

    const BOUNDARY: &str = "folio-test-boundary";

    struct FilePart<'a> {
        field: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    }

    fn png(data: &[u8]) -> FilePart<'_> {
        FilePart {
            field: "image",
            filename: "shot.png",
            content_type: "image/png",
            data,
        }
    }

    fn form(fields: &[(&str, &str)], files: &[FilePart<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for file in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    file.field, file.filename, file.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(file.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn valid_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("name", "Ada"),
            ("email", " Ada@Example.com "),
            ("subject", "Hi"),
            ("message", "Hello there"),
        ]
    }

    async fn post_form(app: &Router, body: Vec<u8>) -> (StatusCode, Value) {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/contact")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn list(app: &Router) -> Vec<Value> {
        let (status, bytes) = get(app, "/api/contact").await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        v.as_array().unwrap().clone()
    }

    #[tokio::test]
    async fn submit_without_image() {
        let (app, _uploads) = test_router().await;
        let (status, v) = post_form(&app, form(&valid_fields(), &[])).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["email"], "ada@example.com");
        assert!(v["data"]["imagePath"].is_null());
        assert!(v["data"]["id"].is_string());
        assert!(v["data"]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn submit_with_image_serves_file() {
        let (app, _uploads) = test_router().await;
        let (status, v) = post_form(&app, form(&valid_fields(), &[png(b"\x89PNGdata")])).await;
        assert_eq!(status, StatusCode::CREATED);

        let path = v["data"]["imagePath"].as_str().unwrap().to_string();
        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with("-shot.png"));

        let (status, bytes) = get(&app, &path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"\x89PNGdata");
    }

    #[tokio::test]
    async fn empty_file_part_means_no_image() {
        let (app, _uploads) = test_router().await;
        let empty = FilePart {
            field: "image",
            filename: "",
            content_type: "application/octet-stream",
            data: b"",
        };
        let (status, v) = post_form(&app, form(&valid_fields(), &[empty])).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(v["data"]["imagePath"].is_null());
    }

    #[tokio::test]
    async fn rejects_non_image_attachment() {
        let (app, _uploads) = test_router().await;
        let pdf = FilePart {
            field: "image",
            filename: "cv.pdf",
            content_type: "application/pdf",
            data: b"%PDF-1.4",
        };
        let (status, v) = post_form(&app, form(&valid_fields(), &[pdf])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["msg"], "Only image files are allowed!");
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn rejects_image_extension_with_wrong_type() {
        let (app, _uploads) = test_router().await;
        let disguised = FilePart {
            field: "image",
            filename: "cat.png",
            content_type: "text/html",
            data: b"<html>",
        };
        let (status, _) = post_form(&app, form(&valid_fields(), &[disguised])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn rejects_oversized_image() {
        let (app, _uploads) = test_router().await;
        let data = vec![0u8; MAX_IMAGE_BYTES + 1];
        let (status, v) = post_form(&app, form(&valid_fields(), &[png(&data)])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(v["msg"].as_str().unwrap().starts_with("File too large"));
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn rejects_body_over_transport_limit() {
        let (app, _uploads) = test_router().await;
        let data = vec![0u8; MAX_IMAGE_BYTES * 2];
        let (status, _) = post_form(&app, form(&valid_fields(), &[png(&data)])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn rejects_missing_field() {
        let (app, _uploads) = test_router().await;
        let fields = [("name", "Ada"), ("email", "a@b.c"), ("message", "m")];
        let (status, v) = post_form(&app, form(&fields, &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["msg"], "subject is required");
    }

    #[tokio::test]
    async fn rejects_second_image_and_foreign_file_fields() {
        let (app, _uploads) = test_router().await;
        let (status, _) = post_form(
            &app,
            form(&valid_fields(), &[png(b"one"), png(b"two")]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let avatar = FilePart {
            field: "avatar",
            filename: "me.png",
            content_type: "image/png",
            data: b"png",
        };
        let (status, v) = post_form(&app, form(&valid_fields(), &[avatar])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["msg"], "Unexpected file field 'avatar'");
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn rejects_non_multipart_body() {
        let (app, _uploads) = test_router().await;
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/contact")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Ada"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn client_cannot_set_image_path() {
        let (app, _uploads) = test_router().await;
        let mut fields = valid_fields();
        fields.push(("imagePath", "/uploads/someone-else.png"));
        fields.push(("image_path", "/etc/passwd"));
        let (status, v) = post_form(&app, form(&fields, &[])).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(v["data"]["imagePath"].is_null());
    }

    #[test]
    fn only_invalid_input_is_a_client_error() {
        let resp = to_error(ServiceError::InvalidInput("email is required".into()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        for e in [
            ServiceError::NotFound("contact".into()),
            ServiceError::Internal("disk full".into()),
        ] {
            assert_eq!(to_error(e).status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (app, _uploads) = test_router().await;
        let (_, first) = post_form(&app, form(&valid_fields(), &[])).await;
        let (_, second) = post_form(&app, form(&valid_fields(), &[])).await;

        let all = list(&app).await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["id"], second["data"]["id"]);
        assert_eq!(all[1]["id"], first["data"]["id"]);
    }
}
