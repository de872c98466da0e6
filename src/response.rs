use lambda_http::{tracing, Body, Error, Response};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::ApiError;

pub const CORS_HEADERS: [(&str, &str); 3] = [
    (
        "Access-Control-Allow-Headers",
        "Content-Type,Authorization,X-Amz-Date,X-Api-Key,X-Amz-Security-Token",
    ),
    (
        "Access-Control-Allow-Methods",
        "GET,HEAD,OPTIONS,POST,PATCH,PUT,DELETE",
    ),
    ("Access-Control-Allow-Origin", "*"),
];

#[derive(Serialize)]
pub struct SignedUrlBody {
    pub message: &'static str,
    pub signed_url: String,
}

#[derive(Serialize)]
pub struct UploadedBody {
    pub message: &'static str,
    pub uploaded_photo_path: String,
}

/// Serializes `body` as JSON and attaches the CORS headers.
pub fn format<T: Serialize>(status: u16, body: &T) -> Result<Response<Body>, Error> {
    let body = serde_json::to_string(body)?;
    let mut builder = Response::builder()
        .status(status)
        .header("content-type", "application/json");
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    Ok(builder.body(body.into()).map_err(Box::new)?)
}

/// Renders an error with the endpoint's result field left empty. Auth
/// failures always report through `signed_url`.
pub fn failure(err: &ApiError, result_field: &str) -> Result<Response<Body>, Error> {
    let status = err.status_code();
    if status >= 500 {
        tracing::error!(%err, "request failed");
    } else {
        tracing::warn!(%err, "request rejected");
    }

    let field = match err {
        ApiError::Unauthorized => "signed_url",
        _ => result_field,
    };
    let mut body = Map::new();
    body.insert("message".into(), Value::String(err.to_string()));
    body.insert(field.into(), Value::String(String::new()));
    format(status, &body)
}

pub fn not_found() -> Result<Response<Body>, Error> {
    format(404, &json!({ "message": "Not Found" }))
}

pub fn preflight() -> Result<Response<Body>, Error> {
    format(200, &json!({}))
}


#[cfg(test)]
mod tests {
    use super::testing::{assert_cors, json_body};
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn success_body_and_headers() {
        let resp = format(
            200,
            &SignedUrlBody {
                message: "ok",
                signed_url: "https://x".into(),
            },
        )
        .unwrap();
        assert_eq!(resp.status(), 200);
        assert_cors(&resp);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_eq!(
            json_body(&resp),
            json!({ "message": "ok", "signed_url": "https://x" })
        );
    }

    #[test]
    fn unauthorized_always_uses_signed_url() {
        let resp = failure(&ApiError::Unauthorized, "uploaded_photo_path").unwrap();
        assert_eq!(resp.status(), 401);
        assert_cors(&resp);
        assert_eq!(
            json_body(&resp),
            json!({ "message": "Unauthorized!", "signed_url": "" })
        );
    }

    #[test]
    fn other_errors_use_endpoint_field() {
        let resp = failure(&ApiError::malformed("missing photo_name"), "uploaded_photo_path").unwrap();
        assert_eq!(resp.status(), 400);
        assert_cors(&resp);
        let body = json_body(&resp);
        assert_eq!(body["uploaded_photo_path"], "");
        assert_eq!(body["message"], "Malformed request: missing photo_name");

        let err = ApiError::from(StorageError::PresignConfig("bad".into()));
        let resp = failure(&err, "signed_url").unwrap();
        assert_eq!(resp.status(), 500);
        assert_cors(&resp);
    }

    #[test]
    fn fallbacks_carry_cors() {
        let resp = not_found().unwrap();
        assert_eq!(resp.status(), 404);
        assert_cors(&resp);
        let resp = preflight().unwrap();
        assert_eq!(resp.status(), 200);
        assert_cors(&resp);
    }
}
