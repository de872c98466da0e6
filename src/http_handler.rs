use std::future::Future;

use chrono::{DateTime, Utc};
use lambda_http::{http::Method, Body, Error, Request, RequestExt, Response};
use serde::Serialize;

use crate::{
    auth,
    config::Config,
    download::{download_url, PhotoPathSource},
    error::ApiError,
    response,
    storage::ObjectStore,
    upload::upload,
};

/// Per-process state shared by every invocation. Nothing in here changes
/// after startup.
pub struct PhotoGateway<S> {
    pub config: Config,
    pub store: S,
    pub clock: fn() -> DateTime<Utc>,
}

impl<S: ObjectStore> PhotoGateway<S> {
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config,
            store,
            clock: Utc::now,
        }
    }

    /// Checks the shared secret, then runs `operation` and renders its
    /// outcome. Failures leave `result_field` empty in the error body.
    pub async fn respond<T, F, Fut>(
        &self,
        event: &Request,
        result_field: &str,
        operation: F,
    ) -> Result<Response<Body>, Error>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let result = match auth::guard(event, &self.config.auth_key) {
            Ok(()) => operation().await,
            Err(err) => Err(err),
        };
        match result {
            Ok(body) => response::format(200, &body),
            Err(err) => response::failure(&err, result_field),
        }
    }
}

fn route_path(event: &Request) -> &str {
    match event.raw_http_path() {
        "" => event.uri().path(),
        path => path,
    }
}

pub(crate) async fn function_handler<S: ObjectStore>(
    gateway: &PhotoGateway<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = route_path(&event).trim_end_matches('/').to_string();

    if method == Method::OPTIONS {
        return response::preflight();
    }

    match (method, path.as_str()) {
        (Method::GET, "/download") => {
            download_url(gateway, &event, PhotoPathSource::QueryString).await
        }
        (Method::POST, "/download") => {
            download_url(gateway, &event, PhotoPathSource::EncodedJsonBody).await
        }
        (Method::POST, "/upload") => upload(gateway, &event).await,
        _ => response::not_found(),
    }
}
