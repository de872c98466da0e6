use lambda_http::{tracing, Body, Error, Request, RequestExt, Response};
use serde::Deserialize;

use crate::{
    body,
    error::ApiError,
    http_handler::PhotoGateway,
    response::SignedUrlBody,
    storage::ObjectStore,
};

const SIGNED_URL_MESSAGE: &str = "Please check Image by this Url with Get Method!";

/// Where a download request carries the object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoPathSource {
    /// `?photo_path=...`
    QueryString,
    /// base64 of `{"photo_path": "..."}`
    EncodedJsonBody,
}

#[derive(Deserialize)]
struct PhotoPathBody {
    photo_path: String,
}

impl PhotoPathSource {
    pub fn extract(self, event: &Request) -> Result<String, ApiError> {
        let photo_path = match self {
            Self::QueryString => event
                .query_string_parameters_ref()
                .and_then(|params| params.first("photo_path"))
                .map(str::to_string)
                .ok_or_else(|| ApiError::malformed("missing query parameter photo_path"))?,
            Self::EncodedJsonBody => {
                let decoded = body::decode_base64(event.body())?;
                serde_json::from_slice::<PhotoPathBody>(&decoded)
                    .map_err(|e| ApiError::malformed(format!("invalid JSON body: {e}")))?
                    .photo_path
            }
        };
        if photo_path.is_empty() {
            return Err(ApiError::malformed("photo_path is empty"));
        }
        Ok(photo_path)
    }
}

/// Presigns a GET for `photo_path` as-is. Download keys are never date
/// prefixed; the caller already knows the full key.
pub async fn get_photo_url<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    ttl_secs: u64,
    photo_path: &str,
) -> Result<String, ApiError> {
    let signed_url = store.presign_get(bucket, photo_path, ttl_secs).await?;
    tracing::info!(bucket, key = photo_path, ttl_secs, "issued download url");
    Ok(signed_url)
}

pub async fn download_url<S: ObjectStore>(
    gateway: &PhotoGateway<S>,
    event: &Request,
    source: PhotoPathSource,
) -> Result<Response<Body>, Error> {
    gateway
        .respond(event, "signed_url", || async {
            let photo_path = source.extract(event)?;
            let signed_url = get_photo_url(
                &gateway.store,
                &gateway.config.bucket,
                gateway.config.signed_url_ttl_secs,
                &photo_path,
            )
            .await?;
            Ok::<_, ApiError>(SignedUrlBody {
                message: SIGNED_URL_MESSAGE,
                signed_url,
            })
        })
        .await
}
