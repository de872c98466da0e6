use chrono::{DateTime, FixedOffset, Utc};
use lambda_http::{http::header::CONTENT_TYPE, tracing, Body, Error, Request, RequestExt, Response};
use serde::Deserialize;

use crate::{
    body,
    config::UploadMode,
    error::ApiError,
    http_handler::PhotoGateway,
    response::{SignedUrlBody, UploadedBody},
    storage::ObjectStore,
};

const UPLOADED_MESSAGE: &str = "Successfully Uploaded!";
const UPLOAD_URL_MESSAGE: &str = "Please upload Image by this Url with Put Method!";

/// Upload keys are bucketed by calendar day in Japan Standard Time.
const KEY_DATE_UTC_OFFSET_SECS: i32 = 9 * 60 * 60;

/// `YYYY/MM/DD` of `now` in UTC+9.
///
/// # Panics
///
/// Never in practice: the offset is a constant well inside chrono's ±24h range.
pub fn date_prefix(now: DateTime<Utc>) -> String {
    let offset = FixedOffset::east_opt(KEY_DATE_UTC_OFFSET_SECS).expect("UTC+9 is a valid offset");
    now.with_timezone(&offset).format("%Y/%m/%d").to_string()
}

pub fn dated_key(now: DateTime<Utc>, photo_name: &str) -> String {
    format!("{}/{}", date_prefix(now), photo_name)
}

/// Decodes the base64 photo and stores it under today's prefix. Returns the
/// key it was written to.
pub async fn upload_photo<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    body_base64: &Body,
    photo_name: &str,
    content_type: &str,
    now: DateTime<Utc>,
) -> Result<String, ApiError> {
    let bytes = body::decode_base64(body_base64)?;
    let key = dated_key(now, photo_name);
    let len = bytes.len();
    store.put_object(bucket, &key, bytes, content_type).await?;
    tracing::info!(bucket, key = %key, len, content_type, "uploaded photo");
    Ok(key)
}

/// Issues a PUT URL for `attachment_file` so the client can upload on its
/// own. The key is the name as given.
pub async fn get_generate_upload_url<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    ttl_secs: u64,
    attachment_file: &str,
) -> Result<String, ApiError> {
    let signed_url = store.presign_put(bucket, attachment_file, ttl_secs).await?;
    tracing::info!(bucket, key = attachment_file, ttl_secs, "issued upload url");
    Ok(signed_url)
}

#[derive(Deserialize)]
struct AttachmentBody {
    attachment_file: String,
}

fn photo_name(event: &Request) -> Result<String, ApiError> {
    let name = event
        .query_string_parameters_ref()
        .and_then(|params| params.first("photo_name"))
        .ok_or_else(|| ApiError::malformed("missing query parameter photo_name"))?;
    if name.is_empty() {
        return Err(ApiError::malformed("photo_name is empty"));
    }
    Ok(name.to_string())
}

fn content_type(event: &Request) -> Result<&str, ApiError> {
    let Some(Ok(content_type)) = event.headers().get(CONTENT_TYPE).map(|it| it.to_str()) else {
        return Err(ApiError::malformed("missing Content-Type header"));
    };
    Ok(content_type)
}

fn attachment_file(event: &Request) -> Result<String, ApiError> {
    let text = body::text(event.body())?;
    let attachment = serde_json::from_str::<AttachmentBody>(text)
        .map_err(|e| ApiError::malformed(format!("invalid JSON body: {e}")))?;
    if attachment.attachment_file.is_empty() {
        return Err(ApiError::malformed("attachment_file is empty"));
    }
    Ok(attachment.attachment_file)
}

pub async fn upload<S: ObjectStore>(
    gateway: &PhotoGateway<S>,
    event: &Request,
) -> Result<Response<Body>, Error> {
    let config = &gateway.config;
    match config.upload_mode {
        UploadMode::Direct => {
            gateway
                .respond(event, "uploaded_photo_path", || async {
                    let photo_name = photo_name(event)?;
                    let content_type = content_type(event)?;
                    let uploaded_photo_path = upload_photo(
                        &gateway.store,
                        &config.bucket,
                        event.body(),
                        &photo_name,
                        content_type,
                        (gateway.clock)(),
                    )
                    .await?;
                    Ok::<_, ApiError>(UploadedBody {
                        message: UPLOADED_MESSAGE,
                        uploaded_photo_path,
                    })
                })
                .await
        }
        UploadMode::Presigned => {
            gateway
                .respond(event, "signed_url", || async {
                    let attachment_file = attachment_file(event)?;
                    let signed_url = get_generate_upload_url(
                        &gateway.store,
                        &config.bucket,
                        config.signed_url_ttl_secs,
                        &attachment_file,
                    )
                    .await?;
                    Ok::<_, ApiError>(SignedUrlBody {
                        message: UPLOAD_URL_MESSAGE,
                        signed_url,
                    })
                })
                .await
        }
    }
}
