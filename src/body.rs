use lambda_http::Body;
use openssl::base64;

use crate::error::ApiError;

pub fn text(body: &Body) -> Result<&str, ApiError> {
    std::str::from_utf8(body.as_ref()).map_err(|_| ApiError::malformed("body is not valid UTF-8"))
}

/// Removes the one base64 layer a photo or encoded JSON body travels in.
/// A `Binary` body arrives already decoded by the runtime (`isBase64Encoded`
/// on the gateway event); a `Text` body is still the client's base64.
pub fn decode_base64(body: &Body) -> Result<Vec<u8>, ApiError> {
    match body {
        Body::Empty => Ok(Vec::new()),
        Body::Binary(bytes) => Ok(bytes.clone()),
        Body::Text(encoded) => base64::decode_block(encoded)
            .map_err(|_| ApiError::malformed("body is not valid base64")),
    }
}
