use lambda_http::Request;

use crate::error::ApiError;

pub const AUTHORIZATION_HEADER: &str = "Authorization";

pub fn authorize(provided_token: &str, expected_token: &str) -> bool {
    provided_token == expected_token
}

/// Reads the shared secret off the request and checks it. A missing or
/// non-text header is rejected the same way as a wrong one.
pub fn guard(event: &Request, expected_token: &str) -> Result<(), ApiError> {
    let Some(Ok(provided)) = event
        .headers()
        .get(AUTHORIZATION_HEADER)
        .map(|it| it.to_str())
    else {
        return Err(ApiError::Unauthorized);
    };
    if authorize(provided, expected_token) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}
