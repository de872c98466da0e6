use lambda_http::{run, service_fn, tracing, Error};
mod auth;
mod body;
mod config;
mod download;
mod error;
mod http_handler;
use http_handler::{function_handler, PhotoGateway};
mod response;
mod storage;
mod upload;

use config::Config;
use storage::S3ObjectStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;
    tracing::info!(
        bucket = %config.bucket,
        region = %config.region,
        ttl_secs = config.signed_url_ttl_secs,
        upload_mode = ?config.upload_mode,
        "starting photo gateway"
    );
    let store = S3ObjectStore::for_region(&config.region).await;
    let gateway = PhotoGateway::new(config, store);

    run(service_fn(|event| function_handler(&gateway, event))).await
}
