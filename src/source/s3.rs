//! S3-backed image source.
//!
//! Downloads whole objects from S3 or S3-compatible storage (MinIO, etc.)
//! and decodes them in memory. The identifier is used as the object key.

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client;
use image::RgbImage;
use tracing::debug;

use super::{decode_image, ImageSource};
use crate::error::SourceError;

/// S3-backed implementation of [`ImageSource`].
///
/// # Example
///
/// ```ignore
/// use image_tiler::source::{create_s3_client, S3ImageSource};
///
/// let client = create_s3_client(None, "us-east-1").await;
/// let source = S3ImageSource::new(client, "my-bucket".to_string());
///
/// // The identifier "scenes/hoss.jpg" is the object key
/// let image = source.load("scenes/hoss.jpg").await?;
/// ```
#[derive(Clone)]
pub struct S3ImageSource {
    client: Client,
    bucket: String,
}

impl S3ImageSource {
    /// Create a source reading objects from `bucket`.
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// `s3://bucket/key` location string for an identifier.
    pub fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

#[async_trait]
impl ImageSource for S3ImageSource {
    async fn load(&self, identifier: &str) -> Result<RgbImage, SourceError> {
        let location = self.location(identifier);
        debug!(location = %location, "Fetching image");

        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(identifier)
            .send()
            .await
            .map_err(|e| map_get_object_error(&location, e))?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| SourceError::Connection(DisplayErrorContext(&e).to_string()))?
            .into_bytes();

        decode_image(&data)
    }
}

/// Classify a `GetObject` failure, keeping its full cause chain.
///
/// Only transport failures (I/O, timeouts) count as connection errors.
/// Other dispatch failures, such as missing credentials, are S3 errors.
fn map_get_object_error(
    location: &str,
    e: SdkError<GetObjectError, HttpResponse>,
) -> SourceError {
    let message = DisplayErrorContext(&e).to_string();

    let unreachable = match &e {
        SdkError::TimeoutError(_) => true,
        SdkError::DispatchFailure(failure) => failure.is_io() || failure.is_timeout(),
        _ => false,
    };
    if unreachable {
        return SourceError::Connection(message);
    }

    let is_not_found = e
        .as_service_error()
        .map(|se| se.is_no_such_key())
        .unwrap_or(false);

    let status_is_404 = e
        .raw_response()
        .map(|r| r.status().as_u16() == 404)
        .unwrap_or(false);

    if is_not_found || status_is_404 {
        return SourceError::NotFound(format!("{}: {}", location, message));
    }

    SourceError::S3(message)
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1").await;
/// ```
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services usually need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
