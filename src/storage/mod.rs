//! Backing services: document database and object storage.
//!
//! Both clients are built once at startup and handed to the server, which
//! only checks them from `/health`. The relay itself never touches them.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use thiserror::Error;

use crate::config::StorageConfig;

/// Backing service failures. Fatal at startup; reported by `/health` after.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document table '{table}' unavailable: {source}")]
    Documents {
        table: String,
        #[source]
        source: aws_sdk_dynamodb::Error,
    },

    #[error("object bucket '{bucket}' unavailable: {source}")]
    Objects {
        bucket: String,
        #[source]
        source: aws_sdk_s3::Error,
    },
}

/// Connected document database and object storage clients.
#[derive(Debug, Clone)]
pub struct BackingServices {
    documents: aws_sdk_dynamodb::Client,
    objects: aws_sdk_s3::Client,
    table: String,
    bucket: String,
}

impl BackingServices {
    /// Build both clients and check the configured table and bucket.
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        let sdk_config = load_sdk_config(config).await;

        let documents = aws_sdk_dynamodb::Client::new(&sdk_config);

        // Emulators serve buckets by path, not by subdomain.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint_url.is_some())
            .build();
        let objects = aws_sdk_s3::Client::from_conf(s3_config);

        let services = Self {
            documents,
            objects,
            table: config.table.clone(),
            bucket: config.bucket.clone(),
        };
        services.check_reachable().await?;

        tracing::info!(
            region = %config.region,
            table = %services.table,
            bucket = %services.bucket,
            "Backing services connected"
        );

        Ok(services)
    }

    /// Check that the table and bucket are reachable.
    pub async fn check_reachable(&self) -> Result<(), StorageError> {
        self.documents
            .describe_table()
            .table_name(&self.table)
            .send()
            .await
            .map_err(|e| StorageError::Documents {
                table: self.table.clone(),
                source: e.into(),
            })?;

        self.objects
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::Objects {
                bucket: self.bucket.clone(),
                source: e.into(),
            })?;

        Ok(())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

async fn load_sdk_config(config: &StorageConfig) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}
