use std::future::Future;

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::{config::MediaConfig, error::AppError};

pub const AVATARS: &str = "AVATARS";
pub const RESUMES: &str = "MY_RESUME";
pub const PROJECT_IMAGES: &str = "PROJECT_IMAGES";
pub const SKILL_SVGS: &str = "PORTFOLIO_SKILLS_SVGS";
pub const APPLICATION_SVGS: &str = "PORTFOLIO_SOFTWARE_APPLICATION";

/// A hosted file. The id and url are only ever stored together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub asset_id: String,
    pub url: String,
}

/// A file slot taken from a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub body: Bytes,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, folder: &str, file: UploadedFile) -> anyhow::Result<Asset>;
    async fn destroy(&self, asset_id: &str) -> anyhow::Result<()>;
}

/// Uploads `file` into `folder`, turning host failures into a 500 that names them.
pub async fn upload_asset(
    store: &dyn MediaStore,
    folder: &str,
    file: UploadedFile,
) -> Result<Asset, AppError> {
    store.upload(folder, file).await.map_err(|e| {
        error!(error = ?e, folder, "asset upload failed");
        AppError::Upstream(format!("Failed to upload file to {folder}: {e}"))
    })
}

pub async fn destroy_asset(store: &dyn MediaStore, asset: &Asset) -> Result<(), AppError> {
    store.destroy(&asset.asset_id).await.map_err(|e| {
        error!(error = ?e, asset_id = %asset.asset_id, "asset destroy failed");
        AppError::Upstream(format!("Failed to delete file {}: {e}", asset.asset_id))
    })?;
    info!(asset_id = %asset.asset_id, "asset destroyed");
    Ok(())
}

/// Releases assets whose owning row never got written. Failures are only logged.
pub async fn discard_assets(store: &dyn MediaStore, assets: &[&Asset]) {
    for asset in assets {
        if let Err(e) = store.destroy(&asset.asset_id).await {
            error!(error = ?e, asset_id = %asset.asset_id, "orphaned asset cleanup failed");
        }
    }
}

/// Swaps the asset held in one slot: the previous file is destroyed, the
/// replacement uploaded, and `persist` writes the slot straight away.
///
/// The stored slot never names a destroyed asset: if the upload fails after
/// the previous file is gone, the slot is persisted as empty. A replacement
/// that cannot be persisted is released again.
pub async fn replace_asset<F, Fut>(
    store: &dyn MediaStore,
    previous: Option<&Asset>,
    folder: &str,
    file: UploadedFile,
    persist: F,
) -> Result<Asset, AppError>
where
    F: Fn(Option<Asset>) -> Fut,
    Fut: Future<Output = Result<(), AppError>>,
{
    if let Some(previous) = previous {
        destroy_asset(store, previous).await?;
    }

    let asset = match upload_asset(store, folder, file).await {
        Ok(asset) => asset,
        Err(e) => {
            if previous.is_some() {
                if let Err(clear) = persist(None).await {
                    error!(error = ?clear, folder, "clearing destroyed asset slot failed");
                }
            }
            return Err(e);
        }
    };

    if let Err(e) = persist(Some(asset.clone())).await {
        discard_assets(store, &[&asset]).await;
        return Err(e);
    }
    Ok(asset)
}

#[derive(Clone)]
pub struct S3MediaStore {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3MediaStore {
    pub async fn new(cfg: &MediaConfig) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
            public_url: cfg.public_url.clone(),
        })
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(&self, folder: &str, file: UploadedFile) -> anyhow::Result<Asset> {
        let key = object_key(folder, &file);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(file.body))
            .content_type(&file.content_type)
            .send()
            .await
            .with_context(|| format!("s3 put_object {key}"))?;
        info!(key = %key, "asset uploaded");
        Ok(Asset {
            url: format!("{}/{}", self.public_url, key),
            asset_id: key,
        })
    }

    async fn destroy(&self, asset_id: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(asset_id)
            .send()
            .await
            .with_context(|| format!("s3 delete_object {asset_id}"))?;
        Ok(())
    }
}

fn object_key(folder: &str, file: &UploadedFile) -> String {
    let ext = ext_from_mime(&file.content_type)
        .map(str::to_string)
        .or_else(|| ext_from_name(file.file_name.as_deref()))
        .unwrap_or_else(|| "bin".to_string());
    format!("{}/{}.{}", folder, Uuid::new_v4(), ext)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

fn ext_from_name(name: Option<&str>) -> Option<String> {
    let (_, ext) = name?.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    (!ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(ext)
}
