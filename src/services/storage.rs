use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use uuid::Uuid;

use crate::common::BackendError;
use crate::db::{check_status, Backend};
use crate::models::AccessToken;

pub const PHOTOS_BUCKET: &str = "photos";
pub const AVATARS_BUCKET: &str = "avatars";

/// Binary object storage with public read URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        token: &AccessToken,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError>;

    fn public_url(&self, bucket: &str, name: &str) -> String;
}

#[async_trait]
impl ObjectStore for Backend {
    async fn upload(
        &self,
        token: &AccessToken,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        let url = self.storage_url(&format!("object/{}/{}", bucket, urlencoding::encode(name)));

        let response = self
            .request(Method::POST, &url, Some(token))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("cache-control", "3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        check_status(response).await?;
        log::info!("Uploaded {}/{}", bucket, name);

        Ok(())
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        self.storage_url(&format!(
            "object/public/{}/{}",
            bucket,
            urlencoding::encode(name)
        ))
    }
}

/// Lower-cased extension of an uploaded file name, if it looks like one.
pub fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.trim().to_ascii_lowercase();

    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// `<millis>_<random>.<ext>` inside the photos bucket.
pub fn photo_object_name(filename: &str, now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}.{}",
        now.timestamp_millis(),
        &random[..10],
        file_extension(filename).unwrap_or_else(|| "bin".to_string())
    )
}

/// `avatar_<millis>.<ext>` inside the avatars bucket.
pub fn avatar_object_name(filename: &str, now: DateTime<Utc>) -> String {
    format!(
        "avatar_{}.{}",
        now.timestamp_millis(),
        file_extension(filename).unwrap_or_else(|| "bin".to_string())
    )
}

/// Declared content type of an upload, or a guess from its file name.
pub fn content_type_for(filename: &str, declared: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_753_379_854_486).unwrap()
    }

    #[test]
    fn extension_is_lowercased_and_sanitised() {
        assert_eq!(file_extension("IMG_3178.JPG").as_deref(), Some("jpg"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("no-extension"), None);
        assert_eq!(file_extension("weird.j p g"), None);
    }

    #[test]
    fn photo_names_carry_timestamp_and_extension() {
        let name = photo_object_name("IMG_3178.JPG", at());
        assert!(name.starts_with("1753379854486_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "1753379854486_".len() + 10 + ".jpg".len());
    }

    #[test]
    fn avatar_names_fall_back_to_bin() {
        assert_eq!(avatar_object_name("me", at()), "avatar_1753379854486.bin");
        assert_eq!(avatar_object_name("me.png", at()), "avatar_1753379854486.png");
    }

    #[test]
    fn content_type_is_guessed_when_missing() {
        assert_eq!(content_type_for("a.png", None), "image/png");
        assert_eq!(content_type_for("a.png", Some("application/octet-stream")), "image/png");
        assert_eq!(content_type_for("a.bin", Some("image/jpeg")), "image/jpeg");
    }
}
