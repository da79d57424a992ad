//! Avatar download and decode. Every failure here is reported, never raised
//! to the view model.

use std::time::Duration;

use async_trait::async_trait;
use image::GenericImageView;
use reqwest::Client;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarImage {
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
}

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("invalid avatar url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to download avatar: {0}")]
    Download(String),
    #[error("failed to decode avatar image: {0}")]
    Decode(String),
}

#[async_trait]
pub trait AvatarLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<AvatarImage, AvatarError>;
}

pub struct HttpAvatarLoader {
    http: Client,
}

impl HttpAvatarLoader {
    pub fn new(timeout: Duration) -> Result<Self, AvatarError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AvatarError::Download(format!("failed to build http client: {err}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl AvatarLoader for HttpAvatarLoader {
    async fn load(&self, url: &str) -> Result<AvatarImage, AvatarError> {
        let url = parse_avatar_url(url)?;
        let bytes = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| AvatarError::Download(err.to_string()))?
            .error_for_status()
            .map_err(|err| AvatarError::Download(err.to_string()))?
            .bytes()
            .await
            .map_err(|err| AvatarError::Download(err.to_string()))?;
        decode_avatar(&bytes)
    }
}

pub fn parse_avatar_url(raw: &str) -> Result<Url, AvatarError> {
    let url = Url::parse(raw.trim()).map_err(|err| AvatarError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AvatarError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

pub fn decode_avatar(bytes: &[u8]) -> Result<AvatarImage, AvatarError> {
    let image =
        image::load_from_memory(bytes).map_err(|err| AvatarError::Decode(err.to_string()))?;
    let (width, height) = image.dimensions();
    Ok(AvatarImage {
        width,
        height,
        byte_len: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    fn tiny_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_dimensions() {
        let bytes = tiny_png(3, 2);
        let avatar = decode_avatar(&bytes).expect("decode");
        assert_eq!((avatar.width, avatar.height), (3, 2));
        assert_eq!(avatar.byte_len, bytes.len());
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let err = decode_avatar(b"<html>not an image</html>").expect_err("must fail");
        assert!(matches!(err, AvatarError::Decode(_)));
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            parse_avatar_url("not a url"),
            Err(AvatarError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_avatar_url("file:///etc/passwd"),
            Err(AvatarError::InvalidUrl { .. })
        ));
        assert!(parse_avatar_url(" https://reqres.in/img/faces/2-image.jpg ").is_ok());
    }
}
