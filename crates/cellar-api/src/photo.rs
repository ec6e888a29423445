//! Uploaded photos: base64 payloads stored under content-addressed names.

use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

use crate::error::ApiError;

/// Which collection a photo belongs to; also its subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
  Bottle,
  User,
}

impl PhotoKind {
  fn dir(self) -> &'static str {
    match self {
      PhotoKind::Bottle => "bottles",
      PhotoKind::User => "users",
    }
  }
}

/// Writes photos beneath an upload root.
#[derive(Debug, Clone)]
pub struct PhotoStore {
  root: PathBuf,
}

impl PhotoStore {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  /// Decode `data` (a `data:` URL or bare base64) and write it as
  /// `{kind}/{sha256}.png`. Returns that relative path.
  pub async fn save(&self, kind: PhotoKind, data: &str) -> Result<String, ApiError> {
    let bytes = decode_photo(data)?;
    let name = format!("{}.png", hex::encode(Sha256::digest(&bytes)));

    let dir = self.root.join(kind.dir());
    tokio::fs::create_dir_all(&dir)
      .await
      .map_err(|e| ApiError::Internal(format!("creating {}: {e}", dir.display())))?;
    let path = dir.join(&name);
    tokio::fs::write(&path, &bytes)
      .await
      .map_err(|e| ApiError::Internal(format!("writing {}: {e}", path.display())))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "photo saved");
    Ok(format!("{}/{name}", kind.dir()))
  }
}

/// Strip an optional `data:<mime>;base64,` prefix and decode the rest.
pub fn decode_photo(data: &str) -> Result<Vec<u8>, ApiError> {
  let payload = match data.split_once(',') {
    Some((header, rest)) if header.starts_with("data:") => rest,
    _ => data,
  };
  let bytes = STANDARD
    .decode(payload.trim())
    .map_err(|e| ApiError::BadRequest(format!("photo is not valid base64: {e}")))?;
  if bytes.is_empty() {
    return Err(ApiError::BadRequest("photo is empty".into()));
  }
  Ok(bytes)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_data_urls_and_bare_base64() {
    assert_eq!(decode_photo("data:image/png;base64,aGVsbG8=").unwrap(), b"hello");
    assert_eq!(decode_photo("aGVsbG8=").unwrap(), b"hello");
  }

  #[test]
  fn rejects_garbage() {
    assert!(matches!(decode_photo("data:image/png;base64,!!!"), Err(ApiError::BadRequest(_))));
    assert!(matches!(decode_photo(""), Err(ApiError::BadRequest(_))));
  }

  #[tokio::test]
  async fn saves_under_content_hash() {
    let root = std::env::temp_dir().join(format!("cellar-photos-{}", std::process::id()));
    let photos = PhotoStore::new(&root);

    let path = photos.save(PhotoKind::Bottle, "aGVsbG8=").await.unwrap();
    assert_eq!(
      path,
      "bottles/2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824.png"
    );
    assert_eq!(std::fs::read(root.join(&path)).unwrap(), b"hello");
  }
}
