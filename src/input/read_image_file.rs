// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::input::{
  AcquisitionSource, LeafImage, Permission, PermissionProvider, request_permissions,
};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch: {0}")]
  SchemaMismatch(String),
  #[error("Permission denied: {0}")]
  PermissionDenied(Permission),
  #[error("Invalid image path: {0}")]
  InvalidPath(String),
  #[error("I/O error reading {origin} image: {error}")]
  IoError {
    origin: AcquisitionSource,
    error: std::io::Error,
  },
}

impl ImageFileInputError {
  pub fn origin(&self) -> Option<AcquisitionSource> {
    match self {
      ImageFileInputError::IoError { origin, .. } => Some(*origin),
      _ => None,
    }
  }
}

/// 从 `camera://` 或 `gallery://` URL 读取一张图像
///
/// 读取前先申请运行时权限。
pub struct ImageFileInput {
  image: Option<LeafImage>,
}

impl ImageFileInput {
  pub fn acquire<P>(url: &Url, permissions: &P) -> Result<Self, ImageFileInputError>
  where
    P: PermissionProvider + ?Sized,
  {
    let source = AcquisitionSource::from_scheme(url.scheme()).ok_or_else(|| {
      error!(
        "URI scheme mismatch: expected 'camera' or 'gallery', found '{}'",
        url.scheme()
      );
      ImageFileInputError::SchemaMismatch(url.scheme().to_string())
    })?;

    request_permissions(permissions).map_err(ImageFileInputError::PermissionDenied)?;

    let path = urlencoding::decode(url.path())
      .map_err(|_| ImageFileInputError::InvalidPath(url.path().to_string()))?;
    if path.is_empty() {
      return Err(ImageFileInputError::InvalidPath(url.to_string()));
    }

    let data = std::fs::read(path.as_ref()).map_err(|error| ImageFileInputError::IoError {
      origin: source,
      error,
    })?;
    info!("读取图像 {} ({} 字节)", url, data.len());

    Ok(ImageFileInput {
      image: Some(LeafImage::new(url.as_str(), source, data)),
    })
  }

  pub fn into_image(mut self) -> Option<LeafImage> {
    self.image.take()
  }
}

impl Iterator for ImageFileInput {
  type Item = LeafImage;

  fn next(&mut self) -> Option<Self::Item> {
    self.image.take()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::input::StaticPermissions;

  #[test]
  fn reads_file_behind_gallery_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("my leaf.jpg");
    std::fs::write(&path, b"bytes").unwrap();
    let url = Url::from_file_path(&path).unwrap();
    let url = Url::parse(&url.as_str().replacen("file:", "gallery:", 1)).unwrap();

    let mut input = ImageFileInput::acquire(&url, &StaticPermissions::granted()).unwrap();
    let image = input.next().unwrap();
    assert_eq!(image.data(), b"bytes");
    assert_eq!(image.source(), AcquisitionSource::Gallery);
    assert!(input.next().is_none());
  }

  #[test]
  fn rejects_unknown_scheme() {
    let url = Url::parse("image:///tmp/leaf.jpg").unwrap();
    let result = ImageFileInput::acquire(&url, &StaticPermissions::granted());
    assert!(matches!(result, Err(ImageFileInputError::SchemaMismatch(_))));
  }

  #[test]
  fn denied_permission_stops_before_reading() {
    let url = Url::parse("camera:///definitely/not/there.jpg").unwrap();
    let permissions = StaticPermissions {
      camera: false,
      media_library: true,
    };
    let result = ImageFileInput::acquire(&url, &permissions);
    assert!(matches!(
      result,
      Err(ImageFileInputError::PermissionDenied(Permission::Camera))
    ));
  }

  #[test]
  fn missing_file_reports_its_origin() {
    let url = Url::parse("camera:///definitely/not/there.jpg").unwrap();
    let error = ImageFileInput::acquire(&url, &StaticPermissions::granted())
      .err()
      .unwrap();
    assert_eq!(error.origin(), Some(AcquisitionSource::Camera));
  }
}
