// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/input.rs - 图像获取
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

use std::fmt;
use std::io::Cursor;

use image::{ImageReader, ImageResult};

mod permission;
pub use self::permission::{
  Permission, PermissionProvider, PermissionStatus, StaticPermissions, request_permissions,
};

mod read_image_file;
pub use self::read_image_file::{ImageFileInput, ImageFileInputError};

/// 图像来源：拍照或相册
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionSource {
  Camera,
  Gallery,
}

impl AcquisitionSource {
  pub fn scheme(&self) -> &'static str {
    match self {
      AcquisitionSource::Camera => "camera",
      AcquisitionSource::Gallery => "gallery",
    }
  }

  pub fn from_scheme(scheme: &str) -> Option<Self> {
    match scheme {
      "camera" => Some(AcquisitionSource::Camera),
      "gallery" => Some(AcquisitionSource::Gallery),
      _ => None,
    }
  }
}

impl fmt::Display for AcquisitionSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.scheme())
  }
}

/// 待分析的叶片图像，保存原始编码字节
#[derive(Debug, Clone)]
pub struct LeafImage {
  uri: String,
  source: AcquisitionSource,
  data: Box<[u8]>,
}

impl LeafImage {
  pub fn new(uri: impl Into<String>, source: AcquisitionSource, data: Vec<u8>) -> Self {
    Self {
      uri: uri.into(),
      source,
      data: data.into_boxed_slice(),
    }
  }

  pub fn uri(&self) -> &str {
    &self.uri
  }

  pub fn source(&self) -> AcquisitionSource {
    self.source
  }

  pub fn data(&self) -> &[u8] {
    &self.data
  }

  /// 只解析图像头部获取宽高，不解码像素
  pub fn dimensions(&self) -> ImageResult<(u32, u32)> {
    ImageReader::new(Cursor::new(&self.data[..]))
      .with_guessed_format()?
      .into_dimensions()
  }
}
