// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// tests/common/fixtures.rs - 测试图像
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

use image::{ImageBuffer, Rgb};
use tempfile::NamedTempFile;
use url::Url;

use tealeaf::input::{AcquisitionSource, LeafImage};

/// 生成一张绿色 PNG 测试图像，文件随返回值释放
pub fn create_leaf_png(width: u32, height: u32) -> NamedTempFile {
  let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([40u8, 140u8, 60u8]));
  let file = tempfile::Builder::new()
    .suffix(".png")
    .tempfile()
    .expect("Failed to create temp image file");
  img
    .save_with_format(file.path(), image::ImageFormat::Png)
    .expect("Failed to save test image");
  file
}

/// 以指定来源方案指向临时文件
pub fn source_url(file: &NamedTempFile, source: AcquisitionSource) -> Url {
  let url = Url::from_file_path(file.path()).expect("Temp path is not absolute");
  Url::parse(&url.as_str().replacen("file:", &format!("{}:", source.scheme()), 1))
    .expect("Failed to build source url")
}

/// 直接在内存中构造图像，不经过权限检查
pub fn leaf_image(file: &NamedTempFile) -> LeafImage {
  let data = std::fs::read(file.path()).expect("Failed to read test image");
  LeafImage::new(
    source_url(file, AcquisitionSource::Camera).to_string(),
    AcquisitionSource::Camera,
    data,
  )
}

/// 无法解码的图像数据
pub fn junk_image() -> LeafImage {
  LeafImage::new("camera:///junk.jpg", AcquisitionSource::Camera, vec![0xde, 0xad, 0xbe, 0xef])
}
