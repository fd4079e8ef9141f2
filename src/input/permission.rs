// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/input/permission.rs - 运行时权限
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

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
  Camera,
  MediaLibrary,
}

impl fmt::Display for Permission {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Permission::Camera => f.write_str("camera"),
      Permission::MediaLibrary => f.write_str("media library"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
  Granted,
  Denied,
}

pub trait PermissionProvider {
  fn request(&self, permission: Permission) -> PermissionStatus;
}

/// 预先确定的权限状态，命令行与测试使用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticPermissions {
  pub camera: bool,
  pub media_library: bool,
}

impl StaticPermissions {
  pub fn granted() -> Self {
    Self {
      camera: true,
      media_library: true,
    }
  }
}

impl Default for StaticPermissions {
  fn default() -> Self {
    Self::granted()
  }
}

impl PermissionProvider for StaticPermissions {
  fn request(&self, permission: Permission) -> PermissionStatus {
    let granted = match permission {
      Permission::Camera => self.camera,
      Permission::MediaLibrary => self.media_library,
    };
    if granted {
      PermissionStatus::Granted
    } else {
      PermissionStatus::Denied
    }
  }
}

/// 拍照与相册两种方式都需要相机和媒体库权限
///
/// 两项权限都会被请求，返回第一个被拒绝的权限。
pub fn request_permissions<P>(provider: &P) -> Result<(), Permission>
where
  P: PermissionProvider + ?Sized,
{
  let mut denied = None;
  for permission in [Permission::Camera, Permission::MediaLibrary] {
    match provider.request(permission) {
      PermissionStatus::Granted => debug!("已获得权限: {}", permission),
      PermissionStatus::Denied => {
        warn!("权限被拒绝: {}", permission);
        denied.get_or_insert(permission);
      }
    }
  }
  denied.map_or(Ok(()), Err)
}
