// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/session.rs - 单用户会话上下文
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

use std::fmt::Display;

use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::{
  analysis::{AnalysisClient, AnalysisResult},
  input::{AcquisitionSource, ImageFileInput, ImageFileInputError, LeafImage, PermissionProvider},
  model::{Diagnosis, Model},
  navigation::{Navigator, Screen},
};

#[derive(Error, Debug)]
pub enum SessionError {
  #[error("图像获取失败: {0}")]
  Acquisition(#[from] ImageFileInputError),
}

/// 面向用户的提示框
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
  pub title: &'static str,
  pub message: &'static str,
}

impl SessionError {
  pub fn alert(&self) -> Alert {
    match self {
      SessionError::Acquisition(ImageFileInputError::PermissionDenied(_)) => Alert {
        title: "Permissions Required",
        message: "Camera and photo library permissions are required to use this app.",
      },
      SessionError::Acquisition(e) => match e.origin() {
        Some(AcquisitionSource::Camera) => Alert {
          title: "Error",
          message: "Failed to take photo",
        },
        Some(AcquisitionSource::Gallery) => Alert {
          title: "Error",
          message: "Failed to pick image from gallery",
        },
        None => Alert {
          title: "Analysis Error",
          message: "Failed to analyze the image. Please try again.",
        },
      },
    }
  }
}

/// 一个会话持有导航历史、分析客户端和当前结果
///
/// 同一时刻只有一个分析在进行，由 `&mut self` 保证。
pub struct Session<M> {
  navigator: Navigator,
  client: AnalysisClient<M>,
  selected_image: Option<String>,
  result: Option<AnalysisResult>,
}

impl<M> Session<M> {
  pub fn new(client: AnalysisClient<M>) -> Self {
    Self {
      navigator: Navigator::default(),
      client,
      selected_image: None,
      result: None,
    }
  }

  pub fn navigator(&self) -> &Navigator {
    &self.navigator
  }

  pub fn current_screen(&self) -> Screen {
    self.navigator.current()
  }

  pub fn selected_image(&self) -> Option<&str> {
    self.selected_image.as_deref()
  }

  pub fn result(&self) -> Option<&AnalysisResult> {
    self.result.as_ref()
  }

  /// 启动页结束后进入首页
  pub fn start(&mut self) {
    if self.navigator.current() == Screen::Splash {
      self.navigator.navigate_to(Screen::Home);
    }
  }

  /// 丢弃当前结果，回到首页
  pub fn new_analysis(&mut self) {
    self.selected_image = None;
    self.result = None;
    self.navigator.navigate_to(Screen::Home);
  }

  pub fn go_back(&mut self) -> bool {
    self.navigator.go_back()
  }

  pub fn can_go_back(&self) -> bool {
    self.navigator.can_go_back()
  }
}

impl<M, E> Session<M>
where
  M: Model<Input = LeafImage, Output = Diagnosis, Error = E>,
  E: Display,
{
  pub async fn analyze_image(&mut self, image: LeafImage) -> &AnalysisResult {
    self.result = None;
    self.selected_image = Some(image.uri().to_string());
    self.navigator.navigate_to(Screen::Analysis);

    let result = self.client.analyze(&image).await;
    self.result.insert(result)
  }

  pub async fn acquire_and_analyze<P>(
    &mut self,
    url: &Url,
    permissions: &P,
  ) -> Result<&AnalysisResult, SessionError>
  where
    P: PermissionProvider + ?Sized,
  {
    let image = match ImageFileInput::acquire(url, permissions) {
      Ok(input) => input.into_image(),
      Err(e) => {
        error!("获取图像失败: {}", e);
        return Err(e.into());
      }
    };

    match image {
      Some(image) => {
        info!("已选择图像: {}", image.uri());
        Ok(self.analyze_image(image).await)
      }
      None => Err(SessionError::Acquisition(ImageFileInputError::InvalidPath(
        url.to_string(),
      ))),
    }
  }
}
