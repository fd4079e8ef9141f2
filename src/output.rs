// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/output.rs - 输出定义
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

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, analysis::AnalysisResult};

pub trait Render<Output>: Sized {
  type Error;
  fn render_result(&self, result: &Output) -> Result<(), Self::Error>;
}

pub mod disease_info;
pub mod report;

mod text_report;
pub use self::text_report::{DiseaseTable, TextReportError, TextReportOutput};

mod json_report;
pub use self::json_report::{JsonReportError, JsonReportOutput};

const STDOUT_PATH: &str = "-";

/// 输出目标：标准输出或追加写入文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Destination {
  Stdout,
  File(PathBuf),
}

impl Destination {
  pub(crate) fn from_url(url: &Url) -> Self {
    let path = urlencoding::decode(url.path())
      .map(|path| path.into_owned())
      .unwrap_or_else(|_| url.path().to_string());
    if path.is_empty() || path == STDOUT_PATH {
      Destination::Stdout
    } else {
      Destination::File(PathBuf::from(path))
    }
  }

  pub(crate) fn write(&self, bytes: &[u8]) -> std::io::Result<()> {
    match self {
      Destination::Stdout => {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.flush()
      }
      Destination::File(path) => {
        if let Some(parent) = Path::new(path).parent()
          && !parent.as_os_str().is_empty()
        {
          std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(bytes)?;
        info!("结果写入文件: {}", path.display());
        Ok(())
      }
    }
  }
}

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("文本报告错误: {0}")]
  TextReportError(#[from] TextReportError),
  #[error("JSON 输出错误: {0}")]
  JsonReportError(#[from] JsonReportError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum OutputWrapper {
  TextReportOutput(TextReportOutput),
  JsonReportOutput(JsonReportOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      TextReportOutput::SCHEME => {
        let output = TextReportOutput::from_url(url)?;
        Ok(OutputWrapper::TextReportOutput(output))
      }
      JsonReportOutput::SCHEME => {
        let output = JsonReportOutput::from_url(url)?;
        Ok(OutputWrapper::JsonReportOutput(output))
      }
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl Render<AnalysisResult> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, result: &AnalysisResult) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::TextReportOutput(output) => {
        output.render_result(result).map_err(OutputError::from)
      }
      OutputWrapper::JsonReportOutput(output) => {
        output.render_result(result).map_err(OutputError::from)
      }
    }
  }
}
