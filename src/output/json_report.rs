// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/output/json_report.rs - JSON 结果输出
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
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  analysis::AnalysisResult,
  output::{Destination, Render},
};

#[derive(Error, Debug)]
pub enum JsonReportError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("序列化错误: {0}")]
  SerializeError(#[from] serde_json::Error),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 每个结果输出一行 JSON；`?pretty` 时格式化输出
pub struct JsonReportOutput {
  destination: Destination,
  pretty: bool,
}

impl FromUrlWithScheme for JsonReportOutput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for JsonReportOutput {
  type Error = JsonReportError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(JsonReportError::SchemeMismatch(url.scheme().to_string()));
    }
    let pretty = url.query_pairs().any(|(k, _)| k == "pretty");
    Ok(JsonReportOutput {
      destination: Destination::from_url(url),
      pretty,
    })
  }
}

impl Render<AnalysisResult> for JsonReportOutput {
  type Error = JsonReportError;

  fn render_result(&self, result: &AnalysisResult) -> Result<(), Self::Error> {
    let mut line = if self.pretty {
      serde_json::to_vec_pretty(result)?
    } else {
      serde_json::to_vec(result)?
    };
    line.push(b'\n');
    self.destination.write(&line)?;
    Ok(())
  }
}
