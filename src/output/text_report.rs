// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/output/text_report.rs - 文本报告输出
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

use thiserror::Error;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  analysis::AnalysisResult,
  model::DiseaseClass,
  output::{
    Destination, Render,
    disease_info::{DiseaseInfo, disease_info},
    report::Report,
  },
};

#[derive(Error, Debug)]
pub enum TextReportError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

fn write_info(f: &mut fmt::Formatter<'_>, info: &DiseaseInfo) -> fmt::Result {
  writeln!(f, "  {} ({})", info.title, info.color)?;
  writeln!(f, "  {}", info.description)?;
  writeln!(f, "  Management:")?;
  for advice in info.management {
    writeln!(f, "    • {}", advice)?;
  }
  Ok(())
}

impl fmt::Display for Report<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Analysis Results: {}", self.image_uri)?;
    writeln!(f)?;
    writeln!(f, "Stage 1: Leaf Detection")?;
    let mark = if self.leaf.is_leaf { "✅" } else { "❌" };
    writeln!(f, "  {} {}", mark, self.leaf.headline)?;
    writeln!(
      f,
      "  {}: {}",
      self.leaf.confidence_label, self.leaf.confidence
    )?;

    if let Some(disease) = &self.disease {
      writeln!(f)?;
      writeln!(f, "Stage 2: Disease/Pest Detection")?;
      writeln!(f, "  Status: {}", disease.status)?;
      writeln!(f, "  Confidence: {} {}", disease.confidence, disease.bar)?;
      writeln!(f)?;
      write_info(f, disease.info)?;
    }

    if self.method.is_fallback() {
      writeln!(f)?;
      writeln!(f, "(result produced locally: {})", self.method)?;
    }
    Ok(())
  }
}

/// 所有病害说明
pub struct DiseaseTable;

impl fmt::Display for DiseaseTable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (index, class) in DiseaseClass::ALL.iter().enumerate() {
      if index > 0 {
        writeln!(f)?;
      }
      writeln!(f, "[{}]", class.code())?;
      write_info(f, disease_info(*class))?;
    }
    Ok(())
  }
}

/// `text:-` 输出到标准输出，`text:///path/report.txt` 写入文件
pub struct TextReportOutput {
  destination: Destination,
}

impl FromUrlWithScheme for TextReportOutput {
  const SCHEME: &'static str = "text";
}

impl FromUrl for TextReportOutput {
  type Error = TextReportError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(TextReportError::SchemeMismatch(url.scheme().to_string()));
    }
    Ok(TextReportOutput {
      destination: Destination::from_url(url),
    })
  }
}

impl Render<AnalysisResult> for TextReportOutput {
  type Error = TextReportError;

  fn render_result(&self, result: &AnalysisResult) -> Result<(), Self::Error> {
    let text = Report::from(result).to_string();
    self.destination.write(text.as_bytes())?;
    Ok(())
  }
}
