// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/output/report.rs - 两阶段结果展示内容
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

use crate::{
  analysis::AnalysisResult,
  model::{AnalysisMethod, Confidence, DiseaseClass},
  output::disease_info::{DiseaseInfo, disease_info},
};

pub const PROGRESS_BAR_WIDTH: usize = 20;

/// 宽度与置信度成正比的进度条
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressBar {
  filled: usize,
  width: usize,
}

impl ProgressBar {
  pub fn new(confidence: Confidence, width: usize) -> Self {
    let filled = (confidence.fraction() * width as f32).round() as usize;
    Self {
      filled: filled.min(width),
      width,
    }
  }

  pub fn filled(&self) -> usize {
    self.filled
  }

  pub fn width(&self) -> usize {
    self.width
  }
}

impl fmt::Display for ProgressBar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "[{}{}]",
      "#".repeat(self.filled),
      "-".repeat(self.width - self.filled)
    )
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafStage {
  pub is_leaf: bool,
  pub headline: &'static str,
  pub confidence_label: &'static str,
  pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseStage {
  pub class: DiseaseClass,
  pub status: String,
  pub confidence: Confidence,
  pub bar: ProgressBar,
  pub info: &'static DiseaseInfo,
}

impl DiseaseStage {
  pub fn is_healthy(&self) -> bool {
    self.class.is_healthy()
  }
}

/// 从分析结果和病害说明表得到的展示内容
#[derive(Debug, Clone, PartialEq)]
pub struct Report<'a> {
  pub image_uri: &'a str,
  pub method: AnalysisMethod,
  pub leaf: LeafStage,
  pub disease: Option<DiseaseStage>,
}

impl<'a> From<&'a AnalysisResult> for Report<'a> {
  fn from(result: &'a AnalysisResult) -> Self {
    let leaf = if result.is_leaf() {
      LeafStage {
        is_leaf: true,
        headline: "Image identified as a LEAF",
        confidence_label: "Confidence",
        confidence: result.leaf_confidence(),
      }
    } else {
      LeafStage {
        is_leaf: false,
        headline: "Image does NOT appear to be a leaf",
        confidence_label: "Confidence of being Non-Leaf",
        confidence: result.leaf_confidence(),
      }
    };

    let disease = result.diagnosis().disease().map(|detection| {
      let status = if detection.class.is_healthy() {
        "Healthy Leaf".to_string()
      } else {
        format!(
          "{} (Potential Issue)",
          detection.class.code().to_ascii_uppercase()
        )
      };
      DiseaseStage {
        class: detection.class,
        status,
        confidence: detection.confidence,
        bar: ProgressBar::new(detection.confidence, PROGRESS_BAR_WIDTH),
        info: disease_info(detection.class),
      }
    });

    Report {
      image_uri: result.image_uri(),
      method: result.method(),
      leaf,
      disease,
    }
  }
}
