// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/analysis.rs - 分析结果
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

use serde::Serialize;

use crate::model::{AnalysisMethod, Confidence, Diagnosis, DiseaseClass};

mod client;
pub use self::client::AnalysisClient;

/// 一次分析的结果，构造后不可变
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "AnalysisRecord")]
pub struct AnalysisResult {
  diagnosis: Diagnosis,
  image_uri: String,
  method: AnalysisMethod,
}

impl AnalysisResult {
  pub fn new(diagnosis: Diagnosis, image_uri: impl Into<String>, method: AnalysisMethod) -> Self {
    Self {
      diagnosis,
      image_uri: image_uri.into(),
      method,
    }
  }

  pub fn diagnosis(&self) -> &Diagnosis {
    &self.diagnosis
  }

  pub fn is_leaf(&self) -> bool {
    self.diagnosis.is_leaf()
  }

  pub fn leaf_confidence(&self) -> Confidence {
    self.diagnosis.leaf_confidence()
  }

  pub fn disease_class(&self) -> Option<DiseaseClass> {
    self.diagnosis.disease().map(|d| d.class)
  }

  pub fn disease_confidence(&self) -> Option<Confidence> {
    self.diagnosis.disease().map(|d| d.confidence)
  }

  pub fn image_uri(&self) -> &str {
    &self.image_uri
  }

  pub fn method(&self) -> AnalysisMethod {
    self.method
  }
}

/// 扁平的 JSON 形式，与远程服务的字段命名一致
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
  pub is_leaf: bool,
  pub leaf_confidence: Confidence,
  pub disease_class: Option<DiseaseClass>,
  pub disease_confidence: Option<Confidence>,
  pub image_uri: String,
  pub method: AnalysisMethod,
}

impl From<AnalysisResult> for AnalysisRecord {
  fn from(result: AnalysisResult) -> Self {
    AnalysisRecord {
      is_leaf: result.is_leaf(),
      leaf_confidence: result.leaf_confidence(),
      disease_class: result.disease_class(),
      disease_confidence: result.disease_confidence(),
      image_uri: result.image_uri,
      method: result.method,
    }
  }
}
