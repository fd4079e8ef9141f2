// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/model.rs - 模型
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
use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, input::LeafImage};

/// 两阶段分类模型
///
/// 真实模型（远程服务）与本地占位启发式都实现该接口。
pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(
    &self,
    input: &Self::Input,
  ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;

  /// 该模型产出结果时记录的来源
  fn method(&self) -> AnalysisMethod;
}

/// 诊断结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
  Remote,
  LocalHeuristic,
  RandomDefault,
}

impl AnalysisMethod {
  pub fn is_fallback(&self) -> bool {
    !matches!(self, AnalysisMethod::Remote)
  }
}

impl fmt::Display for AnalysisMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      AnalysisMethod::Remote => "remote",
      AnalysisMethod::LocalHeuristic => "local_heuristic",
      AnalysisMethod::RandomDefault => "random_default",
    };
    f.write_str(name)
  }
}

/// 百分比置信度，取值范围 [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Confidence(f32);

impl Confidence {
  pub const MIN: f32 = 0.0;
  pub const MAX: f32 = 100.0;

  pub fn from_percent(value: f32) -> Self {
    if value.is_nan() {
      return Confidence(Self::MIN);
    }
    Confidence(value.clamp(Self::MIN, Self::MAX))
  }

  pub fn from_fraction(value: f32) -> Self {
    Self::from_percent(value * 100.0)
  }

  /// 远程服务返回的数值可能是小数（0-1）也可能是百分数，不大于 1 的按小数处理
  pub fn from_reported(value: f32) -> Self {
    if (0.0..=1.0).contains(&value) {
      Self::from_fraction(value)
    } else {
      Self::from_percent(value)
    }
  }

  pub fn percent(&self) -> f32 {
    self.0
  }

  pub fn fraction(&self) -> f32 {
    self.0 / 100.0
  }
}

impl fmt::Display for Confidence {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.2}%", self.0)
  }
}

/// 茶叶病虫害类别，顺序与分类器输出下标一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiseaseClass {
  #[serde(rename = "bb")]
  BrownBlight,
  #[serde(rename = "gl")]
  Healthy,
  #[serde(rename = "rr")]
  RedRust,
  #[serde(rename = "rsm")]
  RedSpiderMites,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知的病害代码: {0}")]
pub struct UnknownDiseaseCode(pub String);

impl DiseaseClass {
  pub const ALL: [DiseaseClass; 4] = [
    DiseaseClass::BrownBlight,
    DiseaseClass::Healthy,
    DiseaseClass::RedRust,
    DiseaseClass::RedSpiderMites,
  ];

  pub fn code(&self) -> &'static str {
    match self {
      DiseaseClass::BrownBlight => "bb",
      DiseaseClass::Healthy => "gl",
      DiseaseClass::RedRust => "rr",
      DiseaseClass::RedSpiderMites => "rsm",
    }
  }

  pub fn is_healthy(&self) -> bool {
    matches!(self, DiseaseClass::Healthy)
  }
}

impl FromStr for DiseaseClass {
  type Err = UnknownDiseaseCode;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let code = s.trim().to_ascii_lowercase();
    Self::ALL
      .into_iter()
      .find(|class| class.code() == code)
      .ok_or_else(|| UnknownDiseaseCode(s.to_string()))
  }
}

impl fmt::Display for DiseaseClass {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiseaseDetection {
  pub class: DiseaseClass,
  pub confidence: Confidence,
}

/// 两阶段诊断
///
/// 只有判定为叶片时才携带第二阶段的病害分类结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnosis {
  Leaf {
    confidence: Confidence,
    disease: DiseaseDetection,
  },
  /// `confidence` 为“不是叶片”的置信度
  NonLeaf { confidence: Confidence },
}

impl Diagnosis {
  pub fn is_leaf(&self) -> bool {
    matches!(self, Diagnosis::Leaf { .. })
  }

  pub fn leaf_confidence(&self) -> Confidence {
    match self {
      Diagnosis::Leaf { confidence, .. } | Diagnosis::NonLeaf { confidence } => *confidence,
    }
  }

  pub fn disease(&self) -> Option<&DiseaseDetection> {
    match self {
      Diagnosis::Leaf { disease, .. } => Some(disease),
      Diagnosis::NonLeaf { .. } => None,
    }
  }
}

pub mod heuristic;
pub use self::heuristic::{HeuristicError, HeuristicModel};

#[cfg(feature = "remote_model")]
pub mod remote;
#[cfg(feature = "remote_model")]
pub use self::remote::{HealthStatus, RemoteModel, RemoteModelBuilder, RemoteModelError};

#[derive(Error, Debug)]
pub enum ModelError {
  #[cfg(feature = "remote_model")]
  #[error("远程模型错误: {0}")]
  RemoteModelError(#[from] RemoteModelError),
  #[error("启发式模型错误: {0}")]
  HeuristicError(#[from] HeuristicError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum ModelWrapper {
  #[cfg(feature = "remote_model")]
  Remote(RemoteModel),
  Heuristic(HeuristicModel),
}

impl FromUrl for ModelWrapper {
  type Error = ModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    #[cfg(feature = "remote_model")]
    {
      if RemoteModelBuilder::accepts(url.scheme()) {
        let model = RemoteModelBuilder::from_url(url)?.build()?;
        return Ok(ModelWrapper::Remote(model));
      }
    }
    if url.scheme() == HeuristicModel::SCHEME {
      return Ok(ModelWrapper::Heuristic(HeuristicModel::from_url(url)?));
    }
    Err(ModelError::SchemeMismatch(url.scheme().to_string()))
  }
}

impl Model for ModelWrapper {
  type Input = LeafImage;
  type Output = Diagnosis;
  type Error = ModelError;

  async fn infer(&self, input: &LeafImage) -> Result<Diagnosis, ModelError> {
    match self {
      #[cfg(feature = "remote_model")]
      ModelWrapper::Remote(model) => model.infer(input).await.map_err(ModelError::from),
      ModelWrapper::Heuristic(model) => model.infer(input).await.map_err(ModelError::from),
    }
  }

  fn method(&self) -> AnalysisMethod {
    match self {
      #[cfg(feature = "remote_model")]
      ModelWrapper::Remote(model) => model.method(),
      ModelWrapper::Heuristic(model) => model.method(),
    }
  }
}
