// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/model/remote.rs - 远程分类服务
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

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl,
  input::LeafImage,
  model::{
    AnalysisMethod, Confidence, Diagnosis, DiseaseClass, DiseaseDetection, Model,
    UnknownDiseaseCode,
  },
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ANALYZE_PATH: &str = "analyze";
const HEALTH_PATH: &str = "health";

#[derive(Error, Debug)]
pub enum RemoteModelError {
  #[error("模型地址必须使用 http 或 https 方案, 实际为 {0}")]
  SchemeMismatch(String),
  #[error("超时参数无效: {0}")]
  InvalidTimeout(String),
  #[error("URL 错误: {0}")]
  UrlError(#[from] url::ParseError),
  #[error("HTTP 错误: {0}")]
  HttpError(#[from] reqwest::Error),
  #[error("响应缺少字段: {0}")]
  MissingField(&'static str),
  #[error("响应包含未知病害: {0}")]
  UnknownDisease(#[from] UnknownDiseaseCode),
}

#[derive(Serialize, Debug)]
struct AnalyzeRequest {
  image: String,
  timestamp: String,
}

/// `/analyze` 响应体，`method`、`timestamp` 等额外字段忽略
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
  pub is_leaf: bool,
  pub leaf_confidence: f32,
  #[serde(default)]
  pub disease_class: Option<String>,
  #[serde(default)]
  pub disease_confidence: Option<f32>,
}

impl TryFrom<AnalyzeResponse> for Diagnosis {
  type Error = RemoteModelError;

  fn try_from(response: AnalyzeResponse) -> Result<Self, Self::Error> {
    let confidence = Confidence::from_reported(response.leaf_confidence);
    if !response.is_leaf {
      if response.disease_class.is_some() {
        debug!("非叶片结果附带了病害字段, 已丢弃");
      }
      return Ok(Diagnosis::NonLeaf { confidence });
    }

    let class: DiseaseClass = response
      .disease_class
      .as_deref()
      .ok_or(RemoteModelError::MissingField("diseaseClass"))?
      .parse()?;
    let disease_confidence = response
      .disease_confidence
      .ok_or(RemoteModelError::MissingField("diseaseConfidence"))?;

    Ok(Diagnosis::Leaf {
      confidence,
      disease: DiseaseDetection {
        class,
        confidence: Confidence::from_reported(disease_confidence),
      },
    })
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
  pub status: String,
  #[serde(default)]
  pub service: Option<String>,
  #[serde(default)]
  pub models_loaded: Option<bool>,
  #[serde(default)]
  pub platform: Option<String>,
}

impl HealthStatus {
  pub fn is_healthy(&self) -> bool {
    self.status == "healthy" && self.models_loaded.unwrap_or(true)
  }
}

pub struct RemoteModelBuilder {
  endpoint: Url,
  timeout: Duration,
}

impl RemoteModelBuilder {
  pub const SCHEMES: [&'static str; 2] = ["http", "https"];

  pub fn accepts(scheme: &str) -> bool {
    Self::SCHEMES.iter().any(|s| *s == scheme)
  }

  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn build(self) -> Result<RemoteModel, RemoteModelError> {
    info!("远程模型地址: {} (超时 {:?})", self.endpoint, self.timeout);
    let client = reqwest::Client::builder().timeout(self.timeout).build()?;
    Ok(RemoteModel {
      analyze_url: self.endpoint.join(ANALYZE_PATH)?,
      health_url: self.endpoint.join(HEALTH_PATH)?,
      timeout: self.timeout,
      client,
    })
  }
}

impl FromUrl for RemoteModelBuilder {
  type Error = RemoteModelError;

  /// `https://host/base/?timeout=10`，`timeout` 单位为秒
  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if !Self::accepts(url.scheme()) {
      return Err(RemoteModelError::SchemeMismatch(url.scheme().to_string()));
    }

    let timeout = url
      .query_pairs()
      .find(|(k, _)| k == "timeout")
      .map(|(_, v)| {
        v.parse::<u64>()
          .map(Duration::from_secs)
          .map_err(|_| RemoteModelError::InvalidTimeout(v.to_string()))
      })
      .transpose()?
      .unwrap_or(DEFAULT_TIMEOUT);

    // 以目录形式拼接 analyze / health
    let mut endpoint = url.clone();
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    if !endpoint.path().ends_with('/') {
      let path = format!("{}/", endpoint.path());
      endpoint.set_path(&path);
    }

    Ok(RemoteModelBuilder { endpoint, timeout })
  }
}

pub struct RemoteModel {
  client: reqwest::Client,
  analyze_url: Url,
  health_url: Url,
  timeout: Duration,
}

impl RemoteModel {
  pub fn analyze_url(&self) -> &Url {
    &self.analyze_url
  }

  pub fn health_url(&self) -> &Url {
    &self.health_url
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  pub async fn health(&self) -> Result<HealthStatus, RemoteModelError> {
    let status = self
      .client
      .get(self.health_url.clone())
      .send()
      .await?
      .error_for_status()?
      .json::<HealthStatus>()
      .await?;
    debug!("健康检查结果: {:?}", status);
    Ok(status)
  }
}

impl Model for RemoteModel {
  type Input = LeafImage;
  type Output = Diagnosis;
  type Error = RemoteModelError;

  async fn infer(&self, input: &LeafImage) -> Result<Diagnosis, RemoteModelError> {
    let request = AnalyzeRequest {
      image: STANDARD.encode(input.data()),
      timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    debug!("发送图像到 {} ({} 字节)", self.analyze_url, input.data().len());

    let response = self
      .client
      .post(self.analyze_url.clone())
      .json(&request)
      .send()
      .await?
      .error_for_status()?
      .json::<AnalyzeResponse>()
      .await?;
    debug!("远程模型响应: {:?}", response);

    Diagnosis::try_from(response)
  }

  fn method(&self) -> AnalysisMethod {
    AnalysisMethod::Remote
  }
}
