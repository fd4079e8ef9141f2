// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/analysis/client.rs - 分析客户端
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

use tracing::{info, warn};

use crate::{
  analysis::AnalysisResult,
  input::LeafImage,
  model::{AnalysisMethod, Diagnosis, HeuristicModel, Model},
};

/// 单次分析客户端
///
/// 先调用主模型；主模型失败时改用本地启发式，启发式也失败时给出随机默认值。
/// `analyze` 不会返回错误。
pub struct AnalysisClient<M> {
  primary: M,
  fallback: HeuristicModel,
}

impl<M> AnalysisClient<M> {
  pub fn new(primary: M, fallback: HeuristicModel) -> Self {
    Self { primary, fallback }
  }

  pub fn primary(&self) -> &M {
    &self.primary
  }
}

impl<M, E> AnalysisClient<M>
where
  M: Model<Input = LeafImage, Output = Diagnosis, Error = E>,
  E: Display,
{
  pub async fn analyze(&self, image: &LeafImage) -> AnalysisResult {
    info!("开始分析图像: {}", image.uri());
    let now = std::time::Instant::now();

    let (diagnosis, method) = match self.primary.infer(image).await {
      Ok(diagnosis) => (diagnosis, self.primary.method()),
      Err(e) => {
        warn!("主模型分析失败, 改用本地启发式: {}", e);
        self.run_fallback(image).await
      }
    };

    info!(
      "分析完成 ({}), 耗时: {:.2?}, 叶片: {}",
      method,
      now.elapsed(),
      diagnosis.is_leaf()
    );
    AnalysisResult::new(diagnosis, image.uri(), method)
  }

  async fn run_fallback(&self, image: &LeafImage) -> (Diagnosis, AnalysisMethod) {
    match self.fallback.infer(image).await {
      Ok(diagnosis) => (diagnosis, self.fallback.method()),
      Err(e) => {
        warn!("本地启发式失败, 使用随机默认结果: {}", e);
        (self.fallback.random_default(), AnalysisMethod::RandomDefault)
      }
    }
  }
}
