// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/task.rs - 分析任务
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
use std::future::Future;

use tracing::{info, warn};

use crate::{
  analysis::{AnalysisClient, AnalysisResult},
  input::LeafImage,
  model::{Diagnosis, Model},
  output::Render,
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(
    self,
    input: I,
    client: &AnalysisClient<M>,
    output: O,
  ) -> impl Future<Output = Result<usize, Self::Error>>;
}

pub struct OneShotTask;

impl<
  ME: Display,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = LeafImage>,
  M: Model<Input = LeafImage, Output = Diagnosis, Error = ME>,
  O: Render<AnalysisResult, Error = RE>,
> Task<I, M, O> for OneShotTask
{
  type Error = anyhow::Error;

  async fn run_task(
    self,
    mut input: I,
    client: &AnalysisClient<M>,
    output: O,
  ) -> Result<usize, Self::Error> {
    info!("开始任务...");
    let image = input.next().ok_or_else(|| anyhow::anyhow!("没有输入图像"))?;
    let result = client.analyze(&image).await;
    output.render_result(&result)?;
    info!("任务完成");
    Ok(1)
  }
}

/// 依次分析每张图像，每张都是独立的一次请求
#[derive(Default, Debug)]
pub struct BatchTask {
  limit: Option<usize>,
}

impl BatchTask {
  pub fn with_limit(mut self, limit: Option<usize>) -> Self {
    self.limit = limit;
    self
  }
}

impl<
  ME: Display,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = LeafImage>,
  M: Model<Input = LeafImage, Output = Diagnosis, Error = ME>,
  O: Render<AnalysisResult, Error = RE>,
> Task<I, M, O> for BatchTask
{
  type Error = anyhow::Error;

  async fn run_task(
    self,
    input: I,
    client: &AnalysisClient<M>,
    output: O,
  ) -> Result<usize, Self::Error> {
    info!("开始批量任务...");
    let mut processed = 0;
    let mut fallbacks = 0;
    for image in input {
      if self.limit.map(|n| processed >= n).unwrap_or(false) {
        info!("达到指定图像数 {}, 退出任务循环", processed);
        break;
      }
      info!("处理第 {} 张图像", processed + 1);
      let now = std::time::Instant::now();
      let result = client.analyze(&image).await;
      output.render_result(&result)?;
      info!("第 {} 张完成，耗时: {:.2?}", processed + 1, now.elapsed());
      if result.method().is_fallback() {
        fallbacks += 1;
      }
      processed += 1;
    }

    if fallbacks > 0 {
      warn!("{} / {} 张图像使用了本地结果", fallbacks, processed);
    }
    info!("任务完成，共处理 {} 张图像", processed);
    Ok(processed)
  }
}

#[cfg(test)]
mod tests {
  use std::convert::Infallible;
  use std::sync::Mutex;

  use super::*;
  use crate::{input::AcquisitionSource, model::HeuristicModel};

  #[derive(Default)]
  struct Collect(Mutex<Vec<AnalysisResult>>);

  impl Render<AnalysisResult> for &Collect {
    type Error = Infallible;

    fn render_result(&self, result: &AnalysisResult) -> Result<(), Self::Error> {
      self.0.lock().unwrap().push(result.clone());
      Ok(())
    }
  }

  fn images(count: usize) -> Vec<LeafImage> {
    (0..count)
      .map(|i| LeafImage::new(format!("camera:///{i}"), AcquisitionSource::Camera, vec![0]))
      .collect()
  }

  fn client() -> AnalysisClient<HeuristicModel> {
    AnalysisClient::new(HeuristicModel::with_seed(1), HeuristicModel::with_seed(2))
  }

  #[tokio::test]
  async fn one_shot_uses_first_image_only() {
    let collect = Collect::default();
    let processed = OneShotTask
      .run_task(images(3).into_iter(), &client(), &collect)
      .await
      .unwrap();
    assert_eq!(processed, 1);
    let results = collect.0.lock().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].image_uri(), "camera:///0");
  }

  #[tokio::test]
  async fn one_shot_without_input_fails() {
    let collect = Collect::default();
    let outcome = OneShotTask
      .run_task(Vec::<LeafImage>::new().into_iter(), &client(), &collect)
      .await;
    assert!(outcome.is_err());
  }

  #[tokio::test]
  async fn batch_respects_limit() {
    let collect = Collect::default();
    let processed = BatchTask::default()
      .with_limit(Some(2))
      .run_task(images(5).into_iter(), &client(), &collect)
      .await
      .unwrap();
    assert_eq!(processed, 2);
    assert_eq!(collect.0.lock().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn batch_without_limit_processes_everything() {
    let collect = Collect::default();
    let processed = BatchTask::default()
      .run_task(images(4).into_iter(), &client(), &collect)
      .await
      .unwrap();
    assert_eq!(processed, 4);
    assert!(
      collect
        .0
        .lock()
        .unwrap()
        .iter()
        .all(|r| r.is_leaf() == r.disease_class().is_some())
    );
  }
}
