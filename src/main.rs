// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use tealeaf::{
  FromUrl,
  analysis::AnalysisClient,
  input::{ImageFileInput, LeafImage},
  model::{HeuristicModel, Model, ModelWrapper},
  output::{DiseaseTable, OutputWrapper, Render},
  session::Session,
  task::{BatchTask, Task},
};

use args::{Args, Command, DiagnoseArgs, HealthArgs, ModelArgs};

fn build_model(args: &ModelArgs) -> Result<ModelWrapper> {
  #[cfg(feature = "remote_model")]
  {
    use tealeaf::model::RemoteModelBuilder;
    if let Some(secs) = args.timeout_secs
      && RemoteModelBuilder::accepts(args.model.scheme())
    {
      let model = RemoteModelBuilder::from_url(&args.model)?
        .timeout(std::time::Duration::from_secs(secs))
        .build()?;
      return Ok(ModelWrapper::Remote(model));
    }
  }
  if args.timeout_secs.is_some() {
    warn!("超时参数仅对远程模型有效: {}", args.model);
  }
  Ok(ModelWrapper::from_url(&args.model)?)
}

fn build_client(args: &ModelArgs) -> Result<AnalysisClient<ModelWrapper>> {
  info!("模型地址: {}", args.model);
  let model = build_model(args)?;
  let client = AnalysisClient::new(model, HeuristicModel::from_seed(args.seed));
  info!("主模型: {}", client.primary().method());
  Ok(client)
}

/// 返回成功分析的图像数；有图像获取失败时在全部处理后返回错误
async fn diagnose(args: DiagnoseArgs) -> Result<usize> {
  let client = build_client(&args.model)?;
  let output = OutputWrapper::from_url(&args.acquire.output)?;
  let permissions = args.acquire.permissions();

  let mut session = Session::new(client);
  session.start();

  let limit = args.acquire.limit().unwrap_or(usize::MAX);
  let mut analyzed = 0;
  let mut failures = 0;
  for url in args.acquire.input.iter().take(limit) {
    info!("输入来源: {}", url);
    let now = std::time::Instant::now();
    match session.acquire_and_analyze(url, &permissions).await {
      Ok(result) => {
        info!("分析完成，耗时: {:.2?}", now.elapsed());
        output.render_result(result)?;
        session.new_analysis();
        analyzed += 1;
      }
      Err(e) => {
        let alert = e.alert();
        error!("{}: {}", alert.title, alert.message);
        failures += 1;
      }
    }
  }

  if failures > 0 {
    anyhow::bail!("{} 张图像未能分析", failures);
  }
  Ok(analyzed)
}

/// 超出 `--max-images` 的输入不会被读取
async fn batch(args: DiagnoseArgs) -> Result<usize> {
  let client = build_client(&args.model)?;
  let output = OutputWrapper::from_url(&args.acquire.output)?;
  let permissions = args.acquire.permissions();

  let limit = args.acquire.limit().unwrap_or(usize::MAX);
  let mut images: Vec<LeafImage> = Vec::new();
  for url in args.acquire.input.iter().take(limit) {
    images.extend(ImageFileInput::acquire(url, &permissions)?);
  }

  BatchTask::default()
    .with_limit(args.acquire.limit())
    .run_task(images.into_iter(), &client, output)
    .await
}

#[cfg(feature = "remote_model")]
async fn health(args: HealthArgs) -> Result<()> {
  let model = tealeaf::model::RemoteModelBuilder::from_url(&args.model)?.build()?;
  let status = model.health().await?;
  info!("服务状态: {:?}", status);
  println!(
    "{}: {} (service: {}, platform: {}, models loaded: {})",
    model.health_url(),
    status.status,
    status.service.as_deref().unwrap_or("unknown"),
    status.platform.as_deref().unwrap_or("unknown"),
    status
      .models_loaded
      .map(|loaded| loaded.to_string())
      .unwrap_or_else(|| "unknown".to_string()),
  );
  if !status.is_healthy() {
    warn!("服务状态异常: {}", status.status);
    anyhow::bail!("服务不可用: {}", status.status);
  }
  Ok(())
}

#[cfg(not(feature = "remote_model"))]
async fn health(args: HealthArgs) -> Result<()> {
  anyhow::bail!("未启用远程模型，无法检查 {}", args.model)
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  match args.command {
    Command::Diagnose(args) => diagnose(args).await.map(|_| ()),
    Command::Batch(args) => batch(args).await.map(|_| ()),
    Command::Health(args) => health(args).await,
    Command::Diseases => {
      print!("{}", DiseaseTable);
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use std::path::{Path, PathBuf};

  use image::RgbImage;
  use url::Url;

  use super::*;

  fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::new(120, 90).save(&path).unwrap();
    path
  }

  fn with_scheme(path: &Path, scheme: &str) -> String {
    let url = Url::from_file_path(path).unwrap();
    url.as_str().replacen("file:", &format!("{scheme}:"), 1)
  }

  fn command_args(argv: &[&str]) -> DiagnoseArgs {
    match Args::try_parse_from(argv).unwrap().command {
      Command::Diagnose(args) | Command::Batch(args) => args,
      other => panic!("unexpected command: {other:?}"),
    }
  }

  fn report_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
      .map(|text| text.lines().count())
      .unwrap_or(0)
  }

  struct Workspace {
    _dir: tempfile::TempDir,
    leaf: String,
    missing: String,
    report: PathBuf,
    output: String,
  }

  fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let leaf = with_scheme(&write_png(dir.path(), "leaf.png"), "gallery");
    let missing = with_scheme(&dir.path().join("missing.png"), "gallery");
    let report = dir.path().join("results.jsonl");
    let output = with_scheme(&report, "json");
    Workspace {
      _dir: dir,
      leaf,
      missing,
      report,
      output,
    }
  }

  #[tokio::test]
  async fn batch_limit_skips_inputs_past_the_limit() {
    let ws = workspace();
    let args = command_args(&[
      "tealeaf", "batch", "--model", "heuristic:", "--max-images", "1", "--input", ws.leaf.as_str(),
      "--input", ws.missing.as_str(), "--output", ws.output.as_str(),
    ]);
    assert_eq!(batch(args).await.unwrap(), 1);
    assert_eq!(report_lines(&ws.report), 1);
  }

  #[tokio::test]
  async fn batch_aborts_on_first_failed_acquisition() {
    let ws = workspace();
    let args = command_args(&[
      "tealeaf", "batch", "--model", "heuristic:", "--input", ws.missing.as_str(), "--input", ws.leaf.as_str(),
      "--output", ws.output.as_str(),
    ]);
    assert!(batch(args).await.is_err());
    assert_eq!(report_lines(&ws.report), 0);
  }

  #[tokio::test]
  async fn diagnose_continues_past_failed_acquisition() {
    let ws = workspace();
    let args = command_args(&[
      "tealeaf", "diagnose", "--model", "heuristic:", "--input", ws.missing.as_str(), "--input", ws.leaf.as_str(),
      "--output", ws.output.as_str(),
    ]);
    assert!(diagnose(args).await.is_err());
    assert_eq!(report_lines(&ws.report), 1);
  }

  #[tokio::test]
  async fn diagnose_counts_every_analyzed_image() {
    let ws = workspace();
    let args = command_args(&[
      "tealeaf", "diagnose", "--model", "heuristic:", "--seed", "7", "--input", ws.leaf.as_str(),
      "--input", ws.leaf.as_str(), "--output", ws.output.as_str(),
    ]);
    assert_eq!(diagnose(args).await.unwrap(), 2);
    assert_eq!(report_lines(&ws.report), 2);
  }

  #[tokio::test]
  async fn denied_permission_is_reported_and_skipped() {
    let ws = workspace();
    let args = command_args(&[
      "tealeaf", "diagnose", "--model", "heuristic:", "--deny-media-library", "--input",
      ws.leaf.as_str(), "--output", ws.output.as_str(),
    ]);
    assert!(diagnose(args).await.is_err());
    assert_eq!(report_lines(&ws.report), 0);
  }

  #[cfg(feature = "remote_model")]
  fn remote_model_args(extra: &[&str]) -> ModelArgs {
    let mut argv: Vec<&str> = vec![
      "tealeaf",
      "diagnose",
      "--model",
      "http://127.0.0.1:1/?timeout=30",
      "--input",
      "camera:///x.jpg",
    ];
    argv.extend_from_slice(extra);
    command_args(&argv).model
  }

  #[cfg(feature = "remote_model")]
  #[test]
  fn timeout_flag_overrides_url_timeout() {
    let ModelWrapper::Remote(model) = build_model(&remote_model_args(&["--timeout-secs", "5"])).unwrap()
    else {
      panic!("expected remote model");
    };
    assert_eq!(model.timeout(), std::time::Duration::from_secs(5));

    let ModelWrapper::Remote(model) = build_model(&remote_model_args(&[])).unwrap() else {
      panic!("expected remote model");
    };
    assert_eq!(model.timeout(), std::time::Duration::from_secs(30));
  }

  #[test]
  fn timeout_flag_is_ignored_for_heuristic_model() {
    let args = command_args(&[
      "tealeaf", "diagnose", "--model", "heuristic:", "--timeout-secs", "5", "--input",
      "camera:///x.jpg",
    ]);
    assert!(matches!(
      build_model(&args.model).unwrap(),
      ModelWrapper::Heuristic(_)
    ));
  }
}
