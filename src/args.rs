// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/args.rs - 项目参数配置
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

use clap::{Args as ClapArgs, Parser, Subcommand};
use url::Url;

use tealeaf::input::StaticPermissions;

pub const DEFAULT_MODEL: &str = "https://web-production-68c40.up.railway.app/";

/// TeaLeafNet 茶叶病虫害诊断
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// 逐张获取图像并诊断，与移动端流程一致
  Diagnose(DiagnoseArgs),
  /// 批量诊断，遇到无法获取的图像立即退出
  Batch(DiagnoseArgs),
  /// 检查远程分类服务状态
  Health(HealthArgs),
  /// 打印病害说明表
  Diseases,
}

#[derive(ClapArgs, Debug)]
pub struct ModelArgs {
  /// 分类模型地址
  /// 支持格式:
  /// - 远程服务: https://host/?timeout=30
  /// - 仅本地启发式: heuristic: 或 heuristic:?seed=42
  #[arg(long, env = "TEALEAF_MODEL", default_value = DEFAULT_MODEL, value_name = "MODEL")]
  pub model: Url,

  /// 本地启发式的随机种子
  #[arg(long, value_name = "SEED")]
  pub seed: Option<u64>,

  /// 远程请求超时（秒），覆盖地址中的 `timeout`
  #[arg(long, value_name = "SECONDS")]
  pub timeout_secs: Option<u64>,
}

#[derive(ClapArgs, Debug)]
pub struct AcquireArgs {
  /// 图像来源，可重复
  /// 支持格式:
  /// - 拍照: camera:///path/to/shot.jpg
  /// - 相册: gallery:///path/to/pick.png
  #[arg(long, value_name = "SOURCE", required = true)]
  pub input: Vec<Url>,

  /// 输出路径
  /// 支持格式:
  /// - 文本: text:- 或 text:///path/report.txt
  /// - JSON: json:- 或 json:///path/results.jsonl?pretty
  #[arg(long, default_value = "text:-", value_name = "OUTPUT")]
  pub output: Url,

  /// 模拟拒绝相机权限
  #[arg(long)]
  pub deny_camera: bool,

  /// 模拟拒绝媒体库权限
  #[arg(long)]
  pub deny_media_library: bool,

  /// 最大处理图像数（0 表示无限制）
  #[arg(long, default_value = "0", value_name = "COUNT")]
  pub max_images: usize,
}

impl AcquireArgs {
  pub fn permissions(&self) -> StaticPermissions {
    StaticPermissions {
      camera: !self.deny_camera,
      media_library: !self.deny_media_library,
    }
  }

  pub fn limit(&self) -> Option<usize> {
    (self.max_images > 0).then_some(self.max_images)
  }
}

#[derive(ClapArgs, Debug)]
pub struct DiagnoseArgs {
  #[command(flatten)]
  pub model: ModelArgs,

  #[command(flatten)]
  pub acquire: AcquireArgs,
}

#[derive(ClapArgs, Debug)]
pub struct HealthArgs {
  /// 远程分类服务地址
  #[arg(long, env = "TEALEAF_MODEL", default_value = DEFAULT_MODEL, value_name = "MODEL")]
  pub model: Url,
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn arguments_are_consistent() {
    Args::command().debug_assert();
  }

  #[test]
  fn diagnose_collects_repeated_inputs() {
    let args = Args::try_parse_from([
      "tealeaf",
      "diagnose",
      "--model",
      "heuristic:",
      "--input",
      "camera:///a.jpg",
      "--input",
      "gallery:///b.png",
      "--deny-camera",
    ])
    .unwrap();
    let Command::Diagnose(diagnose) = args.command else {
      panic!("expected diagnose");
    };
    assert_eq!(diagnose.acquire.input.len(), 2);
    assert_eq!(diagnose.acquire.output.as_str(), "text:-");
    assert!(!diagnose.acquire.permissions().camera);
    assert!(diagnose.acquire.permissions().media_library);
    assert_eq!(diagnose.acquire.limit(), None);
  }

  #[test]
  fn batch_accepts_limit_and_timeout() {
    let args = Args::try_parse_from([
      "tealeaf",
      "batch",
      "--input",
      "gallery:///b.png",
      "--max-images",
      "3",
      "--timeout-secs",
      "5",
    ])
    .unwrap();
    let Command::Batch(batch) = args.command else {
      panic!("expected batch");
    };
    assert_eq!(batch.acquire.limit(), Some(3));
    assert_eq!(batch.model.timeout_secs, Some(5));
  }
}
