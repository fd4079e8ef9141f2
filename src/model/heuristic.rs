// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/model/heuristic.rs - 本地启发式占位模型
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

//! 远程服务不可用时的演示用启发式。
//!
//! 这里的置信度只是展示用的数值，没有任何统计意义。

use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  input::LeafImage,
  model::{AnalysisMethod, Confidence, Diagnosis, DiseaseClass, DiseaseDetection, Model},
};

const HEURISTIC_SCHEME: &str = "heuristic";

pub const NEUTRAL_NON_LEAF_PROBABILITY: f32 = 0.5;
pub const LEAF_THRESHOLD: f32 = 0.5;

const EXTREME_ASPECT_RATIO: f32 = 3.0;
const EXTREME_ASPECT_PENALTY: f32 = 0.2;
const SMALL_PIXEL_COUNT: u64 = 100 * 100;
const SMALL_PIXEL_PENALTY: f32 = 0.15;
const LARGE_PIXEL_COUNT: u64 = 4000 * 4000;
const LARGE_PIXEL_PENALTY: f32 = 0.1;
const NOISE_AMPLITUDE: f32 = 0.1;

const LEAF_RATE: f64 = 0.7;
const LEAF_BAND: (f32, f32) = (0.05, 0.45);
const NON_LEAF_BAND: (f32, f32) = (0.55, 0.95);

const DISEASE_CONFIDENCE_BAND: (f32, f32) = (75.0, 100.0);

const DEFAULT_LEAF_CONFIDENCE_BAND: (f32, f32) = (75.0, 95.0);
const DEFAULT_DISEASE_CONFIDENCE_BAND: (f32, f32) = (80.0, 95.0);

#[derive(Error, Debug)]
pub enum HeuristicError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("随机种子无效: {0}")]
  InvalidSeed(String),
  #[error("无法读取图像尺寸: {0}")]
  Dimensions(#[from] image::ImageError),
  #[error("图像尺寸无效: {0}x{1}")]
  EmptyImage(u32, u32),
}

/// 加噪声与随机覆盖之前的“非叶片”概率
///
/// 长宽比过大、像素过少或过多都会提高该值。
pub fn non_leaf_prior(width: u32, height: u32) -> f32 {
  let long = width.max(height) as f32;
  let short = width.min(height).max(1) as f32;
  let aspect_ratio = long / short;
  let pixels = width as u64 * height as u64;

  let mut probability = NEUTRAL_NON_LEAF_PROBABILITY;
  if aspect_ratio > EXTREME_ASPECT_RATIO {
    probability += EXTREME_ASPECT_PENALTY;
  }
  if pixels < SMALL_PIXEL_COUNT {
    probability += SMALL_PIXEL_PENALTY;
  } else if pixels > LARGE_PIXEL_COUNT {
    probability += LARGE_PIXEL_PENALTY;
  }
  probability
}

/// 按抛硬币结果把概率压入叶片区间或非叶片区间，保持其相对位置
pub fn force_into_band(raw: f32, looks_like_leaf: bool) -> f32 {
  let (low, high) = if looks_like_leaf {
    LEAF_BAND
  } else {
    NON_LEAF_BAND
  };
  low + raw.clamp(0.0, 1.0) * (high - low)
}

fn sample_band<R: Rng + ?Sized>(rng: &mut R, (low, high): (f32, f32)) -> Confidence {
  Confidence::from_percent(rng.gen_range(low..=high))
}

fn pick_disease<R: Rng + ?Sized>(rng: &mut R) -> DiseaseClass {
  DiseaseClass::ALL[rng.gen_range(0..DiseaseClass::ALL.len())]
}

pub struct HeuristicModel {
  rng: Mutex<StdRng>,
}

impl Default for HeuristicModel {
  fn default() -> Self {
    Self::new()
  }
}

impl HeuristicModel {
  pub fn new() -> Self {
    Self {
      rng: Mutex::new(StdRng::from_entropy()),
    }
  }

  pub fn with_seed(seed: u64) -> Self {
    Self {
      rng: Mutex::new(StdRng::seed_from_u64(seed)),
    }
  }

  pub fn from_seed(seed: Option<u64>) -> Self {
    seed.map(Self::with_seed).unwrap_or_default()
  }

  fn rng(&self) -> MutexGuard<'_, StdRng> {
    self.rng.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// 第一阶段：叶片检测
  pub fn detect_leaf(&self, width: u32, height: u32) -> (bool, Confidence) {
    let mut rng = self.rng();
    let prior = non_leaf_prior(width, height);
    let noise = rng.gen_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE);
    let raw = (prior + noise).clamp(0.0, 1.0);
    let looks_like_leaf = rng.gen_bool(LEAF_RATE);
    let probability = force_into_band(raw, looks_like_leaf);
    debug!(
      "启发式叶片检测: {}x{} 先验 {:.3} 原始 {:.3} 最终 {:.3}",
      width, height, prior, raw, probability
    );

    if probability <= LEAF_THRESHOLD {
      (true, Confidence::from_fraction(1.0 - probability))
    } else {
      (false, Confidence::from_fraction(probability))
    }
  }

  /// 第二阶段：病害分类，仅在检测到叶片后调用
  pub fn classify_disease(&self) -> DiseaseDetection {
    let mut rng = self.rng();
    DiseaseDetection {
      class: pick_disease(&mut *rng),
      confidence: sample_band(&mut *rng, DISEASE_CONFIDENCE_BAND),
    }
  }

  pub fn diagnose(&self, width: u32, height: u32) -> Diagnosis {
    match self.detect_leaf(width, height) {
      (true, confidence) => Diagnosis::Leaf {
        confidence,
        disease: self.classify_disease(),
      },
      (false, confidence) => Diagnosis::NonLeaf { confidence },
    }
  }

  /// 启发式本身失败时的最后一层随机结果
  pub fn random_default(&self) -> Diagnosis {
    let mut rng = self.rng();
    let is_leaf = rng.gen_bool(LEAF_RATE);
    let confidence = sample_band(&mut *rng, DEFAULT_LEAF_CONFIDENCE_BAND);
    if is_leaf {
      Diagnosis::Leaf {
        confidence,
        disease: DiseaseDetection {
          class: pick_disease(&mut *rng),
          confidence: sample_band(&mut *rng, DEFAULT_DISEASE_CONFIDENCE_BAND),
        },
      }
    } else {
      Diagnosis::NonLeaf { confidence }
    }
  }
}

impl FromUrlWithScheme for HeuristicModel {
  const SCHEME: &'static str = HEURISTIC_SCHEME;
}

impl FromUrl for HeuristicModel {
  type Error = HeuristicError;

  /// `heuristic:` 或 `heuristic:?seed=42`
  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(HeuristicError::SchemeMismatch(url.scheme().to_string()));
    }

    let seed = url
      .query_pairs()
      .find(|(k, _)| k == "seed")
      .map(|(_, v)| {
        v.parse::<u64>()
          .map_err(|_| HeuristicError::InvalidSeed(v.to_string()))
      })
      .transpose()?;

    Ok(Self::from_seed(seed))
  }
}

impl Model for HeuristicModel {
  type Input = LeafImage;
  type Output = Diagnosis;
  type Error = HeuristicError;

  async fn infer(&self, input: &LeafImage) -> Result<Diagnosis, HeuristicError> {
    let (width, height) = input.dimensions()?;
    if width == 0 || height == 0 {
      return Err(HeuristicError::EmptyImage(width, height));
    }
    Ok(self.diagnose(width, height))
  }

  fn method(&self) -> AnalysisMethod {
    AnalysisMethod::LocalHeuristic
  }
}
