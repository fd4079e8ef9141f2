// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/output/disease_info.rs - 病害说明表
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

use crate::model::DiseaseClass;

#[derive(Debug, PartialEq, Eq)]
pub struct DiseaseInfo {
  pub title: &'static str,
  /// 十六进制显示颜色
  pub color: &'static str,
  pub description: &'static str,
  pub management: &'static [&'static str],
}

static BROWN_BLIGHT: DiseaseInfo = DiseaseInfo {
  title: "Brown Blight",
  color: "#8d6e63",
  description: "Brown blight, caused by the fungus Colletotrichum spp., leads to distinct brown, \
                often circular lesions on tea leaves.",
  management: &[
    "Prune and destroy affected plant parts",
    "Ensure proper plant spacing for air circulation",
    "Apply fungicides as recommended by experts",
    "Avoid excessive nitrogen fertilization",
  ],
};

static HEALTHY: DiseaseInfo = DiseaseInfo {
  title: "Healthy Leaf",
  color: "#4caf50",
  description: "This is a Non-diseased (Healthy) tea leaf.",
  management: &[
    "No specific management actions are required other than routine good agricultural \
     practices to maintain plant health.",
  ],
};

static RED_RUST: DiseaseInfo = DiseaseInfo {
  title: "Red Rust",
  color: "#ff9800",
  description: "Red rust is a common disease of tea plants caused by an alga, Cephaleuros \
                virescens. It appears as orange-brown, velvety patches on leaves.",
  management: &[
    "Improve air circulation by proper pruning and spacing",
    "Manage shade to reduce humidity",
    "Apply appropriate copper-based fungicides if severe",
    "Ensure balanced plant nutrition",
  ],
};

static RED_SPIDER_MITES: DiseaseInfo = DiseaseInfo {
  title: "Red Spider Mites",
  color: "#f44336",
  description: "Red spider mites (Oligonychus coffeae) are common pests that suck sap from tea \
                leaves, leading to reddish-brown discoloration.",
  management: &[
    "Maintain plant vigor through proper irrigation and fertilization",
    "Encourage natural predators of mites",
    "Use approved miticides if infestation is heavy",
    "Regularly monitor for early signs of infestation",
  ],
};

pub fn disease_info(class: DiseaseClass) -> &'static DiseaseInfo {
  match class {
    DiseaseClass::BrownBlight => &BROWN_BLIGHT,
    DiseaseClass::Healthy => &HEALTHY,
    DiseaseClass::RedRust => &RED_RUST,
    DiseaseClass::RedSpiderMites => &RED_SPIDER_MITES,
  }
}
