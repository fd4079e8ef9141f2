// 该文件是 TeaLeafNet （茶叶诊断） 项目的一部分。
// src/navigation.rs - 页面导航栈
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

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
  Splash,
  Home,
  Analysis,
}

impl fmt::Display for Screen {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Screen::Splash => "splash",
      Screen::Home => "home",
      Screen::Analysis => "analysis",
    };
    f.write_str(name)
  }
}

/// 后进先出的页面历史，始终至少包含一个页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
  history: Vec<Screen>,
}

impl Default for Navigator {
  fn default() -> Self {
    Self::new(Screen::Splash)
  }
}

impl Navigator {
  pub fn new(initial: Screen) -> Self {
    Self {
      history: vec![initial],
    }
  }

  pub fn current(&self) -> Screen {
    // history 永不为空
    self.history[self.history.len() - 1]
  }

  pub fn history(&self) -> &[Screen] {
    &self.history
  }

  pub fn navigate_to(&mut self, screen: Screen) {
    debug!("导航: {} -> {}", self.current(), screen);
    self.history.push(screen);
  }

  /// 返回上一页；只剩一个页面时不做任何事，返回是否发生了跳转
  pub fn go_back(&mut self) -> bool {
    if self.history.len() <= 1 {
      return false;
    }
    let left = self.history.pop();
    debug!("返回: {:?} -> {}", left, self.current());
    true
  }

  /// 启动页与首页不显示返回按钮
  pub fn can_go_back(&self) -> bool {
    self.history.len() > 1 && !matches!(self.current(), Screen::Splash | Screen::Home)
  }
}
