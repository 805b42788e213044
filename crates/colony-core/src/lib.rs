//! # Colony Core
//!
//! 核心資料模型與類型定義

pub mod catalog;
pub mod config;
pub mod demand;
pub mod item;
pub mod rates;
pub mod recipe;

// Re-export 主要類型
pub use catalog::Catalog;
pub use config::PlanConfig;
pub use demand::Demand;
pub use item::{ItemDef, ItemId, ItemKind, ItemSet};
pub use rates::RateVector;
pub use recipe::{RawRecipe, RawValue, Recipe};

use serde::{Deserialize, Serialize};

/// 規劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("配方定義不完整: {0}")]
    MalformedRecipe(String),

    #[error("未知的資源項目: {0}")]
    UnknownItem(String),

    #[error("重複的資源項目: {0}")]
    DuplicateItem(String),

    #[error("公式無法求值: {0}")]
    BadFormula(String),

    #[error("配置無效: {0}")]
    InvalidConfig(String),

    #[error("{phase}無可行解")]
    Infeasible { phase: SolvePhase, log: String },

    #[error("{phase}目標無下界")]
    Unbounded { phase: SolvePhase, log: String },

    #[error("求解器異常: {message}")]
    SolverError { message: String, log: String },
}

impl PlanError {
    /// 取得錯誤附帶的求解日誌（若有）
    pub fn solve_log(&self) -> Option<&str> {
        match self {
            PlanError::Infeasible { log, .. }
            | PlanError::Unbounded { log, .. }
            | PlanError::SolverError { log, .. } => Some(log),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// 求解階段
///
/// 兩階段嚴格依序：先最小化工作者總數，再最小化佔地面積。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolvePhase {
    /// 第一階段：最小化工作者
    MinimizeWorkers,
    /// 第二階段：最小化佔地
    MinimizeTiles,
}

impl std::fmt::Display for SolvePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolvePhase::MinimizeWorkers => write!(f, "第一階段（最少工作者）"),
            SolvePhase::MinimizeTiles => write!(f, "第二階段（最小佔地）"),
        }
    }
}
