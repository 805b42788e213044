//! # Colony Plan
//!
//! 聚落生產規劃器：在滿足目標產率的前提下，依「工作者優先、
//! 佔地次之」的嚴格字典序求取最小生產配置。
//!
//! 核心流程：目錄與配置 → 配方正規化 → 約束模型 → 兩階段整數規劃。

pub use colony_core::{
    Catalog, Demand, ItemDef, ItemId, ItemKind, ItemSet, PlanConfig, PlanError, RateVector,
    RawRecipe, RawValue, Recipe, Result, SolvePhase,
};
pub use colony_solve::{Normalizer, PlanCalculator, PlanResult, PlanWarning, WarningSeverity};
