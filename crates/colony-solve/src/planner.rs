//! 兩階段規劃主計算器

use colony_core::{Catalog, Demand, PlanConfig, RateVector, Result, SolvePhase};
use std::collections::BTreeMap;

use crate::model::ModelBuilder;
use crate::normalize::Normalizer;
use crate::solver::{Solved, SolverAdapter};
use crate::{PlanResult, PlanWarning};

/// 規劃計算器
///
/// 兩階段嚴格依序：先最小化工作者總數，再以其最優值為上限
/// 最小化佔地面積。字典序優先，工作者永不與佔地互換。
pub struct PlanCalculator {
    /// 配方目錄
    catalog: Catalog,

    /// 全域配置
    config: PlanConfig,
}

impl PlanCalculator {
    /// 創建新的規劃計算器
    pub fn new(catalog: Catalog, config: PlanConfig) -> Self {
        Self { catalog, config }
    }

    /// 主規劃入口
    ///
    /// 單一請求同步執行；第一階段失敗即中止，不嘗試第二階段。
    pub fn calculate(&self, demands: &[Demand]) -> Result<PlanResult> {
        tracing::info!(
            "開始規劃計算：需求 {} 筆，配方 {} 筆",
            demands.len(),
            self.catalog.len()
        );

        let start_time = std::time::Instant::now();
        let mut warnings = Vec::new();

        // Step 1: 配方正規化（依當前配置換算，不跨求解保留）
        tracing::debug!("Step 1: 配方正規化");
        let recipes = Normalizer::normalize_catalog(&self.catalog, &self.config)?;

        // Step 2: 彙整需求向量
        tracing::debug!("Step 2: 彙整需求");
        let demand = self.fold_demands(demands, &mut warnings)?;
        tracing::debug!("有效需求項目: {}", demand.len());

        // Step 3: 第一階段，最小化工作者
        tracing::debug!("Step 3: {}", SolvePhase::MinimizeWorkers);
        let model = ModelBuilder::build(
            &recipes,
            &demand,
            self.catalog.items(),
            SolvePhase::MinimizeWorkers,
        )?;
        let phase1 = SolverAdapter::solve(model, SolvePhase::MinimizeWorkers, None)?;
        tracing::info!("第一階段完成，工作者目標值 {}", phase1.objective);

        // Step 4: 第二階段，工作者上限內最小化佔地（變數重新配置）
        tracing::debug!("Step 4: {}", SolvePhase::MinimizeTiles);
        let model = ModelBuilder::build(
            &recipes,
            &demand,
            self.catalog.items(),
            SolvePhase::MinimizeTiles,
        )?;
        let phase2 = SolverAdapter::solve(model, SolvePhase::MinimizeTiles, Some(phase1.objective))?;
        tracing::info!("第二階段完成，佔地目標值 {}", phase2.objective);

        // Step 5: 彙整結果
        let result = Self::assemble(&phase1, &phase2, warnings, start_time.elapsed().as_millis());
        tracing::info!(
            "規劃完成：工作者 {}，佔地 {}，選用配方 {} 種",
            result.workers,
            result.tiles,
            result.recipe_counts.len()
        );
        Ok(result)
    }

    /// 目錄引用
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 配置引用
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// 將需求清單折疊為需求向量；非正速率不構成約束，僅記錄警告
    fn fold_demands(
        &self,
        demands: &[Demand],
        warnings: &mut Vec<PlanWarning>,
    ) -> Result<RateVector> {
        let mut vector = RateVector::new();
        for demand in demands {
            let item = self.catalog.items().require(&demand.item)?;
            if !demand.is_effective() {
                tracing::debug!(demand_id = %demand.id, "忽略非正需求 {}", demand.item);
                warnings.push(PlanWarning::info(
                    demand.item.clone(),
                    format!("忽略非正需求速率 {}", demand.rate_per_hour),
                ));
                continue;
            }
            vector.accumulate(item, demand.rate_per_hour);
        }
        Ok(vector)
    }

    /// 彙整最終結果：第一階段的工作者目標值、第二階段的佔地目標值
    /// 與配方取值，日誌依階段順序串接
    fn assemble(
        phase1: &Solved,
        phase2: &Solved,
        warnings: Vec<PlanWarning>,
        elapsed_ms: u128,
    ) -> PlanResult {
        let mut recipe_counts = BTreeMap::new();
        for (name, &count) in phase2.names_and_counts() {
            let count = count as u64;
            if count > 0 {
                recipe_counts.insert(name.clone(), count);
            }
        }

        let mut log = String::with_capacity(phase1.log.len() + phase2.log.len());
        log.push_str(&phase1.log);
        log.push_str(&phase2.log);

        PlanResult {
            workers: phase1.objective,
            tiles: phase2.objective,
            recipe_counts,
            log,
            warnings,
            calculation_time_ms: Some(elapsed_ms),
        }
    }
}
