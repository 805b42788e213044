//! 約束模型建構
//!
//! 依正規化配方集與需求向量建立兩階段共用的可行性約束。
//! 每個求解階段各自呼叫一次，決策變數不跨階段重用。

use colony_core::{ItemSet, PlanError, RateVector, Recipe, Result, SolvePhase};
use good_lp::{variable, variables, Constraint, Expression, ProblemVariables, Variable};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// 約束模型：決策變數、共用約束與兩階段的目標係數
pub struct PlanModel {
    pub(crate) vars: ProblemVariables,
    pub(crate) counts: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) recipe_names: Vec<String>,
    pub(crate) worker_cost: Vec<f64>,
    pub(crate) tile_cost: Vec<f64>,
}

impl PlanModel {
    /// 第一階段目標：工作者總需求
    pub fn worker_expression(&self) -> Expression {
        self.counts
            .iter()
            .zip(&self.worker_cost)
            .map(|(&count, &cost)| count * cost)
            .sum()
    }

    /// 第二階段目標：佔地總面積
    pub fn tile_expression(&self) -> Expression {
        self.counts
            .iter()
            .zip(&self.tile_cost)
            .map(|(&count, &cost)| count * cost)
            .sum()
    }

    /// 決策變數數
    pub fn num_variables(&self) -> usize {
        self.counts.len()
    }

    /// 約束數
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

/// 模型建構器
pub struct ModelBuilder;

impl ModelBuilder {
    /// 建構共用可行性模型
    ///
    /// 每配方一個非負整數實例數變數。約束：
    /// 1. 每個項目的聚合淨產率非負；被需求的項目須達到需求速率。
    /// 2. 工作者總產出須涵蓋總消耗（勞動力平衡）。
    ///
    /// `phase` 僅用於錯誤歸屬。
    pub fn build(
        recipes: &[Recipe],
        demand: &RateVector,
        items: &ItemSet,
        phase: SolvePhase,
    ) -> Result<PlanModel> {
        let mut vars = variables!();
        let mut counts = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            counts.push(vars.add(variable().integer().min(0).name(recipe.name.as_str())));
        }

        let mut constraints = Vec::new();

        // 質量守恆與需求下限
        for item in items.ids() {
            let coefficients: Vec<f64> = recipes
                .iter()
                .map(|recipe| to_f64(recipe.net_rate(item)))
                .collect();
            let floor = demand.get(item).max(Decimal::ZERO);

            if coefficients.iter().all(|&c| c == 0.0) {
                if floor > Decimal::ZERO {
                    // 無任何配方觸及該項目卻有需求，模型必然不可行
                    return Err(PlanError::Infeasible {
                        phase,
                        log: format!(
                            "項目 {} 需求 {}/小時，但無配方產出",
                            items.name(item),
                            floor
                        ),
                    });
                }
                continue;
            }

            let net_rate: Expression = counts
                .iter()
                .zip(&coefficients)
                .map(|(&count, &coefficient)| count * coefficient)
                .sum();
            constraints.push(net_rate.geq(to_f64(floor)));
        }

        // 勞動力平衡
        if recipes.iter().any(|r| !r.net_workers().is_zero()) {
            let labour: Expression = recipes
                .iter()
                .zip(&counts)
                .map(|(recipe, &count)| count * to_f64(recipe.net_workers()))
                .sum();
            constraints.push(labour.geq(0.0));
        }

        Ok(PlanModel {
            vars,
            counts,
            constraints,
            recipe_names: recipes.iter().map(|r| r.name.clone()).collect(),
            worker_cost: recipes.iter().map(|r| to_f64(r.workers_required)).collect(),
            tile_cost: recipes.iter().map(|r| f64::from(r.tiles)).collect(),
        })
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_core::{ItemDef, ItemId};
    use rust_decimal::Decimal;

    fn items() -> ItemSet {
        ItemSet::new(vec![ItemDef::flow("log"), ItemDef::flow("plank")]).unwrap()
    }

    fn recipe(
        name: &str,
        tiles: u32,
        inputs: Vec<(ItemId, i64)>,
        outputs: Vec<(ItemId, i64)>,
        workers_in: i64,
        workers_out: i64,
    ) -> Recipe {
        Recipe {
            name: name.to_string(),
            tiles,
            duty_period: Decimal::ONE,
            inputs: RateVector::from_entries(
                inputs.into_iter().map(|(i, q)| (i, Decimal::from(q))),
            ),
            outputs: RateVector::from_entries(
                outputs.into_iter().map(|(i, q)| (i, Decimal::from(q))),
            ),
            workers_required: Decimal::from(workers_in),
            workers_produced: Decimal::from(workers_out),
        }
    }

    #[test]
    fn test_build_dimensions() {
        let items = items();
        let log = ItemId(0);
        let plank = ItemId(1);
        let recipes = vec![
            recipe("lumberjack", 4, vec![], vec![(log, 3)], 1, 0),
            recipe("sawmill", 9, vec![(log, 2)], vec![(plank, 1)], 2, 0),
            recipe("lodge", 4, vec![], vec![], 0, 3),
        ];
        let demand = RateVector::from_entries(vec![(plank, Decimal::from(2))]);

        let model =
            ModelBuilder::build(&recipes, &demand, &items, SolvePhase::MinimizeWorkers).unwrap();

        assert_eq!(model.num_variables(), 3);
        // log、plank 各一條質量守恆，加上勞動力平衡
        assert_eq!(model.num_constraints(), 3);
        assert_eq!(model.worker_cost, vec![1.0, 2.0, 0.0]);
        assert_eq!(model.tile_cost, vec![4.0, 9.0, 4.0]);
    }

    #[test]
    fn test_untouched_item_adds_no_constraint() {
        let items = items();
        let log = ItemId(0);
        let recipes = vec![recipe("lumberjack", 4, vec![], vec![(log, 3)], 1, 0)];
        let demand = RateVector::new();

        let model =
            ModelBuilder::build(&recipes, &demand, &items, SolvePhase::MinimizeWorkers).unwrap();

        // plank 無配方觸及也無需求：只剩 log 守恆與勞動力平衡
        assert_eq!(model.num_constraints(), 2);
    }

    #[test]
    fn test_demand_without_producer_is_infeasible() {
        let items = items();
        let log = ItemId(0);
        let plank = ItemId(1);
        let recipes = vec![recipe("lumberjack", 4, vec![], vec![(log, 3)], 1, 0)];
        let demand = RateVector::from_entries(vec![(plank, Decimal::from(2))]);

        let result = ModelBuilder::build(&recipes, &demand, &items, SolvePhase::MinimizeWorkers);
        assert!(matches!(
            result,
            Err(PlanError::Infeasible { phase: SolvePhase::MinimizeWorkers, .. })
        ));
    }

    #[test]
    fn test_no_labour_constraint_without_worker_recipes() {
        let items = items();
        let log = ItemId(0);
        let recipes = vec![recipe("water_wheel", 2, vec![], vec![(log, 1)], 0, 0)];
        let demand = RateVector::new();

        let model =
            ModelBuilder::build(&recipes, &demand, &items, SolvePhase::MinimizeWorkers).unwrap();
        assert_eq!(model.num_constraints(), 1);
    }
}
