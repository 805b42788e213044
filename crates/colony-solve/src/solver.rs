//! 外部求解器轉接
//!
//! 將建構完成的模型交給外部整數規劃求解器（分支定界），
//! 並把該次求解的診斷輸出彙整為文字日誌。日誌緩衝隨呼叫建立，
//! 無論結果為何都隨結果或錯誤一併交還，不跨呼叫共用。

use colony_core::{PlanError, Result, SolvePhase};
use good_lp::{default_solver, ResolutionError, Solution, SolverModel};
use std::fmt::Write as _;

use crate::model::PlanModel;

/// 第二階段工作者上限的浮點容差
const WORKER_CAP_SLACK: f64 = 1e-9;

/// 單階段求解結果
#[derive(Debug, Clone)]
pub struct Solved {
    /// 目標值（由整數解以精確係數回算）
    pub objective: f64,

    /// 各配方實例數，依模型中的配方順序
    pub counts: Vec<f64>,

    /// 配方名稱，與 `counts` 同序
    pub recipe_names: Vec<String>,

    /// 該階段的求解日誌
    pub log: String,
}

impl Solved {
    /// 依序列舉配方名稱與取值
    pub fn names_and_counts(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.recipe_names.iter().zip(self.counts.iter())
    }
}

/// 求解器轉接器
///
/// 不做重試：不可行、無下界與求解器錯誤原樣回傳。
pub struct SolverAdapter;

impl SolverAdapter {
    /// 求解一個階段
    ///
    /// `worker_cap` 為第二階段的工作者上限（第一階段的最優目標值）。
    pub fn solve(model: PlanModel, phase: SolvePhase, worker_cap: Option<f64>) -> Result<Solved> {
        let mut log = String::new();
        let started = std::time::Instant::now();

        let objective = match phase {
            SolvePhase::MinimizeWorkers => model.worker_expression(),
            SolvePhase::MinimizeTiles => model.tile_expression(),
        };
        // 上限約束以浮點容差吸收係數和的尾差
        let cap_constraint = worker_cap.map(|cap| model.worker_expression().leq(cap + WORKER_CAP_SLACK));

        let objective_cost = match phase {
            SolvePhase::MinimizeWorkers => model.worker_cost.clone(),
            SolvePhase::MinimizeTiles => model.tile_cost.clone(),
        };

        let _ = writeln!(log, "==== {} ====", phase);
        let _ = writeln!(
            log,
            "變數 {} 個，約束 {} 條",
            model.num_variables(),
            model.num_constraints() + usize::from(cap_constraint.is_some())
        );
        if let Some(cap) = worker_cap {
            let _ = writeln!(log, "工作者上限 {}", cap);
        }

        let PlanModel {
            vars,
            counts,
            constraints,
            recipe_names,
            ..
        } = model;

        let mut problem = vars.minimise(objective).using(default_solver);
        for constraint in constraints {
            problem = problem.with(constraint);
        }
        if let Some(constraint) = cap_constraint {
            problem = problem.with(constraint);
        }

        match problem.solve() {
            Ok(solution) => {
                // 整數變數取整去除求解器尾差
                let values: Vec<f64> = counts
                    .iter()
                    .map(|&count| solution.value(count).round().max(0.0))
                    .collect();
                let objective: f64 = values
                    .iter()
                    .zip(&objective_cost)
                    .map(|(&value, &cost)| value * cost)
                    .sum();

                let _ = writeln!(log, "狀態: optimal，目標值 {}", objective);
                for (name, &value) in recipe_names.iter().zip(&values) {
                    if value > 0.0 {
                        let _ = writeln!(log, "  配方 {} = {}", name, value);
                    }
                }
                let _ = writeln!(log, "耗時 {} ms", started.elapsed().as_millis());

                Ok(Solved {
                    objective,
                    counts: values,
                    recipe_names,
                    log,
                })
            }
            Err(ResolutionError::Infeasible) => {
                let _ = writeln!(log, "狀態: infeasible");
                Err(PlanError::Infeasible { phase, log })
            }
            Err(ResolutionError::Unbounded) => {
                let _ = writeln!(log, "狀態: unbounded");
                Err(PlanError::Unbounded { phase, log })
            }
            Err(other) => {
                let _ = writeln!(log, "狀態: error（{}）", other);
                Err(PlanError::SolverError {
                    message: other.to_string(),
                    log,
                })
            }
        }
    }
}
