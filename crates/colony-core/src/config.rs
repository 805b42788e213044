//! 全域規劃配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 規劃配置
///
/// 由呼叫端於每次求解前設定，核心視為唯讀輸入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// 每日工作時數（0-24）
    pub working_hours: Decimal,

    /// 效率係數（0-1，作用於聘用工作者的配方）
    pub efficiency: Decimal,

    /// 各建築類別的預設工期（完成一單位工作所需小時）
    pub duty_periods: HashMap<String, Decimal>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            working_hours: Decimal::from(16),
            efficiency: Decimal::new(9, 1), // 0.9
            duty_periods: HashMap::new(),
        }
    }
}

impl PlanConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置每日工作時數
    pub fn with_working_hours(mut self, hours: Decimal) -> Self {
        self.working_hours = hours;
        self
    }

    /// 建構器模式：設置效率係數
    pub fn with_efficiency(mut self, efficiency: Decimal) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// 建構器模式：設置建築類別的預設工期
    pub fn with_duty_period(mut self, class: impl Into<String>, hours: Decimal) -> Self {
        self.duty_periods.insert(class.into(), hours);
        self
    }

    /// 查詢建築類別的預設工期
    pub fn duty_period(&self, class: &str) -> Option<Decimal> {
        self.duty_periods.get(class).copied()
    }

    /// 檢查配置值域
    pub fn validate(&self) -> crate::Result<()> {
        if self.working_hours < Decimal::ZERO || self.working_hours > Decimal::from(24) {
            return Err(crate::PlanError::InvalidConfig(format!(
                "每日工作時數 {} 超出 0-24",
                self.working_hours
            )));
        }
        if self.efficiency < Decimal::ZERO || self.efficiency > Decimal::ONE {
            return Err(crate::PlanError::InvalidConfig(format!(
                "效率係數 {} 超出 0-1",
                self.efficiency
            )));
        }
        for (class, period) in &self.duty_periods {
            if *period <= Decimal::ZERO {
                return Err(crate::PlanError::InvalidConfig(format!(
                    "類別 {} 的工期 {} 必須為正",
                    class, period
                )));
            }
        }
        Ok(())
    }

    /// 公式求值範圍
    ///
    /// 包含 `working_hours`、`efficiency` 與各類別的 `<class>_period`。
    pub fn formula_scope(&self) -> HashMap<String, Decimal> {
        let mut scope = HashMap::with_capacity(self.duty_periods.len() + 2);
        scope.insert("working_hours".to_string(), self.working_hours);
        scope.insert("efficiency".to_string(), self.efficiency);
        for (class, period) in &self.duty_periods {
            scope.insert(format!("{}_period", class), *period);
        }
        scope
    }
}
