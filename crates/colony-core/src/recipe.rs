//! 配方模型

use crate::item::ItemId;
use crate::rates::RateVector;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 原始數值欄位：直接數值或公式字串
///
/// 公式僅允許數字、已知名稱與四則運算，由求值器負責拒絕其他內容。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(Decimal),
    Formula(String),
}

impl From<Decimal> for RawValue {
    fn from(value: Decimal) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(Decimal::from(value))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Formula(value.to_string())
    }
}

/// 原始配方記錄（由外部目錄載入器提供）
///
/// 輸入輸出量皆為每一工期的量，正規化時換算為每小時速率。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecipe {
    /// 配方名稱（目錄內唯一）
    pub name: String,

    /// 建築類別，工期缺省時回退到類別預設
    #[serde(default)]
    pub class: Option<String>,

    /// 佔地面積（格，非負整數）
    pub tiles: RawValue,

    /// 工期（小時）
    #[serde(default)]
    pub period: Option<RawValue>,

    /// 輸入量，鍵為項目名稱
    #[serde(default)]
    pub inputs: BTreeMap<String, RawValue>,

    /// 輸出量，鍵為項目名稱
    #[serde(default)]
    pub outputs: BTreeMap<String, RawValue>,

    /// 每實例消耗的工作者數
    #[serde(default)]
    pub workers_in: Option<RawValue>,

    /// 每實例供給的工作者數
    #[serde(default)]
    pub workers_out: Option<RawValue>,
}

impl RawRecipe {
    /// 創建新的原始配方
    pub fn new(name: impl Into<String>, tiles: impl Into<RawValue>) -> Self {
        Self {
            name: name.into(),
            class: None,
            tiles: tiles.into(),
            period: None,
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
            workers_in: None,
            workers_out: None,
        }
    }

    /// 建構器模式：設置建築類別
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// 建構器模式：設置工期
    pub fn with_period(mut self, period: impl Into<RawValue>) -> Self {
        self.period = Some(period.into());
        self
    }

    /// 建構器模式：添加輸入
    pub fn with_input(mut self, item: impl Into<String>, quantity: impl Into<RawValue>) -> Self {
        self.inputs.insert(item.into(), quantity.into());
        self
    }

    /// 建構器模式：添加輸出
    pub fn with_output(mut self, item: impl Into<String>, quantity: impl Into<RawValue>) -> Self {
        self.outputs.insert(item.into(), quantity.into());
        self
    }

    /// 建構器模式：設置消耗的工作者數
    pub fn with_workers_in(mut self, workers: impl Into<RawValue>) -> Self {
        self.workers_in = Some(workers.into());
        self
    }

    /// 建構器模式：設置供給的工作者數
    pub fn with_workers_out(mut self, workers: impl Into<RawValue>) -> Self {
        self.workers_out = Some(workers.into());
        self
    }
}

/// 正規化後的配方
///
/// 速率皆已換算為每小時；每次求解由正規化器重新產生，
/// 不跨求解保留。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// 配方名稱
    pub name: String,

    /// 佔地面積（格）
    pub tiles: u32,

    /// 工期（小時）
    pub duty_period: Decimal,

    /// 每小時輸入速率
    pub inputs: RateVector,

    /// 每小時輸出速率
    pub outputs: RateVector,

    /// 每實例需要的工作者
    pub workers_required: Decimal,

    /// 每實例供給的工作者
    pub workers_produced: Decimal,
}

impl Recipe {
    /// 單實例對某項目的淨速率（輸出減輸入）
    pub fn net_rate(&self, item: ItemId) -> Decimal {
        self.outputs.get(item) - self.inputs.get(item)
    }

    /// 是否聘用工作者
    pub fn employs_workers(&self) -> bool {
        self.workers_required > Decimal::ZERO
    }

    /// 單實例的淨工作者供給
    pub fn net_workers(&self) -> Decimal {
        self.workers_produced - self.workers_required
    }
}
