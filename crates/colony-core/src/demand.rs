//! 需求模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 需求：某項目必須達到的淨產出速率
///
/// 未被任何需求點名的項目只受非負約束，不會被視為短缺。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demand {
    /// 需求ID
    pub id: Uuid,

    /// 項目名稱
    pub item: String,

    /// 每小時需求速率
    pub rate_per_hour: Decimal,

    /// 來源（如介面輸入、測試腳本）
    pub source_ref: Option<String>,
}

impl Demand {
    /// 創建新的需求
    pub fn new(item: impl Into<String>, rate_per_hour: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            item: item.into(),
            rate_per_hour,
            source_ref: None,
        }
    }

    /// 建構器模式：設置來源
    pub fn with_source_ref(mut self, source_ref: String) -> Self {
        self.source_ref = Some(source_ref);
        self
    }

    /// 是否構成有效約束（速率為正）
    pub fn is_effective(&self) -> bool {
        self.rate_per_hour > Decimal::ZERO
    }
}
