//! 速率向量

use crate::item::ItemId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 稀疏的項目速率映射
///
/// 單位為每小時量；每實例型項目則為每實例量。缺項一律讀為零，
/// 正規化完成後不再就地修改，每次求解重新建構。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateVector {
    rates: BTreeMap<ItemId, Decimal>,
}

impl RateVector {
    /// 創建空向量
    pub fn new() -> Self {
        Self::default()
    }

    /// 由條目建立向量，零值條目不保留
    pub fn from_entries(entries: impl IntoIterator<Item = (ItemId, Decimal)>) -> Self {
        let mut vector = Self::new();
        for (item, rate) in entries {
            vector.accumulate(item, rate);
        }
        vector
    }

    /// 讀取速率，缺項為零
    pub fn get(&self, item: ItemId) -> Decimal {
        self.rates.get(&item).copied().unwrap_or(Decimal::ZERO)
    }

    /// 累加速率，歸零的條目即移除
    pub fn accumulate(&mut self, item: ItemId, delta: Decimal) {
        let next = self.get(item) + delta;
        if next.is_zero() {
            self.rates.remove(&item);
        } else {
            self.rates.insert(item, next);
        }
    }

    /// 依項目序列舉非零條目
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, Decimal)> + '_ {
        self.rates.iter().map(|(&item, &rate)| (item, rate))
    }

    /// 非零條目數
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
