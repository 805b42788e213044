//! 資源項目定義
//!
//! 項目集合由外部清單宣告，在目錄載入時解析為封閉有序集合，
//! 之後僅以穩定名稱查詢，不存在行程層級的全域表。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 項目種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// 流量型資源：每小時速率，隨工時與工期換算
    Flow,
    /// 每實例型資源：電力等偽資源，以每實例量表示，不做換算
    PerInstance,
}

impl Default for ItemKind {
    fn default() -> Self {
        ItemKind::Flow
    }
}

/// 項目定義（由外部項目清單提供）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    /// 項目名稱（集合內唯一）
    pub name: String,

    /// 項目種類
    #[serde(default)]
    pub kind: ItemKind,
}

impl ItemDef {
    /// 創建流量型項目
    pub fn flow(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Flow,
        }
    }

    /// 創建每實例型項目
    pub fn per_instance(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::PerInstance,
        }
    }
}

/// 項目 ID（封閉集合內的穩定序號）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ItemId(pub u32);

/// 封閉有序的項目集合
///
/// 順序即宣告順序，集合一旦建立不再增減。
#[derive(Debug, Clone)]
pub struct ItemSet {
    defs: Vec<ItemDef>,
    index: HashMap<String, ItemId>,
}

impl ItemSet {
    /// 由項目定義清單建立集合，名稱重複視為錯誤
    pub fn new(defs: Vec<ItemDef>) -> crate::Result<Self> {
        let mut index = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if index.insert(def.name.clone(), ItemId(i as u32)).is_some() {
                return Err(crate::PlanError::DuplicateItem(def.name.clone()));
            }
        }
        Ok(Self { defs, index })
    }

    /// 依名稱查詢項目
    pub fn resolve(&self, name: &str) -> Option<ItemId> {
        self.index.get(name).copied()
    }

    /// 依名稱查詢項目，查無即錯誤
    pub fn require(&self, name: &str) -> crate::Result<ItemId> {
        self.resolve(name)
            .ok_or_else(|| crate::PlanError::UnknownItem(name.to_string()))
    }

    /// 項目名稱
    pub fn name(&self, id: ItemId) -> &str {
        &self.defs[id.0 as usize].name
    }

    /// 項目種類
    pub fn kind(&self, id: ItemId) -> ItemKind {
        self.defs[id.0 as usize].kind
    }

    /// 項目數量
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// 依宣告順序列舉所有項目 ID
    pub fn ids(&self) -> impl Iterator<Item = ItemId> {
        (0..self.defs.len() as u32).map(ItemId)
    }

    /// 依宣告順序列舉所有項目
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ItemDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (ItemId(i as u32), def))
    }
}
