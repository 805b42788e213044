//! 配方目錄
//!
//! 目錄為顯式建構的值，依引用傳入正規化器與模型建構器，
//! 不存在行程層級的全域目錄狀態。

use crate::item::ItemSet;
use crate::recipe::RawRecipe;
use std::collections::HashSet;

/// 配方目錄：封閉項目集合與原始配方記錄
#[derive(Debug, Clone)]
pub struct Catalog {
    items: ItemSet,
    recipes: Vec<RawRecipe>,
}

impl Catalog {
    /// 由項目集合與配方記錄建立目錄，配方名稱必須唯一
    pub fn new(items: ItemSet, recipes: Vec<RawRecipe>) -> crate::Result<Self> {
        let mut seen = HashSet::with_capacity(recipes.len());
        for recipe in &recipes {
            if !seen.insert(recipe.name.as_str()) {
                return Err(crate::PlanError::MalformedRecipe(format!(
                    "配方名稱重複: {}",
                    recipe.name
                )));
            }
        }
        Ok(Self { items, recipes })
    }

    /// 項目集合
    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    /// 原始配方記錄
    pub fn recipes(&self) -> &[RawRecipe] {
        &self.recipes
    }

    /// 依名稱查詢配方記錄
    pub fn find(&self, name: &str) -> Option<&RawRecipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    /// 配方數量
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
