//! 配方正規化
//!
//! 將原始配方記錄與全域配置轉換為每小時速率的正規化配方。
//! 正規化依賴當前配置，因此每次求解都重新換算，配方不跨求解保留。

use colony_core::{
    Catalog, ItemKind, ItemSet, PlanConfig, PlanError, RateVector, RawRecipe, RawValue, Recipe,
    Result,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::expr::{self, Scope};

/// 配方正規化器
pub struct Normalizer;

impl Normalizer {
    /// 正規化整份目錄
    pub fn normalize_catalog(catalog: &Catalog, config: &PlanConfig) -> Result<Vec<Recipe>> {
        config.validate()?;
        catalog
            .recipes()
            .iter()
            .map(|raw| Self::normalize(raw, catalog.items(), config))
            .collect()
    }

    /// 正規化單一配方（純函數）
    ///
    /// 流量型項目換算：`速率 = 量 * (working_hours / 24) / 工期`，
    /// 聘用工作者的配方再乘上效率係數。每實例型項目原樣保留。
    pub fn normalize(raw: &RawRecipe, items: &ItemSet, config: &PlanConfig) -> Result<Recipe> {
        if raw.name.trim().is_empty() {
            return Err(PlanError::MalformedRecipe("缺少配方名稱".to_string()));
        }

        let mut scope: Scope = config.formula_scope();

        // 工期：記錄本身優先，否則回退到建築類別預設
        let period = match (&raw.period, raw.class.as_deref()) {
            (Some(value), _) => Self::numeric(value, &scope)?,
            (None, Some(class)) => config.duty_period(class).ok_or_else(|| {
                PlanError::MalformedRecipe(format!(
                    "配方 {} 缺少工期，類別 {} 亦無預設",
                    raw.name, class
                ))
            })?,
            (None, None) => {
                return Err(PlanError::MalformedRecipe(format!(
                    "配方 {} 缺少工期",
                    raw.name
                )));
            }
        };
        if period <= Decimal::ZERO {
            return Err(PlanError::MalformedRecipe(format!(
                "配方 {} 的工期 {} 必須為正",
                raw.name, period
            )));
        }
        // 後續欄位的公式可引用已定的工期
        scope.insert("period".to_string(), period);

        let tiles = Self::tiles(raw, &scope)?;
        let workers_required = Self::worker_count(&raw.workers_in, &scope, &raw.name)?;
        let workers_produced = Self::worker_count(&raw.workers_out, &scope, &raw.name)?;

        // 效率係數只作用於聘用工作者的配方
        let efficiency = if workers_required > Decimal::ZERO {
            config.efficiency
        } else {
            Decimal::ONE
        };

        let inputs =
            Self::normalize_rates(&raw.inputs, items, config, period, efficiency, &scope, &raw.name)?;
        let outputs =
            Self::normalize_rates(&raw.outputs, items, config, period, efficiency, &scope, &raw.name)?;

        Ok(Recipe {
            name: raw.name.clone(),
            tiles,
            duty_period: period,
            inputs,
            outputs,
            workers_required,
            workers_produced,
        })
    }

    fn normalize_rates(
        entries: &BTreeMap<String, RawValue>,
        items: &ItemSet,
        config: &PlanConfig,
        period: Decimal,
        efficiency: Decimal,
        scope: &Scope,
        recipe_name: &str,
    ) -> Result<RateVector> {
        let mut rates = RateVector::new();
        for (name, value) in entries {
            let item = items.resolve(name).ok_or_else(|| {
                PlanError::MalformedRecipe(format!(
                    "配方 {} 引用未知項目 {}",
                    recipe_name, name
                ))
            })?;
            let quantity = Self::numeric(value, scope)?;
            if quantity < Decimal::ZERO {
                return Err(PlanError::MalformedRecipe(format!(
                    "配方 {} 的項目 {} 量 {} 為負",
                    recipe_name, name, quantity
                )));
            }
            let rate = match items.kind(item) {
                // 每實例型資源已是每實例量，原樣保留
                ItemKind::PerInstance => quantity,
                // 流量型資源換算為每小時速率；先乘後除以保留整除時的精確值
                ItemKind::Flow => {
                    quantity * config.working_hours / Decimal::from(24) / period * efficiency
                }
            };
            rates.accumulate(item, rate);
        }
        Ok(rates)
    }

    fn tiles(raw: &RawRecipe, scope: &Scope) -> Result<u32> {
        let tiles = Self::numeric(&raw.tiles, scope)?;
        if tiles.is_sign_negative() || !tiles.fract().is_zero() {
            return Err(PlanError::MalformedRecipe(format!(
                "配方 {} 的佔地 {} 必須為非負整數",
                raw.name, tiles
            )));
        }
        tiles.to_u32().ok_or_else(|| {
            PlanError::MalformedRecipe(format!("配方 {} 的佔地 {} 超出範圍", raw.name, tiles))
        })
    }

    fn worker_count(value: &Option<RawValue>, scope: &Scope, recipe_name: &str) -> Result<Decimal> {
        let count = match value {
            Some(value) => Self::numeric(value, scope)?,
            None => Decimal::ZERO,
        };
        if count < Decimal::ZERO {
            return Err(PlanError::MalformedRecipe(format!(
                "配方 {} 的工作者數 {} 為負",
                recipe_name, count
            )));
        }
        Ok(count)
    }

    fn numeric(value: &RawValue, scope: &Scope) -> Result<Decimal> {
        match value {
            RawValue::Number(value) => Ok(*value),
            RawValue::Formula(src) => expr::evaluate(src, scope),
        }
    }
}
