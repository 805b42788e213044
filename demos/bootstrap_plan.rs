//! 自舉規劃示例

use colony_plan::{Catalog, Demand, ItemDef, ItemSet, PlanCalculator, PlanConfig, RawRecipe};
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    println!("=== 聚落生產規劃示例 ===\n");

    // 項目集合：流量型資源與每實例型的電力
    let items = ItemSet::new(vec![
        ItemDef::flow("log"),
        ItemDef::flow("plank"),
        ItemDef::per_instance("power"),
    ])?;

    println!("項目清單:");
    for (_, def) in items.iter() {
        println!("  - {} ({:?})", def.name, def.kind);
    }

    // 配方目錄
    let catalog = Catalog::new(
        items,
        vec![
            RawRecipe::new("lodge", 4).with_period(1).with_workers_out(3),
            RawRecipe::new("lumberjack_hut", 4)
                .with_class("lumberjack")
                .with_output("log", 3)
                .with_workers_in(1),
            RawRecipe::new("sawmill", 9)
                .with_period("24 / 16")
                .with_input("log", 2)
                .with_input("power", 50)
                .with_output("plank", 1)
                .with_workers_in(2),
            RawRecipe::new("windmill", 2).with_period(1).with_output("power", 60),
        ],
    )?;

    // 全域配置：16 小時工作日、效率 0.9、伐木類工期 0.75 小時
    let config = PlanConfig::new().with_duty_period("lumberjack", Decimal::new(75, 2));

    // 需求：每小時 3 片木板
    let demands = vec![
        Demand::new("plank", Decimal::from(3)).with_source_ref("demo".to_string()),
    ];

    println!("需求清單:");
    for demand in &demands {
        println!("  - {} @ {}/小時", demand.item, demand.rate_per_hour);
    }

    let calculator = PlanCalculator::new(catalog, config);
    let result = calculator.calculate(&demands)?;

    println!("\n工作者: {}", result.workers);
    println!("佔地:   {}", result.tiles);
    println!("\n配方取值:");
    for (name, count) in &result.recipe_counts {
        println!("  {} x{}", name, count);
    }

    println!("\n--- 求解日誌 ---\n{}", result.log);

    Ok(())
}
