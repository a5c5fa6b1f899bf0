//! One-shot subcommands: list, stats, and the mutations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use shelfwatch_api::{AggregateStats, InventoryApi, InventoryRecord, RecordFields};
use shelfwatch_config::AppConfig;
use shelfwatch_engine::{InventoryWatcher, Snapshot, derive_stats, filter, guard};

fn status_label(record: &InventoryRecord) -> &'static str {
    if guard::is_placeholder(record) {
        "needs setup"
    } else if record.quantity == 0.0 {
        "out of stock"
    } else if record.quantity <= record.min_quantity {
        "low"
    } else {
        "ok"
    }
}

fn print_rows(records: &[InventoryRecord]) {
    if records.is_empty() {
        println!("no records");
        return;
    }
    println!(
        "{:>5}  {:<24} {:<16} {:>10} {:>10} {:>10}  {:<12} {}",
        "id", "name", "category", "qty", "min", "price", "status", "updated"
    );
    for record in records {
        println!(
            "{:>5}  {:<24} {:<16} {:>8}{:<2} {:>10} {:>10}  {:<12} {}",
            record.id,
            record.name,
            record.category,
            record.quantity,
            record.unit,
            record.min_quantity,
            record.price,
            status_label(record),
            record.last_updated.format("%Y-%m-%d %H:%M"),
        );
    }
}

pub async fn run_list(
    api: Arc<dyn InventoryApi>,
    search: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    let records = api.list_inventory(search).await?;
    let snapshot = Snapshot::from(records);
    let visible = filter::visible(&snapshot, search.unwrap_or(""), category);
    print_rows(&visible);
    Ok(())
}

pub async fn run_stats(api: Arc<dyn InventoryApi>) -> Result<()> {
    let stats = match api.get_stats().await {
        Ok(stats) => stats,
        Err(err) => {
            // The stats endpoint is optional on older services; derive the
            // same counters from a fresh listing instead.
            tracing::debug!(?err, "stats endpoint unavailable; deriving from snapshot");
            let snapshot = Snapshot::from(api.list_inventory(None).await?);
            derive_stats(&snapshot)
        }
    };
    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &AggregateStats) {
    println!("total items:   {}", stats.total_items);
    println!("low stock:     {}", stats.low_stock_count);
    println!("out of stock:  {}", stats.out_of_stock_count);
}

/// Mutations go through the watcher so the coordinator semantics
/// (pause, write, reload, restore) hold even for one-shot commands.
fn one_shot_watcher(api: Arc<dyn InventoryApi>, config: &AppConfig) -> InventoryWatcher {
    InventoryWatcher::new(api, Duration::from_millis(config.refresh.interval_ms))
}

pub async fn run_add(
    api: Arc<dyn InventoryApi>,
    config: &AppConfig,
    fields: RecordFields,
) -> Result<()> {
    if fields.name.trim().is_empty() || fields.category.trim().is_empty() {
        bail!("name and category are required");
    }
    let watcher = one_shot_watcher(api, config);
    let record = watcher.create_record(&fields).await?;
    println!("created #{} {}", record.id, record.name);
    Ok(())
}

#[derive(Debug, Default)]
pub struct UpdateFields {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub min_quantity: Option<f64>,
    pub price: Option<f64>,
}

pub async fn run_update(
    api: Arc<dyn InventoryApi>,
    config: &AppConfig,
    id: i64,
    update: UpdateFields,
) -> Result<()> {
    // The service expects the full field set; fill gaps from the current
    // record rather than guessing.
    let snapshot = Snapshot::from(api.list_inventory(None).await?);
    let current = snapshot
        .get(id)
        .with_context(|| format!("no record with id {id}"))?;

    let fields = RecordFields {
        name: update.name.unwrap_or_else(|| current.name.clone()),
        category: update.category.unwrap_or_else(|| current.category.clone()),
        quantity: update.quantity.unwrap_or(current.quantity),
        unit: update.unit.unwrap_or_else(|| current.unit.clone()),
        min_quantity: update.min_quantity.unwrap_or(current.min_quantity),
        price: update.price.unwrap_or(current.price),
    };
    if fields.name.trim().is_empty() || fields.category.trim().is_empty() {
        bail!("name and category are required");
    }

    let watcher = one_shot_watcher(api, config);
    let record = watcher.update_record(id, &fields).await?;
    println!("updated #{} {}", record.id, record.name);
    Ok(())
}

pub async fn run_remove(
    api: Arc<dyn InventoryApi>,
    config: &AppConfig,
    id: i64,
    yes: bool,
) -> Result<()> {
    if !yes {
        bail!("refusing to delete record {id}; re-run with --yes to confirm");
    }
    let watcher = one_shot_watcher(api, config);
    watcher.delete_record(id).await?;
    println!("deleted #{id}");
    Ok(())
}
