use dailyusage_core::service::dto::{Dashboard, Report};
use dailyusage_core::{Item, Settings};
use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::Rows;

use crate::history::format_quantity;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Cost")]
    cost: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Routine")]
    routine: String,
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

pub fn show_report(report: &Report, settings: &Settings) {
    println!("\x1b[1;36m{}\x1b[0m", report.title);

    let rows: Vec<SummaryRow> = report
        .active_rows()
        .map(|row| SummaryRow {
            id: row.item_id.to_string(),
            name: row.name.clone(),
            quantity: match &row.unit {
                Some(unit) => format!("{} {}", format_quantity(row.stats.total_quantity), unit),
                None => format_quantity(row.stats.total_quantity),
            },
            cost: settings.format_money(row.stats.total_cost),
        })
        .collect();

    if rows.is_empty() {
        println!("Nothing logged in this period.");
        return;
    }

    println!("{}", styled(Table::new(rows)));
    println!("Total: {}", settings.format_money(report.total_cost));
}

pub fn show_dashboard(dashboard: &Dashboard, settings: &Settings) {
    let started = dashboard.cycle_start.with_timezone(&chrono::Local);
    println!("\x1b[1;36mDaily Routine\x1b[0m (cycle started {})", started.format("%Y-%m-%d"));

    if dashboard.rows.is_empty() {
        println!("No routine items. Add one with `dailyusage item add`.");
        return;
    }

    let rows: Vec<SummaryRow> = dashboard
        .rows
        .iter()
        .map(|row| SummaryRow {
            id: row.item.id.map(|id| id.to_string()).unwrap_or_default(),
            name: row.item.name.clone(),
            quantity: format!("{} {}", format_quantity(row.stats.total_quantity), row.item.unit),
            cost: settings.format_money(row.stats.total_cost),
        })
        .collect();

    println!("{}", styled(Table::new(rows)));
    println!("Cycle total: {}", settings.format_money(dashboard.cycle_total));
}

pub fn show_items(items: &[Item], settings: &Settings) {
    if items.is_empty() {
        println!("No items found. Create one to get started.");
        return;
    }

    let rows: Vec<ItemRow> = items
        .iter()
        .map(|item| ItemRow {
            id: item.id.map(|id| id.to_string()).unwrap_or_default(),
            name: item.name.clone(),
            unit: item.unit.clone(),
            rate: format!("{}/{}", settings.format_money(item.rate), item.unit),
            provider: item.provider.clone().unwrap_or_else(|| "-".to_string()),
            routine: if item.is_routine { "yes" } else { "no" }.to_string(),
        })
        .collect();

    println!("{}", styled(Table::new(rows)));
}
