use dailyusage_core::service::dto::DailyHistory;
use dailyusage_core::Settings;
use tabled::{Table, Tabled};
use tabled::settings::{Style, Color, Modify};
use tabled::settings::object::Rows;

// Helper struct for Table Row
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Note")]
    note: String,
}

pub fn show_history(history: &[DailyHistory], settings: &Settings) {
    if history.is_empty() {
        println!("No history available yet.");
        return;
    }

    for day in history {
        println!(
            "\n\x1b[1;36m{}\x1b[0m ({})",
            settings.date_heading(day.date),
            settings.format_money(day.total_cost)
        );

        let rows: Vec<HistoryRow> = day
            .entries
            .iter()
            .map(|entry| {
                let local = entry.timestamp.with_timezone(&chrono::Local);
                let quantity = match &entry.unit {
                    Some(unit) => format!("{} {}", format_quantity(entry.quantity), unit),
                    None => format_quantity(entry.quantity),
                };
                HistoryRow {
                    id: entry.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
                    time: local.format("%H:%M").to_string(),
                    item: entry.item_name.clone(),
                    quantity,
                    cost: settings.format_money(entry.cost),
                    provider: entry.provider.clone().unwrap_or_else(|| "-".to_string()),
                    note: entry.note.clone().unwrap_or_default(),
                }
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::modern())
            .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

        println!("{}", table);
    }
}

/// Whole quantities print without decimals.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{:.0}", quantity)
    } else {
        format!("{}", quantity)
    }
}
