mod context;
mod forms;
mod history;
mod report;
mod stats;
mod tui;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use clap::Parser;
use dailyusage_core::time::{self, parse_day, parse_range_bound};
use dailyusage_core::usecase::dashboard::DashboardUseCase;
use dailyusage_core::usecase::history::HistoryUseCase;
use dailyusage_core::usecase::report::ReportUseCase;
use dailyusage_core::{normalize_metadata, parse_args, resolve_data_dir, Cart, ItemId, LogId, Selection, Theme};
use tracing::debug;

use crate::context::{init_logging, AppContext};

#[derive(Parser)]
#[command(name = "dailyusage")]
#[command(about = "Track daily usage of recurring items and what it costs", long_about = None)]
struct Cli {
    /// Where items, logs and settings live (defaults to $DAILYUSAGE_DIR or ~/.dailyusage)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage items (usage: item add Milk unit:liter rate:2.5 provider:Dairy routine:yes)
    Item {
        #[command(subcommand)]
        action: ItemCommand,
    },
    /// Log a quantity by hand (usage: log 1 0.5 date:yesterday note:for guests)
    Log {
        /// Item ID or exact name
        item: String,
        quantity: f64,
        /// Optional metadata (key:value); free words become the note
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Stage items in a cart and save them together (usage: buy 1 1 2 date:today)
    /// Repeating an ID buys one more unit.
    Buy {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Delete a log entry
    LogRm { id: LogId },
    /// Totals per item (current cycle unless a day or range is given)
    Stats {
        #[arg(long, conflicts_with_all = ["from", "to"])]
        day: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Open the interactive chart instead of printing a table
        #[arg(long)]
        chart: bool,
    },
    /// Show the daily routine with totals for the current cycle
    Dashboard,
    /// Show every log grouped by day
    History,
    /// Show or reset the billing cycle
    Cycle {
        #[command(subcommand)]
        action: CycleCommand,
    },
    /// Set the colour theme (light, dark or system)
    Theme { theme: Theme },
    /// Open the Terminal User Interface
    Tui,
}

#[derive(clap::Subcommand)]
enum ItemCommand {
    /// Create an item
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// List all items
    List,
    /// Change an item (usage: item edit 1 rate:3 routine:no)
    Edit {
        id: ItemId,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delete an item (its logs are kept)
    Rm { id: ItemId },
}

#[derive(clap::Subcommand)]
enum CycleCommand {
    /// Print when the current cycle started
    Show,
    /// Start a new cycle now. Logs are kept.
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let interactive = matches!(cli.command, None | Some(Commands::Tui) | Some(Commands::Stats { chart: true, .. }));
    init_logging(&data_dir, interactive)?;

    let mut ctx = AppContext::open(Some(data_dir))?;
    debug!(data_dir = %ctx.data_dir.display(), "opened store");

    match cli.command {
        Some(Commands::Item { action }) => run_item(&ctx, action)?,
        Some(Commands::Log { item, quantity, args }) => {
            let item = ctx.items.resolve(&item)?;
            let entry = forms::build_manual_entry(quantity, &args)?;
            let log = ctx.logs.add_log(&item, entry)?;
            println!(
                "Logged {} {} of {} on {} ({})",
                history::format_quantity(log.quantity),
                item.unit,
                item.name,
                log.date,
                ctx.settings.format_money(log.cost)
            );
        }
        Some(Commands::Buy { args }) => {
            let parsed = parse_args(&args);
            let metadata = normalize_metadata(parsed.metadata, &["date"])?;
            let date = match metadata.get("date") {
                Some(d) => parse_day(d, time::today())?,
                None => time::today(),
            };

            let mut cart = Cart::new();
            for token in parsed.name.split_whitespace() {
                let id: ItemId = token.parse().map_err(|_| anyhow!("Not an item ID: '{}'", token))?;
                cart.increment(&ctx.items.get_item(id)?);
            }
            if cart.is_empty() {
                bail!("Nothing to buy: pass one or more item IDs");
            }

            let total = cart.total_cost();
            let written = ctx.logs.checkout(&mut cart, date, time::time_of_day())?;
            println!(
                "Saved {} log{} for {} ({})",
                written.len(),
                if written.len() == 1 { "" } else { "s" },
                date,
                ctx.settings.format_money(total)
            );
        }
        Some(Commands::LogRm { id }) => {
            let log = ctx.logs.get_log(id)?;
            ctx.logs.delete_log(id)?;
            println!(
                "Log {} deleted ({} on {}, {}).",
                id,
                history::format_quantity(log.quantity),
                log.date,
                ctx.settings.format_money(log.cost)
            );
        }
        Some(Commands::Stats { day, from, to, chart }) => {
            let selection = build_selection(&ctx, day, from, to)?;
            if chart {
                stats::run(&ctx, selection)?;
            } else {
                let report = ReportUseCase::new(&ctx.items, &ctx.logs).report(&selection)?;
                report::show_report(&report, &ctx.settings);
            }
        }
        Some(Commands::Dashboard) => {
            let dashboard = DashboardUseCase::new(&ctx.items, &ctx.logs, &ctx.cycle).build(&Cart::new())?;
            report::show_dashboard(&dashboard, &ctx.settings);
        }
        Some(Commands::History) => {
            let history = HistoryUseCase::new(&ctx.items, &ctx.logs).get_daily_history()?;
            history::show_history(&history, &ctx.settings);
        }
        Some(Commands::Cycle { action }) => match action {
            CycleCommand::Show => {
                let start = ctx.cycle.current()?.with_timezone(&chrono::Local);
                println!("Current cycle started {}", start.format("%Y-%m-%d %H:%M"));
            }
            CycleCommand::Reset { yes } => {
                if yes || confirm("Reset monthly totals? Logs stay in history.")? {
                    ctx.cycle.reset(Utc::now())?;
                    println!("New cycle started.");
                } else {
                    println!("Cancelled.");
                }
            }
        },
        Some(Commands::Theme { theme }) => {
            ctx.settings.theme = theme;
            ctx.save_settings()?;
            println!("Theme set to {}.", theme);
        }
        Some(Commands::Tui) | None => {
            tui::run(ctx)?;
        }
    }
    Ok(())
}

fn run_item(ctx: &AppContext, action: ItemCommand) -> Result<()> {
    match action {
        ItemCommand::Add { args } => {
            let item = forms::build_item(&args)?;
            let created = ctx.items.create_item(item)?;
            println!(
                "Item added: {} (ID: {})",
                created.name,
                created.id.map(|id| id.to_string()).unwrap_or_default()
            );
        }
        ItemCommand::List => {
            let items = ctx.items.list_items()?;
            report::show_items(&items, &ctx.settings);
        }
        ItemCommand::Edit { id, args } => {
            let mut item = ctx.items.get_item(id)?;
            forms::edit_item(&mut item, &args)?;
            ctx.items.update_item(&item)?;
            println!("Item {} updated.", id);
        }
        ItemCommand::Rm { id } => {
            let item = ctx.items.get_item(id)?;
            let kept = ctx.logs.logs_for_item(id)?.len();
            if confirm(&format!(
                "Delete '{}'? Its {} log{} will remain as Unknown Item.",
                item.name,
                kept,
                if kept == 1 { "" } else { "s" }
            ))? {
                ctx.items.delete_item(id)?;
                println!("Item {} deleted.", id);
            } else {
                println!("Cancelled.");
            }
        }
    }
    Ok(())
}

fn build_selection(
    ctx: &AppContext,
    day: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<Selection> {
    let today = time::today();
    if let Some(day) = day {
        return Ok(Selection::Day(parse_day(&day, today)?));
    }
    if from.is_some() || to.is_some() {
        return Ok(Selection::Range {
            start: parse_range_bound(from.as_deref().unwrap_or(""), today)?,
            end: parse_range_bound(to.as_deref().unwrap_or(""), today)?,
        });
    }
    Ok(Selection::Cycle(ctx.cycle.current()?))
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
