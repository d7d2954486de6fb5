use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::history::format_quantity;
use crate::stats;
use crate::tui::app::{App, InputMode, View};
use crate::tui::palette::truncate;

const NAME_WIDTH: usize = 18;
const INPUT_PROMPT: &str = "New item: ";

pub fn draw(f: &mut Frame, app: &mut App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(2), // Status + help
        ])
        .split(f.area());

    draw_header(f, app, main_chunks[0]);

    match app.view {
        View::Dashboard => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(main_chunks[1]);
            draw_dashboard(f, app, content_chunks[0]);
            draw_cart(f, app, content_chunks[1]);
        }
        View::History => draw_history(f, app, main_chunks[1]),
        View::Report => draw_report(f, app, main_chunks[1]),
    }

    draw_footer(f, app, main_chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.muted));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(1), Constraint::Length(36)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            "DAILY USAGE",
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );

    let tab = |label: &'static str, view: View| {
        if app.view == view {
            Span::styled(format!(" {} ", label), Style::default().fg(p.primary).add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(p.muted))
        }
    };
    let tabs = Line::from(vec![
        tab("Dashboard", View::Dashboard),
        tab("History", View::History),
        tab("Report", View::Report),
    ]);
    f.render_widget(Paragraph::new(tabs).alignment(Alignment::Center), chunks[1]);

    let is_today = app.date == dailyusage_core::time::today();
    let date = Line::from(vec![
        Span::styled("< ", Style::default().fg(p.text)),
        Span::styled(
            app.date.format("%a %Y-%m-%d").to_string(),
            Style::default()
                .fg(if is_today { p.text } else { p.cart })
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" >", Style::default().fg(if is_today { p.muted } else { p.text })),
    ]);
    f.render_widget(Paragraph::new(date).alignment(Alignment::Right), chunks[2]);
}

fn draw_dashboard(f: &mut Frame, app: &mut App, area: Rect) {
    let p = app.palette;
    let settings = &app.ctx.settings;

    let rows: Vec<Row> = app
        .dashboard
        .rows
        .iter()
        .map(|row| {
            let item = &row.item;
            let cart = if row.in_cart > 0 {
                Span::styled(format!("+{}", row.in_cart), Style::default().fg(p.cart).add_modifier(Modifier::BOLD))
            } else {
                Span::raw("")
            };
            Row::new(vec![
                Span::styled(truncate(&item.name, NAME_WIDTH), Style::default().fg(p.text).add_modifier(Modifier::BOLD)),
                Span::styled(format!("{}/{}", settings.format_money(item.rate), item.unit), Style::default().fg(p.muted)),
                Span::raw(format!("{} {}", format_quantity(row.stats.total_quantity), item.unit)),
                Span::styled(settings.format_money(row.stats.total_cost), Style::default().fg(p.cost)),
                cart,
            ])
        })
        .collect();

    let title = format!(
        " Since {} ",
        app.dashboard
            .cycle_start
            .with_timezone(&chrono::Local)
            .format("%b %-d, %H:%M")
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(NAME_WIDTH as u16),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(4),
        ],
    )
    .header(Row::new(vec!["Item", "Rate", "Cycle Qty", "Cycle Cost", "Cart"]).style(Style::default().fg(p.primary)))
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(p.muted)),
    )
    .row_highlight_style(Style::default().bg(p.highlight).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    if app.dashboard.rows.is_empty() {
        f.render_widget(
            Paragraph::new("No routine items yet. Press 'a' to add one.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(p.muted))
                .block(Block::default().title(" Routine ").borders(Borders::ALL).border_type(BorderType::Rounded)),
            area,
        );
        return;
    }

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_cart(f: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let settings = &app.ctx.settings;

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Cycle total: ", Style::default().fg(p.muted)),
            Span::styled(
                settings.format_money(app.dashboard.cycle_total),
                Style::default().fg(p.cost).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    if app.cart.is_empty() {
        lines.push(Line::from(Span::styled("Cart is empty", Style::default().fg(p.muted))));
    } else {
        for entry in app.cart.entries() {
            lines.push(Line::from(vec![
                Span::styled(format!("{:>3} × ", entry.quantity), Style::default().fg(p.cart)),
                Span::raw(truncate(&entry.item.name, NAME_WIDTH)),
                Span::styled(format!("  {}", settings.format_money(entry.cost())), Style::default().fg(p.muted)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Cart total: ", Style::default().fg(p.muted)),
            Span::styled(
                settings.format_money(app.dashboard.cart_total),
                Style::default().fg(p.cart).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("Enter saves to {}", app.date.format("%a %b %-d")),
            Style::default().fg(p.muted),
        )));
    }

    let cart = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" Cart ({}) ", app.dashboard.cart_items))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(p.muted)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(cart, area);
}

fn draw_history(f: &mut Frame, app: &mut App, area: Rect) {
    let p = app.palette;
    let settings = &app.ctx.settings;

    let mut rows: Vec<Row> = Vec::new();
    for day in &app.history {
        for (i, entry) in day.entries.iter().enumerate() {
            let (date, total) = if i == 0 {
                (
                    format!("{} {}", day.day_of_week, day.date.format("%m-%d")),
                    settings.format_money(day.total_cost),
                )
            } else {
                (String::new(), String::new())
            };
            let name_style = if entry.is_orphaned() {
                Style::default().fg(p.warn)
            } else {
                Style::default().fg(p.text)
            };
            let quantity = match &entry.unit {
                Some(unit) => format!("{} {}", format_quantity(entry.quantity), unit),
                None => format_quantity(entry.quantity),
            };

            rows.push(Row::new(vec![
                Span::styled(date, Style::default().fg(p.primary)),
                Span::styled(entry.timestamp.with_timezone(&chrono::Local).format("%H:%M").to_string(), Style::default().fg(p.muted)),
                Span::styled(truncate(&entry.item_name, NAME_WIDTH), name_style),
                Span::raw(quantity),
                Span::styled(settings.format_money(entry.cost), Style::default().fg(p.cost)),
                Span::styled(total, Style::default().fg(p.cost).add_modifier(Modifier::BOLD)),
                Span::styled(entry.note.clone().unwrap_or_default(), Style::default().fg(p.muted)),
            ]));
        }
    }

    let block = Block::default()
        .title(" History ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.muted));

    if rows.is_empty() {
        f.render_widget(
            Paragraph::new("Nothing logged yet")
                .alignment(Alignment::Center)
                .style(Style::default().fg(p.muted))
                .block(block),
            area,
        );
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(NAME_WIDTH as u16),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(Row::new(vec!["Day", "Time", "Item", "Qty", "Cost", "Day Total", "Note"]).style(Style::default().fg(p.primary)))
    .block(block)
    .row_highlight_style(Style::default().bg(p.highlight).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_report(f: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    let Some(report) = app.stats.current_data() else {
        return;
    };
    let index = app.stats.current_index;
    let nav = Line::from(vec![
        Span::styled(" < ", Style::default().fg(if index > 0 { p.text } else { p.muted })),
        Span::styled(report.title.clone(), Style::default().fg(p.text).add_modifier(Modifier::BOLD)),
        Span::styled(
            " > ",
            Style::default().fg(if index + 1 < app.stats.reports.len() { p.text } else { p.muted }),
        ),
    ]);
    f.render_widget(Paragraph::new(nav).alignment(Alignment::Center), chunks[0]);

    stats::draw_report(f, report, app.stats.widest_total(), &app.ctx.settings, p, chunks[1]);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let status = match app.input_mode {
        InputMode::AddingItem => {
            let line = Line::from(vec![
                Span::styled(INPUT_PROMPT, Style::default().fg(p.primary)),
                Span::styled(app.input.as_str(), Style::default().fg(p.text)),
            ]);
            let before: String = app.input.chars().take(app.cursor_position).collect();
            let x = chunks[0].x + (INPUT_PROMPT.width() + before.width()) as u16;
            f.set_cursor_position((x.min(chunks[0].right().saturating_sub(1)), chunks[0].y));
            line
        }
        InputMode::ConfirmReset => Line::from(Span::styled(
            "Reset cycle totals? Logs stay in history. (y/n)",
            Style::default().fg(p.warn).add_modifier(Modifier::BOLD),
        )),
        InputMode::ConfirmDelete(id) => Line::from(Span::styled(
            format!("Delete log {}? (y/n)", id),
            Style::default().fg(p.warn).add_modifier(Modifier::BOLD),
        )),
        InputMode::Normal => match &app.status {
            Some(msg) if msg.starts_with("Error") => Line::from(Span::styled(msg.as_str(), Style::default().fg(p.warn))),
            Some(msg) => Line::from(Span::styled(msg.as_str(), Style::default().fg(p.cost))),
            None => Line::from(""),
        },
    };
    f.render_widget(Paragraph::new(status), chunks[0]);

    let help = match (app.input_mode, app.view) {
        (InputMode::AddingItem, _) => "name unit:<u> rate:<r> [provider:<p>] [routine:no] | Enter: Save | Esc: Cancel",
        (InputMode::ConfirmReset | InputMode::ConfirmDelete(_), _) => "y: Confirm | any key: Cancel",
        (InputMode::Normal, View::Dashboard) => {
            "j/k: Move | +/-: Cart | Enter: Save | c: Clear | [/]: Day | a: Add | R: Reset | Tab: View | q: Quit"
        }
        (InputMode::Normal, View::History) => "j/k: Move | d: Delete | Tab: View | T: Theme | q: Quit",
        (InputMode::Normal, View::Report) => "←/→: Window | Tab: View | T: Theme | q: Quit",
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(p.muted)).alignment(Alignment::Center),
        chunks[1],
    );
}
