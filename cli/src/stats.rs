use std::{io, time::Duration};

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dailyusage_core::{
    service::dto::Report, time, usecase::report::ReportUseCase, ItemRepository, LogRepository,
    ItemService, LogService, Selection, Settings,
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph},
};

use crate::context::AppContext;
use crate::tui::palette::{truncate, Palette};

const BAR_WIDTH: u16 = 9;

/// The windows offered by the chart, cycle first.
pub fn scopes(cycle_start: Selection, today: NaiveDate) -> Vec<Selection> {
    let month_start = today.with_day(1).unwrap_or(today);
    vec![
        cycle_start,
        Selection::Day(today),
        Selection::Range {
            start: Some(month_start),
            end: Some(today),
        },
        Selection::Range {
            start: None,
            end: None,
        },
    ]
}

pub struct StatsApp {
    pub reports: Vec<Report>,
    pub current_index: usize,
}

impl StatsApp {
    /// One report per scope. `selected` is added in front when it is not one of them.
    pub fn load<R, L>(
        items: &ItemService<R>,
        logs: &LogService<L>,
        mut scopes: Vec<Selection>,
        selected: Selection,
    ) -> Result<Self>
    where
        R: ItemRepository,
        L: LogRepository,
    {
        let current_index = match scopes.iter().position(|s| *s == selected) {
            Some(i) => i,
            None => {
                scopes.insert(0, selected);
                0
            }
        };

        let usecase = ReportUseCase::new(items, logs);
        let reports = scopes
            .iter()
            .map(|s| usecase.report(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            reports,
            current_index,
        })
    }

    pub fn next_scope(&mut self) {
        if !self.reports.is_empty() && self.current_index < self.reports.len() - 1 {
            self.current_index += 1;
        }
    }

    pub fn previous_scope(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    pub fn current_data(&self) -> Option<&Report> {
        self.reports.get(self.current_index)
    }

    /// Largest total among the scopes, used to scale the gauge.
    pub fn widest_total(&self) -> f64 {
        self.reports.iter().map(|r| r.total_cost).fold(0.0, f64::max)
    }
}

pub fn run(ctx: &AppContext, selection: Selection) -> Result<()> {
    let cycle = Selection::Cycle(ctx.cycle.current()?);
    let mut app = StatsApp::load(&ctx.items, &ctx.logs, scopes(cycle, time::today()), selection)?;
    let palette = Palette::for_theme(ctx.settings.theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = (|| -> Result<()> {
        loop {
            terminal.draw(|f| ui(f, &app, &ctx.settings, &palette))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                            KeyCode::Left | KeyCode::Char('h') => app.previous_scope(),
                            KeyCode::Right | KeyCode::Char('l') => app.next_scope(),
                            _ => {}
                        }
                    }
                }
            }
        }
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn ui(frame: &mut Frame, app: &StatsApp, settings: &Settings, palette: &Palette) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(1), Constraint::Length(44)])
        .split(main_layout[0]);

    let app_title = Paragraph::new(Span::styled(
        "DAILY USAGE STATS",
        Style::default().fg(palette.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    if let Some(report) = app.current_data() {
        let nav_text = Line::from(vec![
            Span::styled(
                " < ",
                Style::default().fg(if app.current_index > 0 { palette.text } else { palette.muted }),
            ),
            Span::styled(
                format!(" {} ", report.title),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " > ",
                Style::default().fg(if app.current_index + 1 < app.reports.len() {
                    palette.text
                } else {
                    palette.muted
                }),
            ),
        ]);
        let nav = Paragraph::new(nav_text)
            .alignment(Alignment::Right)
            .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
        frame.render_widget(nav, header_layout[2]);

        draw_report(frame, report, app.widest_total(), settings, palette, main_layout[1]);
    }

    frame.render_widget(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(palette.muted)),
        main_layout[0],
    );

    let help = Line::from(vec![
        Span::styled("WINDOW: ", Style::default().fg(palette.muted)),
        Span::styled("←/→ ", Style::default().fg(palette.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(palette.muted)),
        Span::styled("q", Style::default().fg(palette.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), main_layout[2]);
}

/// Chart on the left, summary on the right. Shared with the TUI report view.
pub fn draw_report(
    frame: &mut Frame,
    report: &Report,
    scale_total: f64,
    settings: &Settings,
    palette: &Palette,
    area: Rect,
) {
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),
            Constraint::Length(1),
            Constraint::Percentage(30),
        ])
        .split(area);

    draw_chart(frame, report, settings, palette, content_chunks[0]);
    draw_info_panel(frame, report, scale_total, settings, palette, content_chunks[2]);
}

fn draw_chart(frame: &mut Frame, report: &Report, settings: &Settings, palette: &Palette, area: Rect) {
    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.muted))
        .title(" Cost per Item ");

    let bar_items: Vec<Bar> = report
        .active_rows()
        .map(|row| {
            // bars take integers, so cents
            let value = (row.stats.total_cost * 100.0).round().max(0.0) as u64;
            Bar::default()
                .label(truncate(&row.name, BAR_WIDTH as usize))
                .value(value)
                .style(Style::default().fg(palette.cost))
                .text_value(settings.format_money(row.stats.total_cost))
        })
        .collect();

    if bar_items.is_empty() {
        frame.render_widget(
            Paragraph::new("Nothing logged in this window")
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.muted))
                .block(chart_block),
            area,
        );
        return;
    }

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(BAR_WIDTH)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bar_items));

    frame.render_widget(chart, area);
}

fn draw_info_panel(
    frame: &mut Frame,
    report: &Report,
    scale_total: f64,
    settings: &Settings,
    palette: &Palette,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(area);

    let active = report.active_rows().count();
    let top = report
        .active_rows()
        .max_by(|a, b| a.stats.total_cost.total_cmp(&b.stats.total_cost));

    let info_text = vec![
        Line::from(vec![Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Total:  ", Style::default().fg(palette.muted)),
            Span::styled(
                settings.format_money(report.total_cost),
                Style::default().fg(palette.cost).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Items:  ", Style::default().fg(palette.muted)),
            Span::styled(active.to_string(), Style::default().fg(palette.text)),
        ]),
        Line::from(vec![
            Span::styled("Top:    ", Style::default().fg(palette.muted)),
            Span::styled(
                top.map(|t| t.name.clone()).unwrap_or_else(|| "-".to_string()),
                Style::default().fg(palette.text),
            ),
        ]),
    ];

    let info_block = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.muted))
            .title(" Summary "),
    );
    frame.render_widget(info_block, chunks[0]);

    let ratio = if scale_total > 0.0 {
        (report.total_cost / scale_total).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Share of Widest Window ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.muted)),
        )
        .gauge_style(Style::default().fg(palette.primary))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));

    frame.render_widget(gauge, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dailyusage_core::{FileItemRepository, FileLogRepository, Item, ManualEntry};
    use tempfile::tempdir;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_scopes() {
        let cycle = Selection::Cycle(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let scopes = scopes(cycle, day("2024-03-13"));

        assert_eq!(scopes[0], cycle);
        assert_eq!(scopes[1], Selection::Day(day("2024-03-13")));
        assert_eq!(
            scopes[2],
            Selection::Range {
                start: Some(day("2024-03-01")),
                end: Some(day("2024-03-13"))
            }
        );
    }

    #[test]
    fn test_load_selects_requested_scope() {
        let dir = tempdir().unwrap();
        let items = ItemService::new(FileItemRepository::open(dir.path()).unwrap());
        let logs = LogService::new(FileLogRepository::open(dir.path()).unwrap());
        let milk = items
            .create_item(Item::new("Milk".to_string(), "liter".to_string(), 2.0))
            .unwrap();
        logs.add_log(&milk, ManualEntry::new(day("2024-03-10"), 2.0)).unwrap();

        let cycle = Selection::Cycle(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let base = scopes(cycle, day("2024-03-13"));

        let app = StatsApp::load(&items, &logs, base.clone(), Selection::Day(day("2024-03-13"))).unwrap();
        assert_eq!(app.reports.len(), 4);
        assert_eq!(app.current_index, 1);
        assert_eq!(app.current_data().unwrap().total_cost, 0.0);

        let picked = Selection::Day(day("2024-03-10"));
        let mut app = StatsApp::load(&items, &logs, base, picked).unwrap();
        assert_eq!(app.reports.len(), 5);
        assert_eq!(app.current_index, 0);
        assert_eq!(app.current_data().unwrap().total_cost, 4.0);
        assert_eq!(app.widest_total(), 4.0);

        app.previous_scope();
        assert_eq!(app.current_index, 0);
        for _ in 0..10 {
            app.next_scope();
        }
        assert_eq!(app.current_index, 4);
    }
}
