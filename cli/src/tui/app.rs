use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use dailyusage_core::service::dto::{DailyHistory, Dashboard, DashboardRow, LogDto};
use dailyusage_core::usecase::dashboard::DashboardUseCase;
use dailyusage_core::usecase::history::HistoryUseCase;
use dailyusage_core::{time, Cart, CycleReset, LogId, Selection, StoreChange, Subscription, Theme};
use ratatui::widgets::TableState;
use tracing::error;

use crate::context::AppContext;
use crate::forms;
use crate::stats::{scopes, StatsApp};
use crate::tui::palette::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AddingItem,
    ConfirmReset,
    ConfirmDelete(LogId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    History,
    Report,
}

impl View {
    fn next(self) -> View {
        match self {
            View::Dashboard => View::History,
            View::History => View::Report,
            View::Report => View::Dashboard,
        }
    }
}

pub struct App {
    pub ctx: AppContext,
    pub palette: Palette,
    pub cart: Cart,
    /// Day the cart is checked out to. Never after today.
    pub date: NaiveDate,
    pub view: View,
    pub dashboard: Dashboard,
    pub history: Vec<DailyHistory>,
    pub stats: StatsApp,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<String>,
    item_changes: Subscription<StoreChange>,
    log_changes: Subscription<StoreChange>,
    cycle_changes: Subscription<CycleReset>,
}

impl App {
    pub fn new(ctx: AppContext) -> Result<App> {
        let cart = Cart::new();
        let dashboard = DashboardUseCase::new(&ctx.items, &ctx.logs, &ctx.cycle).build(&cart)?;
        let history = HistoryUseCase::new(&ctx.items, &ctx.logs).get_daily_history()?;
        let cycle = Selection::Cycle(dashboard.cycle_start);
        let stats = StatsApp::load(&ctx.items, &ctx.logs, scopes(cycle, time::today()), cycle)?;

        let mut state = TableState::default();
        if !dashboard.rows.is_empty() {
            state.select(Some(0));
        }

        Ok(App {
            palette: Palette::for_theme(ctx.settings.theme),
            item_changes: ctx.items.subscribe(),
            log_changes: ctx.logs.subscribe(),
            cycle_changes: ctx.cycle.subscribe(),
            ctx,
            cart,
            date: time::today(),
            view: View::Dashboard,
            dashboard,
            history,
            stats,
            state,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
        })
    }

    /// Reloads when any store reported a change since the last call.
    pub fn refresh(&mut self) {
        // `|` so every subscription gets drained
        let changed = self.item_changes.changed() | self.log_changes.changed() | self.cycle_changes.changed();
        if changed {
            let res = self.reload();
            self.report(res);
        }
    }

    fn reload(&mut self) -> Result<()> {
        self.dashboard = DashboardUseCase::new(&self.ctx.items, &self.ctx.logs, &self.ctx.cycle).build(&self.cart)?;
        self.history = HistoryUseCase::new(&self.ctx.items, &self.ctx.logs).get_daily_history()?;

        let scopes = scopes(Selection::Cycle(self.dashboard.cycle_start), time::today());
        let keep = self.stats.current_index.min(scopes.len() - 1);
        let selected = scopes[keep];
        self.stats = StatsApp::load(&self.ctx.items, &self.ctx.logs, scopes, selected)?;

        self.clamp_selection();
        Ok(())
    }

    fn report<T>(&mut self, res: Result<T>) -> Option<T> {
        match res {
            Ok(value) => Some(value),
            Err(e) => {
                error!(error = %e, "action failed");
                self.status = Some(format!("Error: {}", e));
                None
            }
        }
    }

    pub fn rows_in_view(&self) -> usize {
        match self.view {
            View::Dashboard => self.dashboard.rows.len(),
            View::History => self.history.iter().map(|d| d.entries.len()).sum(),
            View::Report => 0,
        }
    }

    pub fn history_entries(&self) -> impl Iterator<Item = &LogDto> {
        self.history.iter().flat_map(|d| d.entries.iter())
    }

    fn clamp_selection(&mut self) {
        let len = self.rows_in_view();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn next(&mut self) {
        let len = self.rows_in_view();
        if len == 0 {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rows_in_view();
        if len == 0 {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn switch_view(&mut self) {
        self.view = self.view.next();
        self.state.select(None);
        self.clamp_selection();
    }

    fn selected_row(&self) -> Option<&DashboardRow> {
        if self.view != View::Dashboard {
            return None;
        }
        self.state.selected().and_then(|i| self.dashboard.rows.get(i))
    }

    pub fn increment_selected(&mut self) {
        if let Some(item) = self.selected_row().map(|r| r.item.clone()) {
            self.cart.increment(&item);
            self.sync_cart();
        }
    }

    pub fn decrement_selected(&mut self) {
        if let Some(item) = self.selected_row().map(|r| r.item.clone()) {
            self.cart.decrement(&item);
            self.sync_cart();
        }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.sync_cart();
    }

    /// Cart edits never touch the store, so only the cart columns change.
    fn sync_cart(&mut self) {
        for row in &mut self.dashboard.rows {
            if let Some(id) = row.item.id {
                row.in_cart = self.cart.quantity_of(id);
            }
        }
        self.dashboard.cart_items = self.cart.len();
        self.dashboard.cart_total = self.cart.total_cost();
    }

    pub fn checkout(&mut self) {
        if self.cart.is_empty() {
            self.status = Some("Cart is empty".to_string());
            return;
        }

        let total = self.cart.total_cost();
        let res = self.ctx.logs.checkout(&mut self.cart, self.date, time::time_of_day());
        // the cart is empty either way
        self.sync_cart();
        if let Some(written) = self.report(res) {
            self.status = Some(format!(
                "Saved {} log{} for {} ({})",
                written.len(),
                if written.len() == 1 { "" } else { "s" },
                self.date,
                self.ctx.settings.format_money(total)
            ));
        }
    }

    pub fn previous_day(&mut self) {
        if let Some(d) = self.date.checked_sub_days(Days::new(1)) {
            self.date = d;
        }
    }

    pub fn next_day(&mut self) {
        let today = time::today();
        match self.date.checked_add_days(Days::new(1)) {
            Some(d) if d <= today => self.date = d,
            _ => self.date = self.date.min(today),
        }
    }

    pub fn jump_today(&mut self) {
        self.date = time::today();
    }

    pub fn request_reset(&mut self) {
        self.input_mode = InputMode::ConfirmReset;
    }

    pub fn request_delete(&mut self) {
        if self.view != View::History {
            return;
        }
        let id = self
            .state
            .selected()
            .and_then(|i| self.history_entries().nth(i))
            .and_then(|e| e.id);
        if let Some(id) = id {
            self.input_mode = InputMode::ConfirmDelete(id);
        }
    }

    /// Answers a pending y/n question.
    pub fn confirm(&mut self, yes: bool) {
        let mode = self.input_mode;
        self.input_mode = InputMode::Normal;
        if !yes {
            self.status = Some("Cancelled".to_string());
            return;
        }

        match mode {
            InputMode::ConfirmReset => {
                let res = self.ctx.cycle.reset(Utc::now());
                if self.report(res).is_some() {
                    self.status = Some("New cycle started".to_string());
                }
            }
            InputMode::ConfirmDelete(id) => {
                let res = self.ctx.logs.delete_log(id);
                if self.report(res).is_some() {
                    self.status = Some(format!("Log {} deleted", id));
                }
            }
            InputMode::Normal | InputMode::AddingItem => {}
        }
    }

    pub fn cycle_theme(&mut self) {
        let theme = match self.ctx.settings.theme {
            Theme::System => Theme::Light,
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
        };
        self.ctx.settings.theme = theme;
        self.palette = Palette::for_theme(theme);
        let res = self.ctx.save_settings();
        if self.report(res).is_some() {
            self.status = Some(format!("Theme: {}", theme));
        }
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::AddingItem;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Creates an item from `Milk unit:liter rate:2.5 ...`.
    pub fn submit_item(&mut self) {
        let args: Vec<String> = self.input.split_whitespace().map(|s| s.to_string()).collect();
        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
        if args.is_empty() {
            return;
        }

        let res = forms::build_item(&args).and_then(|item| self.ctx.items.create_item(item));
        if let Some(item) = self.report(res) {
            self.status = Some(format!("Added {}", item.name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dailyusage_core::Item;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, App) {
        let dir = tempdir().unwrap();
        let ctx = AppContext::open(Some(dir.path().to_path_buf())).unwrap();
        ctx.items
            .create_item(Item::new("Milk".to_string(), "liter".to_string(), 2.5))
            .unwrap();
        let mut bread = Item::new("Bread".to_string(), "loaf".to_string(), 3.0);
        bread.is_routine = false;
        ctx.items.create_item(bread).unwrap();

        let app = App::new(ctx).unwrap();
        (dir, app)
    }

    #[test]
    fn test_dashboard_lists_routine_items_only() {
        let (_dir, app) = setup();
        assert_eq!(app.dashboard.rows.len(), 1);
        assert_eq!(app.dashboard.rows[0].item.name, "Milk");
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_cart_then_checkout_updates_totals() {
        let (_dir, mut app) = setup();

        app.increment_selected();
        app.increment_selected();
        app.increment_selected();
        app.decrement_selected();
        assert_eq!(app.dashboard.rows[0].in_cart, 2);
        assert_eq!(app.dashboard.cart_total, 5.0);

        app.checkout();
        assert!(app.cart.is_empty());
        assert_eq!(app.dashboard.cart_items, 0);

        app.refresh();
        assert_eq!(app.dashboard.rows[0].stats.total_quantity, 2.0);
        assert_eq!(app.dashboard.cycle_total, 5.0);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].entries.len(), 1);
    }

    #[test]
    fn test_checkout_empty_cart_writes_nothing() {
        let (_dir, mut app) = setup();
        app.checkout();
        assert_eq!(app.status.as_deref(), Some("Cart is empty"));
        app.refresh();
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_backdate_never_passes_today() {
        let (_dir, mut app) = setup();
        let today = time::today();

        app.next_day();
        assert_eq!(app.date, today);

        app.previous_day();
        app.previous_day();
        assert_eq!(app.date, today - Days::new(2));

        app.next_day();
        assert_eq!(app.date, today - Days::new(1));

        app.jump_today();
        assert_eq!(app.date, today);
    }

    #[test]
    fn test_backdated_checkout_lands_on_chosen_day() {
        let (_dir, mut app) = setup();
        app.previous_day();
        app.increment_selected();
        app.checkout();
        app.refresh();

        assert_eq!(app.history[0].date, time::today() - Days::new(1));
    }

    #[test]
    fn test_reset_needs_confirmation() {
        let (_dir, mut app) = setup();
        app.increment_selected();
        app.checkout();
        app.refresh();
        assert_eq!(app.dashboard.cycle_total, 2.5);

        app.request_reset();
        app.confirm(false);
        app.refresh();
        assert_eq!(app.dashboard.cycle_total, 2.5);

        app.request_reset();
        assert_eq!(app.input_mode, InputMode::ConfirmReset);
        app.confirm(true);
        app.refresh();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.dashboard.cycle_total, 0.0);
        // history keeps the log
        assert_eq!(app.history.len(), 1);
    }

    #[test]
    fn test_delete_from_history() {
        let (_dir, mut app) = setup();
        app.increment_selected();
        app.checkout();
        app.refresh();

        // only the history view deletes
        app.request_delete();
        assert_eq!(app.input_mode, InputMode::Normal);

        app.switch_view();
        assert_eq!(app.view, View::History);
        assert_eq!(app.state.selected(), Some(0));
        app.request_delete();
        assert!(matches!(app.input_mode, InputMode::ConfirmDelete(_)));
        app.confirm(true);
        app.refresh();

        assert!(app.history.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_add_item_from_input_line() {
        let (_dir, mut app) = setup();
        app.enter_add_mode();
        for c in "Eggs unit:dozen rate:6".chars() {
            app.input_char(c);
        }
        app.submit_item();
        app.refresh();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.status.as_deref(), Some("Added Eggs"));
        assert_eq!(app.dashboard.rows.len(), 2);
    }

    #[test]
    fn test_bad_item_input_reports_error() {
        let (_dir, mut app) = setup();
        app.enter_add_mode();
        for c in "Eggs rate:6".chars() {
            app.input_char(c);
        }
        app.submit_item();

        assert!(app.status.as_deref().unwrap_or("").starts_with("Error"));
        app.refresh();
        assert_eq!(app.dashboard.rows.len(), 1);
    }

    #[test]
    fn test_input_editing_is_char_aware() {
        let (_dir, mut app) = setup();
        app.enter_add_mode();
        app.input_char('₹');
        app.input_char('b');
        app.move_cursor_left();
        app.delete_char();
        assert_eq!(app.input, "b");
    }
}
