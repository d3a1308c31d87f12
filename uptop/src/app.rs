//! App state and main loop: input handling, spawning console operations, and drawing.

use std::{future::Future, io, time::Duration};

use async_trait::async_trait;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::TableState,
    Terminal,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;

use crate::console::{Confirm, Console, ConsoleState};
use crate::form::TargetForm;
use crate::registry::ActionKind;
use crate::ui::detail::{draw_detail, draw_hours_input};
use crate::ui::header::draw_header;
use crate::ui::popup::{draw_add_form, draw_confirm, form_field_mut, FORM_FIELDS, KIND_FIELD};
use crate::ui::status::draw_status;
use crate::ui::targets::{clamp_cursor, draw_targets, targets_handle_key, targets_hit_test};

/// A pending yes/no question from a console task, answered by the UI loop.
#[derive(Debug)]
pub struct ConfirmRequest {
    pub prompt: String,
    reply: oneshot::Sender<bool>,
}

impl ConfirmRequest {
    pub fn answer(self, yes: bool) {
        // the asking task may be gone already
        let _ = self.reply.send(yes);
    }
}

/// Confirmation routed through the TUI's modal dialog.
pub struct PromptConfirm {
    tx: mpsc::UnboundedSender<ConfirmRequest>,
}

impl PromptConfirm {
    pub fn new(tx: mpsc::UnboundedSender<ConfirmRequest>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let (reply, rx) = oneshot::channel();
        let req = ConfirmRequest {
            prompt: prompt.to_string(),
            reply,
        };
        if self.tx.send(req).is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    AddForm,
    EditHours,
}

pub struct App {
    console: Console,
    api_url: String,

    // Last drawn snapshot of the console state
    view: ConsoleState,

    mode: Mode,
    cursor: usize,
    table_state: TableState,
    detail_scroll: u16,
    form: TargetForm,
    form_focus: usize,
    hours: String,

    confirm_rx: mpsc::UnboundedReceiver<ConfirmRequest>,
    pending_confirm: Option<ConfirmRequest>,

    // Cached for mouse hit-testing and paging
    last_table_area: Option<Rect>,

    should_quit: bool,
}

impl App {
    pub fn new(
        console: Console,
        confirm_rx: mpsc::UnboundedReceiver<ConfirmRequest>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            console,
            api_url: api_url.into(),
            view: ConsoleState::default(),
            mode: Mode::Normal,
            cursor: 0,
            table_state: TableState::default(),
            detail_scroll: 0,
            form: TargetForm::default(),
            form_focus: 0,
            hours: String::new(),
            confirm_rx,
            pending_confirm: None,
            last_table_area: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Initial load, like the page-load refresh
        self.spawn(|c| async move { c.refresh().await });

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        let backend = terminal.backend_mut();
        execute!(backend, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                match event::read()? {
                    Event::Key(k) if k.kind == KeyEventKind::Press => self.handle_key(k),
                    Event::Mouse(m) => self.handle_mouse(m),
                    _ => {}
                }
            }
            if self.should_quit {
                break;
            }

            if self.pending_confirm.is_none() {
                if let Ok(req) = self.confirm_rx.try_recv() {
                    self.pending_confirm = Some(req);
                }
            }

            self.view = self.console.snapshot().await;
            clamp_cursor(&mut self.cursor, self.view.registry.len());
            self.table_state.select(if self.view.registry.is_empty() {
                None
            } else {
                Some(self.cursor)
            });

            terminal.draw(|f| self.draw(f))?;

            sleep(Duration::from_millis(50)).await;
        }

        // Nobody is left to answer
        if let Some(req) = self.pending_confirm.take() {
            req.answer(false);
        }
        Ok(())
    }

    /// Run a console operation as its own task; it reports through the status line.
    fn spawn<F, Fut>(&self, op: F)
    where
        F: FnOnce(Console) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(op(self.console.clone()));
    }

    fn handle_key(&mut self, k: KeyEvent) {
        // raw mode swallows SIGINT
        if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if let Some(req) = self.pending_confirm.take() {
            match k.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => req.answer(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => req.answer(false),
                _ => self.pending_confirm = Some(req),
            }
            return;
        }

        match self.mode {
            Mode::Normal => self.handle_normal_key(k),
            Mode::AddForm => self.handle_form_key(k),
            Mode::EditHours => self.handle_hours_key(k),
        }
    }

    fn handle_normal_key(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char('s') => self.row_action(self.cursor, ActionKind::Select),
            KeyCode::Char('d') | KeyCode::Delete => {
                self.row_action(self.cursor, ActionKind::Delete)
            }
            KeyCode::Char('a') => {
                self.mode = Mode::AddForm;
                self.form_focus = 0;
            }
            KeyCode::Char('r') => self.spawn(|c| async move { c.refresh().await }),
            KeyCode::Char('c') => {
                self.detail_scroll = 0;
                self.spawn(|c| async move { c.load_checks().await });
            }
            KeyCode::Char('u') => self.load_uptime(),
            KeyCode::Char('h') => self.mode = Mode::EditHours,
            KeyCode::Char('J') => self.detail_scroll = self.detail_scroll.saturating_add(1),
            KeyCode::Char('K') => self.detail_scroll = self.detail_scroll.saturating_sub(1),
            _ => {
                // page size = visible rows (inner height minus header = 1)
                let page = self
                    .last_table_area
                    .map(|a| a.height.saturating_sub(3).max(1) as usize)
                    .unwrap_or(1);
                targets_handle_key(&mut self.cursor, k, page, self.view.registry.len());
            }
        }
    }

    fn handle_form_key(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Tab | KeyCode::Down => {
                self.form_focus = (self.form_focus + 1) % FORM_FIELDS.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form_focus = (self.form_focus + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
            }
            KeyCode::Left if self.form_focus == KIND_FIELD => self.form.cycle_kind(false),
            KeyCode::Right | KeyCode::Char(' ') if self.form_focus == KIND_FIELD => {
                self.form.cycle_kind(true)
            }
            KeyCode::Enter => {
                // the form keeps its contents so a rejected create can be fixed and resent
                let form = self.form.clone();
                self.mode = Mode::Normal;
                self.spawn(move |c| async move { c.add_target(&form).await });
            }
            KeyCode::Backspace => {
                if let Some(field) = form_field_mut(&mut self.form, self.form_focus) {
                    field.pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(field) = form_field_mut(&mut self.form, self.form_focus) {
                    field.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_hours_key(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.load_uptime();
            }
            KeyCode::Backspace => {
                self.hours.pop();
            }
            KeyCode::Char(ch) if ch.is_ascii_digit() && self.hours.len() < 6 => {
                self.hours.push(ch)
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent) {
        if self.pending_confirm.is_some() || self.mode != Mode::Normal {
            return;
        }
        let Some(area) = self.last_table_area else {
            return;
        };
        let total = self.view.registry.len();
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = targets_hit_test(
                    area,
                    self.table_state.offset(),
                    total,
                    m.column,
                    m.row,
                );
                if let Some(hit) = hit {
                    self.cursor = hit.row;
                    if let Some(kind) = hit.action {
                        self.row_action(hit.row, kind);
                    }
                }
            }
            MouseEventKind::ScrollDown => {
                self.cursor = self.cursor.saturating_add(1);
                clamp_cursor(&mut self.cursor, total);
            }
            MouseEventKind::ScrollUp => self.cursor = self.cursor.saturating_sub(1),
            _ => {}
        }
    }

    /// Resolve a row button through the registry's bindings and run it.
    fn row_action(&mut self, row: usize, kind: ActionKind) {
        let Some(action) = self.view.registry.binding(row, kind) else {
            return;
        };
        if kind == ActionKind::Select {
            self.detail_scroll = 0;
        }
        self.spawn(move |c| async move { c.dispatch(action).await });
    }

    fn load_uptime(&mut self) {
        let hours = self.hours.clone();
        self.detail_scroll = 0;
        self.spawn(move |c| async move { c.load_uptime(&hours).await });
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        // Root rows: header, body, status
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // header
                Constraint::Min(8),    // targets + detail
                Constraint::Length(1), // status line
            ])
            .split(area);

        draw_header(f, rows[0], &self.api_url, &self.view);

        // Body: targets on the left, detail + hours on the right
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(rows[1]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(body[1]);

        self.last_table_area = Some(body[0]);
        draw_targets(f, body[0], &self.view, &mut self.table_state);
        draw_detail(f, right[0], &self.view.detail, self.detail_scroll);
        draw_hours_input(f, right[1], &self.hours, self.mode == Mode::EditHours);
        draw_status(f, rows[2], &self.view.status);

        if self.mode == Mode::AddForm {
            draw_add_form(f, area, &self.form, self.form_focus);
        }
        if let Some(req) = &self.pending_confirm {
            draw_confirm(f, area, &req.prompt);
        }
    }
}
