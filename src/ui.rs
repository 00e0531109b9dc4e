use crate::board::{ListKind, TodoBoard};
use crate::config::Config;
use crate::scheduler::ReminderScheduler;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

const PANELS: [ListKind; 2] = [ListKind::Pending, ListKind::Done];

/// UI state tying the board and the reminder scheduler together.
pub struct App {
    pub board: TodoBoard,
    pub scheduler: ReminderScheduler,
    config: Config,
    data_dir: Option<PathBuf>,
    selected_panel: usize,
    selected_task: usize,
}

impl App {
    pub fn new(
        board: TodoBoard,
        scheduler: ReminderScheduler,
        config: Config,
        data_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            board,
            scheduler,
            config,
            data_dir,
            selected_panel: 0,
            selected_task: 0,
        }
    }

    fn selected_list(&self) -> ListKind {
        PANELS[self.selected_panel]
    }

    fn clamp_selection(&mut self) {
        let len = self.board.list(self.selected_list()).len();
        self.selected_task = self.selected_task.min(len.saturating_sub(1));
    }

    fn add_task(&mut self, description: &str) {
        if self.board.add_task(description) {
            self.scheduler.task_added(description, self.board.has_pending());
        }
    }

    fn edit_selected(&mut self, new_description: &str) {
        self.board
            .edit_task(self.selected_list(), self.selected_task, new_description);
    }

    fn delete_selected(&mut self) {
        let kind = self.selected_list();
        let Some(task) = self.board.list(kind).get(self.selected_task).cloned() else {
            return;
        };
        self.board.delete_task(&task, kind);
        self.clamp_selection();
    }

    fn reorder_selected(&mut self, down: bool) {
        let kind = self.selected_list();
        let len = self.board.list(kind).len();
        let from = self.selected_task;
        if len < 2 || from >= len {
            return;
        }
        let to = if down {
            if from + 1 >= len {
                return;
            }
            from + 1
        } else {
            let Some(to) = from.checked_sub(1) else {
                return;
            };
            to
        };
        self.board.move_or_reorder(kind, kind, from, to);
        self.scheduler.board_changed(self.board.has_pending());
        self.selected_task = to;
    }

    fn transfer_selected(&mut self) {
        let source = self.selected_list();
        let dest = match source {
            ListKind::Pending => ListKind::Done,
            ListKind::Done => ListKind::Pending,
        };
        if self.selected_task >= self.board.list(source).len() {
            return;
        }
        let end = self.board.list(dest).len();
        self.board
            .move_or_reorder(source, dest, self.selected_task, end);
        self.scheduler.board_changed(self.board.has_pending());
        self.clamp_selection();
    }

    fn change_interval(&mut self, raw: f64) {
        let effective = self.scheduler.set_interval(raw);
        self.config.reminder_interval_minutes = effective;
        if let Some(dir) = &self.data_dir {
            if let Err(e) = self.config.save(dir) {
                warn!("cannot save config: {e}");
            }
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(3), Constraint::Length(3)])
                .split(f.area());
            let panels = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[0]);

            for (i, kind) in PANELS.iter().enumerate() {
                let tasks = app.board.list(*kind);
                let items: Vec<ListItem> = tasks
                    .iter()
                    .enumerate()
                    .map(|(j, t)| {
                        let style = if app.selected_panel == i && app.selected_task == j {
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::White)
                        };
                        ListItem::new(Line::from(Span::styled(&t.description, style)))
                    })
                    .collect();

                let title = match kind {
                    ListKind::Pending => format!("Pending ({})", tasks.len()),
                    ListKind::Done => format!("Done ({})", tasks.len()),
                };
                let list = List::new(items).block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .border_style(if app.selected_panel == i {
                            Style::default().fg(Color::Cyan)
                        } else {
                            Style::default()
                        }),
                );
                f.render_widget(list, panels[i]);
            }

            let status = Line::from(vec![
                Span::raw(format!(
                    "{} | reminders every {}m | ",
                    Local::now().format("%H:%M"),
                    app.scheduler.interval_minutes()
                )),
                Span::styled(
                    app.scheduler.last_message().unwrap_or("no notifications yet"),
                    Style::default().fg(Color::Green),
                ),
            ]);
            let help = "a add | e edit | d delete | Enter move | J/K reorder | n interval | q quit";
            let bar = Paragraph::new(vec![status, Line::from(Span::raw(help))])
                .block(Block::default().borders(Borders::TOP));
            f.render_widget(bar, rows[1]);
        })?;

        // Short poll timeout so the reminder deadline is checked even while
        // the keyboard is idle.
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('a') => {
                        if let Some(description) = prompt("Enter task description") {
                            app.add_task(&description);
                        }
                    }
                    KeyCode::Char('e') => {
                        if let Some(description) = prompt("Enter the updated task description") {
                            app.edit_selected(&description);
                        }
                    }
                    KeyCode::Char('d') => app.delete_selected(),
                    KeyCode::Char('n') => {
                        if let Some(input) = prompt("Reminder interval in minutes") {
                            // Non-numeric input leaves the interval unchanged.
                            if let Ok(raw) = input.parse::<f64>() {
                                app.change_interval(raw);
                            }
                        }
                    }
                    KeyCode::Left => {
                        if app.selected_panel > 0 {
                            app.selected_panel -= 1;
                            app.clamp_selection();
                        }
                    }
                    KeyCode::Right => {
                        if app.selected_panel < PANELS.len() - 1 {
                            app.selected_panel += 1;
                            app.clamp_selection();
                        }
                    }
                    KeyCode::Up => {
                        if app.selected_task > 0 {
                            app.selected_task -= 1;
                        }
                    }
                    KeyCode::Down => {
                        let len = app.board.list(app.selected_list()).len();
                        if len > 0 && app.selected_task < len - 1 {
                            app.selected_task += 1;
                        }
                    }
                    KeyCode::Char('K') => app.reorder_selected(false),
                    KeyCode::Char('J') => app.reorder_selected(true),
                    KeyCode::Enter => app.transfer_selected(),
                    _ => {}
                }
            }
        }

        app.scheduler.poll(app.board.has_pending());
    }
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        enable_raw_mode().ok();
        Some(input.trim().to_string())
    } else {
        enable_raw_mode().ok();
        None
    }
}
