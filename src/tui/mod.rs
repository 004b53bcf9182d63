//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
};
use std::io::{stdout, Stdout};
use tracing::warn;

use crate::exercises::{next_accessory, ACCESSORY_SLOTS};
use crate::program::PROGRAM_WEEKS;
use crate::session::{self, NoticeKind, WorkoutSession};
use crate::store::InitialField;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Step for editing initial values, in kg or percent
const INITIAL_STEP: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Program,
    InitialValues,
}

/// App state for TUI
pub struct App {
    session: WorkoutSession,
    view: View,
    day: usize,
    row: usize,
    should_quit: bool,
}

impl App {
    pub fn new(session: WorkoutSession) -> Self {
        Self {
            session,
            view: View::Program,
            day: 0,
            row: 0,
            should_quit: false,
        }
    }

    /// Run the TUI application. The terminal is restored however the loop ends.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal()?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Apply one key press. A rejected edit becomes an error notice.
    pub fn handle_key(&mut self, code: KeyCode) {
        if let Err(e) = self.apply_key(code) {
            warn!("Key {:?} rejected: {}", code, e);
            self.session.report_error(e.to_string());
        }
    }

    fn apply_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('i') => {
                self.view = match self.view {
                    View::Program => View::InitialValues,
                    View::InitialValues => View::Program,
                };
                self.row = 0;
            }
            KeyCode::Char('s') => self.session.save(),
            KeyCode::Char('r') => {
                self.session.refresh();
                self.clamp_selection();
            }
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => {
                if self.row + 1 < self.row_count() {
                    self.row += 1;
                }
            }
            _ => match self.view {
                View::Program => self.handle_program_key(code)?,
                View::InitialValues => self.handle_initial_key(code)?,
            },
        }
        Ok(())
    }

    fn handle_program_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Left | KeyCode::Char('p') => {
                self.session.change_week(session::Direction::Previous)?;
            }
            KeyCode::Right | KeyCode::Char('n') => {
                self.session.change_week(session::Direction::Next)?;
            }
            KeyCode::Tab => {
                let days = self.session.document().workout_days.len();
                if days > 0 {
                    self.day = (self.day + 1) % days;
                    self.row = 0;
                }
            }
            KeyCode::BackTab => {
                let days = self.session.document().workout_days.len();
                if days > 0 {
                    self.day = (self.day + days - 1) % days;
                    self.row = 0;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.bump_achieved_reps(1.0)?,
            KeyCode::Char('-') => self.bump_achieved_reps(-1.0)?,
            KeyCode::Char(c @ '1'..='3') => {
                let slot = c as usize - '1' as usize;
                if slot < ACCESSORY_SLOTS {
                    let next = next_accessory(self.session.accessory(slot));
                    self.session.select_accessory(slot, next)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_initial_key(&mut self, code: KeyCode) -> Result<()> {
        let (field, delta) = match code {
            KeyCode::Char('+') | KeyCode::Char('=') => (InitialField::MaxWeight, INITIAL_STEP),
            KeyCode::Char('-') => (InitialField::MaxWeight, -INITIAL_STEP),
            KeyCode::Char(']') => (InitialField::SingleAt8Percentage, INITIAL_STEP),
            KeyCode::Char('[') => (InitialField::SingleAt8Percentage, -INITIAL_STEP),
            _ => return Ok(()),
        };
        let Some(initial) = self.session.document().initial_weights.get(self.row) else {
            return Ok(());
        };
        let current = match field {
            InitialField::MaxWeight => initial.max_weight,
            InitialField::SingleAt8Percentage => initial.single_at8_percentage,
        };
        self.session
            .set_initial_weight(self.row, field, (current + delta).max(0.0))
    }

    fn bump_achieved_reps(&mut self, delta: f64) -> Result<()> {
        let Some(exercise) = self
            .session
            .document()
            .workout_days
            .get(self.day)
            .and_then(|d| d.exercises.get(self.row))
        else {
            return Ok(());
        };
        let reps = (exercise.achieved_reps + delta).max(0.0);
        self.session.record_achieved_reps(self.day, self.row, reps)
    }

    fn row_count(&self) -> usize {
        let doc = self.session.document();
        match self.view {
            View::Program => doc.workout_days.get(self.day).map_or(0, |d| d.exercises.len()),
            View::InitialValues => doc.initial_weights.len(),
        }
    }

    fn clamp_selection(&mut self) {
        let days = self.session.document().workout_days.len();
        if self.day >= days {
            self.day = 0;
        }
        self.row = self.row.min(self.row_count().saturating_sub(1));
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let week = self.session.week();
        let title = match self.view {
            View::Program => format!("21-Week Workout Program - Week {}/{}", week, PROGRAM_WEEKS),
            View::InitialValues => "21-Week Workout Program - Initial Values".to_string(),
        };
        let header = Paragraph::new(title)
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        match self.view {
            View::Program => self.render_program(frame, chunks[1], chunks[2]),
            View::InitialValues => self.render_initial(frame, chunks[1], chunks[2]),
        }

        let (text, color) = match self.session.notice() {
            Some(n) if n.kind == NoticeKind::Error => (n.message.clone(), Color::Red),
            Some(n) => (n.message.clone(), Color::Green),
            None => (self.help_line().to_string(), Color::DarkGray),
        };
        let footer = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[3]);
    }

    fn render_program(&self, frame: &mut Frame, main: Rect, extra: Rect) {
        let doc = self.session.document();

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(main);

        let tabs = Tabs::new(doc.workout_days.iter().map(|d| d.name.clone()))
            .select(self.day)
            .highlight_style(Style::default().fg(Color::Yellow).bold())
            .block(Block::default().borders(Borders::ALL).title("Days"));
        frame.render_widget(tabs, parts[0]);

        let rows: Vec<Row> = doc
            .workout_days
            .get(self.day)
            .map(|day| {
                day.exercises
                    .iter()
                    .map(|e| {
                        Row::new(vec![
                            Cell::from(e.name.clone()),
                            Cell::from(format!("{}", e.current_weight)),
                            Cell::from(e.normal_set_reps.to_string()),
                            Cell::from(e.last_set_reps.to_string()),
                            Cell::from(e.achieved_reps.to_string()),
                            Cell::from(e.set_goal.to_string()),
                        ])
                    })
                    .collect()
            })
            .unwrap_or_default();

        let table = Table::new(
            rows,
            [
                Constraint::Min(18),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(8),
            ],
        )
        .header(
            Row::new(vec!["Exercise", "Weight (kg)", "Reps", "Last set", "Achieved", "Goal"])
                .style(Style::default().bold()),
        )
        .row_highlight_style(Style::default().reversed())
        .block(Block::default().borders(Borders::ALL).title("Exercises"));

        let mut state = TableState::default().with_selected(Some(self.row));
        frame.render_stateful_widget(table, parts[1], &mut state);

        let accessories: Vec<String> = (0..ACCESSORY_SLOTS)
            .map(|slot| format!("{}: {}", slot + 1, self.session.accessory(slot)))
            .collect();
        let accessory = Paragraph::new(accessories.join("   "))
            .block(Block::default().borders(Borders::ALL).title("Accessory Work"));
        frame.render_widget(accessory, extra);
    }

    fn render_initial(&self, frame: &mut Frame, main: Rect, extra: Rect) {
        let doc = self.session.document();

        let rows: Vec<Row> = doc
            .initial_weights
            .iter()
            .map(|v| {
                Row::new(vec![
                    Cell::from(v.name.clone()),
                    Cell::from(format!("{}", v.max_weight)),
                    Cell::from(format!("{}", v.single_at8_percentage)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Min(18), Constraint::Length(16), Constraint::Length(22)],
        )
        .header(
            Row::new(vec!["Exercise", "Max Weight (kg)", "Single @8 Percentage"])
                .style(Style::default().bold()),
        )
        .row_highlight_style(Style::default().reversed())
        .block(Block::default().borders(Borders::ALL).title("Initial Values"));

        let mut state = TableState::default().with_selected(Some(self.row));
        frame.render_stateful_widget(table, main, &mut state);

        let hint = Paragraph::new("+/-: max weight | [ ]: single @8 %")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(hint, extra);
    }

    fn help_line(&self) -> &'static str {
        match self.view {
            View::Program => "q: quit | ←/→: week | tab: day | +/-: reps | 1-3: accessory | s: save | r: refresh | i: initial values",
            View::InitialValues => "q: quit | ↑/↓: select | s: save | r: refresh | i: program",
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    // A new key press dismisses the last notice
                    self.session.take_notice();
                    self.handle_key(key.code);
                }
        Ok(())
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
