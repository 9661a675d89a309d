//! TUI module - muscle picking, workout generation and the workout itself

mod render;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::api::{cancellable, ApiError, GenerateResponse, ResolverClient, ShuffleResponse};
use crate::config::Settings;
use crate::muscles::MuscleGroup;
use crate::plan::WorkoutPlan;
use crate::scaler::{parse_amount, scale, ScaledVector};
use crate::selector::MuscleSelector;
use crate::session::{self, Step, WorkoutSession};
use crate::table::ExerciseTable;

type Tui = Terminal<CrosstermBackend<Stdout>>;

const TABLE_FAILED: &str = "Failed to fetch exercises. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Select,
    Amount,
    Plan,
    Workout,
}

/// Result of a background request, tagged with the screen visit it belongs to
enum Reply {
    Generated(Result<GenerateResponse, ApiError>),
    Shuffled {
        index: usize,
        result: Result<ShuffleResponse, ApiError>,
    },
    Arranged(Result<WorkoutSession, ApiError>),
}

/// App state for TUI
pub struct App {
    client: ResolverClient,
    table: ExerciseTable,
    table_error: Option<String>,
    screen: Screen,
    selector: MuscleSelector,
    selected: usize,
    amount_input: String,
    amount_error: Option<String>,
    amount: u32,
    demand: ScaledVector,
    plan: WorkoutPlan,
    plan_cursor: usize,
    session: Option<WorkoutSession>,
    loading: bool,
    /// Cancelled whenever the current screen is left
    token: CancellationToken,
    visit: u64,
    tx: UnboundedSender<(u64, Reply)>,
    rx: UnboundedReceiver<(u64, Reply)>,
    should_quit: bool,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        let (table, table_error) = match settings.load_table() {
            Ok(table) => (table, None),
            Err(e) => {
                error!("Error fetching exercises: {:#}", e);
                (ExerciseTable::default(), Some(TABLE_FAILED.to_string()))
            }
        };
        let (tx, rx) = unbounded_channel();

        Self {
            client: settings.client(),
            table,
            table_error,
            screen: Screen::Select,
            selector: MuscleSelector::new(),
            selected: 0,
            amount_input: "1".to_string(),
            amount_error: None,
            amount: 1,
            demand: ScaledVector::default(),
            plan: WorkoutPlan::new(),
            plan_cursor: 0,
            session: None,
            loading: false,
            token: CancellationToken::new(),
            visit: 0,
            tx,
            rx,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal()?;
        self.token.cancel();
        result
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            while let Ok((visit, reply)) = self.rx.try_recv() {
                self.handle_reply(visit, reply);
            }
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Switch screens; requests still running for the old screen are cancelled
    fn go(&mut self, screen: Screen) {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.visit += 1;
        self.loading = false;
        self.screen = screen;
        debug!("Screen -> {:?}", screen);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::Select => self.select_key(key.code),
            Screen::Amount => self.amount_key(key.code),
            Screen::Plan => self.plan_key(key.code),
            Screen::Workout => self.workout_key(key.code),
        }
    }

    fn select_key(&mut self, code: KeyCode) {
        let count = MuscleGroup::all().len();
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(group) = MuscleGroup::from_index(self.selected) {
                    self.selector.pick_group(group);
                }
            }
            KeyCode::Char('r') => self.selector.reset(),
            KeyCode::Char('s') | KeyCode::Tab => self.go(Screen::Amount),
            _ => {}
        }
    }

    fn amount_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.amount_input.push(c);
                self.amount_error = None;
            }
            KeyCode::Backspace => {
                self.amount_input.pop();
            }
            KeyCode::Enter => match parse_amount(&self.amount_input) {
                Ok(amount) => {
                    self.amount = amount;
                    self.demand = scale(&self.selector.vector(), amount);
                    debug!("Scaled {:?} -> {:?}", self.selector.vector(), self.demand);
                    self.plan = WorkoutPlan::new();
                    if let Some(message) = &self.table_error {
                        self.plan.set_error(message.clone());
                    }
                    self.plan_cursor = 0;
                    self.go(Screen::Plan);
                }
                Err(e) => self.amount_error = Some(e.to_string()),
            },
            KeyCode::Esc => self.go(Screen::Select),
            _ => {}
        }
    }

    fn plan_key(&mut self, code: KeyCode) {
        let count = self.plan.names().len();
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') if count > 0 => {
                self.plan_cursor = (self.plan_cursor + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                self.plan_cursor = (self.plan_cursor + 1) % count;
            }
            KeyCode::Char('g') if !self.plan.is_generated() && !self.loading => {
                self.spawn_generate();
            }
            KeyCode::Char('x') if count > 0 && !self.loading => {
                self.spawn_shuffle(self.plan_cursor);
            }
            KeyCode::Char('n') | KeyCode::Enter if self.plan.is_generated() && !self.loading => {
                self.go(Screen::Workout);
                self.spawn_arrange();
            }
            KeyCode::Esc => self.go(Screen::Amount),
            _ => {}
        }
    }

    fn workout_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => {
                if let Some(session) = &mut self.session {
                    session.previous();
                }
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => {
                if let Some(session) = &mut self.session
                    && session.next() == Step::Finished
                {
                    self.finish_workout();
                }
            }
            KeyCode::Esc => {
                self.session = None;
                self.go(Screen::Plan);
            }
            _ => {}
        }
    }

    /// Back to a fresh selection
    fn finish_workout(&mut self) {
        self.session = None;
        self.selector.reset();
        self.selected = 0;
        self.amount_input = "1".to_string();
        self.plan = WorkoutPlan::new();
        self.go(Screen::Select);
    }

    fn spawn_generate(&mut self) {
        self.loading = true;
        let client = self.client.clone();
        let token = self.token.clone();
        let tx = self.tx.clone();
        let visit = self.visit;
        let demand = self.demand;
        let amount = self.amount;

        tokio::spawn(async move {
            let result = cancellable(&token, client.generate(&demand, amount)).await;
            let _ = tx.send((visit, Reply::Generated(result)));
        });
    }

    fn spawn_shuffle(&mut self, index: usize) {
        let name = match self.plan.shuffle_target(index) {
            Ok(name) => name.to_string(),
            Err(e) => {
                self.plan.set_error(e.to_string());
                return;
            }
        };
        self.loading = true;
        let client = self.client.clone();
        let token = self.token.clone();
        let tx = self.tx.clone();
        let visit = self.visit;
        let matrix = self.plan.matrix().clone();

        tokio::spawn(async move {
            let result = cancellable(&token, client.shuffle(index, &matrix, &name)).await;
            let _ = tx.send((visit, Reply::Shuffled { index, result }));
        });
    }

    fn spawn_arrange(&mut self) {
        self.loading = true;
        self.session = None;
        let client = self.client.clone();
        let token = self.token.clone();
        let tx = self.tx.clone();
        let visit = self.visit;
        let matrix = self.plan.matrix().clone();

        tokio::spawn(async move {
            let result = session::arrange(&client, &matrix, &token).await;
            let _ = tx.send((visit, Reply::Arranged(result)));
        });
    }

    fn handle_reply(&mut self, visit: u64, reply: Reply) {
        if visit != self.visit {
            debug!("Dropping reply for a screen that was left");
            return;
        }
        self.loading = false;

        match reply {
            Reply::Generated(Ok(response)) => {
                self.plan.apply_generated(response, &self.table);
                self.plan_cursor = 0;
            }
            Reply::Generated(Err(ApiError::Cancelled)) => {}
            Reply::Generated(Err(e)) => self.plan.generate_failed(&e),
            Reply::Shuffled { index, result: Ok(response) } => {
                self.plan.apply_shuffle(index, response);
            }
            Reply::Shuffled { result: Err(ApiError::Cancelled), .. } => {}
            Reply::Shuffled { result: Err(e), .. } => self.plan.shuffle_failed(&e),
            Reply::Arranged(Ok(session)) => self.session = Some(session),
            Reply::Arranged(Err(_)) => {}
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let settings = Settings::new(
            "http://127.0.0.1:9",
            concat!(env!("CARGO_MANIFEST_DIR"), "/data/qmatrix.csv"),
        );
        App::new(&settings)
    }

    #[test]
    fn test_select_and_submit_amount() {
        let mut app = app();
        app.select_key(KeyCode::Down);
        app.select_key(KeyCode::Char(' '));
        app.select_key(KeyCode::Char(' '));
        assert_eq!(app.selector.clicks(MuscleGroup::Abs), 2);

        app.select_key(KeyCode::Char('s'));
        assert_eq!(app.screen, Screen::Amount);

        app.amount_key(KeyCode::Backspace);
        app.amount_key(KeyCode::Char('5'));
        app.amount_key(KeyCode::Enter);
        assert_eq!(app.screen, Screen::Plan);
        assert_eq!(app.amount, 5);
        assert_eq!(app.demand.values()[MuscleGroup::Abs.index()], 2);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut app = app();
        app.go(Screen::Amount);
        app.amount_key(KeyCode::Backspace);
        app.amount_key(KeyCode::Char('0'));
        app.amount_key(KeyCode::Enter);
        assert_eq!(app.screen, Screen::Amount);
        assert!(app.amount_error.is_some());
    }

    #[test]
    fn test_missing_table_surfaces_error() {
        let mut app = App::new(&Settings::new("http://127.0.0.1:9", "/nonexistent/table.csv"));
        app.go(Screen::Amount);
        app.amount_key(KeyCode::Enter);
        assert_eq!(app.plan.error(), Some(TABLE_FAILED));
    }

    #[test]
    fn test_stale_reply_is_dropped() {
        let mut app = app();
        app.go(Screen::Plan);
        let stale = app.visit;
        app.go(Screen::Amount);
        app.handle_reply(stale, Reply::Generated(Ok(GenerateResponse {
            pairs: Some(vec![(0, 0)]),
            ..Default::default()
        })));
        assert!(app.plan.names().is_empty());
    }

    #[test]
    fn test_generated_reply_fills_plan() {
        let mut app = app();
        app.go(Screen::Plan);
        app.handle_reply(app.visit, Reply::Generated(Ok(GenerateResponse {
            pairs: Some(vec![(1, 0), (0, 0)]),
            ..Default::default()
        })));
        assert_eq!(app.plan.names(), &["Push Up", "Bench Press"]);
    }

    #[test]
    fn test_finishing_workout_returns_to_fresh_selection() {
        let mut app = app();
        app.selector.pick_group(MuscleGroup::Chest);
        app.go(Screen::Workout);
        app.session = Some(WorkoutSession::new(vec![0]));
        app.workout_key(KeyCode::Right);
        assert_eq!(app.screen, Screen::Select);
        assert!(app.selector.vector().is_empty());
        assert!(app.session.is_none());
    }
}
