//! Main TUI application state and logic
//!
//! The app never touches the driver while it runs. It keeps the latest
//! published [`RunState`] (pushed by a subscription), a replay cursor over
//! the recorded steps, and a [`RunControl`] for pacing and cancellation.

use crate::engine::{Driver, Result, RunControl, RunState, Subscription};
use crate::ui::scene::Scene;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Redraw interval while waiting on the run or the keyboard
const FRAME: Duration = Duration::from_millis(33);
/// Shortest pause between two autoplay steps
const MIN_PLAY_INTERVAL: Duration = Duration::from_millis(50);
const MAX_DELAY: Duration = Duration::from_secs(5);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Scene,
    Steps,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Scene => FocusedPane::Steps,
            FocusedPane::Steps => FocusedPane::Scene,
        }
    }
}

/// The main application state
pub struct App<V: Scene> {
    /// Latest state published by the driver
    state: Rc<RefCell<RunState<V>>>,
    subscription: Subscription,
    control: RunControl,

    /// Step being shown; `None` follows the newest step
    pub cursor: Option<usize>,

    pub focused_pane: FocusedPane,
    pub scene_scroll: usize,
    pub steps_scroll: usize,

    pub should_quit: bool,
    pub status_message: String,

    /// Whether autoplay is stepping through recorded history
    pub is_playing: bool,
    pub last_play_time: Instant,
    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl<V: Scene> App<V> {
    /// Subscribe to `driver`. The app stays attached until it is dropped.
    pub fn attach<D: Driver<Family = V>>(driver: &D) -> Self {
        let state = Rc::new(RefCell::new(driver.get_state()));
        let sink = Rc::clone(&state);
        let subscription = driver.subscribe(move |published| {
            sink.borrow_mut().sync_from(published);
        });

        App {
            state,
            subscription,
            control: driver.control(),
            cursor: None,
            focused_pane: FocusedPane::Scene,
            scene_scroll: 0,
            steps_scroll: 0,
            should_quit: false,
            status_message: String::from("Running..."),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Drive `work` and the UI together until the user quits.
    ///
    /// Returns the run's outcome, or `None` when the user quit before the run
    /// finished (the run is dropped at that point).
    pub async fn run<B, F, T>(
        &mut self,
        terminal: &mut Terminal<B>,
        work: F,
    ) -> io::Result<Option<Result<T>>>
    where
        B: Backend,
        F: Future<Output = Result<T>>,
    {
        tokio::pin!(work);
        let mut outcome = None;

        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing
                && self.last_play_time.elapsed() >= self.control.delay().max(MIN_PLAY_INTERVAL)
            {
                self.step_forward();
                if self.cursor.is_none() {
                    self.is_playing = false;
                    self.status_message = "Caught up with the run".to_string();
                }
                self.last_play_time = Instant::now();
            }

            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            // Give the run a slice of the frame until it finishes
            if outcome.is_none() {
                tokio::select! {
                    result = &mut work => {
                        self.status_message = match &result {
                            Ok(_) => "Run complete".to_string(),
                            Err(e) => e.to_string(),
                        };
                        outcome = Some(result);
                    }
                    _ = tokio::time::sleep(FRAME) => {}
                }
            } else {
                tokio::time::sleep(FRAME).await;
            }
        }

        Ok(outcome)
    }

    fn total_steps(&self) -> usize {
        self.state.borrow().log.len()
    }

    /// Step shown right now
    pub fn selected(&self) -> Option<usize> {
        self.cursor.or_else(|| self.state.borrow().log.current())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Split into 2 columns
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(pane_area);

        // Left column: Scene (top) | Step details (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let selected = self.selected();
        let state = self.state.borrow();
        let snapshot = selected
            .and_then(|id| state.log.get(id))
            .map(|step| step.snapshot.as_ref());

        super::panes::render_scene_pane::<V>(
            frame,
            left_rows[0],
            snapshot,
            self.focused_pane == FocusedPane::Scene,
            &mut self.scene_scroll,
        );

        super::panes::render_info_pane(frame, left_rows[1], &state, selected, false);

        super::panes::render_steps_pane(
            frame,
            columns[1],
            &state.log,
            selected,
            self.focused_pane == FocusedPane::Steps,
            &mut self.steps_scroll,
        );

        let message = if self.cursor.is_none() {
            state.message.as_str()
        } else {
            self.status_message.as_str()
        };
        super::panes::render_status_bar(
            frame,
            status_area,
            &super::panes::StatusRenderData {
                message,
                current_step: selected,
                total_steps: state.log.len(),
                is_live: self.cursor.is_none(),
                is_playing: self.is_playing,
                is_complete: state.is_complete,
                delay: self.control.delay(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                for _ in 0..n {
                    self.step_forward();
                }
                self.status_message = format!("Stepped forward {} step(s)", n);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Scene => self.scene_scroll = self.scene_scroll.saturating_sub(1),
                FocusedPane::Steps => self.steps_scroll = self.steps_scroll.saturating_sub(1),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Scene => self.scene_scroll = self.scene_scroll.saturating_add(1),
                FocusedPane::Steps => self.steps_scroll = self.steps_scroll.saturating_add(1),
            },
            KeyCode::Char(' ') => {
                // Toggle autoplay (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        if self.cursor.is_none() {
                            self.cursor = Some(0);
                        }
                        self.last_play_time = Instant::now();
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.cursor = None;
                self.status_message = "Following the run".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                if self.total_steps() > 0 {
                    self.cursor = Some(0);
                }
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let delay = self.control.delay() / 2;
                self.control.set_delay(delay);
                self.status_message = format!("Delay {}ms", delay.as_millis());
            }
            KeyCode::Char('-') => {
                let delay = (self.control.delay() * 2)
                    .max(Duration::from_millis(10))
                    .min(MAX_DELAY);
                self.control.set_delay(delay);
                self.status_message = format!("Delay {}ms", delay.as_millis());
            }
            KeyCode::Char('c') => {
                self.control.cancel();
                self.status_message = "Cancelling run".to_string();
            }
            _ => {}
        }
    }

    /// Move the cursor one step later; reaching the newest step resumes following
    fn step_forward(&mut self) {
        let Some(cursor) = self.cursor else {
            self.status_message = "Already at the newest step".to_string();
            return;
        };
        if cursor + 1 >= self.total_steps() {
            self.cursor = None;
        } else {
            self.cursor = Some(cursor + 1);
        }
        self.status_message = "Stepped forward".to_string();
    }

    fn step_backward(&mut self) {
        match self.selected() {
            Some(current) if current > 0 => {
                self.cursor = Some(current - 1);
                self.status_message = "Stepped backward".to_string();
            }
            Some(_) => {
                self.cursor = Some(0);
                self.status_message = "Cannot step backward: at the first step".to_string();
            }
            None => {
                self.status_message = "No steps recorded yet".to_string();
            }
        }
    }
}

impl<V: Scene> Drop for App<V> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
