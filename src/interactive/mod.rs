//! Debounced interactive search over a world snapshot.
//!
//! The loop polls input at a fixed tick. Edits mark the query dirty and reset
//! a tick counter; once enough quiet ticks pass the query is parsed, compiled
//! and evaluated synchronously in the loop. Enter searches immediately.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers, poll},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub mod ui;

use self::ui::components::{
    Component,
    result_list::{ResultList, Row},
    search_bar::SearchBar,
};
use self::ui::events::Message;
use crate::query::{compile_query, parse_query};
use crate::search::SearchEngine;
use crate::settings::Settings;
use crate::world::{GameState, JumpTarget};

/// Quiet ticks required after the last edit before a search fires.
const TICKS_BEFORE_SEARCH: u32 = 40;
/// Input poll interval; one tick of the debounce counter when idle.
const TICK: Duration = Duration::from_millis(16);

pub struct InteractiveSearch {
    state: GameState,
    engine: SearchEngine,
    search_bar: SearchBar,
    result_list: ResultList,
    query: String,
    query_dirty: bool,
    ticks_since_edit: u32,
    include_world: bool,
    status: String,
    last_ctrl_c_press: Option<Instant>,
}

impl InteractiveSearch {
    pub fn new(state: GameState, settings: &Settings, include_world: bool) -> Self {
        let query = settings.default_search_term.clone();
        let mut search_bar = SearchBar::new();
        search_bar.set_query(query.clone());

        Self {
            state,
            engine: SearchEngine::new(),
            search_bar,
            result_list: ResultList::new(),
            query,
            query_dirty: true,
            // Let the seeded default term search on the first tick.
            ticks_since_edit: TICKS_BEFORE_SEARCH,
            include_world,
            status: String::new(),
            last_ctrl_c_press: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = self.setup_terminal()?;
        let result = self.run_app(&mut terminal);
        self.cleanup_terminal(&mut terminal)?;
        result
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn cleanup_terminal(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn run_app(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            self.tick_debounce();

            if poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    let should_quit = self.handle_input(key)?;
                    if should_quit {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// One debounce step; fires a search once the quiet period has elapsed.
    fn tick_debounce(&mut self) -> bool {
        if !self.query_dirty {
            return false;
        }
        self.ticks_since_edit += 1;
        if self.ticks_since_edit < TICKS_BEFORE_SEARCH {
            return false;
        }
        self.query_dirty = false;
        self.execute_search();
        true
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.search_bar.render(f, chunks[0]);
        self.result_list.render(f, chunks[1]);

        let status = Paragraph::new(Line::from(self.status.clone()))
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(status, chunks[2]);
    }

    fn handle_input(&mut self, key: KeyEvent) -> Result<bool> {
        // Double Ctrl+C to exit.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            if let Some(last_press) = self.last_ctrl_c_press {
                if last_press.elapsed() < Duration::from_secs(1) {
                    return Ok(true);
                }
            }
            self.last_ctrl_c_press = Some(Instant::now());
            self.status = "Press Ctrl+C again to exit".to_string();
            return Ok(false);
        }

        if key.code == KeyCode::Esc {
            return Ok(true);
        }

        let message = match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Home | KeyCode::End => {
                self.result_list.handle_key(key)
            }
            // Enter while an edit is pending bypasses the debounce; otherwise
            // it acts on the selected result.
            KeyCode::Enter if self.query_dirty => Some(Message::SearchRequested),
            KeyCode::Enter => self.result_list.handle_key(key),
            _ => self.search_bar.handle_key(key),
        };

        if let Some(msg) = message {
            self.handle_message(msg);
        }

        Ok(false)
    }

    fn handle_message(&mut self, message: Message) {
        match message {
            Message::QueryChanged(query) => {
                self.query = query;
                self.query_dirty = true;
                self.ticks_since_edit = 0;
                self.search_bar.set_message(Some("typing...".to_string()));
            }
            Message::SearchRequested => {
                self.query_dirty = false;
                self.execute_search();
            }
            Message::JumpToSelected => {
                self.jump_to_selected();
            }
        }
    }

    fn execute_search(&mut self) {
        let mut query = parse_query(&self.query);
        if self.include_world {
            query.world_map = true;
        }
        let compiled = compile_query(&query);

        let started = Instant::now();
        let results = self.engine.evaluate(&compiled, &self.state);
        let elapsed = started.elapsed();

        self.status = format!(
            "{} pawns, {} things, {} world locations ({elapsed:.1?})",
            results.pawns.len(),
            results.things.len(),
            results.world_objects.len(),
        );
        self.search_bar.set_message(None);
        self.result_list.set_results(&results, &self.state);
    }

    /// The go-to action: make the entity's map the current one and report the
    /// focus target. A real rendering host would also move the camera and
    /// select the entity; here the status line stands in for both.
    fn jump_to_selected(&mut self) {
        let Some(row) = self.result_list.selected_row().cloned() else {
            return;
        };

        let target = match row {
            Row::Pawn(id) | Row::Thing(id) => self.state.jump_target_for_thing(id),
            Row::WorldObject(id) => self.state.jump_target_for_world_object(id),
            Row::Section(_) => None,
        };

        match target {
            Some(JumpTarget::MapCell { map, cell }) => {
                self.state.current_map = Some(map);
                let name = self
                    .state
                    .map(map)
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                self.status = format!("Jumped to ({}, {}) on {name}", cell.x, cell.z);
            }
            Some(JumpTarget::WorldTile { tile }) => {
                self.status = format!("Jumped to world tile {tile}");
            }
            None => {}
        }
    }
}
