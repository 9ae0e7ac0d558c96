//! Main TUI application state and logic

use super::panes::{self, ListScroll, StatusRenderData};
use crate::parser::ast::Program;
use crate::parser::errors::Diagnostic;
use crate::parser::lexer::Token;
use crate::parser::outline::{self, OutlineRow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use rustc_hash::FxHashMap;
use std::io;
use std::time::Duration;

/// Rows moved by PageUp / PageDown
const PAGE_STEP: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tree,
    Tokens,
    Diagnostics,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> tree -> tokens -> diagnostics)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Tree => FocusedPane::Source,
            FocusedPane::Tokens => FocusedPane::Tree,
            FocusedPane::Diagnostics => FocusedPane::Tokens,
        }
    }
}

/// The main application state
pub struct App {
    /// The Lua source being explored
    pub source_code: String,

    pub tokens: Vec<Token>,
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,

    /// Flattened syntax tree shown in the tree pane
    pub rows: Vec<OutlineRow>,

    /// Line number -> indices into `diagnostics`
    pub diagnostics_by_line: FxHashMap<usize, Vec<usize>>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Cursor line of the source pane (1-based)
    pub source_line: usize,
    pub source_scroll: usize,

    /// Per-pane selection
    pub tree_scroll: ListScroll,
    pub token_scroll: ListScroll,
    pub diagnostic_scroll: ListScroll,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app over the results of one parse
    pub fn new(
        source_code: String,
        tokens: Vec<Token>,
        program: Program,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let rows = outline::outline(&program);

        let mut diagnostics_by_line: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for (idx, diagnostic) in diagnostics.iter().enumerate() {
            diagnostics_by_line
                .entry(diagnostic.line())
                .or_default()
                .push(idx);
        }

        let status_message = if diagnostics.is_empty() {
            String::from("Parsed without errors")
        } else {
            format!("First error: {}", diagnostics[0].message)
        };

        App {
            source_code,
            tokens,
            program,
            diagnostics,
            rows,
            diagnostics_by_line,
            focused_pane: FocusedPane::Source,
            source_line: 1,
            source_scroll: 0,
            tree_scroll: ListScroll::default(),
            token_scroll: ListScroll::default(),
            diagnostic_scroll: ListScroll::default(),
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Source line of the selection in the focused pane (1-based, 0 if none)
    pub fn current_line(&self) -> usize {
        match self.focused_pane {
            FocusedPane::Source => self.source_line,
            FocusedPane::Tree => self
                .rows
                .get(self.tree_scroll.selected)
                .map_or(0, OutlineRow::line),
            FocusedPane::Tokens => self
                .tokens
                .get(self.token_scroll.selected)
                .map_or(0, Token::line),
            FocusedPane::Diagnostics => self
                .diagnostics
                .get(self.diagnostic_scroll.selected)
                .map_or(0, Diagnostic::line),
        }
    }

    fn source_line_count(&self) -> usize {
        self.source_code.lines().count().max(1)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Diagnostics (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Tree (top) | Tokens (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let current_line = self.current_line();

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            current_line,
            &self.diagnostics_by_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_diagnostics_pane(
            frame,
            left_rows[1],
            &self.diagnostics,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostic_scroll,
        );

        panes::render_tree_pane(
            frame,
            right_rows[0],
            &self.rows,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        panes::render_tokens_pane(
            frame,
            right_rows[1],
            &self.tokens,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.token_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                token_count: self.tokens.len(),
                statement_count: self.program.statements.len(),
                diagnostic_count: self.diagnostics.len(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => self.move_up(1),
            KeyCode::Down => self.move_down(1),
            KeyCode::PageUp => self.move_up(PAGE_STEP),
            KeyCode::PageDown => self.move_down(PAGE_STEP),
            KeyCode::Home => self.move_to_start(),
            KeyCode::End => self.move_to_end(),
            KeyCode::Char('n') => self.jump_to_diagnostic(true),
            KeyCode::Char('N') => self.jump_to_diagnostic(false),
            KeyCode::Enter => self.sync_to_current_line(),
            _ => {}
        }
    }

    fn move_up(&mut self, n: usize) {
        match self.focused_pane {
            FocusedPane::Source => {
                self.source_line = self.source_line.saturating_sub(n).max(1);
            }
            FocusedPane::Tree => self.tree_scroll.up(n),
            FocusedPane::Tokens => self.token_scroll.up(n),
            FocusedPane::Diagnostics => self.diagnostic_scroll.up(n),
        }
    }

    fn move_down(&mut self, n: usize) {
        match self.focused_pane {
            FocusedPane::Source => {
                self.source_line = self
                    .source_line
                    .saturating_add(n)
                    .min(self.source_line_count());
            }
            FocusedPane::Tree => self.tree_scroll.down(n, self.rows.len()),
            FocusedPane::Tokens => self.token_scroll.down(n, self.tokens.len()),
            FocusedPane::Diagnostics => self.diagnostic_scroll.down(n, self.diagnostics.len()),
        }
    }

    fn move_to_start(&mut self) {
        match self.focused_pane {
            FocusedPane::Source => self.source_line = 1,
            FocusedPane::Tree => self.tree_scroll.home(),
            FocusedPane::Tokens => self.token_scroll.home(),
            FocusedPane::Diagnostics => self.diagnostic_scroll.home(),
        }
    }

    fn move_to_end(&mut self) {
        match self.focused_pane {
            FocusedPane::Source => self.source_line = self.source_line_count(),
            FocusedPane::Tree => self.tree_scroll.end(self.rows.len()),
            FocusedPane::Tokens => self.token_scroll.end(self.tokens.len()),
            FocusedPane::Diagnostics => self.diagnostic_scroll.end(self.diagnostics.len()),
        }
    }

    /// Select the next (or previous) diagnostic, wrapping around, and focus
    /// the diagnostics pane.
    fn jump_to_diagnostic(&mut self, forward: bool) {
        let total = self.diagnostics.len();
        if total == 0 {
            self.status_message = "No diagnostics".to_string();
            return;
        }

        let selected = self.diagnostic_scroll.selected.min(total - 1);
        let idx = if self.focused_pane != FocusedPane::Diagnostics {
            selected
        } else if forward {
            (selected + 1) % total
        } else {
            (selected + total - 1) % total
        };

        self.focused_pane = FocusedPane::Diagnostics;
        self.diagnostic_scroll.selected = idx;
        self.status_message = format!(
            "Diagnostic {}/{}: {}",
            idx + 1,
            total,
            self.diagnostics[idx].message
        );
    }

    /// Point every pane at the line selected in the focused pane
    fn sync_to_current_line(&mut self) {
        let line = self.current_line();
        if line == 0 {
            return;
        }

        self.source_line = line.min(self.source_line_count());

        // Skip the root row, which always reports line 1
        if let Some(idx) = self.rows.iter().skip(1).position(|r| r.line() == line) {
            self.tree_scroll.selected = idx + 1;
        }
        if let Some(idx) = self.tokens.iter().position(|t| t.line() == line) {
            self.token_scroll.selected = idx;
        }
        if let Some(&idx) = self.diagnostics_by_line.get(&line).and_then(|v| v.first()) {
            self.diagnostic_scroll.selected = idx;
        }

        self.status_message = format!("Synced to line {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::TokenKind;
    use crate::parser::parse::Parser;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app_for(source: &str) -> App {
        let mut parser = Parser::new(source);
        let (program, _) = parser.parse();
        App::new(
            source.to_string(),
            parser.tokens().to_vec(),
            program,
            parser.diagnostics().to_vec(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app_for("x = 1");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Tree);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Diagnostics);
    }

    #[test]
    fn test_diagnostics_indexed_by_line() {
        let app = app_for("x = 1\ny = )\nz = @");
        assert_eq!(app.diagnostics.len(), 2);
        assert!(!app.diagnostics_by_line.contains_key(&1));
        assert_eq!(app.diagnostics_by_line.get(&2), Some(&vec![0]));
        assert_eq!(app.diagnostics_by_line.get(&3), Some(&vec![1]));
        assert!(app.status_message.starts_with("First error"));
    }

    #[test]
    fn test_next_diagnostic_wraps() {
        let mut app = app_for("y = )\nz = @");

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.focused_pane, FocusedPane::Diagnostics);
        assert_eq!(app.current_line(), 1);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.current_line(), 2);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.current_line(), 1);

        press(&mut app, KeyCode::Char('N'));
        assert_eq!(app.current_line(), 2);
    }

    #[test]
    fn test_no_diagnostics_message() {
        let mut app = app_for("x = 1");
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.status_message, "No diagnostics");
        assert_eq!(app.focused_pane, FocusedPane::Source);
    }

    #[test]
    fn test_source_cursor_is_clamped() {
        let mut app = app_for("a = 1\nb = 2\nc = 3");
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.source_line, 3);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.source_line, 1);
    }

    #[test]
    fn test_home_and_end_in_lists() {
        let mut app = app_for("a = 1\nb = 2\nc = 3");
        press(&mut app, KeyCode::End);
        assert_eq!(app.source_line, 3);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Tree);
        press(&mut app, KeyCode::End);
        assert_eq!(app.tree_scroll.selected, app.rows.len() - 1);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.tree_scroll.selected, 0);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::End);
        assert!(app.tokens[app.token_scroll.selected].is(TokenKind::Eof));
    }

    #[test]
    fn test_sync_selects_rows_on_line() {
        let mut app = app_for("a = 1\nb = 2");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.rows[app.tree_scroll.selected].label, "Assignment b");
        assert_eq!(app.tokens[app.token_scroll.selected].text, "b");
        assert_eq!(app.status_message, "Synced to line 2");
    }

    #[test]
    fn test_quit() {
        let mut app = app_for("");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_draws_every_pane() {
        let mut app = app_for("local t = { 1, 2 }\nprint(t)\nx = @");
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Source"));
        assert!(screen.contains("Syntax Tree"));
        assert!(screen.contains("Tokens"));
        assert!(screen.contains("Diagnostics (1)"));
    }
}
