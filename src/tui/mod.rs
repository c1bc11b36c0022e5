//! TUI interface: ratatui panels for the script editor and the cue view.
//!
//! The App struct holds all TUI state and drives the event loop.

pub mod cue_view;
pub mod editor;
pub mod keybindings;
pub mod layout;
pub mod status;

pub use cue_view::CueView;
pub use editor::Editor;
pub use keybindings::{map_key, Action};
pub use layout::AppMode;
pub use status::{SaveStatus, StatusInfo};

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::logging::SharedLog;
use crate::midi::NoteSink;
use crate::player::{Navigation, Player};
use crate::sequencer::Emission;
use crate::storage;

/// Debounce delay before autosaving after an edit (milliseconds).
const SAVE_DEBOUNCE_MS: u64 = 300;

/// The main TUI application state.
pub struct App {
    pub editor: Editor,
    pub status: StatusInfo,
    pub player: Player,
    pub log: SharedLog,
    pub log_visible: bool,
    pub should_quit: bool,
    script_path: Option<PathBuf>,
    autosave: bool,
    /// Editor revision last written to disk.
    saved_revision: u64,
    last_edit: Option<Instant>,
}

impl App {
    /// Create an App over `source` with no file and no MIDI output.
    pub fn new(source: &str) -> Self {
        Self {
            editor: Editor::new(source),
            status: StatusInfo::default(),
            player: Player::default(),
            log: SharedLog::default(),
            log_visible: false,
            should_quit: false,
            script_path: None,
            autosave: false,
            saved_revision: 0,
            last_edit: None,
        }
    }

    /// Send notes to `sink`.
    pub fn with_sink(mut self, sink: Box<dyn NoteSink>) -> Self {
        self.player = Player::new(Some(sink));
        self.status.output = self.player.sink_name().map(str::to_string);
        self
    }

    /// Save edits to `path`, automatically if `autosave` is set.
    pub fn with_script_path(mut self, path: impl Into<PathBuf>, autosave: bool) -> Self {
        self.script_path = Some(path.into());
        self.autosave = autosave;
        self.status.save = SaveStatus::Saved;
        self
    }

    /// Show records from this buffer in the log overlay.
    pub fn with_log(mut self, log: SharedLog) -> Self {
        self.log = log;
        self
    }

    pub fn mode(&self) -> AppMode {
        self.status.mode
    }

    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.revision() != self.saved_revision
    }

    /// Editor row of the note line that is sounding.
    pub fn playing_row(&self) -> Option<usize> {
        self.player
            .sequencer()
            .current_step()
            .and_then(|s| s.line().checked_sub(1))
    }

    /// Play the first step. Called once at start-up.
    pub fn start(&mut self) -> Emission {
        self.navigate(Navigation::Reset)
    }

    /// Process an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Advance => {
                self.navigate(Navigation::Advance);
            }
            Action::Retreat => {
                self.navigate(Navigation::Retreat);
            }
            Action::Reset => {
                self.navigate(Navigation::Reset);
            }
            Action::ToggleMode => self.status.mode = self.status.mode.toggle(),
            Action::ToggleLog => self.log_visible = !self.log_visible,
            Action::Save => self.save(),
            Action::EditorInsert(c) => {
                self.editor.insert_char(c);
                self.mark_dirty();
            }
            Action::EditorBackspace => {
                self.editor.backspace();
                self.mark_dirty();
            }
            Action::EditorDelete => {
                self.editor.delete();
                self.mark_dirty();
            }
            Action::EditorNewline => {
                self.editor.newline();
                self.mark_dirty();
            }
            Action::EditorLeft => self.editor.move_left(),
            Action::EditorRight => self.editor.move_right(),
            Action::EditorUp => self.editor.move_up(),
            Action::EditorDown => self.editor.move_down(),
            Action::EditorHome => self.editor.home(),
            Action::EditorEnd => self.editor.end(),
        }
    }

    fn navigate(&mut self, nav: Navigation) -> Emission {
        let text = self.editor.content();
        let emission = self.player.navigate(nav, &text);
        self.status.position = self.player.sequencer().current_index().map(|i| i + 1);
        self.status.diagnostics = self.player.diagnostic_count();
        emission
    }

    fn mark_dirty(&mut self) {
        self.last_edit = Some(Instant::now());
        if self.script_path.is_some() {
            self.status.save = SaveStatus::Modified;
        }
    }

    /// Autosave once the debounce period has passed since the last edit.
    pub fn tick(&mut self) {
        if !self.autosave || !self.is_dirty() {
            return;
        }
        if let Some(last) = self.last_edit {
            if last.elapsed() >= Duration::from_millis(SAVE_DEBOUNCE_MS) {
                self.save();
            }
        }
    }

    /// Write the editor content to the script path, if there is one.
    pub fn save(&mut self) {
        let Some(ref path) = self.script_path else {
            return;
        };
        match storage::save_script(path, &self.editor.content()) {
            Ok(()) => {
                log::info!("Notes saved to {}.", path.display());
                self.saved_revision = self.editor.revision();
                self.last_edit = None;
                self.status.save = SaveStatus::Saved;
            }
            Err(e) => {
                log::error!("Error saving notes: {e}");
                self.status.save = SaveStatus::Error(e.to_string());
            }
        }
    }

    /// Flush unsaved edits and release sounding notes.
    pub fn shutdown(&mut self) {
        if self.is_dirty() {
            self.save();
        }
        if let Err(e) = self.player.release() {
            log::error!("failed to release notes: {e}");
        }
    }

    /// Draw the UI.
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45), // Editor
                Constraint::Min(6),         // Cue view
                Constraint::Length(1),      // Status bar
            ])
            .split(size);

        self.draw_editor(frame, chunks[0]);
        self.draw_cues(frame, chunks[1]);
        self.draw_status(frame, chunks[2]);

        if self.log_visible {
            self.draw_log(frame, size);
        }
    }

    fn draw_editor(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.status.mode == AppMode::Edit;
        let title = match self.script_path {
            Some(ref p) => format!(" Script: {} ", p.display()),
            None => " Script ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            })
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.editor.set_viewport_height(inner.height as usize);
        let offset = self.editor.scroll_offset();
        let playing_row = self.playing_row();

        let lines: Vec<Line> = self
            .editor
            .lines()
            .iter()
            .enumerate()
            .skip(offset)
            .take(inner.height as usize)
            .map(|(row, l)| {
                let trimmed = l.trim();
                let style = if trimmed.is_empty() || trimmed.starts_with('#') {
                    Style::default().fg(Color::DarkGray)
                } else if playing_row == Some(row) {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(l.as_str(), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if focused {
            let (row, _) = self.editor.cursor();
            // Terminal cells, not chars: wide glyphs take two.
            let width = Span::raw(self.editor.before_cursor()).width();
            let col = u16::try_from(width).unwrap_or(u16::MAX);
            let row = u16::try_from(row.saturating_sub(offset)).unwrap_or(u16::MAX);
            if col < inner.width && row < inner.height {
                frame.set_cursor_position((inner.x + col, inner.y + row));
            }
        }
    }

    fn draw_cues(&self, frame: &mut Frame, area: Rect) {
        let view = CueView::from_sequencer(self.player.sequencer());
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let panel = |title: &'static str, text: String, style: Style| {
            Paragraph::new(text)
                .style(style)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(title))
        };

        frame.render_widget(
            panel(" Previous ", view.previous, Style::default().fg(Color::Gray)),
            rows[0],
        );
        frame.render_widget(
            panel(
                " Current ",
                view.current,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            rows[1],
        );
        frame.render_widget(
            panel(" Next ", view.next, Style::default().fg(Color::Gray)),
            rows[2],
        );
    }

    /// Short key reference for the current mode.
    pub fn context_hint(&self) -> &str {
        if self.log_visible {
            return "Esc/Ctrl-L:close log";
        }
        match self.status.mode {
            AppMode::Perform => "\u{2192}:next \u{2190}:back 0:reset Tab:edit Ctrl-L:log Esc:quit",
            AppMode::Edit => "Tab/Esc:perform PgUp/PgDn:back/next Ctrl-S:save Ctrl-Q:quit",
        }
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let total = self.player.sequencer().script().len();
        let output_style = if self.status.output.is_some() && self.player.last_send_error().is_none() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };
        let diag_style = if self.status.diagnostics == 0 {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.status.mode.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {} ", self.status.position_display(total))),
            Span::styled(format!(" {} ", self.status.output_display()), output_style),
            Span::styled(format!(" {} ", self.status.diagnostics_display()), diag_style),
        ];
        if self.status.diagnostics > 0 {
            if let Some(problem) = self.log.with(|b| b.last_problem().map(|e| e.message.clone())) {
                spans.push(Span::styled(format!("{problem} "), diag_style));
            }
        }
        spans.push(Span::raw(format!(" {} ", self.status.save_display())));
        spans.push(Span::styled(
            format!(" {} ", self.context_hint()),
            Style::default().fg(Color::DarkGray),
        ));
        let line = Line::from(spans);
        let paragraph =
            Paragraph::new(line).style(Style::default().bg(Color::Black).fg(Color::White));
        frame.render_widget(paragraph, area);
    }

    fn draw_log(&self, frame: &mut Frame, area: Rect) {
        let width = percent_of(area.width, 80).max(40).min(area.width);
        let height = percent_of(area.height, 60).max(8).min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let overlay = Rect::new(x, y, width, height);

        let block = Block::default()
            .style(Style::default().bg(Color::Black))
            .borders(Borders::ALL)
            .title(" Log: Ctrl-L or Esc to close ");
        let inner = block.inner(overlay);
        frame.render_widget(Clear, overlay);
        frame.render_widget(block, overlay);

        let lines: Vec<Line> = self.log.with(|buffer| {
            if buffer.is_empty() {
                return vec![Line::from("(nothing logged)")];
            }
            buffer
                .recent(inner.height as usize)
                .into_iter()
                .map(|entry| {
                    let elapsed = entry
                        .timestamp
                        .elapsed()
                        .map(|d| format!("{:.0}s ago", d.as_secs_f64()))
                        .unwrap_or_else(|_| "?".to_string());
                    let color = match entry.level {
                        log::Level::Error => Color::Red,
                        log::Level::Warn => Color::Yellow,
                        _ => Color::Gray,
                    };
                    Line::from(vec![
                        Span::styled(format!("[{elapsed}] "), Style::default().fg(Color::DarkGray)),
                        Span::styled(entry.message.clone(), Style::default().fg(color)),
                    ])
                })
                .collect()
        });
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Run the TUI event loop. Notes are released and edits saved on every
    /// exit, including terminal errors.
    pub fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> io::Result<()> {
        let result = self.event_loop(terminal);
        self.shutdown();
        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> io::Result<()> {
        while !self.should_quit {
            terminal
                .draw(|frame| self.draw(frame))
                .map_err(|e| io::Error::other(e.to_string()))?;

            if event::poll(Duration::from_millis(50))? {
                if let CrosstermEvent::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = map_key(key, self.status.mode, self.log_visible) {
                            self.handle_action(action);
                        }
                    }
                }
            }

            self.tick();
        }
        Ok(())
    }
}

/// `pct` percent of `len`, computed without overflowing `u16`.
fn percent_of(len: u16, pct: u32) -> u16 {
    u16::try_from(u32::from(len) * pct / 100).unwrap_or(len)
}
