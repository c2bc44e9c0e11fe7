//! Application loop for the browser TUI.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::actions::{ActionRegistry, ActionStatus};
use crate::app::context::{ActionContext, FileContext, SurfaceId};
use crate::app::selection::{Ambient, SelectionModel};
use crate::domain::model::OperationTracker;
use crate::domain::project::Project;
use crate::infra::config::Config;
use crate::ui::components::action_panel::{ActionPanel, AmbientSummary};
use crate::ui::components::project_tree::{ProjectTree, ProjectTreeState};

/// Interactive browser over one project: tree on the left, live action
/// enablement on the right. A fresh selection context is built for every
/// evaluation cycle and discarded afterwards.
pub struct BrowserApp {
    config: Config,
    project: Project,
    tracker: OperationTracker,
    selection: SelectionModel,
    tree: ProjectTreeState,
    tree_component: ProjectTree,
    action_panel: ActionPanel,
    registry: ActionRegistry,
    statuses: Vec<ActionStatus>,
    in_active_project: bool,
    transient: bool,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl BrowserApp {
    pub fn new(project: Project, config: Config, in_active_project: bool, transient: bool) -> Self {
        let tree = ProjectTreeState::from_project(
            &project,
            config.browser.expand_depth,
            config.browser.show_files,
        );
        let mut app = Self {
            config,
            project,
            tracker: OperationTracker::new(),
            selection: SelectionModel::new(),
            tree,
            tree_component: ProjectTree,
            action_panel: ActionPanel,
            registry: ActionRegistry::with_builtin(),
            statuses: Vec::new(),
            in_active_project,
            transient,
            status: None,
            should_quit: false,
        };
        app.refresh_enablement();
        app
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        event_loop_result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let tick_rate = self.config.browser.tick_rate();
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.tick();

            if self.should_quit {
                break;
            }

            if event::poll(tick_rate)? {
                let ev = event::read()?;
                self.handle_event(ev)?;
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(size);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(32), Constraint::Length(40)])
            .split(layout[0]);

        self.tree_component
            .render(frame, main_chunks[0], &self.tree, &self.selection, true);

        let ambient = AmbientSummary {
            project_name: self.project.name().to_string(),
            read_only: !self.project.is_writable(),
            active: self.in_active_project,
            transient: self.transient,
            busy: self.tracker.is_busy(),
            folder_count: self.selection.folder_count(),
            file_count: self.selection.file_count(),
        };
        self.action_panel
            .render(frame, main_chunks[1], &self.statuses, &ambient);

        self.render_status(frame, layout[1]);
    }

    fn render_status(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let line = match &self.status {
            Some(status) => Line::styled(
                status.text.clone(),
                Style::default().fg(match status.level {
                    StatusLevel::Info => Color::Gray,
                    StatusLevel::Success => Color::Green,
                }),
            ),
            None => Line::from(vec![
                Span::styled("space", Style::default().fg(Color::Cyan)),
                Span::raw(" select · "),
                Span::styled("h/l", Style::default().fg(Color::Cyan)),
                Span::raw(" fold · "),
                Span::styled("b", Style::default().fg(Color::Cyan)),
                Span::raw(" busy · "),
                Span::styled("t", Style::default().fg(Color::Cyan)),
                Span::raw(" transient · "),
                Span::styled("a", Style::default().fg(Color::Cyan)),
                Span::raw(" active · "),
                Span::styled("q", Style::default().fg(Color::Cyan)),
                Span::raw(" quit"),
            ]),
        };
        frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), inner);
    }

    fn tick(&mut self) {
        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            self.handle_key_event(key)?;
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.tree.select_next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.tree.select_previous();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.tree.collapse_or_parent(&self.project);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.tree.expand_current(&self.project);
            }
            KeyCode::Char(' ') => {
                self.toggle_current_selection();
                self.refresh_enablement();
            }
            KeyCode::Char('c') => {
                self.selection.clear();
                self.set_status(StatusLevel::Info, "Selection cleared");
                self.refresh_enablement();
            }
            KeyCode::Char('b') => {
                let busy = !self.tracker.is_busy();
                self.tracker.set_busy(busy);
                self.set_status(
                    StatusLevel::Info,
                    if busy {
                        "Operation started"
                    } else {
                        "Operation finished"
                    },
                );
                self.refresh_enablement();
            }
            KeyCode::Char('t') => {
                self.transient = !self.transient;
                self.set_status(
                    StatusLevel::Info,
                    format!("Transient: {}", self.transient),
                );
                self.refresh_enablement();
            }
            KeyCode::Char('a') => {
                self.in_active_project = !self.in_active_project;
                self.set_status(
                    StatusLevel::Info,
                    format!("Active project: {}", self.in_active_project),
                );
                self.refresh_enablement();
            }
            _ => {}
        }
        Ok(())
    }

    fn toggle_current_selection(&mut self) {
        let Some(row) = self.tree.current().cloned() else {
            return;
        };
        let now_selected = if row.is_folder {
            match self.project.folder_at(&row.path) {
                Some(folder) => self.selection.toggle_folder(folder),
                None => return,
            }
        } else {
            match self.project.file_at(&row.path) {
                Some(file) => self.selection.toggle_file(file),
                None => return,
            }
        };
        if now_selected {
            self.set_status(StatusLevel::Success, format!("Selected {}", row.name));
        } else {
            self.set_status(StatusLevel::Info, format!("Deselected {}", row.name));
        }
    }

    /// Snapshot the selection and re-evaluate every registered action.
    fn refresh_enablement(&mut self) {
        let base = ActionContext::new(SurfaceId::new("project-tree"))
            .with_anchor(SurfaceId::new(format!("row:{}", self.tree.cursor())));
        let ambient = Ambient {
            project: Some(self.project.as_data()),
            tracker: Some(self.tracker.clone()),
            in_active_project: self.in_active_project,
            transient: self.transient,
        };
        let ctx = self.selection.snapshot(base, &ambient);
        tracing::debug!(
            folders = ctx.folder_count(),
            files = ctx.file_count(),
            busy = ctx.is_busy(),
            "rebuilding enablement"
        );
        self.statuses = self.registry.evaluate(&ctx);
    }

    fn set_status<S: Into<String>>(&mut self, level: StatusLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into()));
    }
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + Duration::from_secs(4),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusLevel {
    Info,
    Success,
}
