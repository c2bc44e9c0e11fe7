//! Action enablement panel.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::app::actions::ActionStatus;

/// Ambient facts displayed above the action list.
#[derive(Debug, Clone, Default)]
pub struct AmbientSummary {
    pub project_name: String,
    pub read_only: bool,
    pub active: bool,
    pub transient: bool,
    pub busy: bool,
    pub folder_count: usize,
    pub file_count: usize,
}

/// Displays which actions the current selection enables.
#[derive(Debug, Default)]
pub struct ActionPanel;

impl ActionPanel {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        statuses: &[ActionStatus],
        ambient: &AmbientSummary,
    ) {
        let block = Block::default().title("Actions").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(inner);

        let header = Paragraph::new(header_lines(ambient)).wrap(Wrap { trim: true });
        frame.render_widget(header, layout[0]);

        let items: Vec<ListItem> = statuses
            .iter()
            .map(|status| {
                let (label, style) = if status.enabled {
                    ("enabled", Style::default().fg(Color::Green))
                } else {
                    ("disabled", Style::default().fg(Color::DarkGray))
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<12}", status.name)),
                    Span::styled(label, style),
                ]))
            })
            .collect();
        frame.render_widget(List::new(items), layout[1]);
    }
}

fn header_lines(ambient: &AmbientSummary) -> Vec<Line<'static>> {
    let mut flags = Vec::new();
    if ambient.read_only {
        flags.push("read-only");
    }
    if !ambient.active {
        flags.push("inactive");
    }
    if ambient.transient {
        flags.push("transient");
    }
    let flag_line = if flags.is_empty() {
        Line::from(Span::styled("writable", Style::default().fg(Color::Green)))
    } else {
        Line::from(Span::styled(
            flags.join(" · "),
            Style::default().fg(Color::Yellow),
        ))
    };

    let busy_line = if ambient.busy {
        Line::from(Span::styled(
            "operation in flight",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled("idle", Style::default().fg(Color::DarkGray)))
    };

    vec![
        Line::from(Span::raw(ambient.project_name.clone())),
        flag_line,
        Line::from(Span::raw(format!(
            "selection: {} folder(s), {} file(s)",
            ambient.folder_count, ambient.file_count
        ))),
        busy_line,
    ]
}
