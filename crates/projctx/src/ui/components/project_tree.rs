//! Project tree component and state management.

use std::collections::HashSet;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::app::selection::SelectionModel;
use crate::domain::project::Project;

/// One visible row of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub is_folder: bool,
    pub expanded: bool,
}

/// Maintains the navigable state of the project tree.
#[derive(Debug, Default, Clone)]
pub struct ProjectTreeState {
    rows: Vec<TreeRow>,
    cursor: usize,
    expanded: HashSet<String>,
    show_files: bool,
}

impl ProjectTreeState {
    /// Build state for a freshly opened project, expanding folders up to
    /// `expand_depth` levels below the root.
    pub fn from_project(project: &Project, expand_depth: usize, show_files: bool) -> Self {
        let mut state = Self {
            rows: Vec::new(),
            cursor: 0,
            expanded: HashSet::new(),
            show_files,
        };
        state.expand_to_depth(project, "", 0, expand_depth);
        state.rebuild(project);
        state
    }

    fn expand_to_depth(&mut self, project: &Project, path: &str, depth: usize, limit: usize) {
        if depth >= limit {
            return;
        }
        self.expanded.insert(path.to_string());
        for child in project.child_folders(path) {
            self.expand_to_depth(project, &child.path(), depth + 1, limit);
        }
    }

    /// Recompute visible rows from the current hierarchy and expansion set.
    pub fn rebuild(&mut self, project: &Project) {
        let mut rows = Vec::new();
        self.push_folder(project, "", project.name().to_string(), 0, &mut rows);
        self.rows = rows;
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
    }

    fn push_folder(
        &self,
        project: &Project,
        path: &str,
        name: String,
        depth: usize,
        rows: &mut Vec<TreeRow>,
    ) {
        let expanded = self.expanded.contains(path);
        rows.push(TreeRow {
            path: path.to_string(),
            name,
            depth,
            is_folder: true,
            expanded,
        });
        if !expanded {
            return;
        }
        for child in project.child_folders(path) {
            self.push_folder(project, &child.path(), child.name(), depth + 1, rows);
        }
        if self.show_files {
            for file in project.child_files(path) {
                rows.push(TreeRow {
                    path: file.path(),
                    name: file.name(),
                    depth: depth + 1,
                    is_folder: false,
                    expanded: false,
                });
            }
        }
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&TreeRow> {
        self.rows.get(self.cursor)
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Expand the folder under the cursor. Returns whether anything changed.
    pub fn expand_current(&mut self, project: &Project) -> bool {
        let Some(row) = self.current() else {
            return false;
        };
        if !row.is_folder || row.expanded {
            return false;
        }
        let path = row.path.clone();
        self.expanded.insert(path);
        self.rebuild(project);
        true
    }

    /// Collapse the folder under the cursor, or move to its parent when it
    /// is already collapsed or is a file.
    pub fn collapse_or_parent(&mut self, project: &Project) {
        let Some(row) = self.current() else {
            return;
        };
        if row.is_folder && row.expanded {
            let path = row.path.clone();
            self.expanded.remove(&path);
            self.rebuild(project);
            return;
        }
        let depth = row.depth;
        let mut index = self.cursor;
        while index > 0 {
            index -= 1;
            if self.rows[index].depth < depth {
                self.cursor = index;
                return;
            }
        }
    }
}

/// Renders a [`ProjectTreeState`] with selection marks.
#[derive(Debug, Default)]
pub struct ProjectTree;

impl ProjectTree {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        state: &ProjectTreeState,
        selection: &SelectionModel,
        focused: bool,
    ) {
        let border_color = if focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .title("Project")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let items: Vec<ListItem> = state
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| self.render_row(row, index == state.cursor(), selection))
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn render_row(&self, row: &TreeRow, at_cursor: bool, selection: &SelectionModel) -> ListItem {
        let selected = if row.is_folder {
            selection.is_folder_selected(&row.path)
        } else {
            selection.is_file_selected(&row.path)
        };

        let indent = "  ".repeat(row.depth);
        let glyph = if row.is_folder {
            if row.expanded { "▾ " } else { "▸ " }
        } else {
            "· "
        };
        let mark = if selected { "✓ " } else { "  " };

        let name_style = if row.is_folder {
            Style::default().fg(Color::Blue)
        } else {
            Style::default()
        };
        let mut line = Line::from(vec![
            Span::styled(mark, Style::default().fg(Color::Green)),
            Span::raw(indent),
            Span::styled(glyph, Style::default().fg(Color::DarkGray)),
            Span::styled(row.name.clone(), name_style),
        ]);
        if at_cursor {
            line = line.patch_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );
        }
        ListItem::new(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        let project = Project::new("demo", true);
        project.add_folder("", "src").unwrap();
        project.add_folder("src", "core").unwrap();
        project.add_file("src", "main.c").unwrap();
        project.add_file("", "README.md").unwrap();
        project
    }

    fn row_paths(state: &ProjectTreeState) -> Vec<String> {
        state.rows().iter().map(|row| row.path.clone()).collect()
    }

    #[test]
    fn default_expansion_shows_one_level() {
        let project = sample_project();
        let state = ProjectTreeState::from_project(&project, 1, true);
        assert_eq!(row_paths(&state), vec!["", "src", "README.md"]);
    }

    #[test]
    fn expanding_reveals_children() {
        let project = sample_project();
        let mut state = ProjectTreeState::from_project(&project, 1, true);
        state.select_next();
        assert!(state.expand_current(&project));
        assert_eq!(
            row_paths(&state),
            vec!["", "src", "src/core", "src/main.c", "README.md"]
        );
    }

    #[test]
    fn collapse_moves_to_parent_for_files() {
        let project = sample_project();
        let mut state = ProjectTreeState::from_project(&project, 2, true);
        while state
            .current()
            .map(|row| row.path != "src/main.c")
            .unwrap_or(false)
        {
            state.select_next();
        }
        state.collapse_or_parent(&project);
        assert_eq!(state.current().map(|row| row.path.as_str()), Some("src"));
    }

    #[test]
    fn hiding_files_limits_rows_to_folders() {
        let project = sample_project();
        let state = ProjectTreeState::from_project(&project, 2, false);
        assert_eq!(row_paths(&state), vec!["", "src", "src/core"]);
    }

    #[test]
    fn render_marks_selection_and_highlights_cursor_row() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let project = sample_project();
        let mut state = ProjectTreeState::from_project(&project, 1, true);
        state.select_next();
        let mut selection = SelectionModel::new();
        selection.toggle_folder(project.folder_at("src").unwrap());

        let mut terminal = Terminal::new(TestBackend::new(32, 8)).unwrap();
        terminal
            .draw(|frame| ProjectTree.render(frame, frame.size(), &state, &selection, true))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row_text = |y: u16| -> String {
            (0..buffer.area.width)
                .map(|x| buffer.get(x, y).symbol())
                .collect()
        };
        let cursor_y = (0..buffer.area.height)
            .find(|&y| row_text(y).contains("src"))
            .expect("cursor row rendered");
        assert!(row_text(cursor_y).contains("✓"), "selection mark missing");
        let highlighted = (0..buffer.area.width).any(|x| {
            let style = buffer.get(x, cursor_y).style();
            style.bg == Some(Color::DarkGray) && style.add_modifier.contains(Modifier::BOLD)
        });
        assert!(highlighted, "cursor row lost its highlight");
    }

    #[test]
    fn cursor_clamps_after_collapse() {
        let project = sample_project();
        let mut state = ProjectTreeState::from_project(&project, 2, true);
        for _ in 0..state.rows().len() {
            state.select_next();
        }
        // Cursor sits on the last file; two collapses walk up to the root
        // and fold it, leaving a single row.
        state.collapse_or_parent(&project);
        state.collapse_or_parent(&project);
        assert_eq!(row_paths(&state), vec![""]);
        assert_eq!(state.cursor(), 0);
    }
}
