//! TUI state and event loop
//!
//! `App` owns the parsed forest, the expand-state mirror of it and whatever
//! the list view needs: selection, viewport and the search filter. Key
//! handling lives in [`App::handle_key`] so it can be driven without a
//! terminal.

use std::io;
use std::ops::Range;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use super::tree::{flatten_forest, toggle_in_forest, FlattenedNode, NodeFlags, TreeNode};
use crate::analysis::{search, TreeStats};
use crate::parser::types::{MavenNode, Scope};

/// Depth at which row colours stop getting darker.
const MAX_SHADE_DEPTH: usize = 10;

/// Brightness lost per level of depth.
const SHADE_STEP: f32 = 0.06;

const BROWSE_KEYS: [(&str, &str); 7] = [
    ("/", "Search"),
    ("j/k", "Move"),
    ("d/u", "Page"),
    ("g/G", "Top/Bottom"),
    ("Enter", "Toggle"),
    ("c", "Conflicts"),
    ("q", "Quit"),
];

const SEARCH_KEYS: [(&str, &str); 4] = [
    ("Type", "Filter"),
    ("↑/↓", "Move"),
    ("Enter", "Browse hits"),
    ("Esc", "Cancel"),
];

/// Input mode of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Keys navigate the tree (or the search hits, while a filter is set)
    #[default]
    Browse,
    /// Keys edit the search query
    Search,
}

/// Window of rows currently on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Index of the first row shown
    pub offset: usize,
    /// Rows that fit inside the list border
    pub height: usize,
}

impl Viewport {
    /// Scroll just enough to keep `selected` on screen.
    pub fn follow(&mut self, selected: usize, total: usize) {
        if selected < self.offset {
            self.offset = selected;
        } else if self.height > 0 && selected >= self.offset + self.height {
            self.offset = selected + 1 - self.height;
        }
        self.offset = self.offset.min(total.saturating_sub(self.height));
    }

    /// Row indices to draw out of `total`.
    pub fn rows(&self, total: usize) -> Range<usize> {
        let start = self.offset.min(total);
        start..(start + self.height).min(total)
    }
}

/// Application state
pub struct App {
    /// The parsed forest, searched directly so collapsed nodes are found too
    forest: Vec<MavenNode>,
    /// Expand-state mirror of the forest
    pub roots: Vec<TreeNode>,
    /// Counters shown in the header
    pub stats: TreeStats,
    /// Visible tree rows
    pub rows: Vec<FlattenedNode>,
    /// Search hits for the current query
    pub hits: Vec<FlattenedNode>,
    /// Selected index into the visible list
    pub selected: usize,
    pub mode: Mode,
    pub query: String,
    pub viewport: Viewport,
    pub should_quit: bool,
}

impl App {
    /// Create the application for a parsed forest, with the roots expanded
    pub fn new(forest: Vec<MavenNode>) -> Self {
        let mut app = Self {
            roots: TreeNode::from_forest(&forest),
            stats: TreeStats::collect(&forest),
            forest,
            rows: Vec::new(),
            hits: Vec::new(),
            selected: 0,
            mode: Mode::Browse,
            query: String::new(),
            viewport: Viewport::default(),
            should_quit: false,
        };
        app.rebuild_rows();
        app
    }

    /// The list being shown: search hits while a query is set, tree rows otherwise
    pub fn visible(&self) -> &[FlattenedNode] {
        if self.query.is_empty() {
            &self.rows
        } else {
            &self.hits
        }
    }

    /// The row under the cursor
    pub fn selected_node(&self) -> Option<&FlattenedNode> {
        self.visible().get(self.selected)
    }

    /// Select a row, clamped to the visible list
    pub fn select(&mut self, index: usize) {
        let total = self.visible().len();
        self.selected = index.min(total.saturating_sub(1));
        self.viewport.follow(self.selected, total);
    }

    /// Move the selection by `delta` rows
    pub fn move_by(&mut self, delta: isize) {
        self.select(self.selected.saturating_add_signed(delta));
    }

    fn page(&self) -> isize {
        isize::try_from(self.viewport.height.max(1)).unwrap_or(isize::MAX)
    }

    fn rebuild_rows(&mut self) {
        self.rows = flatten_forest(&self.roots);
        self.select(self.selected);
    }

    /// Enter on a row: toggle it, or jump to it in the tree when it is a search hit
    pub fn activate(&mut self) {
        if !self.query.is_empty() {
            self.reveal_selected();
        } else if toggle_in_forest(&mut self.roots, self.selected) {
            self.rebuild_rows();
        }
    }

    /// Clear the filter and select the current hit in the expanded tree
    pub fn reveal_selected(&mut self) {
        let Some(id) = self.selected_node().map(|row| row.id.clone()) else {
            return;
        };
        for root in &mut self.roots {
            if root.expand_to(&id) {
                break;
            }
        }
        self.clear_query();
        self.rebuild_rows();
        if let Some(index) = self.rows.iter().position(|row| row.id == id) {
            self.select(index);
        }
    }

    /// Expand every path leading to a conflict and select the first one
    ///
    /// Returns true if the forest contains a conflict.
    pub fn expand_conflicts(&mut self) -> bool {
        let mut found = false;
        for root in &mut self.roots {
            found |= root.expand_conflicts();
        }
        if !found {
            return false;
        }

        self.clear_query();
        self.rebuild_rows();
        if let Some(index) = self.rows.iter().position(|row| row.flags.conflict) {
            self.select(index);
        }
        true
    }

    /// Switch to query editing with an empty query
    pub fn start_search(&mut self) {
        self.mode = Mode::Search;
        self.query.clear();
        self.hits.clear();
    }

    /// Drop the query and go back to browsing the tree
    pub fn clear_query(&mut self) {
        self.mode = Mode::Browse;
        self.query.clear();
        self.hits.clear();
        self.select(0);
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.hits = search(&self.forest, &self.query)
            .into_iter()
            .map(FlattenedNode::from_maven)
            .collect();
        self.select(0);
    }

    /// Apply one key press
    pub fn handle_key(&mut self, code: KeyCode) {
        match self.mode {
            Mode::Search => match code {
                KeyCode::Esc => self.clear_query(),
                KeyCode::Enter => self.mode = Mode::Browse,
                KeyCode::Backspace => self.pop_query(),
                KeyCode::Char(c) => self.push_query(c),
                KeyCode::Down | KeyCode::Tab => self.move_by(1),
                KeyCode::Up | KeyCode::BackTab => self.move_by(-1),
                _ => {}
            },
            Mode::Browse => match code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Esc if !self.query.is_empty() => self.clear_query(),
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('/') => self.start_search(),
                KeyCode::Char('j') | KeyCode::Down => self.move_by(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_by(-1),
                KeyCode::Char('d') | KeyCode::PageDown => self.move_by(self.page()),
                KeyCode::Char('u') | KeyCode::PageUp => self.move_by(-self.page()),
                KeyCode::Char('g') | KeyCode::Home => self.select(0),
                KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
                KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
                KeyCode::Char('c') => {
                    self.expand_conflicts();
                }
                _ => {}
            },
        }
    }
}

/// Run the event loop until the user quits
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }
    }
    Ok(())
}

/// Row colour before depth shading
///
/// Annotations win over scope: conflict red, duplicate dark grey, managed
/// yellow. Otherwise compile green, runtime cyan, test blue, provided
/// magenta, system/import grey, root white.
fn base_color(flags: NodeFlags, scope: Option<Scope>) -> Color {
    if flags.conflict {
        return Color::Red;
    }
    if flags.duplicate {
        return Color::DarkGray;
    }
    if flags.managed {
        return Color::Yellow;
    }
    match scope {
        Some(Scope::Compile) => Color::Green,
        Some(Scope::Runtime) => Color::Cyan,
        Some(Scope::Test) => Color::Blue,
        Some(Scope::Provided) => Color::Magenta,
        Some(Scope::System | Scope::Import) => Color::Gray,
        None => Color::White,
    }
}

fn palette(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        Color::Red => Some((255, 85, 85)),
        Color::Green => Some((80, 250, 123)),
        Color::Yellow => Some((241, 250, 140)),
        Color::Cyan => Some((139, 233, 253)),
        Color::Blue => Some((100, 149, 237)),
        Color::Magenta => Some((255, 121, 198)),
        Color::Gray => Some((170, 170, 170)),
        Color::White => Some((248, 248, 242)),
        _ => None,
    }
}

/// Darken a colour with depth so nesting stays readable in long lists
fn shade(color: Color, depth: usize) -> Color {
    let Some((r, g, b)) = palette(color) else {
        return color;
    };
    let factor = 1.0 - depth.min(MAX_SHADE_DEPTH) as f32 * SHADE_STEP;
    let scale = |channel: u8| (f32::from(channel) * factor) as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}

/// `[C]` conflict, `[D]` duplicate, `[M]` managed, `[!]` collapsed over a conflict
fn status_marker(row: &FlattenedNode) -> &'static str {
    if row.flags.conflict {
        "[C] "
    } else if row.flags.duplicate {
        "[D] "
    } else if row.flags.managed {
        "[M] "
    } else if row.hidden_conflict {
        "[!] "
    } else {
        ""
    }
}

fn annotation_note(row: &FlattenedNode) -> String {
    let mut notes = Vec::new();
    if row.flags.conflict {
        notes.push(match &row.conflict_winner {
            Some(winner) => format!("conflict, using {}", winner),
            None => "conflict".to_string(),
        });
    } else if row.flags.duplicate {
        notes.push("duplicate".to_string());
    }
    if row.flags.managed {
        notes.push(match &row.managed_version {
            Some(from) => format!("managed from {}", from),
            None => "managed".to_string(),
        });
    }
    if notes.is_empty() {
        String::new()
    } else {
        format!("  ({})", notes.join(", "))
    }
}

/// Split `text` into spans, emphasising case-insensitive matches of `query`
fn highlight(text: &str, query: &str, color: Color) -> Vec<Span<'static>> {
    let plain = Style::default().fg(color);
    let hit = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let chars: Vec<char> = text.chars().collect();
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() || needle.len() > chars.len() {
        return vec![Span::styled(text.to_string(), plain)];
    }

    let lower: Vec<char> = chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect();
    let mut marked = vec![false; chars.len()];
    let mut i = 0;
    while i + needle.len() <= lower.len() {
        if lower[i..i + needle.len()] == needle[..] {
            marked[i..i + needle.len()].iter_mut().for_each(|m| *m = true);
            i += needle.len();
        } else {
            i += 1;
        }
    }

    let mut spans = Vec::new();
    let mut segment = String::new();
    let mut in_match = marked[0];
    for (c, is_match) in chars.into_iter().zip(marked) {
        if is_match != in_match {
            let style = if in_match { hit } else { plain };
            spans.push(Span::styled(std::mem::take(&mut segment), style));
            in_match = is_match;
        }
        segment.push(c);
    }
    spans.push(Span::styled(segment, if in_match { hit } else { plain }));
    spans
}

fn row_line(row: &FlattenedNode, query: &str) -> Line<'static> {
    let base = base_color(row.flags, row.scope_kind());
    let color = if row.flags.duplicate {
        base
    } else {
        shade(base, row.depth)
    };
    let muted = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(row.prefix.clone(), muted),
        Span::styled(row.expansion_indicator(), Style::default().fg(Color::Yellow)),
        Span::styled(
            status_marker(row),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ];
    spans.extend(highlight(&row.name, query, color));
    spans.push(Span::styled(format!(" {}", row.version), muted));
    if let Some(scope) = &row.scope {
        spans.push(Span::styled(format!(" [{}]", scope), muted));
    }
    spans.push(Span::styled(annotation_note(row), Style::default().fg(color)));
    Line::from(spans)
}

fn key_hints(keys: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    keys.iter()
        .flat_map(|&(key, action)| {
            [
                Span::styled(key, Style::default().fg(Color::Yellow)),
                Span::raw(format!(" {}  ", action)),
            ]
        })
        .collect()
}

fn render(frame: &mut Frame, app: &mut App) {
    let show_search = app.mode == Mode::Search || !app.query.is_empty();

    let mut constraints = vec![Constraint::Length(3)];
    if show_search {
        constraints.push(Constraint::Length(3));
    }
    constraints.extend([Constraint::Min(0), Constraint::Length(3)]);
    let areas = Layout::vertical(constraints).split(frame.area());

    render_header(frame, app, areas[0]);
    if show_search {
        render_search_bar(frame, app, areas[1]);
    }
    render_list(frame, app, areas[areas.len() - 2]);
    render_footer(frame, app, areas[areas.len() - 1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let stats = &app.stats;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "mvnscope - Maven Dependency Tree",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   {} nodes  ", stats.total),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("{} conflicts  ", stats.conflicts),
            Style::default().fg(Color::Red),
        ),
        Span::styled(
            format!("{} duplicates  ", stats.duplicates),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{} managed", stats.managed),
            Style::default().fg(Color::Yellow),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == Mode::Search;
    let (border, title) = if editing {
        (Color::Yellow, "Search (Enter to browse hits, Esc to cancel)")
    } else {
        (Color::Gray, "Hits (Enter to jump, / to edit, Esc to clear)")
    };

    let mut spans = vec![Span::styled(
        format!("/{}", app.query),
        Style::default().fg(Color::White),
    )];
    if editing {
        spans.push(Span::styled(
            "_",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    if !app.query.is_empty() {
        spans.push(Span::styled(
            format!("  {} matches", app.hits.len()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(bar, area);
}

/// Draw only the rows inside the viewport; the tree can have thousands.
fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    app.viewport.height = usize::from(area.height.saturating_sub(2));
    let total = app.visible().len();
    app.viewport.follow(app.selected, total);
    let window = app.viewport.rows(total);

    let items: Vec<ListItem> = app.visible()[window.clone()]
        .iter()
        .map(|row| ListItem::new(row_line(row, &app.query)))
        .collect();

    let title = if !app.query.is_empty() {
        format!("Matches for '{}' ({})", app.query, total)
    } else if total > window.len() {
        format!(
            "Dependencies ({}-{} of {})",
            window.start + 1,
            window.end,
            total
        )
    } else {
        format!("Dependencies ({})", total)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("► ");

    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.selected.saturating_sub(window.start)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let spans = if app.mode == Mode::Search {
        key_hints(&SEARCH_KEYS)
    } else {
        let mut spans = key_hints(&BROWSE_KEYS);
        spans.push(Span::raw("│  "));
        for (marker, label, color) in [
            ("[C]", " Conflict  ", Color::Red),
            ("[D]", " Duplicate  ", Color::DarkGray),
            ("[M]", " Managed  ", Color::Yellow),
            ("[!]", " Hidden conflict", Color::Red),
        ] {
            spans.push(Span::styled(marker, Style::default().fg(color)));
            spans.push(Span::raw(label));
        }
        spans
    };

    let footer = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
