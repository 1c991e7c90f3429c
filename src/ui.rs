use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use retail_etl::{PeriodSummary, ServiceLevelRecord};
use std::collections::BTreeSet;
use std::io;

const PAGE_JUMP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Weekly,
    Monthly,
    ServiceLevel,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Weekly => Page::Monthly,
            Page::Monthly => Page::ServiceLevel,
            Page::ServiceLevel => Page::Weekly,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Weekly => Page::ServiceLevel,
            Page::Monthly => Page::Weekly,
            Page::ServiceLevel => Page::Monthly,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Weekly => "Weekly Sales",
            Page::Monthly => "Monthly Sales",
            Page::ServiceLevel => "Service Level",
        }
    }
}

pub struct App {
    pub weekly: Vec<PeriodSummary>,
    pub monthly: Vec<PeriodSummary>,
    pub service_level: Vec<ServiceLevelRecord>,
    pub current_page: Page,
    pub state: TableState,
    pub show_detail: bool,
    /// None = all stores
    pub store_filter: Option<String>,
    stores: Vec<String>,
}

impl App {
    pub fn new(
        weekly: Vec<PeriodSummary>,
        monthly: Vec<PeriodSummary>,
        service_level: Vec<ServiceLevelRecord>,
    ) -> Self {
        let stores: BTreeSet<String> = weekly
            .iter()
            .map(|s| s.store_id.clone())
            .chain(monthly.iter().map(|s| s.store_id.clone()))
            .chain(service_level.iter().map(|s| s.store_id.clone()))
            .collect();

        let mut app = Self {
            weekly,
            monthly,
            service_level,
            current_page: Page::Weekly,
            state: TableState::default(),
            show_detail: false,
            store_filter: None,
            stores: stores.into_iter().collect(),
        };
        app.reset_selection();
        app
    }

    fn matches_filter(&self, store_id: &str) -> bool {
        self.store_filter.as_deref().map_or(true, |s| s == store_id)
    }

    /// Summary rows of the current page after the store filter
    pub fn visible_summaries(&self) -> Vec<&PeriodSummary> {
        let rows = match self.current_page {
            Page::Weekly => &self.weekly,
            Page::Monthly => &self.monthly,
            Page::ServiceLevel => return Vec::new(),
        };
        rows.iter().filter(|s| self.matches_filter(&s.store_id)).collect()
    }

    pub fn visible_service_levels(&self) -> Vec<&ServiceLevelRecord> {
        self.service_level
            .iter()
            .filter(|s| self.matches_filter(&s.store_id))
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        match self.current_page {
            Page::ServiceLevel => self.visible_service_levels().len(),
            _ => self.visible_summaries().len(),
        }
    }

    fn reset_selection(&mut self) {
        if self.visible_len() > 0 {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.reset_selection();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.reset_selection();
    }

    /// All stores → first store → ... → last store → all stores
    pub fn cycle_store_filter(&mut self) {
        self.store_filter = match &self.store_filter {
            None => self.stores.first().cloned(),
            Some(current) => {
                let pos = self.stores.iter().position(|s| s == current);
                pos.and_then(|i| self.stores.get(i + 1)).cloned()
            }
        };
        self.reset_selection();
    }

    pub fn clear_filter(&mut self) {
        self.store_filter = None;
        self.reset_selection();
    }

    pub fn next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = self
            .state
            .selected()
            .map_or(0, |i| (i + PAGE_JUMP).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.visible_len() == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE_JUMP));
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        self.reset_selection();
    }

    pub fn last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.state.select(Some(len - 1));
        }
    }

    /// Mean service level over the visible rows, if any
    pub fn average_service_level(&self) -> Option<f64> {
        let rows = self.visible_service_levels();
        if rows.is_empty() {
            return None;
        }
        Some(rows.iter().map(|r| r.service_level).sum::<f64>() / rows.len() as f64)
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::Char('s') => app.cycle_store_filter(),
                KeyCode::Char('c') => app.clear_filter(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [
        (Page::Weekly, app.weekly.len()),
        (Page::Monthly, app.monthly.len()),
        (Page::ServiceLevel, app.service_level.len()),
    ];

    let mut tab_spans = vec![];
    for (i, (page, count)) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{} ({})", page.title(), count), style));
    }

    if let Some(avg) = app.average_service_level() {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("Avg service level: {:.1}%", avg * 100.0),
            Style::default().fg(level_color(avg)),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn header_row(columns: &[&'static str]) -> Row<'static> {
    let cells = columns.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    Row::new(cells).style(Style::default().bg(Color::DarkGray)).height(1)
}

fn level_color(level: f64) -> Color {
    if level >= 0.9 {
        Color::Green
    } else if level >= 0.5 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", app.current_page.title()));

    let table = match app.current_page {
        Page::ServiceLevel => {
            let rows: Vec<Row> = app
                .visible_service_levels()
                .into_iter()
                .map(|r| {
                    Row::new(vec![
                        Cell::from(r.period_start.format("%Y-%m").to_string()),
                        Cell::from(r.store_id.clone()),
                        Cell::from(format!("{:.1}%", r.service_level * 100.0))
                            .style(Style::default().fg(level_color(r.service_level))),
                    ])
                })
                .collect();

            Table::new(
                rows,
                [Constraint::Length(12), Constraint::Length(16), Constraint::Length(14)],
            )
            .header(header_row(&["Month", "Store", "Service Level"]))
        }
        _ => {
            let rows: Vec<Row> = app
                .visible_summaries()
                .into_iter()
                .map(|s| {
                    Row::new(vec![
                        Cell::from(s.period_start.to_string()),
                        Cell::from(truncate(&s.store_id, 14)),
                        Cell::from(truncate(&s.product_id, 18)),
                        Cell::from(s.total_units_sold.to_string()),
                        Cell::from(format!("{:.2}", s.total_revenue)).style(Style::default().fg(Color::Green)),
                        Cell::from(format!("{:.2}", s.avg_unit_price)),
                        Cell::from(format!("{:.1}", s.avg_inventory_level)),
                    ])
                })
                .collect();

            Table::new(
                rows,
                [
                    Constraint::Length(12),
                    Constraint::Length(16),
                    Constraint::Length(20),
                    Constraint::Length(8),
                    Constraint::Length(14),
                    Constraint::Length(12),
                    Constraint::Length(12),
                ],
            )
            .header(header_row(&["Period", "Store", "Product", "Units", "Revenue", "Avg Price", "Avg Stock"]))
        }
    };

    let table = table
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.visible_len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(store) = &app.store_filter {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Store: {}", store),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    for (key, label) in [
        ("Enter", " Details | "),
        ("Tab", " Page | "),
        ("s", " Store | "),
        ("↑/↓", " Nav | "),
        ("PgUp/PgDn", " Fast | "),
    ] {
        if key == "Enter" {
            status_spans.push(Span::raw(" | "));
        }
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
    }
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {}: ", label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected();

    let content: Vec<Line> = match app.current_page {
        Page::ServiceLevel => match selected.and_then(|i| app.visible_service_levels().get(i).copied()) {
            Some(r) => vec![
                Line::from(""),
                detail_line("Month", r.period_start.format("%B %Y").to_string()),
                detail_line("Store", r.store_id.clone()),
                detail_line("Service level", format!("{:.4}", r.service_level)),
            ],
            None => vec![Line::from("No row selected")],
        },
        _ => match selected.and_then(|i| app.visible_summaries().get(i).copied()) {
            Some(s) => vec![
                Line::from(""),
                detail_line("Period start", s.period_start.to_string()),
                detail_line("Store", s.store_id.clone()),
                detail_line("Product", s.product_id.clone()),
                Line::from(""),
                detail_line("Units sold", s.total_units_sold.to_string()),
                detail_line("Revenue", format!("{:.2}", s.total_revenue)),
                detail_line("Avg unit price", format!("{:.4}", s.avg_unit_price)),
                detail_line("Avg inventory", format!("{:.2}", s.avg_inventory_level)),
            ],
            None => vec![Line::from("No row selected")],
        },
    };

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Details "),
    );

    f.render_widget(detail_panel, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
