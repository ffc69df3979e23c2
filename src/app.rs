use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::system::history::ProcessRow;
use crate::system::sampler::SeriesView;
use crate::system::scheduler::DisplayAdapter;
use crate::ui::theme::Theme;

const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Processes,
    Performance,
}

impl View {
    pub const ALL: [View; 2] = [View::Processes, View::Performance];

    pub fn title(self) -> &'static str {
        match self {
            View::Processes => "Processes",
            View::Performance => "Performance",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Processes => 0,
            View::Performance => 1,
        }
    }

    pub fn next(self) -> Self {
        match self {
            View::Processes => View::Performance,
            View::Performance => View::Processes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Order the OS enumerated the processes in.
    #[default]
    Enumeration,
    Memory,
    Cpu,
    Name,
    Pid,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Enumeration => SortMode::Memory,
            SortMode::Memory => SortMode::Cpu,
            SortMode::Cpu => SortMode::Name,
            SortMode::Name => SortMode::Pid,
            SortMode::Pid => SortMode::Enumeration,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Enumeration => "System",
            SortMode::Memory => "Memory",
            SortMode::Cpu => "CPU",
            SortMode::Name => "Name",
            SortMode::Pid => "PID",
        }
    }

    fn apply(self, rows: &mut [ProcessRow]) {
        match self {
            SortMode::Enumeration => {}
            SortMode::Memory => {
                rows.sort_by(|a, b| b.record.memory_bytes.cmp(&a.record.memory_bytes))
            }
            SortMode::Cpu => {
                rows.sort_by(|a, b| b.record.cpu_percent.total_cmp(&a.record.cpu_percent))
            }
            SortMode::Name => rows.sort_by(|a, b| {
                a.record
                    .name
                    .to_lowercase()
                    .cmp(&b.record.name.to_lowercase())
            }),
            SortMode::Pid => rows.sort_by_key(|r| r.record.pid),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub next_view: KeyCode,
    pub cycle_sort: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            next_view: parse_key(&kb.next_view).unwrap_or(KeyCode::Tab),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
        }
    }
}

pub struct App {
    pub running: bool,
    pub view: View,
    /// Rows from the last refresh cycle, in display order.
    pub rows: Vec<ProcessRow>,
    /// Rows as delivered, kept so re-sorting can restore enumeration order.
    delivered: Vec<ProcessRow>,
    pub series: SeriesView,
    pub sort_mode: SortMode,
    pub scroll: usize,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(config: &Config) -> Self {
        App {
            running: true,
            view: View::default(),
            rows: Vec::new(),
            delivered: Vec::new(),
            series: SeriesView::default(),
            sort_mode: SortMode::default(),
            scroll: 0,
            theme: Theme::from_config(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        let code = key.code;
        if code == self.keybinds.quit {
            return Action::Quit;
        }
        if code == self.keybinds.next_view {
            return Action::NextView;
        }
        if code == self.keybinds.cycle_sort {
            return Action::CycleSort;
        }
        match code {
            KeyCode::Char('1') => Action::SelectView(0),
            KeyCode::Char('2') => Action::SelectView(1),
            KeyCode::Up => Action::ScrollUp(1),
            KeyCode::Down => Action::ScrollDown(1),
            KeyCode::PageUp => Action::ScrollUp(PAGE_SIZE),
            KeyCode::PageDown => Action::ScrollDown(PAGE_SIZE),
            KeyCode::Home => Action::ScrollTop,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::NextView => self.view = self.view.next(),
            Action::SelectView(index) => {
                if let Some(view) = View::ALL.get(index) {
                    self.view = *view;
                }
            }
            Action::CycleSort => {
                self.sort_mode = self.sort_mode.next();
                self.resort();
            }
            Action::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(n),
            Action::ScrollDown(n) => {
                self.scroll = self.scroll.saturating_add(n);
                self.clamp_scroll();
            }
            Action::ScrollTop => self.scroll = 0,
            Action::None => {}
        }
    }

    pub fn changed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.annotation.is_changed()).count()
    }

    fn resort(&mut self) {
        self.rows = self.delivered.clone();
        self.sort_mode.apply(&mut self.rows);
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.rows.len().saturating_sub(1));
    }
}

impl DisplayAdapter for App {
    fn render_process_rows(&mut self, rows: &[ProcessRow]) {
        self.delivered = rows.to_vec();
        self.resort();
        self.clamp_scroll();
    }

    fn render_series(&mut self, series: &SeriesView) {
        self.series = series.clone();
    }
}
