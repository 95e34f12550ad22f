use crate::league::TeamSeasonSummary;
use crate::line_parser::{DELIMITER, QUOTE};
use crate::ranking::RankedEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: usize,
    pub align: Align,
}

impl Column {
    pub const fn new(title: &'static str, width: usize, align: Align) -> Self {
        Self { title, width, align }
    }
}

/// A table cell. Text is cut to the column width, numbers never are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(i64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Number(i64::from(value))
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

pub fn fit_text(text: &str, width: usize, align: Align) -> String {
    let cut: String = text.chars().take(width).collect();
    pad(&cut, width, align)
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub columns: Vec<Column>,
}

impl TableLayout {
    pub fn header(&self) -> String {
        self.columns
            .iter()
            .map(|c| fit_text(c.title, c.width, c.align))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn row(&self, cells: &[Cell]) -> String {
        self.columns
            .iter()
            .zip(cells)
            .map(|(col, cell)| match cell {
                Cell::Text(text) => fit_text(text, col.width, col.align),
                Cell::Number(n) => pad(&n.to_string(), col.width, Align::Right),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn league_layout() -> TableLayout {
    TableLayout {
        columns: vec![
            Column::new("Pos", 3, Align::Right),
            Column::new("Team", 20, Align::Left),
            Column::new("Played", 10, Align::Right),
            Column::new("Goal diff", 10, Align::Right),
            Column::new("Points", 10, Align::Right),
        ],
    }
}

/// Header line followed by one line per position.
pub fn render_league_table(entries: &[RankedEntry<TeamSeasonSummary>]) -> Vec<String> {
    let layout = league_layout();
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(layout.header());
    for entry in entries {
        let s = &entry.item;
        lines.push(layout.row(&[
            Cell::from(entry.rank),
            Cell::from(s.team.as_str()),
            Cell::from(s.played),
            Cell::from(s.goal_difference()),
            Cell::from(s.points),
        ]));
    }
    lines
}

/// A field made safe for a delimited row, plus a warning when it carries a
/// quote that cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedField {
    pub text: String,
    pub warning: Option<String>,
}

/// Quote a field only when it contains the delimiter. A field already wrapped
/// in one pair of quotes passes through; any other quote is left alone and
/// reported.
pub fn protect_field(raw: &str) -> ProtectedField {
    let text = raw.trim();
    let quotes = text.matches(QUOTE).count();
    if quotes > 0 {
        let wrapped = quotes == 2 && text.len() >= 2 && text.starts_with(QUOTE) && text.ends_with(QUOTE);
        return ProtectedField {
            text: text.to_string(),
            warning: (!wrapped).then(|| format!("internal double quote in field: {raw}")),
        };
    }
    let text = if text.contains(DELIMITER) {
        format!("{QUOTE}{text}{QUOTE}")
    } else {
        text.to_string()
    };
    ProtectedField { text, warning: None }
}

/// Join protected fields into one row, collecting any warnings.
pub fn render_delimited_row<S: AsRef<str>>(fields: &[S]) -> (String, Vec<String>) {
    let separator = DELIMITER.to_string();
    let mut warnings = Vec::new();
    let row = fields
        .iter()
        .map(|f| {
            let protected = protect_field(f.as_ref());
            warnings.extend(protected.warning);
            protected.text
        })
        .collect::<Vec<_>>()
        .join(separator.as_str());
    (row, warnings)
}
