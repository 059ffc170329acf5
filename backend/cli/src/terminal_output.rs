//! Terminal output: ANSI notes, titled panels and plain tables.

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false))
}

/// Wrap `text` in `style` when colour is on.
pub fn paint(style: &str, text: &str) -> String {
    if supports_color() {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

pub fn note_info(msg: &str) {
    if supports_color() {
        println!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        println!("INFO: {msg}");
    }
}

pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("WARN: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

/// Render `content` under a `=== title ===` rule.
pub fn render_panel(title: &str, content: &str, style: &str) -> String {
    let heading = format!("=== {title} ===");
    let rule = "=".repeat(visible_width(&heading));
    format!("\n{}\n{content}\n{}\n", paint(style, &heading), paint(style, &rule))
}

pub fn print_panel(title: &str, content: &str, style: &str) {
    print!("{}", render_panel(title, content, style));
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: String,
    pub align: Align,
    pub max_width: Option<usize>,
}

impl Column {
    pub fn left(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Left, max_width: None }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Right, max_width: None }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Render a table. Cells wider than a column's `max_width` are cut with `…`.
pub fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let num_cols = columns.len();
    let clip = |i: usize, cell: &str| -> String {
        match columns[i].max_width {
            Some(max) if visible_width(cell) > max => {
                let cut: String = strip_ansi(cell).chars().take(max.saturating_sub(1)).collect();
                format!("{cut}…")
            }
            _ => cell.to_string(),
        }
    };

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..num_cols)
                .map(|i| clip(i, row.get(i).map(String::as_str).unwrap_or("")))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| visible_width(&c.header)).collect();
    for row in &body {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(visible_width(cell));
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| pad_cell(&col.header, widths[i], &col.align))
        .collect();
    out.push_str(&paint(BOLD, &format!("  {}  ", header_cells.join("  "))));
    out.push('\n');

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}  \n", sep.join("  ")));

    for row in &body {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_cell(cell, widths[i], &columns[i].align))
            .collect();
        out.push_str(&format!("  {}  \n", cells.join("  ")));
    }
    out
}

fn pad_cell(s: &str, width: usize, align: &Align) -> String {
    let pad = width.saturating_sub(visible_width(s));
    match align {
        Align::Left => format!("{s}{}", " ".repeat(pad)),
        Align::Right => format!("{}{s}", " ".repeat(pad)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn renders_table() {
        let cols = vec![Column::left("Setting"), Column::right("Value")];
        let rows = vec![
            vec!["Max Turns".to_string(), "10".to_string()],
            vec!["Judge Model".to_string(), "openai/gpt-4o".to_string()],
        ];
        let table = strip_ansi(&render_table(&cols, &rows));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("  Max Turns  "));
        assert!(lines[2].trim_end().ends_with("10"));
        assert_eq!(lines[1].trim(), format!("{}  {}", "-".repeat(11), "-".repeat(13)));
    }

    #[test]
    fn clips_wide_cells() {
        let cols = vec![Column::left("Reply").max_width(5)];
        let rows = vec![vec!["abcdefghij".to_string()]];
        let table = strip_ansi(&render_table(&cols, &rows));
        assert!(table.contains("abcd…"));
        assert!(!table.contains("abcde"));
    }

    #[test]
    fn panel_has_title_rule() {
        let panel = strip_ansi(&render_panel("Help", "body", BLUE));
        assert!(panel.contains("=== Help ==="));
        assert!(panel.contains("\nbody\n"));
    }
}
