//! Terminal output helpers for the interactive shell

use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;
use tabled::{Table, Tabled, settings::Style as TableStyle};

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub dim: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            dim: Style::new().white().dimmed(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            dim: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

pub fn banner(title: &str, subtitle: &str) {
    println!();
    println!("{}", title.style(theme().header.clone()));
    println!("{}", subtitle.style(theme().dim.clone()));
    println!();
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{}", label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("[error] {}", label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{}", label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!("{}: {}", label.style(theme().dim.clone()), value);
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
}

/// Render stored names as an indexed table; the indexes are the ones the
/// `o` and `d` commands accept.
pub fn item_table(names: &[String]) -> String {
    let rows: Vec<ItemRow> = names
        .iter()
        .enumerate()
        .map(|(index, name)| ItemRow {
            index,
            name: name.clone(),
        })
        .collect();

    Table::new(&rows).with(TableStyle::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_table_lists_names_with_indexes() {
        let table = item_table(&["a.txt".into(), "b.png".into()]);
        assert!(table.contains("a.txt"));
        assert!(table.contains("b.png"));
        assert!(table.contains('0'));
        assert!(table.contains('1'));
    }
}
