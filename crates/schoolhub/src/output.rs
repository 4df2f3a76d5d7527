//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Whether color should be used on a stream that is (or isn't) a terminal.
pub fn should_color(mode: &ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Color decision for stderr, where notifications go.
pub fn stderr_color(mode: &ColorMode) -> bool {
    should_color(mode, io::stderr().is_terminal())
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list in the chosen format. `to_row` feeds the table, the
/// structured formats serialize `data` as-is, and `id_fn` drives `plain`.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one item. Table mode uses `detail_fn`'s key/value block.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// `label:` padded so values line up in detail views.
pub fn detail_block(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    fields
        .iter()
        .map(|(k, v)| format!("{:<width$} {v}", format!("{k}:")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"-"` for absent optional values.
pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_owned()
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("<serialization failed: {e}>"))
}

fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).unwrap_or_else(|e| format!("<serialization failed: {e}>"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("<serialization failed: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, Tabled)]
    struct Row {
        id: String,
        name: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "b1".into(),
                name: "Dune".into(),
            },
            Row {
                id: "b2".into(),
                name: "Emma".into(),
            },
        ]
    }

    #[test]
    fn plain_prints_one_id_per_line() {
        let data = rows();
        let out = render_list(
            &OutputFormat::Plain,
            &data,
            |r| Row {
                id: r.id.clone(),
                name: r.name.clone(),
            },
            |r| r.id.clone(),
        );
        assert_eq!(out, "b1\nb2");
    }

    #[test]
    fn compact_json_is_one_line() {
        let out = render_single(&OutputFormat::JsonCompact, &rows()[0], |_| String::new(), |r| {
            r.id.clone()
        });
        assert_eq!(out, r#"{"id":"b1","name":"Dune"}"#);
    }

    #[test]
    fn detail_block_aligns_values() {
        let out = detail_block(&[("ID", "e1".into()), ("Title", "Sports Day".into())]);
        assert_eq!(out, "ID:    e1\nTitle: Sports Day");
    }

    #[test]
    fn never_means_never() {
        assert!(!should_color(&ColorMode::Never, true));
        assert!(should_color(&ColorMode::Always, false));
        assert!(!should_color(&ColorMode::Auto, false));
    }
}
