//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use schoolhub_core::{
    EntityId, Facets, FeeComponent, ListQuery, Resource, ResourceStore, ViewFilter,
};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

// ── Prompts & files ─────────────────────────────────────────────────

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

// ── Argument parsing ────────────────────────────────────────────────

/// Split `KEY=VALUE` arguments.
pub fn parse_pairs(raw: &[String], field: &str) -> Result<Vec<(String, String)>, CliError> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_owned(), v.to_owned())),
            _ => Err(CliError::Validation {
                field: field.into(),
                reason: format!("expected KEY=VALUE, got '{pair}'"),
            }),
        })
        .collect()
}

/// Server-side query from list flags.
pub fn list_query(args: &ListArgs) -> Result<ListQuery, CliError> {
    let mut query = ListQuery::new();
    if let Some(ref search) = args.search {
        query = query.search(search);
    }
    if let Some(ref category) = args.category {
        query = query.category(category);
    }
    if let Some(ref priority) = args.priority {
        query = query.priority(priority);
    }
    for (key, value) in parse_pairs(&args.filter, "filter")? {
        query = query.filter(key, value);
    }
    Ok(query)
}

/// Query from bare `--filter` pairs (exports).
pub fn filter_query(filters: &[String]) -> Result<ListQuery, CliError> {
    let pairs = parse_pairs(filters, "filter")?;
    Ok(pairs
        .into_iter()
        .fold(ListQuery::new(), |q, (k, v)| q.filter(k, v)))
}

/// Client-side view from list flags.
pub fn view_filter(args: &ListArgs) -> ViewFilter {
    let mut filter = ViewFilter::new().order(args.sort);
    if let Some(ref text) = args.r#match {
        filter = filter.search(text);
    }
    filter
}

/// `Tuition=1200.50` -> fee component.
pub fn parse_components(raw: &[String]) -> Result<Vec<FeeComponent>, CliError> {
    parse_pairs(raw, "component")?
        .into_iter()
        .map(|(name, amount)| {
            let amount: f64 = amount.trim().parse().map_err(|_| CliError::Validation {
                field: "component".into(),
                reason: format!("amount for '{name}' must be a number, got '{amount}'"),
            })?;
            Ok(FeeComponent {
                name,
                amount,
                extra: serde_json::Map::new(),
            })
        })
        .collect()
}

// ── Store helpers ───────────────────────────────────────────────────

/// Spinner on stderr while `fut` runs; hidden when quiet or piped.
pub async fn with_spinner<F: Future>(message: &str, global: &GlobalOpts, fut: F) -> F::Output {
    let bar = if global.quiet || !std::io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    };
    bar.set_message(message.to_owned());
    let result = fut.await;
    bar.finish_and_clear();
    result
}

/// Fetch a collection so item operations can find their target.
pub async fn load<E: Resource>(
    store: &ResourceStore<E>,
    query: &ListQuery,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let message = format!("Loading {}", E::ENDPOINT.plural);
    with_spinner(&message, global, store.fetch(query)).await?;
    Ok(())
}

/// Fetch the whole collection with no filters.
pub async fn load_all<E: Resource>(
    store: &ResourceStore<E>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    load(store, &ListQuery::default(), global).await
}

/// Look up a cached entity; a miss points at the right list command.
pub fn find<E: Resource<Key = EntityId>>(
    store: &ResourceStore<E>,
    id: &str,
) -> Result<Arc<E>, CliError> {
    Ok(store.require(&EntityId::from(id))?)
}

/// The shared `list` subcommand: fetch with server-side filters, project
/// through the client-side view, render.
pub async fn list<E, R>(
    store: &ResourceStore<E>,
    args: &ListArgs,
    global: &GlobalOpts,
    to_row: impl Fn(&Arc<E>) -> R,
) -> Result<(), CliError>
where
    E: Resource<Key = EntityId> + Facets + Serialize,
    R: Tabled,
{
    load(store, &list_query(args)?, global).await?;
    let rows = store.view(&view_filter(args));
    let out = output::render_list(&global.output, &rows, to_row, |e| e.key().to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Print one entity in the chosen format.
pub fn show<E>(entity: &Arc<E>, global: &GlobalOpts, detail: impl Fn(&Arc<E>) -> String)
where
    E: Resource<Key = EntityId> + Serialize,
{
    let out = output::render_single(&global.output, entity, detail, |e| e.key().to_string());
    output::print_output(&out, global.quiet);
}

/// Confirm a delete, naming what goes away.
/// Ask before deleting; the record's title or name when it has one,
/// else its id.
pub fn confirm_delete(
    noun: &str,
    label: Option<&str>,
    id: &EntityId,
    global: &GlobalOpts,
) -> Result<bool, CliError> {
    let label = label.filter(|l| !l.is_empty()).unwrap_or(id.as_str());
    confirm(&format!("Delete {noun} '{label}'?"), global.yes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_need_a_key() {
        assert!(parse_pairs(&["class=10A".into()], "filter").is_ok());
        assert!(parse_pairs(&["=10A".into()], "filter").is_err());
        assert!(parse_pairs(&["class".into()], "filter").is_err());
    }

    #[test]
    fn components_parse_amounts() {
        let parsed = parse_components(&["Tuition=1200.5".into(), "Transport= 300".into()]);
        let parsed = parsed.ok().unwrap_or_default();
        assert_eq!(parsed.len(), 2);
        assert!((parsed[1].amount - 300.0).abs() < f64::EPSILON);
        assert!(parse_components(&["Lab=free".into()]).is_err());
    }
}
