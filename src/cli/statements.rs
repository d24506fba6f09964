use super::ui;
use crate::core::chart::{self, format_compact};
use crate::core::{FetchError, Period, ProviderKind, StatementKind, Statements, Symbol};
use crate::service::StatementService;
use anyhow::Result;
use comfy_table::{Cell, Table};
use futures::future::join_all;

/// Most recent periods shown per table.
const MAX_PERIODS: usize = 5;

/// Fetches the requested statements concurrently and prints one table each.
pub async fn run(
    service: &StatementService,
    provider: ProviderKind,
    kinds: &[StatementKind],
    symbol: &Symbol,
    period: Period,
) -> Result<()> {
    let pb = ui::new_progress_bar(kinds.len() as u64);
    pb.set_message(format!("Fetching {symbol}"));
    let futures = kinds.iter().map(|&kind| {
        let pb = pb.clone();
        async move {
            let result = service.get_statement(provider, kind, symbol, period).await;
            pb.inc(1);
            (kind, result)
        }
    });
    let results: Vec<(StatementKind, Result<Statements, FetchError>)> = join_all(futures).await;
    pb.finish_and_clear();

    let mut failures = 0;
    for (i, (kind, result)) in results.iter().enumerate() {
        println!(
            "\n{} {}",
            ui::style_text(&format!("{symbol} {}", kind.title()), ui::StyleType::Title),
            ui::style_text(&format!("({provider})"), ui::StyleType::Subtle)
        );
        match result {
            Ok(statements) => match statement_table(statements) {
                Some(table) => println!("{table}"),
                None => println!("No data found for symbol {symbol}"),
            },
            Err(e) => {
                failures += 1;
                println!(
                    "{} {}",
                    ui::style_text("Error:", ui::StyleType::Error),
                    ui::style_text(&e.to_string(), ui::StyleType::Error)
                );
            }
        }
        if i + 1 < results.len() {
            ui::print_separator();
        }
    }

    if failures == results.len() && failures > 0 {
        anyhow::bail!("Failed to fetch statements for {symbol}");
    }
    Ok(())
}

/// Headline metrics as rows, periods as columns (oldest first).
/// `None` when there is nothing to show.
pub fn statement_table(statements: &Statements) -> Option<Table> {
    if statements.is_empty() {
        return None;
    }
    let series = chart::series(statements);
    let first = series.first()?;
    let skip = first.points.len().saturating_sub(MAX_PERIODS);

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Metric")];
    header.extend(
        first
            .points
            .iter()
            .skip(skip)
            .map(|(date, _)| ui::header_cell(&date.to_string())),
    );
    table.set_header(header);

    for s in &series {
        let mut row = vec![Cell::new(ui::style_text(s.label, ui::StyleType::Label))];
        row.extend(
            s.points
                .iter()
                .skip(skip)
                .map(|(_, value)| ui::amount_cell(*value, format_compact)),
        );
        table.add_row(row);
    }
    Some(table)
}
