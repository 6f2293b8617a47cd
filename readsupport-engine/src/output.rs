//! The line protocol read by the review panel.
//!
//! Summary and debug lines are `key:value`; the last line carries the per-read result as
//! JSON after a `Final_output:` prefix.

use std::io::Write;

use serde::Serialize;

use readsupport_core::{Category, Result};

use crate::batch::BatchOutcome;
use crate::consts::MISSING_SCORE;

const FIELD_SEPARATOR: &str = ":";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Add forward/reverse counts for every alternate after the summary lines.
    pub per_allele: bool,
}

#[derive(Serialize)]
struct FinalEntry<'a> {
    read_number: usize,
    categories: &'a [Category],
}

fn join<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

pub fn write_report<W: Write>(
    writer: &mut W,
    outcome: &BatchOutcome,
    options: &ReportOptions,
) -> Result<()> {
    let counts = &outcome.counts;
    let mode = outcome.strictness;

    writeln!(writer, "alternate_forward_count:{}", counts.alternate.forward)?;
    writeln!(writer, "alternate_reverse_count:{}", counts.alternate.reverse)?;
    writeln!(writer, "reference_forward_count:{}", counts.reference.forward)?;
    writeln!(writer, "reference_reverse_count:{}", counts.reference.reverse)?;
    writeln!(writer, "strand_probability:{:.6}", outcome.bias.p_value)?;

    if options.per_allele {
        for (index, pair) in counts.per_allele.iter().enumerate() {
            writeln!(writer, "alt_{}_forward_count:{}", index, pair.forward)?;
            writeln!(writer, "alt_{}_reverse_count:{}", index, pair.reverse)?;
        }
    }

    writeln!(
        writer,
        "output_cat:{}",
        join(outcome.results.iter().map(|r| r.primary(mode)))
    )?;

    // group by primary category; the sort is stable so input order holds within a group
    let mut grouped: Vec<(Category, usize)> = outcome
        .results
        .iter()
        .map(|r| (r.primary(mode), r.read_number))
        .collect();
    grouped.sort_by_key(|&(category, _)| category);
    writeln!(
        writer,
        "output_gID:{}",
        join(grouped.iter().map(|&(_, read_number)| read_number))
    )?;

    writeln!(
        writer,
        "output_diff_scores:{}",
        join(outcome.results.iter().map(|r| match r.best_score() {
            Some(score) => format!("{:.4}", score),
            None => MISSING_SCORE.to_string(),
        }))
    )?;

    let entries: Vec<FinalEntry> = outcome
        .categories()
        .map(|(read_number, categories)| FinalEntry {
            read_number,
            categories,
        })
        .collect();
    write!(writer, "Final_output:")?;
    serde_json::to_writer(&mut *writer, &entries)?;
    writeln!(writer)?;
    Ok(())
}

pub fn render_report(outcome: &BatchOutcome, options: &ReportOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write_report(&mut buffer, outcome, options)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
