//! Report
//!
//! Terminal rendering of planner results.

use std::io;

use serde::Serialize;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    combination::describe,
    denominations::Denomination,
    planner::{PerfectSplit, SplitCheck, SubtractionOption},
    stats::{StackStats, spread},
};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the output failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),

    /// Serialising the JSON output failed.
    #[error("Failed to serialise report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write any result as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialisation or writing fails.
pub fn write_json<T: Serialize>(mut out: impl io::Write, value: &T) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;

    Ok(())
}

/// Write the removal (if any) and the three stacks.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_perfect(mut out: impl io::Write, split: &PerfectSplit) -> Result<(), ReportError> {
    match &split.removal {
        Some(removal) if removal.is_degraded() => {
            writeln!(
                out,
                "\nNo exact combination found. Removed greedily: {}",
                describe(Some(removal.removed()))
            )?;
        }
        Some(removal) => writeln!(out, "\n{}", describe(Some(removal.removed())))?,
        None => writeln!(out, "\nNo bills removed.")?,
    }

    write_stacks(&mut out, &split.stacks)
}

/// Write every removal option, each with its own stack table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_options(mut out: impl io::Write, options: &[SubtractionOption]) -> Result<(), ReportError> {
    if options.is_empty() {
        writeln!(out, "\nNo removal options: the bills already split evenly or no amount works.")?;

        return Ok(());
    }

    for (idx, option) in options.iter().enumerate() {
        writeln!(
            out,
            "\n\x1b[1mOption {}: remove ${}, ${} left\x1b[0m",
            idx + 1,
            option.amount_subtracted,
            option.new_total
        )?;
        writeln!(out, "{}", option.description)?;

        write_stacks(&mut out, &option.stack_stats)?;
    }

    Ok(())
}

/// Write a split check as a short summary block.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_check(mut out: impl io::Write, check: &SplitCheck) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Total", &format!("${}", check.total_amount)]);
    builder.push_record(["Bills", &check.total_bills.to_string()]);
    builder.push_record(["Divisible by three", yes_no(check.divisible_by_three)]);
    builder.push_record(["Splits evenly", yes_no(check.evenly_distributable)]);

    if let Some(reason) = &check.reason {
        builder.push_record(["Reason", reason.as_str()]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::first(), Color::BOLD);

    writeln!(out, "\n{table}")?;

    if let Some(stacks) = &check.stacks {
        write_stacks(&mut out, stacks)?;
    }

    Ok(())
}

/// Write one row per stack followed by the spread between the richest and
/// poorest stack.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_stacks(mut out: impl io::Write, stacks: &[StackStats]) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    let mut header = vec!["Stack".to_string()];
    header.extend(Denomination::ALL.iter().map(ToString::to_string));
    header.extend(["Bills".to_string(), "Value".to_string()]);

    builder.push_record(header);

    for stat in stacks {
        let mut row = vec![format!("#{}", stat.index)];

        row.extend(
            Denomination::ALL
                .iter()
                .map(|&denom| count_cell(stat.distribution.count(denom))),
        );
        row.extend([stat.bill_count.to_string(), format!("${}", stat.value)]);

        builder.push_record(row);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, " Spread: ${}", spread(stacks))?;

    Ok(())
}

/// Blank cells for denominations a stack does not hold.
fn count_cell(count: u32) -> String {
    if count == 0 {
        String::new()
    } else {
        count.to_string()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
