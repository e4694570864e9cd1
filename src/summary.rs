use chrono::{DateTime, Local};
use colored::Colorize;
use std::path::Path;
use vi_numeric::ParseKind;

use crate::batch::BatchReport;
use crate::edit::EditStep;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRow {
    pub input: String,
    pub output: String,
    pub kind: ParseKind,
}

pub struct BatchSummaryContext<'a> {
    pub(crate) input: &'a Path,
    pub(crate) column: &'a str,
    pub(crate) run_started_at: &'a DateTime<Local>,
    pub(crate) output: &'a Path,
    pub(crate) report: &'a BatchReport,
}

impl<'a> BatchSummaryContext<'a> {
    /// Only runs that wrote a file get a summary; stdout runs keep stdout pure CSV.
    pub(crate) fn for_report(
        input: &'a Path,
        column: &'a str,
        run_started_at: &'a DateTime<Local>,
        report: &'a BatchReport,
    ) -> Option<Self> {
        let output = report.written_to.as_deref()?;
        Some(Self {
            input,
            column,
            run_started_at,
            output,
            report,
        })
    }
}

pub fn print_conversions(title: &str, rows: &[ConversionRow]) {
    println!("{}", title.bold().bright_magenta());
    let table_width = print_conversion_table(rows);
    println!("{}", "=".repeat(table_width).bright_cyan());
}

pub fn print_batch_summary(context: &BatchSummaryContext<'_>) {
    println!();
    println!(
        "{}",
        "====================== Batch Conversion ======================"
            .bold()
            .bright_cyan()
    );
    println!(
        "{} {}",
        "Run started".bright_yellow().bold(),
        context
            .run_started_at
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string()
            .bright_white()
    );
    println!(
        "{} {} | {}",
        "Source".bright_yellow().bold(),
        format!("{}", context.input.display()).bright_white(),
        format!("column: {}", context.column).bright_white()
    );

    let report = context.report;
    let invalid = format!("Invalid: {}", report.invalid);
    println!(
        "{} {} | {} | {}",
        "Rows".bright_yellow().bold(),
        format!("Total: {}", report.rows).bright_white(),
        format!("Empty: {}", report.empty).bright_white(),
        if report.invalid > 0 {
            invalid.bright_red()
        } else {
            invalid.bright_white()
        }
    );
    print_path_line("Output CSV", context.output);
    println!();
    print_conversions("Preview", &report.preview);
    if report.rows > report.preview.len() {
        println!(
            "{}",
            format!("... {} more rows.", report.rows - report.preview.len()).bright_black()
        );
    }
}

pub fn print_edit_steps(steps: &[EditStep]) {
    let header = format!("{:<12} | {:<8} | {:<16} | {}", "Key", "Action", "Text", "Record");
    let separator = "-------------+----------+------------------+----------------";
    println!("{}", header.bold().bright_white());
    println!("{}", separator.bright_black());
    for step in steps {
        let line = format!(
            "{:<12} | {:<8} | {:<16} | {}",
            step.event, step.action, step.text, step.record
        );
        println!("{}", line.bright_green());
    }
}

fn print_path_line(label: &str, path: &Path) {
    println!(
        "{} {}",
        label.bright_yellow().bold(),
        format!("{}", path.display()).bright_white()
    );
}

fn print_conversion_table(rows: &[ConversionRow]) -> usize {
    if rows.is_empty() {
        let message = "Nothing to convert.";
        println!("{}", message.bright_black());
        return message.len();
    }

    let input_width = column_width(rows.iter().map(|row| row.input.as_str()), "Input");
    let output_width = column_width(rows.iter().map(|row| row.output.as_str()), "Output");
    let header = format!(
        "{:<input_width$} | {:<output_width$} | {}",
        "Input", "Output", "Kind"
    );
    let separator = format!(
        "{}-+-{}-+-{}",
        "-".repeat(input_width),
        "-".repeat(output_width),
        "-".repeat(12)
    );
    let mut max_width = header.len().max(separator.len());
    println!("{}", header.bold().bright_white());
    println!("{}", separator.bright_black());

    for row in rows {
        let line = format!(
            "{:<input_width$} | {:<output_width$} | {}",
            row.input,
            row.output,
            row.kind.label()
        );
        max_width = max_width.max(line.chars().count());
        if row.kind == ParseKind::Invalid {
            println!("{}", line.bright_red());
        } else {
            println!("{}", line.bright_green());
        }
    }

    max_width
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|value| value.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn summary_only_for_written_files() {
        let started = Local::now();
        let input = Path::new("rates.csv");
        let mut report = BatchReport::default();
        assert!(BatchSummaryContext::for_report(input, "rate", &started, &report).is_none());

        report.written_to = Some(PathBuf::from("out/rates.csv.gz"));
        let context = BatchSummaryContext::for_report(input, "rate", &started, &report).unwrap();
        assert_eq!(context.output, Path::new("out/rates.csv.gz"));
    }
}
