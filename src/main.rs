use crate::batch::{BatchOptions, convert_cell, run_batch};
use crate::cli::{Cli, Commands, Mode, parse_field_value};
use crate::progress::ProgressState;
use crate::summary::{
    BatchSummaryContext, ConversionRow, print_batch_summary, print_conversions, print_edit_steps,
};
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io::IsTerminal;
use vi_numeric::{FieldValue, Key};

mod batch;
mod cli;
mod config;
mod edit;
mod logging;
mod progress;
mod summary;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let style = config::load_style(cli.style.as_deref(), cli.no_auto_percent)?;
    let show_progress = !cli.no_progress && std::io::stderr().is_terminal();

    match cli.command {
        Commands::Format { values } => {
            let rows: Vec<ConversionRow> = values
                .iter()
                .map(|raw| convert_cell(&style, Mode::Format, raw))
                .collect();
            print_conversions("Formatted", &rows);
        }
        Commands::Parse { texts } => {
            let rows: Vec<ConversionRow> = texts
                .iter()
                .map(|raw| convert_cell(&style, Mode::Parse, raw))
                .collect();
            print_conversions("Parsed", &rows);
        }
        Commands::Batch {
            input,
            column,
            mode,
            output,
            archive_csv,
        } => {
            let run_started_at = Local::now();
            let use_color = colored::control::SHOULD_COLORIZE.should_colorize();
            let progress = ProgressState::new(show_progress, use_color);
            let report = run_batch(
                &style,
                &BatchOptions {
                    input: &input,
                    column: &column,
                    mode,
                    output: output.as_deref(),
                    archive_csv,
                },
                &progress,
            )?;
            progress.clear();
            if let Some(context) =
                BatchSummaryContext::for_report(&input, &column, &run_started_at, &report)
            {
                print_batch_summary(&context);
            }
        }
        Commands::Edit {
            initial,
            field_type,
            readonly,
            keys,
        } => {
            let initial = initial
                .as_deref()
                .map_or(Ok(FieldValue::Unset), parse_field_value)
                .context("invalid --initial value")?;
            let keys: Vec<Key> = keys
                .iter()
                .map(|name| name.parse().unwrap_or_else(|never| match never {}))
                .collect();
            let steps = edit::replay(style, field_type, initial, readonly, &keys);
            print_edit_steps(&steps);
        }
        Commands::Completions {
            shell,
            output_dir,
            install,
        } => cli::generate_completions(shell, output_dir, install)?,
    }

    Ok(())
}
