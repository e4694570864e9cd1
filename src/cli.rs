use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate, generate_to};
use vi_numeric::{FieldType, FieldValue};

pub const DEFAULT_BATCH_OUTPUT_PATH: &str = "data/output/converted.csv";

pub const STYLE_HELP: &str = "Load separators and digit counts from a JSON file (keys: thousands_separator, decimal_separator, percent_digits, max_fraction_digits, auto_percent). Missing keys keep the Vietnamese defaults.";
pub const OUTPUT_HELP: &str = "Write the converted CSV to the given file (defaults to data/output/converted.csv when no path is provided). Without this flag the CSV goes to stdout. Use --archive-csv to store a .gz instead.";
pub const ARCHIVE_CSV_HELP: &str = "Archive the converted CSV into a .gz file.";
pub const UNSET_HELP: &str =
    "Numbers use Rust float syntax (1234.5, -0.055, 1e6); `null` or an empty string means unset.";

#[derive(Debug, Parser)]
#[command(
    name = "vinum",
    about = "Format and parse numbers the way the nullable numeric field shows them (Vietnamese grouping, implicit percent).",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "FILE", help = STYLE_HELP)]
    pub style: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Read bare values between 1 and 100 literally instead of as percentages."
    )]
    pub no_auto_percent: bool,
    #[arg(
        short,
        long,
        global = true,
        help = "Log codec decisions to stderr (same as RUST_LOG=debug)."
    )]
    pub verbose: bool,
    #[arg(long, global = true, help = "Disable progress bar output.")]
    pub no_progress: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Record values to display text.
    Format,
    /// Typed text to record values.
    Parse,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render record values as field text.
    Format {
        #[arg(required = true, allow_hyphen_values = true, help = UNSET_HELP)]
        values: Vec<String>,
    },
    /// Read typed text back into numbers.
    Parse {
        #[arg(required = true, allow_hyphen_values = true)]
        texts: Vec<String>,
    },
    /// Convert one column of a CSV file.
    Batch {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(long, default_value = "value", help = "Header of the column to convert.")]
        column: String,
        #[arg(long, value_enum, default_value_t = Mode::Format)]
        mode: Mode,
        #[arg(
            long,
            value_name = "FILE",
            num_args = 0..=1,
            default_missing_value = DEFAULT_BATCH_OUTPUT_PATH,
            help = OUTPUT_HELP
        )]
        output: Option<PathBuf>,
        #[arg(long, help = ARCHIVE_CSV_HELP)]
        archive_csv: bool,
    },
    /// Replay keystrokes against a field bound to an in-memory record.
    Edit {
        #[arg(long, allow_hyphen_values = true, help = UNSET_HELP)]
        initial: Option<String>,
        #[arg(long = "type", value_name = "TYPE", default_value = "float")]
        field_type: FieldType,
        #[arg(long, help = "Treat the field as readonly.")]
        readonly: bool,
        #[arg(
            required = true,
            allow_hyphen_values = true,
            value_name = "KEY",
            help = "DOM key names, e.g. 5 , 5 % Backspace Enter."
        )]
        keys: Vec<String>,
    },
    /// Generate shell completion scripts, optionally installing them for the current user.
    Completions {
        #[arg(value_enum, help = "Shell to generate completions for.")]
        shell: Shell,
        #[arg(
            long,
            value_name = "DIR",
            help = "Directory to write the completion script to."
        )]
        output_dir: Option<PathBuf>,
        #[arg(
            long,
            help = "Install the completion script into the default location for the selected shell."
        )]
        install: bool,
    },
}

/// Reads a value argument: a float literal, or `null`/empty for unset.
pub fn parse_field_value(raw: &str) -> Result<FieldValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return Ok(FieldValue::Unset);
    }
    trimmed
        .parse::<f64>()
        .map(FieldValue::Set)
        .with_context(|| format!("{raw:?} is not a number"))
}

pub fn generate_completions(shell: Shell, output_dir: Option<PathBuf>, install: bool) -> Result<()> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    let target_dir = if let Some(dir) = output_dir {
        Some(dir)
    } else if install {
        Some(default_install_dir(shell)?)
    } else {
        None
    };

    if let Some(dir) = target_dir {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create completion directory {}", dir.display()))?;
        let path = generate_to(shell, &mut command, bin_name, &dir)
            .context("failed to write completion file")?;
        println!("Installed {shell:?} completions to {}", path.display());
    } else {
        let mut stdout = io::stdout().lock();
        generate(shell, &mut command, bin_name, &mut stdout);
        stdout
            .flush()
            .context("failed to flush completion output")?;
    }

    Ok(())
}

fn default_install_dir(shell: Shell) -> Result<PathBuf> {
    let home = std::env::var_os("HOME").ok_or_else(|| {
        anyhow!("HOME environment variable is not set; use --output-dir to specify a path")
    })?;
    let mut path = PathBuf::from(home);

    let relative = match shell {
        Shell::Bash => ".local/share/bash-completion/completions",
        Shell::Elvish => ".elvish/lib/completions",
        Shell::Fish => ".config/fish/completions",
        Shell::PowerShell => ".local/share/powershell/Scripts",
        Shell::Zsh => ".local/share/zsh/site-functions",
        other => {
            return Err(anyhow!(
                "no default install location for {other:?}; specify --output-dir"
            ));
        }
    };
    path.push(relative);
    Ok(path)
}
