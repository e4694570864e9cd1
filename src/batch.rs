use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use csv::{Reader, StringRecord, Writer};
use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::debug;
use vi_numeric::{FieldValue, NumberStyle, ParseKind};

use crate::cli::{Mode, parse_field_value};
use crate::progress::{ProgressState, Stage, run_with_spinner};
use crate::summary::ConversionRow;

const PREVIEW_ROWS: usize = 10;

pub struct BatchOptions<'a> {
    pub input: &'a Path,
    pub column: &'a str,
    pub mode: Mode,
    pub output: Option<&'a Path>,
    pub archive_csv: bool,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub rows: usize,
    pub empty: usize,
    pub invalid: usize,
    pub written_to: Option<PathBuf>,
    pub preview: Vec<ConversionRow>,
}

impl Mode {
    const fn output_column(self) -> &'static str {
        match self {
            Self::Format => "formatted",
            Self::Parse => "parsed",
        }
    }
}

pub fn run_batch(
    style: &NumberStyle,
    options: &BatchOptions<'_>,
    progress: &ProgressState,
) -> Result<BatchReport> {
    let label = options.input.display().to_string();
    let (headers, records) =
        run_with_spinner(progress, Stage::Read, &label, || read_csv(options.input))?;
    let column = headers
        .iter()
        .position(|header| header == options.column)
        .ok_or_else(|| {
            anyhow!(
                "column {:?} not found in {}; available: {}",
                options.column,
                options.input.display(),
                headers.iter().collect::<Vec<_>>().join(", ")
            )
        })?;

    let mut report = BatchReport::default();
    let mut writer = Writer::from_writer(Vec::new());
    let mut out_headers = headers.clone();
    out_headers.push_field(options.mode.output_column());
    writer
        .write_record(&out_headers)
        .context("failed to write CSV header")?;

    let bar = progress.bar(Stage::Convert, options.column, records.len() as u64);
    for record in &records {
        let cell = record.get(column).unwrap_or_default();
        let row = convert_cell(style, options.mode, cell);
        match row.kind {
            ParseKind::Empty => report.empty += 1,
            ParseKind::Invalid => report.invalid += 1,
            _ => {}
        }

        let mut out = record.clone();
        out.push_field(&row.output);
        writer
            .write_record(&out)
            .context("failed to serialize converted record")?;

        if report.preview.len() < PREVIEW_ROWS {
            report.preview.push(row);
        }
        report.rows += 1;
        bar.inc(1);
    }
    bar.finish();
    debug!(rows = report.rows, invalid = report.invalid, "batch converted");

    let serialized = finalize_writer(writer, "converted CSV writer")?;
    match options.output {
        Some(path) => {
            let written = run_with_spinner(progress, Stage::Write, &path.display().to_string(), || {
                write_output_file(path, &serialized, options.archive_csv)
            })?;
            report.written_to = Some(written);
        }
        None => {
            progress.clear();
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&serialized)
                .context("failed to write CSV to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }

    Ok(report)
}

fn read_csv(path: &Path) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut reader =
        Reader::from_path(path).with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read CSV header from {}", path.display()))?
        .clone();
    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to read CSV records from {}", path.display()))?;
    Ok((headers, records))
}

pub fn convert_cell(style: &NumberStyle, mode: Mode, cell: &str) -> ConversionRow {
    match mode {
        Mode::Format => match parse_field_value(cell) {
            Ok(value) => ConversionRow {
                input: cell.to_string(),
                output: style.format(value),
                kind: if value == FieldValue::Unset {
                    ParseKind::Empty
                } else {
                    ParseKind::Literal
                },
            },
            Err(err) => {
                debug!(cell, error = %err, "skipping non-numeric cell");
                ConversionRow {
                    input: cell.to_string(),
                    output: String::new(),
                    kind: ParseKind::Invalid,
                }
            }
        },
        Mode::Parse => {
            let parsed = style.parse_outcome(cell);
            ConversionRow {
                input: cell.to_string(),
                output: parsed.value.to_string(),
                kind: parsed.kind,
            }
        }
    }
}

fn finalize_writer(mut writer: Writer<Vec<u8>>, label: &str) -> Result<Vec<u8>> {
    writer
        .flush()
        .with_context(|| format!("failed to flush {label}"))?;
    writer
        .into_inner()
        .with_context(|| format!("failed to finalize {label}"))
}

/// Writes `bytes` to `path`, or to `path` + `.gz` when archiving. Returns the
/// path actually written.
pub(crate) fn write_output_file(path: &Path, bytes: &[u8], archive: bool) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    if !archive {
        fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        return Ok(path.to_path_buf());
    }

    let mut archived = path.as_os_str().to_owned();
    archived.push(".gz");
    let archived = PathBuf::from(archived);
    let file = fs::File::create(&archived)
        .with_context(|| format!("failed to create {}", archived.display()))?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(bytes)
        .with_context(|| format!("failed to write {}", archived.display()))?;
    encoder
        .finish()
        .with_context(|| format!("failed to finish {}", archived.display()))?;
    Ok(archived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vinum-batch-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn format_mode_handles_unset_and_garbage() {
        let style = NumberStyle::default();
        let row = convert_cell(&style, Mode::Format, "1234.5");
        assert_eq!(row.output, "1.234,5");
        assert_eq!(row.kind, ParseKind::Literal);

        let row = convert_cell(&style, Mode::Format, "null");
        assert_eq!(row.output, "");
        assert_eq!(row.kind, ParseKind::Empty);

        let row = convert_cell(&style, Mode::Format, "n/a");
        assert_eq!(row.kind, ParseKind::Invalid);
    }

    #[test]
    fn parse_mode_reports_kind() {
        let style = NumberStyle::default();
        let row = convert_cell(&style, Mode::Parse, "5,50%");
        assert_eq!(row.kind, ParseKind::Percent);
        assert_eq!(row.output, "0.055");
    }

    #[test]
    fn converts_a_column_and_archives() {
        let dir = scratch_dir("archive");
        let input = dir.join("input.csv");
        fs::write(&input, "name,value\nrate,0.055\nsalary,15000000\nbonus,\n").unwrap();
        let output = dir.join("out/converted.csv");

        let report = run_batch(
            &NumberStyle::default(),
            &BatchOptions {
                input: &input,
                column: "value",
                mode: Mode::Format,
                output: Some(&output),
                archive_csv: true,
            },
            &ProgressState::new(false, false),
        )
        .unwrap();

        assert_eq!(report.rows, 3);
        assert_eq!(report.empty, 1);
        assert_eq!(report.invalid, 0);
        let written = report.written_to.unwrap();
        assert_eq!(written, dir.join("out/converted.csv.gz"));

        let mut text = String::new();
        GzDecoder::new(fs::File::open(&written).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(
            text,
            "name,value,formatted\nrate,0.055,\"5,50%\"\nsalary,15000000,15.000.000\nbonus,,\n"
        );
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn unknown_column_lists_headers() {
        let dir = scratch_dir("column");
        let input = dir.join("input.csv");
        fs::write(&input, "name,amount\nrate,1\n").unwrap();
        let err = run_batch(
            &NumberStyle::default(),
            &BatchOptions {
                input: &input,
                column: "value",
                mode: Mode::Parse,
                output: Some(&dir.join("out.csv")),
                archive_csv: false,
            },
            &ProgressState::new(false, false),
        )
        .unwrap_err();
        assert!(err.to_string().contains("available: name, amount"));
        fs::remove_dir_all(dir).unwrap();
    }
}
