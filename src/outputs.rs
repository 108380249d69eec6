use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;
use prettytable::format::{FormatBuilder, LinePosition, LineSeparator, TableFormat};
use prettytable::{Cell, Table};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::errors::ParserError;
use crate::modes::{Mode, Row};

/// Sends `results` to the sink chosen on the command line.
pub fn control_output(
    results: &[Row],
    mode: Mode,
    output: Option<OutputFormat>,
    config: &Config,
) -> Result<(), ParserError> {
    match output {
        None => print_stdout(&default_output(results))?,
        Some(OutputFormat::Pretty) => print_stdout(&pretty_output(results))?,
        Some(OutputFormat::File) => {
            file_output(results, mode, config)?;
        }
    }
    Ok(())
}

fn print_stdout(text: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// Fields separated by spaces, one row per line.
pub fn default_output(results: &[Row]) -> String {
    let mut out = String::new();
    for row in results {
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

/// Bordered, left-aligned table; the first row is the header.
pub fn pretty_output(results: &[Row]) -> String {
    let Some((header, body)) = results.split_first() else {
        return String::new();
    };

    let mut table = Table::new();
    table.set_format(table_format());
    table.set_titles(table_row(header));
    for row in body {
        table.add_row(table_row(row));
    }
    table.to_string()
}

fn table_format() -> TableFormat {
    FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separators(
            &[LinePosition::Top, LinePosition::Title, LinePosition::Bottom],
            LineSeparator::new('-', '+', '+', '+'),
        )
        .padding(1, 1)
        .build()
}

fn table_row(row: &[String]) -> prettytable::Row {
    prettytable::Row::new(
        row.iter()
            .map(|field| Cell::new(field).style_spec("l"))
            .collect(),
    )
}

/// Writes the rows to `results/<mode>_<timestamp>.csv` and returns the path.
pub fn file_output(results: &[Row], mode: Mode, config: &Config) -> Result<PathBuf, ParserError> {
    let file_name = results_file_name(mode, &Local::now(), config.datetime_format);
    let file_path = write_csv(results, &config.results_dir, &file_name)?;
    info!("Results file saved: {}", file_path.display());
    Ok(file_path)
}

pub fn results_file_name<Tz>(mode: Mode, now: &DateTime<Tz>, datetime_format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.csv", mode.as_str(), now.format(datetime_format))
}

/// Every field quoted, `\n` line endings.
pub fn write_csv(results: &[Row], dir: &Path, file_name: &str) -> Result<PathBuf, ParserError> {
    fs::create_dir_all(dir)?;
    let file_path = dir.join(file_name);

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(File::create(&file_path)?);
    for row in results {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(file_path)
}
