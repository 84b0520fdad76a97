//! Reading transfer files and writing transfers, balances and series as JSON or CSV.

use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use holders_common::{log::TransferLog, transfer::BalanceEntry};
use holders_engine::timeseries::Series;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_csv_flag(csv: bool) -> Self {
        if csv {
            OutputFormat::Csv
        } else {
            OutputFormat::Json
        }
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> crate::Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| crate::Error::FileReadFailed(path.to_path_buf(), e))?;
    let de = &mut serde_json::Deserializer::from_str(&content);
    serde_path_to_error::deserialize(de)
        .map_err(|e| crate::Error::JsonParsingFailed(path.to_path_buf(), e))
}

pub fn read_transfer_logs(path: &Path) -> crate::Result<Vec<TransferLog>> {
    let logs: Vec<TransferLog> = read_json(path)?;
    tracing::info!(path = %path.display(), count = logs.len(), "read transfer file");
    Ok(logs)
}

/// Creates (or truncates) `path` and hands a buffered writer to `write`.
pub fn write_to_path<F>(path: &Path, write: F) -> crate::Result<()>
where
    F: FnOnce(&mut dyn Write) -> crate::Result<()>,
{
    let file =
        fs::File::create(path).map_err(|e| crate::Error::FileWriteFailed(path.to_path_buf(), e))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer
        .flush()
        .map_err(|e| crate::Error::FileWriteFailed(path.to_path_buf(), e))
}

fn write_json<T: Serialize + ?Sized>(w: &mut dyn Write, value: &T) -> crate::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value).map_err(crate::Error::JsonFormattingFailed)?;
    writeln!(w)?;
    Ok(())
}

pub fn write_transfer_logs(
    w: &mut dyn Write,
    logs: &[TransferLog],
    format: OutputFormat,
) -> crate::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, logs),
        OutputFormat::Csv => {
            writeln!(w, "blockNumber,from,to,amount")?;
            for log in logs {
                let height = log.block_height()?;
                writeln!(w, "{height},{},{},{}", log.from, log.to, log.amount)?;
            }
            Ok(())
        }
    }
}

pub fn write_balances(
    w: &mut dyn Write,
    balances: &[BalanceEntry],
    format: OutputFormat,
) -> crate::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, balances),
        OutputFormat::Csv => {
            writeln!(w, "address,amount")?;
            for entry in balances {
                writeln!(w, "{},{}", entry.address, entry.amount)?;
            }
            Ok(())
        }
    }
}

pub fn write_series(w: &mut dyn Write, series: &Series, format: OutputFormat) -> crate::Result<()> {
    match format {
        OutputFormat::Json => write_json(w, series),
        OutputFormat::Csv => {
            let mut header = String::from("block,holders,holders_legacy,holders_combined");
            for cutoff in &series.cutoffs {
                header.push_str(&format!(",gini_{cutoff}"));
            }
            writeln!(w, "{header}")?;

            for snapshot in &series.snapshots {
                let holders = &snapshot.holders;
                write!(
                    w,
                    "{},{},{},{}",
                    snapshot.block_height, holders.current, holders.legacy, holders.combined
                )?;
                for entry in &snapshot.gini {
                    write!(w, ",{}", entry.gini)?;
                }
                writeln!(w)?;
            }
            Ok(())
        }
    }
}
