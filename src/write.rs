use csv::{Terminator, WriterBuilder};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::ScrapeError;
use crate::types::ResultTable;

fn fs_err(path: &Path) -> impl FnOnce(io::Error) -> ScrapeError + '_ {
    move |source| ScrapeError::Filesystem {
        path: path.to_path_buf(),
        source,
    }
}

/// Serialize `table` as CSV into any writer: header first, then rows,
/// CRLF-terminated, quoting only where needed.
pub fn write_csv<W: Write>(table: &ResultTable, out: W) -> Result<(), ScrapeError> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b',')
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(out);
    if let Some(header) = &table.header {
        wtr.write_record(header)?;
    }
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// `write_csv` into a writer backed by `dest`. I/O failures are reported
/// against `dest` instead of as CSV errors.
fn write_csv_for<W: Write>(table: &ResultTable, out: W, dest: &Path) -> Result<(), ScrapeError> {
    write_csv(table, out).map_err(|e| match e {
        ScrapeError::Csv(err) if err.is_io_error() => {
            let source = match err.into_kind() {
                csv::ErrorKind::Io(source) => source,
                other => io::Error::new(io::ErrorKind::Other, format!("{:?}", other)),
            };
            fs_err(dest)(source)
        }
        other => other,
    })
}

/// Write `table` to `dest`.
///
/// The CSV goes to a hidden sibling file first and is renamed over `dest`,
/// so a failure never leaves a half-written artifact behind.
pub fn write_table<P: AsRef<Path>>(table: &ResultTable, dest: P) -> Result<(), ScrapeError> {
    let dest = dest.as_ref();
    let file_name = dest
        .file_name()
        .ok_or_else(|| ScrapeError::Filesystem {
            path: dest.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"),
        })?
        .to_string_lossy()
        .to_string();
    let tmp_path: PathBuf = dest.with_file_name(format!(".{}.tmp", file_name));

    let result: Result<(), ScrapeError> = (|| {
        let file = fs::File::create(&tmp_path).map_err(fs_err(dest))?;
        write_csv_for(table, io::BufWriter::new(file), dest)?;
        fs::rename(&tmp_path, dest).map_err(fs_err(dest))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;
    debug!(path = %dest.display(), rows = table.rows.len(), "wrote table");
    Ok(())
}
