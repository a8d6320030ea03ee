//! Source stage: CSV records → [`QueryDescriptor`]s.
//!
//! Reads an ordered sequence of CSV records, validates the fixed
//! header, converts each data record, and forwards descriptors
//! downstream in input order. The downstream channel closes when the
//! sender is dropped, which happens on every exit path.

use std::io::Read;

use chrono::{DateTime, NaiveDateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::channel::send_or_cancel;
use crate::error::{BenchError, FormatError, TimestampField};
use crate::types::QueryDescriptor;

/// Expected header columns, in order. Exact names required.
const HEADER: [&str; 3] = ["subject", "range-start", "range-end"];

/// Fixed-width timestamp format for the two range columns (UTC, no
/// offset suffix).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads descriptors from `input` and forwards them on `tx`.
///
/// On a malformed header or record, stops reading and returns the
/// format error; records forwarded before the failing line stay
/// forwarded. If cancellation fires mid-stream, stops and returns
/// `Ok(())` — the stage that caused the cancellation already reported.
pub(crate) async fn read_descriptors<R: Read + Send>(
    input: R,
    tx: mpsc::Sender<QueryDescriptor>,
    cancel: CancellationToken,
) -> Result<(), BenchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(input);
    let mut record = csv::StringRecord::new();

    match reader.read_record(&mut record) {
        Ok(true) => {}
        Ok(false) => return Err(FormatError::UnknownHeader(String::new()).into()),
        Err(source) => return Err(FormatError::Record { line: 1, source }.into()),
    }
    if record.len() != HEADER.len() || !record.iter().eq(HEADER) {
        let found = record.iter().collect::<Vec<_>>().join(", ");
        return Err(FormatError::UnknownHeader(found).into());
    }

    let mut forwarded: u64 = 0;
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(source) => {
                let line = source
                    .position()
                    .map_or_else(|| reader.position().line(), csv::Position::line);
                return Err(FormatError::Record { line, source }.into());
            }
        }
        // Blank lines are skipped by the reader, so the record's own
        // position is the authoritative input line number.
        let line = record.position().map_or(0, csv::Position::line);
        let descriptor = parse_record(&record, line)?;

        if !send_or_cancel(&tx, descriptor, &cancel).await {
            tracing::debug!(forwarded, "source stage cancelled mid-stream");
            return Ok(());
        }
        forwarded += 1;
    }

    tracing::debug!(forwarded, "source stage exhausted input");
    Ok(())
}

/// Validates one data record, in order: subject, range start, range end.
fn parse_record(record: &csv::StringRecord, line: u64) -> Result<QueryDescriptor, FormatError> {
    let subject = record.get(0).unwrap_or_default();
    if subject.is_empty() {
        return Err(FormatError::EmptySubject { line });
    }

    let range_start = parse_timestamp(
        record.get(1).unwrap_or_default(),
        TimestampField::RangeStart,
        line,
    )?;
    let range_end = parse_timestamp(
        record.get(2).unwrap_or_default(),
        TimestampField::RangeEnd,
        line,
    )?;

    Ok(QueryDescriptor {
        subject: subject.to_owned(),
        range_start,
        range_end,
    })
}

fn parse_timestamp(
    value: &str,
    field: TimestampField,
    line: u64,
) -> Result<DateTime<Utc>, FormatError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| FormatError::MalformedTimestamp {
            line,
            field,
            value: value.to_owned(),
        })
}
