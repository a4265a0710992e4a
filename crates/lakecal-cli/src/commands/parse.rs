//! Offline parsing of a local calendar document.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use lakecal_core::OutputFormat;
use lakecal_feeds::parse_busy_intervals;

use crate::error::ClientResult;

/// Parses `file` ('-' for stdin) and prints the busy intervals found.
pub fn run(file: &Path, format: OutputFormat) -> ClientResult<()> {
    let text = read_document(file)?;
    debug!(bytes = text.len(), path = %file.display(), "Read calendar document");

    let intervals = parse_busy_intervals(&text);
    println!("{}", super::intervals::render(&intervals, None, format)?);
    Ok(())
}

fn read_document(file: &Path) -> ClientResult<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.ics");
        std::fs::write(
            &path,
            "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nDTSTART;VALUE=DATE:20240301\r\nDTEND;VALUE=DATE:20240305\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n",
        )
        .unwrap();

        let text = read_document(&path).unwrap();
        assert_eq!(parse_busy_intervals(&text).len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(&dir.path().join("absent.ics")).unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
