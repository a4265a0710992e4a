//! Busy interval listing.

use lakecal_core::{BusyInterval, OutputFormat, OutputFormatter};

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Syncs an apartment's feed and prints its busy intervals.
pub async fn run(config: &ClientConfig, apartment_id: &str, format: OutputFormat) -> ClientResult<()> {
    let apartment = super::find_apartment(config, apartment_id)?;
    let view = super::build_view(config)?;

    let outcome = view.select(apartment.feed_source()).await;
    super::note_outcome(apartment, &outcome);

    let intervals = view
        .snapshot()
        .await
        .map(|state| state.intervals)
        .unwrap_or_default();
    println!("{}", render(&intervals, Some(&apartment.id), format)?);
    Ok(())
}

/// Renders intervals as text lines or as a JSON document.
pub fn render(
    intervals: &[BusyInterval],
    apartment_id: Option<&str>,
    format: OutputFormat,
) -> ClientResult<String> {
    let formatter = OutputFormatter::default();
    match format {
        OutputFormat::Tty => Ok(formatter.format_intervals_tty(intervals)),
        OutputFormat::Json => super::to_json(&formatter.format_intervals_json(intervals, apartment_id)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn interval(start: (i32, u32, u32), end: (i32, u32, u32)) -> BusyInterval {
        BusyInterval::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn render_json_includes_apartment() {
        let intervals = vec![interval((2024, 3, 1), (2024, 3, 5))];
        let text = render(&intervals, Some("lakeside"), OutputFormat::Json).unwrap();
        insta::assert_snapshot!(text, @r#"
        {
          "apartment_id": "lakeside",
          "intervals": [
            {
              "start": "2024-03-01",
              "end": "2024-03-05"
            }
          ],
          "count": 1
        }
        "#);
    }

    #[test]
    fn render_tty_lines() {
        let intervals = vec![
            interval((2024, 3, 1), (2024, 3, 5)),
            interval((2024, 3, 9), (2024, 3, 10)),
        ];
        let text = render(&intervals, None, OutputFormat::Tty).unwrap();
        assert_eq!(
            text,
            "2024-03-01 -> 2024-03-05 (4 nights)\n2024-03-09 -> 2024-03-10 (1 night)"
        );
    }
}
