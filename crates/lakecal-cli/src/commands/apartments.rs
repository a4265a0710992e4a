//! Catalog listing.

use serde::Serialize;

use lakecal_core::{Apartment, OutputFormat};

use crate::config::ClientConfig;
use crate::error::ClientResult;

#[derive(Debug, Serialize)]
struct ApartmentEntry<'a> {
    id: &'a str,
    name: &'a str,
    feed_configured: bool,
}

/// Prints the apartments in the catalog.
pub fn run(config: &ClientConfig, format: OutputFormat) -> ClientResult<()> {
    println!("{}", render(&config.apartments, format)?);
    Ok(())
}

pub fn render(apartments: &[Apartment], format: OutputFormat) -> ClientResult<String> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = apartments
                .iter()
                .map(|apartment| ApartmentEntry {
                    id: &apartment.id,
                    name: apartment.display_name(),
                    feed_configured: apartment.feed_source().is_configured(),
                })
                .collect();
            super::to_json(&entries)
        }
        OutputFormat::Tty => {
            if apartments.is_empty() {
                return Ok("No apartments configured".to_string());
            }

            let width = apartments.iter().map(|a| a.id.len()).max().unwrap_or(0);
            let lines: Vec<_> = apartments
                .iter()
                .map(|apartment| {
                    let feed = if apartment.feed_source().is_configured() {
                        "feed"
                    } else {
                        "no feed"
                    };
                    format!(
                        "{:<width$}  {:<7}  {}",
                        apartment.id,
                        feed,
                        apartment.display_name(),
                        width = width
                    )
                })
                .collect();
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Apartment> {
        vec![
            Apartment {
                id: "lakeside".to_string(),
                name: "Lakeside Loft".to_string(),
                feed_url: Some("https://www.airbnb.com/calendar/ical/1.ics".to_string()),
            },
            Apartment {
                id: "attic".to_string(),
                name: String::new(),
                feed_url: Some("  ".to_string()),
            },
        ]
    }

    #[test]
    fn render_tty() {
        let text = render(&catalog(), OutputFormat::Tty).unwrap();
        insta::assert_snapshot!(text, @r"
        lakeside  feed     Lakeside Loft
        attic     no feed  attic
        ");
    }

    #[test]
    fn render_empty() {
        assert_eq!(
            render(&[], OutputFormat::Tty).unwrap(),
            "No apartments configured"
        );
    }

    #[test]
    fn render_json() {
        let text = render(&catalog(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["id"], "lakeside");
        assert_eq!(value[0]["feed_configured"], true);
        assert_eq!(value[1]["name"], "attic");
        assert_eq!(value[1]["feed_configured"], false);
    }
}
