//! Recorded tracks for replaying a journey against a receiver.
//!
//! One `latitude longitude` pair per line, in degrees. Blank lines and
//! lines starting with `#` are skipped.

use beacon_net::geo::Location;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: expected `latitude longitude`")]
    Shape { line: usize },
    #[error("line {line}: {value:?} is not a number")]
    Number { line: usize, value: String },
}

pub fn parse(text: &str) -> Result<Vec<Location>, ParseError> {
    let mut track = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(ParseError::Shape { line });
        }

        let number = |value: &str| {
            value.parse::<f64>().map_err(|_| ParseError::Number {
                line,
                value: value.to_owned(),
            })
        };

        track.push(Location::new(number(fields[0])?, number(fields[1])?));
    }

    Ok(track)
}
