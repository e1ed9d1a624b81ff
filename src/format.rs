use crate::imports::*;

use chrono::{DateTime, Utc};

/// Divisor for gigabyte-scaled fields.
pub const GIGABYTE: i64 = 1_000_000_000;

/*
    Types:
    * FormatKind - The value transformation selected by a format specifier
    * FieldFormat - A parsed "<width><kind>" specifier with wrapping behavior
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatKind {
    #[default]
    PlainString,
    EpochDate,
    Gigabyte,
    Utc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldFormat {
    width: Option<usize>,
    kind: FormatKind,
}

impl FieldFormat {
    /// A format with no declared width and no transformation; values pass
    /// through as a single unwrapped line.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Parses a compact "<width><kind>" specifier, e.g. "25s" or "10e".
    /// The width may be omitted; a zero width is invalid.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let Some(kind_char) = spec.chars().last() else {
            return Err(anyhow::anyhow!("empty format specification"));
        };

        let kind = match kind_char {
            's' => FormatKind::PlainString,
            'e' => FormatKind::EpochDate,
            'g' => FormatKind::Gigabyte,
            'u' => FormatKind::Utc,
            other => {
                return Err(anyhow::anyhow!(
                    "unrecognised format kind '{}' in '{}'",
                    other,
                    spec
                ));
            }
        };

        let width_part = &spec[..spec.len() - kind_char.len_utf8()];
        let width = if width_part.is_empty() {
            None
        } else {
            let parsed = width_part
                .parse::<usize>()
                .with_context(|| format!("invalid width in format specification '{}'", spec))?;
            if parsed == 0 {
                return Err(anyhow::anyhow!("format width must be positive in '{}'", spec));
            }
            Some(parsed)
        };

        Ok(FieldFormat { width, kind })
    }

    pub fn width(&self) -> Option<usize> {
        self.width
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    /// One filler line of `width` spaces, used when a field runs out of
    /// wrapped lines before its row does.
    pub fn blank_line(&self) -> String {
        " ".repeat(self.width.unwrap_or(0))
    }

    /// Applies the kind-specific transformation. Empty values pass through
    /// untouched; values the transformation cannot interpret are absorbed
    /// with a warning and pass through unchanged.
    pub fn apply(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        match self.kind {
            FormatKind::PlainString | FormatKind::Utc => text.to_string(),
            FormatKind::EpochDate => match parse_epoch_prefix(text) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => {
                    tracing::warn!(value = text, "value is not an epoch timestamp");
                    text.to_string()
                }
            },
            FormatKind::Gigabyte => match text.parse::<i64>() {
                Ok(bytes) => format!("{:.2} GB", bytes as f64 / GIGABYTE as f64),
                Err(_) => {
                    tracing::warn!(value = text, "value is not a byte count");
                    text.to_string()
                }
            },
        }
    }

    /// Wraps a value into fixed-width lines. With no declared width the
    /// value is returned as a single unmodified line; otherwise every line
    /// is space-padded to exactly `width` characters.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let Some(width) = self.width else {
            return vec![text.to_string()];
        };

        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= width {
            return vec![pad_to(text, width)];
        }

        chars
            .chunks(width)
            .map(|chunk| pad_to(&chunk.iter().collect::<String>(), width))
            .collect()
    }

    /// The full transformation: kind conversion followed by wrapping.
    pub fn render(&self, text: &str) -> Vec<String> {
        self.wrap(&self.apply(text))
    }
}

/// Interprets the first 10 characters of a value as base-10 Unix seconds.
pub fn parse_epoch_prefix(text: &str) -> Option<DateTime<Utc>> {
    let prefix: String = text.chars().take(10).collect();
    let seconds = prefix.parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0)
}

fn pad_to(text: &str, width: usize) -> String {
    format!("{:<width$}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_width_and_kind() {
        let format = FieldFormat::parse("25s").unwrap();
        assert_eq!(format.width(), Some(25));
        assert_eq!(format.kind(), FormatKind::PlainString);

        let format = FieldFormat::parse("10e").unwrap();
        assert_eq!(format.width(), Some(10));
        assert_eq!(format.kind(), FormatKind::EpochDate);

        let format = FieldFormat::parse("g").unwrap();
        assert_eq!(format.width(), None);
        assert_eq!(format.kind(), FormatKind::Gigabyte);

        let format = FieldFormat::parse("12u").unwrap();
        assert_eq!(format.kind(), FormatKind::Utc);
    }

    #[test]
    fn rejects_malformed_specifications() {
        assert!(FieldFormat::parse("").is_err());
        assert!(FieldFormat::parse("25x").is_err());
        assert!(FieldFormat::parse("abcs").is_err());
        assert!(FieldFormat::parse("0s").is_err());
    }

    #[test]
    fn wraps_long_values_into_width_chunks() {
        let format = FieldFormat::parse("5s").unwrap();
        assert_eq!(format.render("HELLOWORLD"), ["HELLO", "WORLD"]);
        assert_eq!(format.render("HI"), ["HI   "]);
        assert_eq!(format.render("HELLOWORLD!"), ["HELLO", "WORLD", "!    "]);
    }

    #[test]
    fn unsized_formats_pass_values_through() {
        let format = FieldFormat::passthrough();
        assert_eq!(format.render("anything at all"), ["anything at all"]);
        assert_eq!(format.blank_line(), "");
    }

    #[test]
    fn wrap_round_trips_the_original_value() {
        let samples = [
            "",
            "short",
            "exactly-ten",
            "a longer value that wraps across several lines",
        ];
        for text in samples {
            for width in 1..=12 {
                let format = FieldFormat::parse(&format!("{}s", width)).unwrap();
                let rebuilt: String = format.wrap(text).concat();
                assert_eq!(rebuilt.trim_end(), text.trim_end());
            }
        }
    }

    #[test]
    fn epoch_dates_render_as_utc_calendar_dates() {
        let format = FieldFormat::parse("10e").unwrap();
        assert_eq!(format.render("1500000000"), ["2017-07-14"]);
        // Only the first 10 characters participate.
        assert_eq!(format.render("1500000000123"), ["2017-07-14"]);
        // Uninterpretable values are absorbed, not errors.
        assert_eq!(format.render("not-a-date"), ["not-a-date"]);
    }

    #[test]
    fn gigabyte_values_scale_and_pad() {
        let format = FieldFormat::parse("10g").unwrap();
        assert_eq!(format.render("1500000000"), ["1.50 GB   "]);
        assert_eq!(format.render("500000000"), ["0.50 GB   "]);
        assert_eq!(format.render(""), ["          "]);
    }
}
