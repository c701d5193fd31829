use chrono::{FixedOffset, Local};

use crate::errors::ConfigError;
use crate::record::Record;

/// Console line layout: ISO8601 timestamp with millis and offset, then pid,
/// tid, level and source line in fixed-width columns, then the message.
pub const DEFAULT_TEMPLATE: &str = "{timestamp} | {pid} | {tid} | {level} | {line} | {message}";

const LEVEL_WIDTH: usize = 8;
const PID_WIDTH: usize = 8;
const TID_WIDTH: usize = 16;
const LINE_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Timestamp,
    TzOffset,
    Pid,
    Tid,
    Level,
    Line,
    Message,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "timestamp" => Some(Field::Timestamp),
            "tz_offset" => Some(Field::TzOffset),
            "pid" => Some(Field::Pid),
            "tid" => Some(Field::Tid),
            "level" => Some(Field::Level),
            "line" => Some(Field::Line),
            "message" => Some(Field::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Compiled template. Parsing happens once at construction so a malformed
/// template is caught at setup, and rendering itself can never fail.
#[derive(Debug, Clone)]
pub struct Formatter {
    segments: Vec<Segment>,
    cached_offset: FixedOffset,
    offset_text: String,
}

impl Formatter {
    pub fn new(template: &str) -> Result<Self, ConfigError> {
        Self::with_offset(template, *Local::now().offset())
    }

    /// The offset is captured once here and reused for every record. That
    /// keeps rendering free of per-record timezone lookups, but the offset
    /// goes stale across a DST change in a long-lived process.
    pub fn with_offset(template: &str, offset: FixedOffset) -> Result<Self, ConfigError> {
        let segments = parse(template)?;

        Ok(Self {
            segments,
            cached_offset: offset,
            offset_text: offset_text(offset),
        })
    }

    pub fn render(&self, record: &Record) -> String {
        let mut out = String::with_capacity(64 + record.message.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => self.render_field(&mut out, *field, record),
            }
        }

        out
    }

    fn render_field(&self, out: &mut String, field: Field, record: &Record) {
        match field {
            Field::Timestamp => {
                let local = record.timestamp.with_timezone(&self.cached_offset);
                out.push_str(&local.format("%Y-%m-%dT%H:%M:%S%.3f").to_string());
                out.push_str(&self.offset_text);
            }
            Field::TzOffset => out.push_str(&self.offset_text),
            Field::Pid => pad(out, &record.pid.to_string(), PID_WIDTH),
            Field::Tid => pad(out, &record.tid.to_string(), TID_WIDTH),
            Field::Level => pad(out, record.severity.as_str(), LEVEL_WIDTH),
            Field::Line => pad(out, &record.line.to_string(), LINE_WIDTH),
            Field::Message => out.push_str(&record.message),
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter::new(DEFAULT_TEMPLATE).expect("default template is well formed")
    }
}

fn parse(template: &str) -> Result<Vec<Segment>, ConfigError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        if ch != '{' {
            literal.push(ch);
            continue;
        }

        if let Some(&(_, '{')) = chars.peek() {
            chars.next();
            literal.push('{');
            continue;
        }

        let mut name = String::new();
        let mut terminated = false;
        for (_, c) in chars.by_ref() {
            if c == '}' {
                terminated = true;
                break;
            }
            name.push(c);
        }

        if !terminated {
            return Err(ConfigError::UnterminatedPlaceholder { position });
        }

        match Field::from_name(&name) {
            Some(field) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(field));
            }
            // Unrecognized names stay in the output verbatim.
            None => {
                literal.push('{');
                literal.push_str(&name);
                literal.push('}');
            }
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

fn offset_text(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();

    format!("{}{:02}{:02}", sign, secs / 3600, secs % 3600 / 60)
}

// Left-aligned, space-padded, truncated past the column width. Every padded
// value is ASCII so byte slicing is safe.
fn pad(out: &mut String, value: &str, width: usize) {
    if value.len() >= width {
        out.push_str(&value[..width]);
    } else {
        out.push_str(value);
        out.extend(std::iter::repeat(' ').take(width - value.len()));
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::severity::Severity;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn sample_record() -> Record {
        Record {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
            pid: 42,
            tid: 7,
            severity: Severity::Info,
            line: 12,
            message: "hello".to_string(),
        }
    }

    #[test]
    fn renders_default_template_with_fixed_columns() {
        let formatter = Formatter::with_offset(DEFAULT_TEMPLATE, utc()).unwrap();

        let rendered = formatter.render(&sample_record());

        assert_eq!(
            rendered,
            "2024-03-05T12:00:00.000+0000 | 42       | 7                | INFO     | 12   | hello"
        );
    }

    #[test]
    fn round_trips_fixed_width_fields() {
        let formatter = Formatter::with_offset(DEFAULT_TEMPLATE, utc()).unwrap();
        let record = sample_record();

        let rendered = formatter.render(&record);
        let fields: Vec<&str> = rendered.split(" | ").collect();

        assert_eq!(fields.len(), 6);
        assert_eq!(fields[1].trim_end().parse::<u32>().unwrap(), record.pid);
        assert_eq!(fields[2].trim_end().parse::<u64>().unwrap(), record.tid);
        assert_eq!(fields[3].trim_end(), record.severity.as_str());
        assert_eq!(fields[4].trim_end().parse::<u32>().unwrap(), record.line);
        assert_eq!(fields[5], record.message);
    }

    #[test]
    fn critical_exactly_fills_the_level_column() {
        let formatter = Formatter::with_offset("{level}|", utc()).unwrap();
        let mut record = sample_record();
        record.severity = Severity::Critical;

        assert_eq!(formatter.render(&record), "CRITICAL|");
    }

    #[test]
    fn over_width_values_are_truncated() {
        let formatter = Formatter::with_offset("{tid}|", utc()).unwrap();
        let mut record = sample_record();
        record.tid = 99_999_999_999_999_999;

        assert_eq!(formatter.render(&record), "9999999999999999|");
    }

    #[test]
    fn negative_offsets_render_with_sign_and_minutes() {
        let offset = FixedOffset::west_opt(4 * 3600 + 30 * 60).unwrap();
        let formatter = Formatter::with_offset("{tz_offset}", offset).unwrap();

        assert_eq!(formatter.render(&sample_record()), "-0430");
    }

    #[test]
    fn timestamp_uses_the_offset_cached_at_construction() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let formatter = Formatter::with_offset("{timestamp}", offset).unwrap();

        let rendered = formatter.render(&sample_record());

        assert_eq!(rendered, "2024-03-05T14:00:00.000+0200");
    }

    #[test]
    fn unrecognized_placeholders_pass_through_literally() {
        let formatter = Formatter::with_offset("{widget} {message}", utc()).unwrap();

        assert_eq!(formatter.render(&sample_record()), "{widget} hello");
    }

    #[test]
    fn double_brace_escapes_a_literal_brace() {
        let formatter = Formatter::with_offset("{{{message}", utc()).unwrap();

        assert_eq!(formatter.render(&sample_record()), "{hello");
    }

    #[test]
    fn unterminated_placeholder_fails_at_construction() {
        let err = Formatter::with_offset("{unterminated", utc()).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::UnterminatedPlaceholder { position: 0 }
        ));
    }
}
