//! Cron expression validation and normalization.
//!
//! Schedules are standard five-field cron expressions (minute, hour,
//! day-of-month, month, day-of-week). Validation is deliberately shallow:
//! it enforces field count, the allowed character set, and numeric ranges
//! for plain literal fields, while composite fields (steps, ranges, lists)
//! are accepted on the character set alone. The downstream task runner
//! owns full grammar evaluation; rejecting expressions it would accept
//! only creates false negatives here.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of fields in a supported cron expression.
pub const FIELD_COUNT: usize = 5;

/// Inclusive value range for one cron field.
struct FieldDomain {
    name: &'static str,
    min: u32,
    max: u32,
}

const FIELDS: [FieldDomain; FIELD_COUNT] = [
    FieldDomain { name: "minute", min: 0, max: 59 },
    FieldDomain { name: "hour", min: 0, max: 23 },
    FieldDomain { name: "day-of-month", min: 1, max: 31 },
    FieldDomain { name: "month", min: 1, max: 12 },
    FieldDomain { name: "day-of-week", min: 0, max: 6 },
];

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '*' | '/' | '-' | ',')
}

/// Reasons an expression fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CronError {
    #[error("expected {FIELD_COUNT} fields, got {0}")]
    FieldCount(usize),

    #[error("{field} field contains invalid character '{ch}'")]
    InvalidCharacter { field: &'static str, ch: char },

    #[error("{field} value {value} out of range {min}-{max}")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: u32,
        max: u32,
    },
}

/// A validated five-field cron expression.
///
/// Construction goes through [`CronSpec::parse`], so a value of this type
/// always satisfies the validation contract. Fields keep their original
/// spelling; [`CronSpec::normalize`] rewrites the legacy `0/N` step form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSpec {
    fields: [String; FIELD_COUNT],
}

impl CronSpec {
    /// Validates `expr` and splits it into its five fields.
    ///
    /// Leading, trailing, and repeated whitespace between fields is
    /// tolerated. Literal numeric fields are range-checked against their
    /// position; fields containing `*`, `/`, `-`, or `,` are checked for
    /// the character set only.
    pub fn parse(expr: &str) -> Result<Self, CronError> {
        let parts: Vec<&str> = expr.split_whitespace().collect();
        if parts.len() != FIELD_COUNT {
            return Err(CronError::FieldCount(parts.len()));
        }

        for (part, domain) in parts.iter().zip(FIELDS.iter()) {
            if let Some(ch) = part.chars().find(|c| !is_allowed_char(*c)) {
                return Err(CronError::InvalidCharacter {
                    field: domain.name,
                    ch,
                });
            }

            if part.chars().all(|c| c.is_ascii_digit()) {
                let out_of_range = match part.parse::<u32>() {
                    Ok(value) => value < domain.min || value > domain.max,
                    // Longer than u32 is out of range for every field.
                    Err(_) => true,
                };
                if out_of_range {
                    return Err(CronError::OutOfRange {
                        field: domain.name,
                        value: (*part).to_string(),
                        min: domain.min,
                        max: domain.max,
                    });
                }
            }
        }

        Ok(Self {
            fields: std::array::from_fn(|i| parts[i].to_string()),
        })
    }

    /// Whether `expr` passes validation.
    pub fn is_valid(expr: &str) -> bool {
        Self::parse(expr).is_ok()
    }

    /// Rewrites each `0/N` field to the canonical `*/N` step form.
    ///
    /// Some schedulers emit `0/N` for "every N"; the two are equivalent
    /// and the canonical form is what gets persisted. Already-canonical
    /// expressions pass through unchanged, so normalizing twice is a
    /// no-op.
    pub fn normalize(mut self) -> Self {
        for field in &mut self.fields {
            if let Some(step) = field.strip_prefix("0/") {
                if !step.is_empty() && step.chars().all(|c| c.is_ascii_digit()) {
                    *field = format!("*/{step}");
                }
            }
        }
        self
    }

    pub fn minute(&self) -> &str {
        &self.fields[0]
    }

    pub fn hour(&self) -> &str {
        &self.fields[1]
    }

    pub fn day_of_month(&self) -> &str {
        &self.fields[2]
    }

    pub fn month(&self) -> &str {
        &self.fields[3]
    }

    pub fn day_of_week(&self) -> &str {
        &self.fields[4]
    }

    /// Returns `(hour, minute)` when both time fields are plain literals.
    ///
    /// Composite time fields (`*/6`, `0,30`, ranges) have no single
    /// wall-clock time, so timezone conversion skips them.
    pub fn literal_time(&self) -> Option<(u8, u8)> {
        let minute = parse_literal(&self.fields[0])?;
        let hour = parse_literal(&self.fields[1])?;
        Some((hour, minute))
    }

    /// Replaces the minute and hour fields with literal values, keeping
    /// the day, month, and weekday fields as they are.
    pub fn with_time(mut self, hour: u8, minute: u8) -> Self {
        self.fields[0] = minute.to_string();
        self.fields[1] = hour.to_string();
        self
    }
}

fn parse_literal(field: &str) -> Option<u8> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

impl fmt::Display for CronSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fields.join(" "))
    }
}

impl FromStr for CronSpec {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
