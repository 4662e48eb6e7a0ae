use std::sync::OnceLock;

use regex::Regex;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// This parser uses regex patterns to extract structured information from
/// database constraint violation messages, with caching for performance.
/// Constraint names are resolved against the tables this service touches,
/// so two-word names like `periodic_tasks` split correctly.
pub struct ConstraintParser;

/// Compiled regex patterns for constraint parsing, cached for performance
struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Matches "Key (field)=(value)" pattern in PostgreSQL messages
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            // Matches column names in quotes
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
            // Matches table names in quotes
            table_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).unwrap(),
        }
    }
}

/// Global regex patterns cache
static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

/// Tables this service reads or writes, longest names first so prefix
/// matching against constraint names is unambiguous.
const KNOWN_TABLES: [&str; 4] = [
    "playlist_accounts",
    "schedule_settings",
    "periodic_tasks",
    "epg_sources",
];

impl ConstraintParser {
    /// Gets the cached regex patterns, initializing them if necessary
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique constraint violation message to extract structured
    /// information.
    ///
    /// The interesting case here is `periodic_tasks_name_key`, raised when
    /// two writers race to create the same descriptor.
    ///
    /// # Returns
    /// Optional tuple of (entity, field, value) if parsing succeeds
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        // Try to parse from constraint name first (e.g., "periodic_tasks_name_key")
        if let Some(constraint) = constraint_name {
            if let Some((entity, field)) = Self::parse_constraint_name(constraint) {
                if let Some(value) = Self::extract_value_from_message(message) {
                    return Some((entity, field, value));
                }
                // Fallback to generic value if we can't parse it
                return Some((entity, field, "duplicate_value".to_string()));
            }
        }

        // Fallback: try to parse from the error message directly
        if let Some((field, value)) = Self::extract_key_value_from_message(message) {
            let entity =
                Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
            return Some((entity, field, value));
        }

        None
    }

    /// Parses a not null constraint violation message.
    ///
    /// # Returns
    /// Optional tuple of (entity, field) if parsing succeeds
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(field) = Self::extract_column_from_message(message) {
            let entity = Self::extract_table_from_message(message)
                .or_else(|| {
                    constraint_name.and_then(|c| Self::parse_constraint_name(c).map(|(e, _)| e))
                })
                .unwrap_or_else(|| "resource".to_string());
            return Some((entity, field));
        }

        None
    }

    /// Parses a check constraint violation message.
    ///
    /// # Returns
    /// Optional tuple of (entity, field) if parsing succeeds
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(constraint) = constraint_name {
            if let Some((entity, field)) = Self::parse_constraint_name(constraint) {
                return Some((entity, field));
            }
        }

        if let Some(field) = Self::extract_column_from_message(message) {
            let entity =
                Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
            return Some((entity, field));
        }

        None
    }

    /// Parses a constraint name to extract entity and field information.
    ///
    /// Known table names are matched as whole prefixes, so
    /// "periodic_tasks_name_key" resolves to ("periodic_tasks", "name")
    /// rather than splitting inside the table name. Unknown tables fall
    /// back to a single-word split.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = constraint_name
            .strip_suffix("_key")
            .or_else(|| constraint_name.strip_suffix("_check"))
            .or_else(|| constraint_name.strip_suffix("_idx"))?;

        for table in KNOWN_TABLES {
            if let Some(field) = stem
                .strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                if !field.is_empty() {
                    return Some((table.to_string(), field.to_string()));
                }
            }
        }

        let (table, field) = stem.split_once('_')?;
        if table.is_empty() || field.is_empty() {
            return None;
        }
        Some((table.to_string(), field.to_string()))
    }

    /// Extracts a column name from a database error message using regex.
    pub fn extract_column_from_message(message: &str) -> Option<String> {
        let patterns = Self::patterns();
        patterns
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts a table name from a database error message using regex.
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        let patterns = Self::patterns();
        patterns
            .table_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extracts key-value pairs from database error messages using regex.
    ///
    /// Looks for patterns like "Key (field)=(value)" in PostgreSQL
    /// messages.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let patterns = Self::patterns();
        patterns.key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }

    /// Extracts a value from a database error message.
    ///
    /// First tries the Key (field)=(value) pattern, then falls back to the
    /// first quoted string.
    pub fn extract_value_from_message(message: &str) -> Option<String> {
        if let Some((_, value)) = Self::extract_key_value_from_message(message) {
            return Some(value);
        }

        if let Some(start) = message.find('"') {
            if let Some(end) = message[start + 1..].find('"') {
                return Some(message[start + 1..start + 1 + end].to_string());
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_descriptor_name_unique_violation() {
        let message = "duplicate key value violates unique constraint \"periodic_tasks_name_key\"\nDETAIL: Key (name)=(recron_epg_7) already exists.";
        let result =
            ConstraintParser::parse_unique_violation(message, Some("periodic_tasks_name_key"));
        assert_eq!(
            result,
            Some((
                "periodic_tasks".to_string(),
                "name".to_string(),
                "recron_epg_7".to_string()
            ))
        );
    }

    #[test]
    fn parses_unique_violation_without_constraint_name() {
        let message = "duplicate key value violates unique constraint\nDETAIL: Key (name)=(recron_playlist_3) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, None);
        assert_eq!(
            result,
            Some((
                "resource".to_string(),
                "name".to_string(),
                "recron_playlist_3".to_string()
            ))
        );
    }

    #[test]
    fn parses_not_null_violation() {
        let message = "null value in column \"cron_expression\" violates not-null constraint";
        let result = ConstraintParser::parse_not_null_violation(message, None);
        assert_eq!(
            result,
            Some(("resource".to_string(), "cron_expression".to_string()))
        );
    }

    #[test]
    fn not_null_violation_picks_up_the_relation() {
        let message = "null value in column \"task\" of relation \"periodic_tasks\" violates not-null constraint";
        let result = ConstraintParser::parse_not_null_violation(message, None);
        assert_eq!(
            result,
            Some(("periodic_tasks".to_string(), "task".to_string()))
        );
    }

    #[test]
    fn parses_check_violation_from_constraint_name() {
        let message =
            "new row for relation \"schedule_settings\" violates check constraint \"schedule_settings_data_check\"";
        let result =
            ConstraintParser::parse_check_violation(message, Some("schedule_settings_data_check"));
        assert_eq!(
            result,
            Some(("schedule_settings".to_string(), "data".to_string()))
        );
    }

    #[test]
    fn known_tables_split_as_whole_prefixes() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("periodic_tasks_name_key"),
            Some(("periodic_tasks".to_string(), "name".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("epg_sources_url_idx"),
            Some(("epg_sources".to_string(), "url".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("playlist_accounts_server_url_key"),
            Some(("playlist_accounts".to_string(), "server_url".to_string()))
        );
    }

    #[test]
    fn unknown_tables_fall_back_to_single_word_split() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("channels_number_key"),
            Some(("channels".to_string(), "number".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("invalid"), None);
        assert_eq!(ConstraintParser::parse_constraint_name("nosuffix_name"), None);
    }

    #[test]
    fn extracts_column_from_message() {
        let message = "null value in column \"args\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::extract_column_from_message(message),
            Some("args".to_string())
        );
        assert_eq!(
            ConstraintParser::extract_column_from_message("no column found here"),
            None
        );
    }

    #[test]
    fn extracts_table_from_message() {
        let message = "insert or update on table \"periodic_tasks\" violates constraint";
        assert_eq!(
            ConstraintParser::extract_table_from_message(message),
            Some("periodic_tasks".to_string())
        );
        assert_eq!(
            ConstraintParser::extract_table_from_message("no table found here"),
            None
        );
    }

    #[test]
    fn extracts_key_value_pairs() {
        let message = "DETAIL: Key (name)=(recron_epg_7) already exists.";
        assert_eq!(
            ConstraintParser::extract_key_value_from_message(message),
            Some(("name".to_string(), "recron_epg_7".to_string()))
        );
    }

    #[test]
    fn value_extraction_falls_back_to_quoted_strings() {
        let message = "Key (name)=(recron_epg_1) already exists";
        assert_eq!(
            ConstraintParser::extract_value_from_message(message),
            Some("recron_epg_1".to_string())
        );

        let message = "some error with \"quoted_value\" in it";
        assert_eq!(
            ConstraintParser::extract_value_from_message(message),
            Some("quoted_value".to_string())
        );
    }

    #[test]
    fn regex_patterns_are_cached() {
        let patterns1 = ConstraintParser::patterns();
        let patterns2 = ConstraintParser::patterns();
        assert!(std::ptr::eq(patterns1, patterns2));
    }

    #[test]
    fn unrelated_messages_parse_to_none() {
        let message = "completely unrelated error message";
        assert_eq!(ConstraintParser::parse_unique_violation(message, None), None);
        assert_eq!(ConstraintParser::parse_not_null_violation(message, None), None);
        assert_eq!(ConstraintParser::parse_check_violation(message, None), None);
    }
}
