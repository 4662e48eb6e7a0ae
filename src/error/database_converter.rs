use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintParser};

/// Utility for converting database errors to structured AppError variants.
///
/// This converter handles Diesel database errors and transforms them into
/// appropriate AppError variants with structured information extracted from
/// constraint violation messages. The tables here carry no foreign keys, so
/// referential violations fall through to the generic database error.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info, operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: Box<dyn diesel::result::DatabaseErrorInformation + Send + Sync>,
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let constraint_name = info.constraint_name();

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                if let Some((entity, field, value)) =
                    ConstraintParser::parse_unique_violation(message, constraint_name)
                {
                    AppError::Duplicate {
                        entity,
                        field,
                        value,
                    }
                } else {
                    AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Unique constraint violation: {}",
                            message
                        )),
                    }
                }
            }
            DatabaseErrorKind::NotNullViolation => {
                if let Some((entity, field)) =
                    ConstraintParser::parse_not_null_violation(message, constraint_name)
                {
                    AppError::Validation {
                        field,
                        reason: format!("Field is required for {}", entity),
                    }
                } else {
                    AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Not null constraint violation: {}",
                            message
                        )),
                    }
                }
            }
            DatabaseErrorKind::CheckViolation => {
                if let Some((entity, field)) =
                    ConstraintParser::parse_check_violation(message, constraint_name)
                {
                    AppError::Validation {
                        field,
                        reason: format!("Check constraint failed for {} field", entity),
                    }
                } else {
                    AppError::Database {
                        operation: operation.to_string(),
                        source: anyhow::Error::msg(format!(
                            "Check constraint violation: {}",
                            message
                        )),
                    }
                }
            }
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Database error: {}", message)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mock database error information for testing
    struct MockDatabaseErrorInfo {
        message: String,
        constraint_name: Option<String>,
    }

    impl diesel::result::DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[test]
    fn converts_not_found() {
        let result =
            DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find task");

        match result {
            AppError::NotFound {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "resource");
                assert_eq!(field, "id");
                assert_eq!(value, "unknown");
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn converts_descriptor_name_collision_to_duplicate() {
        let info = MockDatabaseErrorInfo {
            message: "duplicate key value violates unique constraint \"periodic_tasks_name_key\"\nDETAIL: Key (name)=(recron_epg_7) already exists.".to_string(),
            constraint_name: Some("periodic_tasks_name_key".to_string()),
        };
        let error = DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(info));

        let result = DatabaseErrorConverter::convert_diesel_error(error, "insert periodic task");

        match result {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "periodic_tasks");
                assert_eq!(field, "name");
                assert_eq!(value, "recron_epg_7");
            }
            _ => panic!("Expected Duplicate error, got: {:?}", result),
        }
    }

    #[test]
    fn converts_not_null_violation_to_validation() {
        let info = MockDatabaseErrorInfo {
            message: "null value in column \"cron_expression\" of relation \"periodic_tasks\" violates not-null constraint".to_string(),
            constraint_name: None,
        };
        let error = DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, Box::new(info));

        let result = DatabaseErrorConverter::convert_diesel_error(error, "insert periodic task");

        match result {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "cron_expression");
                assert!(reason.contains("required"));
                assert!(reason.contains("periodic_tasks"));
            }
            _ => panic!("Expected Validation error, got: {:?}", result),
        }
    }

    #[test]
    fn converts_check_violation_to_validation() {
        let info = MockDatabaseErrorInfo {
            message: "new row for relation \"schedule_settings\" violates check constraint \"schedule_settings_data_check\"".to_string(),
            constraint_name: Some("schedule_settings_data_check".to_string()),
        };
        let error = DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, Box::new(info));

        let result = DatabaseErrorConverter::convert_diesel_error(error, "save settings");

        match result {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "data");
                assert!(reason.contains("Check constraint failed"));
            }
            _ => panic!("Expected Validation error, got: {:?}", result),
        }
    }

    #[test]
    fn other_database_errors_keep_the_operation_context() {
        let info = MockDatabaseErrorInfo {
            message: "deadlock detected".to_string(),
            constraint_name: None,
        };
        let error =
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, Box::new(info));

        let result = DatabaseErrorConverter::convert_diesel_error(error, "upsert periodic task");

        match result {
            AppError::Database { operation, .. } => {
                assert_eq!(operation, "upsert periodic task");
            }
            _ => panic!("Expected Database error, got: {:?}", result),
        }
    }
}
