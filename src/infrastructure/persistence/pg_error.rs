use crate::application::ports::RepositoryError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NOT_NULL_VIOLATION: &str = "23502";
const CHECK_VIOLATION: &str = "23514";
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Folds driver errors into the storage-agnostic taxonomy by SQLSTATE.
pub(crate) fn map_sqlx_error(error: sqlx::Error) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                RepositoryError::ConstraintViolation(db.message().to_string())
            }
            Some(FOREIGN_KEY_VIOLATION)
            | Some(NOT_NULL_VIOLATION)
            | Some(CHECK_VIOLATION)
            | Some(STRING_DATA_RIGHT_TRUNCATION) => {
                RepositoryError::InvalidData(db.message().to_string())
            }
            Some(INVALID_TEXT_REPRESENTATION) => {
                RepositoryError::InvalidIdentifier(db.message().to_string())
            }
            _ => RepositoryError::QueryFailed(error.to_string()),
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::ConnectionFailed(error.to_string())
        }
        // A stored row that no longer decodes is a server fault, not bad input.
        _ => RepositoryError::QueryFailed(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecodable_column_is_a_query_failure() {
        let error = sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: "unexpected value".into(),
        };

        assert!(matches!(
            map_sqlx_error(error),
            RepositoryError::QueryFailed(_)
        ));
    }

    #[test]
    fn decode_error_is_a_query_failure() {
        let error = sqlx::Error::Decode("bad jsonb".into());

        assert!(matches!(
            map_sqlx_error(error),
            RepositoryError::QueryFailed(_)
        ));
    }

    #[test]
    fn exhausted_pool_is_a_connection_failure() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            RepositoryError::ConnectionFailed(_)
        ));
    }
}
