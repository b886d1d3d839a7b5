use error_stack::Report;
use kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("database operation failed")]
    SqlX,
    #[error("timed out waiting for a database connection")]
    Timeout,
    #[error("row already exists")]
    Conflict,
    #[error("environment variable is not available")]
    Env,
    #[error("stored value cannot be converted into an entity")]
    Conversion,
}

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

impl From<&sqlx::Error> for DriverError {
    fn from(value: &sqlx::Error) -> Self {
        match value {
            sqlx::Error::PoolTimedOut => DriverError::Timeout,
            sqlx::Error::Database(error) if error.is_unique_violation() => DriverError::Conflict,
            sqlx::Error::Database(error) => DriverError::from_sqlstate(error.code().as_deref()),
            _ => DriverError::SqlX,
        }
    }
}

impl DriverError {
    /// Transactions aborted by the server to break a lock cycle are conflicts.
    fn from_sqlstate(code: Option<&str>) -> Self {
        match code {
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED) => DriverError::Conflict,
            _ => DriverError::SqlX,
        }
    }
}

/// Folds driver failures into the kernel's error vocabulary.
pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, Report<DriverError>> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|report| {
            let context = match report.current_context() {
                DriverError::Timeout => KernelError::Timeout,
                DriverError::Conflict => KernelError::Concurrency,
                DriverError::SqlX | DriverError::Env | DriverError::Conversion => {
                    KernelError::Internal
                }
            };
            report.change_context(context)
        })
    }
}

impl<T> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.classify().convert_error()
    }
}

pub(crate) trait SqlxResultExt {
    type Ok;
    fn classify(self) -> Result<Self::Ok, Report<DriverError>>;
}

impl<T> SqlxResultExt for Result<T, sqlx::Error> {
    type Ok = T;
    fn classify(self) -> Result<T, Report<DriverError>> {
        self.map_err(|error| {
            let context = DriverError::from(&error);
            Report::new(error).change_context(context)
        })
    }
}
