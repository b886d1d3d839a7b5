use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::{AttachmentKind, FrameKind, Report};
use kernel::KernelError;
use serde::Serialize;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    details: Vec<String>,
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.current_context() {
            KernelError::Validation => StatusCode::BAD_REQUEST,
            KernelError::InvalidState | KernelError::Concurrency => StatusCode::CONFLICT,
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
            KernelError::EmptyCollection | KernelError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }

        let details = self
            .0
            .frames()
            .filter_map(|frame| match frame.kind() {
                FrameKind::Attachment(AttachmentKind::Printable(printable)) => {
                    Some(printable.to_string())
                }
                _ => None,
            })
            .collect::<Vec<_>>();
        let body = ErrorBody {
            error: self.0.current_context().to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}
