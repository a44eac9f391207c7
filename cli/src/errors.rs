use panopto_client::Error as ClientError;
use std::{io, path::PathBuf};

/// Failures of an export run. Each kind maps to a distinct exit code so
/// scripted callers can tell apart network, permission, payload and
/// filesystem problems.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Could not write export artifact `{}`", path.display())]
    WriteArtifact { path: PathBuf, source: io::Error },

    #[error("Export cancelled")]
    Cancelled,
}

impl ExportError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::Client(error) => client_exit_code(error),
            ExportError::WriteArtifact { .. } => 5,
            ExportError::Cancelled => 130,
        }
    }
}

pub fn client_exit_code(error: &ClientError) -> i32 {
    match error {
        ClientError::Auth { .. } => 3,
        ClientError::BadJsonResponse(_) => 4,
        ClientError::Api { .. }
        | ClientError::BadEndpoint { .. }
        | ClientError::BadSessionCookie
        | ClientError::BuildHttpClient(_)
        | ClientError::Http { .. } => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn exit_codes_distinguish_failure_kinds() {
        assert_eq!(
            ExportError::from(ClientError::Auth {
                status_code: StatusCode::FORBIDDEN
            })
            .exit_code(),
            3
        );
        assert_eq!(
            ExportError::from(ClientError::Api {
                status_code: StatusCode::INTERNAL_SERVER_ERROR,
                message: String::new()
            })
            .exit_code(),
            2
        );
        assert_eq!(
            ExportError::WriteArtifact {
                path: PathBuf::from("out.csv"),
                source: io::Error::other("disk full")
            }
            .exit_code(),
            5
        );
        assert_eq!(ExportError::Cancelled.exit_code(), 130);
    }
}
