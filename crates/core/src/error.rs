use textcloud_files::FilesError;
use tonic::{Code, Status};

/// Error taxonomy shared by every service boundary.
///
/// Causes are carried as messages so that an error can cross an RPC hop and come back out as
/// the same variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("storage failure: {0}")]
    Persistence(String),
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("word cloud rendering failed: {0}")]
    Render(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    /// Rebuilds a `ServiceError` from a status returned by a backend.
    ///
    /// `Code::Internal` is ambiguous on its own: the storage service uses it for persistence
    /// failures and the analysis service for render failures. The caller says which one applies
    /// through `internal`. Everything that is not a recognised domain code means the backend
    /// could not be reached or did not answer in time.
    pub fn from_status(status: Status, internal: fn(String) -> ServiceError) -> Self {
        let message = status.message().to_string();
        match status.code() {
            Code::NotFound => ServiceError::NotFound(message),
            Code::InvalidArgument => ServiceError::InvalidRequest(message),
            Code::Internal => internal(message),
            Code::DeadlineExceeded => {
                ServiceError::UpstreamUnavailable(format!("deadline exceeded: {}", message))
            }
            code => ServiceError::UpstreamUnavailable(format!("{:?}: {}", code, message)),
        }
    }
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => Status::not_found(msg),
            ServiceError::Persistence(msg) => Status::internal(msg),
            ServiceError::UpstreamUnavailable(msg) => Status::unavailable(msg),
            ServiceError::Render(msg) => Status::internal(msg),
            ServiceError::InvalidRequest(msg) => Status::invalid_argument(msg),
        }
    }
}

impl From<FilesError> for ServiceError {
    fn from(err: FilesError) -> Self {
        match err {
            FilesError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Persistence(other.to_string()),
        }
    }
}

/// Invalid startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_survive_status_round_trip() {
        let cases: Vec<(ServiceError, fn(String) -> ServiceError)> = vec![
            (
                ServiceError::NotFound("abc".into()),
                ServiceError::Persistence,
            ),
            (
                ServiceError::InvalidRequest("no id".into()),
                ServiceError::Persistence,
            ),
            (ServiceError::Persistence("disk full".into()), ServiceError::Persistence),
            (ServiceError::Render("bad gateway".into()), ServiceError::Render),
        ];

        for (err, internal) in cases {
            let status: Status = err.clone().into();
            assert_eq!(ServiceError::from_status(status, internal), err);
        }
    }

    #[test]
    fn test_unavailable_maps_to_upstream_unavailable() {
        let status: Status = ServiceError::UpstreamUnavailable("down".into()).into();
        assert_eq!(status.code(), Code::Unavailable);

        let err = ServiceError::from_status(status, ServiceError::Persistence);
        assert!(matches!(err, ServiceError::UpstreamUnavailable(_)));
    }

    #[test]
    fn test_transport_level_codes_are_upstream_unavailable() {
        for status in [
            Status::deadline_exceeded("slow"),
            Status::cancelled("gone"),
            Status::unknown("transport error"),
            Status::unimplemented("old server"),
        ] {
            let err = ServiceError::from_status(status, ServiceError::Render);
            assert!(
                matches!(err, ServiceError::UpstreamUnavailable(_)),
                "got {:?}",
                err
            );
        }
    }

    #[test]
    fn test_internal_is_interpreted_per_service() {
        let storage = ServiceError::from_status(Status::internal("x"), ServiceError::Persistence);
        let analysis = ServiceError::from_status(Status::internal("x"), ServiceError::Render);

        assert_eq!(storage, ServiceError::Persistence("x".into()));
        assert_eq!(analysis, ServiceError::Render("x".into()));
    }

    #[test]
    fn test_files_errors_map_into_taxonomy() {
        let not_found: ServiceError = FilesError::NotFound("abc".into()).into();
        assert_eq!(not_found, ServiceError::NotFound("abc".into()));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let persistence: ServiceError = FilesError::Persistence {
            path: "/data/abc".into(),
            source: io,
        }
        .into();
        match persistence {
            ServiceError::Persistence(msg) => assert!(msg.contains("denied")),
            other => panic!("Expected Persistence, got {:?}", other),
        }
    }
}
