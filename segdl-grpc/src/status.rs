use segdl_core::SegdlError;
use tonic::{Code, Status};

/// Server side: how a domain failure is reported to the caller.
pub fn status_from(err: SegdlError) -> Status {
    match err {
        SegdlError::InvalidArgument(msg) => Status::invalid_argument(msg),
        e @ SegdlError::InvalidRange { .. } => Status::invalid_argument(e.to_string()),
        SegdlError::NotFound(msg) => Status::not_found(msg),
        SegdlError::Cancelled => Status::cancelled("segment stream cancelled"),
        SegdlError::Io(e) => Status::internal(format!("I/O error: {e}")),
        SegdlError::Transport(msg) => Status::unavailable(msg),
        SegdlError::Config(msg) | SegdlError::Internal(msg) => Status::internal(msg),
    }
}

/// Client side: folds an RPC status back into the domain taxonomy.
pub fn error_from_status(status: Status) -> SegdlError {
    match status.code() {
        Code::NotFound => SegdlError::NotFound(status.message().to_string()),
        Code::InvalidArgument | Code::OutOfRange => {
            SegdlError::InvalidArgument(status.message().to_string())
        }
        code => SegdlError::Transport(format!("{code:?}: {}", status.message())),
    }
}

pub fn error_from_transport(err: tonic::transport::Error) -> SegdlError {
    SegdlError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_codes() {
        assert_eq!(
            status_from(SegdlError::NotFound("x".into())).code(),
            Code::NotFound
        );
        assert_eq!(
            status_from(SegdlError::InvalidRange {
                index: 9,
                total: 2,
                file_size: 10
            })
            .code(),
            Code::InvalidArgument
        );
        assert_eq!(status_from(SegdlError::Cancelled).code(), Code::Cancelled);
        assert_eq!(
            status_from(std::io::Error::other("disk").into()).code(),
            Code::Internal
        );
    }

    #[test]
    fn statuses_map_back_to_domain_errors() {
        assert!(error_from_status(Status::not_found("gone")).is_not_found());
        assert!(matches!(
            error_from_status(Status::out_of_range("bad")),
            SegdlError::InvalidArgument(_)
        ));
        match error_from_status(Status::unavailable("reset")) {
            SegdlError::Transport(msg) => assert!(msg.contains("reset")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
