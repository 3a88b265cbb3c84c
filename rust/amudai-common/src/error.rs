use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns `true` if this error was raised because an allocation request
    /// could not be satisfied.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfMemory { .. })
    }

    pub fn out_of_memory(size: usize, alignment: usize) -> Error {
        Error(ErrorKind::OutOfMemory { size, alignment }.into())
    }

    pub fn capacity_overflow(requested: impl Into<String>) -> Error {
        Error(
            ErrorKind::CapacityOverflow {
                requested: requested.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("out of memory: failed to allocate {size} bytes (alignment {alignment})")]
    OutOfMemory { size: usize, alignment: usize },

    #[error("capacity overflow: {requested}")]
    CapacityOverflow { requested: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        let kind = match e.kind() {
            ErrorKind::OutOfMemory { .. } | ErrorKind::CapacityOverflow { .. } => {
                std::io::ErrorKind::OutOfMemory
            }
            ErrorKind::InvalidArgument { .. } => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_memory_display() {
        let e = Error::out_of_memory(4096, 16);
        assert!(e.is_out_of_memory());
        assert_eq!(
            e.to_string(),
            "out of memory: failed to allocate 4096 bytes (alignment 16)"
        );
    }

    #[test]
    fn test_capacity_overflow_kind() {
        let e = Error::capacity_overflow("usize::MAX + 31");
        assert!(!e.is_out_of_memory());
        match e.into_kind() {
            ErrorKind::CapacityOverflow { requested } => assert_eq!(requested, "usize::MAX + 31"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_into_io_error() {
        let io: std::io::Error = Error::out_of_memory(1, 1).into();
        assert_eq!(io.kind(), std::io::ErrorKind::OutOfMemory);

        let io: std::io::Error = Error::invalid_arg("alignment", "must be a power of two").into();
        assert_eq!(io.kind(), std::io::ErrorKind::InvalidInput);

        let io: std::io::Error = Error::capacity_overflow("2 * usize::MAX bytes").into();
        assert_eq!(io.kind(), std::io::ErrorKind::OutOfMemory);
        let inner = io.into_inner().unwrap().downcast::<Error>().unwrap();
        assert!(matches!(inner.kind(), ErrorKind::CapacityOverflow { .. }));
    }
}
