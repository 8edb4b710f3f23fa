/// Dispatch error taxonomy.
///
/// Every way a dispatch can end in an error result, from shot-count
/// preconditions through decoding. `ErrorKind` groups them coarsely.
use thiserror::Error;

use crate::backend::BackendError;
use crate::compiler::{CompileError, ScalarType};

/// Coarse classification of an [`Error`], for callers that branch on the
/// kind of failure rather than its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Source text did not compile.
    Compilation,
    /// A dispatch precondition did not hold (shot count).
    Precondition,
    /// A bound parameter does not match the program.
    Parameter,
    /// A requested register is not declared.
    MemoryRegion,
    /// The backend failed while running shots.
    Backend,
    /// Raw shot data could not be turned into typed register data.
    Decode,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompileError),

    #[error("number of shots must be positive")]
    ShotsMustBePositive,

    #[error("parameter {name} is not declared by the program")]
    ParameterNotDeclared { name: String },

    #[error("parameter {name} index {index} out of range for declared length {length}")]
    ParameterIndexOutOfRange { name: String, index: usize, length: usize },

    #[error("parameter {name} is declared as {scalar_type}, only REAL regions can be bound")]
    ParameterNotReal { name: String, scalar_type: ScalarType },

    #[error("register {name} not declared")]
    RegisterNotDeclared { name: String },

    #[error("backend {0}")]
    Backend(#[from] BackendError),

    #[error("register {name} could not be decoded: {reason}")]
    Decode { name: String, reason: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Compilation(_) => ErrorKind::Compilation,
            Self::ShotsMustBePositive => ErrorKind::Precondition,
            Self::ParameterNotDeclared { .. }
            | Self::ParameterIndexOutOfRange { .. }
            | Self::ParameterNotReal { .. } => ErrorKind::Parameter,
            Self::RegisterNotDeclared { .. } => ErrorKind::MemoryRegion,
            Self::Backend(_) => ErrorKind::Backend,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_their_kind() {
        let param = Error::ParameterNotDeclared { name: "theta".into() };
        assert!(param.to_string().starts_with("parameter theta"));

        let region = Error::RegisterNotDeclared { name: "ro".into() };
        assert_eq!(region.to_string(), "register ro not declared");

        let backend = Error::from(BackendError::Failed("lost connection".into()));
        assert!(backend.to_string().starts_with("backend "));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Error::ShotsMustBePositive.kind(), ErrorKind::Precondition);
        let compile = Error::from(CompileError::Validation { msg: "x".into() });
        assert_eq!(compile.kind(), ErrorKind::Compilation);
        let index = Error::ParameterIndexOutOfRange { name: "t".into(), index: 3, length: 1 };
        assert_eq!(index.kind(), ErrorKind::Parameter);
        let decode = Error::Decode { name: "ro".into(), reason: "missing".into() };
        assert_eq!(decode.kind(), ErrorKind::Decode);
    }
}
