use nova_types::ExecutableId;

pub type Result<T> = std::result::Result<T, TypeGraphError>;

/// Construction-time failures.
///
/// Navigation over a built [`crate::TypeNode`] never fails: missing structure is reported as the
/// empty node or an empty slice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeGraphError {
    #[error("parameter index {index} is out of range: must be between -1 and {max}")]
    InvalidIndex { index: i32, max: i32 },

    #[error("unknown executable #{}", .0.to_raw())]
    UnknownExecutable(ExecutableId),

    #[error("executable #{} is not a {expected}", .executable.to_raw())]
    ExecutableKindMismatch {
        executable: ExecutableId,
        expected: &'static str,
    },
}
