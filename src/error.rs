use thiserror::Error;

use crate::core::process::Pid;

/// Fatal simulation errors. Each of these indicates corrupt input data or an
/// internal accounting bug; the run aborts instead of masking the condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    /// A lookup named a process id that was never added to the table.
    #[error("lost process {0}")]
    UnknownProcess(Pid),
    /// Two `p` directives defined the same process id.
    #[error("process {0} defined twice")]
    DuplicateProcess(Pid),
    /// A core was freed while none were busy.
    #[error("core pool underflow: freed a core while none were busy")]
    ResourceUnderflow,
}

pub type SimResult<T> = Result<T, SimError>;
