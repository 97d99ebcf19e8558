use std::fmt;

/// Errors that stop a machine from loading or running.
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    /// A `[` was never closed. `position` indexes the sanitized program.
    #[error("Unmatched bracket '[' at instruction {position}")]
    UnmatchedOpeningBracket { position: usize },

    /// A `]` appeared without an open loop. `position` indexes the sanitized program.
    #[error("Unmatched bracket ']' at instruction {position}")]
    UnmatchedClosingBracket { position: usize },

    /// The I/O adapter failed while serving `.` or `,` (or a step acknowledgement).
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },
}

impl MachineError {
    /// Sanitized instruction index the error refers to.
    pub fn position(&self) -> usize {
        match self {
            MachineError::UnmatchedOpeningBracket { position }
            | MachineError::UnmatchedClosingBracket { position } => *position,
            MachineError::Io { ip, .. } => *ip,
        }
    }

    /// The unmatched side for structural errors, `None` for runtime failures.
    pub fn bracket_kind(&self) -> Option<BracketKind> {
        match self {
            MachineError::UnmatchedOpeningBracket { .. } => Some(BracketKind::Open),
            MachineError::UnmatchedClosingBracket { .. } => Some(BracketKind::Close),
            MachineError::Io { .. } => None,
        }
    }
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}
