use std::io::{self, Write};

use crate::error::MachineError;
use crate::program::Program;

/// Pretty-print a [`MachineError`] with a caret under the offending source character.
/// If `program` is `Some("bfvm")`, messages are prefixed with "bfvm: ...".
pub fn print_machine_error(program: Option<&str>, source: &str, err: &MachineError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    let msg = match err {
        MachineError::UnmatchedOpeningBracket { .. } | MachineError::UnmatchedClosingBracket { .. } => {
            let kind = err.bracket_kind().map(|k| k.to_string()).unwrap_or_default();
            prefix_program(&format!("Parse error: unmatched bracket {kind}"))
        }
        MachineError::Io { source, .. } => prefix_program(&format!("I/O error: {source}")),
    };

    print_error_with_context(&msg, source, err.position(), source_offset(source, err));
}

/// Char offset in `source` of the instruction `err` points at.
///
/// Positions count sanitized instructions. A position past the last
/// instruction (a failed final flush) maps to the end of the source.
pub fn source_offset(source: &str, err: &MachineError) -> usize {
    Program::parse(source)
        .source_offset(err.position())
        .unwrap_or_else(|| source.chars().count())
}

/// Print a concise error with instruction index and a caret context window,
/// working with UTF-8 by slicing using char indices.
pub fn print_error_with_context(prefix: &str, code: &str, instruction: usize, offset: usize) {
    eprintln!("{prefix} at instruction {instruction}");
    eprintln!("{}", context_window(code, offset));
    let _ = io::stderr().flush();
}

/// Source line fragment around `offset` plus a caret line underneath.
pub fn context_window(code: &str, offset: usize) -> String {
    const WINDOW_CHARS: usize = 32;

    let chars: Vec<char> = code.chars().collect();
    let offset = offset.min(chars.len());
    let start = offset.saturating_sub(WINDOW_CHARS);
    let end = (offset + WINDOW_CHARS + 1).min(chars.len());

    // Newlines would break the caret alignment
    let slice: String = chars[start..end]
        .iter()
        .map(|&c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();
    let underline = format!("{}^", " ".repeat(offset - start));

    format!("  {slice}\n  {underline}")
}
