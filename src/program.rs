//! Program sanitizing: raw text in, a list of opcodes out.

use std::fmt;

/// One of the eight instructions understood by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `<`
    Retreat,
    /// `>`
    Advance,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[`
    LoopStart,
    /// `]`
    LoopEnd,
}

impl Op {
    /// Map an instruction symbol to its opcode. Anything else is a comment.
    pub fn from_char(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Increment),
            '-' => Some(Op::Decrement),
            '<' => Some(Op::Retreat),
            '>' => Some(Op::Advance),
            '.' => Some(Op::Output),
            ',' => Some(Op::Input),
            '[' => Some(Op::LoopStart),
            ']' => Some(Op::LoopEnd),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Op::Increment => '+',
            Op::Decrement => '-',
            Op::Retreat => '<',
            Op::Advance => '>',
            Op::Output => '.',
            Op::Input => ',',
            Op::LoopStart => '[',
            Op::LoopEnd => ']',
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Keep only instruction characters, preserving their order.
///
/// Sanitizing is idempotent: `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|&c| Op::from_char(c).is_some()).collect()
}

/// A sanitized, immutable program.
///
/// Every opcode remembers the char index it was read from so that
/// diagnostics can point back into the raw source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    ops: Vec<Op>,
    source_offsets: Vec<usize>,
}

impl Program {
    pub fn parse(raw: &str) -> Self {
        let mut ops = Vec::new();
        let mut source_offsets = Vec::new();
        for (offset, c) in raw.chars().enumerate() {
            if let Some(op) = Op::from_char(c) {
                ops.push(op);
                source_offsets.push(offset);
            }
        }
        Self { ops, source_offsets }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn get(&self, index: usize) -> Option<Op> {
        self.ops.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Char index in the raw source of the instruction at `index`.
    pub fn source_offset(&self, index: usize) -> Option<usize> {
        self.source_offsets.get(index).copied()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}
