use crate::error::MachineError;
use crate::program::{Op, Program};

/// Matching loop positions, resolved once before execution.
///
/// `jumps[i]` holds the partner of the bracket at `i`; non-bracket positions are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    jumps: Vec<Option<usize>>,
    pairs: usize,
}

impl BracketTable {
    pub fn build(program: &Program) -> Result<Self, MachineError> {
        let mut jumps = vec![None; program.len()];
        let mut stack: Vec<usize> = Vec::new();
        let mut pairs = 0;

        for (i, op) in program.ops().iter().enumerate() {
            match op {
                Op::LoopStart => stack.push(i),
                Op::LoopEnd => {
                    let Some(open) = stack.pop() else {
                        return Err(MachineError::UnmatchedClosingBracket { position: i });
                    };
                    jumps[open] = Some(i);
                    jumps[i] = Some(open);
                    pairs += 1;
                }
                _ => {}
            }
        }

        if let Some(&open) = stack.last() {
            return Err(MachineError::UnmatchedOpeningBracket { position: open });
        }

        Ok(Self { jumps, pairs })
    }

    /// Matching `]` for the `[` at `open`.
    pub fn closing_for(&self, open: usize) -> Option<usize> {
        self.jumps.get(open).copied().flatten().filter(|&close| close > open)
    }

    /// Matching `[` for the `]` at `close`.
    pub fn opening_for(&self, close: usize) -> Option<usize> {
        self.jumps.get(close).copied().flatten().filter(|&open| open < close)
    }

    /// Number of loop pairs.
    pub fn len(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }
}
