use std::fmt;

use crate::config::MachineConfig;

/// Value stored in a single tape cell.
pub type Cell = i64;

/// The machine's memory: a growable row of cells and a pointer into it.
///
/// A fresh tape holds exactly one zero cell. Cells are appended on demand as
/// the pointer moves right, unless `max_memory_size` caps the length, in which
/// case stepping past the last allowed cell wraps the pointer to 0. The
/// pointer never leaves `[0, len - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Cell>,
    pointer: usize,
    max_size: Option<usize>,
    max_value: Option<Cell>,
}

impl Tape {
    /// An unbounded tape.
    pub fn new() -> Self {
        Self::with_config(&MachineConfig::default())
    }

    pub fn with_config(config: &MachineConfig) -> Self {
        Self {
            cells: vec![0],
            pointer: 0,
            // a zero-length tape cannot hold the pointer
            max_size: config.max_memory_size.map(|n| n.max(1)),
            max_value: config.max_memory_value,
        }
    }

    pub fn read(&self) -> Cell {
        self.cells[self.pointer]
    }

    pub fn write(&mut self, value: Cell) {
        self.cells[self.pointer] = value;
    }

    /// Move the pointer one cell right, growing or wrapping as configured.
    pub fn advance(&mut self) {
        let next = self.pointer + 1;
        if let Some(max) = self.max_size {
            if next >= max {
                self.pointer = 0;
                return;
            }
        }
        if next == self.cells.len() {
            self.cells.push(0);
        }
        self.pointer = next;
    }

    /// Move the pointer one cell left; stays put at 0.
    pub fn retreat(&mut self) {
        if self.pointer > 0 {
            self.pointer -= 1;
        }
    }

    /// Add one to the current cell, wrapping to 0 at `max_memory_value`.
    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        match self.max_value {
            Some(max) if *cell == max => *cell = 0,
            _ => *cell = cell.saturating_add(1),
        }
    }

    /// Subtract one from the current cell. There is no lower wraparound.
    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.saturating_sub(1);
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "]")
    }
}
