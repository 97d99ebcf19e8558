//! A small Brainfuck virtual machine.
//!
//! Programs are sanitized down to the eight instruction symbols, their loops
//! are resolved once up front, and then they run against a tape of integer
//! cells.
//!
//! Features and behaviors:
//! - The tape starts as a single cell holding 0 and grows as the pointer moves right.
//! - Moving left from cell 0 leaves the pointer at 0.
//! - Optional bounds: `max_memory_size` wraps the pointer back to cell 0 once the
//!   tape is full; `max_memory_value` wraps an incremented cell back to 0.
//! - Decrement has no lower bound.
//! - Input `,` asks the operator for an integer in `[0, 127]`, re-asking on anything else.
//! - Output `.` writes the character whose code point is the current cell.
//! - Unmatched brackets are reported before anything runs.
//!
//! Quick start:
//!
//! ```
//! use bf_vm::{Machine, MachineConfig, ScriptedConsole};
//!
//! let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
//! let mut machine = Machine::new(code, MachineConfig::default()).expect("balanced program");
//! let mut console = ScriptedConsole::default();
//! machine.run(&mut console).expect("program should run");
//! assert_eq!(console.output(), "Hello World!\n");
//! ```

pub mod brackets;
pub mod cli_util;
pub mod config;
pub mod console;
pub mod error;
pub mod machine;
pub mod program;
pub mod stepper;
pub mod tape;

pub use brackets::BracketTable;
pub use config::{ConfigError, MachineConfig};
pub use console::{Console, InvalidInputValue, ScriptedConsole, StreamConsole};
pub use error::{BracketKind, MachineError};
pub use machine::{Machine, State};
pub use program::{Op, Program, sanitize};
pub use stepper::{StepHooks, StepReport, Stepper};
pub use tape::{Cell, Tape};
