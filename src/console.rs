//! The machine's only window to the outside world.
//!
//! The engine talks to an operator through the [`Console`] trait: one call to
//! read a bounded integer for `,` and one to write a character for `.`.
//! [`StreamConsole`] serves those calls from any buffered reader and writer,
//! [`ScriptedConsole`] from a queue of prepared values.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use nu_ansi_term::Color;

use crate::program::Op;
use crate::stepper::{StepHooks, StepReport};
use crate::tape::Cell;

/// Smallest value accepted by `,`.
pub const INPUT_MIN: Cell = 0;
/// Largest value accepted by `,`.
pub const INPUT_MAX: Cell = 127;

/// Operator I/O needed by the `,` and `.` instructions.
pub trait Console {
    /// Block until the operator supplies an integer in `[INPUT_MIN, INPUT_MAX]`.
    ///
    /// Invalid values are rejected and asked for again; they never reach the caller.
    fn read_bounded_int(&mut self) -> io::Result<Cell>;

    /// Emit one character of program output.
    fn write_char(&mut self, c: char) -> io::Result<()>;

    /// Push any buffered output. Called when a run halts.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An input value the operator has to re-enter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputValue {
    #[error("Input must be an integer between 0 and 127 (got {0})")]
    OutOfRange(Cell),

    #[error("Input must be an integer between 0 and 127 (got '{0}')")]
    NotAnInteger(String),
}

pub fn validate_input_value(value: Cell) -> Result<Cell, InvalidInputValue> {
    if (INPUT_MIN..=INPUT_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(InvalidInputValue::OutOfRange(value))
    }
}

/// Parse one line of operator input.
pub fn parse_input_value(line: &str) -> Result<Cell, InvalidInputValue> {
    let trimmed = line.trim();
    let value = trimmed
        .parse::<Cell>()
        .map_err(|_| InvalidInputValue::NotAnInteger(trimmed.to_string()))?;
    validate_input_value(value)
}

/// Character written by `.` for a cell value.
///
/// Values that are not Unicode scalar values (negative, surrogates, above
/// U+10FFFF) are written as U+FFFD rather than failing the run.
pub fn cell_to_char(value: Cell) -> char {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Console backed by real streams.
///
/// Program output goes to `output`; prompts, retry messages and step reports go
/// to `prompts` so they never mix with what the program prints.
pub struct StreamConsole<R, W, P> {
    input: R,
    output: W,
    prompts: P,
    color: bool,
    announced: bool,
}

impl<R, W, P> StreamConsole<R, W, P>
where
    R: BufRead,
    W: Write,
    P: Write,
{
    pub fn new(input: R, output: W, prompts: P) -> Self {
        Self {
            input,
            output,
            prompts,
            color: false,
            announced: false,
        }
    }

    /// Highlight the current cell in step reports.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_parts(self) -> (R, W, P) {
        (self.input, self.output, self.prompts)
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for the operator",
            ));
        }
        Ok(line)
    }

    fn render_tape(&self, report: &StepReport<'_>) -> String {
        let cells: Vec<String> = report
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if self.color && i == report.pointer {
                    Color::Yellow.bold().paint(cell.to_string()).to_string()
                } else {
                    cell.to_string()
                }
            })
            .collect();
        format!("[{}]", cells.join(", "))
    }
}

impl<R, W, P> Console for StreamConsole<R, W, P>
where
    R: BufRead,
    W: Write,
    P: Write,
{
    fn read_bounded_int(&mut self) -> io::Result<Cell> {
        // Anything the program printed so far should be visible before the prompt
        self.output.flush()?;
        loop {
            write!(self.prompts, "> ")?;
            self.prompts.flush()?;

            let line = self.read_line()?;
            match parse_input_value(&line) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.prompts, "{e}")?,
            }
        }
    }

    fn write_char(&mut self, c: char) -> io::Result<()> {
        write!(self.output, "{c}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()?;
        self.prompts.flush()
    }
}

impl<R, W, P> StepHooks for StreamConsole<R, W, P>
where
    R: BufRead,
    W: Write,
    P: Write,
{
    fn acknowledge(&mut self, _ip: usize, _op: Op) -> io::Result<()> {
        self.output.flush()?;
        if !self.announced {
            writeln!(self.prompts, "To go to the next step, press ENTER")?;
            writeln!(self.prompts, "STEP | IP  | INSTR | PTR | TAPE")?;
            self.announced = true;
        }
        self.prompts.flush()?;
        self.read_line().map(|_| ())
    }

    fn report(&mut self, report: &StepReport<'_>) -> io::Result<()> {
        let tape = self.render_tape(report);
        writeln!(
            self.prompts,
            "{:<4} | {:<3} |   {}   | {:<3} | {}",
            report.step, report.ip, report.op, report.pointer, tape
        )?;
        self.prompts.flush()
    }
}

/// Console fed from a prepared list of inputs, collecting output in memory.
///
/// Out-of-range inputs are rejected just like an operator typo would be: they
/// are recorded in [`rejected`](Self::rejected) and the next value is tried.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    inputs: VecDeque<Cell>,
    output: String,
    rejected: Vec<InvalidInputValue>,
    acknowledgements: usize,
    snapshots: Vec<Vec<Cell>>,
}

impl ScriptedConsole {
    pub fn new<I>(inputs: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        Self {
            inputs: inputs.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn rejected(&self) -> &[InvalidInputValue] {
        &self.rejected
    }

    /// Inputs not consumed by the program.
    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of step acknowledgements given.
    pub fn acknowledgements(&self) -> usize {
        self.acknowledgements
    }

    /// Tape contents reported after each step.
    pub fn snapshots(&self) -> &[Vec<Cell>] {
        &self.snapshots
    }
}

impl Console for ScriptedConsole {
    fn read_bounded_int(&mut self) -> io::Result<Cell> {
        while let Some(value) = self.inputs.pop_front() {
            match validate_input_value(value) {
                Ok(value) => return Ok(value),
                Err(e) => self.rejected.push(e),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "scripted input exhausted",
        ))
    }

    fn write_char(&mut self, c: char) -> io::Result<()> {
        self.output.push(c);
        Ok(())
    }
}

impl StepHooks for ScriptedConsole {
    fn acknowledge(&mut self, _ip: usize, _op: Op) -> io::Result<()> {
        self.acknowledgements += 1;
        Ok(())
    }

    fn report(&mut self, report: &StepReport<'_>) -> io::Result<()> {
        self.snapshots.push(report.cells.to_vec());
        Ok(())
    }
}
