//! Interactive single-stepping on top of [`Machine::step`].

use std::io;

use crate::console::Console;
use crate::error::MachineError;
use crate::machine::{Machine, State};
use crate::program::Op;
use crate::tape::Cell;

/// What the step driver shows after each instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport<'a> {
    /// Zero-based count of executed instructions.
    pub step: usize,
    /// Instruction pointer of the instruction just executed.
    pub ip: usize,
    pub op: Op,
    /// Memory pointer after the instruction.
    pub pointer: usize,
    /// Full tape after the instruction.
    pub cells: &'a [Cell],
}

/// Operator hooks around each step.
pub trait StepHooks {
    /// Block until the operator lets the instruction at `ip` execute.
    fn acknowledge(&mut self, ip: usize, op: Op) -> io::Result<()>;

    /// Show the machine state after a step.
    fn report(&mut self, report: &StepReport<'_>) -> io::Result<()>;
}

/// Drives a [`Machine`] one acknowledged instruction at a time.
pub struct Stepper {
    machine: Machine,
    steps: usize,
}

impl Stepper {
    pub fn new(machine: Machine) -> Self {
        Self { machine, steps: 0 }
    }

    /// Wait, execute, report; repeat until the program halts.
    pub fn run<T>(&mut self, io: &mut T) -> Result<(), MachineError>
    where
        T: Console + StepHooks,
    {
        while self.step(io)? == State::Running {}
        let ip = self.machine.instruction_pointer();
        Console::flush(io).map_err(|source| MachineError::Io { ip, source })
    }

    /// One acknowledged instruction.
    pub fn step<T>(&mut self, io: &mut T) -> Result<State, MachineError>
    where
        T: Console + StepHooks,
    {
        let Some(op) = self.machine.current_op() else {
            return Ok(State::Halted);
        };
        let ip = self.machine.instruction_pointer();
        io.acknowledge(ip, op)
            .map_err(|source| MachineError::Io { ip, source })?;

        let state = self.machine.step(io)?;

        let tape = self.machine.tape();
        let report = StepReport {
            step: self.steps,
            ip,
            op,
            pointer: tape.pointer(),
            cells: tape.cells(),
        };
        io.report(&report)
            .map_err(|source| MachineError::Io { ip, source })?;
        self.steps += 1;
        Ok(state)
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn into_machine(self) -> Machine {
        self.machine
    }
}
