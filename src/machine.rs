use crate::brackets::BracketTable;
use crate::config::MachineConfig;
use crate::console::{Console, cell_to_char};
use crate::error::MachineError;
use crate::program::{Op, Program};
use crate::tape::Tape;

/// Where the machine is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The instruction pointer is inside the program.
    Running,
    /// The instruction pointer reached the end of the program.
    Halted,
}

/// The execution engine.
///
/// Owns a sanitized program, its bracket table, a fresh tape and the
/// instruction pointer. Every machine starts from its own single-cell tape.
#[derive(Debug, Clone)]
pub struct Machine {
    program: Program,
    brackets: BracketTable,
    tape: Tape,
    instruction_pointer: usize,
}

impl Machine {
    /// Sanitize `source` and resolve its loops.
    ///
    /// Fails with [`MachineError::UnmatchedOpeningBracket`] or
    /// [`MachineError::UnmatchedClosingBracket`] before anything executes.
    pub fn new(source: &str, config: MachineConfig) -> Result<Self, MachineError> {
        Self::from_program(Program::parse(source), config)
    }

    pub fn from_program(program: Program, config: MachineConfig) -> Result<Self, MachineError> {
        let brackets = BracketTable::build(&program)?;
        Ok(Self {
            program,
            brackets,
            tape: Tape::with_config(&config),
            instruction_pointer: 0,
        })
    }

    pub fn state(&self) -> State {
        if self.instruction_pointer >= self.program.len() {
            State::Halted
        } else {
            State::Running
        }
    }

    pub fn is_halted(&self) -> bool {
        self.state() == State::Halted
    }

    /// The instruction about to execute, if any.
    pub fn current_op(&self) -> Option<Op> {
        self.program.get(self.instruction_pointer)
    }

    /// Execute one instruction and report the resulting state.
    ///
    /// Stepping a halted machine does nothing.
    pub fn step<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<State, MachineError> {
        let Some(op) = self.current_op() else {
            return Ok(State::Halted);
        };
        let ip = self.instruction_pointer;
        let io_err = |source| MachineError::Io { ip, source };

        match op {
            Op::Increment => self.tape.increment(),
            Op::Decrement => self.tape.decrement(),
            Op::Retreat => self.tape.retreat(),
            Op::Advance => self.tape.advance(),
            Op::Output => {
                console.write_char(cell_to_char(self.tape.read())).map_err(io_err)?;
            }
            Op::Input => {
                let value = console.read_bounded_int().map_err(io_err)?;
                self.tape.write(value);
            }
            // Jumps land on the partner bracket; the increment below steps past it.
            Op::LoopStart => {
                if self.tape.read() == 0 {
                    if let Some(close) = self.brackets.closing_for(ip) {
                        self.instruction_pointer = close;
                    }
                }
            }
            Op::LoopEnd => {
                if self.tape.read() != 0 {
                    if let Some(open) = self.brackets.opening_for(ip) {
                        self.instruction_pointer = open;
                    }
                }
            }
        }

        self.instruction_pointer += 1;
        Ok(self.state())
    }

    /// Run until the program halts.
    ///
    /// A program that never zeroes the cell its loop tests runs forever.
    pub fn run<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<(), MachineError> {
        while self.step(console)? == State::Running {}
        let ip = self.instruction_pointer;
        console
            .flush()
            .map_err(|source| MachineError::Io { ip, source })
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

    fn run(code: &str, config: MachineConfig, inputs: Vec<i64>) -> (Machine, ScriptedConsole) {
        let mut machine = Machine::new(code, config).expect("program should load");
        let mut console = ScriptedConsole::new(inputs);
        machine.run(&mut console).expect("program should run");
        (machine, console)
    }

    #[test]
    fn hello_world() {
        let (_, console) = run(HELLO_WORLD, MachineConfig::default(), vec![]);
        assert_eq!(console.output(), "Hello World!\n");
    }

    #[test]
    fn hello_world_ignores_comments() {
        let commented = format!("print a greeting:\n{HELLO_WORLD}\n(done)");
        let (_, console) = run(&commented, MachineConfig::default(), vec![]);
        assert_eq!(console.output(), "Hello World!\n");
    }

    #[test]
    fn echo_until_zero() {
        let (machine, console) = run(",[.,]", MachineConfig::default(), vec![65, 66, 0]);
        assert_eq!(console.output(), "AB");
        assert!(machine.is_halted());
        assert_eq!(console.remaining_inputs(), 0);
    }

    #[test]
    fn out_of_range_input_is_asked_for_again() {
        let (machine, console) = run(",", MachineConfig::default(), vec![128, -1, 5]);
        assert_eq!(machine.tape().read(), 5);
        assert_eq!(console.rejected().len(), 2);
    }

    #[test]
    fn bounded_tape_wraps_pointer_and_value() {
        let config = MachineConfig::default()
            .with_max_memory_size(2)
            .with_max_memory_value(2);
        let (machine, _) = run(">>>>++++", config, vec![]);
        assert_eq!(machine.tape().pointer(), 0);
        // 0 -> 1 -> 2 -> 0 -> 1
        assert_eq!(machine.tape().read(), 1);
        assert_eq!(machine.tape().cells(), &[1, 0]);
    }

    #[test]
    fn empty_program_halts_immediately() {
        let mut machine = Machine::new("just a comment", MachineConfig::default()).unwrap();
        assert_eq!(machine.state(), State::Halted);
        let mut console = ScriptedConsole::default();
        machine.run(&mut console).unwrap();
        assert_eq!(console.output(), "");
        assert_eq!(machine.tape().cells(), &[0]);
    }

    #[test]
    fn unbalanced_programs_fail_to_load() {
        assert!(matches!(
            Machine::new("[", MachineConfig::default()),
            Err(MachineError::UnmatchedOpeningBracket { position: 0 })
        ));
        assert!(matches!(
            Machine::new("+]", MachineConfig::default()),
            Err(MachineError::UnmatchedClosingBracket { position: 1 })
        ));
        assert!(Machine::new("[[]][]", MachineConfig::default()).is_ok());
    }

    #[test]
    fn loop_on_zero_cell_is_skipped() {
        let (machine, console) = run("[.+]+", MachineConfig::default(), vec![]);
        assert_eq!(console.output(), "");
        assert_eq!(machine.tape().read(), 1);
    }

    #[test]
    fn step_lands_past_the_partner_bracket() {
        let mut machine = Machine::new("[-]+", MachineConfig::default()).unwrap();
        let mut console = ScriptedConsole::default();
        assert_eq!(machine.step(&mut console).unwrap(), State::Running);
        assert_eq!(machine.instruction_pointer(), 3);
        assert_eq!(machine.current_op(), Some(Op::Increment));
        assert_eq!(machine.step(&mut console).unwrap(), State::Halted);
        assert_eq!(machine.step(&mut console).unwrap(), State::Halted);
        assert_eq!(machine.instruction_pointer(), 4);
    }

    #[test]
    fn pointer_never_goes_negative() {
        let (machine, _) = run("<<<+", MachineConfig::default(), vec![]);
        assert_eq!(machine.tape().pointer(), 0);
        assert_eq!(machine.tape().cells(), &[1]);
    }

    #[test]
    fn memory_pointer_stays_in_bounds_every_step() {
        let code = ">>+<<<[->>>+<<<]>>>>>[<]";
        for config in [
            MachineConfig::default(),
            MachineConfig::default().with_max_memory_size(3),
        ] {
            let mut machine = Machine::new(code, config).unwrap();
            let mut console = ScriptedConsole::default();
            while machine.step(&mut console).unwrap() == State::Running {
                let tape = machine.tape();
                assert!(tape.pointer() < tape.len());
            }
        }
    }

    #[test]
    fn negative_cells_print_replacement_character() {
        let (_, console) = run("-.", MachineConfig::default(), vec![]);
        assert_eq!(console.output(), "\u{FFFD}");
    }

    #[test]
    fn machines_do_not_share_tapes() {
        let (first, _) = run(">+++", MachineConfig::default(), vec![]);
        let second = Machine::new("", MachineConfig::default()).unwrap();
        assert_eq!(first.tape().cells(), &[0, 3]);
        assert_eq!(second.tape().cells(), &[0]);
    }

    #[test]
    fn exhausted_input_surfaces_as_io_error() {
        let mut machine = Machine::new("+,", MachineConfig::default()).unwrap();
        let mut console = ScriptedConsole::default();
        let err = machine.run(&mut console).unwrap_err();
        assert!(matches!(err, MachineError::Io { ip: 1, .. }));
    }
}
