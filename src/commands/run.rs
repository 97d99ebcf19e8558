use std::fs;
use std::io::{self, IsTerminal, Write};

use clap::Args;

use bf_vm::cli_util::print_machine_error;
use bf_vm::{Machine, MachineConfig, StreamConsole, Stepper, config};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Pause before every instruction and print the tape after it
    #[arg(short = 's', long = "step")]
    pub step: bool,

    /// Print the final tape to stderr once the program halts
    #[arg(long = "dump-tape")]
    pub dump_tape: bool,

    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Maximum number of tape cells (fallback BF_MAX_MEMORY_SIZE, then config file; default unbounded)
    #[arg(long = "max-memory-size", value_name = "N")]
    pub max_memory_size: Option<usize>,

    /// Largest cell value before `+` wraps to 0 (fallback BF_MAX_MEMORY_VALUE, then config file; default unbounded)
    #[arg(long = "max-memory-value", value_name = "N", allow_negative_numbers = true)]
    pub max_memory_value: Option<i64>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true, allow_hyphen_values = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        step,
        dump_tape,
        file,
        max_memory_size,
        max_memory_value,
        code,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let source = if let Some(path) = file {
        match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("")
    };

    // Resolve bounds: flags -> env -> config file -> unbounded
    let flags = MachineConfig {
        max_memory_size,
        max_memory_value,
    };
    let machine_config = match config::resolve(flags) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 2;
        }
    };

    let machine = match Machine::new(&source, machine_config) {
        Ok(m) => m,
        Err(err) => {
            print_machine_error(Some(program), &source, &err);
            return 1;
        }
    };

    // Install SIGINT (ctrl+c) handler to flush and exit(0) immediately
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    let color = step && io::stderr().is_terminal();
    let mut console = StreamConsole::new(io::stdin().lock(), io::stdout(), io::stderr()).with_color(color);

    let (machine, result) = if step {
        let mut stepper = Stepper::new(machine);
        let result = stepper.run(&mut console);
        (stepper.into_machine(), result)
    } else {
        let mut machine = machine;
        let result = machine.run(&mut console);
        (machine, result)
    };
    drop(console);

    let exit_code = match result {
        Ok(()) => 0,
        Err(err) => {
            print_machine_error(Some(program), &source, &err);
            1
        }
    };

    if dump_tape {
        let tape = machine.tape();
        eprintln!("tape: {tape} (pointer at {})", tape.pointer());
        let _ = io::stderr().flush();
    }

    // For readability, ensure output ends with a newline
    println!();
    let _ = io::stdout().flush();
    exit_code
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] "<code>"
  {0} run [OPTIONS] --file <PATH>

Options:
  --file,  -f <PATH>         Read Brainfuck code from PATH instead of positional "<code>"
  --step,  -s                Pause before every instruction (press ENTER) and print the tape after it
  --dump-tape                Print the final tape to stderr when the program halts
  --max-memory-size <N>      Cap the tape at N cells; moving right from the last one wraps to cell 0
  --max-memory-value <N>     Wrap a cell back to 0 when incremented at N
  --help,  -h                Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- Input (`,`) asks for an integer between 0 and 127 on stdin, one per line, and asks
  again until it gets one.
- Program output goes to stdout; prompts, step reports and errors go to stderr.
- Bounds fall back to BF_MAX_MEMORY_SIZE / BF_MAX_MEMORY_VALUE, then to the
  [machine] section of bfvm.toml in the config directory (or $BFVM_CONFIG).

Examples:
- Load Brainfuck code from a file:
    {0} run --file ./program.bf
- Echo values until a 0 is entered:
    printf '65\n66\n0\n' | {0} run ",[.,]"
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
