//! CLI command implementations.

use ls8_common::Program;
use ls8_vm::{Machine, MachineConfig, StdoutSink};

/// Load and execute a program.
pub fn run(args: &[String]) -> Result<(), i32> {
    let Some(input) = args.first() else {
        eprintln!("error: run requires an input file");
        eprintln!("Usage: ls8 run <prog.ls8> [--trace] [--max-steps N]");
        return Err(1);
    };

    let mut trace = false;
    let mut config = MachineConfig::default();
    let mut rest = args[1..].iter();
    while let Some(flag) = rest.next() {
        match flag.as_str() {
            "--trace" => trace = true,
            "--max-steps" => {
                let limit = rest.next().and_then(|n| n.parse::<u64>().ok());
                let Some(limit) = limit else {
                    eprintln!("error: --max-steps requires a non-negative integer");
                    return Err(1);
                };
                config = config.with_step_limit(limit);
            }
            other => {
                eprintln!("error: unknown option '{other}'");
                return Err(1);
            }
        }
    }

    let program = read_program(input)?;

    let mut machine = Machine::with_config(config).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    machine.load(&program).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let result = if trace {
        machine.run_with_hook(&mut StdoutSink, &mut |m| eprintln!("{}", m.trace_line()))
    } else {
        machine.run(&mut StdoutSink)
    };

    result.map_err(|e| {
        eprintln!("runtime error: {e}");
        2
    })
}

/// Load a program and report its size.
pub fn check(args: &[String]) -> Result<(), i32> {
    let Some(input) = args.first() else {
        eprintln!("error: check requires an input file");
        eprintln!("Usage: ls8 check <prog.ls8>");
        return Err(1);
    };

    let program = read_program(input)?;
    println!("OK: {input} ({} bytes)", program.len());
    Ok(())
}

/// Print the loaded program in annotated binary text.
pub fn dump(args: &[String]) -> Result<(), i32> {
    let Some(input) = args.first() else {
        eprintln!("error: dump requires an input file");
        eprintln!("Usage: ls8 dump <prog.ls8>");
        return Err(1);
    };

    let program = read_program(input)?;
    print!("{}", program.to_text());
    Ok(())
}

/// Read and parse a program file, reporting failures on stderr.
fn read_program(input: &str) -> Result<Program, i32> {
    ls8_loader::load_file(input).map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}
