//! Lam CLI

use lam_eval::stdout_handler;
use lamc::commands::{
    cps_source, lex_source, parse_run_options, parse_source, read_file, run_source,
    CommandError,
};

fn main() {
    lamc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    let result = match command {
        "run" => run(&args[2..]),
        "cps" | "parse" | "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: lam {command} <file>");
                std::process::exit(1);
            }
            inspect(command, &args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" | "-v" => {
            println!("lam {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        if matches!(err, CommandError::Usage(_)) {
            eprintln!("Usage: lam run [--cps] [--max-depth=N] [--no-prelude] <file>");
        }
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), CommandError> {
    let (options, path) = parse_run_options(args)?;
    let source = read_file(&path)?;
    let value = run_source(&source, &options, stdout_handler())?;
    println!("{value}");
    Ok(())
}

fn inspect(command: &str, path: &str) -> Result<(), CommandError> {
    let source = read_file(path)?;
    match command {
        "cps" => println!("{}", cps_source(&source)?),
        "parse" => println!("{}", parse_source(&source)?),
        _ => {
            for line in lex_source(&source)? {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn print_usage() {
    println!("lam - a small expression language");
    println!();
    println!("Usage: lam <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>       Evaluate a program and print its value");
    println!("  cps <file>       Print the continuation-passing form of a program");
    println!("  parse <file>     Print the parsed tree");
    println!("  lex <file>       Print the token stream");
    println!("  help             Show this help message");
    println!("  version          Show version information");
    println!();
    println!("Run options:");
    println!("  --cps            Transform to continuation-passing form before running");
    println!("  --max-depth=N    Nested steps allowed before the evaluator bounces");
    println!("                   (default: $LAM_MAX_DEPTH, then 200)");
    println!("  --no-prelude     Do not define print and println");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=lam_eval=debug) to trace evaluation.");
}
