//! ActionQuery CLI.

use aqc::commands::{dump_file, lex_file, repl, run_file};

fn main() {
    aqc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: aqc run <script> [config.json]");
                std::process::exit(1);
            }
            run_file(&args[2], args.get(3).map(String::as_str));
        }
        "repl" => {
            repl(args.get(2).map(String::as_str));
        }
        "dump" => {
            if args.len() < 3 {
                eprintln!("Usage: aqc dump <script>");
                std::process::exit(1);
            }
            dump_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: aqc lex <script>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("aqc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("ActionQuery runner");
    println!();
    println!("Usage: aqc <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <script> [config.json]  Compile and run a script");
    println!("  repl [config.json]          Evaluate expressions line by line");
    println!("  dump <script>               Print the compiled program");
    println!("  lex <script>                Print the token stream");
    println!("  help                        Show this help message");
    println!("  version                     Show version information");
    println!();
    println!("Configuration keys (all optional):");
    println!("  Trace, TraceSteps, Parameters, InitialVariables, HardLimit, DumpProgram");
    println!();
    println!("Examples:");
    println!("  aqc run script.aq");
    println!("  aqc run script.aq conf.json");
    println!("  aqc dump script.aq");
    println!("  RUST_LOG=aq_vm=trace aqc run script.aq");
}
