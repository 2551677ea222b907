//! weft CLI
//!
//! Calculator and lexer demos over the weft parser combinators.

use weft_cli::calc::AngleMode;
use weft_cli::commands::{batch_file, calc_expression, lex_expression};

fn main() {
    weft_cli::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "calc" | "batch" => {
            let mut mode = AngleMode::default();
            let mut input = None;
            for arg in args.iter().skip(2) {
                match arg.as_str() {
                    "--deg" => mode = AngleMode::Degree,
                    "--rad" => mode = AngleMode::Radian,
                    "--no-trig" => mode = AngleMode::None,
                    _ if input.is_none() => input = Some(arg.as_str()),
                    _ => {
                        eprintln!("error: unexpected argument '{arg}'");
                        std::process::exit(1);
                    }
                }
            }

            let Some(input) = input else {
                if command == "calc" {
                    eprintln!("Usage: weft calc <expression> [--deg | --rad | --no-trig]");
                } else {
                    eprintln!("Usage: weft batch <file> [--deg | --rad | --no-trig]");
                }
                std::process::exit(1);
            };

            if command == "calc" {
                calc_expression(input, mode);
            } else {
                batch_file(input, mode);
            }
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: weft lex <expression>");
                std::process::exit(1);
            }
            lex_expression(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("weft {}", env!("CARGO_PKG_VERSION"));
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
    println!("weft - parser combinator demos");
    println!();
    println!("Usage: weft <command> [options]");
    println!();
    println!("Commands:");
    println!("  calc <expression>   Evaluate an arithmetic expression");
    println!("  batch <file>        Evaluate each non-blank line of a file");
    println!("  lex <expression>    Show the tokens of an expression");
    println!("  help                Show this help message");
    println!("  version             Show version information");
    println!();
    println!("Options (calc, batch):");
    println!("  --rad               Trigonometry in radians (default)");
    println!("  --deg               Trigonometry in degrees");
    println!("  --no-trig           No trigonometric functions");
    println!();
    println!("Logging:");
    println!("  WEFT_LOG=weft_core=debug   Log filter (RUST_LOG syntax)");
    println!("  WEFT_DEBUG=trace,errors    Parser traces and rendered failures");
}
