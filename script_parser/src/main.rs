use script_parser::config::RuntimeConfig;
use script_parser::logging;
use script_parser::readers::string_of_item;
use script_parser::regexes::{self, remove_quotes};
use script_parser::{Parser, VariableTable};
use serde::Serialize;
use std::cell::RefCell;
use std::env;
use std::path::Path;

#[derive(Debug, Serialize)]
struct Entry {
    key: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct DumpOutput {
    file: String,
    entries: Vec<Entry>,
    variables: VariableTable,
}

struct Options {
    input: String,
    json: bool,
    config: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file> [--json] [--config <settings.toml>]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let options = parse_options(&args[1..]);

    let config = match &options.config {
        Some(path) => match RuntimeConfig::load(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("FAILED: {}", error);
                eprintln!("  Code: {}", error.error_code());
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };
    logging::config::init_runtime_preferences(config.logging.clone())?;

    match dump_file(&options.input, &config) {
        Ok(output) => {
            if options.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_plain(&output);
            }
            Ok(())
        }
        Err(error) => {
            eprintln!("FAILED: {}", error);
            eprintln!("  Code: {}", error.error_code());
            std::process::exit(1);
        }
    }
}

fn print_help(program_name: &str) {
    println!("script-dump v{}", env!("CARGO_PKG_VERSION"));
    println!("Parse a data script and print its top-level assignments");
    println!();
    println!("USAGE:");
    println!("    {} <file> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --json              Print JSON instead of plain text");
    println!("    --config <path>     Load runtime preferences from a TOML file");
    println!();
    println!("CONFIGURATION:");
    println!("    {}", script_parser::config::build_info::source_info());
}

fn parse_options(args: &[String]) -> Options {
    let mut options = Options {
        input: args[0].clone(),
        json: false,
        config: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => options.json = true,
            "--config" => {
                if i + 1 < args.len() {
                    options.config = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Warning: --config requires a path");
                }
            }
            _ => {
                eprintln!("Warning: Unknown option '{}'", args[i]);
            }
        }
        i += 1;
    }

    options
}

/// Collect every top-level `key = value` in document order. `@name`
/// assignments are left to the parser and reported as variables.
fn dump_file(input: &str, config: &RuntimeConfig) -> script_parser::ParseResult<DumpOutput> {
    let entries = RefCell::new(Vec::new());
    let key_pattern = format!("{}|{}", regexes::STRING, regexes::QUOTED_STRING);

    let mut parser = Parser::from_config(config);
    parser.register_regex_keyed(&key_pattern, |key, source| {
        let value = string_of_item(source);
        entries.borrow_mut().push(Entry {
            key: remove_quotes(key).to_string(),
            value,
        });
        Ok(())
    })?;
    let variables = parser.parse_file(Path::new(input))?;
    drop(parser);

    Ok(DumpOutput {
        file: input.to_string(),
        entries: entries.into_inner(),
        variables,
    })
}

fn print_plain(output: &DumpOutput) {
    println!("File: {}", output.file);
    if !output.variables.is_empty() {
        println!("\nVariables:");
        for (name, value) in output.variables.iter() {
            println!("  @{} = {} ({})", name, value, value.type_name());
        }
    }
    println!("\nEntries: {}", output.entries.len());
    for entry in &output.entries {
        println!("  {} = {}", entry.key, entry.value);
    }
}
