//! StrataKV REPL
//!
//! Interactive shell over an embedded engine instance. Supported commands:
//! SET, GET, DEL, GETALL; EXIT to quit.

use std::io::{self, BufRead, Write};

use clap::Parser;
use stratakv::{Config, Engine, Lookup};
use tracing_subscriber::{fmt, EnvFilter};

/// StrataKV REPL
#[derive(Parser, Debug)]
#[command(name = "stratakv-cli")]
#[command(about = "Interactive shell for a local StrataKV store")]
#[command(version)]
struct Args {
    /// Data directory for SSTable files
    #[arg(short, long, default_value = "./stratakv_data")]
    data_dir: String,
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let config = Config::builder().data_dir(&args.data_dir).build();
    let mut engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    println!("StrataKV REPL. Supported commands: SET, GET, DEL, GETALL.");
    println!("Type 'EXIT' to quit.");

    let stdin = io::stdin();
    loop {
        print!("User> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("read error: {}", e);
                break;
            }
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };

        match (command.to_uppercase().as_str(), parts.len()) {
            ("EXIT", _) => break,
            ("SET", 3) => match engine.set(parts[1].to_string(), parts[2].to_string()) {
                Ok(()) => println!("OK"),
                Err(e) => println!("ERR {}", e),
            },
            ("SET", _) => println!("Invalid SET command. Usage: SET <key> <value>"),
            ("GET", 2) => match engine.get(parts[1]) {
                Lookup::Found(value) => println!("{}", value),
                Lookup::Deleted | Lookup::Miss => println!("NOT_FOUND"),
            },
            ("GET", _) => println!("Invalid GET command. Usage: GET <key>"),
            ("DEL", 2) => match engine.remove(parts[1].to_string()) {
                Ok(()) => println!("OK"),
                Err(e) => println!("ERR {}", e),
            },
            ("DEL", _) => println!("Invalid DEL command. Usage: DEL <key>"),
            ("GETALL", 1) => {
                for (key, value) in engine.get_all_pairs() {
                    println!("{} {}", key, value);
                }
            }
            _ => println!("Unknown command: {}", command),
        }
    }
}
