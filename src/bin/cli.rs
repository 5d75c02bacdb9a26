//! JsonDB CLI Client
//!
//! Command-line interface for interacting with JsonDB.
//!
//! ```text
//! jsondb-cli -t set -k name -v "Sorabh"
//! jsondb-cli -t get -k name
//! jsondb-cli --in setFile.json
//! jsondb-cli -t exit
//! ```

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use jsondb::protocol::Request;
use jsondb::Client;

/// JsonDB CLI
#[derive(Parser, Debug)]
#[command(name = "jsondb-cli")]
#[command(about = "CLI for the JsonDB document store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:23456")]
    server: String,

    /// Command type: get, set, delete or exit
    #[arg(short = 't', long = "type", required_unless_present = "input")]
    kind: Option<String>,

    /// Root key to operate on
    #[arg(short, long)]
    key: Option<String>,

    /// Value to store (sent as a JSON string)
    #[arg(short, long)]
    value: Option<String>,

    /// Read the whole request from this file instead of the flags above
    #[arg(long = "in", id = "input", conflicts_with_all = ["kind", "key", "value"])]
    input: Option<PathBuf>,

    /// Directory that `--in` paths are resolved against
    #[arg(long, default_value = ".")]
    input_dir: PathBuf,
}

fn main() {
    let args = Args::parse();

    println!("Client started!");

    let request = match build_request(&args) {
        Ok(request) => request,
        Err(message) => {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    };

    let client = Client::new(&args.server);

    println!("Sent: {}", request);
    match client.send_raw(&request) {
        Ok(response) => println!("Received: {}", response),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Produce the raw request document to send
fn build_request(args: &Args) -> Result<String, String> {
    if let Some(input) = &args.input {
        let path = args.input_dir.join(input);
        return fs::read_to_string(&path)
            .map_err(|e| format!("cannot read input file {}: {}", path.display(), e));
    }

    let kind = args.kind.as_deref().unwrap_or_default();
    let key = || {
        args.key
            .clone()
            .ok_or_else(|| format!("-k/--key is required for {}", kind))
    };

    let request = match kind {
        "get" => Request::get(key()?),
        "delete" => Request::delete(key()?),
        "set" => {
            let value = args
                .value
                .clone()
                .ok_or_else(|| "-v/--value is required for set".to_string())?;
            Request::set(key()?, value)
        }
        "exit" => Request::exit(),
        other => return Err(format!("unknown command type: {}", other)),
    };

    request.to_json().map_err(|e| e.to_string())
}
