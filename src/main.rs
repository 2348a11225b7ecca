//! Binary entry point for `react-migrate`.

use std::process;

fn main() {
    if let Err(e) = react_migrate::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
