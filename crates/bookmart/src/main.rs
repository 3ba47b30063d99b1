//! BookMart menu entry point.

use bookbuddy_core::{default_log_level, init_logging};
use bookmart::{run_menu, BookMart};
use std::io;

fn main() -> io::Result<()> {
    let log_dir = std::env::temp_dir().join("bookmart-logs");
    if let Err(err) = init_logging(default_log_level(), &log_dir) {
        eprintln!("logging disabled: {err}");
    }

    let mut shop = BookMart::new();
    let stdin = io::stdin();
    run_menu(stdin.lock(), io::stdout().lock(), &mut shop)
}
