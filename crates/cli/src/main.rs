// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use rpl_cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = rpl_cli::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
