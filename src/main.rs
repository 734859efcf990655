use std::io;

use clap::Parser;

use ccg_balance::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let code = cli::execute(&cli, &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
