use clap::Parser;
use console::style;

mod cli;
mod error;
mod panic_hook;

#[tokio::main]
async fn main() {
    panic_hook::set();

    let cli = cli::Cli::parse();

    if let Err(e) = holders_utils::log::init(cli.verbose) {
        eprintln!("{} {e}", style("warning:").yellow());
    }

    if let Err(e) = cli.cmd.run().await {
        eprintln!("{} {e}", style("error:").red());
        std::process::exit(1);
    }
}
