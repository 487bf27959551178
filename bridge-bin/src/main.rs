use bridge_cli::Cli;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        eprintln!("❌ Error: {}", e.report());
        std::process::exit(1);
    }
}
