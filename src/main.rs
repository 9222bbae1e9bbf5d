use clap::Parser;
use sasb_cli::cli::Cli;
use sasb_cli::core::user_friendly_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(error) = cli.execute().await {
        user_friendly_error(error).display();
        std::process::exit(1);
    }
}
