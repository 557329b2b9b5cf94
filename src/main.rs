//! tour-explore CLI entry point
//!
//! Tourist place explorer - CLI + web app

use tour_explore::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e.notice());
        std::process::exit(1);
    }
}
