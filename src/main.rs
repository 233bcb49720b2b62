use clap::Parser;
use stocksage::cli::{run, Cli};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() -> std::process::ExitCode {
    // Credentials may live in a local .env file; real env vars win.
    dotenvy::dotenv().ok();
    init_logging();
    run(Cli::parse())
}
