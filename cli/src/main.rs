use clap::Parser;
use cfkit_cli::{cmd::GlobalArgs, logger, util};

#[tokio::main]
async fn main() {
    logger::init();
    let app = GlobalArgs::parse();
    app.exec_subcmd().await.unwrap_or_else(|e| {
        eprintln!("{}", util::error_line(&e));
        std::process::exit(1);
    });
}
