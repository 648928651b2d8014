use clap::Parser;
use dotenv::dotenv;
use graph_chatbot::cli::Args;
use log::error;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let code = match graph_chatbot::run(args).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    };
    // The stdin reader can still be parked on a blocking read; don't wait for it.
    std::process::exit(code);
}
