#[tokio::main]
async fn main() {
    if let Err(e) = rating_board::start_server().await {
        eprintln!("rating_board failed to start: {e}");
        std::process::exit(1);
    }
}
