#[tokio::main]
async fn main() {
    if let Err(e) = smartcontact::server::run().await {
        log::error!("server error: {}", e);
        std::process::exit(1);
    }
}
