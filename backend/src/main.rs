#[tokio::main]
async fn main() {
    tournees::start_server().await;
}
