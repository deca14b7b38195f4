#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), karl_portfolio::server::ServerError> {
    karl_portfolio::server::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    karl_portfolio::frontend::run();
}
