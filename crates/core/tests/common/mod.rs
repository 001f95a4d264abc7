//! Local stub servers standing in for the external APIs

use axum::Router;
use tokio::net::TcpListener;

/// Bind an ephemeral port first so handlers can embed their own base URL
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    (listener, base_url)
}

pub fn serve(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}
