pub mod routes;

use anyhow::Result;
use tokio::net::TcpListener;
use viber_session::ClientFactory;

pub async fn serve(listener: TcpListener, factory: ClientFactory) -> Result<()> {
    let app = routes::build_router(factory);
    axum::serve(listener, app).await?;
    Ok(())
}
