use envconfig::Envconfig;
use pairlink::{PairlinkServer, ServerEnv, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let env = ServerEnv::init_from_env()?;
    tracing::info!(?env, "starting pairlink");

    let server = PairlinkServer::builder()
        .bind(&env.bind_addr())
        .lobby_config(env.lobby_config())
        .handshake_timeout(env.handshake_timeout())
        .build()
        .await?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "could not listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    tracing::info!("pairlink stopped");
    Ok(())
}
