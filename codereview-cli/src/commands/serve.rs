//! Serve command - Run the HTTP review service

use actix_web::{web, App, HttpServer};
use clap::Args;
use codereview_core::Config;
use tracing::info;

use crate::server::{configure_review_routes, AppState};

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides config and env)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides config and env)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let host = self.host.clone().unwrap_or_else(|| config.server.host.clone());
        let port = self.port.unwrap_or(config.server.port);

        // Cache and clients live as long as the server; dropped on shutdown
        let orchestrator = super::build_orchestrator(config).await?;
        let state = web::Data::new(AppState { orchestrator });

        info!(host = %host, port, "application is starting up");

        HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(configure_review_routes)
        })
        .bind((host.as_str(), port))?
        .run()
        .await?;

        info!("application is shutting down");
        Ok(())
    }
}
