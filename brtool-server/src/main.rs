//! Baserow webhook receiver
//!
//! Listens for Baserow row webhooks and logs every created, updated and
//! deleted row using the table's custom field set.
//!
//! Usage:
//!   brtool-server --port 8080 --fields table.json
//!
//! Point the Baserow webhook at `http://<host>:<port>/webhook`.

use std::{path::PathBuf, sync::Arc};
use anyhow::Result;
use brtool_client::{BaserowClient, BaserowConfig};
use brtool_server::{build_router, demo_fields, load_fields};
use brtool_webhook::EventHandler;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "brtool-server")]
#[command(about = "HTTP receiver for Baserow row webhooks")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// JSON file describing the table's custom fields
    #[arg(short, long)]
    fields: Option<PathBuf>,

    /// Baserow host to ping at startup (host[:port], no scheme)
    #[arg(long, env = "BASEROW_HOST")]
    baserow_host: Option<String>,

    /// Baserow database token
    #[arg(long, env = "BASEROW_TOKEN", hide_env_values = true)]
    baserow_token: Option<String>,

    /// Talk to Baserow over HTTPS
    #[arg(long)]
    tls: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let fields = match &args.fields {
        Some(path) => load_fields(path)?,
        None => demo_fields(),
    };
    info!(
        "Custom fields: {}",
        fields.field_names().collect::<Vec<_>>().join(", ")
    );

    if let (Some(host), Some(token)) = (&args.baserow_host, &args.baserow_token) {
        let config = BaserowConfig {
            use_tls: args.tls,
            trace_http: args.verbose,
            ..BaserowConfig::new(host.clone(), token.clone())
        };
        match BaserowClient::new(config)?.ping().await {
            Ok(_) => info!("Baserow instance {} reachable", host),
            Err(e) => warn!("Baserow instance {} not reachable: {}", host, e),
        }
    }

    let mut handler = EventHandler::new(&fields)?;
    handler
        .on_create(|table_id, items| {
            for item in &items {
                info!("Row {} created in table {}: {}", item.id()?, table_id, item.to_json());
            }
            Ok(())
        })
        .on_update(|table_id, items, old_items| {
            for (i, item) in items.iter().enumerate() {
                let before = old_items
                    .get(i)
                    .map(|old| old.to_json().to_string())
                    .unwrap_or_else(|| "-".to_string());
                info!(
                    "Row {} updated in table {}: {} -> {}",
                    item.id()?,
                    table_id,
                    before,
                    item.to_json()
                );
            }
            Ok(())
        })
        .on_delete(|table_id, row_ids| {
            for id in row_ids {
                info!("Row {} deleted from table {}", id, table_id);
            }
            Ok(())
        });

    let app = build_router(Arc::new(handler));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!("Webhook endpoint listening on port {}", args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
