//! Visuanary web server.
//!
//! Serves the medical image analyzer form and forwards each submission to
//! Gemini. Reads the API key from the `GEMINI_API_KEY` environment variable.
//!
//! # Usage
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run -p visuanary-web
//! GEMINI_API_KEY=... cargo run -p visuanary-web -- --model gemini-2.0-flash
//! GEMINI_API_KEY=... cargo run -p visuanary-web -- --port 8080
//! ```
//!
//! Then open the printed URL in a browser, or post the form directly:
//!
//! ```bash
//! curl -F image=@rash.jpg -F note="itchy since yesterday" \
//!      -F "mode=📉 Severity Score" http://127.0.0.1:8501/api/generate
//! ```

use std::net::IpAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use visuanary::client::GeminiClient;
use visuanary::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use visuanary_web::{DEFAULT_MAX_UPLOAD_BYTES, WebConfig, spawn_web};

/// Medical image analyzer with a browser-based form.
#[derive(Parser)]
#[command(name = "visuanary-web")]
struct Args {
    /// Gemini model to use.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for the web UI server.
    #[arg(long, default_value_t = 8501)]
    port: u16,

    /// Gemini API endpoint root.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Largest accepted upload, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 1. Client configuration, explicitly constructed.
    let config = ClientConfig::from_env()?
        .with_model(args.model)
        .with_base_url(args.base_url);
    let client = GeminiClient::new(config).map_err(|e| e.to_string())?;

    // 2. Bind the server.
    let web_config = WebConfig {
        bind_addr: (args.host, args.port).into(),
        max_upload_bytes: args.max_upload_bytes,
    };
    let addr = spawn_web(Arc::new(client), web_config)
        .await
        .map_err(|e| format!("failed to bind {}:{}: {e}", args.host, args.port))?;
    println!("Visuanary: http://{addr}");

    // 3. Serve until interrupted.
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for shutdown signal: {e}"))?;
    Ok(())
}
