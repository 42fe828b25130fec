//! # eSIM Storefront
//!
//! Browse plans, pay and manage the payment gateway from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! # Point at the API (or use --config storefront.toml)
//! export ESIM_API_BASE_URL=https://api.esim.com.mm/api
//!
//! esim-storefront plans
//! esim-storefront checkout --plan esim_1gb_7days --method MMQR
//! esim-storefront admin login --email admin@esim.com.mm
//! ```

use clap::Parser;
use esim_cli::{dispatch, App, Cli};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    if !cli.json {
        print_banner();
    }

    let app = App::from_cli(&cli)?;

    let mut stdout = std::io::stdout();
    dispatch(&app, cli.command, &mut stdout).await
}

fn print_banner() {
    eprintln!(
        r#"
  📶 eSIM Myanmar Storefront
  ━━━━━━━━━━━━━━━━━━━━━━━━━━
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
