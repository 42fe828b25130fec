//! # Command Line
//!
//! `clap` definitions for the `esim-storefront` binary.

use clap::{Args, Parser, Subcommand};
use esim_core::{GatewayEnvironment, PaymentMethod};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "esim-storefront", version, about = "eSIM Myanmar storefront from the terminal")]
pub struct Cli {
    /// TOML config file (overrides ESIM_* environment variables)
    #[arg(long, global = true, env = "ESIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// API root, e.g. https://api.esim.com.mm/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the available eSIM plans
    Plans,

    /// Buy a plan
    Checkout(CheckoutArgs),

    /// Show the status of a payment
    Status {
        transaction_id: String,
    },

    /// Send a message to support
    Contact(ContactArgs),

    /// Admin area
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Plan id, e.g. esim_1gb_7days
    #[arg(long)]
    pub plan: String,

    /// MPU, VISA_MASTERCARD, UPI, UABPAY or MMQR
    #[arg(long, default_value = "MPU")]
    pub method: PaymentMethod,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// MPU card number
    #[arg(long)]
    pub card_number: Option<String>,

    /// Two digits, 01-12
    #[arg(long)]
    pub card_expiry_month: Option<String>,

    /// Two digits
    #[arg(long)]
    pub card_expiry_year: Option<String>,

    #[arg(long)]
    pub card_cvv: Option<String>,

    #[arg(long)]
    pub cardholder_name: Option<String>,

    /// Wallet phone number for MMQR
    #[arg(long)]
    pub mmqr_phone: Option<String>,
}

#[derive(Debug, Args)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub subject: String,

    #[arg(long)]
    pub message: String,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,

        /// Read from stdin when omitted; the terminal echoes what is typed
        #[arg(long, env = "ESIM_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// Payment statistics and recent transactions
    Dashboard,

    /// Payment gateway configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the current (masked) configuration
    Show,

    /// Replace the gateway credentials
    Set {
        /// UAT or LIVE
        #[arg(long)]
        environment: GatewayEnvironment,

        #[arg(long)]
        access_key: String,

        #[arg(long, env = "ESIM_GATEWAY_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },
}
