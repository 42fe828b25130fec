//! # esim-cli
//!
//! Terminal front-end for the eSIM Myanmar storefront.
//!
//! ## Commands
//!
//! | Command | Page |
//! |---------|------|
//! | `plans` | Home, plan list |
//! | `checkout --plan <id> --method <m>` | Payment |
//! | `status <transaction_id>` | Payment success |
//! | `contact ...` | Contact form |
//! | `admin login / logout / whoami` | Admin login |
//! | `admin dashboard` | Admin dashboard |
//! | `admin config show / set` | Payment gateway configuration |

pub mod app;
pub mod cli;
pub mod handlers;
pub mod navigator;

pub use app::App;
pub use cli::Cli;
pub use handlers::dispatch;
pub use navigator::TerminalNavigator;
