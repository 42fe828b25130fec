//! Terminal stand-in for page navigation.

use esim_core::{Navigation, Navigator, Route};
use std::fmt;
use std::sync::Mutex;
use tracing::debug;

/// Tracks the "page" the current command represents and prints where the
/// user would be sent next.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    current: Mutex<Route>,
    /// Announce on stderr, leaving stdout to machine-readable output
    stderr: bool,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigator for `--json` runs
    pub fn on_stderr() -> Self {
        Self {
            stderr: true,
            ..Self::default()
        }
    }

    pub fn writes_to_stderr(&self) -> bool {
        self.stderr
    }

    /// Enter a page without announcing it
    pub fn enter(&self, route: Route) {
        debug!(page = %route, "Entering page");
        *self.lock() = route;
    }

    fn announce(&self, message: fmt::Arguments<'_>) {
        if self.stderr {
            eprintln!("{}", message);
        } else {
            println!("{}", message);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Route> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for TerminalNavigator {
    fn current_route(&self) -> Route {
        self.lock().clone()
    }

    fn navigate(&self, to: Navigation) {
        match to {
            Navigation::Route(route) => {
                match &route {
                    Route::PaymentSuccess { transaction_id } => self.announce(format_args!(
                        "✅ Payment successful. Transaction: {}",
                        transaction_id
                    )),
                    Route::AdminLogin => self.announce(format_args!(
                        "🔒 Please sign in: esim-storefront admin login --email <email>"
                    )),
                    other => self.announce(format_args!("→ {}", other)),
                }
                *self.lock() = route;
            }
            Navigation::External(url) => {
                self.announce(format_args!("🌐 Continue your payment at:\n   {}", url));
            }
        }
    }
}
