//! # Routes
//!
//! Pages of the storefront and the admin area, addressed by path.
//! Navigation targets are either one of these routes or an external URL
//! (payment provider pages).

use std::fmt;

/// Path of the admin login page; also the root of the admin area
pub const ADMIN_LOGIN_PATH: &str = "/admin";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Home,
    About,
    Contact,
    PrivacyPolicy,
    TermsOfService,
    /// Checkout page, optionally with a preselected plan
    Payment { plan: Option<String> },
    /// Confirmation page for a transaction
    PaymentSuccess { transaction_id: String },
    AdminLogin,
    AdminDashboard,
    AdminPaymentConfig,
    NotFound(String),
}

impl Route {
    /// Location string including the query, e.g. `/payment/success?transaction_id=T1`
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::PrivacyPolicy => "/privacy-policy".to_string(),
            Route::TermsOfService => "/terms-of-service".to_string(),
            Route::Payment { plan: None } => "/payment".to_string(),
            Route::Payment { plan: Some(plan) } => format!("/payment?plan={}", plan),
            Route::PaymentSuccess { transaction_id } => {
                format!("/payment/success?transaction_id={}", transaction_id)
            }
            Route::AdminLogin => ADMIN_LOGIN_PATH.to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::AdminPaymentConfig => "/admin/payment-config".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Resolve a location string; unknown paths become `NotFound`
    pub fn parse(location: &str) -> Route {
        let (path, query) = match location.split_once('?') {
            Some((p, q)) => (p, q),
            None => (location, ""),
        };
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        let param = |name: &str| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
                .filter(|v| !v.is_empty())
        };

        match path {
            "/" => Route::Home,
            "/about" => Route::About,
            "/contact" => Route::Contact,
            "/privacy-policy" => Route::PrivacyPolicy,
            "/terms-of-service" => Route::TermsOfService,
            "/payment" => Route::Payment {
                plan: param("plan"),
            },
            "/payment/success" => match param("transaction_id") {
                Some(transaction_id) => Route::PaymentSuccess { transaction_id },
                None => Route::NotFound(location.to_string()),
            },
            ADMIN_LOGIN_PATH => Route::AdminLogin,
            "/admin/dashboard" => Route::AdminDashboard,
            "/admin/payment-config" => Route::AdminPaymentConfig,
            _ => Route::NotFound(location.to_string()),
        }
    }

    /// True for every page under `/admin`, including the login page
    pub fn is_admin_area(&self) -> bool {
        match self {
            Route::AdminLogin | Route::AdminDashboard | Route::AdminPaymentConfig => true,
            Route::NotFound(path) => path == ADMIN_LOGIN_PATH || path.starts_with("/admin/"),
            _ => false,
        }
    }

    pub fn is_login(&self) -> bool {
        matches!(self, Route::AdminLogin)
    }

    /// An expired session inside the admin area sends the user back to login
    pub fn should_redirect_to_login(&self) -> bool {
        self.is_admin_area() && !self.is_login()
    }

    /// Pages that need a signed-in admin
    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::AdminDashboard | Route::AdminPaymentConfig)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where the user is sent next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// A page of this site
    Route(Route),
    /// Full navigation away, e.g. to a payment provider
    External(String),
}

impl From<Route> for Navigation {
    fn from(route: Route) -> Self {
        Navigation::Route(route)
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Navigation::Route(route) => write!(f, "{}", route),
            Navigation::External(url) => f.write_str(url),
        }
    }
}
