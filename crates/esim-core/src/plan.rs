//! # eSIM Plans
//!
//! Read-only plan catalog entries fetched from the storefront API,
//! plus the currency formatting used wherever a price is shown.

use serde::{Deserialize, Serialize};

/// A plan in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Unique plan identifier (e.g., "esim_1gb_7days")
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Data allowance as shown to customers (e.g., "3GB")
    pub data_allowance: String,

    /// Validity period (e.g., "15 Days")
    pub validity: String,

    /// Countries covered
    #[serde(default)]
    pub coverage: Vec<String>,

    /// Price in major units of `currency`
    pub price: f64,

    /// ISO 4217 code
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "MMK".to_string()
}

impl Plan {
    /// Price formatted for display
    pub fn display_price(&self) -> String {
        format_currency(self.price, &self.currency)
    }
}

/// Plan catalog as returned by `GET /esim-plans`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanCatalog {
    pub plans: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }

    /// Find a plan by ID
    pub fn get(&self, id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Number of decimals shown for a currency. Kyat is never shown with decimals.
pub fn fraction_digits(currency: &str) -> usize {
    if currency.trim().eq_ignore_ascii_case("MMK") {
        0
    } else {
        2
    }
}

/// Format an amount for display, e.g. `MMK 15,000` or `$15,000.00`.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_uppercase();
    let digits = fraction_digits(&code);

    let fixed = format!("{:.*}", digits, amount.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut number = group_thousands(integer);
    if let Some(fraction) = fraction {
        number.push('.');
        number.push_str(fraction);
    }

    let sign = if amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    match currency_symbol(&code) {
        Some(symbol) => format!("{}{}{}", sign, symbol, number),
        None => format!("{}{} {}", sign, code, number),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "THB" => Some("฿"),
        "SGD" => Some("S$"),
        _ => None,
    }
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
