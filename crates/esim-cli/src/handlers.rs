//! # Command Handlers
//!
//! One handler per page of the storefront. Each enters its page on the
//! navigator first, so a 401 from an admin page sends the user to login.

use crate::app::App;
use crate::cli::{AdminCommand, CheckoutArgs, Command, ConfigCommand, ContactArgs};
use anyhow::{anyhow, bail, Context};
use esim_client::{submit_contact, Submission, ViewScope};
use esim_core::{
    format_currency, CardDetails, CheckoutForm, ContactForm, DashboardData, GatewayConfig,
    GatewayConfigUpdate, LoginCredentials, MmqrDetails, Navigator, PaymentDetails, PlanCatalog,
    Route, StorefrontError, Validate,
};
use esim_core::error::GENERIC_FAILURE_MESSAGE;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::future::Future;
use std::io::Write;
use tracing::{info, instrument, warn};

pub async fn dispatch(app: &App, command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Plans => list_plans(app, out).await,
        Command::Checkout(args) => checkout(app, args, out).await,
        Command::Status { transaction_id } => payment_status(app, &transaction_id, out).await,
        Command::Contact(args) => contact(app, args, out).await,
        Command::Admin { command } => admin(app, command, out).await,
    }
}

// =============================================================================
// Storefront pages
// =============================================================================

async fn list_plans(app: &App, out: &mut dyn Write) -> anyhow::Result<()> {
    app.navigator.enter(Route::Home);
    let catalog = app
        .storefront
        .payments
        .get_plans()
        .await
        .map_err(|e| failure(e, "Failed to load eSIM plans"))?;

    if app.json {
        return print_json(out, &catalog);
    }
    write_plans(out, &catalog)
}

fn write_plans(out: &mut dyn Write, catalog: &PlanCatalog) -> anyhow::Result<()> {
    if catalog.is_empty() {
        writeln!(out, "No plans are available right now.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<18} {:<20} {:<6} {:<9} {:>12}",
        "PLAN", "NAME", "DATA", "VALIDITY", "PRICE"
    )?;
    for plan in catalog.iter() {
        writeln!(
            out,
            "{:<18} {:<20} {:<6} {:<9} {:>12}",
            plan.id,
            plan.name,
            plan.data_allowance,
            plan.validity,
            plan.display_price()
        )?;
    }
    Ok(())
}

#[instrument(skip_all, fields(plan = %args.plan, method = %args.method))]
async fn checkout(app: &App, args: CheckoutArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    app.navigator.enter(Route::Payment {
        plan: Some(args.plan.clone()),
    });

    let catalog = app
        .storefront
        .payments
        .get_plans()
        .await
        .map_err(|e| failure(e, "Failed to load eSIM plans"))?;
    let plan = catalog
        .get(&args.plan)
        .ok_or_else(|| anyhow!("Unknown plan {:?}; run `esim-storefront plans`", args.plan))?;

    let form = checkout_form(args);
    note(
        app,
        out,
        format_args!(
            "Paying {} for {} with {}",
            plan.display_price(),
            plan.name,
            form.payment_method.display_name()
        ),
    )?;

    // Ctrl-C ends the view: the watcher owns the scope and drops it
    let scope = ViewScope::new();
    let token = scope.token().clone();
    let watcher = tokio::spawn(hold_until_interrupt(scope, tokio::signal::ctrl_c()));

    let result = run_checkout(app, &form, plan, &token, out).await;
    watcher.abort();

    let summary = result?;
    if app.json {
        print_json(out, &summary)?;
    }
    Ok(())
}

/// Keep `scope` alive until `interrupt` resolves. When the signal handler
/// cannot be installed the scope lives until the task is aborted.
async fn hold_until_interrupt<F>(scope: ViewScope, interrupt: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    let _scope = scope;
    if let Err(e) = interrupt.await {
        warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn run_checkout(
    app: &App,
    form: &CheckoutForm,
    plan: &esim_core::Plan,
    cancel: &esim_client::CancellationToken,
    out: &mut dyn Write,
) -> anyhow::Result<Value> {
    let checkout = &app.storefront.checkout;

    let submission = match checkout.submit(form, plan, cancel).await {
        Ok(submission) => submission,
        Err(StorefrontError::Cancelled) => bail!("Checkout cancelled"),
        Err(e @ StorefrontError::Validation(_)) => return Err(failure(e, GENERIC_FAILURE_MESSAGE)),
        Err(e) => {
            let message = checkout
                .state()
                .error_message()
                .map(String::from)
                .unwrap_or_else(|| e.to_string());
            bail!(message)
        }
    };

    match submission {
        Submission::Completed { transaction_id } => Ok(json!({
            "status": "success",
            "transaction_id": transaction_id,
        })),
        Submission::Redirected { url } => Ok(json!({
            "status": "redirected",
            "redirect_url": url,
        })),
        Submission::AwaitingQr {
            transaction_id,
            qr_code_url,
            expires_in,
        } => {
            note(app, out, format_args!("Scan this QR code with your banking app:"))?;
            note(app, out, format_args!("   {}", qr_code_url))?;
            if let Some(expires_in) = expires_in {
                note(
                    app,
                    out,
                    format_args!("The code expires in {} minutes.", expires_in.as_secs() / 60),
                )?;
            }
            note(
                app,
                out,
                format_args!("Waiting for payment {} (Ctrl-C to stop)...", transaction_id),
            )?;
            out.flush()?;

            match checkout.await_qr_payment(&transaction_id, cancel).await {
                Ok(details) => {
                    info!(transaction_id = %details.transaction_id, "QR payment completed");
                    Ok(serde_json::to_value(&details)?)
                }
                Err(StorefrontError::Cancelled) => bail!(
                    "Stopped waiting. Check later with: esim-storefront status {}",
                    transaction_id
                ),
                Err(e) => Err(failure(e, GENERIC_FAILURE_MESSAGE)),
            }
        }
    }
}

fn checkout_form(args: CheckoutArgs) -> CheckoutForm {
    let mut form = CheckoutForm::new(args.method, args.plan);
    form.customer_email = args.email;
    form.customer_phone = args.phone;

    if args.card_number.is_some() {
        form.card = Some(CardDetails {
            card_number: args.card_number.unwrap_or_default(),
            expiry_month: args.card_expiry_month.unwrap_or_default(),
            expiry_year: args.card_expiry_year.unwrap_or_default(),
            cvv: args.card_cvv.unwrap_or_default(),
            cardholder_name: args.cardholder_name.unwrap_or_default(),
        });
    }
    if args.mmqr_phone.is_some() {
        form.mmqr = Some(MmqrDetails {
            phone_number: args.mmqr_phone,
        });
    }
    form
}

async fn payment_status(app: &App, transaction_id: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    app.navigator.enter(Route::PaymentSuccess {
        transaction_id: transaction_id.to_string(),
    });
    let details = app
        .storefront
        .payments
        .get_payment_status(transaction_id)
        .await
        .map_err(|e| failure(e, "Failed to get payment status"))?;

    if app.json {
        return print_json(out, &details);
    }
    write_payment(out, &details)
}

fn write_payment(out: &mut dyn Write, details: &PaymentDetails) -> anyhow::Result<()> {
    writeln!(out, "Transaction: {}", details.transaction_id)?;
    writeln!(out, "Status:      {}", details.status)?;
    writeln!(
        out,
        "Amount:      {}",
        format_currency(details.amount, &details.currency)
    )?;
    writeln!(out, "Method:      {}", details.payment_method.display_name())?;
    writeln!(
        out,
        "Created:     {}",
        details.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    Ok(())
}

async fn contact(app: &App, args: ContactArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    app.navigator.enter(Route::Contact);
    let form = ContactForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        subject: args.subject,
        message: args.message,
    };

    let response = submit_contact(&app.storefront.payments, &form)
        .await
        .map_err(|e| failure(e, "Failed to send message. Please try again."))?;

    if app.json {
        return print_json(out, &response);
    }
    if let Some(message) = response.message {
        writeln!(out, "{}", message)?;
    }
    Ok(())
}

// =============================================================================
// Admin pages
// =============================================================================

async fn admin(app: &App, command: AdminCommand, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        AdminCommand::Login { email, password } => login(app, email, password, out).await,
        AdminCommand::Logout => {
            app.navigator.enter(Route::AdminDashboard);
            app.storefront.auth.logout();
            app.navigator.navigate(Route::AdminLogin.into());
            Ok(())
        }
        AdminCommand::Whoami => {
            let user = app.storefront.session.user();
            if app.json {
                return print_json(out, &user);
            }
            match user {
                Some(user) => writeln!(out, "{} ({})", user.email, user.role)?,
                None => writeln!(out, "Not signed in")?,
            }
            Ok(())
        }
        AdminCommand::Dashboard => {
            require_admin(app, Route::AdminDashboard)?;
            let data = app
                .storefront
                .admin_console()
                .dashboard()
                .await
                .map_err(|e| failure(e, "Failed to load dashboard data"))?;

            if app.json {
                return print_json(out, &data);
            }
            write_dashboard(out, &data)
        }
        AdminCommand::Config { command } => {
            require_admin(app, Route::AdminPaymentConfig)?;
            let console = app.storefront.admin_console();

            let config = match command {
                ConfigCommand::Show => console
                    .gateway_config()
                    .await
                    .map_err(|e| failure(e, "Failed to get configuration"))?,
                ConfigCommand::Set {
                    environment,
                    access_key,
                    secret_key,
                } => {
                    let update = GatewayConfigUpdate {
                        environment,
                        access_key,
                        secret_key,
                    };
                    let config = console
                        .save_gateway_config(&update)
                        .await
                        .map_err(|e| failure(e, "Failed to update configuration"))?;
                    note(app, out, format_args!("Payment gateway configuration updated."))?;
                    config
                }
            };

            if app.json {
                return print_json(out, &config);
            }
            write_gateway_config(out, &config)
        }
    }
}

async fn login(
    app: &App,
    email: String,
    password: Option<String>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    app.navigator.enter(Route::AdminLogin);

    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    let credentials = LoginCredentials::new(email, password);
    credentials
        .validate()
        .map_err(|e| failure(e.into(), GENERIC_FAILURE_MESSAGE))?;

    if !app
        .storefront
        .auth
        .login(&credentials.email, &credentials.password)
        .await
    {
        bail!("Invalid email or password");
    }

    note(app, out, format_args!("Signed in as {}", credentials.email))?;
    app.navigator.navigate(Route::AdminDashboard.into());
    Ok(())
}

/// Prompt on stderr. The terminal echoes what is typed; prefer
/// `ESIM_ADMIN_PASSWORD` on shared screens.
fn read_password() -> anyhow::Result<String> {
    let mut prompt = std::io::stderr();
    write!(prompt, "Password (input is visible): ")?;
    prompt.flush()?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn require_admin(app: &App, page: Route) -> anyhow::Result<()> {
    app.navigator.enter(page);
    if !app.storefront.session.is_admin() {
        app.navigator.navigate(Route::AdminLogin.into());
        bail!("Admin sign-in required");
    }
    Ok(())
}

fn write_dashboard(out: &mut dyn Write, data: &DashboardData) -> anyhow::Result<()> {
    let stats = &data.statistics;
    writeln!(out, "Environment:  {}", data.current_environment)?;
    writeln!(
        out,
        "Payments:     {} total, {} completed, {} pending, {} failed",
        stats.total_payments, stats.completed_payments, stats.pending_payments, stats.failed_payments
    )?;
    writeln!(out, "Success rate: {:.1}%", stats.success_rate)?;

    if data.recent_transactions.is_empty() {
        writeln!(out, "\nNo recent transactions.")?;
        return Ok(());
    }
    writeln!(out, "\nRecent transactions:")?;
    for tx in &data.recent_transactions {
        writeln!(
            out,
            "  {:<30} {:>14} {:<16} {:<10} {}",
            tx.transaction_id,
            format_currency(tx.amount, &tx.currency),
            tx.payment_method.display_name(),
            tx.status,
            tx.created_at.format("%Y-%m-%d %H:%M")
        )?;
    }
    Ok(())
}

fn write_gateway_config(out: &mut dyn Write, config: &GatewayConfig) -> anyhow::Result<()> {
    writeln!(out, "Environment:   {}", config.environment)?;
    if let Some(merchant) = &config.merchant_user_id {
        writeln!(out, "Merchant:      {}", merchant)?;
    }
    if let Some(channel) = &config.channel {
        writeln!(out, "Channel:       {}", channel)?;
    }
    writeln!(out, "Access key:    {}", config.access_key_masked)?;
    writeln!(out, "Secret key:    {}", config.secret_key_masked)?;
    if let Some(updated) = config.last_updated {
        writeln!(out, "Last updated:  {}", updated.format("%Y-%m-%d %H:%M:%S UTC"))?;
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

/// Human-readable progress: stdout normally, stderr under `--json`
fn note(app: &App, out: &mut dyn Write, message: fmt::Arguments<'_>) -> std::io::Result<()> {
    if app.json {
        writeln!(std::io::stderr(), "{}", message)
    } else {
        writeln!(out, "{}", message)
    }
}

fn print_json<T: Serialize>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Turn a client error into the message the page would show
fn failure(err: StorefrontError, fallback: &str) -> anyhow::Error {
    match err {
        StorefrontError::Validation(errors) => {
            let lines: Vec<String> = errors
                .iter()
                .map(|e| format!("  {}: {}", e.field, e.message))
                .collect();
            anyhow!("Please fix the following:\n{}", lines.join("\n"))
        }
        StorefrontError::Unauthorized => anyhow!("Your session has expired. Please sign in again."),
        other => anyhow!(other.user_message(fallback)),
    }
}
