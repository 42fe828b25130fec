//! # Contact Form Submission

use crate::api::PaymentApi;
use esim_core::{ContactForm, ContactResponse, StorefrontError, StorefrontResult, Validate};
use tracing::{info, instrument, warn};

/// Shown when the server accepted the message but sent no text back
pub const CONTACT_THANKS_MESSAGE: &str =
    "Thank you for your message. We'll get back to you soon!";

/// Validate and send the contact form.
///
/// An invalid form returns `Validation` without any request. A response
/// with `success: false` becomes `Rejected` carrying the server's message.
#[instrument(skip_all, fields(subject = %form.subject))]
pub async fn submit_contact(api: &PaymentApi, form: &ContactForm) -> StorefrontResult<ContactResponse> {
    form.validate()?;

    let mut form = form.clone();
    form.phone = form.phone.filter(|p| !p.trim().is_empty());

    let mut response = api.submit_contact_form(&form).await?;
    if !response.success {
        let message = response
            .message
            .unwrap_or_else(|| "Failed to send message. Please try again.".to_string());
        warn!(%message, "Contact form rejected");
        return Err(StorefrontError::Rejected { message });
    }

    info!("Contact form submitted");
    if response.message.as_deref().map_or(true, |m| m.trim().is_empty()) {
        response.message = Some(CONTACT_THANKS_MESSAGE.to_string());
    }
    Ok(response)
}
