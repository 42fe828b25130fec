//! Contact form and admin console workflows.

mod common;

use common::{harness, harness_at};
use esim_client::submit_contact;
use esim_core::{
    AdminUser, ContactForm, GatewayConfigUpdate, GatewayEnvironment, Route, StorefrontError,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn contact_form() -> ContactForm {
    ContactForm {
        name: "Mya Mya".to_string(),
        email: "mya@example.com".to_string(),
        phone: Some("   ".to_string()),
        subject: "Activation help".to_string(),
        message: "My eSIM does not activate on my phone.".to_string(),
    }
}

fn gateway_config_json(masked: &str) -> serde_json::Value {
    json!({
        "environment": "LIVE",
        "merchant_user_id": "M001",
        "channel": "ESIM",
        "access_key_masked": masked,
        "secret_key_masked": "****",
        "last_updated": "2024-05-01T09:30:00.123456"
    })
}

#[tokio::test]
async fn test_contact_short_message_sends_nothing() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/api/contact"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut form = contact_form();
    form.message = "Help me".to_string();

    let err = submit_contact(&h.storefront.payments, &form).await.unwrap_err();
    match err {
        StorefrontError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors.field("message").is_some());
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_contact_submitted_with_blank_phone_dropped() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/api/contact"))
        .and(body_json(json!({
            "name": "Mya Mya",
            "email": "mya@example.com",
            "subject": "Activation help",
            "message": "My eSIM does not activate on my phone."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Thank you for your message. We'll get back to you soon!"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let response = submit_contact(&h.storefront.payments, &contact_form())
        .await
        .unwrap();
    assert!(response.success);
}

#[tokio::test]
async fn test_save_gateway_config_reloads_masked_view() {
    let h = harness_at(Route::AdminPaymentConfig).await;
    h.storefront
        .session
        .establish("tok_abc", AdminUser::admin("admin@esim.com.mm"))
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/admin/payment-gateway/config"))
        .and(body_json(json!({
            "environment": "LIVE",
            "access_key": "ak_live_0123456789",
            "secret_key": "sk_live_0123456789abcdef"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Configuration updated successfully",
            "environment": "LIVE",
            "updated_at": "2024-05-01T09:30:00.123456"
        })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/payment-gateway/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_config_json("ak_l****")))
        .expect(1)
        .mount(&h.server)
        .await;

    let update = GatewayConfigUpdate {
        environment: GatewayEnvironment::Live,
        access_key: "ak_live_0123456789".to_string(),
        secret_key: "sk_live_0123456789abcdef".to_string(),
    };
    let config = h
        .storefront
        .admin_console()
        .save_gateway_config(&update)
        .await
        .unwrap();

    assert_eq!(config.environment, GatewayEnvironment::Live);
    assert_eq!(config.access_key_masked, "ak_l****");
    assert!(config.last_updated.is_some());
}

#[tokio::test]
async fn test_save_gateway_config_rejected_by_server() {
    let h = harness_at(Route::AdminPaymentConfig).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/payment-gateway/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Gateway rejected the credentials"
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/payment-gateway/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_config_json("****")))
        .expect(0)
        .mount(&h.server)
        .await;

    let update = GatewayConfigUpdate {
        environment: GatewayEnvironment::Uat,
        access_key: "ak_uat_0123456789".to_string(),
        secret_key: "sk_uat_0123456789abcdef".to_string(),
    };
    let err = h
        .storefront
        .admin_console()
        .save_gateway_config(&update)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Gateway rejected the credentials");
}

#[tokio::test]
async fn test_short_gateway_keys_send_nothing() {
    let h = harness_at(Route::AdminPaymentConfig).await;
    Mock::given(method("POST"))
        .and(path("/api/admin/payment-gateway/config"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let update = GatewayConfigUpdate {
        environment: GatewayEnvironment::Uat,
        access_key: "short".to_string(),
        secret_key: "short".to_string(),
    };
    let err = h
        .storefront
        .admin_console()
        .save_gateway_config(&update)
        .await
        .unwrap_err();

    assert!(matches!(err, StorefrontError::Validation(_)));
}
