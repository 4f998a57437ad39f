use partner_admin::PartnerForm;
use partner_shared::{
    action::PartnerAction,
    business_partner::{CardCode, CardType, PartnerPatch},
};

use crate::helpers::{card_codes, login_form, seed_partners, spawn_app, spawn_logged_in_app};

const LOGIN_MESSAGE: &str =
    "Failed to login. Please check your credentials and connection settings.";

#[tokio::test]
async fn login_loads_unfiltered_list() {
    // Arrange
    let mut app = spawn_app().await;
    seed_partners(&app);
    let form = login_form(&app);

    // Act
    let actual = app.core_client.login(&form).await;

    // Assert
    assert!(actual);
    assert!(app.core_client.is_logged_in());
    assert!(app.core_client.last_error().is_none());
    assert_eq!(card_codes(&app.core_client), ["C1", "L1", "S1"]);
    assert_eq!(app.service_layer.filters_received(), [None]);
}

#[tokio::test]
async fn login_with_wrong_password_shows_login_message() {
    // Arrange
    let mut app = spawn_app().await;
    let mut form = login_form(&app);
    form.password = "wrong".to_string().into();

    // Act
    let actual = app.core_client.login(&form).await;

    // Assert
    assert!(!actual);
    assert!(!app.core_client.is_logged_in());
    let error = app.core_client.last_error().unwrap();
    assert_eq!(error.to_string(), LOGIN_MESSAGE);
    assert_eq!(
        error.detail(),
        "Login failed. Enter valid user name and password"
    );
    assert_eq!(app.service_layer.active_sessions(), 0);
}

#[tokio::test]
async fn login_with_missing_field_sends_nothing() {
    // Arrange
    let mut app = spawn_app().await;
    let mut form = login_form(&app);
    form.username.clear();

    // Act
    let actual = app.core_client.login(&form).await;

    // Assert
    assert!(!actual);
    let error = app.core_client.last_error().unwrap();
    assert_eq!(error.message(), LOGIN_MESSAGE);
    assert_eq!(error.detail(), "Username is required");
    assert_eq!(app.service_layer.requests_received(), 0);
}

#[tokio::test]
async fn actions_before_login_fail_without_requests() {
    // Arrange
    let mut app = spawn_app().await;
    let card_code: CardCode = "C1".try_into().unwrap();
    let mut form = PartnerForm::default();
    form.card_name = "Acme Corp".to_string();
    let patch = PartnerPatch {
        phone1: Some("555-0100".to_string()),
        ..Default::default()
    };

    // Act + Assert
    let app_state = &mut app.core_client;
    assert!(!app_state.submit_form(&form).await);
    assert_eq!(
        app_state.last_error().unwrap().message(),
        "Failed to create contact"
    );
    assert!(!app_state.update(&card_code, &patch).await);
    assert_eq!(
        app_state.last_error().unwrap().message(),
        "Failed to update contact"
    );
    assert!(!app_state.delete(&card_code, true).await);
    assert_eq!(
        app_state.last_error().unwrap().message(),
        "Failed to delete contact"
    );
    assert!(!app_state.set_search_term("acme").await);
    assert_eq!(
        app_state.last_error().unwrap().message(),
        "Failed to load contacts"
    );
    assert_eq!(app.service_layer.requests_received(), 0);
}

#[tokio::test]
async fn filter_changes_refresh_with_new_values() {
    // Arrange
    let mut app = spawn_app().await;
    seed_partners(&app);
    let form = login_form(&app);
    assert!(app.core_client.login(&form).await);

    // Act - Search term
    assert!(app.core_client.set_search_term("acme").await);

    // Assert - Both name and email are searched
    assert_eq!(card_codes(&app.core_client), ["C1", "S1"]);

    // Act - Card type
    assert!(app.core_client.set_card_type(Some(CardType::Supplier)).await);

    // Assert
    assert_eq!(card_codes(&app.core_client), ["S1"]);
    assert_eq!(app.core_client.filter().search_term, "acme");
    assert_eq!(
        app.service_layer.filters_received(),
        [
            None,
            Some("contains(CardName,'acme') or contains(EmailAddress,'acme')".to_string()),
            Some(
                "(contains(CardName,'acme') or contains(EmailAddress,'acme')) \
                 and CardType eq 'cSupplier'"
                    .to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_list() {
    // Arrange
    let mut app = spawn_app().await;
    seed_partners(&app);
    let form = login_form(&app);
    assert!(app.core_client.login(&form).await);
    app.service_layer.expire_sessions();

    // Act
    let actual = app.core_client.refresh().await;

    // Assert
    assert!(!actual);
    assert_eq!(card_codes(&app.core_client), ["C1", "L1", "S1"]);
    let error = app.core_client.last_error().unwrap();
    assert_eq!(error.action(), PartnerAction::Load);
    assert_eq!(error.message(), "Failed to load contacts");
    assert_eq!(error.detail(), "Invalid session or session already timeout.");
}

#[tokio::test]
async fn submitting_new_form_creates_and_refreshes() {
    // Arrange
    let mut app = spawn_logged_in_app().await;
    let mut form = PartnerForm::default();
    form.card_name = "Acme Corp".to_string();
    form.email_address = "info@acme.example".to_string();

    // Act
    let actual = app.core_client.submit_form(&form).await;

    // Assert
    assert!(actual);
    let partners = app.core_client.partners();
    assert_eq!(partners.len(), 1);
    assert_eq!(partners[0].card_name, "Acme Corp");
    assert_eq!(partners[0].card_type, CardType::Customer);
    assert_eq!(
        partners[0].email_address.as_deref(),
        Some("info@acme.example")
    );
}

#[tokio::test]
async fn submitting_edit_sends_only_changed_fields() {
    // Arrange
    let mut app = spawn_app().await;
    seed_partners(&app);
    let form = login_form(&app);
    assert!(app.core_client.login(&form).await);
    let mut form = PartnerForm::edit(&app.core_client.partners()[0]);
    form.phone1 = "555-0199".to_string();

    // Act
    let actual = app.core_client.submit_form(&form).await;

    // Assert
    assert!(actual);
    assert_eq!(
        app.service_layer.patch_bodies(),
        [serde_json::json!({"Phone1": "555-0199"})]
    );
    let updated = &app.core_client.partners()[0];
    assert_eq!(updated.card_code.as_ref(), "C1");
    assert_eq!(updated.phone1.as_deref(), Some("555-0199"));
    assert_eq!(updated.email_address.as_deref(), Some("info@acme.example"));
}

#[tokio::test]
async fn submitting_unchanged_edit_sends_nothing() {
    // Arrange
    let mut app = spawn_app().await;
    seed_partners(&app);
    let form = login_form(&app);
    assert!(app.core_client.login(&form).await);
    let form = PartnerForm::edit(&app.core_client.partners()[0]);
    let requests_before = app.service_layer.requests_received();

    // Act
    let actual = app.core_client.submit_form(&form).await;

    // Assert
    assert!(actual);
    assert_eq!(app.service_layer.requests_received(), requests_before);
}

#[tokio::test]
async fn delete_requires_confirmation() {
    // Arrange
    let mut app = spawn_app().await;
    seed_partners(&app);
    let form = login_form(&app);
    assert!(app.core_client.login(&form).await);
    let card_code: CardCode = "L1".try_into().unwrap();
    let requests_before = app.service_layer.requests_received();

    // Act - Not confirmed
    let actual = app.core_client.delete(&card_code, false).await;

    // Assert - Nothing happened
    assert!(!actual);
    assert!(app.core_client.last_error().is_none());
    assert_eq!(app.service_layer.requests_received(), requests_before);

    // Act - Confirmed
    let actual = app.core_client.delete(&card_code, true).await;

    // Assert
    assert!(actual);
    assert_eq!(card_codes(&app.core_client), ["C1", "S1"]);
    assert!(app.service_layer.partner("L1").is_none());
}

#[tokio::test]
async fn deleting_missing_partner_shows_delete_message() {
    // Arrange
    let mut app = spawn_logged_in_app().await;
    let card_code: CardCode = "C99999".try_into().unwrap();

    // Act
    let actual = app.core_client.delete(&card_code, true).await;

    // Assert
    assert!(!actual);
    let error = app.core_client.last_error().unwrap();
    assert_eq!(error.to_string(), "Failed to delete contact");
    assert_eq!(error.detail(), "No matching records found (ODBC -2028)");
}

#[tokio::test]
async fn latest_error_replaces_previous() {
    // Arrange
    let mut app = spawn_logged_in_app().await;
    let missing: CardCode = "C99999".try_into().unwrap();

    // Act
    assert!(!app.core_client.submit_form(&PartnerForm::default()).await);
    assert!(!app.core_client.delete(&missing, true).await);

    // Assert
    assert_eq!(
        app.core_client.last_error().unwrap().action(),
        PartnerAction::Delete
    );
    app.core_client.clear_error();
    assert!(app.core_client.last_error().is_none());
}

#[tokio::test]
async fn logout_forgets_session_and_list() {
    // Arrange
    let mut app = spawn_app().await;
    seed_partners(&app);
    let form = login_form(&app);
    assert!(app.core_client.login(&form).await);

    // Act
    let actual = app.core_client.logout().await;

    // Assert
    assert!(actual);
    assert!(!app.core_client.is_logged_in());
    assert!(app.core_client.partners().is_empty());
    assert_eq!(app.service_layer.active_sessions(), 0);
}

#[tokio::test]
async fn invalid_login_form_drops_previous_session() {
    // Arrange
    let mut app = spawn_logged_in_app().await;
    assert!(app.core_client.is_logged_in());
    let mut form = login_form(&app);
    form.password = String::new().into();

    // Act
    let actual = app.core_client.login(&form).await;

    // Assert
    assert!(!actual);
    assert!(!app.core_client.is_logged_in());
    assert!(app.core_client.partners().is_empty());
    assert_eq!(
        app.core_client.last_error().unwrap().detail(),
        "Password is required"
    );
}

#[tokio::test]
async fn first_list_failing_after_login_shows_login_message() {
    // Arrange
    let mut app = spawn_app().await;
    seed_partners(&app);
    app.service_layer.set_list_unavailable(true);
    let form = login_form(&app);

    // Act
    let actual = app.core_client.login(&form).await;

    // Assert
    assert!(actual);
    assert!(app.core_client.is_logged_in());
    assert!(app.core_client.partners().is_empty());
    let error = app.core_client.last_error().unwrap();
    assert_eq!(error.action(), PartnerAction::Login);
    assert_eq!(error.message(), LOGIN_MESSAGE);
    assert_eq!(error.detail(), "Service temporarily unavailable");

    // Act - Later loads report against the list
    app.service_layer.set_list_unavailable(false);
    assert!(app.core_client.refresh().await);

    // Assert
    assert_eq!(card_codes(&app.core_client), ["C1", "L1", "S1"]);
}
