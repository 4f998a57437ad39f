use partner_admin::{configuration::ServiceLayerSettings, AdminApp, LoginForm};
use partner_test_helper::TestApp;

pub async fn spawn_app() -> TestApp<AdminApp> {
    partner_test_helper::spawn_app(|_| AdminApp::default()).await
}

/// Spawns an app and logs in as the test user
pub async fn spawn_logged_in_app() -> TestApp<AdminApp> {
    let mut app = spawn_app().await;
    let form = login_form(&app);
    assert!(app.core_client.login(&form).await, "failed to login");
    app
}

/// Login form filled in with the credentials of the test user
pub fn login_form<C>(app: &TestApp<C>) -> LoginForm {
    let mut result = LoginForm::new(&ServiceLayerSettings {
        url: app.address.clone(),
        company_db: app.test_user.company_db.clone(),
    });
    result.username = app.test_user.username.clone();
    result.password = app.test_user.password.clone().into();
    result
}

/// Seeds one partner of each type
pub fn seed_partners<C>(app: &TestApp<C>) {
    app.service_layer.seed_partner(serde_json::json!({
        "CardCode": "C1", "CardName": "Acme Corp", "CardType": "cCustomer",
        "EmailAddress": "info@acme.example"
    }));
    app.service_layer.seed_partner(serde_json::json!({
        "CardCode": "S1", "CardName": "Globex", "CardType": "cSupplier",
        "EmailAddress": "orders@acme.example"
    }));
    app.service_layer.seed_partner(serde_json::json!({
        "CardCode": "L1", "CardName": "Initech", "CardType": "cLid"
    }));
}

pub fn card_codes(app: &AdminApp) -> Vec<String> {
    app.partners()
        .iter()
        .map(|partner| partner.card_code.to_string())
        .collect()
}
