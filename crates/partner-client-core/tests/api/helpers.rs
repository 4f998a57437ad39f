use partner_client_core::Client;
use partner_shared::business_partner::{BusinessPartner, CardType, PartnerDraft};
use partner_shared::filter::PartnerFilter;
use partner_test_helper::TestApp;

pub use partner_test_helper::no_cb;

pub async fn spawn_app() -> TestApp<Client> {
    partner_test_helper::spawn_app(Client::new).await
}

/// Spawns an app and logs in as the test user
pub async fn spawn_logged_in_app() -> TestApp<Client> {
    let app = spawn_app().await;
    app.core_client
        .login(app.test_user.login_args(), no_cb)
        .await
        .expect("failed to receive on rx")
        .expect("failed to login");
    app
}

pub fn draft(name: &str, card_type: CardType) -> PartnerDraft {
    PartnerDraft {
        card_code: None,
        card_name: name.try_into().unwrap(),
        card_type,
        email_address: None,
        phone1: None,
        cellular: None,
        address: None,
    }
}

pub async fn list_all(app: &TestApp<Client>) -> Vec<BusinessPartner> {
    app.core_client
        .list_partners(&PartnerFilter::default(), no_cb)
        .await
        .expect("failed to receive on rx")
        .expect("failed to list partners")
}
