use partner_admin::{
    cli::{CardTypeArg, Cli, Command},
    run,
};
use partner_test_helper::TestApp;

use crate::helpers::{seed_partners, spawn_app};

fn cli_for<C>(app: &TestApp<C>, command: Command) -> Cli {
    Cli {
        is_to_std_out: true,
        url: Some(app.address.clone()),
        company_db: None,
        username: app.test_user.username.clone(),
        password: app.test_user.password.clone().into(),
        command,
    }
}

#[tokio::test]
async fn list_command_filters_and_logs_out() {
    // Arrange
    let app = spawn_app().await;
    seed_partners(&app);
    let cli = cli_for(
        &app,
        Command::List {
            search: Some("acme".to_string()),
            card_type: Some(CardTypeArg::Customer),
        },
    );

    // Act
    let actual = run(cli).await;

    // Assert
    actual.unwrap();
    assert_eq!(
        app.service_layer.filters_received().last().cloned().flatten(),
        Some(
            "(contains(CardName,'acme') or contains(EmailAddress,'acme')) \
             and CardType eq 'cCustomer'"
                .to_string()
        )
    );
    assert_eq!(app.service_layer.active_sessions(), 0);
}

#[tokio::test]
async fn wrong_password_fails_with_login_message() {
    // Arrange
    let app = spawn_app().await;
    let mut cli = cli_for(
        &app,
        Command::List {
            search: None,
            card_type: None,
        },
    );
    cli.password = "wrong".to_string().into();

    // Act
    let actual = run(cli).await;

    // Assert
    let error = actual.unwrap_err().to_string();
    assert!(
        error.starts_with("Failed to login. Please check your credentials"),
        "{error}"
    );
}

#[tokio::test]
async fn delete_without_confirmation_keeps_partner() {
    // Arrange
    let app = spawn_app().await;
    seed_partners(&app);
    let cli = cli_for(
        &app,
        Command::Delete {
            card_code: "C1".to_string(),
            yes: false,
        },
    );

    // Act
    let actual = run(cli).await;

    // Assert
    assert!(actual.is_err());
    assert!(app.service_layer.partner("C1").is_some());
    assert_eq!(app.service_layer.active_sessions(), 0);
}

#[tokio::test]
async fn confirmed_delete_removes_partner() {
    // Arrange
    let app = spawn_app().await;
    seed_partners(&app);
    let cli = cli_for(
        &app,
        Command::Delete {
            card_code: "C1".to_string(),
            yes: true,
        },
    );

    // Act
    let actual = run(cli).await;

    // Assert
    actual.unwrap();
    assert!(app.service_layer.partner("C1").is_none());
}
