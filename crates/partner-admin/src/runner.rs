use anyhow::{anyhow, bail, Context as _};
use partner_shared::{business_partner::CardCode, filter::PartnerFilter};
use tracing::info;

use crate::{
    cli::{Cli, Command},
    configuration::get_configuration,
    render_partners, AdminApp, LoginForm,
};

pub fn create_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Unable to create Runtime")
}

/// Logs in, executes the command, prints the resulting list and logs out
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = get_configuration()
        .context("Failed to read configuration")?
        .service_layer;
    if let Some(url) = cli.url {
        settings.url = url;
    }
    if let Some(company_db) = cli.company_db {
        settings.company_db = company_db;
    }
    let mut form = LoginForm::new(&settings);
    form.username = cli.username;
    form.password = cli.password;

    let mut app = AdminApp::default();
    if !app.login(&form).await {
        return Err(last_error(&app));
    }
    info!(?cli.command, "executing");
    let outcome = execute(&mut app, &cli.command).await;
    if outcome.is_ok() {
        println!("{}", render_partners(app.partners()));
    }
    // The outcome of the command is more relevant than a failed logout
    if !app.logout().await {
        if let Some(e) = app.last_error() {
            eprintln!("{e}: {}", e.detail());
        }
    }
    outcome
}

async fn execute(app: &mut AdminApp, command: &Command) -> anyhow::Result<()> {
    let succeeded = match command {
        Command::List { search, card_type } => {
            let filter = PartnerFilter::new(
                search.clone().unwrap_or_default(),
                card_type.map(Into::into),
            );
            app.set_filter(filter).await
        }
        Command::Create(args) => app.submit_form(&args.to_form()).await,
        Command::Update(args) => {
            let card_code = CardCode::try_from(args.card_code.as_str())?;
            let patch = args.to_patch()?;
            app.update(&card_code, &patch).await
        }
        Command::Delete { card_code, yes } => {
            let card_code = CardCode::try_from(card_code.as_str())?;
            if !yes {
                bail!("Not deleting {card_code} without confirmation, pass --yes to confirm");
            }
            app.delete(&card_code, *yes).await
        }
    };
    if succeeded {
        Ok(())
    } else {
        Err(last_error(app))
    }
}

fn last_error(app: &AdminApp) -> anyhow::Error {
    match app.last_error() {
        Some(e) => anyhow!("{e}: {}", e.detail()),
        None => anyhow!("Action failed without an error being recorded"),
    }
}
