use clap::{Args, Parser, Subcommand, ValueEnum};
use partner_shared::business_partner::{CardName, CardType, PartnerPatch};
use secrecy::SecretString;

use crate::PartnerForm;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    /// Overrides the configured Service Layer URL
    #[arg(long)]
    pub url: Option<String>,

    /// Overrides the configured company database
    #[arg(long)]
    pub company_db: Option<String>,

    #[arg(short, long, env = "PARTNER_USERNAME")]
    pub username: String,

    #[arg(short, long, env = "PARTNER_PASSWORD", hide_env_values = true)]
    pub password: SecretString,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the business partners, optionally filtered
    List {
        /// Matched against the name and the email address
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        card_type: Option<CardTypeArg>,
    },
    /// Create a new business partner
    Create(CreateArgs),
    /// Change the given fields of an existing business partner
    Update(UpdateArgs),
    /// Delete a business partner
    Delete {
        card_code: String,
        /// Confirms the deletion, nothing is deleted without it
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CardTypeArg {
    Customer,
    Supplier,
    Lead,
}

impl From<CardTypeArg> for CardType {
    fn from(value: CardTypeArg) -> Self {
        match value {
            CardTypeArg::Customer => CardType::Customer,
            CardTypeArg::Supplier => CardType::Supplier,
            CardTypeArg::Lead => CardType::Lead,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "customer")]
    pub card_type: CardTypeArg,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub mobile: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

impl CreateArgs {
    pub fn to_form(&self) -> PartnerForm {
        let mut form = PartnerForm::default();
        form.card_name.clone_from(&self.name);
        form.card_type = self.card_type.into();
        form.email_address = self.email.clone().unwrap_or_default();
        form.phone1 = self.phone.clone().unwrap_or_default();
        form.cellular = self.mobile.clone().unwrap_or_default();
        form.address = self.address.clone().unwrap_or_default();
        form
    }
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    pub card_code: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub card_type: Option<CardTypeArg>,
    /// Pass an empty value to clear the field
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub mobile: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

impl UpdateArgs {
    /// Only the flags that were passed end up in the patch
    pub fn to_patch(&self) -> anyhow::Result<PartnerPatch> {
        let card_name = match &self.name {
            Some(name) => Some(CardName::try_from(name.trim())?),
            None => None,
        };
        Ok(PartnerPatch {
            card_name,
            card_type: self.card_type.map(Into::into),
            email_address: self.email.clone(),
            phone1: self.phone.clone(),
            cellular: self.mobile.clone(),
            address: self.address.clone(),
        })
    }
}
