use partner_shared::{
    business_partner::{BusinessPartner, CardName, CardType, PartnerDraft, PartnerPatch},
    errors::ConversionError,
    req_args::LoginReqArgs,
};
use secrecy::{ExposeSecret as _, SecretString};

use crate::configuration::ServiceLayerSettings;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} is invalid: {source}")]
    Invalid {
        field: &'static str,
        source: ConversionError,
    },
}

/// Values entered on the login screen
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
    pub service_layer_url: String,
    pub company_db: String,
}

impl LoginForm {
    /// Connection settings are prefilled, credentials start empty
    pub fn new(settings: &ServiceLayerSettings) -> Self {
        Self {
            username: String::new(),
            password: SecretString::default(),
            service_layer_url: settings.url.clone(),
            company_db: settings.company_db.clone(),
        }
    }

    pub fn to_login_args(&self) -> Result<LoginReqArgs, FormError> {
        required("Username", &self.username)?;
        required("Password", self.password.expose_secret())?;
        required("Service Layer URL", &self.service_layer_url)?;
        required("Company Database", &self.company_db)?;
        Ok(LoginReqArgs::new(
            self.username.trim(),
            self.password.clone(),
            self.company_db.trim(),
        ))
    }
}

/// Values of the create / edit form for a single business partner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerForm {
    /// The record being edited, `None` when creating a new one
    editing: Option<BusinessPartner>,
    pub card_name: String,
    pub card_type: CardType,
    pub email_address: String,
    pub phone1: String,
    pub cellular: String,
    pub address: String,
}

impl Default for PartnerForm {
    fn default() -> Self {
        Self {
            editing: None,
            card_name: String::new(),
            card_type: CardType::Customer,
            email_address: String::new(),
            phone1: String::new(),
            cellular: String::new(),
            address: String::new(),
        }
    }
}

impl PartnerForm {
    /// Form prefilled with the values of `partner`
    pub fn edit(partner: &BusinessPartner) -> Self {
        Self {
            editing: Some(partner.clone()),
            card_name: partner.card_name.clone(),
            card_type: partner.card_type,
            email_address: partner.email_address.clone().unwrap_or_default(),
            phone1: partner.phone1.clone().unwrap_or_default(),
            cellular: partner.cellular.clone().unwrap_or_default(),
            address: partner.address.clone().unwrap_or_default(),
        }
    }

    pub fn editing(&self) -> Option<&BusinessPartner> {
        self.editing.as_ref()
    }

    /// Empty optional fields are left out so the backend applies its defaults
    pub fn to_draft(&self) -> Result<PartnerDraft, FormError> {
        Ok(PartnerDraft {
            card_code: None,
            card_name: self.card_name()?,
            card_type: self.card_type,
            email_address: non_empty(&self.email_address),
            phone1: non_empty(&self.phone1),
            cellular: non_empty(&self.cellular),
            address: non_empty(&self.address),
        })
    }

    /// Only the fields that differ from `original` are included
    ///
    /// A cleared optional field is sent as an empty string so the backend
    /// clears it too
    pub fn to_patch(&self, original: &BusinessPartner) -> Result<PartnerPatch, FormError> {
        let card_name = self.card_name()?;
        Ok(PartnerPatch {
            card_name: (card_name.as_ref() != original.card_name).then_some(card_name),
            card_type: (self.card_type != original.card_type).then_some(self.card_type),
            email_address: changed(&original.email_address, &self.email_address),
            phone1: changed(&original.phone1, &self.phone1),
            cellular: changed(&original.cellular, &self.cellular),
            address: changed(&original.address, &self.address),
        })
    }

    fn card_name(&self) -> Result<CardName, FormError> {
        required("Name", &self.card_name)?;
        CardName::try_from(self.card_name.trim()).map_err(|source| FormError::Invalid {
            field: "Name",
            source,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Required { field })
    } else {
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn changed(original: &Option<String>, value: &str) -> Option<String> {
    let value = value.trim();
    (original.as_deref().unwrap_or_default() != value).then(|| value.to_string())
}
