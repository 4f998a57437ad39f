//! The business partner record as exposed by the Service Layer and the
//! payloads used to create and change one

use std::fmt::Display;

use crate::errors::ConversionError;

/// A customer, supplier or lead as returned by the backend
///
/// Only the fields this client works with are kept, anything else the
/// backend sends is ignored during deserialization
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct BusinessPartner {
    pub card_code: CardCode,
    pub card_name: String,
    pub card_type: CardType,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub phone1: Option<String>,
    #[serde(default)]
    pub cellular: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// One page of a business partner collection response
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct BusinessPartnerPage {
    pub value: Vec<BusinessPartner>,
    /// Present when the backend has more records than it returned
    #[serde(
        rename = "odata.nextLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_link: Option<String>,
}

/// Identifier of a business partner, assigned once and never changed
#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(try_from = "String", into = "String")]
pub struct CardCode(String);

/// Display name of a business partner, constrained to not be empty
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct CardName(String);

#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::Display,
)]
pub enum CardType {
    #[serde(rename = "cCustomer")]
    Customer,
    #[serde(rename = "cSupplier")]
    Supplier,
    #[serde(rename = "cLid")]
    Lead,
}

/// Payload used to create a new business partner
///
/// `card_code` is usually left empty so that the backend assigns one
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_code: Option<CardCode>,
    pub card_name: CardName,
    pub card_type: CardType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cellular: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Partial update of a business partner.
///
/// `Some` are the ones sent to the backend, everything else is left untouched
#[derive(Debug, Default, serde::Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PartnerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_name: Option<CardName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cellular: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CardCode {
    /// Width of the key column in the backend
    pub const MAX_LENGTH: usize = 15;

    /// Key as used inside `BusinessPartners('{key}')`
    ///
    /// Single quotes are doubled as required for OData string literals
    pub fn as_odata_key(&self) -> String {
        self.0.replace('\'', "''")
    }
}

impl CardName {
    pub const MAX_LENGTH: usize = 100;
}

impl CardType {
    /// The value the backend uses for this type in payloads and filters
    pub fn odata_value(&self) -> &'static str {
        match self {
            CardType::Customer => "cCustomer",
            CardType::Supplier => "cSupplier",
            CardType::Lead => "cLid",
        }
    }
}

impl PartnerPatch {
    /// Returns `true` if applying the patch would not change anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl TryFrom<String> for CardCode {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.chars().count() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.chars().count(),
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for CardCode {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl TryFrom<String> for CardName {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.chars().count() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.chars().count(),
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for CardName {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl From<CardCode> for String {
    fn from(value: CardCode) -> Self {
        value.0
    }
}

impl From<CardName> for String {
    fn from(value: CardName) -> Self {
        value.0
    }
}

impl AsRef<str> for CardCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CardName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CardCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for CardName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
