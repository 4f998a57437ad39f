//! Builds the `$filter` expression used when listing business partners

use crate::business_partner::CardType;

/// Search state as entered by the user
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartnerFilter {
    /// Matched as a substring of the name or the email address
    pub search_term: String,
    pub card_type: Option<CardType>,
}

impl PartnerFilter {
    pub fn new<S: Into<String>>(search_term: S, card_type: Option<CardType>) -> Self {
        Self {
            search_term: search_term.into(),
            card_type,
        }
    }

    /// Returns an empty string if nothing should be filtered
    pub fn to_odata(&self) -> String {
        build_filter(&self.search_term, self.card_type)
    }

    /// Returns `true` if the filter does not restrict the results
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.card_type.is_none()
    }
}

pub fn build_filter(search_term: &str, card_type: Option<CardType>) -> String {
    let search_condition = (!search_term.is_empty()).then(|| {
        let term = escape_literal(search_term);
        format!("contains(CardName,'{term}') or contains(EmailAddress,'{term}')")
    });
    let type_condition =
        card_type.map(|card_type| format!("CardType eq '{}'", card_type.odata_value()));

    match (search_condition, type_condition) {
        (Some(search), Some(card_type)) => format!("({search}) and {card_type}"),
        (Some(search), None) => search,
        (None, Some(card_type)) => card_type,
        (None, None) => String::new(),
    }
}

/// OData string literals escape a single quote by doubling it
fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}
