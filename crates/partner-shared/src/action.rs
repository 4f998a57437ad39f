//! The user triggered actions and the messages shown when they fail

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerAction {
    Login,
    Load,
    Create,
    Update,
    Delete,
    Logout,
}

impl PartnerAction {
    /// Used when the backend does not provide a usable error message
    pub fn default_error_message(&self) -> &'static str {
        match self {
            PartnerAction::Login => "Login failed",
            PartnerAction::Load => "Failed to fetch business partners",
            PartnerAction::Create => "Failed to create business partner",
            PartnerAction::Update => "Failed to update business partner",
            PartnerAction::Delete => "Failed to delete business partner",
            PartnerAction::Logout => "Logout failed",
        }
    }

    /// Single message shown to the user for any failure of this action
    pub fn user_facing_message(&self) -> &'static str {
        match self {
            PartnerAction::Login => {
                "Failed to login. Please check your credentials and connection settings."
            }
            PartnerAction::Load => "Failed to load contacts",
            PartnerAction::Create => "Failed to create contact",
            PartnerAction::Update => "Failed to update contact",
            PartnerAction::Delete => "Failed to delete contact",
            PartnerAction::Logout => "Failed to logout",
        }
    }
}
