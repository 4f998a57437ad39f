//! State behind the admin screens and the transitions triggered by the user
//!
//! Each action reports success as a `bool`. On failure the action's message
//! becomes the last error, which is what the user gets to see.

use std::fmt::Display;

use futures::channel::oneshot;
use partner_client_core::Client;
use partner_shared::{
    action::PartnerAction,
    business_partner::{BusinessPartner, CardCode, CardType, PartnerDraft, PartnerPatch},
    errors::ClientError,
    filter::PartnerFilter,
    internal_error,
};
use tracing::{debug, error, info};

use crate::{LoginForm, PartnerForm};

#[derive(Debug, Default)]
pub struct AdminApp {
    client: Option<Client>,
    partners: Vec<BusinessPartner>,
    filter: PartnerFilter,
    last_error: Option<ActionError>,
}

/// Failure of a user action
///
/// Displays as the message intended for the user, the cause is kept in
/// `detail` for logging and troubleshooting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    action: PartnerAction,
    detail: String,
}

impl ActionError {
    pub fn action(&self) -> PartnerAction {
        self.action
    }

    pub fn message(&self) -> &'static str {
        self.action.user_facing_message()
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ActionError {}

impl AdminApp {
    pub fn is_logged_in(&self) -> bool {
        self.client.as_ref().is_some_and(Client::is_logged_in)
    }

    pub fn partners(&self) -> &[BusinessPartner] {
        &self.partners
    }

    pub fn filter(&self) -> &PartnerFilter {
        &self.filter
    }

    pub fn last_error(&self) -> Option<&ActionError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Opens a new session with the values from `form` and loads the
    /// unfiltered list
    ///
    /// Any earlier session is dropped first. Returns `false` if the login
    /// failed. If only the first list fails the session is kept but the
    /// login message is shown
    #[tracing::instrument(skip_all, fields(username = %form.username))]
    pub async fn login(&mut self, form: &LoginForm) -> bool {
        self.clear_error();
        self.client = None;
        self.filter = PartnerFilter::default();
        self.partners.clear();
        let args = match form.to_login_args() {
            Ok(args) => args,
            Err(e) => {
                self.fail(PartnerAction::Login, e);
                return false;
            }
        };
        let client = Client::new(form.service_layer_url.trim().to_string());
        match wait_for(client.login(args, || {})).await {
            Ok(session) => info!(?session, "logged in"),
            Err(detail) => {
                self.fail(PartnerAction::Login, detail);
                return false;
            }
        }
        self.client = Some(client);
        self.load(PartnerAction::Login).await;
        true
    }

    /// Reloads the list using the current filter. The list is left as it
    /// was if this fails
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&mut self) -> bool {
        self.load(PartnerAction::Load).await
    }

    /// Failures are reported against `action`
    async fn load(&mut self, action: PartnerAction) -> bool {
        let filter = self.filter.clone();
        let outcome = self.send(|client| client.list_partners(&filter, || {})).await;
        match outcome {
            Ok(partners) => {
                debug!(count = partners.len(), "business partners loaded");
                self.partners = partners;
                true
            }
            Err(detail) => {
                self.fail(action, detail);
                false
            }
        }
    }

    pub async fn set_search_term<S: Into<String>>(&mut self, search_term: S) -> bool {
        self.filter.search_term = search_term.into();
        self.refresh().await
    }

    pub async fn set_card_type(&mut self, card_type: Option<CardType>) -> bool {
        self.filter.card_type = card_type;
        self.refresh().await
    }

    pub async fn set_filter(&mut self, filter: PartnerFilter) -> bool {
        self.filter = filter;
        self.refresh().await
    }

    /// Creates the record if the form is new, otherwise sends the fields
    /// that changed from the record being edited
    pub async fn submit_form(&mut self, form: &PartnerForm) -> bool {
        match form.editing() {
            None => match form.to_draft() {
                Ok(draft) => self.create(&draft).await,
                Err(e) => {
                    self.fail(PartnerAction::Create, e);
                    false
                }
            },
            Some(original) => match form.to_patch(original) {
                Ok(patch) => self.update(&original.card_code, &patch).await,
                Err(e) => {
                    self.fail(PartnerAction::Update, e);
                    false
                }
            },
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&mut self, draft: &PartnerDraft) -> bool {
        let outcome = self.send(|client| client.create_partner(draft, || {})).await;
        match outcome {
            Ok(created) => {
                info!(card_code = %created.card_code, "business partner created");
                self.refresh().await;
                true
            }
            Err(detail) => {
                self.fail(PartnerAction::Create, detail);
                false
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(&mut self, card_code: &CardCode, patch: &PartnerPatch) -> bool {
        if patch.is_empty() {
            debug!("nothing changed, update skipped");
            return true;
        }
        let outcome = self.send(|client| client.update_partner(card_code, patch, || {})).await;
        match outcome {
            Ok(_) => {
                info!(%card_code, "business partner updated");
                self.refresh().await;
                true
            }
            Err(detail) => {
                self.fail(PartnerAction::Update, detail);
                false
            }
        }
    }

    /// Nothing is sent unless `confirmed` is set
    #[tracing::instrument(skip(self))]
    pub async fn delete(&mut self, card_code: &CardCode, confirmed: bool) -> bool {
        if !confirmed {
            debug!("delete not confirmed");
            return false;
        }
        let outcome = self.send(|client| client.delete_partner(card_code, || {})).await;
        match outcome {
            Ok(()) => {
                info!(%card_code, "business partner deleted");
                self.refresh().await;
                true
            }
            Err(detail) => {
                self.fail(PartnerAction::Delete, detail);
                false
            }
        }
    }

    /// Ends the session and forgets everything loaded with it
    #[tracing::instrument(skip(self))]
    pub async fn logout(&mut self) -> bool {
        self.partners.clear();
        self.filter = PartnerFilter::default();
        let Some(client) = self.client.take() else {
            debug!("logout without a session");
            return true;
        };
        match wait_for(client.logout(|| {})).await {
            Ok(()) => true,
            Err(detail) => {
                self.fail(PartnerAction::Logout, detail);
                false
            }
        }
    }

    /// Starts a request on the current client, fails without sending
    /// anything if there is none
    async fn send<T, F>(&self, start: F) -> Result<T, String>
    where
        F: FnOnce(&Client) -> oneshot::Receiver<Result<T, ClientError>>,
    {
        let Some(client) = &self.client else {
            return Err(ClientError::Unauthenticated.to_string());
        };
        wait_for(start(client)).await
    }

    fn fail<D: Display>(&mut self, action: PartnerAction, detail: D) {
        let detail = detail.to_string();
        error!(?action, %detail, "{}", action.user_facing_message());
        self.last_error = Some(ActionError { action, detail });
    }
}

async fn wait_for<T, E: Display>(rx: oneshot::Receiver<Result<T, E>>) -> Result<T, String> {
    match rx.await {
        Ok(outcome) => outcome.map_err(|e| e.to_string()),
        Err(e) => Err(internal_error!(e)),
    }
}
