use futures::channel::oneshot;
use partner_shared::{
    action::PartnerAction,
    business_partner::{BusinessPartner, BusinessPartnerPage, CardCode, PartnerDraft, PartnerPatch},
    const_config::{
        path::{
            PATH_BUSINESS_PARTNERS, PATH_BUSINESS_PARTNER_CREATE, PATH_BUSINESS_PARTNER_DELETE,
            PATH_BUSINESS_PARTNER_UPDATE,
        },
        service_layer::FILTER_QUERY_PARAM,
    },
    errors::ClientError,
    filter::PartnerFilter,
};
use tracing::{debug, warn};

use super::{
    deliver, process_empty, process_json_body, process_optional_json_body, reject_now,
    ResponseResult,
};
use crate::{client::UiCallBack, Client};

impl Client {
    /// Lists the business partners matching `filter`
    ///
    /// Only the first page the backend returns is used
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_partners<F: UiCallBack>(
        &self,
        filter: &PartnerFilter,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<Vec<BusinessPartner>, ClientError>> {
        let expression = filter.to_odata();
        let query: Vec<(&str, &str)> = if filter.is_empty() {
            Vec::new()
        } else {
            vec![(FILTER_QUERY_PARAM, expression.as_str())]
        };
        match self.authenticated_request(&PATH_BUSINESS_PARTNERS, Some(&query)) {
            Ok(request) => deliver(
                request,
                |resp: ResponseResult| async move {
                    let page: BusinessPartnerPage =
                        process_json_body(resp, PartnerAction::Load).await?;
                    if let Some(next_link) = page.next_link {
                        warn!(
                            ?next_link,
                            "more business partners available than returned in the first page"
                        );
                    }
                    Ok::<_, ClientError>(page.value)
                },
                ui_notify,
            ),
            Err(e) => reject_now(e, ui_notify),
        }
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_partner<F: UiCallBack>(
        &self,
        draft: &PartnerDraft,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<BusinessPartner, ClientError>> {
        match self.authenticated_request(&PATH_BUSINESS_PARTNER_CREATE, Some(draft)) {
            Ok(request) => deliver(
                request,
                |resp: ResponseResult| {
                    process_json_body::<BusinessPartner>(resp, PartnerAction::Create)
                },
                ui_notify,
            ),
            Err(e) => reject_now(e, ui_notify),
        }
    }

    /// Sends only the fields set in `patch`
    ///
    /// Returns `None` if the backend does not echo the updated record
    #[tracing::instrument(skip(ui_notify))]
    pub fn update_partner<F: UiCallBack>(
        &self,
        card_code: &CardCode,
        patch: &PartnerPatch,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<Option<BusinessPartner>, ClientError>> {
        if patch.is_empty() {
            debug!("sending an update without any fields");
        }
        let path_spec = PATH_BUSINESS_PARTNER_UPDATE.with_key(card_code);
        match self.authenticated_request(&path_spec, Some(patch)) {
            Ok(request) => deliver(
                request,
                |resp: ResponseResult| {
                    process_optional_json_body::<BusinessPartner>(resp, PartnerAction::Update)
                },
                ui_notify,
            ),
            Err(e) => reject_now(e, ui_notify),
        }
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn delete_partner<F: UiCallBack>(
        &self,
        card_code: &CardCode,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<(), ClientError>> {
        let path_spec = PATH_BUSINESS_PARTNER_DELETE.with_key(card_code);
        match self.authenticated_request(&path_spec, None::<&()>) {
            Ok(request) => deliver(
                request,
                |resp: ResponseResult| process_empty(resp, PartnerAction::Delete),
                ui_notify,
            ),
            Err(e) => reject_now(e, ui_notify),
        }
    }
}
