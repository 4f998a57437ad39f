use futures::channel::oneshot;
use partner_shared::{
    action::PartnerAction,
    const_config::{
        path::{PathSpec, PATH_LOGIN, PATH_LOGOUT},
        service_layer::DEFAULT_SERVICE_LAYER_URL,
    },
    errors::{AuthError, ClientError, RequestError, ServiceLayerErrorBody},
    req_args::LoginReqArgs,
    session::Session,
};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret as _;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use closure_traits::{ResponseHandler, ResponseHandlerOutput};

mod partners;

type ResponseResult = reqwest::Result<reqwest::Response>;

#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    inner: Arc<Mutex<ClientInner>>,
}

#[derive(Debug)]
struct ClientInner {
    service_layer_url: String,
    session: Option<Arc<Session>>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_LAYER_URL.to_string())
    }
}

impl ClientInner {
    #[tracing::instrument]
    fn new(service_layer_url: String) -> Self {
        Self {
            service_layer_url: service_layer_url.trim_end_matches('/').to_string(),
            session: None,
        }
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE")]
    pub fn new(service_layer_url: String) -> Self {
        let api_client = reqwest::Client::builder()
            .build()
            .expect("Unable to create reqwest client");
        Self {
            api_client,
            inner: Arc::new(Mutex::new(ClientInner::new(service_layer_url))),
        }
    }

    /// Opens a session for the company database in `args`
    ///
    /// Any earlier session is discarded first and nothing is stored if the
    /// login fails
    #[tracing::instrument(skip(ui_notify))]
    pub fn login<F: UiCallBack>(
        &self,
        args: LoginReqArgs,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<Arc<Session>, AuthError>> {
        self.clear_session();
        let body = args.to_login_body();
        let request = self.build_request(&PATH_LOGIN, Some(&body), None);
        let client = self.clone();
        deliver(
            request,
            move |resp: ResponseResult| process_login(resp, args, client),
            ui_notify,
        )
    }

    /// Ends the session on the backend. The local session is discarded even
    /// if the request fails
    #[tracing::instrument(skip(ui_notify))]
    pub fn logout<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> oneshot::Receiver<Result<(), ClientError>> {
        let request = self.authenticated_request(&PATH_LOGOUT, None::<&()>);
        self.clear_session();
        match request {
            Ok(request) => deliver(
                request,
                |resp: ResponseResult| process_empty(resp, PartnerAction::Logout),
                ui_notify,
            ),
            Err(e) => reject_now(e, ui_notify),
        }
    }

    /// Builds a request carrying the session token
    ///
    /// Fails without touching the network if there is no session
    fn authenticated_request<T>(
        &self,
        path_spec: &PathSpec,
        args: Option<&T>,
    ) -> Result<reqwest::RequestBuilder, ClientError>
    where
        T: serde::Serialize + ?Sized,
    {
        let Some(session) = self.session() else {
            warn!(path = ?path_spec.path, "request attempted without a session");
            return Err(ClientError::Unauthenticated);
        };
        Ok(self.build_request(path_spec, args, Some(&session)))
    }

    #[tracing::instrument(skip(self, args))]
    // WARNING: Must skip args as it my contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn build_request<T>(
        &self,
        path_spec: &PathSpec,
        args: Option<&T>,
        session: Option<&Session>,
    ) -> reqwest::RequestBuilder
    where
        T: serde::Serialize + ?Sized,
    {
        let mut request = self
            .api_client
            .request(path_spec.method.clone(), self.path_to_url(&path_spec.path));
        if let Some(session) = session {
            request = request.header(COOKIE, session.token().expose_secret());
        }
        match args {
            Some(args) if path_spec.method == Method::GET => request.query(args),
            Some(args) => request.json(args),
            None => request,
        }
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!("{}{path}", self.service_layer_url())
    }

    pub fn service_layer_url(&self) -> String {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .service_layer_url
            .clone()
    }

    pub fn session(&self) -> Option<Arc<Session>> {
        self.inner.lock().expect("mutex poisoned").session.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.lock().expect("mutex poisoned").session.is_some()
    }

    fn clear_session(&self) {
        self.inner.lock().expect("mutex poisoned").session = None;
    }
}

/// Sends the request and passes the response through `handler`, the result
/// is delivered on the returned channel followed by a call to `ui_notify`
fn deliver<H, O, F>(
    request: reqwest::RequestBuilder,
    handler: H,
    ui_notify: F,
) -> oneshot::Receiver<O::Output>
where
    H: ResponseHandler<O>,
    O: ResponseHandlerOutput,
    O::Output: 'static + Send,
    F: UiCallBack,
{
    let (tx, rx) = oneshot::channel();
    let on_done = move |resp: ResponseResult| async move {
        let msg = handler(resp).await;
        send_outcome(tx, msg);
        ui_notify();
    };
    reqwest_cross::fetch(request, on_done);
    rx
}

/// Delivers `error` without sending anything to the backend
fn reject_now<U, F>(error: ClientError, ui_notify: F) -> oneshot::Receiver<Result<U, ClientError>>
where
    F: UiCallBack,
{
    let (tx, rx) = oneshot::channel();
    send_outcome(tx, Err(error));
    ui_notify();
    rx
}

fn send_outcome<T>(tx: oneshot::Sender<T>, msg: T) {
    if tx.send(msg).is_err() {
        warn!("receiver dropped before the outcome could be delivered");
    }
}

// WARNING: Must skip the response as its headers may carry the session cookie
#[tracing::instrument(skip(response), ret, err(Debug))]
async fn process_empty(
    response: reqwest::Result<reqwest::Response>,
    action: PartnerAction,
) -> Result<(), ClientError> {
    let response = extract_response(response)?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(handle_error(response, action).await.into())
    }
}

#[tracing::instrument(skip(response), ret, err(Debug))]
async fn process_json_body<T>(
    response: reqwest::Result<reqwest::Response>,
    action: PartnerAction,
) -> Result<T, ClientError>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let response = extract_response(response)?;
    if !response.status().is_success() {
        return Err(handle_error(response, action).await.into());
    }
    response
        .json()
        .await
        .map_err(|e| RequestError::InvalidBody(e.to_string()).into())
}

/// For endpoints that may answer with `204 No Content` on success
#[tracing::instrument(skip(response), ret, err(Debug))]
async fn process_optional_json_body<T>(
    response: reqwest::Result<reqwest::Response>,
    action: PartnerAction,
) -> Result<Option<T>, ClientError>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let response = extract_response(response)?;
    let status = response.status();
    if !status.is_success() {
        return Err(handle_error(response, action).await.into());
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let body = response
        .text()
        .await
        .map_err(|e| RequestError::InvalidBody(e.to_string()))?;
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&body)
        .map(Some)
        .map_err(|e| RequestError::InvalidBody(e.to_string()).into())
}

#[tracing::instrument(skip(response, client), ret, err(Debug))]
async fn process_login(
    response: reqwest::Result<reqwest::Response>,
    args: LoginReqArgs,
    client: Client,
) -> Result<Arc<Session>, AuthError> {
    let response = extract_response(response)?;
    if !response.status().is_success() {
        return Err(match handle_error(response, PartnerAction::Login).await {
            RequestError::Status { status, message } => AuthError::Rejected { status, message },
            other => other.into(),
        });
    }
    let set_cookies = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok());
    let Some(token) = Session::token_from_set_cookies(set_cookies) else {
        warn!("login response did not include a session cookie");
        return Err(AuthError::MissingSessionToken);
    };
    let session = Arc::new(Session::new(args.username, args.company_db, token));
    client.inner.lock().expect("mutex poisoned").session = Some(Arc::clone(&session));
    info!(?session, "session stored");
    Ok(session)
}

/// Converts an error response into a [`RequestError`] using the backend's
/// message if one can be found in the body
#[tracing::instrument(skip(response), fields(status, url), ret)]
async fn handle_error(response: reqwest::Response, action: PartnerAction) -> RequestError {
    let status = response.status();
    let span = tracing::Span::current();
    span.record("status", status.as_u16());
    span.record("url", response.url().as_str());
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let message = match response.text().await {
        Ok(body) => ServiceLayerErrorBody::message_from_body(&body).unwrap_or_else(|| {
            if !body.is_empty() {
                debug!(?body, "error body not in the expected format");
            }
            action.default_error_message().to_string()
        }),
        Err(e) => {
            warn!(?e, "failed to get response body");
            action.default_error_message().to_string()
        }
    };
    RequestError::Status { status, message }
}

/// Provides a way to standardize the error message
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> Result<reqwest::Response, RequestError> {
    response.map_err(|e| {
        info!("Response is err: {e:#?}");
        RequestError::Network(e.to_string())
    })
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
mod closure_traits {
    pub trait ResponseHandler<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ResponseHandler<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ResponseHandlerOutput: futures::Future + Send {}
    impl<T> ResponseHandlerOutput for T where T: futures::Future + Send {}
}

#[cfg(target_arch = "wasm32")]
mod closure_traits {
    pub trait ResponseHandler<O>: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O {}
    impl<T, O> ResponseHandler<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ResponseHandlerOutput: futures::Future {}
    impl<T> ResponseHandlerOutput for T where T: futures::Future {}
}
