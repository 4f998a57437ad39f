//! In memory stand-in for the business partner part of the Service Layer
//!
//! Only understands the filter expressions the client produces

use actix_web::{
    dev::Service as _,
    http::{header, Method, StatusCode},
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use partner_shared::errors::ServiceLayerErrorBody;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::SERVICE_LAYER_BASE_PATH;

pub const SESSION_COOKIE_NAME: &str = "B1SESSION";

type Record = Map<String, Value>;

#[derive(Debug)]
pub struct ServiceLayerState {
    username: String,
    password: String,
    company_db: String,
    sessions: Mutex<HashSet<String>>,
    partners: Mutex<BTreeMap<String, Record>>,
    next_card_number: AtomicUsize,
    requests_received: AtomicUsize,
    filters_received: Mutex<Vec<Option<String>>>,
    patch_bodies: Mutex<Vec<Value>>,
    omit_session_cookie: AtomicBool,
    plain_text_errors: AtomicBool,
    list_unavailable: AtomicBool,
}

impl ServiceLayerState {
    pub fn new(username: String, password: String, company_db: String) -> Self {
        Self {
            username,
            password,
            company_db,
            sessions: Default::default(),
            partners: Default::default(),
            next_card_number: AtomicUsize::new(1),
            requests_received: Default::default(),
            filters_received: Default::default(),
            patch_bodies: Default::default(),
            omit_session_cookie: Default::default(),
            plain_text_errors: Default::default(),
            list_unavailable: Default::default(),
        }
    }

    /// Number of requests that reached the server, of any kind
    pub fn requests_received(&self) -> usize {
        self.requests_received.load(Ordering::SeqCst)
    }

    /// `$filter` of every list request in the order received
    pub fn filters_received(&self) -> Vec<Option<String>> {
        self.filters_received.lock().unwrap().clone()
    }

    /// Raw bodies of every update request in the order received
    pub fn patch_bodies(&self) -> Vec<Value> {
        self.patch_bodies.lock().unwrap().clone()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Invalidates every session as if they had timed out
    pub fn expire_sessions(&self) {
        self.sessions.lock().unwrap().clear();
    }

    pub fn partner(&self, card_code: &str) -> Option<Value> {
        self.partners
            .lock()
            .unwrap()
            .get(card_code)
            .cloned()
            .map(Value::Object)
    }

    /// Stores a record directly, bypassing the API
    pub fn seed_partner(&self, record: Value) {
        let Value::Object(record) = record else {
            panic!("seeded partner must be a json object");
        };
        let card_code = record
            .get("CardCode")
            .and_then(Value::as_str)
            .expect("seeded partner must have a CardCode")
            .to_string();
        self.partners.lock().unwrap().insert(card_code, record);
    }

    /// Makes login succeed without setting any cookie
    pub fn set_omit_session_cookie(&self, value: bool) {
        self.omit_session_cookie.store(value, Ordering::SeqCst);
    }

    /// Makes every error response a plain text body instead of json
    pub fn set_plain_text_errors(&self, value: bool) {
        self.plain_text_errors.store(value, Ordering::SeqCst);
    }

    /// Makes every list request fail while sessions stay valid
    pub fn set_list_unavailable(&self, value: bool) {
        self.list_unavailable.store(value, Ordering::SeqCst);
    }

    fn error_response(&self, status: StatusCode, code: i64, message: &str) -> HttpResponse {
        if self.plain_text_errors.load(Ordering::SeqCst) {
            HttpResponse::build(status)
                .content_type("text/plain")
                .body("Internal failure")
        } else {
            HttpResponse::build(status).json(ServiceLayerErrorBody::new(code, message))
        }
    }

    fn has_valid_session(&self, req: &HttpRequest) -> bool {
        let Some(cookie_header) = req
            .headers()
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
        else {
            return false;
        };
        let sessions = self.sessions.lock().unwrap();
        cookie_header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(name, value)| name == SESSION_COOKIE_NAME && sessions.contains(value))
    }

    fn invalid_session(&self) -> HttpResponse {
        self.error_response(
            StatusCode::UNAUTHORIZED,
            301,
            "Invalid session or session already timeout.",
        )
    }
}

/// Returns the port the server is listening on
pub(crate) fn start_server_in_background(state: web::Data<ServiceLayerState>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind random port");
    let port = listener
        .local_addr()
        .expect("failed to get local address")
        .port();
    let server = HttpServer::new(move || {
        let counter = state.clone();
        App::new()
            .app_data(state.clone())
            .wrap_fn(move |req, srv| {
                counter.requests_received.fetch_add(1, Ordering::SeqCst);
                srv.call(req)
            })
            .service(
                web::scope(SERVICE_LAYER_BASE_PATH)
                    .route("/Login", web::post().to(login))
                    .route("/Logout", web::post().to(logout))
                    .route("/BusinessPartners", web::get().to(list_partners))
                    .route("/BusinessPartners", web::post().to(create_partner))
                    .default_service(web::to(partner_by_key)),
            )
    })
    .workers(1)
    .listen(listener)
    .expect("failed to listen on bound port")
    .run();
    tokio::spawn(server);
    port
}

#[derive(serde::Deserialize)]
struct LoginBody {
    #[serde(rename = "CompanyDB")]
    company_db: String,
    #[serde(rename = "UserName")]
    username: String,
    #[serde(rename = "Password")]
    password: String,
}

async fn login(state: web::Data<ServiceLayerState>, body: web::Json<LoginBody>) -> HttpResponse {
    if body.company_db != state.company_db {
        return state.error_response(
            StatusCode::UNAUTHORIZED,
            -304,
            "Fail to get DB Credentials from SLD",
        );
    }
    if body.username != state.username || body.password != state.password {
        return state.error_response(
            StatusCode::UNAUTHORIZED,
            100000027,
            "Login failed. Enter valid user name and password",
        );
    }
    let session_id = Uuid::new_v4().to_string();
    state.sessions.lock().unwrap().insert(session_id.clone());
    info!(username = %body.username, "fake service layer login");
    let mut response = HttpResponse::Ok();
    if !state.omit_session_cookie.load(Ordering::SeqCst) {
        response
            .append_header((
                header::SET_COOKIE,
                format!("{SESSION_COOKIE_NAME}={session_id}; path=/b1s; HttpOnly;"),
            ))
            .append_header((header::SET_COOKIE, "ROUTEID=.node1; path=/b1s"));
    }
    response.json(serde_json::json!({
        "odata.metadata": "$metadata#B1Sessions/@Element",
        "SessionId": session_id,
        "Version": "1000190",
        "SessionTimeout": 30
    }))
}

async fn logout(state: web::Data<ServiceLayerState>, req: HttpRequest) -> HttpResponse {
    if !state.has_valid_session(&req) {
        return state.invalid_session();
    }
    // Ending one session ends them all, only one user exists
    state.sessions.lock().unwrap().clear();
    HttpResponse::NoContent().finish()
}

async fn list_partners(
    state: web::Data<ServiceLayerState>,
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    if !state.has_valid_session(&req) {
        return state.invalid_session();
    }
    let filter = query.get("$filter").cloned();
    state.filters_received.lock().unwrap().push(filter.clone());
    if state.list_unavailable.load(Ordering::SeqCst) {
        return state.error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            -1,
            "Service temporarily unavailable",
        );
    }
    let matcher = filter.as_deref().map(FilterMatcher::parse).unwrap_or_default();
    let value: Vec<Value> = state
        .partners
        .lock()
        .unwrap()
        .values()
        .filter(|record| matcher.matches(record))
        .cloned()
        .map(Value::Object)
        .collect();
    HttpResponse::Ok().json(serde_json::json!({
        "odata.metadata": "$metadata#BusinessPartners",
        "value": value
    }))
}

async fn create_partner(
    state: web::Data<ServiceLayerState>,
    req: HttpRequest,
    body: web::Json<Record>,
) -> HttpResponse {
    if !state.has_valid_session(&req) {
        return state.invalid_session();
    }
    let mut record = body.into_inner();
    let has_name = record
        .get("CardName")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty());
    if !has_name || !record.contains_key("CardType") {
        return state.error_response(
            StatusCode::BAD_REQUEST,
            -5002,
            "Enter a business partner name and type",
        );
    }
    let card_code = match record.get("CardCode").and_then(Value::as_str) {
        Some(card_code) => card_code.to_string(),
        None => {
            let number = state.next_card_number.fetch_add(1, Ordering::SeqCst);
            format!("C{number:05}")
        }
    };
    let mut partners = state.partners.lock().unwrap();
    if partners.contains_key(&card_code) {
        return state.error_response(
            StatusCode::BAD_REQUEST,
            -2035,
            "This entry already exists in the following tables",
        );
    }
    record.insert("CardCode".to_string(), Value::String(card_code.clone()));
    partners.insert(card_code, record.clone());
    let mut response_body = record;
    // The real service returns many more fields than the client uses
    response_body.insert("Currency".to_string(), Value::String("##".to_string()));
    HttpResponse::Created().json(Value::Object(response_body))
}

async fn partner_by_key(
    state: web::Data<ServiceLayerState>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let Some(card_code) = card_code_from_path(req.path()) else {
        return state.error_response(StatusCode::NOT_FOUND, -1, "Resource not found");
    };
    if !state.has_valid_session(&req) {
        return state.invalid_session();
    }
    match *req.method() {
        Method::PATCH => update_partner(&state, &card_code, &body),
        Method::DELETE => delete_partner(&state, &card_code),
        _ => state.error_response(StatusCode::METHOD_NOT_ALLOWED, -1, "Method not allowed"),
    }
}

fn update_partner(state: &ServiceLayerState, card_code: &str, body: &[u8]) -> HttpResponse {
    let Ok(Value::Object(changes)) = serde_json::from_slice::<Value>(body) else {
        return state.error_response(StatusCode::BAD_REQUEST, -1000, "Invalid request body");
    };
    state
        .patch_bodies
        .lock()
        .unwrap()
        .push(Value::Object(changes.clone()));
    let mut partners = state.partners.lock().unwrap();
    let Some(record) = partners.get_mut(card_code) else {
        return not_found(state);
    };
    for (field, value) in changes {
        record.insert(field, value);
    }
    HttpResponse::NoContent().finish()
}

fn delete_partner(state: &ServiceLayerState, card_code: &str) -> HttpResponse {
    if state.partners.lock().unwrap().remove(card_code).is_some() {
        HttpResponse::NoContent().finish()
    } else {
        not_found(state)
    }
}

fn not_found(state: &ServiceLayerState) -> HttpResponse {
    state.error_response(
        StatusCode::NOT_FOUND,
        -2028,
        "No matching records found (ODBC -2028)",
    )
}

/// Extracts `key` from `.../BusinessPartners('key')`
fn card_code_from_path(path: &str) -> Option<String> {
    let last_segment = path.rsplit('/').next()?;
    let decoded = percent_decode(last_segment)?;
    let quoted = decoded
        .strip_prefix("BusinessPartners('")?
        .strip_suffix("')")?;
    Some(quoted.replace("''", "'"))
}

/// Reverses the percent-encoding of a path segment, `None` if malformed
fn percent_decode(segment: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(segment.len());
    let mut rest = segment.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'%' {
            let hex = std::str::from_utf8(tail.get(..2)?).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = &tail[2..];
        } else {
            bytes.push(byte);
            rest = tail;
        }
    }
    String::from_utf8(bytes).ok()
}

#[derive(Debug, Default)]
struct FilterMatcher {
    search_term: Option<String>,
    card_type: Option<String>,
}

impl FilterMatcher {
    fn parse(expression: &str) -> Self {
        Self {
            search_term: quoted_after(expression, "contains(CardName,'"),
            card_type: quoted_after(expression, "CardType eq '"),
        }
    }

    fn matches(&self, record: &Record) -> bool {
        let field = |name: &str| record.get(name).and_then(Value::as_str).unwrap_or_default();
        // Matching is case insensitive as with the collation of the real database
        let term_matches = self.search_term.as_ref().map_or(true, |term| {
            let term = term.to_lowercase();
            field("CardName").to_lowercase().contains(&term)
                || field("EmailAddress").to_lowercase().contains(&term)
        });
        let type_matches = self
            .card_type
            .as_ref()
            .map_or(true, |card_type| field("CardType") == card_type);
        term_matches && type_matches
    }
}

/// Reads the string literal that starts right after `prefix`
fn quoted_after(expression: &str, prefix: &str) -> Option<String> {
    let rest = &expression[expression.find(prefix)? + prefix.len()..];
    let mut literal = String::new();
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
            } else {
                return Some(literal);
            }
        }
        literal.push(c);
    }
    None
}
