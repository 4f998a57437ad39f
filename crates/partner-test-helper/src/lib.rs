#![warn(unused_crate_dependencies)]

use actix_web::web;
use partner_shared::{
    req_args::LoginReqArgs,
    telemetry::{self, get_subscriber, init_subscriber},
};
use std::fmt::Debug;
use std::sync::{Arc, LazyLock, Mutex};
use uuid::Uuid;

mod service_layer;

pub use service_layer::{ServiceLayerState, SESSION_COOKIE_NAME};

/// Prefix of the Service Layer API on a real server
pub const SERVICE_LAYER_BASE_PATH: &str = "/b1s/v1";

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("partner_tests{}", Uuid::new_v4());
        let (file, path) = telemetry::create_trace_file(&log_file_name).unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

pub struct TestApp<C> {
    /// Base URL of the fake Service Layer, including [`SERVICE_LAYER_BASE_PATH`]
    pub address: String,
    pub service_layer: web::Data<ServiceLayerState>,
    pub test_user: TestUser,
    pub core_client: C,
}

impl<C> Debug for TestApp<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.address)
            .field("test_user", &self.test_user)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub password: String,
    pub company_db: String,
}

impl TestUser {
    fn generate() -> Self {
        Self {
            username: "manager".to_string(),
            password: Uuid::new_v4().to_string(),
            company_db: "SBODemoUS".to_string(),
        }
    }

    pub fn login_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(
            self.username.clone(),
            self.password.clone().into(),
            self.company_db.clone(),
        )
    }
}

/// In memory log sink, clones share the same buffer
///
/// Pass [`CapturedLogs::make_writer`] to `get_subscriber` and read the
/// output back with [`CapturedLogs::contents`]
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn make_writer(&self) -> impl Fn() -> CapturedLogs + Send + Sync + 'static {
        let logs = self.clone();
        move || logs.clone()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

pub fn start_tracing() {
    LazyLock::force(&TRACING);
}

/// Starts a fake Service Layer on a random port and builds the client under
/// test pointed at it
pub async fn spawn_app<C, B>(build_client: B) -> TestApp<C>
where
    B: FnOnce(String) -> C,
{
    start_tracing();
    let test_user = TestUser::generate();
    let service_layer = web::Data::new(ServiceLayerState::new(
        test_user.username.clone(),
        test_user.password.clone(),
        test_user.company_db.clone(),
    ));
    let port = service_layer::start_server_in_background(service_layer.clone());
    let address = port_to_test_address(port);
    TestApp {
        core_client: build_client(address.clone()),
        address,
        service_layer,
        test_user,
    }
}

pub fn port_to_test_address(application_port: u16) -> String {
    format!("http://127.0.0.1:{application_port}{SERVICE_LAYER_BASE_PATH}")
}
