#![warn(unused_crate_dependencies)]


mod app;
pub mod cli;
pub mod configuration;
mod forms;
mod report;
mod runner;
pub mod tracing;

pub use app::{ActionError, AdminApp};
pub use forms::{FormError, LoginForm, PartnerForm};
pub use report::render_partners;
pub use runner::{create_runtime, run};
