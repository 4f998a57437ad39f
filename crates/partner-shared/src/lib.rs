//! Code shared between the business partner clients and their test tooling

#![warn(unused_crate_dependencies)]

pub mod action;
pub mod business_partner;
pub mod const_config;
pub mod errors;
pub mod filter;
mod macros;
pub mod req_args;
pub mod session;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
