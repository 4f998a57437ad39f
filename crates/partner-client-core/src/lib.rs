//! Client for the business partner endpoints of the Service Layer
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod client;

pub use client::{Client, UiCallBack};
