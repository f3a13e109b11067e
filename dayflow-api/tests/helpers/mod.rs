//! Test Helper Utilities
//!
//! Shared setup for the dayflow-api integration tests

#![allow(dead_code)]

pub mod app;
pub mod stubs;

pub use app::{empty_request, json_request, send, TestApp, ALICE_TOKEN, BOB_TOKEN};
pub use stubs::{ScriptedModel, StaticAuth};
