//! Tubely API Library
//!
//! HTTP handlers for the video upload endpoints and the application setup that wires
//! configuration, the metadata store and the storage backends together.

mod api_doc;
mod handlers;
mod services;
mod telemetry;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
