//! Tubely Database Layer
//!
//! This crate provides the Postgres repository for video records and the narrow
//! `VideoStore` trait the upload pipeline consumes.
//!
// Module declarations
pub mod db;
pub mod store_traits;

// Re-exports
pub use db::VideoRepository;
pub use store_traits::VideoStore;
