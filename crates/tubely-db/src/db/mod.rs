//! Database repositories for data access layer
//!
//! Each repository is responsible for a specific domain entity.

pub mod video;

pub use video::VideoRepository;
