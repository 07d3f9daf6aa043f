pub mod access;
pub mod upload;
