pub mod access;
pub mod bookmark;
pub mod user;
