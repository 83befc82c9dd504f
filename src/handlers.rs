pub mod auth;
pub mod crud;
pub mod sale;
pub mod staff;
