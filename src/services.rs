pub mod auth;
pub mod checkout_service;
pub mod commission;
