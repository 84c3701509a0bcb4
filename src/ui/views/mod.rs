pub mod accounts;
pub mod admin;
pub mod chat;
pub mod goals;
pub mod login;
pub mod points;
pub mod products;
pub mod promotions;
