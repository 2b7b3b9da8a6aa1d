pub mod auth;
pub mod category;
pub mod listing;
pub mod rating;
pub mod types;
