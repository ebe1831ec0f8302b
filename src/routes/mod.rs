pub mod book;
pub mod dashboard;
pub mod health;
pub mod user;
