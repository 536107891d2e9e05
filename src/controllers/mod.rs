pub mod health;
pub mod spotify;
