pub mod health;
pub mod speech;
pub mod voices;
