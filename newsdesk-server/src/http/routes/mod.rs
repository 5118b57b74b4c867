//! Route handlers organized by resource

pub mod health;
pub mod articles;
pub mod categories;
