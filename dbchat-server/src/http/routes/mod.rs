//! Route handlers

pub mod catalog;
pub mod chat;
pub mod health;
pub mod ui;
