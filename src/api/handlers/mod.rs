pub mod admin;
pub mod event;
pub mod health;
pub mod tickets;
pub mod verify;
pub mod webhook;
