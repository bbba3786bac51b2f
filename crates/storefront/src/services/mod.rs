//! External service clients.

pub mod whatsapp;
