pub mod language_model;
pub mod provider_server;
