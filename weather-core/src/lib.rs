//! Core library for the weather record service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the weather provider, with a WeatherStack client
//! - The record store and the service that ties the two together
//!
//! It is used by `weather-server`, but can also be embedded in other binaries.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod store;

pub use config::{API_KEY_ENV, Config, ProviderConfig, ServerConfig};
pub use error::WeatherError;
pub use model::{CreateWeatherRequest, CreateWeatherResponse, WeatherRecord};
pub use provider::{ProviderReply, WeatherProvider, provider_from_config};
pub use service::WeatherService;
pub use store::{InMemoryStore, RecordStore};
