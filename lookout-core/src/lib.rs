//! Core library for the `lookout` CLI.
//!
//! This crate defines:
//! - Response shapes for the weather, ISS and crypto services
//! - A typed GET executor that classifies failures
//! - Clients for each upstream service behind the [`LookoutApi`] trait
//! - A two-column console table renderer
//! - Configuration & credentials handling
//!
//! It is used by `lookout-cli`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod model;
pub mod request;
pub mod service;
pub mod table;
pub mod units;

pub use config::{Config, Endpoints, ServiceConfig, ServiceId};
pub use error::{LookoutError, classify_status};
pub use model::{Coordinates, CryptoAsset, IssLocation, WeatherInfo};
pub use request::RequestExecutor;
pub use service::{ApiClient, LookoutApi};
pub use table::{Table, TableRow};
pub use units::UnitSystem;
