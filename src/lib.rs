//! Rust library for discovering and controlling Radio Thermostat Wi-Fi thermostats
//!
//! This library provides an async API for the local HTTP/JSON interface of
//! Radio Thermostat / Filtrete CT50 and CT80 series thermostats. It supports:
//!
//! - Discovery of thermostats on the local network
//! - Automatic model detection and variant selection
//! - Reading temperature, HVAC activity, and humidity (CT80)
//! - Operating mode, fan mode, hold, and setpoint control
//! - Weekly heating/cooling program access
//! - Device naming and system information
//!
//! # Quick Start
//!
//! ```no_run
//! use radiotherm::ThermostatMode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Auto-discovery succeeds when exactly one thermostat is on the network
//!     if let Some(tstat) = radiotherm::get_thermostat(None).await? {
//!         println!("Found {} at {}", tstat.model_kind().model_id(), tstat.address());
//!
//!         println!("Current temperature: {}", tstat.temp().await?);
//!         tstat.set_tmode(ThermostatMode::Heat).await?;
//!         tstat.set_t_heat(68.0).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Multiple thermostats
//!
//! With more than one thermostat on the network, either pass an explicit
//! address to [`get_thermostat`] or enumerate them all:
//!
//! ```no_run
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut thermostats = std::pin::pin!(radiotherm::get_thermostats().await?);
//!     while let Some(tstat) = thermostats.next().await {
//!         println!("{}: {}", tstat.address(), tstat.temp().await?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized into several layers:
//!
//! - **Dispatch**: discovery, model detection, and variant selection
//! - **Registry**: the static table mapping model strings to variants
//! - **Thermostat**: high-level typed accessors for device fields
//! - **Discovery**: UDP multicast discovery of device addresses
//! - **Connection**: low-level HTTP/JSON resource access
//! - **Types**: domain types and wire representations
//!
//! Unknown hardware is ignored rather than treated as a fault: a device whose
//! reported model has no registry entry is skipped by enumeration and yields
//! `Ok(None)` from [`get_thermostat`].

mod connection;
mod discovery;
mod dispatch;
mod error;
mod registry;
mod thermostat;
mod types;

// Public exports
pub use discovery::{discover_address, discover_address_with_timeout};
pub use dispatch::{get_thermostat, get_thermostats};
pub use error::{RadiothermError, Result};
pub use registry::{resolve_variant, VariantDescriptor, THERMOSTATS};
pub use thermostat::{ModelKind, Thermostat};
pub use types::{
    FanMode, HvacState, ModelInfo, Program, ProgramMode, SystemInfo, ThermostatMode,
    ThermostatTime, TstatState,
};
