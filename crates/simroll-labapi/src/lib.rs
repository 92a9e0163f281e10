//! # simroll lab API client
//!
//! Client for the lab-simulation REST service. A simulation is started
//! with `POST {base_url}/simulations/create/{identifier}` (form field
//! `lab=<name>`, success 201) and stopped with
//! `DELETE {base_url}/simulations/{lab}-{identifier}` (success 204).
//! Both calls use HTTP Basic credentials and a fixed timeout.
//!
//! The batch layer consumes the [`SimulationApi`] trait and performs
//! its own status classification; the client only distinguishes
//! "a status was received" from a transport failure.

pub mod client;
pub mod config;
pub mod error;

pub use client::{ApiResponse, LabApiClient, SimulationApi};
pub use config::LabApiConfig;
pub use error::{LabApiError, LabApiResult};
