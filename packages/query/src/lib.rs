#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter, aggregation, and hover-text engine for the rescue dashboard.
//!
//! Every function here is a pure, synchronous computation over a borrowed,
//! read-only incident table. [`filter::plot_data`] selects the rows for the
//! current [`FilterSelection`](rescue_dashboard_incident_models::FilterSelection),
//! [`chart`] turns them into map markers and per-district counts, and
//! [`hover`] builds the marker text.
//!
//! Calendar-based time windows are evaluated by a [`clock::DashboardClock`]
//! pinned to a fixed UTC offset.

pub mod chart;
pub mod clock;
pub mod filter;
pub mod hover;
