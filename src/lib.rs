//! Course Load Evaluator Library
//!
//! This library provides the front end for the course-load risk prediction
//! service: the HTTP client for its `/meta` and `/predict` endpoints, the form
//! controller holding page state, and the HTML and terminal renderings of that
//! page.
//!
//! # Modules
//!
//! - `core`: Page state and rules (controller, validation, risk meter).
//! - `integrations`: Prediction service client and wire models.
//! - `api_client`: Prediction service client.
//! - `commands`: Terminal shell command parsing.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `form`: Form controller and status machine.
//! - `html_view`: Server-rendered HTML page.
//! - `line_reader`: Line editing for the terminal shell.
//! - `models`: Wire data models.
//! - `risk_meter`: Percentage bar and level badge.
//! - `text_view`: Terminal rendering of the page.
//! - `validation`: Missing-value checks and numeric coercion.
//! - `web`: HTTP handlers and router for the page.

pub mod core;
pub mod integrations;

pub mod api_client;
pub mod commands;
pub mod config;
pub mod errors;
pub mod form;
pub mod html_view;
pub mod line_reader;
pub mod models;
pub mod risk_meter;
pub mod text_view;
pub mod validation;
pub mod web;
