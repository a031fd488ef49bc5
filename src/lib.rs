//! # Travel Planner
//!
//! A packing-list planner backed by a tool-calling LLM agent.
//!
//! This library provides:
//! - Two mock tools: a keyword weather classifier and a packing recommender
//! - A Gemini client with a configurable retry policy
//! - A tool-based agent loop, plus a deterministic runtime that needs no model
//! - A planning session that reduces an agent run to a short answer
//! - An HTTP front end with a form page and a JSON endpoint
//!
//! ## Example
//!
//! ```rust,ignore
//! use travel_planner::{config::Config, planner::PlanningSession};
//!
//! let config = Config::from_env()?;
//! let session = PlanningSession::from_config(&config)?;
//! println!("{}", session.plan_message("snowy Helsinki").await);
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod planner;
pub mod tools;

pub use config::Config;
pub use planner::{PlanOutcome, PlanningSession};
