//! Tutormatch - Matching and approval engine for a volunteer tutoring program
//!
//! This library pairs children seeking a tutor with volunteer tutors. It
//! grades candidate pairs by review order, age gap and distance, and walks
//! chosen pairs through a dual-approval tutorship lifecycle.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{grade_candidate, haversine_distance};
pub use crate::error::EngineError;
pub use crate::models::{Child, MatchRecord, Tutor, Tutorship, TutorshipActivation};
