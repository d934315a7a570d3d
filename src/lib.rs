//! Student success toolkit: dropout-risk scoring for new registrations plus the
//! operational and reporting views staff work from.
//!
//! Modular structure:
//! - [`profile`]: Candidate profile captured at registration
//! - [`features`]: Fixed-order feature vector assembly
//! - [`model`]: Categorical encoders, probability models, artifact loading
//! - [`risk`]: Risk tiering, risk factors, action plans, scoring pipeline
//! - [`records`]: Historical student dataset, reports, alert board
//! - [`session`]: Registration queue and intervention log
//! - [`screen`]: Staff-facing screens
//! - [`logging`]: Structured logging

pub mod config;
pub mod features;
pub mod logging;
pub mod model;
pub mod profile;
pub mod records;
pub mod risk;
pub mod screen;
pub mod session;

pub use config::AppConfig;
pub use features::{FeatureAssembler, FeatureVector};
pub use logging::StructuredLogger;
pub use model::{load_classifier, RiskClassifier};
pub use profile::CandidateProfile;
pub use records::StudentDataset;
pub use risk::{RiskAssessment, RiskEngine, RiskLevel, RiskScorer};
pub use screen::Screen;
