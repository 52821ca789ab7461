//! Report generation module.
//!
//! Turns a list of suggestions into an [`AnalysisReport`] and writes it out.
//!
//! # Example
//!
//! ```rust,ignore
//! use funimpute::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::generate(&suggestions, df.height(), df.width());
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write to files
//! ReportGenerator::save_json(&report, "out/report.json")?;
//! ReportGenerator::export_suggestions_csv(&suggestions, "out/suggestions.csv")?;
//! ```

mod generator;

pub use generator::{AnalysisReport, ReportGenerator, ReportSummary};
