//! Health report rendering
//!
//! [`layout`] decides where every line goes; [`renderer`] paints the result
//! into a PDF.

pub mod layout;
pub mod metrics;
pub mod renderer;

pub use layout::{layout_report, section_lines, wrap_words, Cursor, PatientProfile, ReportLayout, TextOp, VitalsSnapshot};
pub use metrics::{text_width, FontFace};
pub use renderer::{render, ReportError};

/// Download name offered for rendered reports
pub const REPORT_FILENAME: &str = "Medical_Health_Report.pdf";
