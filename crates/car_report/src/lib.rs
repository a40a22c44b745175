//! Vehicle specification PDF reports.
//!
//! The crate turns a [`model::VehicleRecord`] into a fixed-layout PDF via
//! [`builder::ReportBuilder`], persists the bytes through
//! [`storage::DirectoryStore`] and hands the saved file to the platform
//! viewer with [`viewer::SystemViewer`].  [`flow::ReportFlow`] ties the
//! pieces together the way an interactive frontend would: worker-thread
//! rendering, status reporting and save-before-open ordering.

pub mod builder;
pub mod elements;
pub mod flow;
pub mod fonts;
pub mod model;
pub mod storage;
pub mod viewer;
