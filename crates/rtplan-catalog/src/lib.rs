//! rtplan-catalog
//!
//! The in-memory collection of protocols, plan templates and objective
//! templates for one image server, with approval and treatment-site
//! statistics over it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod paths;
pub mod source;
pub mod statistics;

pub use catalog::{Catalog, CatalogTemplate};
pub use config::CatalogConfig;
pub use error::CatalogError;
pub use source::{DirectorySource, SourceFile, TemplateSource};
pub use statistics::{ApprovalStatistic, SiteStatistic};
