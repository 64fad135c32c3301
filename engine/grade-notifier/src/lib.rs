//! Canvas Grade Notifier
//!
//! Reads the course list from Canvas, keeps the courses of one enrollment term,
//! collects every enrollment's final grade and publishes the summary as a single
//! notification.

pub mod assembler;
pub mod canvas;
pub mod config;
pub mod error;
pub mod models;
pub mod publisher;
pub mod service;

pub use assembler::{assemble_message, Assembly};
pub use canvas::{CanvasClient, GradeSource};
pub use config::NotifierConfig;
pub use error::{NotifierError, Result};
pub use models::*;
pub use publisher::{InMemoryPublisher, LogPublisher, Publisher};
pub use service::NotifierService;
