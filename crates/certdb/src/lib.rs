//! # certdb
//!
//! Record cache for the certificate database.
//!
//! [`CachedQueries`] wraps any [`Querier`] and keeps recently used
//! certificates, courses, students and templates in one size-bounded LRU
//! cache. Creates and updates write through, reads fall through on a miss and
//! deletes invalidate. A certificate is dropped from the cache whenever the
//! course, student or template it references changes.

#![warn(missing_docs)]

mod cached;
mod error;
mod models;
mod querier;
mod record;

#[cfg(test)]
mod memory;

pub use cached::CachedQueries;
pub use error::{Error, Result};
pub use models::{
    Certificate, Course, CreateCertificateParams, ListParams, Student, Template,
    UpdateCertificateParams, UpdateCourseParams, UpdateStudentParams, UpdateTemplateParams,
};
pub use querier::Querier;
pub use record::{CachedRecord, Record, RecordKind};
