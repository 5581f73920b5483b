//! Cache keys and cached values for database records
//!
//! All four record kinds share one cache keyed by the 32-bit hash of
//! `<prefix><id>`. Different kinds can therefore collide on a key, which is
//! why a cached value carries its kind and lookups check it.

use std::fmt;

use certcache::{hash_string, size_of, Sizeable};

use crate::models::{Certificate, Course, Student, Template};

/// Kind of record stored in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// [`Certificate`]
    Certificate,
    /// [`Course`]
    Course,
    /// [`Student`]
    Student,
    /// [`Template`]
    Template,
}

impl RecordKind {
    /// Key namespace of this kind
    pub fn prefix(self) -> &'static str {
        match self {
            RecordKind::Certificate => "certificate_",
            RecordKind::Course => "course_",
            RecordKind::Student => "student_",
            RecordKind::Template => "template_",
        }
    }

    /// Cache key of the record of this kind identified by `id`
    pub fn key(self, id: &str) -> u32 {
        hash_string(&format!("{}{}", self.prefix(), id))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Certificate => "certificate",
            RecordKind::Course => "course",
            RecordKind::Student => "student",
            RecordKind::Template => "template",
        };
        f.write_str(name)
    }
}

/// Value stored in the record cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedRecord {
    /// Cached certificate
    Certificate(Certificate),
    /// Cached course
    Course(Course),
    /// Cached student
    Student(Student),
    /// Cached template
    Template(Template),
}

impl CachedRecord {
    /// Kind of the wrapped record
    pub fn kind(&self) -> RecordKind {
        match self {
            CachedRecord::Certificate(_) => RecordKind::Certificate,
            CachedRecord::Course(_) => RecordKind::Course,
            CachedRecord::Student(_) => RecordKind::Student,
            CachedRecord::Template(_) => RecordKind::Template,
        }
    }
}

impl Sizeable for CachedRecord {
    fn size(&self) -> u64 {
        match self {
            CachedRecord::Certificate(cert) => size_of(cert),
            CachedRecord::Course(course) => size_of(course),
            CachedRecord::Student(student) => size_of(student),
            CachedRecord::Template(tmpl) => size_of(tmpl),
        }
    }
}

/// A record type that can live in the record cache
pub trait Record: Clone {
    /// Kind tag of this type
    const KIND: RecordKind;

    /// Identifier used to build the cache key
    fn cache_id(&self) -> String;

    /// Wrap for storage in the cache
    fn into_cached(self) -> CachedRecord;

    /// Unwrap a cached value, handing it back if it holds another kind
    fn from_cached(record: CachedRecord) -> Result<Self, CachedRecord>;
}

macro_rules! impl_record {
    ($ty:ident, $id:ident) => {
        impl Record for $ty {
            const KIND: RecordKind = RecordKind::$ty;

            fn cache_id(&self) -> String {
                self.$id.to_string()
            }

            fn into_cached(self) -> CachedRecord {
                CachedRecord::$ty(self)
            }

            fn from_cached(record: CachedRecord) -> Result<Self, CachedRecord> {
                match record {
                    CachedRecord::$ty(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

impl_record!(Certificate, certificate_id);
impl_record!(Course, course_id);
impl_record!(Student, student_id);
impl_record!(Template, template_id);
