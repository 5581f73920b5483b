//! Record types exchanged with a [`Querier`](crate::Querier)

use chrono::{DateTime, Utc};

use certcache::SizeOf;

/// Issued certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Opaque certificate identifier
    pub certificate_id: String,
    /// Template the certificate is rendered from
    pub template_id: i32,
    /// Course the certificate was issued for
    pub course_id: i32,
    /// Student the certificate was issued to
    pub student_id: i32,
    /// Last modification time
    pub timestamp: DateTime<Utc>,
    /// Certificate specific payload
    pub data: Vec<u8>,
}

/// Course a certificate can be issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Course identifier
    pub course_id: i32,
    /// Course payload
    pub data: Vec<u8>,
}

/// Certificate holder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Student identifier
    pub student_id: i32,
    /// Student payload
    pub data: Vec<u8>,
}

/// Document template certificates are rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Template identifier
    pub template_id: i32,
    /// Template source
    pub content: String,
}

impl SizeOf for Certificate {
    fn heap_size(&self) -> u64 {
        self.certificate_id.heap_size() + self.data.heap_size()
    }
}

impl SizeOf for Course {
    fn heap_size(&self) -> u64 {
        self.data.heap_size()
    }
}

impl SizeOf for Student {
    fn heap_size(&self) -> u64 {
        self.data.heap_size()
    }
}

impl SizeOf for Template {
    fn heap_size(&self) -> u64 {
        self.content.heap_size()
    }
}

/// Arguments for [`Querier::create_certificate`](crate::Querier::create_certificate)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateCertificateParams {
    /// Template to render from
    pub template_id: i32,
    /// Course being certified
    pub course_id: i32,
    /// Certificate holder
    pub student_id: i32,
}

/// Arguments for [`Querier::update_certificate`](crate::Querier::update_certificate)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCertificateParams {
    /// Certificate to update
    pub certificate_id: String,
    /// New payload
    pub data: Vec<u8>,
}

/// Arguments for [`Querier::update_course`](crate::Querier::update_course)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCourseParams {
    /// Course to update
    pub course_id: i32,
    /// New payload
    pub data: Vec<u8>,
}

/// Arguments for [`Querier::update_student`](crate::Querier::update_student)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateStudentParams {
    /// Student to update
    pub student_id: i32,
    /// New payload
    pub data: Vec<u8>,
}

/// Arguments for [`Querier::update_template`](crate::Querier::update_template)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTemplateParams {
    /// Template to update
    pub template_id: i32,
    /// New source
    pub content: String,
}

/// Page selection for list queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Maximum number of rows returned
    pub limit: i64,
    /// Rows skipped before the first one returned
    pub offset: i64,
}

impl ListParams {
    /// The first `limit` rows
    pub fn first(limit: i64) -> Self {
        Self { limit, offset: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certcache::size_of;
    use std::mem;

    #[test]
    fn test_certificate_size_counts_owned_bytes() {
        let cert = Certificate {
            certificate_id: "00000000".to_string(),
            template_id: 1,
            course_id: 2,
            student_id: 3,
            timestamp: Utc::now(),
            data: b"{}".to_vec(),
        };

        assert_eq!(size_of(&cert), mem::size_of::<Certificate>() as u64 + 8 + 2);
    }

    #[test]
    fn test_template_size_counts_content() {
        let tmpl = Template {
            template_id: 0,
            content: "<html></html>".to_string(),
        };

        assert_eq!(size_of(&tmpl), mem::size_of::<Template>() as u64 + 13);
    }

    #[test]
    fn test_list_params_first() {
        assert_eq!(ListParams::first(5), ListParams { limit: 5, offset: 0 });
    }
}
