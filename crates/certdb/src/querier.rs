//! Record store contract

use crate::error::Result;
use crate::models::{
    Certificate, Course, CreateCertificateParams, ListParams, Student, Template,
    UpdateCertificateParams, UpdateCourseParams, UpdateStudentParams, UpdateTemplateParams,
};

/// Access to certificate, course, student and template records
///
/// Mutating operations return the record as stored after the change; deletes
/// return the removed record.
///
/// Deleting a course, student or template may leave the certificates that
/// reference it in place or remove them with it. Either way the
/// `*_by_{course,student,template}` queries must list every such certificate
/// until the delete has happened.
pub trait Querier: Send + Sync {
    /// Insert a certificate; the store assigns its id and timestamp
    fn create_certificate(&self, params: CreateCertificateParams) -> Result<Certificate>;
    /// Fetch a certificate by id
    fn get_certificate(&self, certificate_id: &str) -> Result<Certificate>;
    /// Replace a certificate's payload
    fn update_certificate(&self, params: UpdateCertificateParams) -> Result<Certificate>;
    /// Remove a certificate
    fn delete_certificate(&self, certificate_id: &str) -> Result<Certificate>;
    /// Page through all certificates
    fn list_certificates(&self, page: ListParams) -> Result<Vec<Certificate>>;
    /// Number of certificates
    fn count_certificates(&self) -> Result<i64>;

    /// Certificates issued for a course
    fn list_certificates_by_course(
        &self,
        course_id: i32,
        page: ListParams,
    ) -> Result<Vec<Certificate>>;
    /// Number of certificates issued for a course
    fn count_certificates_by_course(&self, course_id: i32) -> Result<i64>;
    /// Certificates issued to a student
    fn list_certificates_by_student(
        &self,
        student_id: i32,
        page: ListParams,
    ) -> Result<Vec<Certificate>>;
    /// Number of certificates issued to a student
    fn count_certificates_by_student(&self, student_id: i32) -> Result<i64>;
    /// Certificates rendered from a template
    fn list_certificates_by_template(
        &self,
        template_id: i32,
        page: ListParams,
    ) -> Result<Vec<Certificate>>;
    /// Number of certificates rendered from a template
    fn count_certificates_by_template(&self, template_id: i32) -> Result<i64>;

    /// Insert a course
    fn create_course(&self, data: Vec<u8>) -> Result<Course>;
    /// Fetch a course by id
    fn get_course(&self, course_id: i32) -> Result<Course>;
    /// Replace a course's payload
    fn update_course(&self, params: UpdateCourseParams) -> Result<Course>;
    /// Remove a course
    fn delete_course(&self, course_id: i32) -> Result<Course>;
    /// Page through all courses
    fn list_courses(&self, page: ListParams) -> Result<Vec<Course>>;
    /// Number of courses
    fn count_courses(&self) -> Result<i64>;

    /// Insert a student
    fn create_student(&self, data: Vec<u8>) -> Result<Student>;
    /// Fetch a student by id
    fn get_student(&self, student_id: i32) -> Result<Student>;
    /// Replace a student's payload
    fn update_student(&self, params: UpdateStudentParams) -> Result<Student>;
    /// Remove a student
    fn delete_student(&self, student_id: i32) -> Result<Student>;
    /// Page through all students
    fn list_students(&self, page: ListParams) -> Result<Vec<Student>>;
    /// Number of students
    fn count_students(&self) -> Result<i64>;

    /// Insert a template
    fn create_template(&self, content: String) -> Result<Template>;
    /// Fetch a template by id
    fn get_template(&self, template_id: i32) -> Result<Template>;
    /// Replace a template's source
    fn update_template(&self, params: UpdateTemplateParams) -> Result<Template>;
    /// Remove a template
    fn delete_template(&self, template_id: i32) -> Result<Template>;
    /// Page through all templates
    fn list_templates(&self, page: ListParams) -> Result<Vec<Template>>;
    /// Number of templates
    fn count_templates(&self) -> Result<i64>;
}
