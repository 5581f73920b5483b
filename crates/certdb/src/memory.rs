//! In-memory [`Querier`] for exercising the cache layer

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::models::{
    Certificate, Course, CreateCertificateParams, ListParams, Student, Template,
    UpdateCertificateParams, UpdateCourseParams, UpdateStudentParams, UpdateTemplateParams,
};
use crate::querier::Querier;
use crate::record::RecordKind;

#[derive(Default)]
struct Tables {
    certificates: BTreeMap<String, Certificate>,
    courses: BTreeMap<i32, Course>,
    students: BTreeMap<i32, Student>,
    templates: BTreeMap<i32, Template>,
    next_id: i32,
}

/// Record store backed by maps, with per-operation call counters and
/// injectable failures
#[derive(Default)]
pub struct MemoryQuerier {
    tables: Mutex<Tables>,
    calls: Mutex<HashMap<&'static str, u32>>,
    failing: Mutex<HashSet<&'static str>>,
    cascade: AtomicBool,
}

fn page<T>(rows: impl Iterator<Item = T>, page: ListParams) -> Vec<T> {
    rows.skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

fn not_found(kind: RecordKind, id: impl ToString) -> Error {
    Error::NotFound {
        kind,
        id: id.to_string(),
    }
}

impl MemoryQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `op` was invoked
    pub fn calls(&self, op: &str) -> u32 {
        self.calls.lock().get(op).copied().unwrap_or(0)
    }

    /// Make every later call to `op` fail with a backend error
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().insert(op);
    }

    /// Make deleting a course, student or template also delete the
    /// certificates that reference it, like an `ON DELETE CASCADE` key
    pub fn cascade_deletes(&self) {
        self.cascade.store(true, Ordering::Relaxed);
    }

    /// Change a certificate behind the cache's back
    pub fn overwrite_certificate(&self, cert: Certificate) {
        self.tables
            .lock()
            .certificates
            .insert(cert.certificate_id.clone(), cert);
    }

    fn enter(&self, op: &'static str) -> Result<()> {
        *self.calls.lock().entry(op).or_insert(0) += 1;
        if self.failing.lock().contains(op) {
            return Err(Error::Backend(format!("{} failed", op)));
        }
        Ok(())
    }

    fn certificates_where(
        &self,
        pred: impl Fn(&Certificate) -> bool,
        params: ListParams,
    ) -> Vec<Certificate> {
        let tables = self.tables.lock();
        page(tables.certificates.values().filter(|c| pred(*c)).cloned(), params)
    }

    fn count_where(&self, pred: impl Fn(&Certificate) -> bool) -> i64 {
        self.tables.lock().certificates.values().filter(|c| pred(*c)).count() as i64
    }
}

impl Querier for MemoryQuerier {
    fn create_certificate(&self, params: CreateCertificateParams) -> Result<Certificate> {
        self.enter("create_certificate")?;
        let mut tables = self.tables.lock();
        tables.next_id += 1;
        let cert = Certificate {
            certificate_id: format!("{:08x}", tables.next_id),
            template_id: params.template_id,
            course_id: params.course_id,
            student_id: params.student_id,
            timestamp: Utc::now(),
            data: Vec::new(),
        };
        tables.certificates.insert(cert.certificate_id.clone(), cert.clone());
        Ok(cert)
    }

    fn get_certificate(&self, certificate_id: &str) -> Result<Certificate> {
        self.enter("get_certificate")?;
        self.tables
            .lock()
            .certificates
            .get(certificate_id)
            .cloned()
            .ok_or_else(|| not_found(RecordKind::Certificate, certificate_id))
    }

    fn update_certificate(&self, params: UpdateCertificateParams) -> Result<Certificate> {
        self.enter("update_certificate")?;
        let mut tables = self.tables.lock();
        let cert = tables
            .certificates
            .get_mut(&params.certificate_id)
            .ok_or_else(|| not_found(RecordKind::Certificate, &params.certificate_id))?;
        cert.data = params.data;
        cert.timestamp = Utc::now();
        Ok(cert.clone())
    }

    fn delete_certificate(&self, certificate_id: &str) -> Result<Certificate> {
        self.enter("delete_certificate")?;
        self.tables
            .lock()
            .certificates
            .remove(certificate_id)
            .ok_or_else(|| not_found(RecordKind::Certificate, certificate_id))
    }

    fn list_certificates(&self, params: ListParams) -> Result<Vec<Certificate>> {
        self.enter("list_certificates")?;
        Ok(self.certificates_where(|_| true, params))
    }

    fn count_certificates(&self) -> Result<i64> {
        self.enter("count_certificates")?;
        Ok(self.count_where(|_| true))
    }

    fn list_certificates_by_course(
        &self,
        course_id: i32,
        params: ListParams,
    ) -> Result<Vec<Certificate>> {
        self.enter("list_certificates_by_course")?;
        Ok(self.certificates_where(|c| c.course_id == course_id, params))
    }

    fn count_certificates_by_course(&self, course_id: i32) -> Result<i64> {
        self.enter("count_certificates_by_course")?;
        Ok(self.count_where(|c| c.course_id == course_id))
    }

    fn list_certificates_by_student(
        &self,
        student_id: i32,
        params: ListParams,
    ) -> Result<Vec<Certificate>> {
        self.enter("list_certificates_by_student")?;
        Ok(self.certificates_where(|c| c.student_id == student_id, params))
    }

    fn count_certificates_by_student(&self, student_id: i32) -> Result<i64> {
        self.enter("count_certificates_by_student")?;
        Ok(self.count_where(|c| c.student_id == student_id))
    }

    fn list_certificates_by_template(
        &self,
        template_id: i32,
        params: ListParams,
    ) -> Result<Vec<Certificate>> {
        self.enter("list_certificates_by_template")?;
        Ok(self.certificates_where(|c| c.template_id == template_id, params))
    }

    fn count_certificates_by_template(&self, template_id: i32) -> Result<i64> {
        self.enter("count_certificates_by_template")?;
        Ok(self.count_where(|c| c.template_id == template_id))
    }

    fn create_course(&self, data: Vec<u8>) -> Result<Course> {
        self.enter("create_course")?;
        let mut tables = self.tables.lock();
        tables.next_id += 1;
        let course = Course {
            course_id: tables.next_id,
            data,
        };
        tables.courses.insert(course.course_id, course.clone());
        Ok(course)
    }

    fn get_course(&self, course_id: i32) -> Result<Course> {
        self.enter("get_course")?;
        self.tables
            .lock()
            .courses
            .get(&course_id)
            .cloned()
            .ok_or_else(|| not_found(RecordKind::Course, course_id))
    }

    fn update_course(&self, params: UpdateCourseParams) -> Result<Course> {
        self.enter("update_course")?;
        let mut tables = self.tables.lock();
        let course = tables
            .courses
            .get_mut(&params.course_id)
            .ok_or_else(|| not_found(RecordKind::Course, params.course_id))?;
        course.data = params.data;
        Ok(course.clone())
    }

    fn delete_course(&self, course_id: i32) -> Result<Course> {
        self.enter("delete_course")?;
        let mut tables = self.tables.lock();
        let removed = tables
            .courses
            .remove(&course_id)
            .ok_or_else(|| not_found(RecordKind::Course, course_id))?;
        if self.cascade.load(Ordering::Relaxed) {
            tables.certificates.retain(|_, c| c.course_id != course_id);
        }
        Ok(removed)
    }

    fn list_courses(&self, params: ListParams) -> Result<Vec<Course>> {
        self.enter("list_courses")?;
        Ok(page(self.tables.lock().courses.values().cloned(), params))
    }

    fn count_courses(&self) -> Result<i64> {
        self.enter("count_courses")?;
        Ok(self.tables.lock().courses.len() as i64)
    }

    fn create_student(&self, data: Vec<u8>) -> Result<Student> {
        self.enter("create_student")?;
        let mut tables = self.tables.lock();
        tables.next_id += 1;
        let student = Student {
            student_id: tables.next_id,
            data,
        };
        tables.students.insert(student.student_id, student.clone());
        Ok(student)
    }

    fn get_student(&self, student_id: i32) -> Result<Student> {
        self.enter("get_student")?;
        self.tables
            .lock()
            .students
            .get(&student_id)
            .cloned()
            .ok_or_else(|| not_found(RecordKind::Student, student_id))
    }

    fn update_student(&self, params: UpdateStudentParams) -> Result<Student> {
        self.enter("update_student")?;
        let mut tables = self.tables.lock();
        let student = tables
            .students
            .get_mut(&params.student_id)
            .ok_or_else(|| not_found(RecordKind::Student, params.student_id))?;
        student.data = params.data;
        Ok(student.clone())
    }

    fn delete_student(&self, student_id: i32) -> Result<Student> {
        self.enter("delete_student")?;
        let mut tables = self.tables.lock();
        let removed = tables
            .students
            .remove(&student_id)
            .ok_or_else(|| not_found(RecordKind::Student, student_id))?;
        if self.cascade.load(Ordering::Relaxed) {
            tables.certificates.retain(|_, c| c.student_id != student_id);
        }
        Ok(removed)
    }

    fn list_students(&self, params: ListParams) -> Result<Vec<Student>> {
        self.enter("list_students")?;
        Ok(page(self.tables.lock().students.values().cloned(), params))
    }

    fn count_students(&self) -> Result<i64> {
        self.enter("count_students")?;
        Ok(self.tables.lock().students.len() as i64)
    }

    fn create_template(&self, content: String) -> Result<Template> {
        self.enter("create_template")?;
        let mut tables = self.tables.lock();
        tables.next_id += 1;
        let tmpl = Template {
            template_id: tables.next_id,
            content,
        };
        tables.templates.insert(tmpl.template_id, tmpl.clone());
        Ok(tmpl)
    }

    fn get_template(&self, template_id: i32) -> Result<Template> {
        self.enter("get_template")?;
        self.tables
            .lock()
            .templates
            .get(&template_id)
            .cloned()
            .ok_or_else(|| not_found(RecordKind::Template, template_id))
    }

    fn update_template(&self, params: UpdateTemplateParams) -> Result<Template> {
        self.enter("update_template")?;
        let mut tables = self.tables.lock();
        let tmpl = tables
            .templates
            .get_mut(&params.template_id)
            .ok_or_else(|| not_found(RecordKind::Template, params.template_id))?;
        tmpl.content = params.content;
        Ok(tmpl.clone())
    }

    fn delete_template(&self, template_id: i32) -> Result<Template> {
        self.enter("delete_template")?;
        let mut tables = self.tables.lock();
        let removed = tables
            .templates
            .remove(&template_id)
            .ok_or_else(|| not_found(RecordKind::Template, template_id))?;
        if self.cascade.load(Ordering::Relaxed) {
            tables.certificates.retain(|_, c| c.template_id != template_id);
        }
        Ok(removed)
    }

    fn list_templates(&self, params: ListParams) -> Result<Vec<Template>> {
        self.enter("list_templates")?;
        Ok(page(self.tables.lock().templates.values().cloned(), params))
    }

    fn count_templates(&self) -> Result<i64> {
        self.enter("count_templates")?;
        Ok(self.tables.lock().templates.len() as i64)
    }
}
