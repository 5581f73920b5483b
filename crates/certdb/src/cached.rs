//! Read/write-through record cache in front of a [`Querier`]
//!
//! Single records are cached under `hash(<prefix><id>)`; list and count
//! queries always go to the wrapped querier. Certificates embed the course,
//! student and template they reference, so changing or removing one of those
//! drops every cached certificate that points at it. If the dependents cannot
//! be enumerated the whole cache is purged instead.
//!
//! Deletes enumerate the dependents before the record goes away, so a store
//! that cascades the delete to its certificates is handled too.

use std::sync::Arc;

use tracing::{debug, error, warn};

use certcache::{CacheConfig, CacheStats, Event, SafeCache};

use crate::error::Result;
use crate::models::{
    Certificate, Course, CreateCertificateParams, ListParams, Student, Template,
    UpdateCertificateParams, UpdateCourseParams, UpdateStudentParams, UpdateTemplateParams,
};
use crate::querier::Querier;
use crate::record::{CachedRecord, Record, RecordKind};

/// Record referenced by certificates
#[derive(Debug, Clone, Copy)]
enum Owner {
    Course(i32),
    Student(i32),
    Template(i32),
}

/// [`Querier`] decorator caching single-record lookups
pub struct CachedQueries<Q> {
    querier: Q,
    cache: SafeCache<u32, CachedRecord>,
    stats: Arc<CacheStats>,
}

impl<Q: Querier> CachedQueries<Q> {
    /// Wrap `querier` using an existing cache
    ///
    /// Evictions only show up in [`stats`](Self::stats) if the cache's
    /// eviction callback records them; see [`with_stats`](Self::with_stats).
    pub fn new(querier: Q, cache: SafeCache<u32, CachedRecord>) -> Self {
        Self::with_stats(querier, cache, Arc::new(CacheStats::new()))
    }

    /// Wrap `querier` using an existing cache and shared counters
    pub fn with_stats(
        querier: Q,
        cache: SafeCache<u32, CachedRecord>,
        stats: Arc<CacheStats>,
    ) -> Self {
        Self {
            querier,
            cache,
            stats,
        }
    }

    /// Wrap `querier` with a fresh LRU cache sized by `config`
    pub fn with_config(querier: Q, config: &CacheConfig) -> Self {
        let stats = Arc::new(CacheStats::new());
        let evicted = Arc::clone(&stats);
        let on_evict = move |_key: u32, _record: CachedRecord| evicted.record(Event::Eviction);
        let cache = SafeCache::lru_with_eviction(config.capacity, on_evict);
        Self::with_stats(querier, cache, stats)
    }

    /// Wrapped querier
    pub fn inner(&self) -> &Q {
        &self.querier
    }

    /// Underlying record cache
    pub fn cache(&self) -> &SafeCache<u32, CachedRecord> {
        &self.cache
    }

    /// Counters of single-record lookups, inserts and evictions
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn remember<R: Record>(&self, record: &R) {
        let kind = R::KIND;
        let id = record.cache_id();
        self.cache.add(kind.key(&id), record.clone().into_cached());
        self.stats.record(Event::Insert);
        debug!(%kind, %id, "Cached record");
    }

    fn invalidate(&self, kind: RecordKind, id: &str) {
        self.cache.remove(&kind.key(id));
    }

    /// Write-through for create and update results
    fn write_through<R: Record>(&self, result: Result<R>) -> Result<R> {
        if let Ok(record) = &result {
            self.remember(record);
        }
        result
    }

    /// Serve from cache, otherwise read through and cache the result
    fn read_through<R: Record>(&self, id: &str, fetch: impl FnOnce(&Q) -> Result<R>) -> Result<R> {
        let kind = R::KIND;
        let key = kind.key(id);
        if let Some(cached) = self.cache.get(&key) {
            match R::from_cached(cached) {
                Ok(record) => {
                    self.stats.record(Event::Hit);
                    debug!(%kind, id, "Record cache hit");
                    return Ok(record);
                }
                Err(other) => {
                    error!(
                        %kind,
                        id,
                        cached_kind = %other.kind(),
                        "Cached record has unexpected kind, invalidating"
                    );
                    self.cache.remove(&key);
                }
            }
        }

        self.stats.record(Event::Miss);
        self.write_through(fetch(&self.querier))
    }

    /// Certificates currently referencing `owner`
    fn dependents(&self, owner: Owner) -> Result<Vec<Certificate>> {
        let q = &self.querier;
        match owner {
            Owner::Course(id) => q.count_certificates_by_course(id).and_then(|n| {
                if n == 0 {
                    return Ok(Vec::new());
                }
                q.list_certificates_by_course(id, ListParams::first(n))
            }),
            Owner::Student(id) => q.count_certificates_by_student(id).and_then(|n| {
                if n == 0 {
                    return Ok(Vec::new());
                }
                q.list_certificates_by_student(id, ListParams::first(n))
            }),
            Owner::Template(id) => q.count_certificates_by_template(id).and_then(|n| {
                if n == 0 {
                    return Ok(Vec::new());
                }
                q.list_certificates_by_template(id, ListParams::first(n))
            }),
        }
    }

    /// Drop `dependents` of `owner` from the cache, or everything if they
    /// could not be enumerated
    fn invalidate_certificates(&self, owner: Owner, dependents: Result<Vec<Certificate>>) {
        match dependents {
            Ok(certs) => {
                for cert in &certs {
                    self.invalidate(RecordKind::Certificate, &cert.certificate_id);
                }
                debug!(?owner, count = certs.len(), "Invalidated dependent certificates");
            }
            Err(e) => {
                warn!(
                    ?owner,
                    error = %e,
                    "Failed to enumerate dependent certificates, purging cache"
                );
                self.cache.purge();
            }
        }
    }
}

impl<Q: Querier> Querier for CachedQueries<Q> {
    fn create_certificate(&self, params: CreateCertificateParams) -> Result<Certificate> {
        self.write_through(self.querier.create_certificate(params))
    }

    fn get_certificate(&self, certificate_id: &str) -> Result<Certificate> {
        self.read_through(certificate_id, |q| q.get_certificate(certificate_id))
    }

    fn update_certificate(&self, params: UpdateCertificateParams) -> Result<Certificate> {
        self.write_through(self.querier.update_certificate(params))
    }

    fn delete_certificate(&self, certificate_id: &str) -> Result<Certificate> {
        let cert = self.querier.delete_certificate(certificate_id)?;
        self.invalidate(RecordKind::Certificate, certificate_id);
        Ok(cert)
    }

    fn list_certificates(&self, page: ListParams) -> Result<Vec<Certificate>> {
        self.querier.list_certificates(page)
    }

    fn count_certificates(&self) -> Result<i64> {
        self.querier.count_certificates()
    }

    fn list_certificates_by_course(
        &self,
        course_id: i32,
        page: ListParams,
    ) -> Result<Vec<Certificate>> {
        self.querier.list_certificates_by_course(course_id, page)
    }

    fn count_certificates_by_course(&self, course_id: i32) -> Result<i64> {
        self.querier.count_certificates_by_course(course_id)
    }

    fn list_certificates_by_student(
        &self,
        student_id: i32,
        page: ListParams,
    ) -> Result<Vec<Certificate>> {
        self.querier.list_certificates_by_student(student_id, page)
    }

    fn count_certificates_by_student(&self, student_id: i32) -> Result<i64> {
        self.querier.count_certificates_by_student(student_id)
    }

    fn list_certificates_by_template(
        &self,
        template_id: i32,
        page: ListParams,
    ) -> Result<Vec<Certificate>> {
        self.querier.list_certificates_by_template(template_id, page)
    }

    fn count_certificates_by_template(&self, template_id: i32) -> Result<i64> {
        self.querier.count_certificates_by_template(template_id)
    }

    fn create_course(&self, data: Vec<u8>) -> Result<Course> {
        self.write_through(self.querier.create_course(data))
    }

    fn get_course(&self, course_id: i32) -> Result<Course> {
        self.read_through(&course_id.to_string(), |q| q.get_course(course_id))
    }

    fn update_course(&self, params: UpdateCourseParams) -> Result<Course> {
        let course_id = params.course_id;
        let course = self.write_through(self.querier.update_course(params))?;
        let owner = Owner::Course(course_id);
        self.invalidate_certificates(owner, self.dependents(owner));
        Ok(course)
    }

    fn delete_course(&self, course_id: i32) -> Result<Course> {
        let owner = Owner::Course(course_id);
        let dependents = self.dependents(owner);
        let course = self.querier.delete_course(course_id)?;
        self.invalidate(RecordKind::Course, &course_id.to_string());
        self.invalidate_certificates(owner, dependents);
        Ok(course)
    }

    fn list_courses(&self, page: ListParams) -> Result<Vec<Course>> {
        self.querier.list_courses(page)
    }

    fn count_courses(&self) -> Result<i64> {
        self.querier.count_courses()
    }

    fn create_student(&self, data: Vec<u8>) -> Result<Student> {
        self.write_through(self.querier.create_student(data))
    }

    fn get_student(&self, student_id: i32) -> Result<Student> {
        self.read_through(&student_id.to_string(), |q| q.get_student(student_id))
    }

    fn update_student(&self, params: UpdateStudentParams) -> Result<Student> {
        let student_id = params.student_id;
        let student = self.write_through(self.querier.update_student(params))?;
        let owner = Owner::Student(student_id);
        self.invalidate_certificates(owner, self.dependents(owner));
        Ok(student)
    }

    fn delete_student(&self, student_id: i32) -> Result<Student> {
        let owner = Owner::Student(student_id);
        let dependents = self.dependents(owner);
        let student = self.querier.delete_student(student_id)?;
        self.invalidate(RecordKind::Student, &student_id.to_string());
        self.invalidate_certificates(owner, dependents);
        Ok(student)
    }

    fn list_students(&self, page: ListParams) -> Result<Vec<Student>> {
        self.querier.list_students(page)
    }

    fn count_students(&self) -> Result<i64> {
        self.querier.count_students()
    }

    fn create_template(&self, content: String) -> Result<Template> {
        self.write_through(self.querier.create_template(content))
    }

    fn get_template(&self, template_id: i32) -> Result<Template> {
        self.read_through(&template_id.to_string(), |q| q.get_template(template_id))
    }

    fn update_template(&self, params: UpdateTemplateParams) -> Result<Template> {
        let template_id = params.template_id;
        let tmpl = self.write_through(self.querier.update_template(params))?;
        let owner = Owner::Template(template_id);
        self.invalidate_certificates(owner, self.dependents(owner));
        Ok(tmpl)
    }

    fn delete_template(&self, template_id: i32) -> Result<Template> {
        let owner = Owner::Template(template_id);
        let dependents = self.dependents(owner);
        let tmpl = self.querier.delete_template(template_id)?;
        self.invalidate(RecordKind::Template, &template_id.to_string());
        self.invalidate_certificates(owner, dependents);
        Ok(tmpl)
    }

    fn list_templates(&self, page: ListParams) -> Result<Vec<Template>> {
        self.querier.list_templates(page)
    }

    fn count_templates(&self) -> Result<i64> {
        self.querier.count_templates()
    }
}
