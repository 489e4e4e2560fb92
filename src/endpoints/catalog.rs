use pathways_schema::{
    College, CollegeFilters, Course, CourseFilters, TimelineEvent, TimelineFilters,
};

use super::search_term;
use crate::client::{ApiClient, ApiRequest};
use crate::error::ClientError;

const COURSES_PATH: &str = "/api/courses";
const COLLEGES_PATH: &str = "/api/colleges";
const TIMELINE_PATH: &str = "/api/timeline";

// Courses
impl ApiClient {
    pub async fn courses(&self, filters: &CourseFilters) -> Result<Vec<Course>, ClientError> {
        self.fetch_list(ApiRequest::get(COURSES_PATH).query_from(filters)?)
            .await
    }

    pub async fn course_streams(&self) -> Result<Vec<String>, ClientError> {
        self.fetch_list(ApiRequest::get(COURSES_PATH).segment("streams"))
            .await
    }

    pub async fn course(&self, id: &str) -> Result<Course, ClientError> {
        self.fetch_record(ApiRequest::get(COURSES_PATH).segment(id))
            .await
    }

    pub async fn search_courses(&self, term: &str) -> Result<Vec<Course>, ClientError> {
        let req = ApiRequest::get(COURSES_PATH)
            .segment("search")
            .segment(search_term(term)?);
        self.fetch_list(req).await
    }
}

// Colleges
impl ApiClient {
    pub async fn colleges(&self, filters: &CollegeFilters) -> Result<Vec<College>, ClientError> {
        self.fetch_list(ApiRequest::get(COLLEGES_PATH).query_from(filters)?)
            .await
    }

    pub async fn college_locations(&self) -> Result<Vec<String>, ClientError> {
        self.fetch_list(ApiRequest::get(COLLEGES_PATH).segment("locations"))
            .await
    }

    pub async fn college_types(&self) -> Result<Vec<String>, ClientError> {
        self.fetch_list(ApiRequest::get(COLLEGES_PATH).segment("types"))
            .await
    }

    /// Highest-rated colleges; the web client asks for 10.
    pub async fn top_colleges(&self, count: u32) -> Result<Vec<College>, ClientError> {
        let req = ApiRequest::get(COLLEGES_PATH).segment("top").segment(count);
        self.fetch_list(req).await
    }

    pub async fn college(&self, id: &str) -> Result<College, ClientError> {
        self.fetch_record(ApiRequest::get(COLLEGES_PATH).segment(id))
            .await
    }

    pub async fn search_colleges(&self, term: &str) -> Result<Vec<College>, ClientError> {
        let req = ApiRequest::get(COLLEGES_PATH)
            .segment("search")
            .segment(search_term(term)?);
        self.fetch_list(req).await
    }
}

// Timeline
impl ApiClient {
    pub async fn timeline(
        &self,
        filters: &TimelineFilters,
    ) -> Result<Vec<TimelineEvent>, ClientError> {
        self.fetch_list(ApiRequest::get(TIMELINE_PATH).query_from(filters)?)
            .await
    }

    pub async fn upcoming_events(&self, limit: u32) -> Result<Vec<TimelineEvent>, ClientError> {
        let req = ApiRequest::get(TIMELINE_PATH)
            .segment("upcoming")
            .query("limit", limit);
        self.fetch_list(req).await
    }

    pub async fn month_events(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<TimelineEvent>, ClientError> {
        if !(1..=12).contains(&month) {
            return Err(ClientError::InvalidRequest("Month must be between 1 and 12"));
        }
        let req = ApiRequest::get(TIMELINE_PATH)
            .segment("month")
            .segment(year)
            .segment(month);
        self.fetch_list(req).await
    }

    pub async fn search_events(&self, term: &str) -> Result<Vec<TimelineEvent>, ClientError> {
        let req = ApiRequest::get(TIMELINE_PATH)
            .segment("search")
            .segment(search_term(term)?);
        self.fetch_list(req).await
    }
}
