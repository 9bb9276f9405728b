use tracing::debug;

use crate::api::{ApiClient, ApiError, RequestOptions};
use crate::models::{Job, JobApplication, JobFilters, JobMatch, JobPage, JobPatch, NewJob, PageRequest};

/// Public listings page size.
pub const JOB_PAGE_SIZE: u32 = 10;

/// Job postings, applications and applicant ranking.
#[derive(Clone)]
pub struct JobService {
    api: ApiClient,
}

impl JobService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Search public listings. An empty query is left out.
    pub async fn search(
        &self,
        query: &str,
        filters: &JobFilters,
        page: u32,
    ) -> Result<JobPage, ApiError> {
        let mut options = RequestOptions::new();
        options.query = PageRequest::new(page, JOB_PAGE_SIZE).to_query();
        let query = query.trim();
        if !query.is_empty() {
            options = options.query("search", query);
        }
        options.query.extend(filters.to_query());

        let result: JobPage = self.api.get_with("/jobs/public", options).await?;
        debug!(page, count = result.jobs.len(), has_more = result.has_more, "Job search");
        Ok(result)
    }

    pub async fn get(&self, job_id: &str) -> Result<Job, ApiError> {
        self.api.get(&format!("/jobs/{}", job_id)).await
    }

    /// Postings published by one company.
    pub async fn by_company(&self, company_id: &str) -> Result<Vec<Job>, ApiError> {
        self.api.get(&format!("/jobs/company/{}", company_id)).await
    }

    /// Candidates the backend matched to a job.
    pub async fn matches(&self, job_id: &str) -> Result<Vec<JobMatch>, ApiError> {
        let matches: Vec<JobMatch> = self.api.get(&format!("/jobs/{}/matches", job_id)).await?;
        debug!(job_id, count = matches.len(), "Job matches");
        Ok(matches)
    }

    pub async fn applicants(&self, job_id: &str) -> Result<Vec<JobApplication>, ApiError> {
        let applicants: Vec<JobApplication> =
            self.api.get(&format!("/jobs/{}/applicants", job_id)).await?;
        debug!(job_id, count = applicants.len(), "Job applicants");
        Ok(applicants)
    }

    /// Applicants in the order the backend ranked them. No local re-sorting.
    pub async fn ranked_applicants(&self, job_id: &str) -> Result<Vec<JobMatch>, ApiError> {
        let ranked: Vec<JobMatch> = self
            .api
            .get(&format!("/jobs/{}/applicants/ranked", job_id))
            .await?;
        debug!(job_id, count = ranked.len(), "Ranked applicants");
        Ok(ranked)
    }

    pub async fn apply(&self, job_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.post_empty(&format!("/jobs/{}/apply", job_id)).await?;
        debug!(job_id, "Applied to job");
        Ok(())
    }

    /// Applications submitted by the logged-in candidate.
    pub async fn my_applications(&self) -> Result<Vec<JobApplication>, ApiError> {
        self.api.get("/jobs/my-applications").await
    }

    pub async fn create(&self, job: &NewJob) -> Result<Job, ApiError> {
        self.api.post("/jobs", job).await
    }

    pub async fn update(&self, job_id: &str, patch: &JobPatch) -> Result<Job, ApiError> {
        self.api.put(&format!("/jobs/{}", job_id), patch).await
    }

    pub async fn delete(&self, job_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.delete(&format!("/jobs/{}", job_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use crate::auth::MemoryTokenStore;
    use crate::models::{JobFilters, JobPatch, JobType};
    use crate::test_support::{client_with, ok_json, status, FakeTransport};

    fn pairs(query: &[(String, String)]) -> Vec<(&str, &str)> {
        query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[tokio::test]
    async fn test_search_builds_query() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![ok_json(json!({
                "jobs": [{"id": "1", "title": "Backend"}],
                "hasMore": false,
                "totalPages": 1
            }))]),
            MemoryTokenStore::new(),
        );
        let filters = JobFilters {
            job_type: Some(JobType::FullTime),
            skills: vec!["rust".to_string()],
            ..Default::default()
        };

        let page = client.jobs().search(" backend ", &filters, 2).await.unwrap();

        assert_eq!(page.jobs.len(), 1);
        assert!(!page.has_more);
        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://host/api/jobs/public");
        assert_eq!(
            pairs(&request.query),
            vec![
                ("page", "2"),
                ("size", "10"),
                ("search", "backend"),
                ("type", "FULL_TIME"),
                ("skills", "rust"),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_omits_empty_query() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![ok_json(json!({"jobs": []}))]),
            MemoryTokenStore::new(),
        );

        client.jobs().search("", &JobFilters::default(), 0).await.unwrap();

        assert_eq!(pairs(&transport.requests()[0].query), vec![("page", "0"), ("size", "10")]);
    }

    #[tokio::test]
    async fn test_endpoints() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![
                ok_json(json!([{"id": "m1", "score": 0.9}])),
                ok_json(json!([{"id": "a1", "status": "ACCEPTED"}])),
                ok_json(json!([{"id": "m2", "score": 0.7}, {"id": "m1", "score": 0.9}])),
                status(200, ""),
                ok_json(json!({"id": "42", "title": "Senior Backend"})),
                status(204, ""),
                ok_json(json!([])),
            ]),
            MemoryTokenStore::with_tokens("A1", "R1"),
        );
        let jobs = client.jobs();

        assert_eq!(jobs.matches("42").await.unwrap()[0].score, 0.9);
        assert_eq!(jobs.applicants("42").await.unwrap().len(), 1);
        // Backend order is preserved as-is
        let ranked = jobs.ranked_applicants("42").await.unwrap();
        assert_eq!(ranked[0].id, "m2");
        jobs.apply("42").await.unwrap();
        let patch = JobPatch {
            title: Some("Senior Backend".to_string()),
            ..Default::default()
        };
        assert_eq!(jobs.update("42", &patch).await.unwrap().title, "Senior Backend");
        jobs.delete("42").await.unwrap();
        jobs.by_company("c1").await.unwrap();

        let calls: Vec<(Method, String)> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.url))
            .collect();
        let base = "https://host/api";
        assert_eq!(
            calls,
            vec![
                (Method::GET, format!("{}/jobs/42/matches", base)),
                (Method::GET, format!("{}/jobs/42/applicants", base)),
                (Method::GET, format!("{}/jobs/42/applicants/ranked", base)),
                (Method::POST, format!("{}/jobs/42/apply", base)),
                (Method::PUT, format!("{}/jobs/42", base)),
                (Method::DELETE, format!("{}/jobs/42", base)),
                (Method::GET, format!("{}/jobs/company/c1", base)),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_propagates_conflict() {
        let (client, _, _, _) = client_with(
            FakeTransport::scripted(vec![status(409, "already applied")]),
            MemoryTokenStore::with_tokens("A1", "R1"),
        );

        let err = client.jobs().apply("42").await.unwrap_err();
        assert_eq!(err.status(), Some(409));
    }
}
