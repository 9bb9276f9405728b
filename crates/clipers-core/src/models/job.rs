use serde::{Deserialize, Serialize};

use super::{AtsProfile, Company, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    /// Wire value, as used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "FULL_TIME",
            JobType::PartTime => "PART_TIME",
            JobType::Contract => "CONTRACT",
            JobType::Internship => "INTERNSHIP",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::FullTime => write!(f, "Full time"),
            JobType::PartTime => write!(f, "Part time"),
            JobType::Contract => write!(f, "Contract"),
            JobType::Internship => write!(f, "Internship"),
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "FULL_TIME" => Ok(JobType::FullTime),
            "PART_TIME" => Ok(JobType::PartTime),
            "CONTRACT" => Ok(JobType::Contract),
            "INTERNSHIP" => Ok(JobType::Internship),
            other => Err(format!("unknown job type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "type", default)]
    pub job_type: Option<JobType>,
    #[serde(rename = "salaryMin", default)]
    pub salary_min: Option<u64>,
    #[serde(rename = "salaryMax", default)]
    pub salary_max: Option<u64>,
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

impl Job {
    /// Salary range for display, e.g. "50000 - 70000"
    pub fn salary_display(&self) -> Option<String> {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some(format!("{} - {}", min, max)),
            (Some(min), None) => Some(format!("from {}", min)),
            (None, Some(max)) => Some(format!("up to {}", max)),
            (None, None) => None,
        }
    }
}

/// A candidate ranked against a job by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMatch {
    pub id: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: String,
    #[serde(default)]
    pub job: Option<Job>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default = "default_status")]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(rename = "applicationMessage", default)]
    pub application_message: Option<String>,
    #[serde(rename = "matchedSkills", default)]
    pub matched_skills: Vec<String>,
    #[serde(rename = "atsProfile", default)]
    pub ats_profile: Option<AtsProfile>,
}

fn default_status() -> ApplicationStatus {
    ApplicationStatus::Pending
}

/// Search filters for public job listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilters {
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub salary_min: Option<u64>,
    pub salary_max: Option<u64>,
    pub skills: Vec<String>,
    pub industry: Option<String>,
}

impl JobFilters {
    /// Query pairs in the order the backend documents them. Skills repeat.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                query.push((key.to_string(), value));
            }
        };
        push("location", self.location.clone());
        push("type", self.job_type.map(|t| t.as_str().to_string()));
        // Zero means "no bound" on the listing screens
        push("salaryMin", self.salary_min.filter(|v| *v > 0).map(|v| v.to_string()));
        push("salaryMax", self.salary_max.filter(|v| *v > 0).map(|v| v.to_string()));
        push("industry", self.industry.clone());
        for skill in &self.skills {
            push("skills", Some(skill.clone()));
        }
        query
    }
}

/// Payload for creating a job posting.
#[derive(Debug, Clone, Serialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    #[serde(rename = "salaryMin", skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u64>,
    #[serde(rename = "salaryMax", skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u64>,
}

/// Partial job update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(rename = "salaryMin", skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u64>,
    #[serde(rename = "salaryMax", skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPage {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_page() {
        let json = r#"{"jobs":[{"id":"42","title":"Rust Engineer","skills":["rust","tokio"],"type":"FULL_TIME","salaryMin":50000,"company":{"id":"c1","name":"Acme"},"createdAt":"2024-05-01T10:00:00Z"}],"hasMore":true,"totalPages":3}"#;
        let page: JobPage = serde_json::from_str(json).unwrap();
        assert!(page.has_more);
        assert_eq!(page.total_pages, 3);

        let job = &page.jobs[0];
        assert_eq!(job.job_type, Some(JobType::FullTime));
        assert_eq!(job.company.as_ref().map(|c| c.name.as_str()), Some("Acme"));
        assert_eq!(job.salary_display().as_deref(), Some("from 50000"));
        assert_eq!(job.created_at.as_deref(), Some("2024-05-01T10:00:00Z"));
    }

    #[test]
    fn test_job_with_local_timestamp() {
        let json = r#"{"id":"7","title":"Intern","createdAt":"2024-05-01T10:00:00.123"}"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.created_at.as_deref(), Some("2024-05-01T10:00:00.123"));
    }

    #[test]
    fn test_filters_to_query() {
        let filters = JobFilters {
            location: Some("Madrid".to_string()),
            job_type: Some(JobType::PartTime),
            salary_min: Some(0),
            salary_max: Some(90000),
            skills: vec!["rust".to_string(), "sql".to_string()],
            industry: Some(String::new()),
        };
        let query = filters.to_query();
        let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("location", "Madrid"),
                ("type", "PART_TIME"),
                ("salaryMax", "90000"),
                ("skills", "rust"),
                ("skills", "sql"),
            ]
        );
    }

    #[test]
    fn test_job_type_from_str() {
        assert_eq!("full-time".parse::<JobType>(), Ok(JobType::FullTime));
        assert_eq!("INTERNSHIP".parse::<JobType>(), Ok(JobType::Internship));
        assert!("gig".parse::<JobType>().is_err());
    }

    #[test]
    fn test_application_defaults_to_pending() {
        let app: JobApplication = serde_json::from_str(r#"{"id":"a1","score":0.82}"#).unwrap();
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.score, Some(0.82));
    }

    #[test]
    fn test_new_job_serializes_wire_names() {
        let job = NewJob {
            title: "Dev".to_string(),
            description: "Build things".to_string(),
            requirements: vec![],
            skills: vec!["rust".to_string()],
            location: "Remote".to_string(),
            job_type: JobType::Contract,
            salary_min: None,
            salary_max: Some(1000),
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["type"], "CONTRACT");
        assert_eq!(value["salaryMax"], 1000);
        assert!(value.get("salaryMin").is_none());
    }
}
