//! Rendering of command results on stdout.

use anyhow::Result;
use clipers_core::models::{
    AtsProfile, Cliper, Comment, Company, Job, JobApplication, JobMatch, Post, Skill, User,
};
use clipers_core::utils::{format_date, format_optional, format_score, truncate_string};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Widest title shown in plain listings
const TITLE_WIDTH: usize = 40;

/// One-line summary used by `--output plain`.
pub trait PlainRow {
    fn plain_row(&self) -> String;
}

pub fn emit<T: Serialize + PlainRow>(format: OutputFormat, item: &T) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputFormat::Plain => println!("{}", item.plain_row()),
    }
    Ok(())
}

pub fn emit_list<T: Serialize + PlainRow>(format: OutputFormat, items: &[T]) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("(none)");
            }
            for item in items {
                println!("{}", item.plain_row());
            }
        }
    }
    Ok(())
}

/// Arbitrary JSON; plain output falls back to compact JSON.
pub fn emit_value(format: OutputFormat, value: &serde_json::Value) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Plain => println!("{}", value),
    }
    Ok(())
}

fn user_label(user: Option<&User>) -> String {
    match user {
        Some(user) => user.full_name(),
        None => "-".to_string(),
    }
}

impl PlainRow for User {
    fn plain_row(&self) -> String {
        let role = self.role.map(|r| r.to_string());
        format!(
            "{}  {}  {}  {}",
            self.id,
            self.full_name(),
            format_optional(self.email.as_deref(), "-"),
            format_optional(role.as_deref(), "-"),
        )
    }
}

impl PlainRow for AtsProfile {
    fn plain_row(&self) -> String {
        let skills: Vec<&str> = self.skills.iter().map(Skill::name).collect();
        format!(
            "{}  {}  {}",
            self.overview(),
            truncate_string(self.summary.as_deref().unwrap_or(""), 60),
            skills.join(", "),
        )
    }
}

impl PlainRow for Company {
    fn plain_row(&self) -> String {
        format!(
            "{}  {}  {}  {}",
            self.id,
            self.name,
            format_optional(self.industry.as_deref(), "-"),
            format_optional(self.location.as_deref(), "-"),
        )
    }
}

impl PlainRow for Job {
    fn plain_row(&self) -> String {
        let company = self.company.as_ref().map(|c| c.name.as_str());
        let kind = self.job_type.map(|t| t.to_string());
        let posted = self.created_at.as_deref().map(format_date);
        format!(
            "{}  {:<width$}  {}  {}  {}  {}  {}",
            self.id,
            truncate_string(&self.title, TITLE_WIDTH),
            format_optional(company, "-"),
            format_optional(self.location.as_deref(), "-"),
            format_optional(kind.as_deref(), "-"),
            format_optional(self.salary_display().as_deref(), "-"),
            format_optional(posted.as_deref(), "-"),
            width = TITLE_WIDTH,
        )
    }
}

impl PlainRow for JobMatch {
    fn plain_row(&self) -> String {
        format!(
            "{}  {}  {}  {}",
            self.id,
            user_label(self.user.as_ref()),
            format_score(self.score),
            truncate_string(self.explanation.as_deref().unwrap_or(""), 60),
        )
    }
}

impl PlainRow for JobApplication {
    fn plain_row(&self) -> String {
        let job = self.job.as_ref().map(|j| j.title.as_str());
        let score = self.score.map(format_score);
        format!(
            "{}  {}  {}  {:?}  {}",
            self.id,
            format_optional(job, "-"),
            user_label(self.user.as_ref()),
            self.status,
            format_optional(score.as_deref(), "-"),
        )
    }
}

impl PlainRow for Cliper {
    fn plain_row(&self) -> String {
        format!(
            "{}  {:<width$}  {:?}  {}",
            self.id,
            truncate_string(self.title.as_deref().unwrap_or("(untitled)"), TITLE_WIDTH),
            self.status,
            format_optional(self.video_url.as_deref(), "-"),
            width = TITLE_WIDTH,
        )
    }
}

impl PlainRow for Post {
    fn plain_row(&self) -> String {
        let posted = self.created_at.as_deref().map(format_date);
        format!(
            "{}  {}  {}  {} likes  {} comments  {}",
            self.id,
            user_label(self.user.as_ref()),
            format_optional(posted.as_deref(), "-"),
            self.likes,
            self.comments.len(),
            truncate_string(&self.content, 60),
        )
    }
}

impl PlainRow for Comment {
    fn plain_row(&self) -> String {
        format!(
            "{}  {}  {}",
            self.id,
            user_label(self.user.as_ref()),
            truncate_string(&self.content, 80),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(value: serde_json::Value) -> Job {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_job_plain_row() {
        let job = job(serde_json::json!({
            "id": "42",
            "title": "Backend engineer",
            "location": "Madrid",
            "type": "FULL_TIME",
            "salaryMin": 40000,
            "salaryMax": 55000,
            "company": { "id": "c1", "name": "Acme" }
        }));
        let row = job.plain_row();
        assert!(row.starts_with("42  Backend engineer"));
        assert!(row.contains("Acme"));
        assert!(row.contains("Full time"));
        assert!(row.contains("40000 - 55000"));
    }

    #[test]
    fn test_plain_row_placeholders() {
        let job = job(serde_json::json!({ "id": "7", "title": "Intern" }));
        let row = job.plain_row();
        assert!(row.ends_with("-  -  -  -  -"));
    }

    #[test]
    fn test_match_score_rendering() {
        let m: JobMatch = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "score": 0.87,
            "explanation": "Strong Rust background"
        }))
        .unwrap();
        let row = m.plain_row();
        assert!(row.contains("87%"));
        assert!(row.contains("Strong Rust background"));
        assert!(row.contains("  -  "));
    }

    #[test]
    fn test_post_row_counts_embedded_comments() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "content": "Hola",
            "likes": 3,
            "createdAt": "2024-05-01T10:00:00",
            "comments": [{ "id": "k1", "content": "Hi" }, { "id": "k2", "content": "Yo" }]
        }))
        .unwrap();
        let row = post.plain_row();
        assert!(row.contains("May 01, 2024"));
        assert!(row.contains("3 likes  2 comments"));
    }
}
