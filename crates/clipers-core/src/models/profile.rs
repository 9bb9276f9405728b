use serde::{Deserialize, Serialize};

/// Partial update of the signed-in candidate's account.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}

/// Structured CV the backend extracts from a candidate's clipers and uses
/// for job matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtsProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl AtsProfile {
    /// One-line overview, e.g. "2 jobs, 1 studies, 5 skills"
    pub fn overview(&self) -> String {
        format!(
            "{} jobs, {} studies, {} skills",
            self.experience.len(),
            self.education.len(),
            self.skills.len()
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
}

/// Skills arrive either as bare names or as `{ name, level }` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skill {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        level: Option<String>,
    },
}

impl Skill {
    pub fn name(&self) -> &str {
        match self {
            Skill::Name(name) => name,
            Skill::Detailed { name, .. } => name,
        }
    }
}
