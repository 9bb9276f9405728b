use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(default)]
    pub platform: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(rename = "foundedYear", default)]
    pub founded_year: Option<i32>,
    #[serde(rename = "employeeCount", default)]
    pub employee_count: Option<u32>,
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub vision: Option<String>,
    #[serde(default)]
    pub culture: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(rename = "socialMedia", default)]
    pub social_media: Vec<SocialLink>,
}

/// Partial company update; unset fields are left out of the request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompanyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "foundedYear", skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_company_with_missing_fields() {
        let json = r#"{"id":"c1","name":"Acme","foundedYear":1999,"values":["Trust"],"socialMedia":[{"platform":"linkedin","url":"https://linkedin.com/acme"}]}"#;
        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.founded_year, Some(1999));
        assert_eq!(company.values, vec!["Trust"]);
        assert_eq!(company.social_media[0].url, "https://linkedin.com/acme");
        assert!(company.benefits.is_empty());
    }

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = CompanyPatch {
            mission: Some("Hire well".to_string()),
            founded_year: Some(2020),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({"mission": "Hire well", "foundedYear": 2020}));
    }
}
