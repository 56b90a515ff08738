//! Data Transfer Objects
//!
//! Request and response bodies for the platform API. Profile and team
//! payloads stay opaque (`serde_json::Value`); only the bodies this client
//! builds itself get a type.

use serde::{Deserialize, Serialize};

// ============================================
// AUTH DTOs
// ============================================

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Login response body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Registration request body
///
/// The server forces the system role to `user` for self-registration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub university: String,
    pub study_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_role: Option<String>,
}

// ============================================
// PROFILE DTOs
// ============================================

/// Profile update that changes the user's role
#[derive(Debug, Clone, Serialize)]
pub struct RoleChange {
    pub role_name: String,
}

// ============================================
// TEAM DTOs
// ============================================

/// Team creation body
#[derive(Debug, Clone, Serialize)]
pub struct NewTeam {
    pub team_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Invitation of a user into a team
#[derive(Debug, Clone, Serialize)]
pub struct TeamInvite {
    pub team_name: String,
    pub username: String,
}

/// Links a team submits for review
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamArtifacts {
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub figma_url: Option<String>,
    #[serde(default)]
    pub hosting_url: Option<String>,
    #[serde(default)]
    pub presentation_url: Option<String>,
    #[serde(default)]
    pub extra_links: Option<String>,
}

// ============================================
// JURY DTOs
// ============================================

/// Lowest and highest score a criterion accepts
pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// A jury member's scores for one team's artifacts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactReview {
    pub criterion_1: u8,
    pub criterion_2: u8,
    pub criterion_3: u8,
    pub criterion_4: u8,
    pub criterion_5: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ArtifactReview {
    pub fn scores(&self) -> [u8; 5] {
        [
            self.criterion_1,
            self.criterion_2,
            self.criterion_3,
            self.criterion_4,
            self.criterion_5,
        ]
    }

    /// True when every criterion is within [`SCORE_RANGE`]
    pub fn is_valid(&self) -> bool {
        self.scores().iter().all(|s| SCORE_RANGE.contains(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_team_omits_missing_description() {
        let team = NewTeam {
            team_name: "rustaceans".to_string(),
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&team).unwrap(),
            json!({"team_name": "rustaceans"})
        );
    }

    #[test]
    fn test_login_response() {
        let resp: LoginResponse =
            serde_json::from_value(json!({"access_token": "jwt"})).unwrap();
        assert_eq!(resp.access_token, "jwt");
    }

    #[test]
    fn test_review_body() {
        let review = ArtifactReview {
            criterion_1: 7,
            criterion_2: 8,
            criterion_3: 9,
            criterion_4: 10,
            criterion_5: 6,
            comment: None,
        };
        assert!(review.is_valid());
        assert_eq!(
            serde_json::to_value(&review).unwrap(),
            json!({
                "criterion_1": 7,
                "criterion_2": 8,
                "criterion_3": 9,
                "criterion_4": 10,
                "criterion_5": 6
            })
        );

        let zero = ArtifactReview {
            criterion_3: 0,
            ..review
        };
        assert!(!zero.is_valid());
    }

    #[test]
    fn test_artifacts_partial() {
        let artifacts: TeamArtifacts =
            serde_json::from_value(json!({"github_url": "https://github.com/x/y"})).unwrap();
        assert_eq!(artifacts.github_url.as_deref(), Some("https://github.com/x/y"));
        assert_eq!(artifacts.figma_url, None);
    }
}
