//! User profile record.

use serde::{Deserialize, Serialize};

use crate::validation::{is_valid_email, is_valid_name, is_valid_phone};

/// The signed-in user's profile and notification preferences.
///
/// Stored as one JSON document; field names follow the camelCase keys the
/// record has always been persisted under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileData {
    /// Avatar image reference, if one was picked.
    #[serde(deserialize_with = "empty_as_none")]
    pub profile_image: Option<String>,
    /// Contact email.
    pub profile_email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Ten digit phone number.
    pub phone_number: String,
    /// Notify on order status changes.
    pub order_status: bool,
    /// Notify on password changes.
    pub password_changes: bool,
    /// Notify about special offers.
    pub special_offers: bool,
    /// Subscribe to the newsletter.
    pub news_letters: bool,
}

/// Older records store a missing avatar as `""` or `null`.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

impl ProfileData {
    /// The record created when onboarding completes.
    #[must_use]
    pub fn from_onboarding(first_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            profile_email: email.into(),
            ..Self::default()
        }
    }

    /// Initials shown in place of a missing avatar.
    #[must_use]
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Fields that onboarding requires, failing validation.
    #[must_use]
    pub fn invalid_onboarding_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !is_valid_name(&self.first_name) {
            fields.push("firstName");
        }
        if !is_valid_email(&self.profile_email) {
            fields.push("profileEmail");
        }
        fields
    }

    /// Every field of the full profile form failing validation.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut fields = self.invalid_onboarding_fields();
        if !is_valid_name(&self.last_name) {
            fields.push("lastName");
        }
        if !is_valid_phone(&self.phone_number) {
            fields.push("phoneNumber");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_profile() -> ProfileData {
        ProfileData {
            profile_image: Some("file:///avatar.png".to_string()),
            profile_email: "ana@example.com".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            phone_number: "3125550123".to_string(),
            order_status: true,
            password_changes: false,
            special_offers: true,
            news_letters: false,
        }
    }

    #[test]
    fn test_from_onboarding() {
        let profile = ProfileData::from_onboarding("Ana", "ana@example.com");
        assert_eq!(profile.first_name, "Ana");
        assert_eq!(profile.profile_email, "ana@example.com");
        assert!(profile.profile_image.is_none());
        assert!(profile.last_name.is_empty());
        assert!(!profile.order_status);
        assert!(!profile.news_letters);
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let json = serde_json::to_value(complete_profile()).unwrap();
        for key in [
            "profileImage",
            "profileEmail",
            "firstName",
            "lastName",
            "phoneNumber",
            "orderStatus",
            "passwordChanges",
            "specialOffers",
            "newsLetters",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_deserialize_empty_image_as_none() {
        let json = r#"{"profileImage":"","profileEmail":"ana@example.com","firstName":"Ana",
            "lastName":"","phoneNumber":"","orderStatus":false,"passwordChanges":false,
            "specialOffers":false,"newsLetters":false}"#;
        let profile: ProfileData = serde_json::from_str(json).unwrap();
        assert!(profile.profile_image.is_none());
        assert_eq!(profile.first_name, "Ana");
    }

    #[test]
    fn test_deserialize_null_image_and_missing_fields() {
        let json = r#"{"profileImage":null,"firstName":"Ana"}"#;
        let profile: ProfileData = serde_json::from_str(json).unwrap();
        assert!(profile.profile_image.is_none());
        assert!(profile.profile_email.is_empty());
    }

    #[test]
    fn test_round_trip_keeps_image() {
        let profile = complete_profile();
        let json = serde_json::to_string(&profile).unwrap();
        let back: ProfileData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_initials() {
        assert_eq!(complete_profile().initials(), "AL");
        assert_eq!(ProfileData::from_onboarding("ana", "a@b.co").initials(), "A");
        assert_eq!(ProfileData::default().initials(), "");
    }

    #[test]
    fn test_invalid_fields_complete_profile() {
        assert!(complete_profile().invalid_fields().is_empty());
    }

    #[test]
    fn test_invalid_fields_after_onboarding() {
        let profile = ProfileData::from_onboarding("Ana", "ana@example.com");
        assert!(profile.invalid_onboarding_fields().is_empty());
        assert_eq!(profile.invalid_fields(), vec!["lastName", "phoneNumber"]);
    }

    #[test]
    fn test_invalid_onboarding_fields() {
        let profile = ProfileData::from_onboarding("Ana2", "not-an-email");
        assert_eq!(
            profile.invalid_onboarding_fields(),
            vec!["firstName", "profileEmail"]
        );
    }
}
