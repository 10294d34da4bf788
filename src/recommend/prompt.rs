//! Prompt construction for both recommendation flows.

use serde::{Deserialize, Deserializer};

/// Student preferences posted to `/recommend`.
///
/// Every field is optional on the wire; absent fields take the neutral
/// default. Scores may arrive as JSON strings (form values) or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    #[serde(deserialize_with = "lenient_string")]
    pub college_preference: String,
    #[serde(deserialize_with = "lenient_string")]
    pub math: String,
    #[serde(deserialize_with = "lenient_string")]
    pub science: String,
    #[serde(deserialize_with = "lenient_string")]
    pub literature: String,
    #[serde(deserialize_with = "lenient_string")]
    pub social: String,
    #[serde(deserialize_with = "lenient_string")]
    pub art: String,
    #[serde(deserialize_with = "lenient_string")]
    pub tech: String,
    #[serde(deserialize_with = "lenient_string")]
    pub business: String,
    #[serde(deserialize_with = "lenient_string")]
    pub hands_on: String,
    #[serde(deserialize_with = "lenient_string")]
    pub career_focus: String,
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(deserialize_with = "lenient_string")]
    pub college_type: String,
}

impl Default for Preferences {
    fn default() -> Self {
        let neutral = || "3".to_string();
        Self {
            college_preference: "indian".to_string(),
            math: neutral(),
            science: neutral(),
            literature: neutral(),
            social: neutral(),
            art: neutral(),
            tech: neutral(),
            business: neutral(),
            hands_on: neutral(),
            career_focus: "General".to_string(),
            location: "Any".to_string(),
            college_type: "University".to_string(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl Preferences {
    /// Prompt asking for streams, college types, careers and institutions as
    /// a single JSON object.
    pub fn prompt(&self) -> String {
        format!(
            r#"Based on the following student preferences, recommend suitable college streams and institutions:

Preferences:
- College Preference: {college} Colleges
- Mathematics: {math}/5
- Science: {science}/5
- Literature: {literature}/5
- Social Sciences: {social}/5
- Arts/Creative: {art}/5
- Technology: {tech}/5
- Business: {business}/5
- Hands-on Work: {hands_on}/5
- Career Focus: {career}
- Location Preference: {location}
- College Type: {college_type}

Please provide recommendations in the following JSON format:
{{
    "streams": ["Stream 1", "Stream 2", "Stream 3"],
    "colleges": ["College Type 1", "College Type 2"],
    "careers": ["Career Path 1", "Career Path 2", "Career Path 3"],
    "institutions": ["Institution 1", "Institution 2", "Institution 3"]
}}

Ensure the response is valid JSON and nothing else.
"#,
            college = capitalize(&self.college_preference),
            math = self.math,
            science = self.science,
            literature = self.literature,
            social = self.social,
            art = self.art,
            tech = self.tech,
            business = self.business,
            hands_on = self.hands_on,
            career = self.career_focus,
            location = self.location,
            college_type = self.college_type,
        )
    }
}

/// Prompt for the chat form: a free-text profile plus the college context.
pub fn profile_prompt(profile: &str, college_context: &str) -> String {
    format!(
        r#"You are an expert college guidance counselor.

Here is the student profile:
{profile}

Below is a list of colleges with relevant metrics:
{college_context}

Based on this, recommend 3 colleges that best match the student's interests and academic potential. Explain your recommendation briefly.

Output JSON like:
[
  {{"college": "XYZ", "location": "ABC", "reason": "Short reason"}},
  ...
]
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let prefs: Preferences = serde_json::from_value(json!({ "math": "5" })).unwrap();
        assert_eq!(prefs.math, "5");
        assert_eq!(prefs.science, "3");
        assert_eq!(prefs.college_preference, "indian");
        assert_eq!(prefs.career_focus, "General");
        assert_eq!(prefs.location, "Any");
        assert_eq!(prefs.college_type, "University");
    }

    #[test]
    fn test_numeric_scores_accepted() {
        let prefs: Preferences =
            serde_json::from_value(json!({ "handsOn": 4, "tech": 2.5 })).unwrap();
        assert_eq!(prefs.hands_on, "4");
        assert_eq!(prefs.tech, "2.5");
    }

    #[test]
    fn test_prompt_lists_preferences() {
        let prefs = Preferences {
            college_preference: "FOREIGN".to_string(),
            math: "5".to_string(),
            career_focus: "Medicine".to_string(),
            ..Preferences::default()
        };
        let prompt = prefs.prompt();

        assert!(prompt.contains("- College Preference: Foreign Colleges"));
        assert!(prompt.contains("- Mathematics: 5/5"));
        assert!(prompt.contains("- Hands-on Work: 3/5"));
        assert!(prompt.contains("- Career Focus: Medicine"));
        assert!(prompt.contains(r#""institutions": ["#));
    }

    #[test]
    fn test_profile_prompt_embeds_context() {
        let prompt = profile_prompt(
            "I love robotics and live in Pune.",
            "institution: IISc, location: Bengaluru\n",
        );
        assert!(prompt.starts_with("You are an expert college guidance counselor."));
        assert!(prompt.contains("I love robotics and live in Pune."));
        assert!(prompt.contains("institution: IISc, location: Bengaluru"));
        assert!(prompt.contains(r#"{"college": "XYZ", "location": "ABC", "reason": "Short reason"}"#));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("indian"), "Indian");
        assert_eq!(capitalize("fOREIGN"), "Foreign");
        assert_eq!(capitalize(""), "");
    }
}
