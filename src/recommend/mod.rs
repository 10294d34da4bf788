//! College recommendations from a local model.
//!
//! Two flows share one [`Recommender`]:
//!
//! - structured preferences (JSON API) → streams, college types, careers
//!   and institutions;
//! - a free-text profile (chat form) → three suggested colleges drawn from
//!   the [`CollegeCatalog`](crate::colleges::CollegeCatalog).

mod parse;
mod prompt;

pub use parse::{extract_array, extract_object};
pub use prompt::{Preferences, profile_prompt};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::colleges::CollegeCatalog;
use crate::error::AppError;
use crate::ollama::ModelRunner;

/// Keys every preferences answer carries.
pub const RECOMMENDATION_KEYS: [&str; 4] = ["streams", "colleges", "careers", "institutions"];

/// Answer to a preferences request: the model's JSON object, passed through
/// as-is, with an empty list under each of [`RECOMMENDATION_KEYS`] it left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Recommendations(Map<String, Value>);

impl Recommendations {
    /// Fill in the absent keys. Values the model did supply are kept even
    /// when they are not lists.
    pub fn from_model(mut answer: Map<String, Value>) -> Self {
        for key in RECOMMENDATION_KEYS {
            answer
                .entry(key)
                .or_insert_with(|| Value::Array(Vec::new()));
        }
        Self(answer)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// One college suggested for a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub reason: String,
}

/// What the counselor answers to a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileReply {
    Suggestions(Vec<Suggestion>),
    /// The model answered, but not with a usable JSON array.
    InvalidOutput { details: String },
    /// The model could not be run.
    Unavailable { details: String },
}

/// Model names per flow.
#[derive(Debug, Clone)]
pub struct ModelChoice {
    pub preference_model: String,
    pub profile_model: String,
}

pub struct Recommender {
    runner: Arc<dyn ModelRunner>,
    models: ModelChoice,
    catalog: CollegeCatalog,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("models", &self.models)
            .field("catalog_len", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl Recommender {
    pub fn new(
        runner: Arc<dyn ModelRunner>,
        models: ModelChoice,
        catalog: CollegeCatalog,
    ) -> Self {
        Self {
            runner,
            models,
            catalog,
        }
    }

    /// Recommend streams and institutions for structured preferences.
    pub async fn for_preferences(
        &self,
        prefs: &Preferences,
    ) -> Result<Recommendations, AppError> {
        let output = self
            .runner
            .run(&self.models.preference_model, &prefs.prompt())
            .await
            .map_err(AppError::ModelUnavailable)?;

        if output.is_empty() {
            warn!(name: "recommend.preferences.empty", "Model returned no output");
            return Err(AppError::EmptyModelOutput);
        }

        // An empty object carries no recommendations at all.
        let answer = extract_object::<Map<String, Value>>(&output)
            .filter(|answer| !answer.is_empty())
            .ok_or_else(|| {
                warn!(
                    name: "recommend.preferences.unparseable",
                    output_len = output.len(),
                    "No JSON object in model output"
                );
                AppError::UnparseableOutput
            })?;
        let recs = Recommendations::from_model(answer);

        info!(
            name: "recommend.preferences.done",
            keys = recs.as_map().len(),
            "Preference recommendations ready"
        );
        Ok(recs)
    }

    /// Suggest colleges for a free-text profile. Never fails: model and
    /// parse errors become a reply the chat can display.
    pub async fn for_profile(&self, profile: &str) -> ProfileReply {
        let prompt = profile_prompt(profile, &self.catalog.prompt_context());

        let output = match self.runner.run(&self.models.profile_model, &prompt).await {
            Ok(output) => output,
            Err(e) => {
                return ProfileReply::Unavailable {
                    details: e.to_string(),
                };
            }
        };

        match extract_array::<Vec<Suggestion>>(&output) {
            Ok(suggestions) => {
                info!(
                    name: "recommend.profile.done",
                    count = suggestions.len(),
                    "Profile suggestions ready"
                );
                ProfileReply::Suggestions(suggestions)
            }
            Err(e) => {
                warn!(name: "recommend.profile.unparseable", error = %e, "Invalid model output");
                ProfileReply::InvalidOutput {
                    details: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colleges::College;
    use crate::ollama::RunnerError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed answer and remembers the last (model, prompt).
    struct Scripted {
        answer: Result<String, ()>,
        seen: Mutex<Option<(String, String)>>,
    }

    impl Scripted {
        fn answering(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(answer.to_string()),
                seen: Mutex::new(None),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                answer: Err(()),
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl ModelRunner for Scripted {
        async fn run(&self, model: &str, prompt: &str) -> Result<String, RunnerError> {
            *self.seen.lock().unwrap() = Some((model.to_string(), prompt.to_string()));
            self.answer
                .clone()
                .map_err(|()| RunnerError::NotInstalled("ollama".to_string()))
        }
    }

    fn recommender(runner: Arc<Scripted>) -> Recommender {
        let catalog = CollegeCatalog::new(
            vec![College {
                institution: "IISc".to_string(),
                location: "Bengaluru".to_string(),
                ar_score: 40.0,
                fsr_score: 60.0,
                overall_score: 68.0,
            }],
            20,
        );
        Recommender::new(
            runner,
            ModelChoice {
                preference_model: "pref-model".to_string(),
                profile_model: "profile-model".to_string(),
            },
            catalog,
        )
    }

    #[tokio::test]
    async fn test_preferences_fill_missing_keys() {
        let runner = Scripted::answering(r#"Here: {"streams": ["Engineering"], "note": "ok"}"#);
        let recs = recommender(Arc::clone(&runner))
            .for_preferences(&Preferences::default())
            .await
            .unwrap();

        assert_eq!(recs.get("streams"), Some(&serde_json::json!(["Engineering"])));
        for key in ["colleges", "careers", "institutions"] {
            assert_eq!(recs.get(key), Some(&serde_json::json!([])), "{key}");
        }
        assert_eq!(recs.get("note"), Some(&Value::from("ok")));

        let (model, prompt) = runner.seen.lock().unwrap().clone().unwrap();
        assert_eq!(model, "pref-model");
        assert!(prompt.contains("Indian Colleges"));
    }

    #[tokio::test]
    async fn test_preferences_keep_non_list_values() {
        let recs = recommender(Scripted::answering(
            r#"{"streams": "Engineering", "careers": null}"#,
        ))
        .for_preferences(&Preferences::default())
        .await
        .unwrap();

        assert_eq!(recs.get("streams"), Some(&Value::from("Engineering")));
        assert_eq!(recs.get("careers"), Some(&Value::Null));
        assert_eq!(recs.get("colleges"), Some(&serde_json::json!([])));
    }

    #[tokio::test]
    async fn test_preferences_empty_object_is_unparseable() {
        let err = recommender(Scripted::answering("Sorry: {}"))
            .for_preferences(&Preferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnparseableOutput));
    }

    #[tokio::test]
    async fn test_preferences_model_failure() {
        let err = recommender(Scripted::failing())
            .for_preferences(&Preferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn test_preferences_empty_output() {
        let err = recommender(Scripted::answering(""))
            .for_preferences(&Preferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyModelOutput));
    }

    #[tokio::test]
    async fn test_preferences_unparseable() {
        let err = recommender(Scripted::answering("I think you should study art."))
            .for_preferences(&Preferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnparseableOutput));
    }

    #[tokio::test]
    async fn test_profile_suggestions_use_catalog() {
        let runner = Scripted::answering(
            r#"[{"college": "IISc", "location": "Bengaluru", "reason": "Strong research"}]"#,
        );
        let reply = recommender(Arc::clone(&runner))
            .for_profile("Physics olympiad finalist")
            .await;

        assert_eq!(
            reply,
            ProfileReply::Suggestions(vec![Suggestion {
                college: "IISc".to_string(),
                location: "Bengaluru".to_string(),
                reason: "Strong research".to_string(),
            }])
        );

        let (model, prompt) = runner.seen.lock().unwrap().clone().unwrap();
        assert_eq!(model, "profile-model");
        assert!(prompt.contains("Physics olympiad finalist"));
        assert!(prompt.contains("institution: IISc, location: Bengaluru"));
    }

    #[tokio::test]
    async fn test_profile_invalid_output_is_reply() {
        let reply = recommender(Scripted::answering("no list today"))
            .for_profile("anything")
            .await;
        assert!(matches!(reply, ProfileReply::InvalidOutput { .. }));
    }

    #[tokio::test]
    async fn test_profile_model_failure_is_reply() {
        let reply = recommender(Scripted::failing()).for_profile("anything").await;
        assert!(matches!(reply, ProfileReply::Unavailable { .. }));
    }
}
