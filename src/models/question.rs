// src/models/question.rs

use serde::{Deserialize, Serialize};

/// A question as stored in the pool document (`data/questions.json`).
///
/// The same type is reused for the exam copy of a question; in that case
/// `id` holds the exam-local number and the pool id lives only in the
/// session's question map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolQuestion {
    /// 1-based pool id. Missing ids are assigned at load time.
    #[serde(default)]
    pub id: u32,

    #[serde(rename = "questionText", alias = "text")]
    pub text: String,

    /// Optional image path or URI shown with the question.
    #[serde(rename = "questionImage", alias = "image", default)]
    pub image: Option<String>,

    /// Ordered options. Option index + 1 is the answer token.
    pub options: Vec<QuestionOption>,

    #[serde(default)]
    pub is_multiple_choice: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
}

impl PoolQuestion {
    /// Answer tokens ("1", "2", ...) of the options flagged as correct.
    pub fn correct_tokens(&self) -> Vec<String> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, opt)| opt.is_correct)
            .map(|(index, _)| (index + 1).to_string())
            .collect()
    }

    /// Canonical form of `token` ("01", "+1" -> "1"), or `None` when it
    /// does not name one of this question's options.
    pub fn canonical_token(&self, token: &str) -> Option<String> {
        token
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1 && *n <= self.options.len())
            .map(|n| n.to_string())
    }
}

/// DTO for sending a question to the client (excludes the answer key).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: u32,
    pub text: String,
    pub image: Option<String>,
    pub options: Vec<PublicOption>,
    pub is_multiple_choice: bool,
}

#[derive(Debug, Serialize)]
pub struct PublicOption {
    /// Answer token to submit for this option.
    pub token: String,
    pub text: String,
    pub image: Option<String>,
}

impl From<&PoolQuestion> for PublicQuestion {
    fn from(q: &PoolQuestion) -> Self {
        PublicQuestion {
            id: q.id,
            text: q.text.clone(),
            image: q.image.clone(),
            options: q
                .options
                .iter()
                .enumerate()
                .map(|(index, opt)| PublicOption {
                    token: (index + 1).to_string(),
                    text: opt.text.clone(),
                    image: opt.image.clone(),
                })
                .collect(),
            is_multiple_choice: q.is_multiple_choice,
        }
    }
}

/// One row of the study view: a pool question with its answer key and explanation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyItem {
    pub q_num: u32,
    pub question: PoolQuestion,
    pub correct_options: Vec<String>,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pool_document_field_names() {
        let raw = r#"{
            "id": 7,
            "questionText": "Which are primes?",
            "questionImage": null,
            "options": [
                {"text": "2", "image": null, "isCorrect": true},
                {"text": "4", "image": null, "isCorrect": false},
                {"text": "5", "image": "img/five.png", "isCorrect": true}
            ],
            "isMultipleChoice": true
        }"#;

        let q: PoolQuestion = serde_json::from_str(raw).unwrap();
        assert_eq!(q.id, 7);
        assert_eq!(q.text, "Which are primes?");
        assert!(q.is_multiple_choice);
        assert_eq!(q.options[2].image.as_deref(), Some("img/five.png"));
        assert_eq!(q.correct_tokens(), vec!["1", "3"]);
    }

    #[test]
    fn canonicalizes_option_indices() {
        let q: PoolQuestion = serde_json::from_str(
            r#"{"text": "Q", "options": [{"text": "a"}, {"text": "b"}]}"#,
        )
        .unwrap();

        assert_eq!(q.id, 0);
        assert_eq!(q.canonical_token("1").as_deref(), Some("1"));
        assert_eq!(q.canonical_token("01").as_deref(), Some("1"));
        assert_eq!(q.canonical_token("+2").as_deref(), Some("2"));
        assert_eq!(q.canonical_token(" 2 ").as_deref(), Some("2"));
        assert_eq!(q.canonical_token("0"), None);
        assert_eq!(q.canonical_token("3"), None);
        assert_eq!(q.canonical_token("-1"), None);
        assert_eq!(q.canonical_token("b"), None);
    }

    #[test]
    fn public_question_hides_answer_key() {
        let q: PoolQuestion = serde_json::from_str(
            r#"{"id": 1, "text": "Q", "options": [{"text": "a", "isCorrect": true}]}"#,
        )
        .unwrap();

        let value = serde_json::to_value(PublicQuestion::from(&q)).unwrap();
        assert_eq!(value["options"][0]["token"], "1");
        assert!(value["options"][0].get("isCorrect").is_none());
    }
}
