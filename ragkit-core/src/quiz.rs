//! Quiz generation over the retrieve-and-generate endpoint
//!
//! A course section is substituted into the prompt template locally, then
//! sent as a single inferencing call with an empty history. The generated
//! multiple-choice question is read back with [`parse_question`].

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::config::ApiKey;
use crate::error::Result;
use crate::query::{QueryEngine, QueryRequest};
use crate::response::Answer;
use crate::transport::Transport;

/// Query sent with every quiz request
pub const QUIZ_QUERY: &str = "Créer un quiz";
/// Collection quizzes are generated from when none is given
pub const QUIZ_COLLECTION: &str = "secourisme";
/// Placeholder replaced by the section text
pub const CONTEXT_PLACEHOLDER: &str = "{context}";
/// Prompt template for a three-level first aid quiz
pub const QUIZ_PROMPT: &str = "Tu es un expert en formation Croix-Rouge. \
À partir du texte suivant, génère :\n\
- 1 QCM niveau débutant avec 4 choix A) B) C) D) dont UNE seule bonne réponse.\n\
- 1 situation réelle (niveau intermédiaire) où il faut faire un choix.\n\
- 1 cas complexe pour niveau expert.\n\
Termine le QCM par : Bonne réponse : X) texte complet\n\n\
Texte : {context}\n\n\
Question : Créer un quiz\n\n\
Réponse :";

const CHOICE_LABELS: [&str; 4] = ["A)", "B)", "C)", "D)"];
const ANSWER_MARKERS: [&str; 2] = ["Bonne réponse", "Réponse"];

#[allow(clippy::expect_used)]
static ANSWER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-D]\))\s*(.+)").expect("answer label pattern"));

/// Substitute the section text into a template
pub fn fill_prompt(template: &str, context: &str) -> String {
    template.replace(CONTEXT_PLACEHOLDER, context)
}

/// A quiz to generate from one course section
#[derive(Debug, Clone)]
pub struct QuizRequest {
    /// Source text the questions are built from
    pub section_text: String,
    /// Collection to retrieve supporting chunks from
    pub collection_name: String,
    /// Credential sent in the `api_key` field
    pub api_key: ApiKey,
    /// Template holding a [`CONTEXT_PLACEHOLDER`]
    pub template: String,
    /// LLM family and name; `None` keeps the query defaults
    pub model: Option<(String, String)>,
}

impl QuizRequest {
    /// Quiz over the default collection and template
    pub fn new(section_text: impl Into<String>, api_key: impl Into<ApiKey>) -> Self {
        Self {
            section_text: section_text.into(),
            collection_name: QUIZ_COLLECTION.to_string(),
            api_key: api_key.into(),
            template: QUIZ_PROMPT.to_string(),
            model: None,
        }
    }

    /// Generate from another collection
    pub fn with_collection(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = collection_name.into();
        self
    }

    /// Use another template
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Use another model
    pub fn with_model(mut self, family: impl Into<String>, name: impl Into<String>) -> Self {
        self.model = Some((family.into(), name.into()));
        self
    }

    /// The inferencing request this quiz is sent as
    pub fn to_query_request(&self) -> QueryRequest {
        let request = QueryRequest::new(QUIZ_QUERY, &self.collection_name, self.api_key.clone())
            .with_prompt(fill_prompt(&self.template, &self.section_text));
        match &self.model {
            Some((family, name)) => request.with_model(family, name),
            None => request,
        }
    }
}

/// A multiple-choice question read from generated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestion {
    /// First line holding a `?`, else the first line
    pub question: String,
    /// Lines starting with `A)` to `D)`, in order
    pub choices: Vec<String>,
    /// The choice named by the "Bonne réponse" line, when it matches one
    pub answer: Option<String>,
}

/// Read a multiple-choice question out of generated text
///
/// Returns `None` when the text has no non-blank line.
pub fn parse_question(raw: &str) -> Option<ParsedQuestion> {
    let lines: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let first = *lines.first()?;

    let question = lines.iter().copied().find(|l| l.contains('?')).unwrap_or(first);
    let choices: Vec<String> = lines
        .iter()
        .filter(|l| CHOICE_LABELS.iter().any(|label| l.starts_with(label)))
        .map(|l| l.to_string())
        .collect();

    let answer = lines
        .iter()
        .find(|l| ANSWER_MARKERS.iter().any(|m| l.contains(m)))
        .and_then(|line| ANSWER_LABEL.captures(line))
        .and_then(|caps| caps.get(1))
        .and_then(|label| choices.iter().find(|c| c.starts_with(label.as_str())).cloned());

    Some(ParsedQuestion {
        question: question.to_string(),
        choices,
        answer,
    })
}

/// Generates quizzes through a [`QueryEngine`]
pub struct QuizGenerator<T: Transport + ?Sized> {
    engine: QueryEngine<T>,
}

impl<T: Transport + ?Sized> QuizGenerator<T> {
    /// Create a generator over a shared transport
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            engine: QueryEngine::new(transport),
        }
    }

    /// Generate a quiz, returning the service's body unmodified
    pub async fn generate(&self, request: &QuizRequest) -> Result<Answer> {
        tracing::debug!(
            collection = %request.collection_name,
            section_chars = request.section_text.chars().count(),
            "generating quiz"
        );
        self.engine.get_answer(&request.to_query_request()).await
    }

    /// Generate a quiz and read its multiple-choice question
    ///
    /// `Ok(None)` when the body has no `answer` text to parse.
    pub async fn generate_question(&self, request: &QuizRequest) -> Result<Option<ParsedQuestion>> {
        let answer = self.generate(request).await?;
        Ok(answer.answer().and_then(parse_question))
    }
}
