use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::LessonId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson content has no items")]
    EmptyContent,

    #[error("multiple choice question {0} has no options")]
    NoOptions(String),

    #[error("multiple choice question {0} has a correct answer outside its options")]
    AnswerNotInOptions(String),

    #[error("scenario {0} marks a correct option outside its option list")]
    CorrectOptionOutOfRange(String),

    #[error("chat reply {0} points to unknown node {1}")]
    DanglingReply(String, String),

    #[error("duplicate chat node id {0}")]
    DuplicateChatNode(String),
}

//
// ─── LESSON TYPE ───────────────────────────────────────────────────────────────
//

/// The five fixed interactive lesson formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Dialog,
    Cards,
    Scenario,
    Visual,
    ChatSimulation,
}

impl LessonType {
    /// Wire/storage identifier for the format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LessonType::Dialog => "dialog",
            LessonType::Cards => "cards",
            LessonType::Scenario => "scenario",
            LessonType::Visual => "visual",
            LessonType::ChatSimulation => "chat_simulation",
        }
    }

    /// Hands-on formats count toward the practical-tasks metric.
    #[must_use]
    pub fn is_practical(self) -> bool {
        matches!(
            self,
            LessonType::Scenario | LessonType::Visual | LessonType::ChatSimulation
        )
    }
}

//
// ─── CONTENT PAYLOADS ──────────────────────────────────────────────────────────
//

/// A quiz-style question inside a dialog lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub answer: AnswerKey,
    pub explanation: String,
}

/// The expected answer, discriminated the way the wire payload is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerKey {
    #[serde(rename_all = "camelCase")]
    MultipleChoice {
        options: Vec<String>,
        correct_answer: String,
    },
    #[serde(rename_all = "camelCase")]
    TrueFalse { correct_answer: bool },
}

impl Question {
    /// Checks a learner's raw answer against the key.
    ///
    /// True/false answers accept `"true"`/`"false"` case-insensitively.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        match &self.answer {
            AnswerKey::MultipleChoice { correct_answer, .. } => answer == correct_answer,
            AnswerKey::TrueFalse { correct_answer } => {
                answer.eq_ignore_ascii_case(if *correct_answer { "true" } else { "false" })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogContent {
    #[serde(default)]
    pub introduction: Option<String>,
    pub questions: Vec<Question>,
}

/// A single front/back flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardsContent {
    pub cards: Vec<Flashcard>,
}

/// One branching situation with exactly one safe option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioStep {
    pub id: String,
    pub situation: String,
    pub options: Vec<String>,
    pub correct_option: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioContent {
    pub scenarios: Vec<ScenarioStep>,
}

/// A clickable region in a hotspot-finding task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualTask {
    pub id: String,
    pub image: String,
    pub hotspots: Vec<Hotspot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualContent {
    pub visual_tasks: Vec<VisualTask>,
}

//
// ─── CHAT SIMULATION ───────────────────────────────────────────────────────────
//

/// One choice the learner can send in a chat simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub id: String,
    pub text: String,
    pub feedback: String,
    pub safe: bool,
    /// Node shown after this reply; `None` ends the conversation.
    #[serde(default)]
    pub next: Option<String>,
}

/// One incoming message plus the replies offered for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatNode {
    pub id: String,
    pub message: String,
    pub replies: Vec<ChatReply>,
}

/// The branching dialogue of a chat-simulation lesson.
///
/// Branching is a lookup table keyed by reply id: picking a reply resolves
/// its feedback and the next node, if any. The first node is the opener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChatScript", into = "RawChatScript")]
pub struct ChatScript {
    nodes: Vec<ChatNode>,
}

/// Unvalidated wire shape; deserialization funnels through [`ChatScript::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawChatScript {
    nodes: Vec<ChatNode>,
}

impl TryFrom<RawChatScript> for ChatScript {
    type Error = LessonError;

    fn try_from(raw: RawChatScript) -> Result<Self, Self::Error> {
        ChatScript::new(raw.nodes)
    }
}

impl From<ChatScript> for RawChatScript {
    fn from(script: ChatScript) -> Self {
        Self {
            nodes: script.nodes,
        }
    }
}

impl ChatScript {
    /// Builds a script, checking node id uniqueness and reply targets.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the script is empty, a node id repeats, or a
    /// reply points to a node that does not exist.
    pub fn new(nodes: Vec<ChatNode>) -> Result<Self, LessonError> {
        if nodes.is_empty() {
            return Err(LessonError::EmptyContent);
        }
        let mut seen = std::collections::HashSet::new();
        for node in &nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(LessonError::DuplicateChatNode(node.id.clone()));
            }
        }
        for node in &nodes {
            for reply in &node.replies {
                if let Some(next) = &reply.next {
                    if !seen.contains(next.as_str()) {
                        return Err(LessonError::DanglingReply(reply.id.clone(), next.clone()));
                    }
                }
            }
        }
        Ok(Self { nodes })
    }

    #[must_use]
    pub fn nodes(&self) -> &[ChatNode] {
        &self.nodes
    }

    /// The node the conversation opens with.
    #[must_use]
    pub fn opening(&self) -> &ChatNode {
        &self.nodes[0]
    }

    /// Looks up a reply across all nodes by its id.
    #[must_use]
    pub fn reply(&self, reply_id: &str) -> Option<&ChatReply> {
        self.nodes
            .iter()
            .flat_map(|node| node.replies.iter())
            .find(|reply| reply.id == reply_id)
    }

    /// Resolves the node shown after the given reply, if the branch continues.
    #[must_use]
    pub fn next_node(&self, reply_id: &str) -> Option<&ChatNode> {
        let next = self.reply(reply_id)?.next.as_deref()?;
        self.nodes.iter().find(|node| node.id == next)
    }
}

//
// ─── LESSON CONTENT ────────────────────────────────────────────────────────────
//

/// Variant payload per lesson format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LessonContent {
    ChatSimulation(ChatScript),
    Visual(VisualContent),
    Scenario(ScenarioContent),
    Cards(CardsContent),
    Dialog(DialogContent),
}

impl LessonContent {
    /// The format this payload belongs to.
    #[must_use]
    pub fn lesson_type(&self) -> LessonType {
        match self {
            LessonContent::Dialog(_) => LessonType::Dialog,
            LessonContent::Cards(_) => LessonType::Cards,
            LessonContent::Scenario(_) => LessonType::Scenario,
            LessonContent::Visual(_) => LessonType::Visual,
            LessonContent::ChatSimulation(_) => LessonType::ChatSimulation,
        }
    }

    /// Validates the payload invariants shared with the constructors.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` for empty payloads, out-of-range correct options,
    /// or multiple-choice keys missing from their option lists.
    pub fn validate(&self) -> Result<(), LessonError> {
        match self {
            LessonContent::Dialog(dialog) => {
                if dialog.questions.is_empty() {
                    return Err(LessonError::EmptyContent);
                }
                for question in &dialog.questions {
                    if let AnswerKey::MultipleChoice {
                        options,
                        correct_answer,
                    } = &question.answer
                    {
                        if options.is_empty() {
                            return Err(LessonError::NoOptions(question.id.clone()));
                        }
                        if !options.contains(correct_answer) {
                            return Err(LessonError::AnswerNotInOptions(question.id.clone()));
                        }
                    }
                }
                Ok(())
            }
            LessonContent::Cards(cards) => {
                if cards.cards.is_empty() {
                    return Err(LessonError::EmptyContent);
                }
                Ok(())
            }
            LessonContent::Scenario(content) => {
                if content.scenarios.is_empty() {
                    return Err(LessonError::EmptyContent);
                }
                for step in &content.scenarios {
                    if step.correct_option >= step.options.len() {
                        return Err(LessonError::CorrectOptionOutOfRange(step.id.clone()));
                    }
                }
                Ok(())
            }
            LessonContent::Visual(content) => {
                if content.visual_tasks.is_empty() {
                    return Err(LessonError::EmptyContent);
                }
                Ok(())
            }
            // ChatScript::new already enforced its invariants.
            LessonContent::ChatSimulation(_) => Ok(()),
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single interactive unit inside a course.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    duration: String,
    content: LessonContent,
    completed: bool,
}

impl Lesson {
    /// Creates a new lesson from validated content.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` for a blank title, or any content
    /// validation error.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        duration: impl Into<String>,
        content: LessonContent,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        content.validate()?;

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            duration: duration.into(),
            content,
            completed: false,
        })
    }

    /// Rebuilds a lesson from persisted state, including completion.
    ///
    /// # Errors
    ///
    /// Same validation as [`Lesson::new`].
    pub fn from_persisted(
        id: LessonId,
        title: impl Into<String>,
        duration: impl Into<String>,
        content: LessonContent,
        completed: bool,
    ) -> Result<Self, LessonError> {
        let mut lesson = Self::new(id, title, duration, content)?;
        lesson.completed = completed;
        Ok(lesson)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn lesson_type(&self) -> LessonType {
        self.content.lesson_type()
    }

    #[must_use]
    pub fn content(&self) -> &LessonContent {
        &self.content
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
