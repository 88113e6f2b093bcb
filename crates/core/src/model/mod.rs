mod badge;
mod course;
mod ids;
mod lesson;
mod news;
mod user;

pub use badge::{group_by_category, Badge, BadgeCategory, BadgeGroup, BadgeRequirement, UserBadge};
pub use course::{clamp_progress, Course, CourseError, CourseLevel};
pub use ids::{BadgeId, CourseId, LessonId, ParseIdError, UserId};
pub use lesson::{
    AnswerKey, CardsContent, ChatNode, ChatReply, ChatScript, DialogContent, Flashcard, Hotspot,
    Lesson, LessonContent, LessonError, LessonType, Question, ScenarioContent, ScenarioStep,
    VisualContent, VisualTask,
};
pub use news::{NewsArticle, NewsCategory, UnknownNewsCategory};
pub use user::UserProfile;
