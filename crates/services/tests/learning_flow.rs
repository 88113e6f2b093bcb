//! End-to-end flow over in-memory storage: seed courses, complete lessons,
//! record a quiz, and read the resulting dashboard. No network involved; the
//! API base URL points at a closed port and every push is best-effort.

use defenzo_core::model::{
    CardsContent, Course, CourseId, CourseLevel, Flashcard, Lesson, LessonContent, LessonId,
    ScenarioContent, ScenarioStep,
};
use defenzo_core::security::SecurityStatus;
use defenzo_core::time::fixed_clock;
use services::AppServices;
use storage::repository::Storage;

fn cards_lesson(id: &str) -> Lesson {
    Lesson::new(
        LessonId::new(id).unwrap(),
        format!("Lesson {id}"),
        "5 min",
        LessonContent::Cards(CardsContent {
            cards: vec![Flashcard {
                front: "What is MFA?".into(),
                back: "A second factor on top of the password".into(),
            }],
        }),
    )
    .unwrap()
}

fn drill_lesson(id: &str) -> Lesson {
    Lesson::new(
        LessonId::new(id).unwrap(),
        format!("Drill {id}"),
        "10 min",
        LessonContent::Scenario(ScenarioContent {
            scenarios: vec![ScenarioStep {
                id: "s1".into(),
                situation: "A login alert from a device you don't recognize".into(),
                options: vec!["Ignore it".into(), "Reset your password".into()],
                correct_option: 1,
                explanation: "Unrecognized logins mean the password is burned.".into(),
            }],
        }),
    )
    .unwrap()
}

fn seed_course(id: &str, lessons: Vec<Lesson>) -> Course {
    Course::new(
        CourseId::new(id).unwrap(),
        format!("Course {id}"),
        "",
        "Account Security",
        CourseLevel::Beginner,
        "1h",
        vec!["mfa".into()],
        None,
        lessons,
    )
    .unwrap()
}

async fn app() -> (AppServices, Storage) {
    let storage = Storage::in_memory();
    let services = AppServices::assemble(storage.clone(), "http://localhost:0", fixed_clock())
        .await
        .expect("assemble services");
    (services, storage)
}

#[tokio::test]
async fn lesson_completion_feeds_the_dashboard() {
    let (services, storage) = app().await;

    storage
        .courses
        .upsert_course(&seed_course(
            "mfa-basics",
            vec![cards_lesson("l1"), drill_lesson("d1")],
        ))
        .await
        .unwrap();
    storage
        .courses
        .upsert_course(&seed_course("untouched", vec![cards_lesson("l1")]))
        .await
        .unwrap();

    let courses = services.courses();
    let course_id = CourseId::new("mfa-basics").unwrap();

    assert_eq!(
        courses
            .complete_lesson(&course_id, &LessonId::new("l1").unwrap())
            .await
            .unwrap(),
        50
    );
    assert_eq!(
        courses
            .complete_lesson(&course_id, &LessonId::new("d1").unwrap())
            .await
            .unwrap(),
        100
    );
    courses.record_quiz_score(&course_id, 100.0).await.unwrap();

    // courses 1/2 -> 50, quizzes 100, practical 1/1 -> 100
    // 0.4 * 50 + 0.4 * 100 + 0.2 * 100 = 80
    let details = services.security().dashboard().await.unwrap();
    assert_eq!(details.overall, 80);
    assert_eq!(details.status, SecurityStatus::Excellent);
    assert_eq!(details.metrics.courses_progress, 50);
    assert_eq!(details.metrics.practical_tasks, 100);
}

#[tokio::test]
async fn completed_course_leaves_the_continue_rail() {
    let (services, storage) = app().await;
    storage
        .courses
        .upsert_course(&seed_course("only", vec![cards_lesson("l1"), cards_lesson("l2")]))
        .await
        .unwrap();

    let courses = services.courses();
    let id = CourseId::new("only").unwrap();

    courses
        .complete_lesson(&id, &LessonId::new("l1").unwrap())
        .await
        .unwrap();
    let rail = courses.continue_learning().await.unwrap();
    assert_eq!(rail.len(), 1);

    courses
        .complete_lesson(&id, &LessonId::new("l2").unwrap())
        .await
        .unwrap();
    assert!(courses.continue_learning().await.unwrap().is_empty());
    assert!(courses.recommendations(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn news_feed_is_seeded_on_assembly() {
    let (services, _storage) = app().await;
    let articles = services.news().articles(None).await.unwrap();
    assert!(!articles.is_empty());
}

#[tokio::test]
async fn preferred_category_boosts_recommendations() {
    let (services, storage) = app().await;

    let advanced_preferred = Course::new(
        CourseId::new("adv-net").unwrap(),
        "Network Hardening",
        "",
        "Networking",
        CourseLevel::Advanced,
        "2h",
        vec![],
        None,
        vec![cards_lesson("l1")],
    )
    .unwrap();
    storage.courses.upsert_course(&advanced_preferred).await.unwrap();
    storage
        .courses
        .upsert_course(&seed_course("beginner", vec![cards_lesson("l1")]))
        .await
        .unwrap();

    // Advanced weight 1 + bonus 2 = 3, ties with Beginner weight 3; the
    // stable sort keeps list order, which is by id ("adv-net" first).
    let recs = services
        .courses()
        .recommendations(&["Networking".into()])
        .await
        .unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].id().as_str(), "adv-net");
}
