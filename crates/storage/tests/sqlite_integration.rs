use defenzo_core::model::{
    Badge, BadgeId, BadgeRequirement, CardsContent, Course, CourseId, CourseLevel, Flashcard,
    Lesson, LessonContent, LessonId, NewsArticle, NewsCategory, UserBadge,
};
use defenzo_core::time::fixed_now;
use storage::repository::{
    BadgeRepository, CourseRepository, NewsRepository, QuizResultRecord, QuizResultRepository,
    SessionRepository,
};
use storage::sqlite::SqliteRepository;

fn cards_lesson(id: &str) -> Lesson {
    Lesson::new(
        LessonId::new(id).unwrap(),
        format!("Lesson {id}"),
        "5 min",
        LessonContent::Cards(CardsContent {
            cards: vec![Flashcard {
                front: "2FA".into(),
                back: "Second factor on top of the password".into(),
            }],
        }),
    )
    .unwrap()
}

fn build_course(id: &str, lesson_ids: &[&str]) -> Course {
    Course::new(
        CourseId::new(id).unwrap(),
        "Password Security",
        "Credentials done right",
        "Basics",
        CourseLevel::Beginner,
        "1h",
        vec!["passwords".into(), "mfa".into()],
        Some("https://cdn.example/course.png".into()),
        lesson_ids.iter().map(|l| cards_lesson(l)).collect(),
    )
    .unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_persists_lessons_and_progress() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_courses?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let mut course = build_course("c1", &["l1", "l2"]);
    course
        .set_lesson_completed(&LessonId::new("l1").unwrap(), true)
        .unwrap();
    repo.upsert_course(&course).await.unwrap();

    let fetched = repo.get_course(course.id()).await.unwrap().expect("course");
    assert_eq!(fetched.progress(), 50);
    assert_eq!(fetched.total_lessons(), 2);
    assert!(fetched.lessons()[0].completed());
    assert!(!fetched.lessons()[1].completed());
    assert_eq!(fetched.tags(), course.tags());
    assert_eq!(fetched.image(), course.image());
}

#[tokio::test]
async fn sqlite_upsert_replaces_lessons() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.upsert_course(&build_course("c1", &["l1", "l2", "l3"]))
        .await
        .unwrap();
    repo.upsert_course(&build_course("c1", &["l1"])).await.unwrap();

    let fetched = repo
        .get_course(&CourseId::new("c1").unwrap())
        .await
        .unwrap()
        .expect("course");
    assert_eq!(fetched.total_lessons(), 1);
}

#[tokio::test]
async fn sqlite_lists_courses_ordered() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_list?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.upsert_course(&build_course("b", &["l1"])).await.unwrap();
    repo.upsert_course(&build_course("a", &["l1"])).await.unwrap();

    let courses = repo.list_courses().await.unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].id().as_str(), "a");
    assert_eq!(courses[1].id().as_str(), "b");
}

#[tokio::test]
async fn sqlite_badges_roundtrip_with_requirement_value() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_badges?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let badges = vec![
        UserBadge::new(
            Badge {
                id: BadgeId::new("progress_quick").unwrap(),
                name: "Quick Learner".into(),
                description: "Complete 5 courses".into(),
                icon: "🚀".into(),
                category: "learning_progress".into(),
                requirement: BadgeRequirement {
                    kind: "courses_completed".into(),
                    value: Some(5),
                },
            },
            40,
            false,
            None,
        ),
        UserBadge::new(
            Badge {
                id: BadgeId::new("quiz_perfect").unwrap(),
                name: "Perfect Score".into(),
                description: "Get 100% in any quiz".into(),
                icon: "💯".into(),
                category: "quiz_performance".into(),
                requirement: BadgeRequirement {
                    kind: "perfect_score".into(),
                    value: None,
                },
            },
            100,
            true,
            Some(fixed_now()),
        ),
    ];
    repo.replace_user_badges(&badges).await.unwrap();

    let fetched = repo.list_user_badges().await.unwrap();
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].badge().requirement.value, Some(5));
    assert_eq!(fetched[1].awarded_at(), Some(fixed_now()));
    assert!(fetched[1].completed());
}

#[tokio::test]
async fn sqlite_quiz_scores_keep_order() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_quiz?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let course_id = CourseId::new("c1").unwrap();
    for (offset, score) in [(0, 85.0), (1, 90.0), (2, 75.0)] {
        repo.record_quiz_result(&QuizResultRecord {
            course_id: course_id.clone(),
            score,
            taken_at: fixed_now() + chrono::Duration::minutes(offset),
        })
        .await
        .unwrap();
    }

    assert_eq!(repo.quiz_scores().await.unwrap(), vec![85.0, 90.0, 75.0]);
}

#[tokio::test]
async fn sqlite_news_filter_by_category() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_news?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let articles = vec![
        NewsArticle {
            id: "n1".into(),
            title: "New Phishing Campaign".into(),
            summary: "Targets remote workers".into(),
            category: NewsCategory::Threats,
            date: "May 24, 2024".into(),
            read_time: "4 min".into(),
            image_url: None,
            likes: 128,
            comments: 32,
        },
        NewsArticle {
            id: "n2".into(),
            title: "Secure Your Home Network".into(),
            summary: "Five simple steps".into(),
            category: NewsCategory::Tips,
            date: "May 22, 2024".into(),
            read_time: "3 min".into(),
            image_url: Some("https://cdn.example/wifi.jpg".into()),
            likes: 246,
            comments: 57,
        },
    ];
    repo.replace_articles(&articles).await.unwrap();

    let all = repo.list_articles(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "n1");

    let tips = repo.list_articles(Some(NewsCategory::Tips)).await.unwrap();
    assert_eq!(tips.len(), 1);
    assert_eq!(tips[0].id, "n2");
}

#[tokio::test]
async fn sqlite_session_token_survives_overwrite() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_session?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.load_token().await.unwrap().is_none());

    repo.save_token("first").await.unwrap();
    repo.save_token("second").await.unwrap();
    assert_eq!(repo.load_token().await.unwrap().as_deref(), Some("second"));

    repo.clear_token().await.unwrap();
    assert!(repo.load_token().await.unwrap().is_none());
}
