//! Session behaviour against real and failing stores.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use portal_ai::{AiError, AiService};
use portal_model::{
    AssessmentRecord, College, DegreeLevel, Evaluation, ModelError, Pattern, Question, Resource,
    ResourceId, ResourceType, Subject, SubjectId, Submission, SubmissionId, User, UserId,
};
use portal_nav::{NavEvent, Outcome, Section, View};
use portal_persistence::{
    AssessmentStore, LibraryStore, PersistenceError, ResourceStore, SubmissionStore, UserStore,
};
use portal_session::{CREDITS_PER_APPROVAL, PaperDraft, Session, SessionError};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Doubles
// ---------------------------------------------------------------------------

/// `LibraryStore` whose writes can be switched off or made to crash.
struct FlakyStore {
    inner: LibraryStore,
    failing: AtomicBool,
    crashing: AtomicBool,
}

impl FlakyStore {
    fn new(inner: LibraryStore) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
            crashing: AtomicBool::new(false),
        }
    }

    fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn crash_writes(&self) {
        self.crashing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> portal_persistence::Result<()> {
        if self.crashing.load(Ordering::SeqCst) {
            panic!("store crashed mid-write");
        }
        if self.failing.load(Ordering::SeqCst) {
            Err(PersistenceError::Io {
                operation: "write",
                path: PathBuf::from("remote"),
                source: std::io::Error::other("backend unavailable"),
            })
        } else {
            Ok(())
        }
    }
}

impl ResourceStore for FlakyStore {
    fn list_resources(&self) -> portal_persistence::Result<Vec<Resource>> {
        self.inner.list_resources()
    }
    fn add_resource(&self, resource: &Resource) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.add_resource(resource)
    }
    fn delete_resource(&self, id: &ResourceId) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.delete_resource(id)
    }
    fn record_download(&self, id: &ResourceId) -> portal_persistence::Result<u64> {
        self.check()?;
        self.inner.record_download(id)
    }
    fn set_download_url(&self, id: &ResourceId, url: &str) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.set_download_url(id, url)
    }
    fn list_subjects(&self) -> portal_persistence::Result<Vec<Subject>> {
        self.inner.list_subjects()
    }
    fn list_colleges(&self) -> portal_persistence::Result<Vec<College>> {
        self.inner.list_colleges()
    }
    fn add_subject(&self, subject: &Subject) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.add_subject(subject)
    }
    fn add_college(&self, college: &College) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.add_college(college)
    }
}

impl UserStore for FlakyStore {
    fn get_user(&self, id: &UserId) -> portal_persistence::Result<Option<User>> {
        self.inner.get_user(id)
    }
    fn save_user(&self, user: &User) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.save_user(user)
    }
    fn toggle_favorite(
        &self,
        user: &UserId,
        resource: &ResourceId,
    ) -> portal_persistence::Result<bool> {
        self.check()?;
        self.inner.toggle_favorite(user, resource)
    }
}

impl SubmissionStore for FlakyStore {
    fn add_submission(&self, submission: &Submission) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.add_submission(submission)
    }
    fn update_submission(&self, submission: &Submission) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.update_submission(submission)
    }
    fn delete_submission(&self, id: &SubmissionId) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.delete_submission(id)
    }
    fn publish_submission(
        &self,
        submission: &Submission,
        resource: &Resource,
        credits: u32,
    ) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.publish_submission(submission, resource, credits)
    }
    fn list_submissions(&self) -> portal_persistence::Result<Vec<Submission>> {
        self.inner.list_submissions()
    }
}

impl AssessmentStore for FlakyStore {
    fn record_assessment(&self, record: &AssessmentRecord) -> portal_persistence::Result<()> {
        self.check()?;
        self.inner.record_assessment(record)
    }
    fn list_assessments(&self, user: &UserId) -> portal_persistence::Result<Vec<AssessmentRecord>> {
        self.inner.list_assessments(user)
    }
}

/// Canned assistant that counts grading calls.
#[derive(Default)]
struct FakeAi {
    evaluations: AtomicUsize,
}

impl AiService for FakeAi {
    fn ask_question(&self, text: &str) -> portal_ai::Result<String> {
        Ok(format!("You asked: {text}"))
    }

    fn generate_questions(
        &self,
        subject: &str,
        _semester: u8,
        topic: &str,
    ) -> portal_ai::Result<Vec<Question>> {
        Ok(vec![
            Question {
                number: 1,
                text: format!("Define {topic} in {subject}."),
                marks: 4,
            },
            Question {
                number: 2,
                text: format!("Give an example of {topic}."),
                marks: 6,
            },
        ])
    }

    fn evaluate(
        &self,
        questions: &[Question],
        answers: &[String],
    ) -> portal_ai::Result<Evaluation> {
        portal_ai::check_answer_count(questions, answers)?;
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        let total = portal_model::total_marks(questions);
        Ok(Evaluation::new(total - 3, total, "Mostly right")?)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn id<T: std::str::FromStr>(value: &str) -> T
where
    T::Err: std::fmt::Debug,
{
    value.parse().unwrap()
}

fn resource(rid: &str, semester: u8, kind: ResourceType) -> Resource {
    Resource {
        id: id(rid),
        title: format!("Physics {rid}"),
        college_id: id("dc"),
        subject_id: id("phy"),
        semester,
        year: 2023,
        resource_type: kind,
        pattern: Pattern::NewScheme,
        degree_level: DegreeLevel::Undergraduate,
        download_url: format!("https://files.example/{rid}.pdf"),
        size: "1 MB".to_string(),
        download_count: 0,
        created_at: None,
    }
}

fn seeded_store() -> Arc<FlakyStore> {
    let store = LibraryStore::in_memory();
    store
        .add_subject(&Subject::new(id("phy"), "Physics"))
        .unwrap();
    store
        .add_college(&College::new(id("dc"), "Doon College"))
        .unwrap();
    store
        .add_resource(&resource("r1", 3, ResourceType::Note))
        .unwrap();
    store
        .add_resource(&resource("r2", 3, ResourceType::PastPaper))
        .unwrap();
    store
        .add_resource(&resource("r3", 4, ResourceType::Note))
        .unwrap();
    store
        .save_user(&User::new(id("asha"), "Asha"))
        .unwrap();
    let mut admin = User::new(id("admin"), "Admin");
    admin.is_admin = true;
    store.save_user(&admin).unwrap();
    Arc::new(FlakyStore::new(store))
}

async fn session_for(store: &Arc<FlakyStore>, user: Option<&str>) -> Session<FlakyStore> {
    Session::open(Arc::clone(store), user.map(id::<UserId>))
        .await
        .unwrap()
}

fn draft() -> PaperDraft {
    PaperDraft {
        title: "Thermodynamics 2021".to_string(),
        subject_id: id("phy"),
        college_id: id("dc"),
        semester: 4,
        year: 2021,
        resource_type: ResourceType::PastPaper,
        pattern: Pattern::NewScheme,
        degree_level: DegreeLevel::Undergraduate,
    }
}

fn upload(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn browsing_filters_the_loaded_catalog() {
    let store = seeded_store();
    let mut session = session_for(&store, None).await;

    for line in [
        "subject phy",
        "pattern new",
        "degree ug",
        "college dc",
        "semester 3",
        "type note",
    ] {
        session.dispatch(&line.parse::<NavEvent>().unwrap()).unwrap();
    }
    assert_eq!(session.nav().view, View::List);
    let ids: Vec<String> = session.visible().iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, ["r1"]);

    session.visible();
    assert_eq!(session.filter_recomputations(), 1);
    assert_eq!(session.available_years(), [2023]);
    assert_eq!(
        portal_nav::trail_text(&session.breadcrumbs()),
        "Home > Physics"
    );
}

#[tokio::test]
async fn anonymous_users_are_sent_to_login() {
    let store = seeded_store();
    let mut session = session_for(&store, None).await;
    let outcome = session.dispatch(&NavEvent::navigate(Section::Saved)).unwrap();
    assert_eq!(outcome, Outcome::LoginRequired);
    assert!(matches!(
        session.toggle_favorite(&id("r1")),
        Err(SessionError::LoginRequired { .. })
    ));
}

#[tokio::test]
async fn download_is_counted_locally_then_persisted() {
    let store = seeded_store();
    let mut session = session_for(&store, Some("asha")).await;
    let r1: ResourceId = id("r1");

    let url = session.record_download(&r1).unwrap();
    assert_eq!(url, "https://files.example/r1.pdf");
    assert_eq!(session.catalog().resource(&r1).unwrap().download_count, 1);

    let report = session.settle().await;
    assert!(report.is_clean());
    assert_eq!(report.succeeded, 1);
    assert_eq!(session.pending_writes(), 0);
    assert_eq!(store.list_resources().unwrap()[0].download_count, 1);
}

#[tokio::test]
async fn failed_write_is_reported_and_local_change_stands() {
    let store = seeded_store();
    let mut session = session_for(&store, Some("asha")).await;
    let r3: ResourceId = id("r3");
    store.fail_writes();

    assert!(session.toggle_favorite(&r3).unwrap());
    assert_eq!(session.pending_writes(), 1);

    let report = session.settle().await;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].operation, "toggle_favorite");
    assert_eq!(session.failed_writes(), 1);

    // No rollback: the profile still lists the resource.
    assert!(session.user().unwrap().is_saved(&r3));
    session.dispatch(&NavEvent::navigate(Section::Profile)).unwrap();
    let ids: Vec<String> = session.visible().iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, ["r3"]);

    // The store never saw it.
    let stored = store.get_user(&id("asha")).unwrap().unwrap();
    assert!(!stored.is_saved(&r3));
}

#[tokio::test]
async fn admin_operations_need_an_admin() {
    let store = seeded_store();
    let mut student = session_for(&store, Some("asha")).await;
    assert!(matches!(
        student.delete_resource(&id("r1")),
        Err(SessionError::NotAuthorized { .. })
    ));
    assert!(matches!(
        student.pending_submissions().await,
        Err(SessionError::NotAuthorized { .. })
    ));
    assert_eq!(student.catalog().resources().len(), 3);
}

#[tokio::test]
async fn approval_publishes_resource_and_credits_submitter() {
    let store = seeded_store();
    let file = upload(b"%PDF-1.7 thermodynamics 2021");

    let mut student = session_for(&store, Some("asha")).await;
    let submission = student.submit_paper(draft(), file.path()).await.unwrap();
    assert!(submission.content_hash.is_some());
    assert!(student.settle().await.is_clean());

    let mut admin = session_for(&store, Some("admin")).await;
    let pending = admin.pending_submissions().await.unwrap();
    assert_eq!(pending.len(), 1);

    let published = admin
        .approve_submission(&submission.id, Some("Clear scan".to_string()))
        .await
        .unwrap();
    assert_eq!(published.title, "Thermodynamics 2021");
    assert!(admin.catalog().resource(&published.id).is_some());
    assert!(admin.settle().await.is_clean());

    let asha = store.get_user(&id("asha")).unwrap().unwrap();
    assert_eq!(asha.credits, CREDITS_PER_APPROVAL);
    assert_eq!(store.list_resources().unwrap().len(), 4);
    assert!(admin.pending_submissions().await.unwrap().is_empty());

    assert!(matches!(
        admin.approve_submission(&submission.id, None).await,
        Err(SessionError::Model(_))
    ));
}

#[tokio::test]
async fn second_review_before_settle_is_refused() {
    let store = seeded_store();
    let file = upload(b"%PDF-1.7 reviewed once");
    let mut student = session_for(&store, Some("asha")).await;
    let submission = student.submit_paper(draft(), file.path()).await.unwrap();
    assert!(student.settle().await.is_clean());

    let mut admin = session_for(&store, Some("admin")).await;
    admin.approve_submission(&submission.id, None).await.unwrap();
    assert!(matches!(
        admin.approve_submission(&submission.id, None).await,
        Err(SessionError::Model(ModelError::AlreadyReviewed(_)))
    ));
    assert!(matches!(
        admin.reject_submission(&submission.id, None).await,
        Err(SessionError::Model(ModelError::AlreadyReviewed(_)))
    ));
    assert!(admin.pending_submissions().await.unwrap().is_empty());
    assert_eq!(admin.catalog().resources().len(), 4);

    assert!(admin.settle().await.is_clean());
    assert_eq!(store.list_resources().unwrap().len(), 4);
    let asha = store.get_user(&id("asha")).unwrap().unwrap();
    assert_eq!(asha.credits, CREDITS_PER_APPROVAL);
}

#[tokio::test]
async fn own_submission_can_be_reviewed_before_settle() {
    let store = seeded_store();
    let file = upload(b"%PDF-1.7 admin upload");
    let mut admin = session_for(&store, Some("admin")).await;

    let submission = admin.submit_paper(draft(), file.path()).await.unwrap();
    let pending = admin.pending_submissions().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, submission.id);

    admin.approve_submission(&submission.id, None).await.unwrap();
    assert_eq!(admin.user().unwrap().credits, CREDITS_PER_APPROVAL);
    let report = admin.settle().await;
    assert!(report.is_clean());
    assert_eq!(report.succeeded, 2);

    let stored = store.get_user(&id("admin")).unwrap().unwrap();
    assert_eq!(stored.credits, CREDITS_PER_APPROVAL);
}

#[tokio::test]
async fn failed_approval_changes_nothing_in_the_store() {
    let store = seeded_store();
    let file = upload(b"%PDF-1.7 offline approval");
    let mut student = session_for(&store, Some("asha")).await;
    let submission = student.submit_paper(draft(), file.path()).await.unwrap();
    assert!(student.settle().await.is_clean());

    let mut admin = session_for(&store, Some("admin")).await;
    store.fail_writes();
    admin.approve_submission(&submission.id, None).await.unwrap();
    let report = admin.settle().await;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].operation, "approve_submission");

    assert!(store.list_submissions().unwrap()[0].is_pending());
    assert_eq!(store.list_resources().unwrap().len(), 3);
    assert_eq!(store.get_user(&id("asha")).unwrap().unwrap().credits, 0);
}

#[tokio::test]
async fn crashed_write_is_reported_as_a_task_failure() {
    let store = seeded_store();
    let mut session = session_for(&store, Some("asha")).await;
    store.crash_writes();

    session.record_download(&id("r1")).unwrap();
    let report = session.settle().await;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].operation, "record_download");
    assert!(
        report.failures[0]
            .message
            .starts_with("background task failed")
    );
    assert_eq!(session.failed_writes(), 1);
}

#[tokio::test]
async fn duplicate_upload_surfaces_in_the_report() {
    let store = seeded_store();
    let file = upload(b"same bytes");
    let mut student = session_for(&store, Some("asha")).await;

    student.submit_paper(draft(), file.path()).await.unwrap();
    student.submit_paper(draft(), file.path()).await.unwrap();
    let report = student.settle().await;

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].message.contains("already been submitted"));
}

#[tokio::test]
async fn admin_can_add_and_delete_resources() {
    let store = seeded_store();
    let mut admin = session_for(&store, Some("admin")).await;

    admin
        .add_resource(resource("r9", 1, ResourceType::Syllabus))
        .unwrap();
    assert!(matches!(
        admin.add_resource(resource("r9", 1, ResourceType::Syllabus)),
        Err(SessionError::DuplicateResource(_))
    ));
    let imported = admin
        .import_resources(vec![
            resource("r9", 1, ResourceType::Syllabus),
            resource("r10", 2, ResourceType::Note),
        ])
        .unwrap();
    assert_eq!(imported, 1);

    admin.delete_resource(&id("r1")).unwrap();
    assert!(admin.settle().await.is_clean());

    let stored: Vec<String> = store
        .list_resources()
        .unwrap()
        .into_iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(stored, ["r2", "r3", "r9", "r10"]);
}

#[tokio::test]
async fn admin_can_move_downloads_and_purge_submissions() {
    let store = seeded_store();
    let file = upload(b"purge me");
    let mut student = session_for(&store, Some("asha")).await;
    let submission = student.submit_paper(draft(), file.path()).await.unwrap();
    assert!(student.settle().await.is_clean());

    let mut admin = session_for(&store, Some("admin")).await;
    admin
        .set_download_url(&id("r1"), " https://mirror.example/r1.pdf ")
        .unwrap();
    assert_eq!(
        admin.record_download(&id("r1")).unwrap(),
        "https://mirror.example/r1.pdf"
    );
    assert!(matches!(
        admin.set_download_url(&id("r1"), "  "),
        Err(SessionError::InvalidInput(_))
    ));
    admin.delete_submission(&submission.id).await.unwrap();
    assert!(admin.settle().await.is_clean());

    assert!(store.list_submissions().unwrap().is_empty());
    let r1 = store
        .list_resources()
        .unwrap()
        .into_iter()
        .find(|r| r.id.as_str() == "r1")
        .unwrap();
    assert_eq!(r1.download_url, "https://mirror.example/r1.pdf");
    assert_eq!(r1.download_count, 1);
}

#[tokio::test]
async fn writes_land_in_dispatch_order() {
    let store = seeded_store();
    let mut admin = session_for(&store, Some("admin")).await;

    admin
        .add_resource(resource("r7", 2, ResourceType::Note))
        .unwrap();
    admin.delete_resource(&id("r7")).unwrap();
    admin
        .add_resource(resource("r8", 2, ResourceType::Note))
        .unwrap();

    assert!(admin.settle().await.is_clean());
    let stored: Vec<String> = store
        .list_resources()
        .unwrap()
        .into_iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(stored, ["r1", "r2", "r3", "r8"]);
}

#[tokio::test]
async fn assessment_is_graded_and_recorded() {
    let store = seeded_store();
    let ai = Arc::new(FakeAi::default());
    let mut session = session_for(&store, Some("asha"))
        .await
        .with_ai(Arc::clone(&ai) as Arc<dyn AiService>);

    let record = session
        .take_assessment(&id::<SubjectId>("phy"), 3, "entropy", |assessment| {
            assert_eq!(assessment.subject_name, "Physics");
            assert_eq!(assessment.total_marks(), 10);
            vec!["a".to_string(), "b".to_string()]
        })
        .await
        .unwrap();
    assert_eq!((record.score, record.total), (7, 10));

    // Visible before the write lands.
    assert_eq!(session.assessment_history().await.unwrap().len(), 1);
    assert!(session.settle().await.is_clean());
    assert_eq!(session.assessment_history().await.unwrap().len(), 1);
    assert_eq!(store.list_assessments(&id("asha")).unwrap().len(), 1);

    let assessment = session
        .generate_assessment(&id("phy"), 3, "entropy")
        .await
        .unwrap();
    assert!(matches!(
        session
            .submit_assessment(&assessment, vec!["only one".to_string()])
            .await,
        Err(SessionError::Ai(AiError::AnswerCountMismatch { .. }))
    ));
    assert_eq!(ai.evaluations.load(Ordering::SeqCst), 1);

    let reply = session.ask("What is entropy?").await.unwrap();
    assert_eq!(reply, "You asked: What is entropy?");
}

#[tokio::test]
async fn missing_assistant_is_reported() {
    let store = seeded_store();
    let session = session_for(&store, Some("asha")).await;
    assert!(matches!(
        session.ask("hello").await,
        Err(SessionError::AiUnavailable)
    ));
}

#[tokio::test]
async fn unknown_user_cannot_open_a_session() {
    let store = seeded_store();
    let result = Session::open(Arc::clone(&store), Some(id::<UserId>("ghost"))).await;
    assert!(matches!(result, Err(SessionError::UnknownUser(_))));
}
