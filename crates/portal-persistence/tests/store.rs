//! LibraryStore behaviour, in memory and on disk.

use std::fs;
use std::io::Write;

use chrono::Utc;
use portal_model::{
    AssessmentRecord, College, CollegeId, DegreeLevel, Evaluation, Pattern, Resource, ResourceId,
    ResourceType, Subject, SubjectId, Submission, SubmissionId, SubmissionStatus, User, UserId,
};
use portal_persistence::{
    AssessmentStore, LibraryStore, PersistenceError, ResourceStore, SubmissionStore, UserStore,
    compute_file_hash, load_library,
};
use tempfile::{NamedTempFile, tempdir};

fn resource(id: &str) -> Resource {
    Resource {
        id: ResourceId::new(id).unwrap(),
        title: format!("Paper {id}"),
        college_id: CollegeId::new("dc").unwrap(),
        subject_id: SubjectId::new("phy").unwrap(),
        semester: 2,
        year: 2022,
        resource_type: ResourceType::PastPaper,
        pattern: Pattern::OldScheme,
        degree_level: DegreeLevel::Undergraduate,
        download_url: format!("https://files.example/{id}.pdf"),
        size: "800 KB".to_string(),
        download_count: 0,
        created_at: Some(Utc::now()),
    }
}

fn submission(id: &str, hash: Option<&str>) -> Submission {
    Submission {
        id: SubmissionId::new(id).unwrap(),
        user_id: UserId::new("asha").unwrap(),
        title: "Thermodynamics 2021".to_string(),
        subject_id: SubjectId::new("phy").unwrap(),
        college_id: CollegeId::new("dc").unwrap(),
        semester: 4,
        year: 2021,
        resource_type: ResourceType::PastPaper,
        pattern: Pattern::NewScheme,
        degree_level: DegreeLevel::Undergraduate,
        file_url: "file:///tmp/thermo.pdf".to_string(),
        size: "1 MB".to_string(),
        content_hash: hash.map(str::to_string),
        status: SubmissionStatus::Pending,
        submitted_at: Utc::now(),
        review_note: None,
    }
}

#[test]
fn resources_keep_catalog_order_and_reject_duplicates() {
    let store = LibraryStore::in_memory();
    for id in ["r2", "r1", "r3"] {
        store.add_resource(&resource(id)).unwrap();
    }
    let ids: Vec<String> = store
        .list_resources()
        .unwrap()
        .into_iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(ids, ["r2", "r1", "r3"]);

    assert!(matches!(
        store.add_resource(&resource("r1")),
        Err(PersistenceError::AlreadyExists { kind: "resource", .. })
    ));
}

#[test]
fn downloads_and_urls_update_in_place() {
    let store = LibraryStore::in_memory();
    let id = ResourceId::new("r1").unwrap();
    store.add_resource(&resource("r1")).unwrap();

    assert_eq!(store.record_download(&id).unwrap(), 1);
    assert_eq!(store.record_download(&id).unwrap(), 2);
    store.set_download_url(&id, "https://mirror.example/r1.pdf").unwrap();

    let stored = &store.list_resources().unwrap()[0];
    assert_eq!(stored.download_count, 2);
    assert_eq!(stored.download_url, "https://mirror.example/r1.pdf");

    let missing = ResourceId::new("nope").unwrap();
    assert!(matches!(
        store.record_download(&missing),
        Err(PersistenceError::NotFound { kind: "resource", .. })
    ));
}

#[test]
fn deleting_a_resource_unsaves_it() {
    let store = LibraryStore::in_memory();
    let user_id = UserId::new("asha").unwrap();
    let id = ResourceId::new("r1").unwrap();
    store.add_resource(&resource("r1")).unwrap();
    store.save_user(&User::new(user_id.clone(), "Asha")).unwrap();

    assert!(store.toggle_favorite(&user_id, &id).unwrap());
    store.delete_resource(&id).unwrap();

    let user = store.get_user(&user_id).unwrap().unwrap();
    assert!(!user.is_saved(&id));
    assert!(store.list_resources().unwrap().is_empty());
}

#[test]
fn toggle_favorite_flips_and_needs_a_user() {
    let store = LibraryStore::in_memory();
    let user_id = UserId::new("asha").unwrap();
    let id = ResourceId::new("r1").unwrap();

    assert!(matches!(
        store.toggle_favorite(&user_id, &id),
        Err(PersistenceError::NotFound { kind: "user", .. })
    ));

    store.save_user(&User::new(user_id.clone(), "Asha")).unwrap();
    assert!(store.toggle_favorite(&user_id, &id).unwrap());
    assert!(!store.toggle_favorite(&user_id, &id).unwrap());
    assert_eq!(store.get_user(&UserId::new("ghost").unwrap()).unwrap(), None);
}

#[test]
fn reference_data_is_upserted() {
    let store = LibraryStore::in_memory();
    let phy = SubjectId::new("phy").unwrap();
    store.add_subject(&Subject::new(phy.clone(), "Physic")).unwrap();
    store.add_subject(&Subject::new(phy, "Physics")).unwrap();
    store
        .add_college(&College::new(CollegeId::new("dc").unwrap(), "Doon College"))
        .unwrap();

    let subjects = store.list_subjects().unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].name, "Physics");
    assert_eq!(store.list_colleges().unwrap().len(), 1);
}

#[test]
fn duplicate_file_content_is_rejected() {
    let mut upload = NamedTempFile::new().unwrap();
    upload.write_all(b"%PDF-1.7 thermodynamics").unwrap();
    upload.flush().unwrap();
    let hash = compute_file_hash(upload.path()).unwrap();

    let store = LibraryStore::in_memory();
    store.add_submission(&submission("s1", Some(&hash))).unwrap();
    let err = store
        .add_submission(&submission("s2", Some(&hash)))
        .unwrap_err();
    assert!(matches!(
        &err,
        PersistenceError::DuplicateSubmission { existing, .. } if existing == "s1"
    ));
    assert!(err.suggestion().is_some());

    // Submissions without a hash are never considered duplicates.
    store.add_submission(&submission("s3", None)).unwrap();
    store.add_submission(&submission("s4", None)).unwrap();
    assert_eq!(store.list_submissions().unwrap().len(), 3);
}

#[test]
fn submissions_update_and_delete() {
    let store = LibraryStore::in_memory();
    let mut pending = submission("s1", None);
    store.add_submission(&pending).unwrap();

    pending.approve(Some("clear scan".to_string())).unwrap();
    store.update_submission(&pending).unwrap();
    assert_eq!(
        store.list_submissions().unwrap()[0].status,
        SubmissionStatus::Approved
    );

    store.delete_submission(&pending.id).unwrap();
    assert!(store.list_submissions().unwrap().is_empty());
    assert!(matches!(
        store.update_submission(&pending),
        Err(PersistenceError::NotFound { kind: "submission", .. })
    ));
}

#[test]
fn publishing_is_all_or_nothing() {
    let store = LibraryStore::in_memory();
    store.save_user(&User::new(UserId::new("asha").unwrap(), "Asha")).unwrap();
    store.add_resource(&resource("r1")).unwrap();
    let mut approved = submission("s1", None);
    store.add_submission(&approved).unwrap();
    approved.approve(None).unwrap();

    // The resource id is taken, so nothing changes.
    let clash = approved.to_resource(ResourceId::new("r1").unwrap(), Utc::now());
    assert!(matches!(
        store.publish_submission(&approved, &clash, 10),
        Err(PersistenceError::AlreadyExists { kind: "resource", .. })
    ));
    assert_eq!(
        store.list_submissions().unwrap()[0].status,
        SubmissionStatus::Pending
    );
    assert_eq!(store.list_resources().unwrap().len(), 1);

    let published = approved.to_resource(ResourceId::new("r2").unwrap(), Utc::now());
    store.publish_submission(&approved, &published, 10).unwrap();
    assert_eq!(
        store.list_submissions().unwrap()[0].status,
        SubmissionStatus::Approved
    );
    assert_eq!(store.list_resources().unwrap().len(), 2);
    let asha = store.get_user(&UserId::new("asha").unwrap()).unwrap().unwrap();
    assert_eq!(asha.credits, 10);
}

#[test]
fn publishing_needs_a_known_submitter() {
    let store = LibraryStore::in_memory();
    let mut approved = submission("s1", None);
    store.add_submission(&approved).unwrap();
    approved.approve(None).unwrap();

    let resource = approved.to_resource(ResourceId::new("r1").unwrap(), Utc::now());
    assert!(matches!(
        store.publish_submission(&approved, &resource, 10),
        Err(PersistenceError::NotFound { kind: "user", .. })
    ));
    assert!(store.list_resources().unwrap().is_empty());
}

#[test]
fn assessments_are_listed_per_user() {
    let store = LibraryStore::in_memory();
    let asha = UserId::new("asha").unwrap();
    let ravi = UserId::new("ravi").unwrap();
    let evaluation = Evaluation::new(7, 10, "Good grasp of entropy").unwrap();
    let subject = SubjectId::new("phy").unwrap();

    for user in [&asha, &ravi, &asha] {
        let record = AssessmentRecord::from_evaluation(
            user.clone(),
            subject.clone(),
            3,
            "Entropy",
            &evaluation,
        );
        store.record_assessment(&record).unwrap();
    }

    assert_eq!(store.list_assessments(&asha).unwrap().len(), 2);
    assert_eq!(store.list_assessments(&ravi).unwrap().len(), 1);
}

#[test]
fn file_backed_store_writes_through() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.spl");

    let store = LibraryStore::open(&path).unwrap();
    assert!(!path.exists());
    store.add_resource(&resource("r1")).unwrap();
    assert!(path.exists());
    assert_eq!(load_library(&path).unwrap().resources.len(), 1);

    let reopened = LibraryStore::open(&path).unwrap();
    assert_eq!(reopened.list_resources().unwrap(), store.list_resources().unwrap());
}

#[test]
fn failed_save_leaves_state_unchanged() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();

    // The parent "directory" is a file, so every save fails.
    let store = LibraryStore::from_library(Default::default(), Some(blocker.join("library.spl")));
    assert!(store.add_resource(&resource("r1")).is_err());
    assert!(store.list_resources().unwrap().is_empty());
}

#[tokio::test]
async fn open_async_reads_existing_library() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.spl");
    LibraryStore::create(&path)
        .unwrap()
        .add_resource(&resource("r1"))
        .unwrap();

    let store = LibraryStore::open_async(path).await.unwrap();
    assert_eq!(store.list_resources().unwrap().len(), 1);
}
