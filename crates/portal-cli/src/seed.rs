//! Built-in reference data written by `portal init`.

use anyhow::{Context, Result};
use portal_model::{College, CollegeId, Subject, SubjectId, User, UserId};
use portal_persistence::{ResourceStore, UserStore};
use tracing::info;

const SUBJECTS: [(&str, &str, &str); 8] = [
    ("phy", "Physics", "atom"),
    ("chem", "Chemistry", "flask-conical"),
    ("math", "Mathematics", "sigma"),
    ("cs", "Computer Science", "cpu"),
    ("bot", "Botany", "leaf"),
    ("zoo", "Zoology", "bug"),
    ("eng", "English", "book"),
    ("com", "Commerce", "briefcase"),
];

const COLLEGES: [(&str, &str, &str); 4] = [
    ("dc", "Degree College", "Srinagar"),
    ("wc", "Women's College", "Srinagar"),
    ("sc", "Science College", "Jammu"),
    ("ac", "Arts College", "Anantnag"),
];

/// Id of the student account created by `init`.
pub const STUDENT_ID: &str = "student";
/// Id of the administrator account created by `init`.
pub const ADMIN_ID: &str = "admin";

pub fn reference_subjects() -> Result<Vec<Subject>> {
    SUBJECTS
        .iter()
        .map(|(id, name, icon)| {
            let mut subject = Subject::new(SubjectId::new(*id)?, *name);
            subject.icon = Some((*icon).to_string());
            Ok(subject)
        })
        .collect()
}

pub fn reference_colleges() -> Result<Vec<College>> {
    COLLEGES
        .iter()
        .map(|(id, name, city)| {
            let mut college = College::new(CollegeId::new(*id)?, *name);
            college.city = Some((*city).to_string());
            Ok(college)
        })
        .collect()
}

/// Write the reference subjects, colleges and starter accounts to `store`.
///
/// Existing entries with the same ids are overwritten.
pub fn seed_library<S>(store: &S) -> Result<()>
where
    S: ResourceStore + UserStore,
{
    let subjects = reference_subjects()?;
    for subject in &subjects {
        store
            .add_subject(subject)
            .with_context(|| format!("add subject {}", subject.id))?;
    }
    let colleges = reference_colleges()?;
    for college in &colleges {
        store
            .add_college(college)
            .with_context(|| format!("add college {}", college.id))?;
    }

    let student = User::new(UserId::new(STUDENT_ID)?, "Student");
    let mut admin = User::new(UserId::new(ADMIN_ID)?, "Administrator");
    admin.is_admin = true;
    for user in [&student, &admin] {
        store
            .save_user(user)
            .with_context(|| format!("save user {}", user.id))?;
    }

    info!(
        subjects = subjects.len(),
        colleges = colleges.len(),
        "seeded reference data"
    );
    Ok(())
}
