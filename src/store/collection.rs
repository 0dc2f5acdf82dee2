// src/store/collection.rs

use crate::models::subject::Subject;

/// Logical collections. Tests, grades and lessons are partitioned per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    StudentAccounts,
    TeacherAccounts,
    SubmittedAnswers,
    /// Test ID → course index, used to find the partition a test lives in.
    TestList,
    Tests(Subject),
    Grades(Subject),
    Lessons(Subject),
}

impl Collection {
    /// Physical collection name. `db_name` only prefixes the test index.
    pub fn name(&self, db_name: &str) -> String {
        match self {
            Collection::StudentAccounts => "Students.Accounts".to_string(),
            Collection::TeacherAccounts => "Teachers.Accounts".to_string(),
            Collection::SubmittedAnswers => "Students.SubmittedAnswers".to_string(),
            Collection::TestList => format!("{}.TestList", db_name),
            Collection::Tests(subject) => format!("{}Edu.Tests", subject),
            Collection::Grades(subject) => format!("{}Edu.Grades", subject),
            Collection::Lessons(subject) => format!("{}Edu.Lessons", subject),
        }
    }
}
