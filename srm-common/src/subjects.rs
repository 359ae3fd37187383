//! Fixed subject catalog
//!
//! Subjects are not a dynamic table: every class assignment refers to one of
//! these ids, stored as the `subject_id` text column of `class_subjects`.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A subject that can be assigned to a teacher within a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Hindi,
    English,
    Mathematics,
    Science,
    SocialScience,
    Physics,
    Chemistry,
    Biology,
    ComputerScience,
    PhysicalEducation,
}

impl Subject {
    /// Every subject in catalog order
    pub const ALL: [Subject; 10] = [
        Subject::Hindi,
        Subject::English,
        Subject::Mathematics,
        Subject::Science,
        Subject::SocialScience,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::ComputerScience,
        Subject::PhysicalEducation,
    ];

    /// Stable identifier used on the wire and in storage
    pub fn id(self) -> &'static str {
        match self {
            Subject::Hindi => "hindi",
            Subject::English => "english",
            Subject::Mathematics => "mathematics",
            Subject::Science => "science",
            Subject::SocialScience => "social_science",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::Biology => "biology",
            Subject::ComputerScience => "computer_science",
            Subject::PhysicalEducation => "physical_education",
        }
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Subject::Hindi => "Hindi",
            Subject::English => "English",
            Subject::Mathematics => "Mathematics",
            Subject::Science => "Science",
            Subject::SocialScience => "Social Science",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::ComputerScience => "Computer Science",
            Subject::PhysicalEducation => "Physical Education",
        }
    }

    pub fn from_id(id: &str) -> Option<Subject> {
        Subject::ALL.into_iter().find(|s| s.id() == id)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Subject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::from_id(s).ok_or_else(|| Error::Validation(format!("Unknown subject '{}'", s)))
    }
}

/// Catalog entry as exposed to clients
#[derive(Debug, Clone, Serialize)]
pub struct SubjectInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// Full catalog as `{id, name}` pairs
pub fn catalog() -> Vec<SubjectInfo> {
    Subject::ALL
        .iter()
        .map(|s| SubjectInfo {
            id: s.id(),
            name: s.display_name(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_from_str() {
        for subject in Subject::ALL {
            assert_eq!(subject.id().parse::<Subject>().unwrap(), subject);
        }
    }

    #[test]
    fn test_serde_uses_catalog_ids() {
        let json = serde_json::to_string(&Subject::SocialScience).unwrap();
        assert_eq!(json, "\"social_science\"");

        let parsed: Subject = serde_json::from_str("\"computer_science\"").unwrap();
        assert_eq!(parsed, Subject::ComputerScience);
    }

    #[test]
    fn test_unknown_subject_is_validation_error() {
        let err = "astrology".parse::<Subject>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("astrology"));
    }

    #[test]
    fn test_catalog_has_unique_ids() {
        let entries = catalog();
        assert_eq!(entries.len(), 10);
        let mut ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }
}
