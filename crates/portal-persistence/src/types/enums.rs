//! Enum snapshots.

use rkyv::{Archive, Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub enum ResourceTypeSnapshot {
    PastPaper,
    Note,
    Syllabus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub enum PatternSnapshot {
    OldScheme,
    NewScheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub enum DegreeSnapshot {
    Undergraduate,
    Postgraduate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq))]
pub enum StatusSnapshot {
    #[default]
    Pending,
    Approved,
    Rejected,
}
