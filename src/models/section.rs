use std::fmt;

use uuid::Uuid;

use super::certification::Certification;
use super::education::Education;
use super::project::Project;
use super::work_experience::WorkExperience;

/// The four collections a candidate owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Project,
    WorkExperience,
    Education,
    Certification,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Project,
        SectionKind::WorkExperience,
        SectionKind::Education,
        SectionKind::Certification,
    ];

    /// URL segment of the collection.
    pub fn collection(&self) -> &'static str {
        match self {
            SectionKind::Project => "projects",
            SectionKind::WorkExperience => "work-experiences",
            SectionKind::Education => "education",
            SectionKind::Certification => "certifications",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Project => "Project",
            SectionKind::WorkExperience => "Work experience",
            SectionKind::Education => "Education",
            SectionKind::Certification => "Certification",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Any child record, as the store sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionRecord {
    Project(Project),
    WorkExperience(WorkExperience),
    Education(Education),
    Certification(Certification),
}

impl SectionRecord {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionRecord::Project(_) => SectionKind::Project,
            SectionRecord::WorkExperience(_) => SectionKind::WorkExperience,
            SectionRecord::Education(_) => SectionKind::Education,
            SectionRecord::Certification(_) => SectionKind::Certification,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            SectionRecord::Project(p) => p.id,
            SectionRecord::WorkExperience(w) => w.id,
            SectionRecord::Education(e) => e.id,
            SectionRecord::Certification(c) => c.id,
        }
    }

    pub fn candidate_id(&self) -> Uuid {
        match self {
            SectionRecord::Project(p) => p.candidate_id,
            SectionRecord::WorkExperience(w) => w.candidate_id,
            SectionRecord::Education(e) => e.candidate_id,
            SectionRecord::Certification(c) => c.candidate_id,
        }
    }
}

/// Typed access to one child collection.
pub trait Section: Clone + Send + Sync + 'static {
    const KIND: SectionKind;

    fn id(&self) -> Uuid;
    fn candidate_id(&self) -> Uuid;
    fn into_record(self) -> SectionRecord;
    fn from_record(record: SectionRecord) -> Option<Self>;
}

macro_rules! impl_section {
    ($ty:ident, $kind:ident) => {
        impl Section for $ty {
            const KIND: SectionKind = SectionKind::$kind;

            fn id(&self) -> Uuid {
                self.id
            }

            fn candidate_id(&self) -> Uuid {
                self.candidate_id
            }

            fn into_record(self) -> SectionRecord {
                SectionRecord::$kind(self)
            }

            fn from_record(record: SectionRecord) -> Option<Self> {
                match record {
                    SectionRecord::$kind(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_section!(Project, Project);
impl_section!(WorkExperience, WorkExperience);
impl_section!(Education, Education);
impl_section!(Certification, Certification);
