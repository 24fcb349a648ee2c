use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::certification::Certification;
use super::education::Education;
use super::project::Project;
use super::section::SectionRecord;
use super::work_experience::WorkExperience;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid choice.")]
pub struct InvalidChoice(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub const CHOICES: [&'static str; 3] = ["M", "F", "O"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }
}

impl FromStr for Gender {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "O" => Ok(Gender::Other),
            other => Err(InvalidChoice(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Active,
    Inactive,
    Suspended,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Active => "active",
            CandidateStatus::Inactive => "inactive",
            CandidateStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for CandidateStatus {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CandidateStatus::Active),
            "inactive" => Ok(CandidateStatus::Inactive),
            "suspended" => Ok(CandidateStatus::Suspended),
            other => Err(InvalidChoice(other.to_string())),
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate document. `user_id` points at an account in the external
/// identity store and is never owned by this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub user_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub linkedin_profile: Option<String>,
    pub github_profile: Option<String>,
    pub portfolio_link: Option<String>,
    pub resume: Option<String>,
    pub skills: Vec<String>,
    pub experience: f64,
    pub current_job_title: Option<String>,
    pub current_company: Option<String>,
    pub desired_roles: Vec<String>,
    pub preferred_industry_sector: Vec<String>,
    pub employment_type_preferences: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub desired_salary_range: Option<String>,
    pub willingness_to_relocate: bool,
    pub is_actively_looking: bool,
    pub status: Option<CandidateStatus>,
    pub source: Option<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// A fresh record carrying the schema defaults.
    pub fn new(id: Uuid, user_id: i64, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            name,
            email: None,
            phone: None,
            gender: None,
            date_of_birth: None,
            linkedin_profile: None,
            github_profile: None,
            portfolio_link: None,
            resume: None,
            skills: Vec::new(),
            experience: 0.0,
            current_job_title: None,
            current_company: None,
            desired_roles: Vec::new(),
            preferred_industry_sector: Vec::new(),
            employment_type_preferences: Vec::new(),
            preferred_locations: Vec::new(),
            desired_salary_range: None,
            willingness_to_relocate: false,
            is_actively_looking: true,
            status: None,
            source: None,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Scalar field assignments; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateChanges {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub linkedin_profile: Option<String>,
    pub github_profile: Option<String>,
    pub portfolio_link: Option<String>,
    pub resume: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<f64>,
    pub current_job_title: Option<String>,
    pub current_company: Option<String>,
    pub desired_roles: Option<Vec<String>>,
    pub preferred_industry_sector: Option<Vec<String>>,
    pub employment_type_preferences: Option<Vec<String>>,
    pub preferred_locations: Option<Vec<String>>,
    pub desired_salary_range: Option<String>,
    pub willingness_to_relocate: Option<bool>,
    pub is_actively_looking: Option<bool>,
    pub status: Option<CandidateStatus>,
    pub source: Option<String>,
}

impl CandidateChanges {
    pub fn apply(self, candidate: &mut Candidate) {
        if let Some(user_id) = self.user_id {
            candidate.user_id = user_id;
        }
        if let Some(name) = self.name {
            candidate.name = name;
        }
        if let Some(experience) = self.experience {
            candidate.experience = experience;
        }
        if let Some(flag) = self.willingness_to_relocate {
            candidate.willingness_to_relocate = flag;
        }
        if let Some(flag) = self.is_actively_looking {
            candidate.is_actively_looking = flag;
        }

        if let Some(skills) = self.skills {
            candidate.skills = skills;
        }
        if let Some(roles) = self.desired_roles {
            candidate.desired_roles = roles;
        }
        if let Some(sectors) = self.preferred_industry_sector {
            candidate.preferred_industry_sector = sectors;
        }
        if let Some(types) = self.employment_type_preferences {
            candidate.employment_type_preferences = types;
        }
        if let Some(locations) = self.preferred_locations {
            candidate.preferred_locations = locations;
        }

        assign(&mut candidate.email, self.email);
        assign(&mut candidate.phone, self.phone);
        assign(&mut candidate.gender, self.gender);
        assign(&mut candidate.date_of_birth, self.date_of_birth);
        assign(&mut candidate.linkedin_profile, self.linkedin_profile);
        assign(&mut candidate.github_profile, self.github_profile);
        assign(&mut candidate.portfolio_link, self.portfolio_link);
        assign(&mut candidate.resume, self.resume);
        assign(&mut candidate.current_job_title, self.current_job_title);
        assign(&mut candidate.current_company, self.current_company);
        assign(&mut candidate.desired_salary_range, self.desired_salary_range);
        assign(&mut candidate.status, self.status);
        assign(&mut candidate.source, self.source);
    }
}

fn assign<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// A candidate together with the four collections that reference it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    pub candidate: Candidate,
    pub projects: Vec<Project>,
    pub work_experiences: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
}

impl CandidateProfile {
    pub fn new(candidate: Candidate) -> Self {
        Self {
            candidate,
            projects: Vec::new(),
            work_experiences: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
        }
    }

    pub fn push(&mut self, record: SectionRecord) {
        match record {
            SectionRecord::Project(p) => self.projects.push(p),
            SectionRecord::WorkExperience(w) => self.work_experiences.push(w),
            SectionRecord::Education(e) => self.education.push(e),
            SectionRecord::Certification(c) => self.certifications.push(c),
        }
    }

    /// Children in write order: projects, work experiences, education,
    /// certifications, each list in its own order.
    pub fn section_records(&self) -> Vec<SectionRecord> {
        self.projects
            .iter()
            .cloned()
            .map(SectionRecord::Project)
            .chain(self.work_experiences.iter().cloned().map(SectionRecord::WorkExperience))
            .chain(self.education.iter().cloned().map(SectionRecord::Education))
            .chain(self.certifications.iter().cloned().map(SectionRecord::Certification))
            .collect()
    }

    pub fn section_count(&self) -> usize {
        self.projects.len()
            + self.work_experiences.len()
            + self.education.len()
            + self.certifications.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_only_touch_supplied_fields() {
        let now = Utc::now();
        let mut candidate = Candidate::new(Uuid::new_v4(), 7, "Jane".into(), now);
        candidate.email = Some("jane@example.com".into());
        candidate.skills = vec!["rust".into()];

        CandidateChanges {
            current_company: Some("Acme".into()),
            experience: Some(3.0),
            ..Default::default()
        }
        .apply(&mut candidate);

        assert_eq!(candidate.name, "Jane");
        assert_eq!(candidate.email.as_deref(), Some("jane@example.com"));
        assert_eq!(candidate.skills, vec!["rust".to_string()]);
        assert_eq!(candidate.current_company.as_deref(), Some("Acme"));
        assert_eq!(candidate.experience, 3.0);
        assert!(candidate.is_actively_looking);
    }

    #[test]
    fn choices_round_trip_through_their_wire_names() {
        for choice in Gender::CHOICES {
            assert_eq!(choice.parse::<Gender>().map(|g| g.as_str()), Ok(choice));
        }
        assert_eq!(
            serde_json::to_value(CandidateStatus::Suspended).ok(),
            Some(serde_json::json!("suspended"))
        );
        assert!("x".parse::<CandidateStatus>().is_err());
    }
}
