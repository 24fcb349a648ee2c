use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dto::section_dto::{
    CertificationFields, EducationFields, ProjectFields, WorkExperienceFields,
};
use crate::models::candidate::{CandidateChanges, CandidateProfile, CandidateStatus, Gender};
use crate::models::certification::Certification;
use crate::models::education::Education;
use crate::models::project::Project;
use crate::models::user::UserAccount;
use crate::models::work_experience::WorkExperience;
use crate::store::CandidateFilter;
use crate::utils::validation::{
    email_or_blank, not_blank, parse_choice, require, url_or_blank, validate_experience,
    validate_gender, validate_status, ProfileRule,
};
use crate::utils::{coerce, time};

fn default_true() -> bool {
    true
}

/// Create body for a candidate aggregate. The nested lists are only read
/// on create; `id`, `view_count` and the timestamps are ignored if sent.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCandidatePayload {
    #[serde(default, deserialize_with = "coerce::opt_i64")]
    #[validate(required(code = "required", message = "This field is required."))]
    pub user_id: Option<i64>,
    #[validate(
        required(code = "required", message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(custom(function = "email_or_blank"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[validate(custom(function = "url_or_blank"))]
    pub linkedin_profile: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub github_profile: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub portfolio_link: Option<String>,
    pub resume: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    #[validate(custom(function = "validate_experience"))]
    pub experience: Option<f64>,
    pub current_job_title: Option<String>,
    pub current_company: Option<String>,
    #[serde(default)]
    pub desired_roles: Vec<String>,
    #[serde(default)]
    pub preferred_industry_sector: Vec<String>,
    #[serde(default)]
    pub employment_type_preferences: Vec<String>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    pub desired_salary_range: Option<String>,
    #[serde(default)]
    pub willingness_to_relocate: bool,
    #[serde(default = "default_true")]
    pub is_actively_looking: bool,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub projects: Vec<ProjectFields>,
    #[serde(default)]
    #[validate(nested)]
    pub work_experiences: Vec<WorkExperienceFields>,
    #[serde(default)]
    #[validate(nested)]
    pub education: Vec<EducationFields>,
    #[serde(default)]
    #[validate(nested)]
    pub certifications: Vec<CertificationFields>,
}

/// A validated create body, split into scalar changes and nested entries.
#[derive(Debug, Clone)]
pub struct CandidateDraft {
    pub user_id: i64,
    pub name: String,
    pub changes: CandidateChanges,
    pub sections: NestedSections,
}

/// Nested entries of a create body, in write order.
#[derive(Debug, Clone, Default)]
pub struct NestedSections {
    pub projects: Vec<ProjectFields>,
    pub work_experiences: Vec<WorkExperienceFields>,
    pub education: Vec<EducationFields>,
    pub certifications: Vec<CertificationFields>,
}

impl CreateCandidatePayload {
    pub fn into_draft(self) -> Result<CandidateDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let user_id = require("user_id", self.user_id, &mut errors);
        let name = require("name", self.name, &mut errors);
        let gender = parse_choice::<Gender>(
            "gender",
            ProfileRule::InvalidGender,
            self.gender.filter(|g| !g.is_empty()),
            &mut errors,
        );
        let status = parse_choice::<CandidateStatus>(
            "status",
            ProfileRule::InvalidChoice,
            self.status,
            &mut errors,
        );
        let (Some(user_id), Some(name), true) = (user_id, name, errors.is_empty()) else {
            return Err(errors);
        };

        let changes = CandidateChanges {
            user_id: Some(user_id),
            name: Some(name.clone()),
            email: self.email,
            phone: self.phone,
            gender,
            date_of_birth: self.date_of_birth,
            linkedin_profile: self.linkedin_profile,
            github_profile: self.github_profile,
            portfolio_link: self.portfolio_link,
            resume: self.resume,
            skills: Some(self.skills),
            experience: Some(self.experience.unwrap_or(0.0)),
            current_job_title: self.current_job_title,
            current_company: self.current_company,
            desired_roles: Some(self.desired_roles),
            preferred_industry_sector: Some(self.preferred_industry_sector),
            employment_type_preferences: Some(self.employment_type_preferences),
            preferred_locations: Some(self.preferred_locations),
            desired_salary_range: self.desired_salary_range,
            willingness_to_relocate: Some(self.willingness_to_relocate),
            is_actively_looking: Some(self.is_actively_looking),
            status,
            source: self.source,
        };
        let sections = NestedSections {
            projects: self.projects,
            work_experiences: self.work_experiences,
            education: self.education,
            certifications: self.certifications,
        };
        Ok(CandidateDraft {
            user_id,
            name,
            changes,
            sections,
        })
    }
}

/// Partial update body. Only scalar fields are read; nested collection
/// keys are dropped during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCandidatePayload {
    #[serde(default, deserialize_with = "coerce::opt_i64")]
    pub user_id: Option<i64>,
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "email_or_blank"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[validate(custom(function = "url_or_blank"))]
    pub linkedin_profile: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub github_profile: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub portfolio_link: Option<String>,
    pub resume: Option<String>,
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    #[validate(custom(function = "validate_experience"))]
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
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    pub source: Option<String>,
}

impl UpdateCandidatePayload {
    pub fn into_changes(self) -> Result<CandidateChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let gender = parse_choice::<Gender>(
            "gender",
            ProfileRule::InvalidGender,
            self.gender.filter(|g| !g.is_empty()),
            &mut errors,
        );
        let status = parse_choice::<CandidateStatus>(
            "status",
            ProfileRule::InvalidChoice,
            self.status,
            &mut errors,
        );
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CandidateChanges {
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            gender,
            date_of_birth: self.date_of_birth,
            linkedin_profile: self.linkedin_profile,
            github_profile: self.github_profile,
            portfolio_link: self.portfolio_link,
            resume: self.resume,
            skills: self.skills,
            experience: self.experience,
            current_job_title: self.current_job_title,
            current_company: self.current_company,
            desired_roles: self.desired_roles,
            preferred_industry_sector: self.preferred_industry_sector,
            employment_type_preferences: self.employment_type_preferences,
            preferred_locations: self.preferred_locations,
            desired_salary_range: self.desired_salary_range,
            willingness_to_relocate: self.willingness_to_relocate,
            is_actively_looking: self.is_actively_looking,
            status,
            source: self.source,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateListQuery {
    pub status: Option<String>,
    pub user_id: Option<i64>,
}

impl CandidateListQuery {
    pub fn into_filter(self) -> Result<CandidateFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let status = parse_choice::<CandidateStatus>(
            "status",
            ProfileRule::InvalidChoice,
            self.status.filter(|s| !s.is_empty()),
            &mut errors,
        );
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(CandidateFilter {
            status,
            user_id: self.user_id,
        })
    }
}

/// Outbound candidate. `user_id` is write-only and never serialized; the
/// linked account is embedded as `user` when the directory knows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResponse {
    pub id: Uuid,
    pub user: Option<UserAccount>,
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
    pub education: Vec<Education>,
    pub work_experiences: Vec<WorkExperience>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
}

impl CandidateResponse {
    pub fn new(value: CandidateProfile, user: Option<UserAccount>) -> Self {
        let candidate = value.candidate;
        Self {
            id: candidate.id,
            user,
            name: candidate.name,
            email: candidate.email,
            phone: candidate.phone,
            gender: candidate.gender,
            date_of_birth: candidate.date_of_birth,
            linkedin_profile: candidate.linkedin_profile,
            github_profile: candidate.github_profile,
            portfolio_link: candidate.portfolio_link,
            resume: candidate.resume,
            skills: candidate.skills,
            experience: candidate.experience,
            current_job_title: candidate.current_job_title,
            current_company: candidate.current_company,
            desired_roles: candidate.desired_roles,
            preferred_industry_sector: candidate.preferred_industry_sector,
            employment_type_preferences: candidate.employment_type_preferences,
            preferred_locations: candidate.preferred_locations,
            desired_salary_range: candidate.desired_salary_range,
            willingness_to_relocate: candidate.willingness_to_relocate,
            is_actively_looking: candidate.is_actively_looking,
            status: candidate.status,
            source: candidate.source,
            view_count: candidate.view_count,
            created_at: candidate.created_at,
            updated_at: candidate.updated_at,
            education: value.education,
            work_experiences: value.work_experiences,
            projects: value.projects,
            certifications: value.certifications,
        }
    }
}
