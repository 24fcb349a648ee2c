use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::certification::Certification;
use crate::models::education::Education;
use crate::models::project::Project;
use crate::models::section::Section;
use crate::models::work_experience::WorkExperience;
use crate::utils::validation::{not_blank, url_or_blank};
use crate::utils::{coerce, time};

/// Write-side shape of a child collection.
pub trait SectionWrite: Section + Serialize {
    type Fields: DeserializeOwned + Validate + Send + 'static;
    type Patch: DeserializeOwned + Validate + Send + 'static;

    fn build(id: Uuid, candidate_id: Uuid, fields: Self::Fields) -> Self;
    fn patch(&mut self, patch: Self::Patch);

    /// Full replacement; identity and parent are kept.
    fn replace(&mut self, fields: Self::Fields) {
        *self = Self::build(self.id(), self.candidate_id(), fields);
    }
}

/// Standalone create body: the parent id plus the section's own fields.
/// A missing `candidate_id` is reported alongside the field errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSectionPayload<F> {
    pub candidate_id: Option<Uuid>,
    #[serde(flatten)]
    pub fields: F,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionListQuery {
    pub candidate: Option<Uuid>,
}

fn replace_if_some<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectFields {
    #[validate(
        required(code = "required", message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub role_in_project: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub github_link: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub live_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProjectPatch {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub role_in_project: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub github_link: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub live_link: Option<String>,
}

impl SectionWrite for Project {
    type Fields = ProjectFields;
    type Patch = ProjectPatch;

    fn build(id: Uuid, candidate_id: Uuid, fields: ProjectFields) -> Self {
        Self {
            id,
            candidate_id,
            title: fields.title.unwrap_or_default(),
            description: fields.description,
            tech_stack: fields.tech_stack,
            role_in_project: fields.role_in_project,
            github_link: fields.github_link,
            live_link: fields.live_link,
        }
    }

    fn patch(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(stack) = patch.tech_stack {
            self.tech_stack = stack;
        }
        replace_if_some(&mut self.description, patch.description);
        replace_if_some(&mut self.role_in_project, patch.role_in_project);
        replace_if_some(&mut self.github_link, patch.github_link);
        replace_if_some(&mut self.live_link, patch.live_link);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WorkExperienceFields {
    #[validate(
        required(code = "required", message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub company_name: Option<String>,
    #[validate(
        required(code = "required", message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub role_designation: Option<String>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub technologies_used: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WorkExperiencePatch {
    #[validate(custom(function = "not_blank"))]
    pub company_name: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub role_designation: Option<String>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    pub is_current: Option<bool>,
    pub responsibilities: Option<Vec<String>>,
    pub technologies_used: Option<Vec<String>>,
}

impl SectionWrite for WorkExperience {
    type Fields = WorkExperienceFields;
    type Patch = WorkExperiencePatch;

    fn build(id: Uuid, candidate_id: Uuid, fields: WorkExperienceFields) -> Self {
        Self {
            id,
            candidate_id,
            company_name: fields.company_name.unwrap_or_default(),
            role_designation: fields.role_designation.unwrap_or_default(),
            start_date: fields.start_date,
            end_date: fields.end_date,
            is_current: fields.is_current,
            responsibilities: fields.responsibilities,
            technologies_used: fields.technologies_used,
        }
    }

    fn patch(&mut self, patch: WorkExperiencePatch) {
        if let Some(company) = patch.company_name {
            self.company_name = company;
        }
        if let Some(role) = patch.role_designation {
            self.role_designation = role;
        }
        if let Some(current) = patch.is_current {
            self.is_current = current;
        }
        if let Some(items) = patch.responsibilities {
            self.responsibilities = items;
        }
        if let Some(items) = patch.technologies_used {
            self.technologies_used = items;
        }
        replace_if_some(&mut self.start_date, patch.start_date);
        replace_if_some(&mut self.end_date, patch.end_date);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EducationFields {
    #[validate(
        required(code = "required", message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub degree: Option<String>,
    #[validate(
        required(code = "required", message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub activities_achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EducationPatch {
    #[validate(custom(function = "not_blank"))]
    pub degree: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub gpa: Option<f64>,
    pub activities_achievements: Option<Vec<String>>,
}

impl SectionWrite for Education {
    type Fields = EducationFields;
    type Patch = EducationPatch;

    fn build(id: Uuid, candidate_id: Uuid, fields: EducationFields) -> Self {
        Self {
            id,
            candidate_id,
            degree: fields.degree.unwrap_or_default(),
            institution: fields.institution.unwrap_or_default(),
            field_of_study: fields.field_of_study,
            start_date: fields.start_date,
            end_date: fields.end_date,
            gpa: fields.gpa,
            activities_achievements: fields.activities_achievements,
        }
    }

    fn patch(&mut self, patch: EducationPatch) {
        if let Some(degree) = patch.degree {
            self.degree = degree;
        }
        if let Some(institution) = patch.institution {
            self.institution = institution;
        }
        if let Some(items) = patch.activities_achievements {
            self.activities_achievements = items;
        }
        replace_if_some(&mut self.field_of_study, patch.field_of_study);
        replace_if_some(&mut self.start_date, patch.start_date);
        replace_if_some(&mut self.end_date, patch.end_date);
        replace_if_some(&mut self.gpa, patch.gpa);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CertificationFields {
    #[validate(
        required(code = "required", message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    pub issuing_organization: Option<String>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub credential_id: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub credential_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CertificationPatch {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    pub issuing_organization: Option<String>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "time::opt_datetime")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub credential_id: Option<String>,
    #[validate(custom(function = "url_or_blank"))]
    pub credential_url: Option<String>,
}

impl SectionWrite for Certification {
    type Fields = CertificationFields;
    type Patch = CertificationPatch;

    fn build(id: Uuid, candidate_id: Uuid, fields: CertificationFields) -> Self {
        Self {
            id,
            candidate_id,
            name: fields.name.unwrap_or_default(),
            issuing_organization: fields.issuing_organization,
            issue_date: fields.issue_date,
            expiration_date: fields.expiration_date,
            credential_id: fields.credential_id,
            credential_url: fields.credential_url,
        }
    }

    fn patch(&mut self, patch: CertificationPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        replace_if_some(&mut self.issuing_organization, patch.issuing_organization);
        replace_if_some(&mut self.issue_date, patch.issue_date);
        replace_if_some(&mut self.expiration_date, patch.expiration_date);
        replace_if_some(&mut self.credential_id, patch.credential_id);
        replace_if_some(&mut self.credential_url, patch.credential_url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_body_flattens_section_fields() {
        let body = json!({
            "candidate_id": "6f1f0d47-8e0c-4a3e-9a43-27a1f1a1f3a1",
            "title": "Compiler",
            "tech_stack": ["rust"],
            "candidate": "ignored read-only field"
        });
        let payload: CreateSectionPayload<ProjectFields> =
            serde_json::from_value(body).expect("valid body");
        assert_eq!(payload.fields.title.as_deref(), Some("Compiler"));
        assert!(payload.candidate_id.is_some());
        assert_eq!(payload.fields.tech_stack, vec!["rust".to_string()]);
        assert!(payload.fields.validate().is_ok());
    }

    #[test]
    fn required_names_reject_blank() {
        let fields = WorkExperienceFields {
            company_name: Some("  ".into()),
            role_designation: None,
            start_date: None,
            end_date: None,
            is_current: true,
            responsibilities: vec![],
            technologies_used: vec![],
        };
        let errors = fields.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["company_name"][0].code, "blank");
        assert_eq!(fields["role_designation"][0].code, "required");
    }

    #[test]
    fn patch_keeps_identity_and_untouched_fields() {
        let id = Uuid::new_v4();
        let parent = Uuid::new_v4();
        let mut cert = Certification::build(
            id,
            parent,
            CertificationFields {
                name: Some("CKA".into()),
                issuing_organization: Some("CNCF".into()),
                issue_date: None,
                expiration_date: None,
                credential_id: None,
                credential_url: None,
            },
        );
        cert.patch(CertificationPatch {
            credential_id: Some("LF-123".into()),
            ..Default::default()
        });
        assert_eq!(cert.id, id);
        assert_eq!(cert.candidate_id, parent);
        assert_eq!(cert.issuing_organization.as_deref(), Some("CNCF"));
        assert_eq!(cert.credential_id.as_deref(), Some("LF-123"));
    }

    #[test]
    fn section_urls_must_be_urls_or_blank() {
        let mut fields = CertificationFields {
            name: Some("CKA".into()),
            issuing_organization: None,
            issue_date: None,
            expiration_date: None,
            credential_id: None,
            credential_url: Some(String::new()),
        };
        assert!(fields.validate().is_ok());
        fields.credential_url = Some("not a url".into());
        assert!(fields.validate().is_err());
    }

    #[test]
    fn dates_and_gpa_accept_form_text() {
        let fields: EducationFields = serde_json::from_value(json!({
            "degree": "BSc",
            "institution": "MIT",
            "start_date": "2010-09-01",
            "end_date": "2014-06-30T00:00:00",
            "gpa": "3.7"
        }))
        .expect("form text");
        assert_eq!(fields.gpa, Some(3.7));
        assert_eq!(
            fields.start_date.map(|d| d.to_rfc3339()),
            Some("2010-09-01T00:00:00+00:00".to_string())
        );
        assert!(fields.end_date.is_some());
    }
}
