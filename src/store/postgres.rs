use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use super::{CandidateFilter, CandidateStore};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateProfile};
use crate::models::certification::Certification;
use crate::models::education::Education;
use crate::models::project::Project;
use crate::models::section::{SectionKind, SectionRecord};
use crate::models::work_experience::WorkExperience;

const CANDIDATE_COLUMNS: &str = "id, user_id, name, email, phone, gender, date_of_birth, \
    linkedin_profile, github_profile, portfolio_link, resume, skills, experience, \
    current_job_title, current_company, desired_roles, preferred_industry_sector, \
    employment_type_preferences, preferred_locations, desired_salary_range, \
    willingness_to_relocate, is_actively_looking, status, source, view_count, \
    created_at, updated_at";

const PROJECT_COLUMNS: &str =
    "id, candidate_id, title, description, tech_stack, role_in_project, github_link, live_link";

const WORK_EXPERIENCE_COLUMNS: &str = "id, candidate_id, company_name, role_designation, \
    start_date, end_date, is_current, responsibilities, technologies_used";

const EDUCATION_COLUMNS: &str = "id, candidate_id, degree, institution, field_of_study, \
    start_date, end_date, gpa, activities_achievements";

const CERTIFICATION_COLUMNS: &str = "id, candidate_id, name, issuing_organization, issue_date, \
    expiration_date, credential_id, credential_url";

/// Row shape of `candidates`; choice columns are plain text.
#[derive(Debug, FromRow)]
struct CandidateRow {
    id: Uuid,
    user_id: i64,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    gender: Option<String>,
    date_of_birth: Option<DateTime<Utc>>,
    linkedin_profile: Option<String>,
    github_profile: Option<String>,
    portfolio_link: Option<String>,
    resume: Option<String>,
    skills: Vec<String>,
    experience: f64,
    current_job_title: Option<String>,
    current_company: Option<String>,
    desired_roles: Vec<String>,
    preferred_industry_sector: Vec<String>,
    employment_type_preferences: Vec<String>,
    preferred_locations: Vec<String>,
    desired_salary_range: Option<String>,
    willingness_to_relocate: bool,
    is_actively_looking: bool,
    status: Option<String>,
    source: Option<String>,
    view_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CandidateRow> for Candidate {
    type Error = Error;

    fn try_from(row: CandidateRow) -> Result<Self> {
        let gender = row
            .gender
            .map(|g| g.parse())
            .transpose()
            .map_err(|e| Error::Internal(format!("candidate {}: {}", row.id, e)))?;
        let status = row
            .status
            .map(|s| s.parse())
            .transpose()
            .map_err(|e| Error::Internal(format!("candidate {}: {}", row.id, e)))?;

        Ok(Candidate {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            gender,
            date_of_birth: row.date_of_birth,
            linkedin_profile: row.linkedin_profile,
            github_profile: row.github_profile,
            portfolio_link: row.portfolio_link,
            resume: row.resume,
            skills: row.skills,
            experience: row.experience,
            current_job_title: row.current_job_title,
            current_company: row.current_company,
            desired_roles: row.desired_roles,
            preferred_industry_sector: row.preferred_industry_sector,
            employment_type_preferences: row.employment_type_preferences,
            preferred_locations: row.preferred_locations,
            desired_salary_range: row.desired_salary_range,
            willingness_to_relocate: row.willingness_to_relocate,
            is_actively_looking: row.is_actively_looking,
            status,
            source: row.source,
            view_count: row.view_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_candidate<'e, E: PgExecutor<'e>>(executor: E, c: &Candidate) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO candidates (
            id, user_id, name, email, phone, gender, date_of_birth,
            linkedin_profile, github_profile, portfolio_link, resume, skills, experience,
            current_job_title, current_company, desired_roles, preferred_industry_sector,
            employment_type_preferences, preferred_locations, desired_salary_range,
            willingness_to_relocate, is_actively_looking, status, source, view_count,
            created_at, updated_at
        ) VALUES (
            $1,$2,$3,$4,$5,$6,$7,
            $8,$9,$10,$11,$12,$13,
            $14,$15,$16,$17,
            $18,$19,$20,
            $21,$22,$23,$24,$25,
            $26,$27
        )
        "#,
    )
    .bind(c.id)
    .bind(c.user_id)
    .bind(&c.name)
    .bind(&c.email)
    .bind(&c.phone)
    .bind(c.gender.map(|g| g.as_str()))
    .bind(c.date_of_birth)
    .bind(&c.linkedin_profile)
    .bind(&c.github_profile)
    .bind(&c.portfolio_link)
    .bind(&c.resume)
    .bind(&c.skills)
    .bind(c.experience)
    .bind(&c.current_job_title)
    .bind(&c.current_company)
    .bind(&c.desired_roles)
    .bind(&c.preferred_industry_sector)
    .bind(&c.employment_type_preferences)
    .bind(&c.preferred_locations)
    .bind(&c.desired_salary_range)
    .bind(c.willingness_to_relocate)
    .bind(c.is_actively_looking)
    .bind(c.status.map(|s| s.as_str()))
    .bind(&c.source)
    .bind(c.view_count)
    .bind(c.created_at)
    .bind(c.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

async fn insert_record<'e, E: PgExecutor<'e>>(executor: E, record: &SectionRecord) -> Result<()> {
    match record {
        SectionRecord::Project(p) => {
            sqlx::query(
                r#"
                INSERT INTO projects (
                    id, candidate_id, title, description, tech_stack, role_in_project,
                    github_link, live_link
                ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
                "#,
            )
            .bind(p.id)
            .bind(p.candidate_id)
            .bind(&p.title)
            .bind(&p.description)
            .bind(&p.tech_stack)
            .bind(&p.role_in_project)
            .bind(&p.github_link)
            .bind(&p.live_link)
            .execute(executor)
            .await?;
        }
        SectionRecord::WorkExperience(w) => {
            sqlx::query(
                r#"
                INSERT INTO work_experiences (
                    id, candidate_id, company_name, role_designation, start_date, end_date,
                    is_current, responsibilities, technologies_used
                ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
                "#,
            )
            .bind(w.id)
            .bind(w.candidate_id)
            .bind(&w.company_name)
            .bind(&w.role_designation)
            .bind(w.start_date)
            .bind(w.end_date)
            .bind(w.is_current)
            .bind(&w.responsibilities)
            .bind(&w.technologies_used)
            .execute(executor)
            .await?;
        }
        SectionRecord::Education(e) => {
            sqlx::query(
                r#"
                INSERT INTO education (
                    id, candidate_id, degree, institution, field_of_study, start_date,
                    end_date, gpa, activities_achievements
                ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
                "#,
            )
            .bind(e.id)
            .bind(e.candidate_id)
            .bind(&e.degree)
            .bind(&e.institution)
            .bind(&e.field_of_study)
            .bind(e.start_date)
            .bind(e.end_date)
            .bind(e.gpa)
            .bind(&e.activities_achievements)
            .execute(executor)
            .await?;
        }
        SectionRecord::Certification(c) => {
            sqlx::query(
                r#"
                INSERT INTO certifications (
                    id, candidate_id, name, issuing_organization, issue_date,
                    expiration_date, credential_id, credential_url
                ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
                "#,
            )
            .bind(c.id)
            .bind(c.candidate_id)
            .bind(&c.name)
            .bind(&c.issuing_organization)
            .bind(c.issue_date)
            .bind(c.expiration_date)
            .bind(&c.credential_id)
            .bind(&c.credential_url)
            .execute(executor)
            .await?;
        }
    }
    Ok(())
}

async fn select_sections(
    pool: &PgPool,
    kind: SectionKind,
    candidate_ids: Option<&[Uuid]>,
) -> Result<Vec<SectionRecord>> {
    let (table, columns) = match kind {
        SectionKind::Project => ("projects", PROJECT_COLUMNS),
        SectionKind::WorkExperience => ("work_experiences", WORK_EXPERIENCE_COLUMNS),
        SectionKind::Education => ("education", EDUCATION_COLUMNS),
        SectionKind::Certification => ("certifications", CERTIFICATION_COLUMNS),
    };
    let sql = format!(
        "SELECT {} FROM {} WHERE ($1::uuid[] IS NULL OR candidate_id = ANY($1)) ORDER BY seq",
        columns, table
    );

    let records: Vec<SectionRecord> = match kind {
        SectionKind::Project => sqlx::query_as::<_, Project>(&sql)
            .bind(candidate_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(SectionRecord::Project)
            .collect(),
        SectionKind::WorkExperience => sqlx::query_as::<_, WorkExperience>(&sql)
            .bind(candidate_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(SectionRecord::WorkExperience)
            .collect(),
        SectionKind::Education => sqlx::query_as::<_, Education>(&sql)
            .bind(candidate_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(SectionRecord::Education)
            .collect(),
        SectionKind::Certification => sqlx::query_as::<_, Certification>(&sql)
            .bind(candidate_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(SectionRecord::Certification)
            .collect(),
    };
    Ok(records)
}

#[async_trait]
impl CandidateStore for PgStore {
    async fn insert_profile(&self, profile: &CandidateProfile) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        insert_candidate(&mut *tx, &profile.candidate).await?;
        for record in profile.section_records() {
            insert_record(&mut *tx, &record).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn fetch_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {} FROM candidates WHERE id = $1", CANDIDATE_COLUMNS);
        sqlx::query_as::<_, CandidateRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Candidate::try_from)
            .transpose()
    }

    async fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        let sql = format!(
            "SELECT {} FROM candidates
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::bigint IS NULL OR user_id = $2)
             ORDER BY seq",
            CANDIDATE_COLUMNS
        );
        sqlx::query_as::<_, CandidateRow>(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.user_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Candidate::try_from)
            .collect()
    }

    async fn update_candidate(&self, c: &Candidate) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE candidates
            SET
                user_id = $2,
                name = $3,
                email = $4,
                phone = $5,
                gender = $6,
                date_of_birth = $7,
                linkedin_profile = $8,
                github_profile = $9,
                portfolio_link = $10,
                resume = $11,
                skills = $12,
                experience = $13,
                current_job_title = $14,
                current_company = $15,
                desired_roles = $16,
                preferred_industry_sector = $17,
                employment_type_preferences = $18,
                preferred_locations = $19,
                desired_salary_range = $20,
                willingness_to_relocate = $21,
                is_actively_looking = $22,
                status = $23,
                source = $24,
                updated_at = $25
            WHERE id = $1
            "#,
        )
        .bind(c.id)
        .bind(c.user_id)
        .bind(&c.name)
        .bind(&c.email)
        .bind(&c.phone)
        .bind(c.gender.map(|g| g.as_str()))
        .bind(c.date_of_birth)
        .bind(&c.linkedin_profile)
        .bind(&c.github_profile)
        .bind(&c.portfolio_link)
        .bind(&c.resume)
        .bind(&c.skills)
        .bind(c.experience)
        .bind(&c.current_job_title)
        .bind(&c.current_company)
        .bind(&c.desired_roles)
        .bind(&c.preferred_industry_sector)
        .bind(&c.employment_type_preferences)
        .bind(&c.preferred_locations)
        .bind(&c.desired_salary_range)
        .bind(c.willingness_to_relocate)
        .bind(c.is_actively_looking)
        .bind(c.status.map(|s| s.as_str()))
        .bind(&c.source)
        .bind(c.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Candidate>> {
        let sql = format!(
            "UPDATE candidates SET view_count = view_count + 1 WHERE id = $1 RETURNING {}",
            CANDIDATE_COLUMNS
        );
        sqlx::query_as::<_, CandidateRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Candidate::try_from)
            .transpose()
    }

    async fn delete_candidate(&self, id: Uuid) -> Result<bool> {
        // child rows go with it through ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn sections_for(&self, candidate_ids: &[Uuid]) -> Result<Vec<SectionRecord>> {
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for kind in SectionKind::ALL {
            records.extend(select_sections(&self.pool, kind, Some(candidate_ids)).await?);
        }
        Ok(records)
    }

    async fn insert_section(&self, record: &SectionRecord) -> Result<()> {
        insert_record(&self.pool, record).await
    }

    async fn fetch_section(&self, kind: SectionKind, id: Uuid) -> Result<Option<SectionRecord>> {
        let record = match kind {
            SectionKind::Project => {
                let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
                sqlx::query_as::<_, Project>(&sql)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .map(SectionRecord::Project)
            }
            SectionKind::WorkExperience => {
                let sql = format!(
                    "SELECT {} FROM work_experiences WHERE id = $1",
                    WORK_EXPERIENCE_COLUMNS
                );
                sqlx::query_as::<_, WorkExperience>(&sql)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .map(SectionRecord::WorkExperience)
            }
            SectionKind::Education => {
                let sql = format!("SELECT {} FROM education WHERE id = $1", EDUCATION_COLUMNS);
                sqlx::query_as::<_, Education>(&sql)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .map(SectionRecord::Education)
            }
            SectionKind::Certification => {
                let sql = format!(
                    "SELECT {} FROM certifications WHERE id = $1",
                    CERTIFICATION_COLUMNS
                );
                sqlx::query_as::<_, Certification>(&sql)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
                    .map(SectionRecord::Certification)
            }
        };
        Ok(record)
    }

    async fn list_sections(
        &self,
        kind: SectionKind,
        candidate_id: Option<Uuid>,
    ) -> Result<Vec<SectionRecord>> {
        let parent = candidate_id.map(|id| vec![id]);
        select_sections(&self.pool, kind, parent.as_deref()).await
    }

    async fn update_section(&self, record: &SectionRecord) -> Result<bool> {
        let res = match record {
            SectionRecord::Project(p) => {
                sqlx::query(
                    r#"
                    UPDATE projects
                    SET title = $2, description = $3, tech_stack = $4, role_in_project = $5,
                        github_link = $6, live_link = $7
                    WHERE id = $1
                    "#,
                )
                .bind(p.id)
                .bind(&p.title)
                .bind(&p.description)
                .bind(&p.tech_stack)
                .bind(&p.role_in_project)
                .bind(&p.github_link)
                .bind(&p.live_link)
                .execute(&self.pool)
                .await?
            }
            SectionRecord::WorkExperience(w) => {
                sqlx::query(
                    r#"
                    UPDATE work_experiences
                    SET company_name = $2, role_designation = $3, start_date = $4,
                        end_date = $5, is_current = $6, responsibilities = $7,
                        technologies_used = $8
                    WHERE id = $1
                    "#,
                )
                .bind(w.id)
                .bind(&w.company_name)
                .bind(&w.role_designation)
                .bind(w.start_date)
                .bind(w.end_date)
                .bind(w.is_current)
                .bind(&w.responsibilities)
                .bind(&w.technologies_used)
                .execute(&self.pool)
                .await?
            }
            SectionRecord::Education(e) => {
                sqlx::query(
                    r#"
                    UPDATE education
                    SET degree = $2, institution = $3, field_of_study = $4, start_date = $5,
                        end_date = $6, gpa = $7, activities_achievements = $8
                    WHERE id = $1
                    "#,
                )
                .bind(e.id)
                .bind(&e.degree)
                .bind(&e.institution)
                .bind(&e.field_of_study)
                .bind(e.start_date)
                .bind(e.end_date)
                .bind(e.gpa)
                .bind(&e.activities_achievements)
                .execute(&self.pool)
                .await?
            }
            SectionRecord::Certification(c) => {
                sqlx::query(
                    r#"
                    UPDATE certifications
                    SET name = $2, issuing_organization = $3, issue_date = $4,
                        expiration_date = $5, credential_id = $6, credential_url = $7
                    WHERE id = $1
                    "#,
                )
                .bind(c.id)
                .bind(&c.name)
                .bind(&c.issuing_organization)
                .bind(c.issue_date)
                .bind(c.expiration_date)
                .bind(&c.credential_id)
                .bind(&c.credential_url)
                .execute(&self.pool)
                .await?
            }
        };
        Ok(res.rows_affected() > 0)
    }

    async fn delete_section(&self, kind: SectionKind, id: Uuid) -> Result<bool> {
        let table = match kind {
            SectionKind::Project => "projects",
            SectionKind::WorkExperience => "work_experiences",
            SectionKind::Education => "education",
            SectionKind::Certification => "certifications",
        };
        let res = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
