//! Declarative field table for the job profile.
//!
//! Each entry binds an exact template path to the key the model reports it
//! under, how the raw text is coerced, what counts as "no value", and which
//! prompt asks for it. Adding a field means adding a row here.

use serde_json::{json, Value};

use crate::extraction::clean_field_value;
use crate::schema::OPEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryBound {
    Min,
    Max,
}

/// How raw model text becomes a typed JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Integer,
    Boolean,
    Salary(SalaryBound),
    CurrencyCode,
    TextList,
    ObjectiveList,
    /// Supplied by the caller, never taken from model output.
    Identifier,
}

/// The value a field holds when nothing was extracted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Open,
    Zero,
    False,
    EmptyList,
}

impl FieldDefault {
    pub fn value(self) -> Value {
        match self {
            FieldDefault::Open => Value::String(OPEN.to_string()),
            FieldDefault::Zero => json!(0),
            FieldDefault::False => Value::Bool(false),
            FieldDefault::EmptyList => Value::Array(Vec::new()),
        }
    }
}

/// Which per-field prompt asks for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    Title,
    Summary,
    TechnicalSkills,
    SoftSkills,
    Duties,
    ExperienceDescription,
    Salary,
    Generic,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical key, also the label used in `KEY: value` replies.
    pub key: &'static str,
    pub path: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub coercion: Coercion,
    pub default: FieldDefault,
    pub prompt: PromptVariant,
}

impl FieldSpec {
    pub fn is_extracted(&self) -> bool {
        self.coercion != Coercion::Identifier
    }

    /// Cleans a raw reply for this field. A reply that just repeats the
    /// field's own description is treated as no answer.
    pub fn clean(&self, raw: &str) -> String {
        let cleaned = clean_field_value(raw);
        if cleaned.eq_ignore_ascii_case(self.description) {
            OPEN.to_string()
        } else {
            cleaned
        }
    }
}

const fn field(
    key: &'static str,
    path: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
    coercion: Coercion,
    default: FieldDefault,
    prompt: PromptVariant,
) -> FieldSpec {
    FieldSpec {
        key,
        path,
        description,
        keywords,
        coercion,
        default,
        prompt,
    }
}

use Coercion as C;
use FieldDefault as D;
use PromptVariant as P;

pub static JOB_FIELDS: &[FieldSpec] = &[
    field(
        "JOB_ID",
        "jobProfile.JobId",
        "Unique identifier for the job",
        &[],
        C::Identifier,
        D::Open,
        P::Generic,
    ),
    field(
        "JOB_TITLE",
        "jobProfile.coreDetails.title",
        "Job title or position name",
        &["title", "position", "role", "job"],
        C::Text,
        D::Open,
        P::Title,
    ),
    field(
        "JOB_SUMMARY",
        "jobProfile.coreDetails.jobSummary",
        "Brief summary or overview of the job role",
        &["summary", "overview", "about", "description", "we are looking for"],
        C::Text,
        D::Open,
        P::Summary,
    ),
    field(
        "EMPLOYMENT_TYPE",
        "jobProfile.coreDetails.employmentType.agreement",
        "Employment agreement type",
        &["employee", "contractor", "freelance", "consultant"],
        C::Text,
        D::Open,
        P::Generic,
    ),
    field(
        "SCHEDULE",
        "jobProfile.coreDetails.employmentType.schedule",
        "Work schedule type",
        &["full-time", "part-time", "full time", "part time"],
        C::Text,
        D::Open,
        P::Generic,
    ),
    field(
        "TERM",
        "jobProfile.coreDetails.employmentType.term",
        "Employment term duration",
        &["permanent", "temporary", "contract", "fixed-term"],
        C::Text,
        D::Open,
        P::Generic,
    ),
    field(
        "LOCATION_TYPE",
        "jobProfile.coreDetails.jobLocation.type",
        "Work location type",
        &["remote", "onsite", "hybrid", "telecommute", "work from home"],
        C::Text,
        D::Open,
        P::Generic,
    ),
    field(
        "LOCATION_REQUIREMENT",
        "jobProfile.coreDetails.jobLocation.applicantLocationRequirement",
        "Geographic requirements for applicants",
        &["location", "based", "residents", "citizens", "timezone"],
        C::Text,
        D::Open,
        P::Generic,
    ),
    field(
        "DAY_TO_DAY_DUTIES",
        "jobProfile.responsibilities.dayToDayDuties",
        "Daily tasks and responsibilities",
        &["responsibilities", "duties", "tasks", "will", "responsible for"],
        C::TextList,
        D::EmptyList,
        P::Duties,
    ),
    field(
        "KEY_OBJECTIVES",
        "jobProfile.responsibilities.keyObjectives",
        "Key goals and objectives",
        &["objectives", "goals", "targets", "achieve", "deliver"],
        C::ObjectiveList,
        D::EmptyList,
        P::Generic,
    ),
    field(
        "TECHNICAL_SKILLS",
        "jobProfile.qualifications.skills.technical",
        "Required technical skills and technologies",
        &["skills", "technologies", "programming", "software", "tools", "experience with"],
        C::TextList,
        D::EmptyList,
        P::TechnicalSkills,
    ),
    field(
        "SOFT_SKILLS",
        "jobProfile.qualifications.skills.soft",
        "Required soft skills and personal qualities",
        &["communication", "teamwork", "leadership", "problem-solving", "analytical"],
        C::TextList,
        D::EmptyList,
        P::SoftSkills,
    ),
    field(
        "REQUIRED_YEARS",
        "jobProfile.qualifications.experience.requiredYears",
        "Years of experience required",
        &["years", "experience", "minimum", "at least"],
        C::Integer,
        D::Zero,
        P::Generic,
    ),
    field(
        "EXPERIENCE_DESCRIPTION",
        "jobProfile.qualifications.experience.description",
        "Description of required experience",
        &["experience", "background", "proven track record"],
        C::Text,
        D::Open,
        P::ExperienceDescription,
    ),
    field(
        "EDUCATION_REQUIRED",
        "jobProfile.qualifications.education.requiredCredential",
        "Required education credentials",
        &["degree", "education", "bachelor", "master", "phd", "certification"],
        C::Text,
        D::Open,
        P::Generic,
    ),
    field(
        "ACCEPTS_EXPERIENCE_IN_LIEU",
        "jobProfile.qualifications.education.acceptsExperienceInLieu",
        "Whether experience can substitute for education",
        &["equivalent experience", "in lieu", "substitute", "or equivalent"],
        C::Boolean,
        D::False,
        P::Generic,
    ),
    field(
        "COMPANY_CULTURE",
        "jobProfile.companyContext.culture",
        "Company culture and values",
        &["culture", "values", "environment", "team", "we believe"],
        C::Text,
        D::Open,
        P::Generic,
    ),
    field(
        "GROWTH_OPPORTUNITIES",
        "jobProfile.companyContext.growthOpportunities",
        "Career growth and development opportunities",
        &["growth", "career", "development", "advancement", "opportunities"],
        C::Text,
        D::Open,
        P::Generic,
    ),
    field(
        "SALARY_MIN",
        "jobProfile.compensation.salary.min",
        "Minimum salary amount",
        &["salary", "compensation", "pay", "from", "starting"],
        C::Salary(SalaryBound::Min),
        D::Zero,
        P::Salary,
    ),
    field(
        "SALARY_MAX",
        "jobProfile.compensation.salary.max",
        "Maximum salary amount",
        &["salary", "compensation", "pay", "to", "up to"],
        C::Salary(SalaryBound::Max),
        D::Zero,
        P::Salary,
    ),
    field(
        "CURRENCY",
        "jobProfile.compensation.salary.currency",
        "Salary currency",
        &["usd", "eur", "gbp", "dollar", "euro", "pound"],
        C::CurrencyCode,
        D::Open,
        P::Generic,
    ),
    field(
        "BENEFITS",
        "jobProfile.compensation.benefits",
        "Employee benefits and perks",
        &["benefits", "perks", "insurance", "vacation", "pto", "401k"],
        C::TextList,
        D::EmptyList,
        P::Generic,
    ),
    field(
        "COMPETENCY_PROFILE",
        "jobProfile.interviewGuidance.competencyProfile",
        "Key competencies to assess in interviews",
        &["competencies", "assess", "evaluate", "strengths"],
        C::TextList,
        D::EmptyList,
        P::Generic,
    ),
    field(
        "ASSESSMENT_PLAN",
        "jobProfile.interviewGuidance.assessmentPlan",
        "Assessment methods for candidates",
        &["assessment", "interview", "test", "exercise", "take-home"],
        C::TextList,
        D::EmptyList,
        P::Generic,
    ),
];

/// What the reserved-field pass writes at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedRule {
    EmptyList,
    Open,
    /// Every leaf inside each stage goes back to its type default.
    ResetStages,
}

#[derive(Debug, Clone, Copy)]
pub struct ReservedField {
    pub path: &'static str,
    pub rule: ReservedRule,
}

const fn reserved(path: &'static str, rule: ReservedRule) -> ReservedField {
    ReservedField { path, rule }
}

pub static RESERVED_FIELDS: &[ReservedField] = &[
    reserved("jobProfile.coreDetails.customTags", ReservedRule::EmptyList),
    reserved("jobProfile.responsibilities.customTags", ReservedRule::EmptyList),
    reserved("jobProfile.qualifications.customTags", ReservedRule::EmptyList),
    reserved("jobProfile.companyContext.customTags", ReservedRule::EmptyList),
    reserved("jobProfile.compensation.customTags", ReservedRule::EmptyList),
    reserved("jobProfile.interviewGuidance.customTags", ReservedRule::EmptyList),
    reserved("jobProfile.coreDetails.extraNotes", ReservedRule::Open),
    reserved("jobProfile.responsibilities.extraNotes", ReservedRule::Open),
    reserved("jobProfile.qualifications.extraNotes", ReservedRule::Open),
    reserved("jobProfile.companyContext.extraNotes", ReservedRule::Open),
    reserved("jobProfile.compensation.extraNotes", ReservedRule::Open),
    reserved("jobProfile.interviewGuidance.extraNotes", ReservedRule::Open),
    reserved("jobProfile.interviewGuidance.interviewFlow", ReservedRule::ResetStages),
    reserved("jobProfile.meta.customFields.hardwareRequirement", ReservedRule::Open),
    reserved("jobProfile.meta.customFields.timezoneOverlap", ReservedRule::Open),
    reserved("jobProfile.meta.customFields.clearance", ReservedRule::Open),
];

/// Paths the job pipeline stamps after filling.
pub const JOB_ID_PATH: &str = "jobProfile.JobId";
pub const LAST_UPDATED_PATH: &str = "jobProfile.meta.lastUpdated";
pub const SOURCE_PATH: &str = "jobProfile.meta.source";
pub const SCHEMA_VERSION_PATH: &str = "jobProfile.meta.schemaVersion";

pub const SOURCE_LABEL: &str = "AI-Extracted";
pub const SCHEMA_VERSION: &str = "v1.1";

#[cfg(test)]
pub fn find(key: &str) -> Option<&'static FieldSpec> {
    JOB_FIELDS.iter().find(|spec| spec.key == key)
}
