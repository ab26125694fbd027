//! Raw score to proficiency score and classification.

use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

use super::level::{EducationalLevel, GradeMap, SubjectClass};
use super::table::{
    ANOS_FINAIS_GERAL, ANOS_FINAIS_MATEMATICA, ANOS_INICIAIS_GERAL, ANOS_INICIAIS_MATEMATICA,
    ProficiencyLevel, ProficiencyTable,
};

/// Outcome of [`Classifier::classify`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProficiencyResult {
    pub proficiency_score: f64,
    pub proficiency_level: ProficiencyLevel,
    pub classification: &'static str,
}

/// Which table a `(grade, subject, course)` combination resolves to.
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub table: &'static ProficiencyTable,
    pub table_name: &'static str,
    pub educational_level: EducationalLevel,
    pub subject: SubjectClass,
    pub max_proficiency: f64,
    pub pm_description: String,
}

impl TableInfo {
    /// Bands a proficiency value that was computed elsewhere.
    pub fn classify_proficiency(&self, proficiency_score: f64) -> ProficiencyLevel {
        self.table.classify(proficiency_score)
    }
}

struct TableSelection {
    table: &'static ProficiencyTable,
    name: &'static str,
}

/// Single source of the `(stage, subject) -> table` matrix.
fn select_table(level: EducationalLevel, subject: SubjectClass) -> TableSelection {
    match (level.is_early_grades(), subject) {
        (true, SubjectClass::Mathematics) => TableSelection {
            table: &ANOS_INICIAIS_MATEMATICA,
            name: "Anos Iniciais - Matemática",
        },
        (true, SubjectClass::Other) => TableSelection {
            table: &ANOS_INICIAIS_GERAL,
            name: "Anos Iniciais - Demais Disciplinas",
        },
        (false, SubjectClass::Mathematics) => TableSelection {
            table: &ANOS_FINAIS_MATEMATICA,
            name: "Anos Finais - Matemática",
        },
        (false, SubjectClass::Other) => TableSelection {
            table: &ANOS_FINAIS_GERAL,
            name: "Anos Finais - Demais Disciplinas",
        },
    }
}

/// Rounds halves towards positive infinity, including for negative values.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Stateless classification service.
///
/// Holds only the grade lookup; every call is a pure function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    grades: GradeMap,
}

impl Classifier {
    pub fn new(grades: GradeMap) -> Self {
        Self { grades }
    }

    /// `course` wins when present; otherwise the grade is looked up, and
    /// anything unresolved falls back to Anos Iniciais.
    pub fn resolve_level(&self, grade: Option<&str>, course: Option<&str>) -> EducationalLevel {
        if let Some(course) = non_empty(course) {
            return EducationalLevel::from_label(course);
        }

        match non_empty(grade) {
            Some(grade) => self.grades.get(grade).unwrap_or_else(|| {
                debug!(grade, "Grade not mapped, defaulting to Anos Iniciais");
                EducationalLevel::AnosIniciais
            }),
            None => EducationalLevel::AnosIniciais,
        }
    }

    /// Describes the table that [`Classifier::classify`] would use.
    pub fn table_info(
        &self,
        grade: Option<&str>,
        subject: Option<&str>,
        course: Option<&str>,
    ) -> TableInfo {
        let educational_level = self.resolve_level(grade, course);
        let subject = SubjectClass::from_subject(non_empty(subject));
        let selection = select_table(educational_level, subject);

        TableInfo {
            table: selection.table,
            table_name: selection.name,
            educational_level,
            subject,
            max_proficiency: selection.table.max_proficiency,
            pm_description: format!(
                "P.M. {} - {} ({})",
                selection.table.max_proficiency,
                educational_level.label(),
                subject.label()
            ),
        }
    }

    /// Rescales a 0-10 raw score onto the selected table and bands it.
    ///
    /// `_total_questions` is accepted for caller compatibility and not read.
    /// Out-of-range raw scores are not clamped.
    pub fn classify(
        &self,
        raw_score: f64,
        _total_questions: u32,
        grade: Option<&str>,
        subject: Option<&str>,
        course: Option<&str>,
    ) -> ProficiencyResult {
        let info = self.table_info(grade, subject, course);
        let proficiency_score = round_half_up((raw_score / 10.0) * info.max_proficiency);
        let proficiency_level = info.classify_proficiency(proficiency_score);

        ProficiencyResult {
            proficiency_score,
            proficiency_level,
            classification: proficiency_level.label(),
        }
    }
}

/// Built once on first use and shared by the free functions below.
static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::default);

/// The process-wide classifier backed by the built-in grade map.
pub fn default_classifier() -> &'static Classifier {
    &DEFAULT_CLASSIFIER
}

/// [`Classifier::classify`] with the built-in grade map.
pub fn classify(
    raw_score: f64,
    total_questions: u32,
    grade: Option<&str>,
    subject: Option<&str>,
    course: Option<&str>,
) -> ProficiencyResult {
    default_classifier().classify(raw_score, total_questions, grade, subject, course)
}

/// [`Classifier::table_info`] with the built-in grade map.
pub fn table_info(grade: Option<&str>, subject: Option<&str>, course: Option<&str>) -> TableInfo {
    default_classifier().table_info(grade, subject, course)
}
