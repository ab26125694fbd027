//! Data types for student results and their aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::proficiency::{ProficiencyLevel, ProficiencyResult};

/// One student's raw result for one evaluation.
///
/// Accepts both the CSV headers used by exports and the Portuguese field
/// names returned by the results backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StudentResult {
    #[serde(alias = "aluno_id")]
    pub student_id: String,
    #[serde(alias = "aluno_nome", alias = "nome")]
    pub student_name: String,
    #[serde(alias = "turma")]
    pub class_name: String,
    #[serde(default, alias = "serie")]
    pub grade: Option<String>,
    #[serde(default, alias = "disciplina")]
    pub subject: Option<String>,
    #[serde(default, alias = "curso")]
    pub course: Option<String>,
    #[serde(alias = "nota")]
    pub raw_score: f64,
    #[serde(default, alias = "total_questoes")]
    pub total_questions: u32,
}

/// A [`StudentResult`] with its classification, flat so it can be written as a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedStudent {
    pub student_id: String,
    pub student_name: String,
    pub class_name: String,
    pub grade: Option<String>,
    pub subject: Option<String>,
    pub course: Option<String>,
    pub raw_score: f64,
    pub total_questions: u32,
    pub proficiency_score: f64,
    pub proficiency_level: ProficiencyLevel,
    pub classification: &'static str,
}

impl ClassifiedStudent {
    pub fn new(row: &StudentResult, result: ProficiencyResult) -> Self {
        Self {
            student_id: row.student_id.clone(),
            student_name: row.student_name.clone(),
            class_name: row.class_name.clone(),
            grade: row.grade.clone(),
            subject: row.subject.clone(),
            course: row.course.clone(),
            raw_score: row.raw_score,
            total_questions: row.total_questions,
            proficiency_score: result.proficiency_score,
            proficiency_level: result.proficiency_level,
            classification: result.classification,
        }
    }
}

/// Student counts per proficiency level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationDistribution {
    pub abaixo_do_basico: usize,
    pub basico: usize,
    pub adequado: usize,
    pub avancado: usize,
}

impl ClassificationDistribution {
    pub fn record(&mut self, level: ProficiencyLevel) {
        match level {
            ProficiencyLevel::AbaixoDoBasico => self.abaixo_do_basico += 1,
            ProficiencyLevel::Basico => self.basico += 1,
            ProficiencyLevel::Adequado => self.adequado += 1,
            ProficiencyLevel::Avancado => self.avancado += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.abaixo_do_basico + self.basico + self.adequado + self.avancado
    }
}

/// Statistics for one class in one subject, scored on a single table.
#[derive(Debug, Serialize)]
pub struct ClassAggregate {
    pub turma: String,
    pub disciplina: Option<String>,
    /// Grade label of the group's first row.
    pub serie: Option<String>,
    /// Name of the table every row in the group was scored on.
    pub tabela: &'static str,
    pub total_alunos: usize,
    pub media_nota: f64,
    pub media_proficiencia: f64,
    pub desvio_proficiencia: f64,
    /// Class mean proficiency banded against the class's table.
    pub classificacao: ProficiencyLevel,
    pub distribuicao_classificacao: ClassificationDistribution,
}

/// Complete aggregation result for one evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluationAggregate {
    pub schema_version: u8,
    pub avaliacao_id: String,
    pub generated_at: DateTime<Utc>,
    pub total_alunos: usize,
    pub media_nota: f64,
    pub media_proficiencia: f64,
    pub desvio_proficiencia: f64,
    pub distribuicao_classificacao: ClassificationDistribution,
    pub turmas: Vec<ClassAggregate>,
}
