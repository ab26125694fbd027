use chrono::Utc;
use std::collections::BTreeMap;
use tracing::debug;

use crate::proficiency::{Classifier, TableInfo};
use crate::results::types::{
    ClassAggregate, ClassificationDistribution, ClassifiedStudent, EvaluationAggregate,
    StudentResult,
};
use crate::results::utility::{mean, mean_and_stddev};

/// Classifies every row independently.
pub fn classify_results(classifier: &Classifier, rows: &[StudentResult]) -> Vec<ClassifiedStudent> {
    rows.iter()
        .map(|row| {
            let result = classifier.classify(
                row.raw_score,
                row.total_questions,
                row.grade.as_deref(),
                row.subject.as_deref(),
                row.course.as_deref(),
            );
            ClassifiedStudent::new(row, result)
        })
        .collect()
}

/// Aggregates an evaluation's rows into overall and per-class statistics.
///
/// Classes are grouped by `(class_name, subject, table)`, so a class whose
/// rows resolve to different tables (a multi-grade class, or a course
/// override on some rows) is reported once per table. Each group's mean
/// proficiency is banded against that group's table.
pub fn aggregate_results(
    evaluation_id: &str,
    classifier: &Classifier,
    rows: &[StudentResult],
) -> EvaluationAggregate {
    let classified = classify_results(classifier, rows);

    let mut groups: BTreeMap<(String, Option<String>, &'static str), ClassGroup> =
        BTreeMap::new();
    for (row, student) in rows.iter().zip(&classified) {
        let info = classifier.table_info(
            row.grade.as_deref(),
            row.subject.as_deref(),
            row.course.as_deref(),
        );
        groups
            .entry((row.class_name.clone(), row.subject.clone(), info.table_name))
            .or_insert_with(|| ClassGroup {
                info,
                serie: row.grade.clone(),
                students: Vec::new(),
            })
            .students
            .push(student);
    }

    let turmas = groups
        .into_iter()
        .map(|((turma, disciplina, tabela), group)| {
            let stats = Summary::of(&group.students);
            let classificacao = group.info.classify_proficiency(stats.media_proficiencia);

            debug!(
                turma = %turma,
                alunos = group.students.len(),
                media_proficiencia = stats.media_proficiencia,
                table = tabela,
                "Class aggregated"
            );

            ClassAggregate {
                turma,
                disciplina,
                serie: group.serie,
                tabela,
                total_alunos: group.students.len(),
                media_nota: stats.media_nota,
                media_proficiencia: stats.media_proficiencia,
                desvio_proficiencia: stats.desvio_proficiencia,
                classificacao,
                distribuicao_classificacao: stats.distribuicao,
            }
        })
        .collect();

    let all: Vec<&ClassifiedStudent> = classified.iter().collect();
    let overall = Summary::of(&all);

    EvaluationAggregate {
        schema_version: 1,
        avaliacao_id: evaluation_id.to_string(),
        generated_at: Utc::now(),
        total_alunos: classified.len(),
        media_nota: overall.media_nota,
        media_proficiencia: overall.media_proficiencia,
        desvio_proficiencia: overall.desvio_proficiencia,
        distribuicao_classificacao: overall.distribuicao,
        turmas,
    }
}

struct ClassGroup<'a> {
    info: TableInfo,
    serie: Option<String>,
    students: Vec<&'a ClassifiedStudent>,
}

struct Summary {
    media_nota: f64,
    media_proficiencia: f64,
    desvio_proficiencia: f64,
    distribuicao: ClassificationDistribution,
}

impl Summary {
    fn of(students: &[&ClassifiedStudent]) -> Self {
        let notas: Vec<f64> = students.iter().map(|s| s.raw_score).collect();
        let proficiencias: Vec<f64> = students.iter().map(|s| s.proficiency_score).collect();

        let mut distribuicao = ClassificationDistribution::default();
        for s in students {
            distribuicao.record(s.proficiency_level);
        }

        let (media_proficiencia, desvio_proficiencia) = mean_and_stddev(&proficiencias);
        Self {
            media_nota: mean(&notas),
            media_proficiencia,
            desvio_proficiencia,
            distribuicao,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proficiency::ProficiencyLevel;

    fn row(id: &str, class_name: &str, grade: &str, subject: &str, raw_score: f64) -> StudentResult {
        StudentResult {
            student_id: id.to_string(),
            student_name: format!("Aluno {id}"),
            class_name: class_name.to_string(),
            grade: Some(grade.to_string()),
            subject: Some(subject.to_string()),
            course: None,
            raw_score,
            total_questions: 20,
        }
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate_results("av-1", &Classifier::default(), &[]);
        assert_eq!(agg.total_alunos, 0);
        assert_eq!(agg.media_nota, 0.0);
        assert_eq!(agg.media_proficiencia, 0.0);
        assert_eq!(agg.distribuicao_classificacao.total(), 0);
        assert!(agg.turmas.is_empty());
    }

    #[test]
    fn test_classify_results_per_row() {
        let rows = vec![
            row("1", "6A", "6º Ano", "História", 7.5),
            row("2", "5A", "5º Ano", "Matemática", 10.0),
        ];
        let classified = classify_results(&Classifier::default(), &rows);

        assert_eq!(classified[0].proficiency_score, 300.0);
        assert_eq!(classified[0].proficiency_level, ProficiencyLevel::Adequado);
        assert_eq!(classified[1].proficiency_score, 375.0);
        assert_eq!(classified[1].classification, "Avançado");
    }

    #[test]
    fn test_distribution_and_means() {
        // Anos Finais, non-math, max 400: 2.0 -> 80, 6.0 -> 240, 7.5 -> 300, 9.0 -> 360
        let rows = vec![
            row("1", "6A", "6º Ano", "Português", 2.0),
            row("2", "6A", "6º Ano", "Português", 6.0),
            row("3", "6A", "6º Ano", "Português", 7.5),
            row("4", "6A", "6º Ano", "Português", 9.0),
        ];
        let agg = aggregate_results("av-2", &Classifier::default(), &rows);

        assert_eq!(agg.total_alunos, 4);
        assert_eq!(
            agg.distribuicao_classificacao,
            ClassificationDistribution {
                abaixo_do_basico: 1,
                basico: 1,
                adequado: 1,
                avancado: 1,
            }
        );
        assert_eq!(agg.media_nota, 6.125);
        assert_eq!(agg.media_proficiencia, 245.0);

        assert_eq!(agg.turmas.len(), 1);
        let turma = &agg.turmas[0];
        assert_eq!(turma.turma, "6A");
        assert_eq!(turma.total_alunos, 4);
        // 245 falls in básico (200-274.99) for the Anos Finais table
        assert_eq!(turma.classificacao, ProficiencyLevel::Basico);
    }

    #[test]
    fn test_groups_by_class_and_subject() {
        let rows = vec![
            row("1", "5B", "5º Ano", "Matemática", 8.0),
            row("1", "5B", "5º Ano", "Português", 8.0),
            row("2", "5A", "5º Ano", "Matemática", 4.0),
        ];
        let agg = aggregate_results("av-3", &Classifier::default(), &rows);

        let keys: Vec<_> = agg
            .turmas
            .iter()
            .map(|t| (t.turma.as_str(), t.disciplina.as_deref()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("5A", Some("Matemática")),
                ("5B", Some("Matemática")),
                ("5B", Some("Português")),
            ]
        );

        // 8.0 on the early-grades math table (375) -> 300 -> avançado
        assert_eq!(agg.turmas[1].media_proficiencia, 300.0);
        assert_eq!(agg.turmas[1].classificacao, ProficiencyLevel::Avancado);
        // 8.0 on the early-grades general table (350) -> 280 -> avançado
        assert_eq!(agg.turmas[2].media_proficiencia, 280.0);
    }

    #[test]
    fn test_distribution_total_matches_rows() {
        let rows: Vec<_> = (0..=10)
            .map(|i| row(&i.to_string(), "9A", "9º Ano", "Matemática", i as f64))
            .collect();
        let agg = aggregate_results("av-4", &Classifier::default(), &rows);
        assert_eq!(agg.distribuicao_classificacao.total(), rows.len());
        assert_eq!(
            agg.turmas[0].distribuicao_classificacao.total(),
            rows.len()
        );
    }

    #[test]
    fn test_mixed_grade_class_split_by_table() {
        // Same class and subject, different stages: 5.0 -> 200 on the later-grades
        // table (básico from 200) and 175 on the early-grades table (básico from 150).
        let rows = vec![
            row("1", "Multi", "9º Ano", "Português", 5.0),
            row("2", "Multi", "5º Ano", "Português", 5.0),
        ];
        let agg = aggregate_results("av-5", &Classifier::default(), &rows);

        assert_eq!(agg.distribuicao_classificacao.basico, 2);
        assert_eq!(agg.turmas.len(), 2);

        let finais = &agg.turmas[0];
        assert_eq!(finais.tabela, "Anos Finais - Demais Disciplinas");
        assert_eq!(finais.serie.as_deref(), Some("9º Ano"));
        assert_eq!(finais.media_proficiencia, 200.0);
        assert_eq!(finais.classificacao, ProficiencyLevel::Basico);

        let iniciais = &agg.turmas[1];
        assert_eq!(iniciais.tabela, "Anos Iniciais - Demais Disciplinas");
        assert_eq!(iniciais.media_proficiencia, 175.0);
        assert_eq!(iniciais.classificacao, ProficiencyLevel::Basico);

        for turma in &agg.turmas {
            assert_eq!(turma.turma, "Multi");
            assert_eq!(turma.total_alunos, 1);
            assert_eq!(turma.distribuicao_classificacao.basico, 1);
        }
    }

    #[test]
    fn test_course_override_splits_class() {
        let mut overridden = row("2", "7C", "7º Ano", "Matemática", 6.0);
        overridden.course = Some("Anos Iniciais".to_string());
        let rows = vec![row("1", "7C", "7º Ano", "Matemática", 6.0), overridden];
        let agg = aggregate_results("av-6", &Classifier::default(), &rows);

        let tabelas: Vec<_> = agg.turmas.iter().map(|t| t.tabela).collect();
        assert_eq!(
            tabelas,
            vec!["Anos Finais - Matemática", "Anos Iniciais - Matemática"]
        );
        // 6.0 -> 255 on the 425 table, 225 on the 375 table
        assert_eq!(agg.turmas[0].media_proficiencia, 255.0);
        assert_eq!(agg.turmas[1].media_proficiencia, 225.0);
        assert_eq!(agg.turmas[1].classificacao, ProficiencyLevel::Adequado);
    }
}
