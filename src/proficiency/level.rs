//! Educational stage and subject resolution.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Coarse grouping of grades used to pick a proficiency table.
///
/// Only [`EducationalLevel::AnosIniciais`] selects the early-grades tables;
/// `AnosFinais` and `EnsinoMedio` share the later-grades tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationalLevel {
    #[serde(rename = "Anos Iniciais")]
    AnosIniciais,
    #[serde(rename = "Anos Finais")]
    AnosFinais,
    #[serde(rename = "Ensino Médio", alias = "Ensino Medio")]
    EnsinoMedio,
}

impl EducationalLevel {
    pub fn label(&self) -> &'static str {
        match self {
            EducationalLevel::AnosIniciais => "Anos Iniciais",
            EducationalLevel::AnosFinais => "Anos Finais",
            EducationalLevel::EnsinoMedio => "Ensino Médio",
        }
    }

    pub fn is_early_grades(&self) -> bool {
        matches!(self, EducationalLevel::AnosIniciais)
    }

    /// Interprets a course label passed as an explicit override.
    ///
    /// Anything that is not `"Anos Iniciais"` lands on the later-grades branch,
    /// so unknown labels resolve to [`EducationalLevel::AnosFinais`].
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Anos Iniciais" => EducationalLevel::AnosIniciais,
            "Ensino Médio" | "Ensino Medio" => EducationalLevel::EnsinoMedio,
            _ => EducationalLevel::AnosFinais,
        }
    }
}

/// Which column of the table matrix a subject falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SubjectClass {
    #[serde(rename = "Matemática")]
    Mathematics,
    #[serde(rename = "Demais Disciplinas")]
    Other,
}

impl SubjectClass {
    /// Case-insensitive match on `matemática`/`matematica` substrings or an exact `math`.
    pub fn from_subject(subject: Option<&str>) -> Self {
        let Some(subject) = subject else {
            return SubjectClass::Other;
        };
        let s = subject.trim().to_lowercase();
        if s.contains("matemática") || s.contains("matematica") || s == "math" {
            SubjectClass::Mathematics
        } else {
            SubjectClass::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubjectClass::Mathematics => "Matemática",
            SubjectClass::Other => "Demais Disciplinas",
        }
    }
}

/// Built-in grade labels and the stage each one belongs to.
static GRADES: &[(&str, EducationalLevel)] = &[
    ("Educação Infantil", EducationalLevel::AnosIniciais),
    ("Pré-Escola", EducationalLevel::AnosIniciais),
    ("1º Ano", EducationalLevel::AnosIniciais),
    ("2º Ano", EducationalLevel::AnosIniciais),
    ("3º Ano", EducationalLevel::AnosIniciais),
    ("4º Ano", EducationalLevel::AnosIniciais),
    ("5º Ano", EducationalLevel::AnosIniciais),
    ("6º Ano", EducationalLevel::AnosFinais),
    ("7º Ano", EducationalLevel::AnosFinais),
    ("8º Ano", EducationalLevel::AnosFinais),
    ("9º Ano", EducationalLevel::AnosFinais),
    ("1º Ano EM", EducationalLevel::EnsinoMedio),
    ("2º Ano EM", EducationalLevel::EnsinoMedio),
    ("3º Ano EM", EducationalLevel::EnsinoMedio),
    ("1ª Série", EducationalLevel::EnsinoMedio),
    ("2ª Série", EducationalLevel::EnsinoMedio),
    ("3ª Série", EducationalLevel::EnsinoMedio),
];

/// Grade label to [`EducationalLevel`] lookup.
///
/// Starts from the built-in table; [`GradeMap::with_overrides`] layers
/// additional or replacement entries on top (see `config::GradeMapConfig`).
#[derive(Debug, Clone)]
pub struct GradeMap {
    entries: HashMap<String, EducationalLevel>,
}

impl Default for GradeMap {
    fn default() -> Self {
        Self {
            entries: GRADES
                .iter()
                .map(|(grade, level)| (grade.to_string(), *level))
                .collect(),
        }
    }
}

impl GradeMap {
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, EducationalLevel)>,
    {
        for (grade, level) in overrides {
            self.entries.insert(grade.trim().to_string(), level);
        }
        self
    }

    pub fn get(&self, grade: &str) -> Option<EducationalLevel> {
        self.entries.get(grade.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
