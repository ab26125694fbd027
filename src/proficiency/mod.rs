//! Proficiency scoring and classification.
//!
//! A raw 0-10 score is rescaled onto one of four tables, chosen by
//! educational stage (early vs. later grades) and subject (mathematics vs.
//! everything else), then banded into one of four ordered levels.

pub mod classifier;
pub mod level;
pub mod table;

pub use classifier::{
    Classifier, ProficiencyResult, TableInfo, classify, default_classifier, table_info,
};
pub use level::{EducationalLevel, GradeMap, SubjectClass};
pub use table::{ProficiencyBand, ProficiencyLevel, ProficiencyTable, all_tables};
