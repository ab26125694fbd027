//! Proficiency levels and the banding tables they are read from.

use serde::Serialize;

/// Four ordered qualitative bands, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    AbaixoDoBasico,
    Basico,
    Adequado,
    Avancado,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 4] = [
        ProficiencyLevel::AbaixoDoBasico,
        ProficiencyLevel::Basico,
        ProficiencyLevel::Adequado,
        ProficiencyLevel::Avancado,
    ];

    /// Key used on the wire (`abaixo_do_basico`, `basico`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            ProficiencyLevel::AbaixoDoBasico => "abaixo_do_basico",
            ProficiencyLevel::Basico => "basico",
            ProficiencyLevel::Adequado => "adequado",
            ProficiencyLevel::Avancado => "avancado",
        }
    }

    /// Portuguese display label.
    pub fn label(&self) -> &'static str {
        match self {
            ProficiencyLevel::AbaixoDoBasico => "Abaixo do Básico",
            ProficiencyLevel::Basico => "Básico",
            ProficiencyLevel::Adequado => "Adequado",
            ProficiencyLevel::Avancado => "Avançado",
        }
    }
}

/// Inclusive score range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProficiencyBand {
    pub min: f64,
    pub max: f64,
}

const fn band(min: f64, max: f64) -> ProficiencyBand {
    ProficiencyBand { min, max }
}

/// Four contiguous bands covering `0..=max_proficiency`.
///
/// Non-final ceilings use `.99` cutoffs so that non-integer scores
/// never fall between two bands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProficiencyTable {
    pub abaixo_do_basico: ProficiencyBand,
    pub basico: ProficiencyBand,
    pub adequado: ProficiencyBand,
    pub avancado: ProficiencyBand,
    pub max_proficiency: f64,
}

impl ProficiencyTable {
    pub fn band(&self, level: ProficiencyLevel) -> &ProficiencyBand {
        match level {
            ProficiencyLevel::AbaixoDoBasico => &self.abaixo_do_basico,
            ProficiencyLevel::Basico => &self.basico,
            ProficiencyLevel::Adequado => &self.adequado,
            ProficiencyLevel::Avancado => &self.avancado,
        }
    }

    /// Bands in ascending order.
    pub fn bands(&self) -> impl Iterator<Item = (ProficiencyLevel, &ProficiencyBand)> {
        ProficiencyLevel::ALL
            .into_iter()
            .map(move |level| (level, self.band(level)))
    }

    /// Returns the first level whose ceiling is not exceeded by `score`.
    ///
    /// Scores above the table ceiling (raw scores over 10) fall through to
    /// [`ProficiencyLevel::Avancado`]; negative scores land in the lowest band.
    pub fn classify(&self, score: f64) -> ProficiencyLevel {
        self.bands()
            .find(|(_, band)| band.max >= score)
            .map(|(level, _)| level)
            .unwrap_or(ProficiencyLevel::Avancado)
    }
}

/// Anos Iniciais, Língua Portuguesa and the other non-math subjects. P.M. 350.
pub static ANOS_INICIAIS_GERAL: ProficiencyTable = ProficiencyTable {
    abaixo_do_basico: band(0.0, 149.99),
    basico: band(150.0, 199.99),
    adequado: band(200.0, 249.99),
    avancado: band(250.0, 350.0),
    max_proficiency: 350.0,
};

/// Anos Iniciais, Matemática. P.M. 375.
pub static ANOS_INICIAIS_MATEMATICA: ProficiencyTable = ProficiencyTable {
    abaixo_do_basico: band(0.0, 174.99),
    basico: band(175.0, 224.99),
    adequado: band(225.0, 274.99),
    avancado: band(275.0, 375.0),
    max_proficiency: 375.0,
};

/// Anos Finais and Ensino Médio, non-math subjects. P.M. 400.
pub static ANOS_FINAIS_GERAL: ProficiencyTable = ProficiencyTable {
    abaixo_do_basico: band(0.0, 199.99),
    basico: band(200.0, 274.99),
    adequado: band(275.0, 324.99),
    avancado: band(325.0, 400.0),
    max_proficiency: 400.0,
};

/// Anos Finais and Ensino Médio, Matemática. P.M. 425.
pub static ANOS_FINAIS_MATEMATICA: ProficiencyTable = ProficiencyTable {
    abaixo_do_basico: band(0.0, 224.99),
    basico: band(225.0, 299.99),
    adequado: band(300.0, 349.99),
    avancado: band(350.0, 425.0),
    max_proficiency: 425.0,
};

/// A table together with its display name.
#[derive(Debug, Serialize)]
pub struct NamedTable {
    pub name: &'static str,
    pub table: &'static ProficiencyTable,
}

/// Every table classification can select, early grades first.
pub fn all_tables() -> Vec<NamedTable> {
    vec![
        NamedTable {
            name: "Anos Iniciais - Demais Disciplinas",
            table: &ANOS_INICIAIS_GERAL,
        },
        NamedTable {
            name: "Anos Iniciais - Matemática",
            table: &ANOS_INICIAIS_MATEMATICA,
        },
        NamedTable {
            name: "Anos Finais - Demais Disciplinas",
            table: &ANOS_FINAIS_GERAL,
        },
        NamedTable {
            name: "Anos Finais - Matemática",
            table: &ANOS_FINAIS_MATEMATICA,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_contiguous_and_cover_full_range() {
        for named in all_tables() {
            let t = named.table;
            let bands: Vec<_> = t.bands().map(|(_, b)| *b).collect();

            assert_eq!(bands[0].min, 0.0, "{}", named.name);
            assert_eq!(bands[3].max, t.max_proficiency, "{}", named.name);

            for b in &bands {
                assert!(b.min < b.max, "{}: empty band {:?}", named.name, b);
            }
            for pair in bands.windows(2) {
                let gap = pair[1].min - pair[0].max;
                assert!(gap > 0.0, "{}: overlapping bands {:?}", named.name, pair);
                assert!(gap <= 0.011, "{}: hole between bands {:?}", named.name, pair);
            }
        }
    }

    #[test]
    fn test_max_proficiency_constants() {
        assert_eq!(ANOS_INICIAIS_GERAL.max_proficiency, 350.0);
        assert_eq!(ANOS_INICIAIS_MATEMATICA.max_proficiency, 375.0);
        assert_eq!(ANOS_FINAIS_GERAL.max_proficiency, 400.0);
        assert_eq!(ANOS_FINAIS_MATEMATICA.max_proficiency, 425.0);
    }

    #[test]
    fn test_classify_boundaries() {
        let t = &ANOS_INICIAIS_GERAL;
        assert_eq!(t.classify(0.0), ProficiencyLevel::AbaixoDoBasico);
        assert_eq!(t.classify(149.0), ProficiencyLevel::AbaixoDoBasico);
        assert_eq!(t.classify(149.99), ProficiencyLevel::AbaixoDoBasico);
        assert_eq!(t.classify(150.0), ProficiencyLevel::Basico);
        assert_eq!(t.classify(199.99), ProficiencyLevel::Basico);
        assert_eq!(t.classify(200.0), ProficiencyLevel::Adequado);
        assert_eq!(t.classify(250.0), ProficiencyLevel::Avancado);
        assert_eq!(t.classify(350.0), ProficiencyLevel::Avancado);
    }

    #[test]
    fn test_classify_out_of_range() {
        let t = &ANOS_FINAIS_MATEMATICA;
        assert_eq!(t.classify(-42.0), ProficiencyLevel::AbaixoDoBasico);
        assert_eq!(t.classify(510.0), ProficiencyLevel::Avancado);
    }

    #[test]
    fn test_all_tables_lists_only_selectable_tables() {
        let maxima: Vec<f64> = all_tables()
            .iter()
            .map(|t| t.table.max_proficiency)
            .collect();
        assert_eq!(maxima, vec![350.0, 375.0, 400.0, 425.0]);
    }

    #[test]
    fn test_level_order_and_labels() {
        assert!(ProficiencyLevel::AbaixoDoBasico < ProficiencyLevel::Basico);
        assert!(ProficiencyLevel::Basico < ProficiencyLevel::Adequado);
        assert!(ProficiencyLevel::Adequado < ProficiencyLevel::Avancado);
        assert_eq!(ProficiencyLevel::Avancado.label(), "Avançado");
        assert_eq!(
            serde_json::to_string(&ProficiencyLevel::AbaixoDoBasico).unwrap(),
            "\"abaixo_do_basico\""
        );
    }
}
