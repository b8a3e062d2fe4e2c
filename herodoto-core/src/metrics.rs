//! # Métricas de Classificação por Token
//!
//! Precisão, revocação, F1 e suporte por rótulo sobre o fluxo achatado de
//! tokens, mais os agregados micro (= acurácia, já que todo token recebe
//! exatamente um rótulo), macro (média simples) e ponderado por suporte.
//! Denominador zero rende 0.0 — sem NaN no relatório.

use serde::{Deserialize, Serialize};

use crate::tagger::Tag;

/// Métricas de um rótulo (ou de uma linha agregada).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Relatório completo: uma linha por rótulo + agregados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Linhas por rótulo, ordenadas pela forma textual ("0" < "ethnic" < "place").
    pub rows: Vec<LabelMetrics>,
    /// Agregado micro: fração de tokens com rótulo previsto correto.
    pub accuracy: f64,
    /// Média simples das métricas por rótulo.
    pub macro_avg: LabelMetrics,
    /// Média ponderada pelo suporte de cada rótulo.
    pub weighted_avg: LabelMetrics,
    /// Total de tokens avaliados.
    pub total_support: usize,
}

/// Computa o relatório a partir das sequências reais e previstas.
///
/// As duas coleções devem ter a mesma forma (mesmo número de sentenças e
/// mesmos comprimentos); posições além do comprimento comum seriam bug do
/// chamador e são ignoradas pelo zip.
pub fn classification_report(actual: &[Vec<Tag>], predicted: &[Vec<Tag>]) -> ClassificationReport {
    let mut tp = [0usize; Tag::COUNT];
    let mut fp = [0usize; Tag::COUNT];
    let mut fn_ = [0usize; Tag::COUNT];
    let mut support = [0usize; Tag::COUNT];
    let mut correct = 0usize;
    let mut total = 0usize;

    for (ys, ps) in actual.iter().zip(predicted.iter()) {
        for (y, p) in ys.iter().zip(ps.iter()) {
            total += 1;
            support[y.index()] += 1;
            if y == p {
                correct += 1;
                tp[y.index()] += 1;
            } else {
                fp[p.index()] += 1;
                fn_[y.index()] += 1;
            }
        }
    }

    let mut rows: Vec<LabelMetrics> = Tag::all()
        .into_iter()
        .map(|tag| {
            let i = tag.index();
            let precision = ratio(tp[i], tp[i] + fp[i]);
            let recall = ratio(tp[i], tp[i] + fn_[i]);
            LabelMetrics {
                label: tag.label().to_string(),
                precision,
                recall,
                f1: f1(precision, recall),
                support: support[i],
            }
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));

    let count = rows.len() as f64;
    let macro_avg = LabelMetrics {
        label: "macro avg".to_string(),
        precision: rows.iter().map(|r| r.precision).sum::<f64>() / count,
        recall: rows.iter().map(|r| r.recall).sum::<f64>() / count,
        f1: rows.iter().map(|r| r.f1).sum::<f64>() / count,
        support: total,
    };

    let weight = |get: fn(&LabelMetrics) -> f64| -> f64 {
        if total == 0 {
            0.0
        } else {
            rows.iter().map(|r| get(r) * r.support as f64).sum::<f64>() / total as f64
        }
    };
    let weighted_avg = LabelMetrics {
        label: "weighted avg".to_string(),
        precision: weight(|r| r.precision),
        recall: weight(|r| r.recall),
        f1: weight(|r| r.f1),
        support: total,
    };

    ClassificationReport {
        rows,
        accuracy: ratio(correct, total),
        macro_avg,
        weighted_avg,
        total_support: total,
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Tabela alinhada no formato clássico dos relatórios de classificação.
impl std::fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>14} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                row.label, row.precision, row.recall, row.f1, row.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>9} {:>9} {:>9.4} {:>9}",
            "accuracy", "", "", self.accuracy, self.total_support
        )?;
        for row in [&self.macro_avg, &self.weighted_avg] {
            writeln!(
                f,
                "{:>14} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                row.label, row.precision, row.recall, row.f1, row.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relatorio_caso_perfeito() {
        let actual = vec![vec![Tag::Place, Tag::Other], vec![Tag::Ethnic]];
        let report = classification_report(&actual, &actual);

        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.total_support, 3);
        for row in &report.rows {
            if row.support > 0 {
                assert_eq!(row.precision, 1.0);
                assert_eq!(row.recall, 1.0);
                assert_eq!(row.f1, 1.0);
            }
        }
    }

    #[test]
    fn test_relatorio_caso_conferido_a_mao() {
        // 4 tokens: place previsto como ethnic uma vez, resto correto
        let actual = vec![vec![Tag::Place, Tag::Place, Tag::Other, Tag::Ethnic]];
        let predicted = vec![vec![Tag::Place, Tag::Ethnic, Tag::Other, Tag::Ethnic]];
        let report = classification_report(&actual, &predicted);

        assert_eq!(report.accuracy, 0.75);

        let place = report.rows.iter().find(|r| r.label == "place").unwrap();
        assert_eq!(place.support, 2);
        assert_eq!(place.precision, 1.0); // 1 previsto, 1 certo
        assert_eq!(place.recall, 0.5); // 2 reais, 1 recuperado

        let ethnic = report.rows.iter().find(|r| r.label == "ethnic").unwrap();
        assert_eq!(ethnic.precision, 0.5); // 2 previstos, 1 certo
        assert_eq!(ethnic.recall, 1.0);
    }

    #[test]
    fn test_rotulo_sem_ocorrencia_rende_zeros() {
        let actual = vec![vec![Tag::Other, Tag::Other]];
        let report = classification_report(&actual, &actual);
        let place = report.rows.iter().find(|r| r.label == "place").unwrap();
        assert_eq!(place.precision, 0.0);
        assert_eq!(place.recall, 0.0);
        assert_eq!(place.f1, 0.0);
        assert_eq!(place.support, 0);
    }

    #[test]
    fn test_linhas_ordenadas_pela_forma_textual() {
        let actual = vec![vec![Tag::Place]];
        let report = classification_report(&actual, &actual);
        let labels: Vec<&str> = report.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "ethnic", "place"]);
    }

    #[test]
    fn test_micro_e_acuracia() {
        let actual = vec![vec![Tag::Place, Tag::Other, Tag::Ethnic, Tag::Other]];
        let predicted = vec![vec![Tag::Other, Tag::Other, Tag::Ethnic, Tag::Place]];
        let report = classification_report(&actual, &predicted);
        assert_eq!(report.accuracy, 0.5);
    }
}
