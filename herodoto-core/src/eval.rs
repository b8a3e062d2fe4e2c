//! # Avaliação com Validação Cruzada
//!
//! Cada sentença é predita exatamente uma vez por um modelo que NÃO a viu
//! no treino: o dataset é partido em `FOLDS` blocos contíguos, treina-se um
//! modelo por bloco sobre o complemento e prediz-se o bloco retido. As
//! predições remontadas preservam a ordem original das sentenças.
//!
//! Os folds não compartilham estado mutável — hiperparâmetros são lidos por
//! referência — então treinam em paralelo sem locking. Falha em qualquer
//! fold derruba a avaliação inteira: métricas parciais de validação cruzada
//! não significam nada.

use rayon::prelude::*;

use crate::config::RunContext;
use crate::crf::ChainCrf;
use crate::error::{HerodotoError, Result};
use crate::features::FeatureVector;
use crate::metrics::{classification_report, ClassificationReport};
use crate::model::{FeatureWeight, SequenceModel};
use crate::tagger::Tag;

/// Número de folds da validação cruzada. Fixo por projeto, sem flag.
pub const FOLDS: usize = 5;

/// Quantos pesos (feature, rótulo) entram no ranking diagnóstico.
pub const TOP_WEIGHTS: usize = 100;

/// Resultado consolidado da avaliação.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Predições out-of-fold, mesma forma e ordem do dataset.
    pub predictions: Vec<Vec<Tag>>,
    /// Relatório por rótulo + agregados sobre o fluxo achatado de tokens.
    pub report: ClassificationReport,
    /// Os `TOP_WEIGHTS` pesos de maior magnitude do modelo treinado no
    /// dataset inteiro. Diagnóstico apenas; não afeta métricas.
    pub top_weights: Vec<FeatureWeight>,
    /// Matriz de transição do mesmo modelo, indexada por [`Tag::index`].
    pub transitions: [[f64; Tag::COUNT]; Tag::COUNT],
}

/// Particiona `len` sentenças em `folds` blocos contíguos `[início, fim)`.
///
/// Os primeiros `len % folds` blocos levam um elemento a mais — a mesma
/// partição do KFold clássico sem embaralhamento. Cobre tudo, sem overlap.
pub fn kfold_ranges(len: usize, folds: usize) -> Vec<(usize, usize)> {
    let base = len / folds;
    let extra = len % folds;
    let mut ranges = Vec::with_capacity(folds);
    let mut start = 0;
    for fold in 0..folds {
        let size = base + usize::from(fold < extra);
        ranges.push((start, start + size));
        start += size;
    }
    ranges
}

/// Predição out-of-fold de todo o dataset.
///
/// `new_model` fabrica um modelo virgem por fold (os folds não podem
/// compartilhar estado treinado). Os folds rodam em paralelo; o primeiro
/// erro aborta tudo.
pub fn cross_val_predict<M, F>(
    new_model: F,
    features: &[Vec<FeatureVector>],
    labels: &[Vec<Tag>],
    folds: usize,
) -> Result<Vec<Vec<Tag>>>
where
    M: SequenceModel,
    F: Fn() -> M + Sync,
{
    if features.len() < folds {
        return Err(HerodotoError::Training(format!(
            "{} sentenças não bastam para {folds} folds",
            features.len()
        )));
    }

    let ranges = kfold_ranges(features.len(), folds);
    let fold_predictions: Vec<Vec<Vec<Tag>>> = ranges
        .par_iter()
        .map(|&(start, end)| {
            let mut train_x: Vec<Vec<FeatureVector>> =
                Vec::with_capacity(features.len() - (end - start));
            train_x.extend_from_slice(&features[..start]);
            train_x.extend_from_slice(&features[end..]);

            let mut train_y: Vec<Vec<Tag>> = Vec::with_capacity(train_x.len());
            train_y.extend_from_slice(&labels[..start]);
            train_y.extend_from_slice(&labels[end..]);

            let mut model = new_model();
            model.fit(&train_x, &train_y)?;
            let held_out = model.predict(&features[start..end])?;
            tracing::debug!(start, end, "fold predito");
            Ok(held_out)
        })
        .collect::<Result<_>>()?;

    // Blocos contíguos em ordem: concatenar devolve a ordem original
    Ok(fold_predictions.into_iter().flatten().collect())
}

/// Os `n` pesos de maior magnitude, em ordem decrescente.
///
/// Desempate total (magnitude, rótulo, nome) para a listagem ser
/// determinística apesar do mapa de pesos não ter ordem.
pub fn top_feature_weights(mut weights: Vec<FeatureWeight>, n: usize) -> Vec<FeatureWeight> {
    weights.sort_by(|a, b| {
        b.weight
            .abs()
            .partial_cmp(&a.weight.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.index().cmp(&b.label.index()))
            .then_with(|| a.feature.cmp(&b.feature))
    });
    weights.truncate(n);
    weights
}

/// Avaliação completa do contexto: modelo cheio para o diagnóstico de
/// pesos, validação cruzada para as métricas.
pub fn evaluate(ctx: &RunContext) -> Result<Evaluation> {
    let dataset = &ctx.dataset;

    tracing::info!(sentences = dataset.len(), "iniciando avaliação");

    // Modelo treinado no dataset inteiro: fonte dos pesos diagnósticos
    // (e prova de que o treinamento fecha antes de gastar 5 folds)
    let mut full = ChainCrf::new(ctx.model.clone());
    full.fit(&dataset.features, &dataset.labels)?;

    let predictions = cross_val_predict(
        || ChainCrf::new(ctx.model.clone()),
        &dataset.features,
        &dataset.labels,
        FOLDS,
    )?;

    let report = classification_report(&dataset.labels, &predictions);
    let top_weights = top_feature_weights(full.feature_weights(), TOP_WEIGHTS);

    Ok(Evaluation {
        predictions,
        report,
        top_weights,
        transitions: full.transitions(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend de mentira: devolve sempre o mesmo rótulo, preservando a
    /// forma da entrada. Suficiente para exercitar o laço de folds.
    struct ConstantModel(Tag);

    impl SequenceModel for ConstantModel {
        fn fit(&mut self, _: &[Vec<FeatureVector>], _: &[Vec<Tag>]) -> Result<()> {
            Ok(())
        }

        fn predict(&self, features: &[Vec<FeatureVector>]) -> Result<Vec<Vec<Tag>>> {
            Ok(features.iter().map(|xs| vec![self.0; xs.len()]).collect())
        }

        fn feature_weights(&self) -> Vec<FeatureWeight> {
            Vec::new()
        }
    }

    fn empty_fv() -> FeatureVector {
        crate::features::FeatureBuilder::new().finish()
    }

    #[test]
    fn test_kfold_cobre_tudo_sem_overlap() {
        for (len, folds) in [(10, 5), (13, 5), (5, 5), (101, 5)] {
            let ranges = kfold_ranges(len, folds);
            assert_eq!(ranges.len(), folds);
            assert_eq!(ranges[0].0, 0);
            assert_eq!(ranges[folds - 1].1, len);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].1, pair[1].0); // contíguos, sem buraco
            }
            // Tamanhos diferem em no máximo 1
            let sizes: Vec<usize> = ranges.iter().map(|(s, e)| e - s).collect();
            let min = sizes.iter().min().unwrap();
            let max = sizes.iter().max().unwrap();
            assert!(max - min <= 1);
        }
    }

    #[test]
    fn test_cross_val_preserva_forma_e_ordem() {
        // 7 sentenças com comprimentos distintos: a forma da saída denuncia
        // qualquer troca de ordem
        let features: Vec<Vec<FeatureVector>> =
            (1..=7).map(|n| vec![empty_fv(); n]).collect();
        let labels: Vec<Vec<Tag>> = (1..=7).map(|n| vec![Tag::Other; n]).collect();

        let pred =
            cross_val_predict(|| ConstantModel(Tag::Place), &features, &labels, FOLDS).unwrap();

        assert_eq!(pred.len(), labels.len());
        for (i, p) in pred.iter().enumerate() {
            assert_eq!(p.len(), labels[i].len());
            assert!(p.iter().all(|t| *t == Tag::Place));
        }
    }

    #[test]
    fn test_poucas_sentencas_e_erro() {
        let features: Vec<Vec<FeatureVector>> = vec![vec![empty_fv()]; 3];
        let labels: Vec<Vec<Tag>> = vec![vec![Tag::Other]; 3];
        let err = cross_val_predict(|| ConstantModel(Tag::Other), &features, &labels, FOLDS)
            .unwrap_err();
        assert!(matches!(err, HerodotoError::Training(_)));
    }

    #[test]
    fn test_top_weights_ordena_por_magnitude() {
        let weights = vec![
            FeatureWeight {
                feature: "a".into(),
                label: Tag::Place,
                weight: 0.5,
            },
            FeatureWeight {
                feature: "b".into(),
                label: Tag::Other,
                weight: -2.0,
            },
            FeatureWeight {
                feature: "c".into(),
                label: Tag::Ethnic,
                weight: 1.0,
            },
        ];
        let top = top_feature_weights(weights, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].feature, "b");
        assert_eq!(top[1].feature, "c");
    }
}
