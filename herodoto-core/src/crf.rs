//! # Cadeia Linear — Backend Padrão do Modelo Sequencial
//!
//! Modelo discriminativo log-linear sobre sequências: cada rótulo é
//! condicionado conjuntamente às features observadas da posição e ao rótulo
//! vizinho, via pesos de emissão esparsos e uma matriz densa de transição.
//!
//! ## Estrutura
//!
//! ```text
//! score(y, x) = Σ_i [ emissao(y_i, x_i) + transicao(y_{i-1}, y_i) ]
//! P(y|x)      = exp(score(y, x)) / Z(x)
//! ```
//!
//! - `emissao(t, x_i) = Σ_k w_{k,t} · f_k(x_i)` — mapa esparso
//!   `(feature, rótulo) → peso`, como nos demais modelos lineares do crate;
//! - `transicao` — matriz `T × T` indexada por [`Tag::index`].
//!
//! ## Treinamento
//!
//! Gradiente estocástico por sentença sobre a log-verossimilhança
//! condicional: as marginais unárias e de pares vêm do forward–backward em
//! espaço log, o gradiente é "observado menos esperado". Ao fim de cada
//! época os pesos sofrem encolhimento elastic net dirigido por `c1`/`c2` e
//! os que ficam abaixo do limiar de poda são removidos (esparsidade). O
//! laço para cedo quando a perda média converge; perda não-finita é falha
//! fatal de treinamento.
//!
//! Tudo determinístico: ordem fixa de iteração, sem embaralhamento, empates
//! do Viterbi pelo índice do rótulo.

use std::collections::HashMap;

use crate::error::{HerodotoError, Result};
use crate::features::FeatureVector;
use crate::model::{FeatureWeight, ModelConfig, SequenceModel};
use crate::tagger::Tag;
use crate::viterbi::viterbi_decode;

/// Taxa de aprendizado do SGD. Constante: com features binárias e dados na
/// casa dos milhares de sentenças, um passo fixo converge sem agenda.
const LEARNING_RATE: f64 = 0.1;

/// Variação mínima da perda média por sentença para seguir treinando.
const TOLERANCE: f64 = 1e-4;

/// Pesos com magnitude abaixo disso são removidos do mapa esparso.
const PRUNE_THRESHOLD: f64 = 1e-9;

/// Cadeia linear com pesos de emissão esparsos e matriz de transição.
#[derive(Debug, Clone)]
pub struct ChainCrf {
    config: ModelConfig,
    emission: HashMap<(String, Tag), f64>,
    transition: [[f64; Tag::COUNT]; Tag::COUNT],
    trained: bool,
}

impl ChainCrf {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            emission: HashMap::new(),
            transition: [[0.0; Tag::COUNT]; Tag::COUNT],
            trained: false,
        }
    }

    /// Matriz de transição aprendida, indexada por [`Tag::index`].
    pub fn transitions(&self) -> [[f64; Tag::COUNT]; Tag::COUNT] {
        self.transition
    }

    /// Scores de emissão de um token para todos os rótulos.
    fn emission_scores(&self, fv: &FeatureVector) -> [f64; Tag::COUNT] {
        let mut scores = [0.0; Tag::COUNT];
        for (name, value) in fv.iter() {
            for tag in Tag::all() {
                if let Some(w) = self.emission.get(&(name.clone(), tag)) {
                    scores[tag.index()] += w * value;
                }
            }
        }
        scores
    }

    fn sentence_emissions(&self, xs: &[FeatureVector]) -> Vec<[f64; Tag::COUNT]> {
        xs.iter().map(|fv| self.emission_scores(fv)).collect()
    }

    /// Uma época de SGD; retorna a log-verossimilhança média por sentença.
    fn sgd_epoch(&mut self, features: &[Vec<FeatureVector>], labels: &[Vec<Tag>]) -> f64 {
        let tags = Tag::all();
        let mut total_ll = 0.0;
        let mut seen = 0usize;

        for (xs, ys) in features.iter().zip(labels.iter()) {
            let n = xs.len();
            if n == 0 {
                continue;
            }
            seen += 1;

            // Snapshot dos parâmetros desta sentença: as marginais precisam
            // ser coerentes entre si mesmo com os pesos mudando no laço
            let trans = self.transition;
            let emissions = self.sentence_emissions(xs);

            // Forward em espaço log
            let mut alpha = vec![[0.0f64; Tag::COUNT]; n];
            alpha[0] = emissions[0];
            for i in 1..n {
                for t in 0..Tag::COUNT {
                    let mut acc = [0.0f64; Tag::COUNT];
                    for p in 0..Tag::COUNT {
                        acc[p] = alpha[i - 1][p] + trans[p][t];
                    }
                    alpha[i][t] = emissions[i][t] + log_sum_exp(&acc);
                }
            }

            // Backward
            let mut beta = vec![[0.0f64; Tag::COUNT]; n];
            for i in (0..n - 1).rev() {
                for t in 0..Tag::COUNT {
                    let mut acc = [0.0f64; Tag::COUNT];
                    for b in 0..Tag::COUNT {
                        acc[b] = trans[t][b] + emissions[i + 1][b] + beta[i + 1][b];
                    }
                    beta[i][t] = log_sum_exp(&acc);
                }
            }

            let log_z = log_sum_exp(&alpha[n - 1]);

            // Score do caminho ouro
            let mut gold = emissions[0][ys[0].index()];
            for i in 1..n {
                gold += trans[ys[i - 1].index()][ys[i].index()] + emissions[i][ys[i].index()];
            }
            total_ll += gold - log_z;

            // Gradiente: observado menos esperado
            for i in 0..n {
                let mut marginal = [0.0f64; Tag::COUNT];
                for t in 0..Tag::COUNT {
                    marginal[t] = (alpha[i][t] + beta[i][t] - log_z).exp();
                }
                let gold_idx = ys[i].index();

                for (name, value) in xs[i].iter() {
                    for t in 0..Tag::COUNT {
                        let mut delta = -LEARNING_RATE * value * marginal[t];
                        if t == gold_idx {
                            delta += LEARNING_RATE * value;
                        }
                        if delta != 0.0 {
                            *self
                                .emission
                                .entry((name.clone(), tags[t]))
                                .or_insert(0.0) += delta;
                        }
                    }
                }

                if i > 0 {
                    self.transition[ys[i - 1].index()][gold_idx] += LEARNING_RATE;
                    for a in 0..Tag::COUNT {
                        for b in 0..Tag::COUNT {
                            let pair = (alpha[i - 1][a]
                                + trans[a][b]
                                + emissions[i][b]
                                + beta[i][b]
                                - log_z)
                                .exp();
                            self.transition[a][b] -= LEARNING_RATE * pair;
                        }
                    }
                }
            }
        }

        if seen == 0 {
            0.0
        } else {
            total_ll / seen as f64
        }
    }

    /// Encolhimento elastic net ao fim da época + poda dos pesos ínfimos.
    fn regularize(&mut self) {
        let l2_factor = 1.0 - LEARNING_RATE * 2.0 * self.config.c2;
        let l1_step = LEARNING_RATE * self.config.c1;

        for w in self.emission.values_mut() {
            *w = soft_threshold(*w * l2_factor, l1_step);
        }
        self.emission.retain(|_, w| w.abs() > PRUNE_THRESHOLD);

        for row in self.transition.iter_mut() {
            for w in row.iter_mut() {
                *w = soft_threshold(*w * l2_factor, l1_step);
            }
        }
    }
}

impl SequenceModel for ChainCrf {
    fn fit(&mut self, features: &[Vec<FeatureVector>], labels: &[Vec<Tag>]) -> Result<()> {
        if features.is_empty() {
            return Err(HerodotoError::Training(
                "dataset vazio: nenhuma sentença para treinar".to_string(),
            ));
        }
        if features.len() != labels.len() {
            return Err(HerodotoError::Training(format!(
                "{} sequências de features para {} de rótulos",
                features.len(),
                labels.len()
            )));
        }
        for (i, (xs, ys)) in features.iter().zip(labels.iter()).enumerate() {
            if xs.len() != ys.len() {
                return Err(HerodotoError::Training(format!(
                    "sentença {i}: {} tokens com {} rótulos",
                    xs.len(),
                    ys.len()
                )));
            }
        }

        let mut previous = f64::NEG_INFINITY;
        for epoch in 0..self.config.max_iterations {
            let avg_ll = self.sgd_epoch(features, labels);
            self.regularize();

            if !avg_ll.is_finite() {
                return Err(HerodotoError::Training(format!(
                    "perda não-finita na época {epoch}"
                )));
            }
            tracing::debug!(epoch, avg_ll, "época concluída");

            if (avg_ll - previous).abs() < TOLERANCE {
                tracing::debug!(epoch, "perda convergiu, parada antecipada");
                break;
            }
            previous = avg_ll;
        }

        self.trained = true;
        Ok(())
    }

    fn predict(&self, features: &[Vec<FeatureVector>]) -> Result<Vec<Vec<Tag>>> {
        if !self.trained {
            return Err(HerodotoError::Training(
                "predict chamado antes de fit".to_string(),
            ));
        }
        Ok(features
            .iter()
            .map(|xs| viterbi_decode(&self.sentence_emissions(xs), &self.transition))
            .collect())
    }

    fn feature_weights(&self) -> Vec<FeatureWeight> {
        self.emission
            .iter()
            .map(|((feature, label), weight)| FeatureWeight {
                feature: feature.clone(),
                label: *label,
                weight: *weight,
            })
            .collect()
    }
}

fn log_sum_exp(values: &[f64; Tag::COUNT]) -> f64 {
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

fn soft_threshold(w: f64, step: f64) -> f64 {
    if w > step {
        w - step
    } else if w < -step {
        w + step
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::sentence_features;
    use crate::tagger::{Sentence, Token};

    fn sentence(pairs: &[(&str, &str, Tag)]) -> (Vec<FeatureVector>, Vec<Tag>) {
        let s = Sentence {
            tokens: pairs
                .iter()
                .map(|(form, pos, tag)| Token {
                    form: form.to_string(),
                    pos: pos.to_string(),
                    tag: *tag,
                })
                .collect(),
        };
        (sentence_features(&s), s.labels())
    }

    fn tiny_config() -> ModelConfig {
        ModelConfig {
            c1: 0.0,
            c2: 0.0,
            max_iterations: 30,
        }
    }

    fn training_data() -> (Vec<Vec<FeatureVector>>, Vec<Vec<Tag>>) {
        let corpus = vec![
            sentence(&[
                ("Ἀθῆναι", "NOUN", Tag::Place),
                ("esti", "VERB", Tag::Other),
            ]),
            sentence(&[
                ("Πέρσαι", "NOUN", Tag::Ethnic),
                ("idein", "VERB", Tag::Other),
            ]),
            sentence(&[
                ("esti", "VERB", Tag::Other),
                ("Ἀθῆναι", "NOUN", Tag::Place),
            ]),
        ];
        corpus.into_iter().unzip()
    }

    #[test]
    fn test_aprende_padrao_trivial() {
        let (xs, ys) = training_data();
        let mut model = ChainCrf::new(tiny_config());
        model.fit(&xs, &ys).unwrap();

        // As formas vistas no treino devem voltar com seus rótulos
        let pred = model.predict(&xs).unwrap();
        assert_eq!(pred, ys);
    }

    #[test]
    fn test_predicao_preserva_forma() {
        let (xs, ys) = training_data();
        let mut model = ChainCrf::new(tiny_config());
        model.fit(&xs, &ys).unwrap();

        let pred = model.predict(&xs).unwrap();
        assert_eq!(pred.len(), xs.len());
        for (p, x) in pred.iter().zip(xs.iter()) {
            assert_eq!(p.len(), x.len());
        }
    }

    #[test]
    fn test_dataset_vazio_e_erro() {
        let mut model = ChainCrf::new(tiny_config());
        let err = model.fit(&[], &[]).unwrap_err();
        assert!(matches!(err, HerodotoError::Training(_)));
    }

    #[test]
    fn test_sequencias_desalinhadas_sao_erro() {
        let (xs, _) = training_data();
        let mut model = ChainCrf::new(tiny_config());
        let bad_labels = vec![vec![Tag::Other]; xs.len()];
        let err = model.fit(&xs, &bad_labels).unwrap_err();
        assert!(matches!(err, HerodotoError::Training(_)));
    }

    #[test]
    fn test_predict_antes_de_fit_e_erro() {
        let (xs, _) = training_data();
        let model = ChainCrf::new(tiny_config());
        let err = model.predict(&xs).unwrap_err();
        assert!(matches!(err, HerodotoError::Training(_)));
    }

    #[test]
    fn test_pesos_diagnosticos_nao_vazios() {
        let (xs, ys) = training_data();
        let mut model = ChainCrf::new(tiny_config());
        model.fit(&xs, &ys).unwrap();
        let weights = model.feature_weights();
        assert!(!weights.is_empty());
        assert!(weights.iter().all(|w| w.weight.is_finite()));
    }

    #[test]
    fn test_regularizacao_poda_pesos() {
        let (xs, ys) = training_data();
        let mut model = ChainCrf::new(ModelConfig {
            c1: 10.0, // L1 brutal: depois do encolhimento não deve sobrar nada
            c2: 0.0,
            max_iterations: 1,
        });
        model.fit(&xs, &ys).unwrap();
        assert!(model.feature_weights().is_empty());
    }

    #[test]
    fn test_log_sum_exp_estavel() {
        let v = [1000.0, 1000.0, 1000.0];
        let lse = log_sum_exp(&v);
        assert!((lse - (1000.0 + 3.0f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_soft_threshold() {
        assert_eq!(soft_threshold(0.5, 0.1), 0.4);
        assert_eq!(soft_threshold(-0.5, 0.1), -0.4);
        assert_eq!(soft_threshold(0.05, 0.1), 0.0);
    }
}
