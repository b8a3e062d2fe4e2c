//! # Capacidade de Modelo Sequencial
//!
//! O pipeline trata o classificador estruturado como uma capacidade
//! plugável: quem avalia e reporta só conhece `fit` e `predict`. A
//! implementação padrão é a cadeia linear de [`crate::crf`]; backends
//! alternativos entram por este trait sem tocar extração de features nem
//! relatórios.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::features::FeatureVector;
use crate::tagger::Tag;

/// Hiperparâmetros do modelo sequencial.
///
/// Os defaults (0.1, 0.1, 100) são constantes de projeto: o núcleo não os
/// re-ajusta nem os expõe em flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Força da regularização L1 (esparsifica os pesos).
    pub c1: f64,
    /// Força da regularização L2 (encolhe os pesos).
    pub c2: f64,
    /// Máximo de épocas de treinamento.
    pub max_iterations: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            c1: 0.1,
            c2: 0.1,
            max_iterations: 100,
        }
    }
}

/// Um peso aprendido (feature, rótulo) — material de inspeção diagnóstica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub label: Tag,
    pub weight: f64,
}

/// Contrato do classificador de sequências.
///
/// `predict` preserva a quantidade de sentenças, a ordem e o comprimento de
/// cada uma: `predict(x)[i].len() == x[i].len()` para todo `i`.
pub trait SequenceModel {
    /// Treina sobre pares (features, rótulos) alinhados 1:1 por sentença.
    /// Sequências desalinhadas ou dataset vazio são
    /// [`crate::error::HerodotoError::Training`].
    fn fit(&mut self, features: &[Vec<FeatureVector>], labels: &[Vec<Tag>]) -> Result<()>;

    /// Prediz uma sequência de rótulos por sentença, na ordem de entrada.
    fn predict(&self, features: &[Vec<FeatureVector>]) -> Result<Vec<Vec<Tag>>>;

    /// Pesos de emissão aprendidos, para o ranking diagnóstico do avaliador.
    /// Não afeta métricas nem predições.
    fn feature_weights(&self) -> Vec<FeatureWeight>;
}
