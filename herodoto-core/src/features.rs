//! # Engenharia de Features por Token
//!
//! Cada token vira um vetor esparso de features lexicais e contextuais que o
//! modelo sequencial consome no lugar do texto cru. A janela é de raio 1:
//! além do próprio token, só os vizinhos imediatos contribuem.
//!
//! ## Features do token corrente
//! - termo de viés constante (`bias`);
//! - últimos 3 e últimos 2 grafemas da forma (`word[-3:]`, `word[-2:]`);
//!   formas curtas entram inteiras;
//! - flag de caixa de título (`word.istitle`);
//! - classe gramatical completa e seu primeiro caractere — a classe grossa
//!   (`postag`, `postag[:1]`).
//!
//! ## Contexto
//! - se há vizinho à esquerda: forma minúscula, flag de título, classe e
//!   classe grossa dele, prefixadas com `-1:`; senão, o marcador `BOS`;
//! - simetricamente à direita com prefixo `+1:`, senão `EOS`.
//!
//! Pistas com valor textual são compostas em nomes one-hot
//! (`word[-3:]=ναι` → 1.0) e flags só entram quando verdadeiras — a mesma
//! convenção esparsa dos gazetteers deste pipeline. A extração é uma função
//! pura de (sentença, índice): entradas idênticas produzem mapas idênticos,
//! pré-condição para a validação cruzada fazer sentido.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::normalize::is_title_case;
use crate::tagger::Sentence;

/// Vetor esparso de features de um token: nome → valor.
///
/// A maioria dos valores é 1.0 (features binárias/one-hot); `f64` fica pela
/// generalidade, como nos demais mapas de peso do crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub features: HashMap<String, f64>,
}

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.features.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.features.iter()
    }
}

/// Construtor de [`FeatureVector`]: campos obrigatórios primeiro, campos de
/// fronteira condicionalmente, e um `finish` que congela o mapa.
#[derive(Debug)]
pub struct FeatureBuilder {
    features: HashMap<String, f64>,
}

impl FeatureBuilder {
    /// Começa o vetor já com o termo de viés.
    pub fn new() -> Self {
        let mut features = HashMap::new();
        features.insert("bias".to_string(), 1.0);
        Self { features }
    }

    /// Feature one-hot com valor textual: `nome=valor` → 1.0.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.features.insert(format!("{name}={value}"), 1.0);
        self
    }

    /// Flag binária: só entra no mapa quando verdadeira.
    pub fn flag(&mut self, name: &str, on: bool) -> &mut Self {
        if on {
            self.features.insert(name.to_string(), 1.0);
        }
        self
    }

    /// Marcador de fronteira (`BOS`/`EOS`).
    pub fn marker(&mut self, name: &str) -> &mut Self {
        self.features.insert(name.to_string(), 1.0);
        self
    }

    /// Finaliza como mapa imutável.
    pub fn finish(self) -> FeatureVector {
        FeatureVector {
            features: self.features,
        }
    }
}

/// Extrai as features do token na posição `i` da sentença.
///
/// Pura e sem efeitos colaterais; pânico apenas se `i` estiver fora da
/// sentença, o que é bug do chamador.
pub fn token_features(sentence: &Sentence, i: usize) -> FeatureVector {
    let tokens = &sentence.tokens;
    let token = &tokens[i];

    let mut b = FeatureBuilder::new();
    b.text("word[-3:]", &grapheme_suffix(&token.form, 3));
    b.text("word[-2:]", &grapheme_suffix(&token.form, 2));
    b.flag("word.istitle", is_title_case(&token.form));
    b.text("postag", &token.pos);
    b.text("postag[:1]", &coarse_pos(&token.pos));

    if i > 0 {
        let prev = &tokens[i - 1];
        b.text("-1:word.lower", &prev.form.to_lowercase());
        b.flag("-1:word.istitle", is_title_case(&prev.form));
        b.text("-1:postag", &prev.pos);
        b.text("-1:postag[:1]", &coarse_pos(&prev.pos));
    } else {
        b.marker("BOS");
    }

    if i + 1 < tokens.len() {
        let next = &tokens[i + 1];
        b.text("+1:word.lower", &next.form.to_lowercase());
        b.flag("+1:word.istitle", is_title_case(&next.form));
        b.text("+1:postag", &next.pos);
        b.text("+1:postag[:1]", &coarse_pos(&next.pos));
    } else {
        b.marker("EOS");
    }

    b.finish()
}

/// Features de todos os tokens de uma sentença, alinhadas por posição.
pub fn sentence_features(sentence: &Sentence) -> Vec<FeatureVector> {
    (0..sentence.len())
        .map(|i| token_features(sentence, i))
        .collect()
}

/// Features de todo o dataset. A extração é pura, então as sentenças são
/// processadas em paralelo sem cerimônia.
pub fn extract_all(sentences: &[Sentence]) -> Vec<Vec<FeatureVector>> {
    sentences.par_iter().map(sentence_features).collect()
}

/// Últimos `n` grafemas da forma; formas mais curtas entram inteiras.
fn grapheme_suffix(s: &str, n: usize) -> String {
    let graphemes: Vec<&str> = s.graphemes(true).collect();
    let start = graphemes.len().saturating_sub(n);
    graphemes[start..].concat()
}

/// Classe gramatical grossa: primeiro caractere da tag.
fn coarse_pos(pos: &str) -> String {
    pos.chars().next().map(String::from).unwrap_or_default()
}
