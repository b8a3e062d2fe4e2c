//! # herodoto-core — Topônimos e Etnônimos nas Histórias de Heródoto
//!
//! Este crate implementa o pipeline completo de reconhecimento de nomes de
//! lugares e de povos no texto anotado das Histórias, usando rótulos fracos:
//! ninguém anotou entidades à mão — os rótulos de treino derivam do
//! casamento exato (sem diacríticos) com duas listas ouro curadas.
//!
//! ## Arquitetura do Pipeline
//!
//! O dado flui em lote, passo a passo:
//!
//! 1. **Listas ouro** ([`lexicon`]): topônimos e etnônimos normalizados
//!    ([`normalize`]) em dois conjuntos imutáveis.
//! 2. **Corpus** ([`corpus`]): o XML anotado vira sentenças de pares
//!    (forma, classe gramatical); tokens mutilados são descartados.
//! 3. **Rotulagem fraca + filtro** ([`tagger`]): cada token ganha um rótulo
//!    pelas listas ouro; só sentenças com ao menos uma entidade são retidas.
//! 4. **Features** ([`features`]): janela de raio 1 — sufixos, caixa de
//!    título, classe gramatical, vizinhos e marcadores de fronteira.
//! 5. **Modelo sequencial** ([`model`], [`crf`], [`viterbi`]): capacidade
//!    plugável `fit`/`predict`; o backend padrão é uma cadeia linear
//!    treinada por SGD e decodificada por Viterbi.
//! 6. **Avaliação** ([`eval`], [`metrics`]): predição out-of-fold em 5
//!    folds, relatório por rótulo, ranking dos pesos aprendidos.
//! 7. **Relatórios de erro** ([`report`]): as divergências viram dois CSVs —
//!    candidatos a entidades faltantes nas listas e más classificações.
//!
//! ## Exemplo de Uso
//!
//! ```rust,no_run
//! use herodoto_core::config::{GoldEdition, RunContext};
//! use herodoto_core::eval;
//!
//! let ctx = RunContext::load(GoldEdition::Updated)?;
//! let evaluation = eval::evaluate(&ctx)?;
//! println!("{}", evaluation.report);
//! # Ok::<(), herodoto_core::HerodotoError>(())
//! ```

pub mod config;
pub mod corpus;
pub mod crf;
pub mod error;
pub mod eval;
pub mod features;
pub mod lexicon;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod report;
pub mod tagger;
pub mod viterbi;

pub use config::{Dataset, GoldEdition, RunContext};
pub use crf::ChainCrf;
pub use error::{HerodotoError, Result};
pub use eval::{Evaluation, FOLDS, TOP_WEIGHTS};
pub use features::FeatureVector;
pub use lexicon::GoldLexicon;
pub use model::{FeatureWeight, ModelConfig, SequenceModel};
pub use tagger::{Sentence, Tag, Token};
