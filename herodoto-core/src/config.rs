//! # Configuração e Contexto de Execução
//!
//! Caminhos fixos por constante — o job não tem flags de linha de comando
//! nem variáveis de ambiente. As listas ouro e os CSVs de saída existem em
//! duas edições (a curadoria revisada e a original); a edição escolhe o
//! conjunto de caminhos inteiro de uma vez.
//!
//! O [`RunContext`] é o estado imutável do job: léxico, dataset e
//! hiperparâmetros, montados uma única vez na inicialização e passados por
//! referência — nada de estado global implícito.

use rayon::prelude::*;

use crate::corpus;
use crate::error::Result;
use crate::features::{self, FeatureVector};
use crate::lexicon::GoldLexicon;
use crate::model::ModelConfig;
use crate::tagger::{self, Sentence, Tag};

/// Caminho do corpus anotado das Histórias.
pub const CORPUS_PATH: &str = "data/hdt.xml";

/// Edição das listas ouro em uso.
///
/// A curadoria passou por uma revisão; os arquivos `_updated` são a edição
/// corrente, mas a original continua acessível para comparação de
/// resultados entre edições.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldEdition {
    /// Listas da primeira curadoria.
    Original,
    /// Listas revisadas (edição corrente).
    Updated,
}

impl GoldEdition {
    pub fn places_path(&self) -> &'static str {
        match self {
            GoldEdition::Original => "data/places_gold-standard.txt",
            GoldEdition::Updated => "data/places_gold-standard_updated.txt",
        }
    }

    pub fn ethnics_path(&self) -> &'static str {
        match self {
            GoldEdition::Original => "data/ethnics_gold-standard.txt",
            GoldEdition::Updated => "data/ethnics_gold-standard_updated.txt",
        }
    }

    /// CSV dos candidatos a entidade (real `0`, previsto entidade).
    pub fn predicted_csv(&self) -> &'static str {
        match self {
            GoldEdition::Original => "results/predicted_tokens.csv",
            GoldEdition::Updated => "results/predicted_tokens_updated.csv",
        }
    }

    /// CSV das más classificações (ouro marcava entidade, predição discordou).
    pub fn misclassified_csv(&self) -> &'static str {
        match self {
            GoldEdition::Original => "results/misclassified_tokens.csv",
            GoldEdition::Updated => "results/misclassified_tokens_updated.csv",
        }
    }
}

/// Dataset pronto para o modelo: sentenças retidas com features e rótulos
/// alinhados 1:1 por posição. Computado uma vez, nunca mutado.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub sentences: Vec<Sentence>,
    pub features: Vec<Vec<FeatureVector>>,
    pub labels: Vec<Vec<Tag>>,
}

impl Dataset {
    /// Materializa features e rótulos das sentenças já filtradas.
    pub fn build(sentences: Vec<Sentence>) -> Self {
        let features = features::extract_all(&sentences);
        let labels: Vec<Vec<Tag>> = sentences.par_iter().map(Sentence::labels).collect();
        Self {
            sentences,
            features,
            labels,
        }
    }

    /// Número de sentenças retidas.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Contexto imutável do job, costurado explicitamente por todos os
/// componentes (nada vive em estado ambiente).
#[derive(Debug, Clone)]
pub struct RunContext {
    pub lexicon: GoldLexicon,
    pub dataset: Dataset,
    pub model: ModelConfig,
}

impl RunContext {
    /// Sequência completa de inicialização: listas ouro → corpus → filtro e
    /// rotulagem fraca → features. Qualquer entrada ausente ou corpus
    /// quebrado aborta aqui, antes de gastar treino.
    pub fn load(edition: GoldEdition) -> Result<Self> {
        let lexicon = GoldLexicon::from_files(edition.places_path(), edition.ethnics_path())?;
        let raw = corpus::load_corpus(CORPUS_PATH)?;
        let sentences = tagger::label_sentences(raw, &lexicon);
        let dataset = Dataset::build(sentences);
        Ok(Self {
            lexicon,
            dataset,
            model: ModelConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::Token;

    #[test]
    fn test_edicoes_apontam_arquivos_distintos() {
        assert_ne!(
            GoldEdition::Original.places_path(),
            GoldEdition::Updated.places_path()
        );
        assert_ne!(
            GoldEdition::Original.predicted_csv(),
            GoldEdition::Updated.predicted_csv()
        );
    }

    #[test]
    fn test_dataset_alinhado() {
        let sentences = vec![Sentence {
            tokens: vec![
                Token {
                    form: "Ἀθῆναι".into(),
                    pos: "NOUN".into(),
                    tag: Tag::Place,
                },
                Token {
                    form: "esti".into(),
                    pos: "VERB".into(),
                    tag: Tag::Other,
                },
            ],
        }];
        let dataset = Dataset::build(sentences);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.features[0].len(), 2);
        assert_eq!(dataset.labels[0], vec![Tag::Place, Tag::Other]);
    }
}
