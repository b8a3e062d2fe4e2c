//! # Rótulos Fracos e Filtro de Sentenças
//!
//! Nenhum token das Histórias foi anotado à mão. O rótulo de cada um é
//! derivado por casamento lexical exato com as listas ouro — um "rótulo
//! fraco": barato, determinístico e com a cobertura limitada das listas.
//!
//! ## Rótulos
//!
//! | Rótulo  | Forma textual | Significado                       |
//! |---------|---------------|-----------------------------------|
//! | Place   | `place`       | Topônimo (Ἀθῆναι, Σάρδεις)        |
//! | Ethnic  | `ethnic`      | Etnônimo (Πέρσαι, Ἴωνες)          |
//! | Other   | `0`           | Qualquer outra palavra            |
//!
//! O `0` textual não é o `O` de um esquema BIO — aqui não há BIO: cada
//! token recebe uma classe plana, e é essa forma que vai para os CSVs e
//! para o relatório.
//!
//! ## Filtro
//!
//! Só entram no dataset as sentenças com PELO MENOS um token casando com as
//! listas ouro. Sentenças sem nenhum casamento ficam fora do treino E da
//! avaliação — troca-se cobertura do corpus por densidade de rótulos.
//!
//! Atenção: tokens sem atributo obrigatório já foram descartados no parse
//! (ver [`crate::corpus`]), o que desloca os índices posicionais dentro da
//! sentença. As features de vizinhança enxergam a sentença compactada, não
//! a adjacência linguística do texto pleno. Comportamento conhecido e
//! preservado de propósito (ver DESIGN.md).

use serde::{Deserialize, Serialize};

use crate::corpus::{RawSentence, RawToken};
use crate::lexicon::GoldLexicon;

/// Classe de entidade atribuída a um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Topônimo presente na lista ouro de lugares.
    Place,
    /// Etnônimo presente na lista ouro de povos.
    Ethnic,
    /// Qualquer outra palavra.
    Other,
}

impl Tag {
    /// Número total de rótulos possíveis.
    pub const COUNT: usize = 3;

    /// Forma textual do rótulo (a mesma gravada nos CSVs e no relatório).
    pub fn label(&self) -> &'static str {
        match self {
            Tag::Place => "place",
            Tag::Ethnic => "ethnic",
            Tag::Other => "0",
        }
    }

    /// Índice denso para matrizes de transição e contagem.
    pub fn index(&self) -> usize {
        match self {
            Tag::Place => 0,
            Tag::Ethnic => 1,
            Tag::Other => 2,
        }
    }

    /// Todos os rótulos, na ordem dos índices.
    pub fn all() -> [Tag; Tag::COUNT] {
        [Tag::Place, Tag::Ethnic, Tag::Other]
    }

    /// Parseia a forma textual de volta para o rótulo.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "place" => Some(Tag::Place),
            "ethnic" => Some(Tag::Ethnic),
            "0" => Some(Tag::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Token rotulado: forma de superfície, classe gramatical e rótulo fraco.
///
/// O rótulo é atribuído uma única vez, na carga, e não muda depois.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub form: String,
    pub pos: String,
    pub tag: Tag,
}

/// Sentença retida: não-vazia e com ao menos um token fora de `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// Texto da sentença: formas unidas por espaço simples, na ordem original.
    /// É o que vai na coluna `sent` dos relatórios de erro.
    pub fn text(&self) -> String {
        let forms: Vec<&str> = self.tokens.iter().map(|t| t.form.as_str()).collect();
        forms.join(" ")
    }

    /// Sequência de rótulos, alinhada token a token.
    pub fn labels(&self) -> Vec<Tag> {
        self.tokens.iter().map(|t| t.tag).collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Verdadeiro se alguma forma da sentença (normalizada) está no conjunto
/// ouro combinado — critério de retenção do filtro.
pub fn has_gold_word(tokens: &[RawToken], lexicon: &GoldLexicon) -> bool {
    tokens.iter().any(|t| lexicon.contains(&t.form))
}

/// Aplica rótulos fracos e retém apenas as sentenças com entidade.
///
/// Para cada sentença crua: se [`has_gold_word`] falha, a sentença é
/// descartada; senão, cada token é materializado com o rótulo que
/// [`GoldLexicon::classify`] lhe dá. A ordem das sentenças retidas é a
/// ordem do corpus.
pub fn label_sentences(raw: Vec<RawSentence>, lexicon: &GoldLexicon) -> Vec<Sentence> {
    let total = raw.len();
    let sentences: Vec<Sentence> = raw
        .into_iter()
        .filter(|tokens| has_gold_word(tokens, lexicon))
        .map(|tokens| Sentence {
            tokens: tokens
                .into_iter()
                .map(|t| Token {
                    tag: lexicon.classify(&t.form),
                    form: t.form,
                    pos: t.pos,
                })
                .collect(),
        })
        .collect();
    tracing::info!(
        retained = sentences.len(),
        discarded = total - sentences.len(),
        "sentenças filtradas pelo conjunto ouro"
    );
    sentences
}
