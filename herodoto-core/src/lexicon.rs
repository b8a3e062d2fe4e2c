//! # Listas Ouro de Topônimos e Etnônimos
//!
//! As duas listas curadas (lugares e povos) são o único "conhecimento
//! anotado" do sistema: delas derivam os rótulos fracos de treino. Cada
//! lista é um conjunto de formas normalizadas (sem diacríticos), montado
//! uma única vez na inicialização e imutável dali em diante.
//!
//! A classificação consulta primeiro a lista de lugares e depois a de
//! povos. Um nome presente nas duas resolve para [`Tag::Place`] — política
//! de precedência deliberada (ver DESIGN.md); não reordene em silêncio.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{HerodotoError, Result};
use crate::normalize::strip_diacritics;
use crate::tagger::Tag;

/// Conjuntos normalizados de nomes conhecidos, um por categoria de entidade.
///
/// Equivalente ao gazetteer clássico de sistemas NER, reduzido às duas
/// categorias que interessam às Histórias.
#[derive(Debug, Clone)]
pub struct GoldLexicon {
    places: HashSet<String>,
    ethnics: HashSet<String>,
}

/// Normaliza e deduplica uma lista de nomes (um por elemento).
///
/// Linhas vazias são ignoradas; a ordem de entrada é irrelevante, o
/// resultado é um conjunto.
pub fn build(names: impl IntoIterator<Item = impl AsRef<str>>) -> HashSet<String> {
    names
        .into_iter()
        .map(|name| strip_diacritics(name.as_ref().trim()))
        .filter(|name| !name.is_empty())
        .collect()
}

impl GoldLexicon {
    /// Monta o léxico a partir das duas listas de nomes já carregadas.
    pub fn new(
        places: impl IntoIterator<Item = impl AsRef<str>>,
        ethnics: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            places: build(places),
            ethnics: build(ethnics),
        }
    }

    /// Carrega as listas ouro de dois arquivos texto UTF-8, um nome por linha.
    ///
    /// Arquivo ausente é [`HerodotoError::InputNotFound`] — fatal antes de
    /// qualquer processamento.
    pub fn from_files(places_path: impl AsRef<Path>, ethnics_path: impl AsRef<Path>) -> Result<Self> {
        let places_txt = read_gold_file(places_path.as_ref())?;
        let ethnics_txt = read_gold_file(ethnics_path.as_ref())?;
        let lexicon = Self::new(places_txt.lines(), ethnics_txt.lines());
        tracing::info!(
            places = lexicon.places.len(),
            ethnics = lexicon.ethnics.len(),
            "listas ouro carregadas"
        );
        Ok(lexicon)
    }

    /// Classifica uma forma de superfície consultando as listas ouro.
    ///
    /// A forma é normalizada antes da consulta; a comparação é de igualdade
    /// exata — não há stemming, então "Athenaioi" NÃO casa com "Athenai".
    ///
    /// Precedência documentada: lugares antes de povos.
    pub fn classify(&self, form: &str) -> Tag {
        let key = strip_diacritics(form);
        if self.places.contains(&key) {
            Tag::Place
        } else if self.ethnics.contains(&key) {
            Tag::Ethnic
        } else {
            Tag::Other
        }
    }

    /// Verifica se a forma (normalizada) está em QUALQUER uma das listas.
    pub fn contains(&self, form: &str) -> bool {
        let key = strip_diacritics(form);
        self.places.contains(&key) || self.ethnics.contains(&key)
    }

    /// Conjunto normalizado de topônimos.
    pub fn places(&self) -> &HashSet<String> {
        &self.places
    }

    /// Conjunto normalizado de etnônimos.
    pub fn ethnics(&self) -> &HashSet<String> {
        &self.ethnics
    }

    /// Total de nomes conhecidos (as listas podem se sobrepor).
    pub fn len(&self) -> usize {
        self.places.len() + self.ethnics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty() && self.ethnics.is_empty()
    }
}

fn read_gold_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| HerodotoError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> GoldLexicon {
        GoldLexicon::new(["Ἀθῆναι", "Σάρδεις"], ["Ἴωνας", "Πέρσαι"])
    }

    #[test]
    fn test_build_normaliza_e_deduplica() {
        // A mesma forma com e sem diacríticos vira uma entrada só
        let set = build(["Ἀθῆναι", "Αθηναι", "", "  "]);
        assert_eq!(set.len(), 1);
        assert!(set.contains("Αθηναι"));
    }

    #[test]
    fn test_classify_por_lista() {
        let lex = lexicon();
        assert_eq!(lex.classify("Ἀθῆναι"), Tag::Place);
        assert_eq!(lex.classify("Αθηναι"), Tag::Place); // consulta já normalizada
        assert_eq!(lex.classify("Πέρσαι"), Tag::Ethnic);
        assert_eq!(lex.classify("esti"), Tag::Other);
    }

    #[test]
    fn test_classify_sem_stemming() {
        // Igualdade exata: o gentílico derivado do topônimo fica de fora
        let lex = GoldLexicon::new(["Athenai"], [] as [&str; 0]);
        assert_eq!(lex.classify("Athenaioi"), Tag::Other);
    }

    #[test]
    fn test_precedencia_lugar_antes_de_povo() {
        // Nome presente nas duas listas resolve para Place — política fixa
        let lex = GoldLexicon::new(["Λυδοί"], ["Λυδοί"]);
        assert_eq!(lex.classify("Λυδοί"), Tag::Place);
    }

    #[test]
    fn test_contains_combinado() {
        let lex = lexicon();
        assert!(lex.contains("Σάρδεις"));
        assert!(lex.contains("Ἴωνας"));
        assert!(!lex.contains("idein"));
    }

    #[test]
    fn test_from_files_arquivo_ausente() {
        let err = GoldLexicon::from_files("data/nao-existe.txt", "data/tampouco.txt").unwrap_err();
        assert!(matches!(err, HerodotoError::InputNotFound { .. }));
    }
}
