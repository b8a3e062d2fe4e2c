//! # Leitura do Corpus Anotado
//!
//! O texto das Histórias chega como um documento XML em árvore: a raiz
//! contém uma seção `source`, que contém subseções (os livros), cada uma com
//! elementos `sentence`, cada um com elementos `token` trazendo os atributos
//! `form` e `part-of-speech`. A tokenização e a anotação morfológica são
//! externas — este módulo só materializa as sentenças na ordem do documento.
//!
//! Tokens sem um dos atributos obrigatórios são descartados em silêncio, por
//! decisão de projeto: o corpus tem lacunas editoriais e um token mutilado
//! não justifica abortar o job. Já um documento sem o esqueleto esperado é
//! erro fatal com contexto ([`HerodotoError::CorpusStructure`]).

use std::fs;
use std::path::Path;

use crate::error::{HerodotoError, Result};

/// Par (forma, classe gramatical) tal como veio do documento, antes de
/// qualquer rotulagem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub form: String,
    pub pos: String,
}

/// Uma sentença crua: tokens ordenados como no documento.
pub type RawSentence = Vec<RawToken>;

/// Lê e interpreta o corpus a partir de um arquivo.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<RawSentence>> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path).map_err(|source| HerodotoError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    parse_corpus(&xml, &path.display().to_string())
}

/// Interpreta o documento XML já em memória.
///
/// `origin` identifica a procedência nos erros (caminho do arquivo, em
/// geral). Separado de [`load_corpus`] para que o parse seja testável sem
/// tocar o sistema de arquivos.
pub fn parse_corpus(xml: &str, origin: &str) -> Result<Vec<RawSentence>> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| HerodotoError::CorpusStructure {
        origin: origin.to_string(),
        reason: e.to_string(),
    })?;

    let source = doc
        .root_element()
        .children()
        .find(|node| node.is_element() && node.has_tag_name("source"))
        .ok_or_else(|| HerodotoError::CorpusStructure {
            origin: origin.to_string(),
            reason: "seção 'source' ausente na raiz".to_string(),
        })?;

    let mut sentences = Vec::new();
    let mut dropped_tokens = 0usize;

    // Subseções (livros) na ordem do documento; dentro delas, só os filhos
    // diretos 'sentence' contam
    for section in source.children().filter(|n| n.is_element()) {
        for sentence in section
            .children()
            .filter(|n| n.is_element() && n.has_tag_name("sentence"))
        {
            let mut tokens = Vec::new();
            for token in sentence
                .children()
                .filter(|n| n.is_element() && n.has_tag_name("token"))
            {
                // Ambos os atributos são obrigatórios; sem eles o token some
                // e os vizinhos passam a ser adjacentes (ver nota em tagger)
                match (token.attribute("form"), token.attribute("part-of-speech")) {
                    (Some(form), Some(pos)) if !form.is_empty() => tokens.push(RawToken {
                        form: form.to_string(),
                        pos: pos.to_string(),
                    }),
                    _ => dropped_tokens += 1,
                }
            }
            sentences.push(tokens);
        }
    }

    tracing::info!(
        sentences = sentences.len(),
        dropped_tokens,
        "corpus interpretado"
    );
    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <treebank>
          <source>
            <div n="1">
              <sentence id="1">
                <token form="Ἡροδότου" part-of-speech="NOUN"/>
                <token form="ἱστορίης" part-of-speech="NOUN"/>
              </sentence>
              <sentence id="2">
                <token form="esti" part-of-speech="VERB"/>
              </sentence>
            </div>
            <div n="2">
              <sentence id="3">
                <token part-of-speech="PUNCT"/>
                <token form="Ἴωνας" part-of-speech="ADJ"/>
                <token form=""/>
              </sentence>
            </div>
          </source>
        </treebank>"#;

    #[test]
    fn test_parse_ordem_e_conteudo() {
        let sentences = parse_corpus(SAMPLE, "teste").unwrap();
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].len(), 2);
        assert_eq!(sentences[0][0].form, "Ἡροδότου");
        assert_eq!(sentences[0][0].pos, "NOUN");
        assert_eq!(sentences[1][0].form, "esti");
    }

    #[test]
    fn test_tokens_sem_atributo_sao_descartados() {
        let sentences = parse_corpus(SAMPLE, "teste").unwrap();
        // Na sentença 3, sobra apenas o token com form e part-of-speech;
        // o vizinho descartado desloca os índices posicionais
        assert_eq!(sentences[2].len(), 1);
        assert_eq!(sentences[2][0].form, "Ἴωνας");
    }

    #[test]
    fn test_documento_sem_source_e_fatal() {
        let err = parse_corpus("<treebank><outro/></treebank>", "teste").unwrap_err();
        assert!(matches!(err, HerodotoError::CorpusStructure { .. }));
    }

    #[test]
    fn test_xml_invalido_e_fatal() {
        let err = parse_corpus("<treebank><source>", "teste").unwrap_err();
        assert!(matches!(err, HerodotoError::CorpusStructure { .. }));
    }

    #[test]
    fn test_arquivo_ausente() {
        let err = load_corpus("data/inexistente.xml").unwrap_err();
        assert!(matches!(err, HerodotoError::InputNotFound { .. }));
    }
}
