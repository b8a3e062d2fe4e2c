//! # Erros do Pipeline
//!
//! Taxonomia de falhas do job: entrada ausente, corpus estruturalmente
//! quebrado, treinamento inviável e escrita de relatório. Tokens sem os
//! atributos obrigatórios NÃO geram erro — são descartados em silêncio
//! durante o parse (ver [`crate::corpus`]).

use std::path::PathBuf;

use thiserror::Error;

/// Alias de resultado usado em todo o crate.
pub type Result<T> = std::result::Result<T, HerodotoError>;

/// Falhas possíveis do pipeline de reconhecimento.
#[derive(Debug, Error)]
pub enum HerodotoError {
    /// Lista ouro ou corpus inexistente. Fatal antes de qualquer processamento.
    #[error("arquivo de entrada não encontrado: {path}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// O documento XML não tem o esqueleto esperado (raiz → source →
    /// subseções → sentence → token). Fatal, com o caminho e o motivo.
    #[error("corpus malformado em {origin}: {reason}")]
    CorpusStructure { origin: String, reason: String },

    /// O modelo sequencial não pôde ser treinado: dataset vazio, sequências
    /// desalinhadas ou perda não-finita. Sem modelo, avaliação e relatórios
    /// não têm significado.
    #[error("falha no treinamento: {0}")]
    Training(String),

    /// Não foi possível abrir/escrever um dos CSVs de erro. Fatal apenas
    /// para aquele relatório — o outro é escrito de forma independente.
    #[error("falha ao escrever relatório em {path}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
