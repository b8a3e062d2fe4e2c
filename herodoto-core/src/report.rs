//! # Relatórios de Erro em CSV
//!
//! Todo par (sentença, token) em que o rótulo previsto difere do real cai em
//! exatamente uma de duas listas:
//!
//! - **candidatos** — o rótulo real é `0`: o modelo apontou uma possível
//!   entidade que falta nas listas ouro. É o subproduto mais valioso do
//!   job: material de revisão para ampliar as listas;
//! - **más classificações** — o ouro marcava entidade e a predição
//!   discordou (inclusive entidade → `0` e place ↔ ethnic).
//!
//! As listas particionam o conjunto de divergências: disjuntas, união igual
//! ao total. Cada uma vira um CSV próprio com contador reiniciado, escrito
//! em passada única e de forma independente — falha em um arquivo não
//! bloqueia o outro.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::{HerodotoError, Result};
use crate::tagger::{Sentence, Tag};

/// Cabeçalho fixo dos dois relatórios.
pub const REPORT_HEADER: [&str; 8] = [
    "no",
    "token",
    "pos",
    "actual_label",
    "predicted_label",
    "sent_no",
    "token_no",
    "sent",
];

/// Uma divergência rótulo real × previsto. Criado apenas no momento do
/// relatório, nunca mutado depois.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    /// Contador 1-based, reiniciado por lista.
    pub no: usize,
    pub token: String,
    pub pos: String,
    pub actual_label: &'static str,
    pub predicted_label: &'static str,
    /// Índice da sentença no dataset filtrado (0-based).
    pub sent_no: usize,
    /// Índice do token dentro da sentença (0-based).
    pub token_no: usize,
    /// Texto completo da sentença, formas unidas por espaço.
    pub sent: String,
}

/// As duas listas de divergências.
#[derive(Debug, Clone, Default)]
pub struct ErrorPartition {
    pub candidates: Vec<ErrorRecord>,
    pub misclassified: Vec<ErrorRecord>,
}

impl ErrorPartition {
    pub fn total(&self) -> usize {
        self.candidates.len() + self.misclassified.len()
    }
}

/// Particiona todas as divergências entre rótulos reais e previstos.
///
/// Passada única em ordem de sentença/token; cada lista numera seus próprios
/// registros a partir de 1.
pub fn partition_errors(
    sentences: &[Sentence],
    actual: &[Vec<Tag>],
    predicted: &[Vec<Tag>],
) -> ErrorPartition {
    let mut partition = ErrorPartition::default();

    for (sent_no, sentence) in sentences.iter().enumerate() {
        let ys = &actual[sent_no];
        let ps = &predicted[sent_no];
        for (token_no, (y, p)) in ys.iter().zip(ps.iter()).enumerate() {
            if y == p {
                continue;
            }
            let list = if *y == Tag::Other {
                &mut partition.candidates
            } else {
                &mut partition.misclassified
            };
            let token = &sentence.tokens[token_no];
            list.push(ErrorRecord {
                no: list.len() + 1,
                token: token.form.clone(),
                pos: token.pos.clone(),
                actual_label: y.label(),
                predicted_label: p.label(),
                sent_no,
                token_no,
                sent: sentence.text(),
            });
        }
    }

    partition
}

/// Escreve um relatório em qualquer `Write` — cabeçalho fixo primeiro,
/// depois os registros, em ordem.
pub fn write_report_to<W: io::Write>(writer: W, records: &[ErrorRecord]) -> csv::Result<()> {
    // Cabeçalho manual: ele sai mesmo com a lista vazia
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    w.write_record(REPORT_HEADER)?;
    for record in records {
        w.serialize(record)?;
    }
    w.flush()?;
    Ok(())
}

/// Escreve um relatório no caminho dado (UTF-8, criado/truncado).
///
/// Falha aqui é fatal só para ESTE relatório — o chamador decide seguir com
/// o outro.
pub fn write_report(path: impl AsRef<Path>, records: &[ErrorRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| HerodotoError::ReportWrite {
                path: path.to_path_buf(),
                source: source.into(),
            })?;
        }
    }
    let file = fs::File::create(path).map_err(|source| HerodotoError::ReportWrite {
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    write_report_to(file, records).map_err(|source| HerodotoError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = records.len(), "relatório escrito");
    Ok(())
}
