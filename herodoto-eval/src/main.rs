//! Job de avaliação em lote: carrega listas ouro e corpus, roda a validação
//! cruzada e imprime o relatório; as divergências saem em dois CSVs.
//!
//! Sem flags: caminhos e hiperparâmetros são constantes de configuração
//! (ver `herodoto_core::config`).

use anyhow::Context;
use herodoto_core::config::{GoldEdition, RunContext};
use herodoto_core::eval::{self, Evaluation, TOP_WEIGHTS};
use herodoto_core::report::{self, ErrorPartition};
use herodoto_core::Tag;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let edition = GoldEdition::Updated;
    let ctx = RunContext::load(edition).context("inicialização do contexto")?;

    println!("\n{} sentences\n", ctx.dataset.len());

    let evaluation = eval::evaluate(&ctx).context("avaliação cross-validated")?;

    println!("flat_classification_report:\n\n{}", evaluation.report);
    print_predictions(&evaluation)?;
    print_weights(&evaluation);

    write_error_reports(&ctx, &evaluation, edition)
}

/// Dump cru das predições out-of-fold, sentença por sentença, na ordem do
/// dataset — material de inspeção, não de consumo programático.
fn print_predictions(evaluation: &Evaluation) -> anyhow::Result<()> {
    let raw: Vec<Vec<&str>> = evaluation
        .predictions
        .iter()
        .map(|sentence| sentence.iter().map(Tag::label).collect())
        .collect();
    println!("cross_val_predict:\n\n{}\n", serde_json::to_string(&raw)?);
    Ok(())
}

/// Ranking dos pesos aprendidos + matriz de transição, no espírito do
/// explain_weights clássico.
fn print_weights(evaluation: &Evaluation) {
    println!("explain_weights (top {TOP_WEIGHTS}):\n");
    println!("{:>10}  {:<8} feature", "weight", "label");
    for w in &evaluation.top_weights {
        println!("{:>+10.4}  {:<8} {}", w.weight, w.label.label(), w.feature);
    }

    println!("\ntransitions:\n");
    let tags = Tag::all();
    print!("{:>10}", "");
    for to in tags {
        print!(" {:>8}", to.label());
    }
    println!();
    for from in tags {
        print!("{:>10}", from.label());
        for to in tags {
            print!(" {:>+8.4}", evaluation.transitions[from.index()][to.index()]);
        }
        println!();
    }
}

/// Escreve os dois CSVs de divergência de forma independente: falha em um
/// não impede a tentativa do outro, mas qualquer falha derruba o job.
fn write_error_reports(
    ctx: &RunContext,
    evaluation: &Evaluation,
    edition: GoldEdition,
) -> anyhow::Result<()> {
    let partition: ErrorPartition = report::partition_errors(
        &ctx.dataset.sentences,
        &ctx.dataset.labels,
        &evaluation.predictions,
    );
    info!(
        candidates = partition.candidates.len(),
        misclassified = partition.misclassified.len(),
        "divergências particionadas"
    );

    let mut failures = 0usize;
    let outputs = [
        (edition.predicted_csv(), &partition.candidates),
        (edition.misclassified_csv(), &partition.misclassified),
    ];
    for (path, records) in outputs {
        if let Err(err) = report::write_report(path, records) {
            error!(path, %err, "relatório não escrito");
            failures += 1;
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} relatório(s) de erro não foram escritos");
    }
    Ok(())
}
