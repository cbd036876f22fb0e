//! Linha de comando dos experimentos de etiquetagem POS no corpus Brown

mod cli;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use clap::Parser;
use pos_core::chain::{ChainConfig, FallbackTagSource};
use pos_core::pipeline::{ExperimentConfig, ExperimentRunner, ExperimentVariant};
use pos_core::report::{self, Orientation, ReportTable, SinkOptions};
use pos_core::{ngram_sweep, BrownCorpus};
use tracing::info;

use crate::cli::{Cli, Commands, FallbackArg, ReportArgs, RunArgs, SweepArgs};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_str())
        .init();

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Report(args) => show_report(args),
        Commands::Sweep(args) => sweep(args),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let fallback = match args.fallback {
        FallbackArg::MostFrequent => FallbackTagSource::MostFrequentInCorpus,
        FallbackArg::Fixed => FallbackTagSource::Fixed(args.fixed_tag.clone()),
    };
    let variant: ExperimentVariant = args.variant.into();

    let mut config = ExperimentConfig {
        variant,
        chain: ChainConfig {
            lookup_size: args.lookup,
            fallback,
        },
        parallel: args.parallel,
        ..ExperimentConfig::default()
    };
    if !args.categories.is_empty() {
        config.categories = args.categories;
    }

    let corpus = BrownCorpus::open(&args.corpus)
        .with_context(|| format!("falha ao abrir o corpus em {}", args.corpus.display()))?;
    let runner = ExperimentRunner::new(config)?;
    let result = runner.run(&corpus)?;

    let output = args
        .output
        .unwrap_or_else(|| variant.default_output().into());
    let options = SinkOptions {
        precision: args.precision,
    };
    report::save_result(&output, &result, &options)
        .with_context(|| format!("falha ao gravar {}", output.display()))?;
    Ok(())
}

fn show_report(args: ReportArgs) -> anyhow::Result<()> {
    let orientation = if args.transpose {
        Orientation::CategoriesAsRows
    } else {
        Orientation::TaggersAsRows
    };
    print!("{}", render_report(&[&args.full, &args.short], orientation)?);
    Ok(())
}

/// Monta o texto do relatório de todos os documentos, na ordem dada.
///
/// Um documento ausente ou malformado aborta o relatório inteiro.
fn render_report<P: AsRef<Path>>(paths: &[P], orientation: Orientation) -> anyhow::Result<String> {
    let mut out = String::new();
    for path in paths {
        let path = path.as_ref();
        let doc = report::load_document(path)
            .with_context(|| format!("falha ao ler {}", path.display()))?;
        let categories: Vec<&String> = doc
            .as_object()
            .map(|outer| outer.keys().collect())
            .unwrap_or_default();
        let table = ReportTable::from_document(&doc, orientation)
            .with_context(|| format!("documento inválido: {}", path.display()))?;

        writeln!(out, "== {} ==", path.display())?;
        writeln!(out, "Categories: {:?}\n\n", categories)?;
        writeln!(out, "{}", table)?;
    }
    Ok(out)
}

fn sweep(args: SweepArgs) -> anyhow::Result<()> {
    if args.max_n == 0 {
        bail!("--max-n deve ser >= 1");
    }
    let corpus = BrownCorpus::open(&args.corpus)
        .with_context(|| format!("falha ao abrir o corpus em {}", args.corpus.display()))?;
    let points = ngram_sweep(
        &corpus,
        &args.category,
        1..=args.max_n,
        pos_core::CorpusSplit::DEFAULT_RATIO,
    )?;

    println!("{:>3}  {:>8}", "n", "accuracy");
    for point in &points {
        println!("{:>3}  {:>8.6}", point.n, point.accuracy);
    }

    if let Some(output) = args.output {
        let json = serde_json::to_string_pretty(&points)?;
        fs::write(&output, json).with_context(|| format!("falha ao gravar {}", output.display()))?;
        info!("Varredura gravada em {}", output.display());
    }
    Ok(())
}
