use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pos_core::chain::DEFAULT_FIXED_TAG;
use pos_core::pipeline::ExperimentVariant;
use pos_core::report::{FULL_RESULT_FILE, MAX_PRECISION, SHORT_RESULT_FILE};

#[derive(Parser, Debug)]
#[command(name = "pos-bench")]
#[command(version, about = "Treina e avalia etiquetadores POS no corpus Brown", long_about = None)]
pub struct Cli {
    /// Filtro de log (sintaxe do `EnvFilter`, ex: "info" ou "pos_core=debug")
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Roda os etiquetadores em cada categoria e grava as acurácias em JSON
    Run(RunArgs),
    /// Mostra os documentos de resultados como tabela com a média por linha
    Report(ReportArgs),
    /// Acurácia de n-gramas sem backoff para n = 1..max-n
    Sweep(SweepArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Full,
    Short,
}

impl From<VariantArg> for ExperimentVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Full => ExperimentVariant::Full,
            VariantArg::Short => ExperimentVariant::Short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FallbackArg {
    /// Tag mais frequente da categoria
    MostFrequent,
    /// Sempre `--fixed-tag`
    Fixed,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Diretório do corpus Brown (com `cats.txt`)
    #[arg(long)]
    pub corpus: PathBuf,

    #[arg(long, value_enum, default_value = "full")]
    pub variant: VariantArg,

    /// Arquivo de saída (padrão: result.json ou result_short.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Categorias separadas por vírgula (padrão: as sete do experimento)
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    #[arg(long, value_enum, default_value = "most-frequent")]
    pub fallback: FallbackArg,

    /// Tag usada com `--fallback fixed`
    #[arg(long, default_value = DEFAULT_FIXED_TAG)]
    pub fixed_tag: String,

    /// Quantas palavras frequentes entram no etiquetador lookup
    #[arg(long, default_value = "100")]
    pub lookup: usize,

    /// Casas decimais das acurácias gravadas (0 a 17)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_PRECISION as i64))]
    pub precision: Option<u32>,

    /// Roda as categorias em paralelo
    #[arg(long)]
    pub parallel: bool,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    #[arg(long, default_value = FULL_RESULT_FILE)]
    pub full: PathBuf,

    #[arg(long, default_value = SHORT_RESULT_FILE)]
    pub short: PathBuf,

    /// Uma linha por categoria em vez de uma por etiquetador
    #[arg(long)]
    pub transpose: bool,
}

#[derive(clap::Args, Debug)]
pub struct SweepArgs {
    #[arg(long)]
    pub corpus: PathBuf,

    #[arg(long, default_value = pos_core::sweep::DEFAULT_SWEEP_CATEGORY)]
    pub category: String,

    #[arg(long, default_value = "5")]
    pub max_n: usize,

    /// Grava os pontos também em JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["pos-bench", "run", "--corpus", "brown"]).unwrap();
        assert_eq!(cli.log_level, "info");
        let Commands::Run(args) = cli.command else {
            panic!("esperava run");
        };
        assert_eq!(args.variant, VariantArg::Full);
        assert_eq!(args.fallback, FallbackArg::MostFrequent);
        assert_eq!(args.fixed_tag, "NN");
        assert_eq!(args.lookup, 100);
        assert!(args.categories.is_empty());
        assert!(!args.parallel);
    }

    #[test]
    fn test_run_with_options() {
        let cli = Cli::try_parse_from([
            "pos-bench",
            "--log-level",
            "debug",
            "run",
            "--corpus",
            "brown",
            "--variant",
            "short",
            "--categories",
            "news,fiction",
            "--fallback",
            "fixed",
            "--precision",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        let Commands::Run(args) = cli.command else {
            panic!("esperava run");
        };
        assert_eq!(args.variant, VariantArg::Short);
        assert_eq!(args.categories, vec!["news", "fiction"]);
        assert_eq!(args.fallback, FallbackArg::Fixed);
        assert_eq!(args.precision, Some(4));
    }

    #[test]
    fn test_report_and_sweep_defaults() {
        let cli = Cli::try_parse_from(["pos-bench", "report"]).unwrap();
        let Commands::Report(args) = cli.command else {
            panic!("esperava report");
        };
        assert_eq!(args.full, PathBuf::from("result.json"));
        assert_eq!(args.short, PathBuf::from("result_short.json"));

        let cli = Cli::try_parse_from(["pos-bench", "sweep", "--corpus", "brown"]).unwrap();
        let Commands::Sweep(args) = cli.command else {
            panic!("esperava sweep");
        };
        assert_eq!(args.category, "news");
        assert_eq!(args.max_n, 5);
    }

    #[test]
    fn test_precision_is_bounded() {
        let parse = |p: &str| {
            Cli::try_parse_from(["pos-bench", "run", "--corpus", "brown", "--precision", p])
        };
        assert!(parse("17").is_ok());
        assert!(parse("18").is_err());
        assert!(parse("400").is_err());
    }

    #[test]
    fn test_corpus_is_required() {
        assert!(Cli::try_parse_from(["pos-bench", "run"]).is_err());
    }
}
