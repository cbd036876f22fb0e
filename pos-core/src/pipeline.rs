//! # Execução dos Experimentos — Orquestrador com Eventos Observáveis
//!
//! Para cada categoria do corpus o runner:
//!
//! 1. busca as sentenças etiquetadas, as sentenças cruas e as palavras;
//! 2. resolve a tag de fallback (fixa ou a mais frequente da categoria);
//! 3. divide as sentenças em treino/teste (90/10, posicional);
//! 4. monta as cadeias de etiquetadores ([`crate::chain`]);
//! 5. avalia cada etiquetador contra a referência adequada;
//! 6. junta tudo num mapa `nome → acurácia`.
//!
//! As categorias são independentes entre si. Com `parallel = true` elas rodam
//! em paralelo via Rayon; o resultado é idêntico porque é indexado por
//! categoria e nome, nunca pela ordem de conclusão.
//!
//! Cada passo emite um [`ExperimentEvent`] por um canal `mpsc`, para quem
//! quiser acompanhar o progresso (o modo síncrono só registra os eventos no
//! log).

use std::sync::mpsc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::chain::{ChainBuilder, ChainConfig};
use crate::corpus::{CorpusProvider, CorpusSplit, CorpusStats};
use crate::error::{PosError, Result};
use crate::evaluate::{evaluate, format_preview, Evaluation, ReferenceKind};
use crate::report::{CategoryResult, ExperimentResult, FULL_RESULT_FILE, SHORT_RESULT_FILE};
use crate::tagger::NamedTagger;

/// Nomes de exibição gravados no documento de resultados.
pub mod names {
    pub const DEFAULT: &str = "DefaultTagger";
    pub const REGEXP: &str = "RegexpTagger";
    pub const LOOKUP: &str = "LookUpTagger";
    pub const UNIGRAM_ALL_DATA: &str = "UnigramTaggerWithAllData";
    pub const UNIGRAM: &str = "UnigramTagger";
    pub const BIGRAM: &str = "BigramTagger";
    pub const COMBINED: &str = "CombinedTagger";
}

/// Categorias do Brown usadas nos experimentos, na ordem de exibição.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "news",
    "adventure",
    "belles_lettres",
    "editorial",
    "fiction",
    "government",
    "hobbies",
];

/// Qual conjunto de etiquetadores avaliar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentVariant {
    /// Default, Regexp e Lookup (top-N) contra o corpus completo;
    /// Unigram, Bigram e Combined contra o teste.
    #[default]
    Full,
    /// Troca o Lookup por um unigrama treinado com **todas** as sentenças.
    Short,
}

impl ExperimentVariant {
    /// Arquivo de saída convencional da variante.
    pub fn default_output(&self) -> &'static str {
        match self {
            ExperimentVariant::Full => FULL_RESULT_FILE,
            ExperimentVariant::Short => SHORT_RESULT_FILE,
        }
    }
}

/// Configuração de uma execução.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub categories: Vec<String>,
    pub variant: ExperimentVariant,
    pub chain: ChainConfig,
    /// Fração das sentenças usada no treino.
    pub split_ratio: f64,
    /// Índice da sentença usada como amostra de diagnóstico.
    pub sample_index: usize,
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            variant: ExperimentVariant::default(),
            chain: ChainConfig::default(),
            split_ratio: CorpusSplit::DEFAULT_RATIO,
            sample_index: 3,
            parallel: false,
        }
    }
}

/// Eventos emitidos durante a execução de uma categoria.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ExperimentEvent {
    /// Dados carregados e divididos.
    CategoryStarted {
        category: String,
        stats: CorpusStats,
    },
    /// Tag do etiquetador padrão desta categoria.
    FallbackResolved {
        category: String,
        tag: String,
    },
    /// Um etiquetador foi avaliado.
    TaggerEvaluated {
        category: String,
        evaluation: Evaluation,
    },
    /// Fim da categoria, com o mapa consolidado.
    CategoryDone {
        category: String,
        results: CategoryResult,
    },
}

impl ExperimentEvent {
    /// Registra o evento no log.
    pub fn log(&self) {
        match self {
            ExperimentEvent::CategoryStarted { category, stats } => {
                info!("-----Category: {}-----", category);
                info!(
                    "Total sentences: {} | train_sents: {} | test_sents: {}",
                    stats.total_sentences, stats.train_sentences, stats.test_sentences
                );
            }
            ExperimentEvent::FallbackResolved { category, tag } => {
                info!("{}: tag de fallback {}", category, tag);
            }
            ExperimentEvent::TaggerEvaluated {
                category,
                evaluation,
            } => {
                info!(
                    "-----Tagger: {}----- ({}) [{}]",
                    evaluation.name, category, evaluation.chain
                );
                info!("Processed: {}...", format_preview(&evaluation.preview));
                info!(
                    "Accuracy: {} (referência: {})",
                    evaluation.accuracy,
                    evaluation.reference.label()
                );
            }
            ExperimentEvent::CategoryDone { category, results } => {
                debug!("{}: {} etiquetadores avaliados", category, results.len());
            }
        }
    }
}

/// Tudo o que uma categoria produziu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: String,
    pub stats: CorpusStats,
    pub fallback_tag: String,
    pub evaluations: Vec<Evaluation>,
}

impl CategoryReport {
    /// Mapa `nome → acurácia`; nomes repetidos ficam com a última avaliação.
    pub fn results(&self) -> CategoryResult {
        self.evaluations
            .iter()
            .map(|e| (e.name.clone(), e.accuracy))
            .collect()
    }
}

/// Executor dos experimentos.
#[derive(Debug, Clone)]
pub struct ExperimentRunner {
    config: ExperimentConfig,
}

impl ExperimentRunner {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.split_ratio) {
            return Err(PosError::InvalidConfig(format!(
                "split_ratio fora de [0, 1]: {}",
                config.split_ratio
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Roda uma categoria enviando eventos de progresso por `tx`.
    ///
    /// Um receptor desconectado não interrompe a execução.
    pub fn run_category_streaming<P: CorpusProvider + ?Sized>(
        &self,
        provider: &P,
        category: &str,
        tx: &mpsc::Sender<ExperimentEvent>,
    ) -> Result<CategoryReport> {
        let config = &self.config;

        // === Passo 1: dados ===
        let tagged_sents = provider.tagged_sents(category)?;
        let sents = provider.sents(category)?;
        let tagged_words = provider.tagged_words(category)?;

        let split = CorpusSplit::positional(&tagged_sents, config.split_ratio)?;
        let stats = split.stats();
        let _ = tx.send(ExperimentEvent::CategoryStarted {
            category: category.to_string(),
            stats,
        });

        // === Passo 2: tag de fallback ===
        let builder = ChainBuilder::new(config.chain.clone(), category, &tagged_words)?;
        let _ = tx.send(ExperimentEvent::FallbackResolved {
            category: category.to_string(),
            tag: builder.fallback_tag().to_string(),
        });

        let sample: &[String] = match sents.get(config.sample_index) {
            Some(sentence) => sentence,
            None => {
                warn!(
                    "{}: sem sentença de amostra no índice {} ({} sentenças)",
                    category,
                    config.sample_index,
                    sents.len()
                );
                &[]
            }
        };

        // === Passo 3: cadeias ===
        let mut untrained = vec![
            NamedTagger::new(names::DEFAULT, builder.default_tagger()),
            NamedTagger::new(names::REGEXP, builder.regexp()?),
        ];
        match config.variant {
            ExperimentVariant::Full => {
                let words = provider.words(category)?;
                untrained.push(NamedTagger::new(
                    names::LOOKUP,
                    builder.lookup(&words, &tagged_words),
                ));
            }
            ExperimentVariant::Short => {
                untrained.push(NamedTagger::new(
                    names::UNIGRAM_ALL_DATA,
                    builder.unigram(&tagged_sents),
                ));
            }
        }
        let trained = vec![
            NamedTagger::new(names::UNIGRAM, builder.unigram(&split.train)),
            NamedTagger::new(names::BIGRAM, builder.bigram(&split.train)),
            NamedTagger::new(names::COMBINED, builder.combined(&split.train)),
        ];

        // === Passo 4: avaliação ===
        let plan = untrained
            .iter()
            .map(|t| (t, tagged_sents.as_slice(), ReferenceKind::FullCorpus))
            .chain(
                trained
                    .iter()
                    .map(|t| (t, split.test.as_slice(), ReferenceKind::HeldOut)),
            );

        let mut evaluations = Vec::new();
        for (named, reference, kind) in plan {
            let evaluation = evaluate(named, sample, reference, kind)?;
            let _ = tx.send(ExperimentEvent::TaggerEvaluated {
                category: category.to_string(),
                evaluation: evaluation.clone(),
            });
            evaluations.push(evaluation);
        }

        let report = CategoryReport {
            category: category.to_string(),
            stats,
            fallback_tag: builder.fallback_tag().to_string(),
            evaluations,
        };
        let _ = tx.send(ExperimentEvent::CategoryDone {
            category: category.to_string(),
            results: report.results(),
        });
        Ok(report)
    }

    /// Roda uma categoria de forma síncrona; os eventos vão para o log.
    pub fn run_category<P: CorpusProvider + ?Sized>(
        &self,
        provider: &P,
        category: &str,
    ) -> Result<CategoryReport> {
        let (tx, rx) = mpsc::channel();
        let report = self.run_category_streaming(provider, category, &tx);
        drop(tx);
        for event in rx.try_iter() {
            event.log();
        }
        report
    }

    /// Roda todas as categorias configuradas e devolve os relatórios na ordem
    /// da configuração.
    pub fn run_reports<P: CorpusProvider + Sync + ?Sized>(&self, provider: &P) -> Result<Vec<CategoryReport>> {
        let categories = &self.config.categories;
        info!(
            "Rodando {} categorias ({:?}, paralelo: {})",
            categories.len(),
            self.config.variant,
            self.config.parallel
        );
        if self.config.parallel {
            categories
                .par_iter()
                .map(|category| self.run_category(provider, category))
                .collect()
        } else {
            categories
                .iter()
                .map(|category| self.run_category(provider, category))
                .collect()
        }
    }

    /// Roda todas as categorias e consolida `categoria → nome → acurácia`.
    pub fn run<P: CorpusProvider + Sync + ?Sized>(&self, provider: &P) -> Result<ExperimentResult> {
        let mut result = ExperimentResult::new();
        for report in self.run_reports(provider)? {
            result.extend_category(&report.category, report.results());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::InMemoryCorpus;

    const SENTENCES: [&str; 10] = [
        "The/at jury/nn said/vbd it/pps did/dod ./.",
        "The/at city/nn voted/vbd ./.",
        "A/at dog/nn barks/vbz at/in the/at cat/nn ./.",
        "The/at jury/nn praised/vbd the/at city/nn ./.",
        "It/pps was/bedz raining/vbg ./.",
        "The/at cat/nn sleeps/vbz ./.",
        "He/pps said/vbd the/at dogs/nns ran/vbd ./.",
        "The/at council/nn voted/vbd again/rb ./.",
        "She/pps would/md go/vb ./.",
        "The/at jury/nn said/vbd the/at city/nn voted/vbd ./.",
    ];

    fn corpus() -> InMemoryCorpus {
        let mut corpus = InMemoryCorpus::new();
        corpus.insert_lines("news", SENTENCES).unwrap();
        corpus.insert_lines("fiction", SENTENCES[..5].iter().copied()).unwrap();
        corpus
    }

    fn config(categories: &[&str]) -> ExperimentConfig {
        ExperimentConfig {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn test_full_variant_names() {
        let runner = ExperimentRunner::new(config(&["news"])).unwrap();
        let report = runner.run_category(&corpus(), "news").unwrap();

        let evaluated: Vec<&str> = report.evaluations.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            evaluated,
            vec![
                names::DEFAULT,
                names::REGEXP,
                names::LOOKUP,
                names::UNIGRAM,
                names::BIGRAM,
                names::COMBINED
            ]
        );
        assert_eq!(report.stats.train_sentences, 9);
        assert_eq!(report.stats.test_sentences, 1);
        assert_eq!(report.fallback_tag, "AT");

        for e in &report.evaluations {
            assert!((0.0..=1.0).contains(&e.accuracy), "{}: {}", e.name, e.accuracy);
        }
        assert_eq!(report.evaluations[0].reference, ReferenceKind::FullCorpus);
        assert_eq!(report.evaluations[5].reference, ReferenceKind::HeldOut);
        // amostra = quarta sentença
        assert_eq!(report.evaluations[0].preview[1].word, "jury");
    }

    #[test]
    fn test_short_variant_uses_all_data_unigram() {
        let mut cfg = config(&["news"]);
        cfg.variant = ExperimentVariant::Short;
        let runner = ExperimentRunner::new(cfg).unwrap();
        let report = runner.run_category(&corpus(), "news").unwrap();
        let results = report.results();

        assert!(results.contains_key(names::UNIGRAM_ALL_DATA));
        assert!(!results.contains_key(names::LOOKUP));
        // treinado e medido no corpus inteiro, sem palavras ambíguas
        assert_eq!(results[names::UNIGRAM_ALL_DATA], 1.0);
    }

    #[test]
    fn test_combined_is_deterministic_on_ten_sentences() {
        let runner = ExperimentRunner::new(config(&["news"])).unwrap();
        let first = runner.run(&corpus()).unwrap();
        let second = runner.run(&corpus()).unwrap();

        assert_eq!(first, second);
        let combined = first.accuracy("news", names::COMBINED).unwrap();
        // a sentença de teste só tem palavras vistas no treino
        assert_eq!(combined, 1.0);
    }

    #[test]
    fn test_fixed_fallback_tag() {
        let mut cfg = config(&["news"]);
        cfg.chain.fallback = crate::chain::FallbackTagSource::Fixed("NN".to_string());
        let runner = ExperimentRunner::new(cfg).unwrap();
        let report = runner.run_category(&corpus(), "news").unwrap();
        assert_eq!(report.fallback_tag, "NN");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = ExperimentRunner::new(config(&["news", "fiction"]))
            .unwrap()
            .run(&corpus())
            .unwrap();
        let mut cfg = config(&["news", "fiction"]);
        cfg.parallel = true;
        let parallel = ExperimentRunner::new(cfg).unwrap().run(&corpus()).unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), 2);
    }

    #[test]
    fn test_streaming_event_order() {
        let runner = ExperimentRunner::new(config(&["news"])).unwrap();
        let (tx, rx) = mpsc::channel();
        runner.run_category_streaming(&corpus(), "news", &tx).unwrap();
        drop(tx);

        let events: Vec<ExperimentEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2 + 6 + 1);
        assert!(matches!(&events[0], ExperimentEvent::CategoryStarted { .. }));
        assert!(matches!(&events[1], ExperimentEvent::FallbackResolved { .. }));
        assert!(matches!(
            events.last().unwrap(),
            ExperimentEvent::CategoryDone { .. }
        ));
    }

    #[test]
    fn test_unknown_category_fails() {
        let runner = ExperimentRunner::new(config(&["romance"])).unwrap();
        assert!(matches!(
            runner.run(&corpus()),
            Err(PosError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_empty_test_split_is_a_precondition_violation() {
        // 5 sentenças → 4 de treino, 1 de teste; com ratio 1.0 o teste fica vazio
        let mut cfg = config(&["fiction"]);
        cfg.split_ratio = 1.0;
        let runner = ExperimentRunner::new(cfg).unwrap();
        assert!(matches!(
            runner.run(&corpus()),
            Err(PosError::EmptyReference)
        ));
    }

    #[test]
    fn test_missing_sample_sentence_is_not_fatal() {
        let mut cfg = config(&["fiction"]);
        cfg.sample_index = 50;
        let runner = ExperimentRunner::new(cfg).unwrap();
        let report = runner.run_category(&corpus(), "fiction").unwrap();
        assert!(report.evaluations.iter().all(|e| e.preview.is_empty()));
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let mut cfg = config(&["news"]);
        cfg.split_ratio = 2.0;
        assert!(ExperimentRunner::new(cfg).is_err());
    }
}
