//! # pos-core — Experimentos de Etiquetagem Morfossintática (POS) no Brown
//!
//! Este crate treina e avalia etiquetadores de classe gramatical (POS taggers)
//! sobre as categorias do corpus Brown e grava as acurácias em JSON. É
//! deliberadamente pequeno: implementa só a semântica de etiquetadores
//! sequenciais com backoff que os experimentos precisam.
//!
//! ## Arquitetura
//!
//! O fluxo de uma execução, por categoria:
//!
//! 1.  **Corpus** ([`corpus`], [`brown`]): sentenças etiquetadas `palavra/TAG`.
//! 2.  **Divisão**: 90% treino / 10% teste, posicional.
//! 3.  **Cadeias** ([`chain`]): monta cada etiquetador com seu fallback:
//!     *   **Default**: sempre a mesma tag.
//!     *   **Regexp** ([`rule_based`]): sufixos do inglês (`-ing`, `-ed`, ...).
//!     *   **Lookup** ([`tagger`]): as N palavras mais frequentes.
//!     *   **N-gramas** ([`ngram`]): unigrama, bigrama e a combinação
//!         `Bigram → Unigram → Default`.
//! 4.  **Avaliação** ([`evaluate`]): acurácia por token contra a referência.
//! 5.  **Saída** ([`report`]): `categoria → etiquetador → acurácia` em JSON e
//!     uma tabela resumida com a média.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use pos_core::{ExperimentConfig, ExperimentRunner, InMemoryCorpus};
//!
//! let mut corpus = InMemoryCorpus::new();
//! corpus
//!     .insert_lines("news", ["The/at jury/nn said/vbd ./.", "It/pps said/vbd ./."])
//!     .unwrap();
//!
//! let config = ExperimentConfig {
//!     categories: vec!["news".to_string()],
//!     split_ratio: 0.5,
//!     ..ExperimentConfig::default()
//! };
//! let result = ExperimentRunner::new(config).unwrap().run(&corpus).unwrap();
//!
//! for (name, accuracy) in result.get("news").unwrap() {
//!     println!("{name}: {accuracy:.3}");
//! }
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Orquestrador que roda as categorias e emite eventos.
//! - [`tagger`]: O tipo [`Tagger`] e o protocolo de backoff.
//! - [`freq`]: Distribuições de frequência com desempate estável.
//! - [`sweep`]: Acurácia de n-gramas puros para n = 1..5.

pub mod brown;
pub mod chain;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod freq;
pub mod ngram;
pub mod pipeline;
pub mod report;
pub mod rule_based;
pub mod sweep;
pub mod tagger;

pub use brown::BrownCorpus;
pub use chain::{ChainBuilder, ChainConfig, FallbackTagSource};
pub use corpus::{CorpusProvider, CorpusSplit, InMemoryCorpus, TaggedSentence, TaggedWord};
pub use error::{PosError, Result};
pub use evaluate::{Evaluation, ReferenceKind};
pub use pipeline::{ExperimentConfig, ExperimentEvent, ExperimentRunner, ExperimentVariant};
pub use report::{ExperimentResult, Orientation, ReportTable, SinkOptions};
pub use sweep::{ngram_sweep, SweepPoint};
pub use tagger::{NamedTagger, TaggedToken, Tagger};
