//! # Montagem das Cadeias de Etiquetadores
//!
//! Constrói cada etiquetador do experimento com sua ordem de fallback
//! explícita:
//!
//! | Etiquetador | Cadeia                                  | Dados de treino        |
//! |-------------|-----------------------------------------|------------------------|
//! | default     | `Default`                               | —                      |
//! | regexp      | `Regexp → Default`                      | —                      |
//! | lookup      | `Lookup(top-N) → Default`               | palavras da categoria  |
//! | unigram     | `Unigram`                               | treino (90%)           |
//! | bigram      | `Bigram`                                | treino (90%)           |
//! | combined    | `Bigram → Unigram → Default`            | treino (90%)           |
//!
//! A tag do `Default` vem de [`FallbackTagSource`]: ou uma constante
//! (tipicamente `"NN"`) ou a tag mais frequente da categoria.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::{TaggedSentence, TaggedWord};
use crate::error::{PosError, Result};
use crate::freq::{ConditionalFreqDist, FreqDist};
use crate::ngram::NgramTagger;
use crate::rule_based::RegexpTagger;
use crate::tagger::{DefaultTagger, LookupTagger, Tagger};

/// Tag usada quando a fonte é fixa e nada foi especificado.
pub const DEFAULT_FIXED_TAG: &str = "NN";

/// De onde vem a tag do etiquetador padrão.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTagSource {
    /// Sempre a mesma tag, ex: `Fixed("NN")`.
    Fixed(String),
    /// A tag mais frequente entre as palavras etiquetadas da categoria.
    MostFrequentInCorpus,
}

impl Default for FallbackTagSource {
    fn default() -> Self {
        FallbackTagSource::MostFrequentInCorpus
    }
}

impl FallbackTagSource {
    /// Resolve a tag concreta para uma categoria.
    pub fn resolve(&self, category: &str, tagged_words: &[TaggedWord]) -> Result<String> {
        match self {
            FallbackTagSource::Fixed(tag) => Ok(tag.clone()),
            FallbackTagSource::MostFrequentInCorpus => most_frequent_tag(tagged_words)
                .ok_or_else(|| PosError::EmptyCorpus(category.to_string())),
        }
    }
}

/// Parâmetros das cadeias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Quantas palavras frequentes entram no etiquetador lookup.
    pub lookup_size: usize,
    pub fallback: FallbackTagSource,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            lookup_size: 100,
            fallback: FallbackTagSource::default(),
        }
    }
}

/// Tag mais frequente; empates vão para a que apareceu primeiro.
pub fn most_frequent_tag(tagged_words: &[TaggedWord]) -> Option<String> {
    let fd: FreqDist<&str> = tagged_words.iter().map(|tw| tw.tag.as_str()).collect();
    fd.max().map(|tag| tag.to_string())
}

/// Tabela das `size` palavras mais frequentes → sua tag mais comum.
///
/// `words` define a frequência das palavras; `tagged_words` define, para cada
/// palavra, a distribuição condicional de tags.
pub fn likely_tags(words: &[String], tagged_words: &[TaggedWord], size: usize) -> HashMap<String, String> {
    let fd: FreqDist<&str> = words.iter().map(String::as_str).collect();
    let cfd: ConditionalFreqDist<&str, &str> = tagged_words
        .iter()
        .map(|tw| (tw.word.as_str(), tw.tag.as_str()))
        .collect();

    fd.most_common(size)
        .into_iter()
        .filter_map(|(word, _)| {
            let tag = cfd.get(word)?.max()?;
            Some((word.to_string(), tag.to_string()))
        })
        .collect()
}

/// Constrói os etiquetadores de uma categoria a partir da tag de fallback já
/// resolvida.
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    config: ChainConfig,
    fallback_tag: String,
}

impl ChainBuilder {
    /// Resolve a tag de fallback a partir das palavras etiquetadas da categoria.
    pub fn new(config: ChainConfig, category: &str, tagged_words: &[TaggedWord]) -> Result<Self> {
        let fallback_tag = config.fallback.resolve(category, tagged_words)?;
        debug!("{}: tag de fallback = {}", category, fallback_tag);
        Ok(Self {
            config,
            fallback_tag,
        })
    }

    /// Builder com uma tag de fallback conhecida.
    pub fn with_fallback_tag(config: ChainConfig, fallback_tag: impl Into<String>) -> Self {
        Self {
            config,
            fallback_tag: fallback_tag.into(),
        }
    }

    pub fn fallback_tag(&self) -> &str {
        &self.fallback_tag
    }

    pub fn default_tagger(&self) -> Tagger {
        DefaultTagger::new(&self.fallback_tag).into()
    }

    /// Regras de sufixo do Brown, caindo no `Default`.
    pub fn regexp(&self) -> Result<Tagger> {
        Ok(RegexpTagger::brown()?
            .with_backoff(self.default_tagger())
            .into())
    }

    /// Top-N palavras → tag mais comum, caindo no `Default`.
    pub fn lookup(&self, words: &[String], tagged_words: &[TaggedWord]) -> Tagger {
        let model = likely_tags(words, tagged_words, self.config.lookup_size);
        LookupTagger::new(model)
            .with_backoff(self.default_tagger())
            .into()
    }

    /// Unigrama sem backoff.
    pub fn unigram(&self, train: &[TaggedSentence]) -> Tagger {
        NgramTagger::unigram(train, None).into()
    }

    /// Bigrama sem backoff.
    pub fn bigram(&self, train: &[TaggedSentence]) -> Tagger {
        NgramTagger::bigram(train, None).into()
    }

    /// `Bigram → Unigram → Default`, todos treinados com `train`.
    pub fn combined(&self, train: &[TaggedSentence]) -> Tagger {
        let unigram = NgramTagger::unigram(train, Some(self.default_tagger()));
        NgramTagger::bigram(train, Some(unigram.into())).into()
    }
}
