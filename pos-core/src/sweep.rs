//! # Varredura da Ordem do N-grama
//!
//! Quanto o contexto ajuda? Treina um n-grama **sem backoff** para cada `n`
//! e mede a acurácia no conjunto de teste. Sem backoff, ordens maiores veem
//! contextos cada vez mais raros e a acurácia despenca, porque qualquer
//! contexto inédito deixa o token (e os seguintes) sem tag.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::corpus::{CorpusProvider, CorpusSplit};
use crate::error::Result;
use crate::ngram::NgramTagger;
use crate::tagger::Tagger;

/// Categoria usada quando nada é especificado.
pub const DEFAULT_SWEEP_CATEGORY: &str = "news";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub n: usize,
    pub accuracy: f64,
}

/// Acurácia de `NgramTagger(n)` para cada `n` em `orders`.
///
/// Falha com `InvalidConfig` se `orders` incluir 0 e com `EmptyReference` se o
/// teste ficar vazio.
pub fn ngram_sweep<P: CorpusProvider + ?Sized>(
    provider: &P,
    category: &str,
    orders: RangeInclusive<usize>,
    split_ratio: f64,
) -> Result<Vec<SweepPoint>> {
    let tagged_sents = provider.tagged_sents(category)?;
    let split = CorpusSplit::positional(&tagged_sents, split_ratio)?;

    let mut points = Vec::new();
    for n in orders {
        let tagger: Tagger = NgramTagger::train(n, &split.train, None, 0)?.into();
        let accuracy = tagger.accuracy(&split.test)?;
        info!("{}: n = {} → {}", category, n, accuracy);
        points.push(SweepPoint { n, accuracy });
    }
    Ok(points)
}
