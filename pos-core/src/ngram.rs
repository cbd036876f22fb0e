//! # Etiquetadores N-grama
//!
//! Um etiquetador n-grama aprende, do corpus de treino, a tag mais frequente
//! para cada **contexto** `(n-1 tags anteriores, palavra atual)`:
//!
//! - `n = 1` (unigrama): contexto = só a palavra;
//! - `n = 2` (bigrama): contexto = (tag anterior, palavra).
//!
//! No começo da sentença o contexto de tags é truncado (fica vazio para o
//! primeiro token).
//!
//! ## Treino com backoff
//!
//! Um contexto só entra no modelo se for **útil**: quando não há backoff, ou
//! quando o backoff erraria a tag de referência naquele ponto. Contextos em que
//! o backoff já acerta são descartados, o que deixa a tabela menor e garante
//! que todo token fora dela seja etiquetado exatamente como o backoff faria.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::corpus::TaggedSentence;
use crate::error::{PosError, Result};
use crate::freq::ConditionalFreqDist;
use crate::tagger::Tagger;

/// Contexto de treino: tags anteriores + palavra.
type Context = (Vec<String>, String);

#[derive(Debug, Clone)]
pub struct NgramTagger {
    n: usize,
    /// palavra → (tags anteriores → tag).
    model: HashMap<String, HashMap<Vec<String>, String>>,
    backoff: Option<Box<Tagger>>,
}

impl NgramTagger {
    /// Treina um etiquetador de ordem `n`.
    ///
    /// `cutoff`: um contexto só é mantido se a tag vencedora tiver sido vista
    /// mais de `cutoff` vezes. Um treino vazio gera um modelo vazio, que sempre
    /// repassa a decisão ao backoff.
    pub fn train(
        n: usize,
        sentences: &[TaggedSentence],
        backoff: Option<Tagger>,
        cutoff: u64,
    ) -> Result<Self> {
        if n == 0 {
            return Err(PosError::InvalidConfig(
                "a ordem de um etiquetador n-grama deve ser >= 1".to_string(),
            ));
        }
        Ok(Self::fit(n, sentences, backoff, cutoff))
    }

    pub fn unigram(sentences: &[TaggedSentence], backoff: Option<Tagger>) -> Self {
        Self::fit(1, sentences, backoff, 0)
    }

    pub fn bigram(sentences: &[TaggedSentence], backoff: Option<Tagger>) -> Self {
        Self::fit(2, sentences, backoff, 0)
    }

    /// Contagem + poda. `n` já foi validado pelo chamador.
    fn fit(n: usize, sentences: &[TaggedSentence], backoff: Option<Tagger>, cutoff: u64) -> Self {
        let backoff = backoff.map(Box::new);

        let mut counts: ConditionalFreqDist<Context, String> = ConditionalFreqDist::new();
        let mut useful: HashSet<Context> = HashSet::new();

        for sentence in sentences {
            let words: Vec<&str> = sentence.iter().map(|tw| tw.word.as_str()).collect();
            let gold: Vec<Option<&str>> = sentence.iter().map(|tw| Some(tw.tag.as_str())).collect();

            for (index, reference) in sentence.iter().enumerate() {
                let start = index.saturating_sub(n - 1);
                let context: Context = (
                    sentence[start..index].iter().map(|tw| tw.tag.clone()).collect(),
                    reference.word.clone(),
                );
                counts.add(context.clone(), reference.tag.clone());

                let backoff_agrees = backoff.as_ref().is_some_and(|b| {
                    b.tag_one(&words, index, &gold[..index]) == Some(reference.tag.as_str())
                });
                if !backoff_agrees {
                    useful.insert(context);
                }
            }
        }

        let mut model: HashMap<String, HashMap<Vec<String>, String>> = HashMap::new();
        let mut size = 0usize;
        for context in useful {
            let Some(dist) = counts.get(&context) else {
                continue;
            };
            let Some(best) = dist.max() else {
                continue;
            };
            if dist.count(best) > cutoff {
                let best = best.clone();
                let (prev_tags, word) = context;
                model.entry(word).or_default().insert(prev_tags, best);
                size += 1;
            }
        }

        debug!(
            "{}-grama treinado: {} sentenças, {} contextos ({} vistos)",
            n,
            sentences.len(),
            size,
            counts.len()
        );

        Self { n, model, backoff }
    }

    pub fn order(&self) -> usize {
        self.n
    }

    pub fn backoff(&self) -> Option<&Tagger> {
        self.backoff.as_deref()
    }

    /// Número de contextos no modelo.
    pub fn size(&self) -> usize {
        self.model.values().map(HashMap::len).sum()
    }

    /// Tag do contexto atual, se ele estiver no modelo.
    ///
    /// Um `None` no histórico (token anterior sem tag) nunca casa com um
    /// contexto aprendido.
    pub(crate) fn choose_tag(&self, tokens: &[&str], index: usize, history: &[Option<&str>]) -> Option<&str> {
        let by_context = self.model.get(tokens[index])?;
        let start = index.saturating_sub(self.n - 1);
        let prev_tags = history[start..index]
            .iter()
            .map(|t| t.map(str::to_string))
            .collect::<Option<Vec<String>>>()?;
        by_context.get(&prev_tags).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::parse_tagged_line;
    use crate::tagger::DefaultTagger;

    fn sents(lines: &[&str]) -> Vec<TaggedSentence> {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| parse_tagged_line(l, "test", i + 1).unwrap())
            .collect()
    }

    #[test]
    fn test_unigram_picks_most_frequent_tag() {
        let train = sents(&[
            "the/at race/nn ended/vbd",
            "they/ppss race/vb cars/nns",
            "a/at race/nn started/vbd",
        ]);
        let tagger: Tagger = NgramTagger::unigram(&train, None).into();
        let tagged = tagger.tag(&["race", "unknown"]);
        assert_eq!(tagged[0].tag.as_deref(), Some("NN"));
        assert_eq!(tagged[1].tag, None);
    }

    #[test]
    fn test_bigram_uses_previous_tag() {
        let train = sents(&["to/to race/vb", "the/at race/nn", "to/to race/vb"]);
        let unigram = NgramTagger::unigram(&train, None);
        let bigram: Tagger = NgramTagger::bigram(&train, Some(unigram.into())).into();

        let tagged = bigram.tag(&["the", "race"]);
        assert_eq!(tagged[1].tag.as_deref(), Some("NN"));
        let tagged = bigram.tag(&["to", "race"]);
        assert_eq!(tagged[1].tag.as_deref(), Some("VB"));
    }

    #[test]
    fn test_bigram_without_backoff_misses_unseen_context() {
        let train = sents(&["the/at dog/nn"]);
        let bigram: Tagger = NgramTagger::bigram(&train, None).into();
        // "dog" no início da sentença nunca foi visto nesse contexto
        let tagged = bigram.tag(&["dog"]);
        assert_eq!(tagged[0].tag, None);
        // e um None no histórico propaga para o próximo token
        let tagged = bigram.tag(&["cat", "dog"]);
        assert_eq!(tagged[1].tag, None);
    }

    #[test]
    fn test_contexts_agreeing_with_backoff_are_pruned() {
        let train = sents(&["the/at dog/nn barks/vbz"]);
        let with_backoff = NgramTagger::unigram(&train, Some(DefaultTagger::new("NN").into()));
        // "dog" já sai NN pelo backoff, então não entra no modelo
        assert_eq!(with_backoff.size(), 2);

        let without = NgramTagger::unigram(&train, None);
        assert_eq!(without.size(), 3);
    }

    #[test]
    fn test_unknown_token_matches_backoff() {
        let train = sents(&["the/at dog/nn barks/vbz"]);
        let backoff: Tagger = DefaultTagger::new("UH").into();
        let tagger: Tagger = NgramTagger::unigram(&train, Some(backoff.clone())).into();

        for token in ["zebra", "", "42"] {
            assert_eq!(tagger.tag(&[token]), backoff.tag(&[token]));
        }
    }

    #[test]
    fn test_empty_training_defers_to_backoff() {
        let tagger: Tagger = NgramTagger::bigram(&[], Some(DefaultTagger::new("NN").into())).into();
        let tagged = tagger.tag(&["anything", "at", "all"]);
        assert!(tagged.iter().all(|t| t.tag.as_deref() == Some("NN")));

        let bare: Tagger = NgramTagger::unigram(&[], None).into();
        assert_eq!(bare.tag(&["x"])[0].tag, None);
    }

    #[test]
    fn test_cutoff_drops_rare_contexts() {
        let train = sents(&["rare/jj common/nn", "common/nn"]);
        let tagger = NgramTagger::train(1, &train, None, 1).unwrap();
        assert_eq!(tagger.size(), 1);
    }

    #[test]
    fn test_order_zero_is_rejected() {
        assert!(NgramTagger::train(0, &[], None, 0).is_err());
    }

    #[test]
    fn test_self_accuracy_is_one() {
        let train = sents(&[
            "the/at dog/nn barks/vbz",
            "a/at cat/nn sleeps/vbz ./.",
            "the/at cat/nn barks/vbz",
        ]);
        let unigram = NgramTagger::unigram(&train, Some(DefaultTagger::new("NN").into()));
        let bigram: Tagger = NgramTagger::bigram(&train, Some(unigram.into())).into();
        assert_eq!(bigram.accuracy(&train).unwrap(), 1.0);
    }
}
