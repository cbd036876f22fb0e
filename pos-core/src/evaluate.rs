//! # Avaliação de Etiquetadores
//!
//! Roda um etiquetador sobre uma sentença de amostra (diagnóstico) e mede a
//! acurácia contra um conjunto de referência.
//!
//! O conjunto de referência muda conforme o etiquetador: os que não são
//! treinados com a divisão (default, regexp, lookup) são medidos contra o corpus
//! **inteiro** da categoria; os treinados com os 90% são medidos contra os 10%
//! restantes. Cada [`Evaluation`] registra qual foi usado, já que as acurácias
//! dos dois grupos não são diretamente comparáveis.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::TaggedSentence;
use crate::error::Result;
use crate::tagger::{NamedTagger, TaggedToken};

/// Quantos tokens da amostra são guardados para inspeção.
pub const PREVIEW_LEN: usize = 10;

/// Conjunto de sentenças contra o qual a acurácia foi medida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Todas as sentenças da categoria (inclui dados de treino dos lookups).
    FullCorpus,
    /// Só a parte de teste da divisão posicional.
    HeldOut,
}

impl ReferenceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::FullCorpus => "corpus completo",
            ReferenceKind::HeldOut => "teste",
        }
    }
}

/// Resultado da avaliação de um etiquetador.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub name: String,
    /// Cadeia de backoff, ex: `"Bigram -> Unigram -> Default"`.
    pub chain: String,
    /// Fração de acertos em [0, 1].
    pub accuracy: f64,
    pub reference: ReferenceKind,
    /// Primeiros tokens da amostra etiquetada.
    pub preview: Vec<TaggedToken>,
}

/// Etiqueta `sample` e mede a acurácia contra `reference`.
///
/// Falha com `EmptyReference` se a referência não tiver tokens.
pub fn evaluate<S: AsRef<str>>(
    named: &NamedTagger,
    sample: &[S],
    reference: &[TaggedSentence],
    kind: ReferenceKind,
) -> Result<Evaluation> {
    let mut preview = named.tagger.tag(sample);
    preview.truncate(PREVIEW_LEN);
    let accuracy = named.tagger.accuracy(reference)?;
    debug!(
        "{}: {} sentenças de referência, acurácia {}",
        named.name,
        reference.len(),
        accuracy
    );

    Ok(Evaluation {
        name: named.name.clone(),
        chain: named.tagger.chain_description(),
        accuracy,
        reference: kind,
        preview,
    })
}

/// `[("The", AT), ("jury", NN)]`
pub fn format_preview(tokens: &[TaggedToken]) -> String {
    let items: Vec<String> = tokens.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TaggedWord;
    use crate::error::PosError;
    use crate::tagger::DefaultTagger;

    fn gold() -> Vec<TaggedSentence> {
        vec![vec![
            TaggedWord::new("The", "AT"),
            TaggedWord::new("jury", "NN"),
            TaggedWord::new("said", "VBD"),
            TaggedWord::new("so", "RB"),
        ]]
    }

    #[test]
    fn test_evaluate_default_tagger() {
        let named = NamedTagger::new("DefaultTagger", DefaultTagger::new("NN"));
        let eval = evaluate(&named, &["a", "b"], &gold(), ReferenceKind::FullCorpus).unwrap();
        assert_eq!(eval.name, "DefaultTagger");
        assert_eq!(eval.chain, "Default");
        assert_eq!(eval.accuracy, 0.25);
        assert_eq!(eval.reference, ReferenceKind::FullCorpus);
        assert_eq!(eval.preview.len(), 2);
    }

    #[test]
    fn test_preview_is_truncated() {
        let named = NamedTagger::new("DefaultTagger", DefaultTagger::new("NN"));
        let sample: Vec<String> = (0..25).map(|i| format!("w{i}")).collect();
        let eval = evaluate(&named, &sample, &gold(), ReferenceKind::HeldOut).unwrap();
        assert_eq!(eval.preview.len(), PREVIEW_LEN);
        assert_eq!(eval.preview[9].word, "w9");
    }

    #[test]
    fn test_empty_sample_is_fine() {
        let named = NamedTagger::new("DefaultTagger", DefaultTagger::new("NN"));
        let sample: [&str; 0] = [];
        let eval = evaluate(&named, &sample, &gold(), ReferenceKind::HeldOut).unwrap();
        assert!(eval.preview.is_empty());
    }

    #[test]
    fn test_empty_reference_is_rejected() {
        let named = NamedTagger::new("DefaultTagger", DefaultTagger::new("NN"));
        let result = evaluate(&named, &["a"], &[], ReferenceKind::HeldOut);
        assert!(matches!(result, Err(PosError::EmptyReference)));
    }

    #[test]
    fn test_format_preview() {
        let tokens = vec![
            TaggedToken {
                word: "The".to_string(),
                tag: Some("AT".to_string()),
            },
            TaggedToken {
                word: "jury".to_string(),
                tag: None,
            },
        ];
        assert_eq!(format_preview(&tokens), "[(\"The\", AT), (\"jury\", None)]");
    }
}
