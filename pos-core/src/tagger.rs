//! # Etiquetadores com Backoff
//!
//! Todos os etiquetadores compartilham a mesma capacidade: dada uma sequência
//! de palavras, devolver uma tag para cada uma e medir a própria acurácia
//! contra sentenças de referência.
//!
//! ## Cadeia de Backoff
//!
//! Cada variante (exceto `Default`) pode **possuir** um etiquetador de
//! fallback. Quando ela não sabe etiquetar um token (palavra desconhecida,
//! contexto de bigrama nunca visto...), a decisão desce para o próximo da
//! cadeia:
//!
//! ```text
//! Bigram ──falhou──▶ Unigram ──falhou──▶ Default("NN")  (nunca falha)
//! ```
//!
//! A cadeia é uma lista ligada de `Box<Tagger>`: finita, acíclica e sem
//! referências compartilhadas.
//!
//! ## Histórico
//!
//! Ao etiquetar, o histórico passado para cada token são as tags **preditas**
//! para os tokens anteriores da mesma sentença (podendo conter `None`). No
//! treino dos modelos de contexto o histórico são as tags de referência.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::TaggedSentence;
use crate::error::{PosError, Result};
use crate::ngram::NgramTagger;
use crate::rule_based::RegexpTagger;

/// Saída de um etiquetador: a palavra e a tag escolhida.
///
/// `tag == None` só acontece quando nenhum etiquetador da cadeia conseguiu
/// decidir (cadeia sem `Default` no final).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,
    pub tag: Option<String>,
}

impl fmt::Display for TaggedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {})", self.word, self.tag.as_deref().unwrap_or("None"))
    }
}

/// Atribui a mesma tag a qualquer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTagger {
    tag: String,
}

impl DefaultTagger {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Tabela fixa `palavra → tag`, montada fora do etiquetador
/// (ex: as N palavras mais frequentes e sua tag mais comum).
#[derive(Debug, Clone)]
pub struct LookupTagger {
    model: HashMap<String, String>,
    backoff: Option<Box<Tagger>>,
}

impl LookupTagger {
    pub fn new(model: HashMap<String, String>) -> Self {
        Self {
            model,
            backoff: None,
        }
    }

    pub fn with_backoff(mut self, backoff: Tagger) -> Self {
        self.backoff = Some(Box::new(backoff));
        self
    }
}

/// Etiquetador polimórfico: uma variante por estratégia.
#[derive(Debug, Clone)]
pub enum Tagger {
    /// Tag constante; terminal de toda cadeia bem formada.
    Default(DefaultTagger),
    /// Regras regex em ordem; a primeira que casar decide.
    Regexp(RegexpTagger),
    /// Tabela palavra → tag dada pronta.
    Lookup(LookupTagger),
    /// Tabela de contexto (n-1 tags anteriores + palavra) aprendida do treino.
    Ngram(NgramTagger),
}

impl Tagger {
    /// Nome curto da estratégia (usado nos logs de cadeia).
    pub fn kind(&self) -> String {
        match self {
            Tagger::Default(_) => "Default".to_string(),
            Tagger::Regexp(_) => "Regexp".to_string(),
            Tagger::Lookup(_) => "Lookup".to_string(),
            Tagger::Ngram(t) => match t.order() {
                1 => "Unigram".to_string(),
                2 => "Bigram".to_string(),
                3 => "Trigram".to_string(),
                n => format!("{n}-gram"),
            },
        }
    }

    /// Próximo etiquetador da cadeia, se houver.
    pub fn backoff(&self) -> Option<&Tagger> {
        match self {
            Tagger::Default(_) => None,
            Tagger::Regexp(t) => t.backoff(),
            Tagger::Lookup(t) => t.backoff.as_deref(),
            Tagger::Ngram(t) => t.backoff(),
        }
    }

    /// Descrição da cadeia inteira, ex: `"Bigram -> Unigram -> Default"`.
    pub fn chain_description(&self) -> String {
        let mut kinds = vec![self.kind()];
        let mut current = self.backoff();
        while let Some(t) = current {
            kinds.push(t.kind());
            current = t.backoff();
        }
        kinds.join(" -> ")
    }

    /// Decisão **deste** etiquetador, sem consultar o backoff.
    ///
    /// `index < tokens.len()` e `history.len() >= index`.
    pub(crate) fn choose_tag(&self, tokens: &[&str], index: usize, history: &[Option<&str>]) -> Option<&str> {
        match self {
            Tagger::Default(t) => Some(t.tag()),
            Tagger::Regexp(t) => t.choose_tag(tokens[index]),
            Tagger::Lookup(t) => t.model.get(tokens[index]).map(String::as_str),
            Tagger::Ngram(t) => t.choose_tag(tokens, index, history),
        }
    }

    /// Decisão da cadeia: o primeiro etiquetador que souber responder.
    pub(crate) fn tag_one(&self, tokens: &[&str], index: usize, history: &[Option<&str>]) -> Option<&str> {
        let mut current = Some(self);
        while let Some(tagger) = current {
            if let Some(tag) = tagger.choose_tag(tokens, index, history) {
                return Some(tag);
            }
            current = tagger.backoff();
        }
        None
    }

    /// Etiqueta uma sentença, alimentando o histórico com as próprias predições.
    fn predict<'a>(&'a self, words: &[&str]) -> Vec<Option<&'a str>> {
        let mut history: Vec<Option<&'a str>> = Vec::with_capacity(words.len());
        for index in 0..words.len() {
            let tag = self.tag_one(words, index, &history);
            history.push(tag);
        }
        history
    }

    pub fn tag<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<TaggedToken> {
        let words: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        let tags = self.predict(&words);
        words
            .iter()
            .zip(tags)
            .map(|(word, tag)| TaggedToken {
                word: word.to_string(),
                tag: tag.map(str::to_string),
            })
            .collect()
    }

    /// Cada sentença é etiquetada de forma independente (histórico zerado).
    pub fn tag_sents<S: AsRef<str>>(&self, sentences: &[Vec<S>]) -> Vec<Vec<TaggedToken>> {
        sentences.iter().map(|s| self.tag(s)).collect()
    }

    /// Fração de tokens cuja tag predita coincide com a de referência.
    ///
    /// As palavras de cada sentença de `gold` são re-etiquetadas sem as tags
    /// e comparadas token a token. Uma referência sem tokens não tem acurácia
    /// definida e resulta em [`PosError::EmptyReference`].
    pub fn accuracy(&self, gold: &[TaggedSentence]) -> Result<f64> {
        let mut total = 0usize;
        let mut correct = 0usize;

        for sentence in gold {
            let words: Vec<&str> = sentence.iter().map(|tw| tw.word.as_str()).collect();
            let predicted = self.predict(&words);
            for (reference, tag) in sentence.iter().zip(predicted) {
                total += 1;
                if tag == Some(reference.tag.as_str()) {
                    correct += 1;
                }
            }
        }

        if total == 0 {
            return Err(PosError::EmptyReference);
        }
        Ok(correct as f64 / total as f64)
    }
}

impl From<DefaultTagger> for Tagger {
    fn from(t: DefaultTagger) -> Self {
        Tagger::Default(t)
    }
}

impl From<RegexpTagger> for Tagger {
    fn from(t: RegexpTagger) -> Self {
        Tagger::Regexp(t)
    }
}

impl From<LookupTagger> for Tagger {
    fn from(t: LookupTagger) -> Self {
        Tagger::Lookup(t)
    }
}

impl From<NgramTagger> for Tagger {
    fn from(t: NgramTagger) -> Self {
        Tagger::Ngram(t)
    }
}

/// Um etiquetador com o nome de exibição usado nos resultados.
///
/// O nome é independente da variante: dois unigramas treinados com dados
/// diferentes (`UnigramTagger`, `UnigramTaggerWithAllData`) convivem no mesmo
/// resultado sem se sobrescrever.
#[derive(Debug, Clone)]
pub struct NamedTagger {
    pub name: String,
    pub tagger: Tagger,
}

impl NamedTagger {
    pub fn new(name: impl Into<String>, tagger: impl Into<Tagger>) -> Self {
        Self {
            name: name.into(),
            tagger: tagger.into(),
        }
    }
}
