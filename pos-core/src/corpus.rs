//! # Corpus Etiquetado e Divisão Treino/Teste
//!
//! Tipos básicos do corpus (palavra + tag POS) e o contrato do **provedor de
//! corpus**: para cada categoria ele expõe as quatro visões usadas pelos
//! experimentos.
//!
//! | Visão            | Forma                          |
//! |------------------|--------------------------------|
//! | `tagged_sents`   | sentenças de `(palavra, tag)`  |
//! | `sents`          | sentenças de palavras          |
//! | `tagged_words`   | lista plana de `(palavra, tag)`|
//! | `words`          | lista plana de palavras        |
//!
//! A divisão treino/teste é **posicional**: os primeiros 90% das sentenças
//! vão para treino e o resto para teste. Nada é embaralhado, então o
//! resultado é o mesmo a cada execução sobre o mesmo corpus.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PosError, Result};

/// Um token do corpus com sua tag de referência (gold).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedWord {
    pub word: String,
    pub tag: String,
}

impl TaggedWord {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// Sentença anotada: sequência ordenada de tokens etiquetados.
pub type TaggedSentence = Vec<TaggedWord>;

/// Separa `palavra/tag` no **último** `/` e coloca a tag em maiúsculas.
///
/// Retorna `None` se não houver separador. Ex: `"1/2/cd"` → `("1/2", "CD")`.
pub fn split_tagged_token(token: &str) -> Option<TaggedWord> {
    let pos = token.rfind('/')?;
    Some(TaggedWord::new(&token[..pos], token[pos + 1..].to_uppercase()))
}

/// Lê uma linha no formato `The/at jury/nn ./.` como uma sentença.
///
/// `source_name` e `line` só entram na mensagem de erro.
pub fn parse_tagged_line(text: &str, source_name: &str, line: usize) -> Result<TaggedSentence> {
    text.split_whitespace()
        .map(|token| {
            split_tagged_token(token).ok_or_else(|| PosError::MalformedToken {
                token: token.to_string(),
                source_name: source_name.to_string(),
                line,
            })
        })
        .collect()
}

/// Remove as tags de uma sentença.
pub fn untag(sentence: &[TaggedWord]) -> Vec<String> {
    sentence.iter().map(|tw| tw.word.clone()).collect()
}

/// Provedor de corpus por categoria.
///
/// Só `categories` e `tagged_sents` são obrigatórios; as demais visões são
/// derivadas delas, mas implementações que já guardam os dados em outra forma
/// podem sobrescrevê-las.
pub trait CorpusProvider {
    /// Categorias disponíveis, em ordem estável.
    fn categories(&self) -> Vec<String>;

    fn tagged_sents(&self, category: &str) -> Result<Vec<TaggedSentence>>;

    fn sents(&self, category: &str) -> Result<Vec<Vec<String>>> {
        Ok(self.tagged_sents(category)?.iter().map(|s| untag(s)).collect())
    }

    fn tagged_words(&self, category: &str) -> Result<Vec<TaggedWord>> {
        Ok(self.tagged_sents(category)?.into_iter().flatten().collect())
    }

    fn words(&self, category: &str) -> Result<Vec<String>> {
        Ok(self
            .tagged_sents(category)?
            .into_iter()
            .flatten()
            .map(|tw| tw.word)
            .collect())
    }
}

/// Corpus mantido em memória. Usado em testes e com dados sintéticos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    order: Vec<String>,
    sentences: HashMap<String, Vec<TaggedSentence>>,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acrescenta sentenças a uma categoria (criando-a se preciso).
    pub fn insert(&mut self, category: &str, sents: impl IntoIterator<Item = TaggedSentence>) {
        if !self.sentences.contains_key(category) {
            self.order.push(category.to_string());
        }
        self.sentences
            .entry(category.to_string())
            .or_default()
            .extend(sents);
    }

    /// Constrói uma categoria a partir de linhas `palavra/tag`.
    pub fn insert_lines<'a>(
        &mut self,
        category: &str,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        let mut parsed = Vec::new();
        for (i, line) in lines.into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            parsed.push(parse_tagged_line(line, category, i + 1)?);
        }
        self.insert(category, parsed);
        Ok(())
    }
}

impl CorpusProvider for InMemoryCorpus {
    fn categories(&self) -> Vec<String> {
        self.order.clone()
    }

    fn tagged_sents(&self, category: &str) -> Result<Vec<TaggedSentence>> {
        self.sentences
            .get(category)
            .cloned()
            .ok_or_else(|| PosError::UnknownCategory(category.to_string()))
    }
}

/// Divisão posicional em treino e teste.
#[derive(Debug, Clone)]
pub struct CorpusSplit {
    pub train: Vec<TaggedSentence>,
    pub test: Vec<TaggedSentence>,
}

impl CorpusSplit {
    /// Proporção usada em todos os experimentos.
    pub const DEFAULT_RATIO: f64 = 0.9;

    /// `train = sents[..floor(ratio * n)]`, `test = sents[floor(ratio * n)..]`.
    pub fn positional(sents: &[TaggedSentence], ratio: f64) -> Result<Self> {
        let size = train_size(sents.len(), ratio)?;
        Ok(Self {
            train: sents[..size].to_vec(),
            test: sents[size..].to_vec(),
        })
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            total_sentences: self.train.len() + self.test.len(),
            train_sentences: self.train.len(),
            test_sentences: self.test.len(),
        }
    }
}

/// Número de sentenças de treino para `len` sentenças e a proporção dada.
pub fn train_size(len: usize, ratio: f64) -> Result<usize> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(PosError::InvalidConfig(format!(
            "proporção de treino fora de [0, 1]: {ratio}"
        )));
    }
    Ok(((len as f64 * ratio).floor() as usize).min(len))
}

/// Tamanhos de uma divisão, registrados no início de cada categoria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_sentences: usize,
    pub train_sentences: usize,
    pub test_sentences: usize,
}
