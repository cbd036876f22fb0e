//! # Leitor do Corpus Brown
//!
//! Lê o corpus no layout distribuído pelo NLTK (`nltk_data/corpora/brown`):
//!
//! - `cats.txt`: uma linha `<fileid> <categoria>` por arquivo;
//! - um arquivo por `fileid` (`ca01`, `ca02`, ...), com uma sentença por linha
//!   não vazia e tokens `palavra/tag` separados por espaço.
//!
//! As tags são normalizadas para maiúsculas (`the/at` → `("the", "AT")`).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::corpus::{parse_tagged_line, CorpusProvider, TaggedSentence};
use crate::error::{PosError, Result};

/// Nome do arquivo de categorias dentro do diretório do corpus.
pub const CATEGORIES_FILE: &str = "cats.txt";

/// Corpus Brown carregado em memória, indexado por categoria.
#[derive(Debug, Clone)]
pub struct BrownCorpus {
    /// Categorias na ordem em que aparecem em `cats.txt`.
    order: Vec<String>,
    sentences: HashMap<String, Vec<TaggedSentence>>,
}

impl BrownCorpus {
    /// Abre o diretório do corpus e lê todos os arquivos listados em `cats.txt`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let cats_path = root.join(CATEGORIES_FILE);
        let cats = fs::read_to_string(&cats_path).map_err(|e| PosError::io(&cats_path, e))?;

        let mut order: Vec<String> = Vec::new();
        let mut sentences: HashMap<String, Vec<TaggedSentence>> = HashMap::new();

        for (fileid, category) in parse_categories(&cats) {
            if !sentences.contains_key(category) {
                order.push(category.to_string());
            }
            let file_sents = read_tagged_file(&root.join(fileid), fileid)?;
            debug!("{}: {} sentenças ({})", fileid, file_sents.len(), category);
            sentences
                .entry(category.to_string())
                .or_default()
                .extend(file_sents);
        }

        info!(
            "Corpus Brown carregado de {}: {} categorias",
            root.display(),
            order.len()
        );

        Ok(Self { order, sentences })
    }
}

impl CorpusProvider for BrownCorpus {
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

/// Pares `(fileid, categoria)` de `cats.txt`. Linhas vazias são ignoradas;
/// um arquivo com várias categorias conta em todas elas.
fn parse_categories(text: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let Some(fileid) = fields.next() else {
            continue;
        };
        for category in fields {
            pairs.push((fileid, category));
        }
    }
    pairs
}

/// Lê um arquivo do corpus: cada linha não vazia é uma sentença.
fn read_tagged_file(path: &Path, fileid: &str) -> Result<Vec<TaggedSentence>> {
    let text = fs::read_to_string(path).map_err(|e| PosError::io(path, e))?;
    let mut sents = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        sents.push(parse_tagged_line(line, fileid, i + 1)?);
    }
    Ok(sents)
}
