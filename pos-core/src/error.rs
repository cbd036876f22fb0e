//! Erros do crate.
//!
//! Palavras desconhecidas nunca são erro: elas descem pela cadeia de backoff.
//! Os erros aqui cobrem I/O do corpus, documentos de resultado malformados e
//! violações de pré-condição (referência vazia no cálculo de acurácia).

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = PosError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PosError {
    /// Categoria ausente no provedor de corpus.
    #[error("categoria desconhecida no corpus: {0}")]
    UnknownCategory(String),

    /// Token sem separador `/` entre palavra e tag.
    #[error("token malformado {token:?} em {source_name}, linha {line}")]
    MalformedToken {
        token: String,
        source_name: String,
        line: usize,
    },

    /// A acurácia não é definida para uma referência sem tokens.
    #[error("acurácia indefinida: o conjunto de referência está vazio")]
    EmptyReference,

    /// Não há tag mais frequente num corpus sem palavras.
    #[error("a categoria {0:?} não possui palavras etiquetadas")]
    EmptyCorpus(String),

    #[error("expressão regular inválida {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("configuração inválida: {0}")]
    InvalidConfig(String),

    #[error("documento de resultados malformado: {0}")]
    MalformedDocument(String),

    #[error("falha de I/O em {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PosError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
