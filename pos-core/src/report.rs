//! # Resultados: Documento JSON e Tabela Resumo
//!
//! O resultado de um experimento é um mapa `categoria → (etiquetador →
//! acurácia)`. Ele é gravado uma única vez, no fim da execução, como JSON
//! indentado com 4 espaços:
//!
//! ```json
//! {
//!     "news": {
//!         "BigramTagger": 0.1026,
//!         "DefaultTagger": 0.1309
//!     }
//! }
//! ```
//!
//! Para leitura, o documento vira uma tabela em que as linhas são os
//! etiquetadores, as colunas as categorias, e uma coluna extra `mean` traz a
//! média aritmética da linha (células não numéricas são ignoradas).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{PosError, Result};

/// Documento do experimento completo.
pub const FULL_RESULT_FILE: &str = "result.json";
/// Documento do experimento reduzido.
pub const SHORT_RESULT_FILE: &str = "result_short.json";

/// Nome do etiquetador → acurácia.
pub type CategoryResult = BTreeMap<String, f64>;

/// Categoria → (nome do etiquetador → acurácia).
///
/// Os dois níveis são mapas ordenados: o documento gerado não depende da
/// ordem em que as categorias terminaram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentResult(BTreeMap<String, CategoryResult>);

impl ExperimentResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra uma acurácia; um nome repetido na mesma categoria sobrescreve
    /// o valor anterior, que é devolvido.
    pub fn insert(&mut self, category: &str, name: &str, accuracy: f64) -> Option<f64> {
        self.0
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), accuracy)
    }

    /// Acrescenta (ou sobrescreve) todos os valores de uma categoria.
    pub fn extend_category(&mut self, category: &str, results: CategoryResult) {
        self.0.entry(category.to_string()).or_default().extend(results);
    }

    pub fn get(&self, category: &str) -> Option<&CategoryResult> {
        self.0.get(category)
    }

    pub fn accuracy(&self, category: &str, name: &str) -> Option<f64> {
        self.0.get(category)?.get(name).copied()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CategoryResult)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cópia com todas as acurácias arredondadas para `digits` casas
    /// (limitado a [`MAX_PRECISION`]).
    pub fn rounded(&self, digits: u32) -> Self {
        let scale = 10f64.powi(digits.min(MAX_PRECISION) as i32);
        Self(
            self.0
                .iter()
                .map(|(category, results)| {
                    let results = results
                        .iter()
                        .map(|(name, acc)| (name.clone(), (acc * scale).round() / scale))
                        .collect();
                    (category.clone(), results)
                })
                .collect(),
        )
    }

    fn validate(&self) -> Result<()> {
        for (category, results) in &self.0 {
            for (name, acc) in results {
                if !(0.0..=1.0).contains(acc) {
                    return Err(PosError::MalformedDocument(format!(
                        "acurácia fora de [0, 1] em {category}/{name}: {acc}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Mais casas do que um `f64` distingue não mudam o valor gravado.
pub const MAX_PRECISION: u32 = 17;

/// Opções de gravação do documento.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkOptions {
    /// Casas decimais, no máximo [`MAX_PRECISION`]; `None` grava a
    /// representação exata mais curta.
    pub precision: Option<u32>,
}

/// Serializa o resultado como JSON com indentação de 4 espaços.
///
/// Falha com `InvalidConfig` se `precision` passar de [`MAX_PRECISION`].
pub fn to_json_string(result: &ExperimentResult, options: &SinkOptions) -> Result<String> {
    let result = match options.precision {
        Some(digits) if digits > MAX_PRECISION => {
            return Err(PosError::InvalidConfig(format!(
                "precisão de {digits} casas acima do máximo ({MAX_PRECISION})"
            )));
        }
        Some(digits) => result.rounded(digits),
        None => result.clone(),
    };
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    result.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| PosError::MalformedDocument(e.to_string()))
}

pub fn save_result(path: impl AsRef<Path>, result: &ExperimentResult, options: &SinkOptions) -> Result<()> {
    let path = path.as_ref();
    let json = to_json_string(result, options)?;
    fs::write(path, json).map_err(|e| PosError::io(path, e))?;
    info!(
        "Resultados de {} categorias gravados em {}",
        result.len(),
        path.display()
    );
    Ok(())
}

/// Lê um documento de resultados. Arquivo ausente ou malformado é fatal.
pub fn load_result(path: impl AsRef<Path>) -> Result<ExperimentResult> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| PosError::io(path, e))?;
    let result: ExperimentResult = serde_json::from_str(&text)?;
    result.validate()?;
    Ok(result)
}

/// Lê o documento sem impor tipos às células (para a tabela).
pub fn load_document(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| PosError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Média aritmética; `None` para uma lista vazia.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Qual chave do documento vira linha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Linhas = etiquetadores, colunas = categorias.
    #[default]
    TaggersAsRows,
    /// Linhas = categorias, colunas = etiquetadores.
    CategoriesAsRows,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub key: String,
    /// Alinhado com [`ReportTable::columns`]; `None` = célula ausente.
    pub cells: Vec<Option<Cell>>,
    /// Média das células numéricas da linha.
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Monta a tabela a partir de um documento `{externa: {interna: valor}}`.
    pub fn from_document(doc: &Value, orientation: Orientation) -> Result<Self> {
        let outer = doc
            .as_object()
            .ok_or_else(|| PosError::MalformedDocument("o topo do documento deve ser um objeto".to_string()))?;

        let mut categories: Vec<String> = Vec::new();
        let mut taggers: Vec<String> = Vec::new();
        let mut values: BTreeMap<(String, String), Cell> = BTreeMap::new();

        for (category, inner) in outer {
            let inner = inner.as_object().ok_or_else(|| {
                PosError::MalformedDocument(format!("a categoria {category:?} deve ser um objeto"))
            })?;
            categories.push(category.clone());
            for (tagger, value) in inner {
                if !taggers.contains(tagger) {
                    taggers.push(tagger.clone());
                }
                let cell = match value {
                    Value::Null => continue,
                    Value::Number(n) => match n.as_f64() {
                        Some(x) => Cell::Number(x),
                        None => Cell::Text(n.to_string()),
                    },
                    Value::String(s) => Cell::Text(s.clone()),
                    other => Cell::Text(other.to_string()),
                };
                values.insert((category.clone(), tagger.clone()), cell);
            }
        }

        let (row_keys, columns) = match orientation {
            Orientation::TaggersAsRows => (taggers, categories),
            Orientation::CategoriesAsRows => (categories, taggers),
        };

        let rows = row_keys
            .into_iter()
            .map(|key| {
                let cells: Vec<Option<Cell>> = columns
                    .iter()
                    .map(|column| {
                        let lookup = match orientation {
                            Orientation::TaggersAsRows => (column.clone(), key.clone()),
                            Orientation::CategoriesAsRows => (key.clone(), column.clone()),
                        };
                        values.get(&lookup).cloned()
                    })
                    .collect();
                let numeric: Vec<f64> = cells
                    .iter()
                    .filter_map(|c| match c {
                        Some(Cell::Number(x)) => Some(*x),
                        _ => None,
                    })
                    .collect();
                ReportRow {
                    key,
                    mean: mean(&numeric),
                    cells,
                }
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn from_result(result: &ExperimentResult, orientation: Orientation) -> Result<Self> {
        Self::from_document(&serde_json::to_value(result)?, orientation)
    }

    pub fn row(&self, key: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.key == key)
    }
}

fn render_cell(cell: &Option<Cell>) -> String {
    match cell {
        Some(Cell::Number(x)) => format!("{x:.6}"),
        Some(Cell::Text(s)) => s.clone(),
        None => "NaN".to_string(),
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header: Vec<String> = self.columns.clone();
        header.push("mean".to_string());

        let body: Vec<(String, Vec<String>)> = self
            .rows
            .iter()
            .map(|row| {
                let mut cells: Vec<String> = row.cells.iter().map(render_cell).collect();
                cells.push(render_cell(&row.mean.map(Cell::Number)));
                (row.key.clone(), cells)
            })
            .collect();

        let key_width = body.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                body.iter()
                    .map(|(_, cells)| cells[i].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:key_width$}", "")?;
        for (name, width) in header.iter().zip(&widths) {
            write!(f, "  {name:>width$}")?;
        }
        writeln!(f)?;

        for (key, cells) in &body {
            write!(f, "{key:<key_width$}")?;
            for (cell, width) in cells.iter().zip(&widths) {
                write!(f, "  {cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
