//! # Distribuições de Frequência
//!
//! Contadores usados no treino dos etiquetadores e na escolha da tag de
//! fallback.
//!
//! ## Desempate
//!
//! Quando duas chaves têm a mesma contagem, vence a que foi vista **primeiro**.
//! É o mesmo critério de `FreqDist.max()` / `most_common()` do NLTK, o que
//! mantém as acurácias comparáveis com as dele e torna a saída
//! determinística (um `HashMap` puro iteraria em ordem aleatória).

use std::collections::HashMap;
use std::hash::Hash;

/// Contagem de ocorrências que lembra a ordem de inserção de cada chave.
#[derive(Debug, Clone)]
pub struct FreqDist<K> {
    /// Posição de cada chave em `entries`.
    index: HashMap<K, usize>,
    /// Pares `(chave, contagem)` na ordem em que apareceram.
    entries: Vec<(K, u64)>,
    total: u64,
}

impl<K: Eq + Hash + Clone> FreqDist<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            total: 0,
        }
    }

    /// Incrementa a contagem de `key` em uma unidade.
    pub fn add(&mut self, key: K) {
        self.add_n(key, 1);
    }

    pub fn add_n(&mut self, key: K, n: u64) {
        self.total += n;
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 += n,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, n));
            }
        }
    }

    pub fn count(&self, key: &K) -> u64 {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Número de observações (soma de todas as contagens).
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Número de chaves distintas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chave mais frequente; empates resolvidos pela primeira inserção.
    pub fn max(&self) -> Option<&K> {
        let mut best: Option<&(K, u64)> = None;
        for entry in &self.entries {
            // `>` estrito preserva a primeira chave em caso de empate
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(k, _)| k)
    }

    /// As `n` chaves mais frequentes, em ordem decrescente de contagem.
    ///
    /// A ordenação é estável, então chaves empatadas mantêm a ordem de inserção.
    pub fn most_common(&self, n: usize) -> Vec<(&K, u64)> {
        let mut sorted: Vec<(&K, u64)> = self.entries.iter().map(|(k, c)| (k, *c)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

impl<K: Eq + Hash + Clone> Default for FreqDist<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FreqDist<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut fd = FreqDist::new();
        for key in iter {
            fd.add(key);
        }
        fd
    }
}

/// Uma `FreqDist` por condição (ex: tag condicionada à palavra).
#[derive(Debug, Clone)]
pub struct ConditionalFreqDist<C, K> {
    dists: HashMap<C, FreqDist<K>>,
}

impl<C: Eq + Hash, K: Eq + Hash + Clone> ConditionalFreqDist<C, K> {
    pub fn new() -> Self {
        Self {
            dists: HashMap::new(),
        }
    }

    pub fn add(&mut self, condition: C, key: K) {
        self.dists.entry(condition).or_default().add(key);
    }

    pub fn get(&self, condition: &C) -> Option<&FreqDist<K>> {
        self.dists.get(condition)
    }

    pub fn len(&self) -> usize {
        self.dists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dists.is_empty()
    }
}

impl<C: Eq + Hash, K: Eq + Hash + Clone> Default for ConditionalFreqDist<C, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Eq + Hash, K: Eq + Hash + Clone> FromIterator<(C, K)> for ConditionalFreqDist<C, K> {
    fn from_iter<I: IntoIterator<Item = (C, K)>>(iter: I) -> Self {
        let mut cfd = ConditionalFreqDist::new();
        for (condition, key) in iter {
            cfd.add(condition, key);
        }
        cfd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_prefers_highest_count() {
        let fd: FreqDist<&str> = ["NN", "AT", "NN", "IN", "NN", "AT"].into_iter().collect();
        assert_eq!(fd.max(), Some(&"NN"));
        assert_eq!(fd.count(&"AT"), 2);
        assert_eq!(fd.total(), 6);
        assert_eq!(fd.len(), 3);
    }

    #[test]
    fn test_ties_resolved_by_first_insertion() {
        let fd: FreqDist<&str> = ["VB", "NN", "NN", "VB"].into_iter().collect();
        assert_eq!(fd.max(), Some(&"VB"));

        let top = fd.most_common(2);
        assert_eq!(top, vec![(&"VB", 2), (&"NN", 2)]);
    }

    #[test]
    fn test_most_common_truncates() {
        let fd: FreqDist<&str> = ["a", "b", "b", "c", "c", "c"].into_iter().collect();
        let top = fd.most_common(2);
        assert_eq!(top, vec![(&"c", 3), (&"b", 2)]);
        assert_eq!(fd.most_common(10).len(), 3);
    }

    #[test]
    fn test_empty_dist_has_no_max() {
        let fd: FreqDist<String> = FreqDist::new();
        assert!(fd.max().is_none());
        assert!(fd.is_empty());
    }

    #[test]
    fn test_conditional_freq_dist() {
        let cfd: ConditionalFreqDist<&str, &str> = [
            ("race", "NN"),
            ("race", "VB"),
            ("race", "NN"),
            ("the", "AT"),
        ]
        .into_iter()
        .collect();

        assert_eq!(cfd.len(), 2);
        assert_eq!(cfd.get(&"race").and_then(|fd| fd.max()), Some(&"NN"));
        assert_eq!(cfd.get(&"the").map(|fd| fd.total()), Some(1));
        assert!(cfd.get(&"unknown").is_none());
    }
}
