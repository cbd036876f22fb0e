//! # Etiquetador por Regras — Padrões Regex
//!
//! Atribui tags a partir da forma da palavra (sufixos, números). As regras são
//! avaliadas **em ordem** e a primeira que casar decide; por isso `.*es$`
//! (VBZ) precisa vir antes de `.*s$` (NNS), e o curinga `.*` fica por último.
//!
//! Os padrões são ancorados no início do token, como o `re.match` do Python:
//! `.*ing$` casa com `running`, e `^-?[0-9]+` não aceita lixo à esquerda.

use regex::Regex;

use crate::error::{PosError, Result};
use crate::tagger::Tagger;

/// Regras de sufixo para o tagset do Brown, na ordem canônica.
pub const BROWN_PATTERNS: [(&str, &str); 8] = [
    (r".*ing$", "VBG"),              // gerúndio
    (r".*ed$", "VBD"),               // passado simples
    (r".*es$", "VBZ"),               // 3ª pessoa do singular
    (r".*ould$", "MD"),              // modais: would, should, could
    (r".*'s$", "NN$"),               // possessivo
    (r".*s$", "NNS"),                // plural
    (r"^-?[0-9]+(.[0-9]+)?$", "CD"), // cardinais
    (r".*", "NN"),                   // padrão: substantivo
];

/// Uma regra compilada.
#[derive(Debug, Clone)]
pub struct RegexpRule {
    regex: Regex,
    tag: String,
}

impl RegexpRule {
    pub fn new(pattern: &str, tag: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| PosError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            tag: tag.to_string(),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_match(&self, word: &str) -> bool {
        self.regex.is_match(word)
    }
}

/// Lista ordenada de regras com backoff opcional.
#[derive(Debug, Clone)]
pub struct RegexpTagger {
    rules: Vec<RegexpRule>,
    backoff: Option<Box<Tagger>>,
}

impl RegexpTagger {
    pub fn new<'a>(patterns: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let rules = patterns
            .into_iter()
            .map(|(pattern, tag)| RegexpRule::new(pattern, tag))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rules,
            backoff: None,
        })
    }

    /// Etiquetador com as regras de [`BROWN_PATTERNS`].
    pub fn brown() -> Result<Self> {
        Self::new(BROWN_PATTERNS)
    }

    pub fn with_backoff(mut self, backoff: Tagger) -> Self {
        self.backoff = Some(Box::new(backoff));
        self
    }

    pub fn backoff(&self) -> Option<&Tagger> {
        self.backoff.as_deref()
    }

    /// Tag da primeira regra que casar com `word`.
    pub fn choose_tag(&self, word: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(word))
            .map(RegexpRule::tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::DefaultTagger;

    #[test]
    fn test_brown_suffix_rules() {
        let tagger = RegexpTagger::brown().unwrap();
        let cases = [
            ("running", "VBG"),
            ("walked", "VBD"),
            ("goes", "VBZ"),
            ("would", "MD"),
            ("John's", "NN$"),
            ("dogs", "NNS"),
            ("42", "CD"),
            ("-3.14", "CD"),
            ("table", "NN"),
            (",", "NN"),
            ("", "NN"),
        ];
        for (word, expected) in cases {
            assert_eq!(tagger.choose_tag(word), Some(expected), "palavra {word:?}");
        }
    }

    #[test]
    fn test_earlier_rule_wins() {
        // "classes" casa com `.*es$` e com `.*s$`; vale a primeira
        let tagger = RegexpTagger::brown().unwrap();
        assert_eq!(tagger.choose_tag("classes"), Some("VBZ"));

        let reversed = RegexpTagger::new([(r".*s$", "NNS"), (r".*es$", "VBZ")]).unwrap();
        assert_eq!(reversed.choose_tag("classes"), Some("NNS"));
    }

    #[test]
    fn test_patterns_are_anchored_at_start() {
        let tagger = RegexpTagger::new([(r"[0-9]+", "CD")]).unwrap();
        assert_eq!(tagger.choose_tag("123abc"), Some("CD"));
        assert_eq!(tagger.choose_tag("abc123"), None);
    }

    #[test]
    fn test_no_match_falls_back() {
        let tagger: Tagger = RegexpTagger::new([(r".*ing$", "VBG")])
            .unwrap()
            .with_backoff(DefaultTagger::new("AT").into())
            .into();
        let tagged = tagger.tag(&["the", "singing"]);
        assert_eq!(tagged[0].tag.as_deref(), Some("AT"));
        assert_eq!(tagged[1].tag.as_deref(), Some("VBG"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = RegexpTagger::new([(r"(unclosed", "NN")]).unwrap_err();
        assert!(matches!(err, PosError::InvalidPattern { .. }));
    }
}
