use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

//
// ─── TERMS ─────────────────────────────────────────────────────────────────────
//

/// Symbol → meaning pairs of a formula, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Terms(Vec<(String, String)>);

impl Terms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the meaning of `symbol`, keeping its first position.
    pub fn insert(&mut self, symbol: impl Into<String>, meaning: impl Into<String>) {
        let symbol = symbol.into();
        let meaning = meaning.into();
        if let Some(slot) = self.0.iter_mut().find(|(s, _)| *s == symbol) {
            slot.1 = meaning;
        } else {
            self.0.push((symbol, meaning));
        }
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, meaning)| meaning.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(s, m)| (s.as_str(), m.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Terms {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TermsVisitor;

        impl<'de> Visitor<'de> for TermsVisitor {
            type Value = Terms;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of term symbols to meanings")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Terms::new())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Terms::new())
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut terms = Terms::new();
                while let Some((symbol, meaning)) = access.next_entry::<String, String>()? {
                    terms.insert(symbol, meaning);
                }
                Ok(terms)
            }
        }

        deserializer.deserialize_any(TermsVisitor)
    }
}

//
// ─── FORMULA ───────────────────────────────────────────────────────────────────
//

/// A single formula entry of the catalog.
///
/// `name` and `expression` are `None` when the source entry lacks them (or
/// carries only whitespace); such formulas never produce questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFormula")]
pub struct Formula {
    name: Option<String>,
    expression: Option<String>,
    terms: Terms,
    description: String,
}

impl Formula {
    #[must_use]
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: present(Some(name.into())),
            expression: present(Some(expression.into())),
            terms: Terms::new(),
            description: String::new(),
        }
    }

    #[must_use]
    pub fn with_term(mut self, symbol: impl Into<String>, meaning: impl Into<String>) -> Self {
        self.terms.insert(symbol, meaning);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    #[must_use]
    pub fn terms(&self) -> &Terms {
        &self.terms
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Deserialize)]
struct RawFormula {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    formula: Option<String>,
    #[serde(default)]
    formula_text: Option<String>,
    #[serde(default)]
    expression: Option<String>,
    #[serde(default)]
    terms: Option<Terms>,
    #[serde(default)]
    description: Option<String>,
}

impl From<RawFormula> for Formula {
    fn from(raw: RawFormula) -> Self {
        let description = raw.description.unwrap_or_default();
        let name = present(raw.name)
            .or_else(|| present(raw.title))
            .or_else(|| present(Some(description.clone())));
        let expression = present(raw.formula)
            .or_else(|| present(raw.formula_text))
            .or_else(|| present(raw.expression));

        Self {
            name,
            expression,
            terms: raw.terms.unwrap_or_default(),
            description,
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//
// ─── CHAPTER / CATALOG ─────────────────────────────────────────────────────────
//

const DEFAULT_CHAPTER_TITLE: &str = "Chapter";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawChapter")]
pub struct Chapter {
    title: String,
    formulas: Vec<Formula>,
}

impl Chapter {
    #[must_use]
    pub fn new(title: impl Into<String>, formulas: Vec<Formula>) -> Self {
        let title = present(Some(title.into())).unwrap_or_else(|| DEFAULT_CHAPTER_TITLE.into());
        Self { title, formulas }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }
}

#[derive(Deserialize)]
struct RawChapter {
    #[serde(default)]
    chapter: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    formulas: Vec<Formula>,
}

impl From<RawChapter> for Chapter {
    fn from(raw: RawChapter) -> Self {
        let title = present(raw.chapter)
            .or_else(|| present(raw.name))
            .or_else(|| present(raw.title))
            .unwrap_or_else(|| DEFAULT_CHAPTER_TITLE.into());
        Self {
            title,
            formulas: raw.formulas,
        }
    }
}

/// The static chapters → formulas → terms data set for one class level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    board: Option<String>,
    #[serde(default, alias = "standerd")]
    standard: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    chapters: Vec<Chapter>,
}

impl Catalog {
    #[must_use]
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self {
            chapters,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[must_use]
    pub fn board(&self) -> Option<&str> {
        self.board.as_deref()
    }

    #[must_use]
    pub fn standard(&self) -> Option<&str> {
        self.standard.as_deref()
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[must_use]
    pub fn formula_count(&self) -> usize {
        self.chapters.iter().map(|c| c.formulas.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_keep_document_order() {
        let json = r#"{ "name": "Wave speed", "formula": "v = f λ",
            "terms": { "v": "wave speed", "f": "frequency", "λ": "wavelength" } }"#;
        let formula: Formula = serde_json::from_str(json).unwrap();

        let symbols: Vec<_> = formula.terms().iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["v", "f", "λ"]);
        assert_eq!(formula.terms().get("f"), Some("frequency"));
    }

    #[test]
    fn formula_accepts_alternate_field_names() {
        let json = r#"{ "title": "Power", "formula_text": "P = W / t", "terms": null }"#;
        let formula: Formula = serde_json::from_str(json).unwrap();

        assert_eq!(formula.name(), Some("Power"));
        assert_eq!(formula.expression(), Some("P = W / t"));
        assert!(formula.terms().is_empty());
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let json = r#"{ "name": "  ", "formula": "", "description": "" }"#;
        let formula: Formula = serde_json::from_str(json).unwrap();

        assert_eq!(formula.name(), None);
        assert_eq!(formula.expression(), None);
    }

    #[test]
    fn description_is_the_last_resort_name() {
        let json = r#"{ "expression": "F = m a", "description": "Newton's second law" }"#;
        let formula: Formula = serde_json::from_str(json).unwrap();
        assert_eq!(formula.name(), Some("Newton's second law"));
    }

    #[test]
    fn catalog_reads_metadata_and_chapter_aliases() {
        let json = r#"{
            "standerd": "Class 11",
            "board": "WBCHSE",
            "chapters": [
                { "chapter": "Kinematics", "formulas": [] },
                { "name": "Gravitation" },
                { "formulas": [ { "name": "Stress", "formula": "σ = F / A" } ] }
            ]
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();

        assert_eq!(catalog.standard(), Some("Class 11"));
        assert_eq!(catalog.board(), Some("WBCHSE"));
        let titles: Vec<_> = catalog.chapters().iter().map(Chapter::title).collect();
        assert_eq!(titles, vec!["Kinematics", "Gravitation", "Chapter"]);
        assert_eq!(catalog.formula_count(), 1);
    }

    #[test]
    fn duplicate_term_keeps_first_position_and_last_value() {
        let mut terms = Terms::new();
        terms.insert("m", "mass");
        terms.insert("a", "acceleration");
        terms.insert("m", "mass (kg)");

        let pairs: Vec<_> = terms.iter().collect();
        assert_eq!(pairs, vec![("m", "mass (kg)"), ("a", "acceleration")]);
    }
}
