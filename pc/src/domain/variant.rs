//! Plan variants
//!
//! Every plan carries exactly three variants. `Variants` is a struct rather
//! than a map so that holds by construction.

use serde::{Deserialize, Serialize};

/// The three alternative schedules produced for every goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Balanced,
    Aggressive,
    Safe,
}

impl VariantKind {
    pub const ALL: [VariantKind; 3] = [Self::Balanced, Self::Aggressive, Self::Safe];

    /// Key used in model output and responses
    pub fn name(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Aggressive => "aggressive",
            Self::Safe => "safe",
        }
    }

    /// Capitalized name, e.g. "Balanced"
    pub fn title(&self) -> &'static str {
        match self {
            Self::Balanced => "Balanced",
            Self::Aggressive => "Aggressive",
            Self::Safe => "Safe",
        }
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One schedule: its tasks, the asserted critical path, and the model's reasoning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant<T> {
    pub tasks: Vec<T>,
    pub critical_path: Vec<String>,
    pub reasoning: String,
}

impl<T> Variant<T> {
    /// Placeholder for a variant the model did not provide
    pub fn placeholder(kind: VariantKind) -> Self {
        Self {
            tasks: Vec::new(),
            critical_path: Vec::new(),
            reasoning: format!("{} approach to the project", kind.title()),
        }
    }
}

/// Exactly one variant per `VariantKind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variants<T> {
    pub balanced: Variant<T>,
    pub aggressive: Variant<T>,
    pub safe: Variant<T>,
}

impl<T> Variants<T> {
    /// Build by producing each variant in `VariantKind::ALL` order
    pub fn from_fn(mut f: impl FnMut(VariantKind) -> Variant<T>) -> Self {
        let balanced = f(VariantKind::Balanced);
        let aggressive = f(VariantKind::Aggressive);
        let safe = f(VariantKind::Safe);
        Self {
            balanced,
            aggressive,
            safe,
        }
    }

    pub fn get(&self, kind: VariantKind) -> &Variant<T> {
        match kind {
            VariantKind::Balanced => &self.balanced,
            VariantKind::Aggressive => &self.aggressive,
            VariantKind::Safe => &self.safe,
        }
    }

    /// Transform every variant, keeping the kind alongside
    pub fn map<U>(self, mut f: impl FnMut(VariantKind, Variant<T>) -> Variant<U>) -> Variants<U> {
        Variants {
            balanced: f(VariantKind::Balanced, self.balanced),
            aggressive: f(VariantKind::Aggressive, self.aggressive),
            safe: f(VariantKind::Safe, self.safe),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariantKind, &Variant<T>)> {
        VariantKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}
