use std::fmt;

use crate::foundation::error::{CardError, CardResult};

/// One character to render. Produced by the ingestion collaborator and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub tier: String,
    /// Purchase cost in game currency.
    pub cost: u64,
    /// Income per second.
    pub income: u64,
    #[serde(default = "default_variant")]
    pub variant: String,
}

fn default_variant() -> String {
    "Standard".to_string()
}

impl CharacterRecord {
    pub fn new(
        name: impl Into<String>,
        tier: impl Into<String>,
        cost: u64,
        income: u64,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tier: tier.into(),
            cost,
            income,
            variant: variant.into(),
        }
    }

    pub fn validate(&self) -> CardResult<()> {
        if self.name.trim().is_empty() {
            return Err(CardError::validation("character name must be non-empty"));
        }
        if self.tier.trim().is_empty() {
            return Err(CardError::validation(format!(
                "character '{}' has an empty tier",
                self.name
            )));
        }
        if self.variant.trim().is_empty() {
            return Err(CardError::validation(format!(
                "character '{}' has an empty variant",
                self.name
            )));
        }
        Ok(())
    }
}

impl fmt::Display for CharacterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - Cost: {}, Income: {}/s",
            self.name, self.tier, self.cost, self.income
        )
    }
}

/// Compact money notation: `$500`, `$1.5k`, `$2m`, `$1.2b`.
pub fn format_cost(cost: u64) -> String {
    format!("${}", abbreviate(cost))
}

/// Income per second: `10 / sec`, `1.5k / sec`.
pub fn format_income(income: u64) -> String {
    format!("{} / sec", abbreviate(income))
}

fn abbreviate(value: u64) -> String {
    const STEPS: [(u64, &str); 3] = [
        (1_000_000_000, "b"),
        (1_000_000, "m"),
        (1_000, "k"),
    ];
    // One decimal, rounded half-up in integer tenths.
    let tenths = |unit: u64| (u128::from(value) * 10 + u128::from(unit) / 2) / u128::from(unit);

    let Some(mut idx) = STEPS.iter().position(|&(unit, _)| value >= unit) else {
        return value.to_string();
    };
    // 999_999 rounds to "1000k"; promote it to "1m".
    if idx > 0 && tenths(STEPS[idx].0) >= 10_000 {
        idx -= 1;
    }
    let (unit, suffix) = STEPS[idx];
    let t = tenths(unit);
    let (whole, frac) = (t / 10, t % 10);
    if frac == 0 {
        format!("{whole}{suffix}")
    } else {
        format!("{whole}.{frac}{suffix}")
    }
}
