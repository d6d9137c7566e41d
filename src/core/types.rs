use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    Weekly,
    #[serde(alias = "fortnightly")]
    Biweekly,
    Monthly,
    #[serde(alias = "annual", alias = "annually")]
    Yearly,
}

impl PayPeriod {
    pub const ALL: [PayPeriod; 4] = [
        PayPeriod::Weekly,
        PayPeriod::Biweekly,
        PayPeriod::Monthly,
        PayPeriod::Yearly,
    ];

    /// Annualization multiplier: how many of these periods fit in a year.
    pub fn periods_per_year(self) -> u32 {
        match self {
            PayPeriod::Weekly => 52,
            PayPeriod::Biweekly => 26,
            PayPeriod::Monthly => 12,
            PayPeriod::Yearly => 1,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            PayPeriod::Weekly => "weekly",
            PayPeriod::Biweekly => "biweekly",
            PayPeriod::Monthly => "monthly",
            PayPeriod::Yearly => "yearly",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "weekly" => Some(PayPeriod::Weekly),
            "biweekly" | "fortnightly" => Some(PayPeriod::Biweekly),
            "monthly" => Some(PayPeriod::Monthly),
            "yearly" | "annual" | "annually" => Some(PayPeriod::Yearly),
            _ => None,
        }
    }
}

/// Investment choices known to the rate table. Identifiers that match none of
/// the configured instruments become `Unlisted`, which grows at 0%.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum InvestmentType {
    Vdhg,
    Asx200,
    Sp500,
    Gold,
    Bitcoin,
    Cash,
    Unlisted,
}

impl InvestmentType {
    pub const LISTED: [InvestmentType; 6] = [
        InvestmentType::Vdhg,
        InvestmentType::Asx200,
        InvestmentType::Sp500,
        InvestmentType::Gold,
        InvestmentType::Bitcoin,
        InvestmentType::Cash,
    ];

    pub fn id(self) -> &'static str {
        match self {
            InvestmentType::Vdhg => "vdhg",
            InvestmentType::Asx200 => "asx200",
            InvestmentType::Sp500 => "sp500",
            InvestmentType::Gold => "gold",
            InvestmentType::Bitcoin => "bitcoin",
            InvestmentType::Cash => "cash",
            InvestmentType::Unlisted => "unlisted",
        }
    }

    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "vdhg" => InvestmentType::Vdhg,
            "asx200" => InvestmentType::Asx200,
            "sp500" => InvestmentType::Sp500,
            "gold" => InvestmentType::Gold,
            "bitcoin" | "btc" => InvestmentType::Bitcoin,
            "cash" => InvestmentType::Cash,
            _ => InvestmentType::Unlisted,
        }
    }
}

impl From<String> for InvestmentType {
    fn from(value: String) -> Self {
        InvestmentType::from_id(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentInputs {
    pub starting_amount: f64,
    pub periodic_amount: f64,
    pub pay_period: PayPeriod,
    pub investment: InvestmentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracket {
    pub min: f64,
    /// `None` for the open-ended top bracket.
    pub max: Option<f64>,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketBreakdown {
    pub min: f64,
    pub max: Option<f64>,
    pub rate: f64,
    pub income_in_bracket: f64,
    pub tax_in_bracket: f64,
    pub net_in_bracket: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub total_tax: f64,
    pub after_tax_income: f64,
    pub brackets: Vec<BracketBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeHomePay {
    pub pay_period: PayPeriod,
    pub yearly_salary: f64,
    pub gross_per_period: f64,
    pub tax_per_period: f64,
    pub net_per_period: f64,
    pub effective_rate: f64,
    pub marginal_rate: f64,
    pub breakdown: TaxBreakdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneYearGains {
    pub starting_gain: f64,
    pub periodic_gains: f64,
    pub total_gain: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProjection {
    pub future_value: f64,
    pub total_contributions: f64,
    pub total_gains: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DurationOutcome {
    /// Target is at or below the starting amount.
    AlreadyMet,
    /// Zero-rate instrument, answered with contribution-only arithmetic.
    Linear,
    /// Zero-rate instrument with no contributions; 0 years is reported.
    Unreachable,
    /// A bisection midpoint landed within the currency tolerance.
    WithinTolerance,
    /// Bracket narrowed below the year tolerance.
    Converged,
    IterationLimit,
    /// Target not reached inside the search horizon.
    Saturated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationSolution {
    pub years: f64,
    pub iterations: u32,
    pub outcome: DurationOutcome,
}
