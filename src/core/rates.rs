use super::types::InvestmentType;

/// Annual nominal growth assumptions, as fractions.
const RATE_TABLE: [(InvestmentType, f64); 6] = [
    (InvestmentType::Vdhg, 0.08),
    (InvestmentType::Asx200, 0.07),
    (InvestmentType::Sp500, 0.10),
    (InvestmentType::Gold, 0.06),
    (InvestmentType::Bitcoin, 0.50),
    (InvestmentType::Cash, 0.0005),
];

pub fn annual_rate(investment: InvestmentType) -> f64 {
    RATE_TABLE
        .iter()
        .find(|(kind, _)| *kind == investment)
        .map(|(_, rate)| *rate)
        .unwrap_or(0.0)
}

impl InvestmentType {
    pub fn label(self) -> &'static str {
        match self {
            InvestmentType::Vdhg => "Vanguard Diversified High Growth ETF",
            InvestmentType::Asx200 => "ASX 200",
            InvestmentType::Sp500 => "S&P 500",
            InvestmentType::Gold => "Gold",
            InvestmentType::Bitcoin => "Bitcoin",
            InvestmentType::Cash => "Cash",
            InvestmentType::Unlisted => "Unlisted (no growth)",
        }
    }

    pub fn annual_rate(self) -> f64 {
        annual_rate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_investment_has_a_rate_in_range() {
        for kind in InvestmentType::LISTED {
            let rate = annual_rate(kind);
            assert!(
                (0.0005..=0.50).contains(&rate),
                "{} rate {rate} out of range",
                kind.id()
            );
        }
    }

    #[test]
    fn unknown_identifier_grows_at_zero() {
        let kind = InvestmentType::from_id("dogecoin");
        assert_eq!(kind, InvestmentType::Unlisted);
        assert_eq!(annual_rate(kind), 0.0);
    }

    #[test]
    fn unknown_identifier_deserializes_without_error() {
        let kind: InvestmentType = serde_json::from_str("\"tulips\"").expect("must deserialize");
        assert_eq!(kind, InvestmentType::Unlisted);
        let kind: InvestmentType = serde_json::from_str("\"SP500\"").expect("must deserialize");
        assert_eq!(kind, InvestmentType::Sp500);
    }
}
