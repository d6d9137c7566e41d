use super::types::{BracketBreakdown, PayPeriod, TakeHomePay, TaxBracket, TaxBreakdown};

/// Australian resident schedule for the 2024-25 income year.
pub const AU_2024_25_BRACKETS: [TaxBracket; 5] = [
    TaxBracket {
        min: 0.0,
        max: Some(18_200.0),
        rate: 0.0,
    },
    TaxBracket {
        min: 18_200.0,
        max: Some(45_000.0),
        rate: 0.16,
    },
    TaxBracket {
        min: 45_000.0,
        max: Some(135_000.0),
        rate: 0.30,
    },
    TaxBracket {
        min: 135_000.0,
        max: Some(190_000.0),
        rate: 0.37,
    },
    TaxBracket {
        min: 190_000.0,
        max: None,
        rate: 0.45,
    },
];

pub fn compute_tax_breakdown(yearly_salary: f64) -> TaxBreakdown {
    compute_tax_breakdown_with(&AU_2024_25_BRACKETS, yearly_salary)
}

/// Walks an ascending, contiguous bracket schedule. Non-positive (or NaN)
/// salaries produce an empty breakdown rather than an error.
pub fn compute_tax_breakdown_with(brackets: &[TaxBracket], yearly_salary: f64) -> TaxBreakdown {
    if yearly_salary.is_nan() || yearly_salary <= 0.0 {
        return TaxBreakdown::default();
    }

    let mut total_tax = 0.0;
    let mut rows = Vec::with_capacity(brackets.len());
    for bracket in brackets {
        if bracket.min >= yearly_salary {
            break;
        }
        let upper = yearly_salary.min(bracket.max.unwrap_or(yearly_salary));
        let income_in_bracket = upper - bracket.min;
        let tax_in_bracket = income_in_bracket * bracket.rate;
        total_tax += tax_in_bracket;
        rows.push(BracketBreakdown {
            min: bracket.min,
            max: bracket.max,
            rate: bracket.rate,
            income_in_bracket,
            tax_in_bracket,
            net_in_bracket: income_in_bracket - tax_in_bracket,
        });
    }

    TaxBreakdown {
        total_tax,
        after_tax_income: yearly_salary - total_tax,
        brackets: rows,
    }
}

/// Converts a per-period amount into a yearly one. Missing, NaN and
/// non-positive amounts annualize to zero.
pub fn annualize(amount: Option<f64>, period: PayPeriod) -> f64 {
    match amount {
        Some(value) if value > 0.0 => value * period.periods_per_year() as f64,
        _ => 0.0,
    }
}

pub fn per_period(yearly_amount: f64, period: PayPeriod) -> f64 {
    yearly_amount / period.periods_per_year() as f64
}

impl TaxBreakdown {
    pub fn gross_income(&self) -> f64 {
        self.total_tax + self.after_tax_income
    }

    pub fn effective_rate(&self) -> f64 {
        let gross = self.gross_income();
        if gross > 0.0 {
            self.total_tax / gross
        } else {
            0.0
        }
    }

    pub fn marginal_rate(&self) -> f64 {
        self.brackets.last().map(|row| row.rate).unwrap_or(0.0)
    }
}

/// Take-home pay for an amount earned every `period`.
pub fn take_home_pay(amount: Option<f64>, period: PayPeriod) -> TakeHomePay {
    let yearly_salary = annualize(amount, period);
    let breakdown = compute_tax_breakdown(yearly_salary);
    TakeHomePay {
        pay_period: period,
        yearly_salary,
        gross_per_period: per_period(yearly_salary, period),
        tax_per_period: per_period(breakdown.total_tax, period),
        net_per_period: per_period(breakdown.after_tax_income, period),
        effective_rate: breakdown.effective_rate(),
        marginal_rate: breakdown.marginal_rate(),
        breakdown,
    }
}
