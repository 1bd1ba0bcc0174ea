//! Equated monthly installment (EMI) calculation and loan comparison.
//!
//! For a principal `P`, a monthly rate `r = annual_rate / 12 / 100` and `n`
//! monthly installments:
//!
//! ```text
//! EMI = P · r · (1 + r)^n / ((1 + r)^n − 1)
//! ```
//!
//! At a zero rate the installment is simply `P / n`.

use crate::domain::{BrowserError, Result};

/// Longest tenure accepted, fifty years of monthly installments.
pub const MAX_TENURE_MONTHS: u32 = 600;

/// Terms of one loan option.
///
/// # Examples
///
/// ```
/// use catalog_browser::tools::LoanTerms;
///
/// let loan = LoanTerms::new(100_000.0, 12.0, 12);
/// let emi = loan.monthly_installment().unwrap();
/// assert!((emi - 8_884.88).abs() < 0.01);
///
/// assert_eq!(LoanTerms::new(0.0, 12.0, 12).monthly_installment(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub tenure_months: u32,
}

/// One row of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Installment {
    /// 1-based month number.
    pub month: u32,
    pub payment: f64,
    pub principal_part: f64,
    pub interest_part: f64,
    /// Outstanding principal after this payment.
    pub balance: f64,
}

impl LoanTerms {
    #[must_use]
    pub const fn new(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            tenure_months,
        }
    }

    /// Parses loan terms from form input.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::InvalidInput`] naming the first field that is
    /// not a number (or, for the tenure, not a whole number of months up to
    /// [`MAX_TENURE_MONTHS`]).
    pub fn parse(principal: &str, annual_rate_percent: &str, tenure_months: &str) -> Result<Self> {
        let number = |field: &str, text: &str| {
            text.trim()
                .parse::<f64>()
                .map_err(|_| BrowserError::InvalidInput(format!("{field}: {text:?} is not a number")))
        };

        let principal = number("principal", principal)?;
        let rate = number("annual rate", annual_rate_percent)?;
        let tenure = tenure_months.trim().parse::<u32>().map_err(|_| {
            BrowserError::InvalidInput(format!("tenure: {tenure_months:?} is not a whole number of months"))
        })?;
        if tenure > MAX_TENURE_MONTHS {
            return Err(BrowserError::InvalidInput(format!(
                "tenure: {tenure} months is longer than {MAX_TENURE_MONTHS}"
            )));
        }

        Ok(Self::new(principal, rate, tenure))
    }

    fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 12.0 / 100.0
    }

    /// The monthly installment, or `None` when the terms cannot describe a loan
    /// (non-positive principal, negative rate, zero tenure or one longer than
    /// [`MAX_TENURE_MONTHS`]).
    #[must_use]
    pub fn monthly_installment(&self) -> Option<f64> {
        let invalid_principal = self.principal.is_nan() || self.principal <= 0.0;
        let invalid_rate = self.annual_rate_percent.is_nan() || self.annual_rate_percent < 0.0;
        let invalid_tenure = self.tenure_months == 0 || self.tenure_months > MAX_TENURE_MONTHS;
        if invalid_principal || invalid_rate || invalid_tenure {
            return None;
        }

        let rate = self.monthly_rate();
        if rate == 0.0 {
            return Some(self.principal / f64::from(self.tenure_months));
        }

        let growth = (1.0 + rate).powf(f64::from(self.tenure_months));
        let denominator = growth - 1.0;
        if denominator == 0.0 {
            return None;
        }

        Some(self.principal * rate * growth / denominator)
    }

    #[must_use]
    pub fn total_payment(&self) -> Option<f64> {
        self.monthly_installment()
            .map(|emi| emi * f64::from(self.tenure_months))
    }

    #[must_use]
    pub fn total_interest(&self) -> Option<f64> {
        self.total_payment().map(|total| total - self.principal)
    }

    /// Month-by-month split of each installment into interest and principal.
    ///
    /// Empty when the terms are invalid. The final balance is exactly zero.
    #[must_use]
    pub fn schedule(&self) -> Vec<Installment> {
        let Some(emi) = self.monthly_installment() else {
            return vec![];
        };
        let rate = self.monthly_rate();

        let mut balance = self.principal;
        (1..=self.tenure_months)
            .map(|month| {
                let interest_part = balance * rate;
                let mut principal_part = emi - interest_part;
                if month == self.tenure_months {
                    principal_part = balance;
                }
                balance -= principal_part;
                Installment {
                    month,
                    payment: principal_part + interest_part,
                    principal_part,
                    interest_part,
                    balance: if month == self.tenure_months { 0.0 } else { balance },
                }
            })
            .collect()
    }
}

/// Summary of one option in a comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionSummary {
    pub terms: LoanTerms,
    pub monthly_installment: Option<f64>,
    pub total_payment: Option<f64>,
    pub total_interest: Option<f64>,
}

/// Side-by-side view of several loan options.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub options: Vec<OptionSummary>,

    /// Index of the valid option with the lowest total payment. Ties go to the
    /// earlier option.
    pub cheapest: Option<usize>,
}

/// Compares loan options by what they cost in total.
///
/// # Examples
///
/// ```
/// use catalog_browser::tools::{compare, LoanTerms};
///
/// let comparison = compare(&[
///     LoanTerms::new(500_000.0, 9.5, 60),
///     LoanTerms::new(500_000.0, 8.75, 60),
///     LoanTerms::new(0.0, 8.0, 60),
/// ]);
/// assert_eq!(comparison.cheapest, Some(1));
/// assert_eq!(comparison.options[2].monthly_installment, None);
/// ```
#[must_use]
pub fn compare(options: &[LoanTerms]) -> Comparison {
    let options: Vec<OptionSummary> = options
        .iter()
        .map(|terms| OptionSummary {
            terms: *terms,
            monthly_installment: terms.monthly_installment(),
            total_payment: terms.total_payment(),
            total_interest: terms.total_interest(),
        })
        .collect();

    let cheapest = options
        .iter()
        .enumerate()
        .filter_map(|(index, o)| o.total_payment.map(|total| (index, total)))
        .fold(None, |best: Option<(usize, f64)>, (index, total)| match best {
            Some((_, lowest)) if lowest <= total => best,
            _ => Some((index, total)),
        })
        .map(|(index, _)| index);

    Comparison { options, cheapest }
}
