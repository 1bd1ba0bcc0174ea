//! Standalone helpers offered next to the browse views.
//!
//! - [`mask`]: Whole-word masking of unwanted words in free text
//! - [`emi`]: Loan installment calculation and comparison

pub mod emi;
pub mod mask;

pub use emi::{compare, Comparison, Installment, LoanTerms, OptionSummary, MAX_TENURE_MONTHS};
pub use mask::{WordMask, DEFAULT_MASKED_WORDS};
