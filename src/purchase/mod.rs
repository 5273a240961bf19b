//! Purchase flow
//!
//! Fetches one item, keeps the linked amount/quantity inputs consistent,
//! validates them and submits a single order to the backend.

mod flow;
mod form;

pub use flow::{PurchaseError, PurchaseFlow, PurchaseOptions, PurchaseState, SUBMIT_FAILED};
pub use form::{
    Field, FieldErrors, OrderStyle, PurchaseForm, AMOUNT_NOT_POSITIVE, INPUT_REQUIRED,
    QUANTITY_NOT_WHOLE,
};
