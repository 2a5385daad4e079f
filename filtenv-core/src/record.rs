//! Records emitted by environments at every interaction step.
//!
//! A [`Record`] is a string-keyed map of [`RecordValue`]s. Environments return one
//! from [`Env::step`](crate::Env::step) to describe what actually happened in the
//! step, e.g., the raw action that was sent to the simulator after clipping.
//!
//! ```rust
//! use filtenv_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("reward", RecordValue::Scalar(-1.0));
//! record.insert("obs", RecordValue::Array1(vec![1.0, 2.0]));
//! assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
//! ```
mod base;

pub use base::{Record, RecordValue};
