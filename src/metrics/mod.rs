//! Evaluation metrics for one-rule models.
//!
//! [`eval_model`] compares class predictions with actual labels and returns
//! an [`Evaluation`]: absolute and proportional confusion matrices with
//! margins, accuracy, error rate, error-rate reduction against the base
//! rate and a binomial p-value.
//!
//! # Examples
//!
//! ```rust
//! use oner::metrics::eval_model;
//!
//! # fn example() -> oner::Result<()> {
//! let predicted = vec![Some("A"), Some("A"), Some("A"), Some("B"), Some("B"), Some("B")];
//! let actual = vec![Some("A"), Some("A"), Some("B"), Some("B"), Some("B"), Some("B")];
//!
//! let eval = eval_model(&predicted, &actual)?;
//! assert_eq!(eval.correct, 5);
//! println!("{}", eval);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod classification;

pub use classification::{eval_model, Evaluation};
