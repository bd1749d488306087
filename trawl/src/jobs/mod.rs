//! Concrete scan jobs built on the pipeline's policy traits.
//!
//! A job pairs a [`crate::transform::Transform`] with a matching
//! [`crate::reduce::Reduce`]. The engine knows nothing about either half
//! beyond the trait contracts.

pub mod keywords;
pub mod primes;
