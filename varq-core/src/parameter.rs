//! Linear parameter expressions for rotation gates
//!
//! A rotation angle is the linear combination `Σ coeff_i · name_i + constant`.
//! Every named parameter has a role: *encoder* parameters carry per-sample
//! input data, *ansatz* parameters are trainable weights shared across a batch.

use crate::{QuantumError, Result};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::ops::{Mul, Neg};

/// Bound parameter values, keyed by parameter name
pub type ParameterValues = IndexMap<String, f64>;

/// Linear combination of named real parameters plus a constant
///
/// # Example
/// ```
/// use varq_core::{ParameterResolver, ParameterValues};
///
/// let pr = ParameterResolver::named("a").with_term("b", 2.0).with_constant(0.5);
/// let mut values = ParameterValues::new();
/// values.insert("a".into(), 1.0);
/// values.insert("b".into(), 0.25);
/// assert_eq!(pr.combine(&values).unwrap(), 2.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterResolver {
    terms: IndexMap<String, f64>,
    constant: f64,
    encoder: IndexSet<String>,
}

impl ParameterResolver {
    /// A parameter-free value
    pub fn constant(value: f64) -> Self {
        Self {
            constant: value,
            ..Self::default()
        }
    }

    /// A single ansatz parameter with coefficient 1
    pub fn named(name: impl Into<String>) -> Self {
        Self::default().with_term(name, 1.0)
    }

    /// Add `coeff · name`, accumulating onto an existing term of the same name
    pub fn with_term(mut self, name: impl Into<String>, coeff: f64) -> Self {
        *self.terms.entry(name.into()).or_insert(0.0) += coeff;
        self
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// Mark every named parameter as an encoder parameter
    pub fn as_encoder(mut self) -> Self {
        self.encoder = self.terms.keys().cloned().collect();
        self
    }

    /// Mark every named parameter as an ansatz parameter
    pub fn as_ansatz(mut self) -> Self {
        self.encoder.clear();
        self
    }

    /// True when no named parameter appears
    pub fn is_const(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn const_value(&self) -> f64 {
        self.constant
    }

    /// Coefficient of `name`, if present
    pub fn coeff(&self, name: &str) -> Option<f64> {
        self.terms.get(name).copied()
    }

    /// Parameter names in insertion order
    pub fn params_name(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// `(name, coeff)` pairs in insertion order
    pub fn terms(&self) -> impl Iterator<Item = (&str, f64)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_encoder(&self, name: &str) -> bool {
        self.encoder.contains(name)
    }

    pub fn encoder_parameters(&self) -> impl Iterator<Item = &str> {
        self.params_name().filter(|n| self.is_encoder(n))
    }

    pub fn ansatz_parameters(&self) -> impl Iterator<Item = &str> {
        self.params_name().filter(|n| !self.is_encoder(n))
    }

    /// Evaluate the linear combination against bound values
    ///
    /// # Errors
    /// `ParameterMissing` when a named parameter has no value in `values`.
    pub fn combine(&self, values: &ParameterValues) -> Result<f64> {
        self.terms.iter().try_fold(self.constant, |acc, (name, coeff)| {
            values
                .get(name)
                .map(|v| acc + coeff * v)
                .ok_or_else(|| QuantumError::ParameterMissing(name.clone()))
        })
    }
}

impl Neg for ParameterResolver {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl Mul<f64> for ParameterResolver {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self {
        self.terms.values_mut().for_each(|c| *c *= rhs);
        self.constant *= rhs;
        self
    }
}

impl From<f64> for ParameterResolver {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<&str> for ParameterResolver {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl fmt::Display for ParameterResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, coeff) in &self.terms {
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if *coeff == 1.0 {
                write!(f, "{}", name)?;
            } else {
                write!(f, "{}*{}", coeff, name)?;
            }
        }
        if first || self.constant != 0.0 {
            if !first {
                write!(f, " + ")?;
            }
            write!(f, "{}", self.constant)?;
        }
        Ok(())
    }
}
