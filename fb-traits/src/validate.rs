//! Type-checked reads of config/input attributes (§4.B).
//!
//! Concrete block types never match on [`fb_value::Value`] directly when
//! reading their own config or inputs; they go through one of these
//! accessors so every block logs the same shape of error for the same
//! shape of mistake. The kernel itself uses these too, for `enable` and
//! `execute_interval`.

use crate::attrs::{ConfigAttrs, InputAttrs};
use fb_value::Value;
use log::warn;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("attribute not found")]
    NotFound,
    #[error("value has the wrong type")]
    BadType,
    #[error("value is out of range")]
    Range,
    #[error("input is unresolved: linked but no value has arrived yet")]
    BadLink,
}

/// The outcome of a validated read: either a concrete value, the
/// explicit-but-valid `NotActive` state, or one of [`ValidationError`].
pub type ValidatedValue<T> = Result<Valid<T>, ValidationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valid<T> {
    Value(T),
    NotActive,
}

impl<T> Valid<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Valid::Value(v) => Some(v),
            Valid::NotActive => None,
        }
    }
}

fn log_err(block: &str, attr: &str, err: ValidationError) -> ValidationError {
    warn!("block `{block}`: attribute `{attr}` failed validation: {err}");
    err
}

pub fn get_config_bool(block: &str, cfg: &ConfigAttrs, name: &str) -> ValidatedValue<bool> {
    let attr = cfg.get(name).ok_or_else(|| log_err(block, name, ValidationError::NotFound))?;
    match &attr.value {
        Value::Bool(b) => Ok(Valid::Value(*b)),
        Value::NotActive => Ok(Valid::NotActive),
        _ => Err(log_err(block, name, ValidationError::BadType)),
    }
}

pub fn get_config_str<'a>(block: &str, cfg: &'a ConfigAttrs, name: &str) -> Result<&'a str, ValidationError> {
    let attr = cfg.get(name).ok_or_else(|| log_err(block, name, ValidationError::NotFound))?;
    attr.value
        .as_str()
        .ok_or_else(|| log_err(block, name, ValidationError::BadType))
}

pub fn get_config_int_range(
    block: &str,
    cfg: &ConfigAttrs,
    name: &str,
    min: i64,
    max: i64,
) -> ValidatedValue<i64> {
    let attr = cfg.get(name).ok_or_else(|| log_err(block, name, ValidationError::NotFound))?;
    match &attr.value {
        Value::Int(i) if *i >= min && *i <= max => Ok(Valid::Value(*i)),
        Value::Int(_) => Err(log_err(block, name, ValidationError::Range)),
        Value::NotActive => Ok(Valid::NotActive),
        _ => Err(log_err(block, name, ValidationError::BadType)),
    }
}

pub fn get_config_float(block: &str, cfg: &ConfigAttrs, name: &str) -> ValidatedValue<f64> {
    let attr = cfg.get(name).ok_or_else(|| log_err(block, name, ValidationError::NotFound))?;
    match &attr.value {
        Value::Float(f) => Ok(Valid::Value(*f)),
        Value::Int(i) => Ok(Valid::Value(*i as f64)),
        Value::NotActive => Ok(Valid::NotActive),
        _ => Err(log_err(block, name, ValidationError::BadType)),
    }
}

/// Reads a boolean input, surfacing `bad_link` for a linked-but-unresolved
/// input instead of the generic `bad_type`.
pub fn get_input_bool(block: &str, inputs: &InputAttrs, name: &str) -> ValidatedValue<bool> {
    let attr = inputs.get(name).ok_or_else(|| log_err(block, name, ValidationError::NotFound))?;
    match (&attr.value, &attr.link) {
        (Value::Bool(b), _) => Ok(Valid::Value(*b)),
        (Value::NotActive, _) => Ok(Valid::NotActive),
        (Value::Empty, Some(_)) => Err(log_err(block, name, ValidationError::BadLink)),
        _ => Err(log_err(block, name, ValidationError::BadType)),
    }
}

pub fn get_input_float(block: &str, inputs: &InputAttrs, name: &str) -> ValidatedValue<f64> {
    let attr = inputs.get(name).ok_or_else(|| log_err(block, name, ValidationError::NotFound))?;
    match (&attr.value, &attr.link) {
        (Value::Float(f), _) => Ok(Valid::Value(*f)),
        (Value::Int(i), _) => Ok(Valid::Value(*i as f64)),
        (Value::NotActive, _) => Ok(Valid::NotActive),
        (Value::Empty, Some(_)) => Err(log_err(block, name, ValidationError::BadLink)),
        _ => Err(log_err(block, name, ValidationError::BadType)),
    }
}
