//! Typed per-operation parameters and their flat text encoding.

use std::{fmt::Display, str::FromStr};

use crate::{
    domain::{Interpolation, Operation, ParamField, ParamValues},
    error::ParamError,
};

pub const FACTOR_RANGE: (u32, u32) = (2, 32);
pub const SCALE_RANGE: (u32, u32) = (2, 8);
pub const AMOUNT_RANGE: (f64, f64) = (0.0, 3.0);
pub const RADIUS_RANGE: (u32, u32) = (1, 15);
pub const ALPHA_RANGE: (f64, f64) = (0.5, 3.0);
pub const BETA_RANGE: (i32, i32) = (-100, 100);

/// Parameters relevant to one operation. `None` leaves the choice to the
/// server's default for that field.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationParams {
    Downsampling {
        factor: Option<u32>,
        antialias: Option<bool>,
    },
    Upsampling {
        scale: Option<u32>,
        method: Option<Interpolation>,
    },
    Aliasing {
        factor: Option<u32>,
        method: Option<Interpolation>,
    },
    Sharpen {
        amount: Option<f64>,
        radius: Option<u32>,
    },
    Contrast {
        alpha: Option<f64>,
        beta: Option<i32>,
    },
}

impl OperationParams {
    /// Parses the fields that apply to `operation`. Fields that do not apply
    /// are ignored whatever they contain.
    pub fn parse(operation: Operation, values: &ParamValues) -> Result<Self, ParamError> {
        let params = match operation {
            Operation::Downsampling => OperationParams::Downsampling {
                factor: ranged(values, ParamField::Factor, "a whole number", FACTOR_RANGE)?,
                antialias: flag(values, ParamField::Antialias)?,
            },
            Operation::Upsampling => OperationParams::Upsampling {
                scale: ranged(values, ParamField::Scale, "a whole number", SCALE_RANGE)?,
                method: interpolation(values)?,
            },
            Operation::Aliasing => OperationParams::Aliasing {
                factor: ranged(values, ParamField::Factor, "a whole number", FACTOR_RANGE)?,
                method: interpolation(values)?,
            },
            Operation::Sharpen => OperationParams::Sharpen {
                amount: ranged(values, ParamField::Amount, "a number", AMOUNT_RANGE)?,
                radius: ranged(values, ParamField::Radius, "a whole number", RADIUS_RANGE)?,
            },
            Operation::Contrast => OperationParams::Contrast {
                alpha: ranged(values, ParamField::Alpha, "a number", ALPHA_RANGE)?,
                beta: ranged(values, ParamField::Beta, "a whole number", BETA_RANGE)?,
            },
        };
        Ok(params)
    }

    pub fn operation(&self) -> Operation {
        match self {
            OperationParams::Downsampling { .. } => Operation::Downsampling,
            OperationParams::Upsampling { .. } => Operation::Upsampling,
            OperationParams::Aliasing { .. } => Operation::Aliasing,
            OperationParams::Sharpen { .. } => Operation::Sharpen,
            OperationParams::Contrast { .. } => Operation::Contrast,
        }
    }

    /// All eight fields as `(name, text)` pairs in wire order. Fields the
    /// operation does not use, and unset ones, are empty.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        ParamField::ALL
            .into_iter()
            .map(|field| (field.name(), self.field_text(field)))
            .collect()
    }

    fn field_text(&self, field: ParamField) -> String {
        let text = match (self, field) {
            (OperationParams::Downsampling { factor, .. }, ParamField::Factor)
            | (OperationParams::Aliasing { factor, .. }, ParamField::Factor) => text(factor),
            (OperationParams::Downsampling { antialias, .. }, ParamField::Antialias) => {
                antialias.map(|on| if on { "1" } else { "0" }.to_string())
            }
            (OperationParams::Upsampling { scale, .. }, ParamField::Scale) => text(scale),
            (OperationParams::Upsampling { method, .. }, ParamField::Method)
            | (OperationParams::Aliasing { method, .. }, ParamField::Method) => {
                method.map(|m| m.as_str().to_string())
            }
            (OperationParams::Sharpen { amount, .. }, ParamField::Amount) => text(amount),
            (OperationParams::Sharpen { radius, .. }, ParamField::Radius) => text(radius),
            (OperationParams::Contrast { alpha, .. }, ParamField::Alpha) => text(alpha),
            (OperationParams::Contrast { beta, .. }, ParamField::Beta) => text(beta),
            _ => None,
        };
        text.unwrap_or_default()
    }
}

fn text<T: Display>(value: &Option<T>) -> Option<String> {
    value.as_ref().map(ToString::to_string)
}

fn raw(values: &ParamValues, field: ParamField) -> Option<&str> {
    let value = values.get(field).trim();
    (!value.is_empty()).then_some(value)
}

fn ranged<T>(
    values: &ParamValues,
    field: ParamField,
    expected: &'static str,
    (min, max): (T, T),
) -> Result<Option<T>, ParamError>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    let Some(value) = raw(values, field) else {
        return Ok(None);
    };
    let parsed = value.parse::<T>().map_err(|_| ParamError::Malformed {
        field,
        value: value.to_string(),
        expected,
    })?;
    // NaN fails both comparisons and is rejected here.
    if !(parsed >= min && parsed <= max) {
        return Err(ParamError::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(Some(parsed))
}

fn flag(values: &ParamValues, field: ParamField) -> Result<Option<bool>, ParamError> {
    let Some(value) = raw(values, field) else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ParamError::Malformed {
            field,
            value: value.to_string(),
            expected: "1 or 0",
        }),
    }
}

fn interpolation(values: &ParamValues) -> Result<Option<Interpolation>, ParamError> {
    let Some(value) = raw(values, ParamField::Method) else {
        return Ok(None);
    };
    value
        .parse::<Interpolation>()
        .map(Some)
        .map_err(|_| ParamError::Malformed {
            field: ParamField::Method,
            value: value.to_string(),
            expected: "nearest, bilinear or bicubic",
        })
}
