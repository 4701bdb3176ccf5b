use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::error::{UnknownInterpolation, UnknownOperation};

/// Server-side transform requested by a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operation {
    #[default]
    Downsampling,
    Upsampling,
    Aliasing,
    Sharpen,
    Contrast,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Downsampling,
        Operation::Upsampling,
        Operation::Aliasing,
        Operation::Sharpen,
        Operation::Contrast,
    ];

    /// Name used on the wire and in the operation selector.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Downsampling => "downsampling",
            Operation::Upsampling => "upsampling",
            Operation::Aliasing => "aliasing",
            Operation::Sharpen => "sharpen",
            Operation::Contrast => "contrast",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// One of the eight scalar parameter fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamField {
    Factor,
    Antialias,
    Scale,
    Method,
    Amount,
    Radius,
    Alpha,
    Beta,
}

/// Which operations each parameter field applies to. Wire order.
pub const FIELD_OPERATIONS: [(ParamField, &[Operation]); 8] = [
    (
        ParamField::Factor,
        &[Operation::Downsampling, Operation::Aliasing],
    ),
    (ParamField::Antialias, &[Operation::Downsampling]),
    (ParamField::Scale, &[Operation::Upsampling]),
    (
        ParamField::Method,
        &[Operation::Upsampling, Operation::Aliasing],
    ),
    (ParamField::Amount, &[Operation::Sharpen]),
    (ParamField::Radius, &[Operation::Sharpen]),
    (ParamField::Alpha, &[Operation::Contrast]),
    (ParamField::Beta, &[Operation::Contrast]),
];

impl ParamField {
    pub const ALL: [ParamField; 8] = [
        ParamField::Factor,
        ParamField::Antialias,
        ParamField::Scale,
        ParamField::Method,
        ParamField::Amount,
        ParamField::Radius,
        ParamField::Alpha,
        ParamField::Beta,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamField::Factor => "factor",
            ParamField::Antialias => "antialias",
            ParamField::Scale => "scale",
            ParamField::Method => "method",
            ParamField::Amount => "amount",
            ParamField::Radius => "radius",
            ParamField::Alpha => "alpha",
            ParamField::Beta => "beta",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields shown for `operation`, in wire order.
pub fn visible_fields(operation: Operation) -> Vec<ParamField> {
    FIELD_OPERATIONS
        .iter()
        .filter(|(_, ops)| ops.contains(&operation))
        .map(|(field, _)| *field)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Nearest,
    Bilinear,
    Bicubic,
}

impl Interpolation {
    pub fn as_str(self) -> &'static str {
        match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Bilinear => "bilinear",
            Interpolation::Bicubic => "bicubic",
        }
    }
}

impl FromStr for Interpolation {
    type Err = UnknownInterpolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Interpolation::Nearest),
            "bilinear" => Ok(Interpolation::Bilinear),
            "bicubic" => Ok(Interpolation::Bicubic),
            _ => Err(UnknownInterpolation(s.to_string())),
        }
    }
}

/// Raw text the user typed into the parameter fields.
///
/// A field that was never set reads as the empty string, the same as a form
/// control that is missing from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamValues {
    values: BTreeMap<ParamField, String>,
}

impl ParamValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: ParamField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: ParamField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: ParamField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
