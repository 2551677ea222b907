//! Constants and functions a calculator expression can name.

use std::f64::consts;

use weft_core::UserError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AngleMode {
    /// No trigonometric functions.
    None,
    #[default]
    Radian,
    Degree,
}

struct Function {
    name: &'static str,
    arity: usize,
    /// Takes `arity` or more arguments.
    variadic: bool,
    apply: fn(&[f64]) -> f64,
}

impl Function {
    const fn new(name: &'static str, arity: usize, apply: fn(&[f64]) -> f64) -> Self {
        Function {
            name,
            arity,
            variadic: false,
            apply,
        }
    }

    const fn variadic(name: &'static str, arity: usize, apply: fn(&[f64]) -> f64) -> Self {
        Function {
            name,
            arity,
            variadic: true,
            apply,
        }
    }

    fn accepts(&self, name: &str, argc: usize) -> bool {
        self.name.eq_ignore_ascii_case(name)
            && if self.variadic {
                argc >= self.arity
            } else {
                argc == self.arity
            }
    }
}

const CONSTANTS: &[(&str, f64)] = &[("e", consts::E), ("pi", consts::PI)];

const COMMON: &[Function] = &[
    Function::new("log", 1, |a| a[0].ln()),
    Function::new("log10", 1, |a| a[0].log10()),
    Function::new("abs", 1, |a| a[0].abs()),
    Function::variadic("max", 2, |a| a.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
    Function::variadic("min", 2, |a| a.iter().copied().fold(f64::INFINITY, f64::min)),
    Function::new("lerp", 3, |a| a[0] * (1.0 - a[2]) + a[1] * a[2]),
];

const RADIAN: &[Function] = &[
    Function::new("sin", 1, |a| a[0].sin()),
    Function::new("cos", 1, |a| a[0].cos()),
    Function::new("tan", 1, |a| a[0].tan()),
    Function::new("asin", 1, |a| a[0].asin()),
    Function::new("acos", 1, |a| a[0].acos()),
    Function::new("atan", 1, |a| a[0].atan()),
    Function::new("atan2", 2, |a| a[0].atan2(a[1])),
];

const DEGREE: &[Function] = &[
    Function::new("sin", 1, |a| a[0].to_radians().sin()),
    Function::new("cos", 1, |a| a[0].to_radians().cos()),
    Function::new("tan", 1, |a| a[0].to_radians().tan()),
    Function::new("asin", 1, |a| a[0].asin().to_degrees()),
    Function::new("acos", 1, |a| a[0].acos().to_degrees()),
    Function::new("atan", 1, |a| a[0].atan().to_degrees()),
    Function::new("atan2", 2, |a| a[0].atan2(a[1]).to_degrees()),
];

/// Name resolution for one angle mode. Names are case-insensitive.
#[derive(Clone, Copy, Debug)]
pub struct Library {
    mode: AngleMode,
}

impl Library {
    pub fn new(mode: AngleMode) -> Self {
        Library { mode }
    }

    fn functions(self) -> impl Iterator<Item = &'static Function> {
        let angles: &'static [Function] = match self.mode {
            AngleMode::None => &[],
            AngleMode::Radian => RADIAN,
            AngleMode::Degree => DEGREE,
        };
        COMMON.iter().chain(angles)
    }

    /// A bare name is a constant if there is one; otherwise `name` is a
    /// function call.
    pub fn call(self, name: &str, args: &[f64]) -> Result<f64, UserError> {
        if args.is_empty() {
            if let Some((_, value)) = CONSTANTS.iter().find(|(c, _)| c.eq_ignore_ascii_case(name)) {
                return Ok(*value);
            }
        }
        self.functions()
            .find(|f| f.accepts(name, args.len()))
            .map(|f| (f.apply)(args))
            .ok_or_else(|| UserError::new(format!("'{name}': no constant or function takes {} arguments", args.len())))
    }
}
