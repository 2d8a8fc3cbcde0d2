//! View-state records.
//!
//! Two in-memory codecs for the state a viewer saves and restores: the
//! legacy whitespace separated text record and a structured JSON record.
//! Neither touches the filesystem.

use crate::{ArbitraryComplex, BigFloat, StateError, ViewWindow};
use serde::{Deserialize, Serialize};

/// Legacy text record: iteration cap, center re, center im, step re, step im.
///
/// Steps are calibrated to the legacy reference canvas; the engine rescales
/// them to its own dimensions on load.
#[derive(Clone, Debug, PartialEq)]
pub struct LegacyViewState {
    pub max_iterations: u32,
    pub center: ArbitraryComplex,
    pub step: ArbitraryComplex,
}

const FIELDS: [&str; 4] = ["center_re", "center_im", "step_re", "step_im"];

impl LegacyViewState {
    pub fn parse(text: &str) -> Result<Self, StateError> {
        let mut tokens = text.split_whitespace();

        let iterations = tokens
            .next()
            .ok_or(StateError::MissingField("max_iterations"))?;
        let max_iterations = iterations
            .parse::<u32>()
            .map_err(|_| StateError::InvalidIterations(iterations.to_string()))?;

        let mut literals = Vec::with_capacity(FIELDS.len());
        for field in FIELDS {
            literals.push(tokens.next().ok_or(StateError::MissingField(field))?);
        }

        // Every coordinate shares the precision of the longest literal.
        let precision_bits = literals
            .iter()
            .map(|literal| BigFloat::precision_for_literal(literal))
            .max()
            .unwrap_or(64);

        let mut values = Vec::with_capacity(FIELDS.len());
        for (field, literal) in FIELDS.iter().zip(&literals) {
            let value = BigFloat::from_string(literal, precision_bits)
                .map_err(|message| StateError::InvalidNumber { field, message })?;
            values.push(value);
        }

        let mut values = values.into_iter();
        let mut next = || values.next().ok_or(StateError::MissingField("value"));
        let center = ArbitraryComplex::new(next()?, next()?);
        let step = ArbitraryComplex::new(next()?, next()?);

        Ok(Self {
            max_iterations,
            center,
            step,
        })
    }

    pub fn to_legacy_string(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n",
            self.max_iterations,
            self.center.re.to_decimal_string(),
            self.center.im.to_decimal_string(),
            self.step.re.to_decimal_string(),
            self.step.im.to_decimal_string(),
        )
    }
}

/// Structured view state: iteration cap plus the full-precision window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub max_iterations: u32,
    pub window: ViewWindow,
}

impl ViewState {
    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_view() {
        let state = LegacyViewState::parse("256\n-0.5\n0\n0.005\n0.005\n").unwrap();
        assert_eq!(state.max_iterations, 256);
        assert_eq!(state.center.to_fixed().re, -0.5);
        assert_eq!(state.step.to_fixed().im, 0.005);
    }

    #[test]
    fn accepts_any_whitespace_between_fields() {
        let state = LegacyViewState::parse("  1000 -0.75   0.1\t1e-3 1e-3").unwrap();
        assert_eq!(state.max_iterations, 1000);
        assert_eq!(state.center.to_fixed().im, 0.1);
    }

    #[test]
    fn long_literals_get_enough_precision() {
        let text = "5000\n-0.743643887037158704752191506114774\n0.131825904205311970493132056385139\n1e-30\n1e-30";
        let state = LegacyViewState::parse(text).unwrap();
        assert!(state.center.precision_bits() > 64);
        assert_eq!(state.center.precision_bits(), state.step.precision_bits());
    }

    #[test]
    fn missing_fields_are_reported() {
        match LegacyViewState::parse("256\n-0.5\n0\n") {
            Err(StateError::MissingField(field)) => assert_eq!(field, "step_re"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            LegacyViewState::parse(""),
            Err(StateError::MissingField("max_iterations"))
        ));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            LegacyViewState::parse("many\n0\n0\n1\n1"),
            Err(StateError::InvalidIterations(_))
        ));
        assert!(matches!(
            LegacyViewState::parse("256\n0\nzero\n1\n1"),
            Err(StateError::InvalidNumber {
                field: "center_im",
                ..
            })
        ));
    }

    #[test]
    fn legacy_string_parses_back() {
        let state = LegacyViewState::parse("300 -1.25 0.5 0.002 0.001").unwrap();
        let back = LegacyViewState::parse(&state.to_legacy_string()).unwrap();
        assert_eq!(back.max_iterations, 300);
        assert_eq!(back.center.to_fixed(), state.center.to_fixed());
        assert_eq!(back.step.to_fixed(), state.step.to_fixed());
    }

    #[test]
    fn json_state_round_trips() {
        let state = ViewState {
            max_iterations: 512,
            window: ViewWindow::from_f64(-0.75, 0.1, 1e-3, 1e-3, 128),
        };
        let json = state.to_json().unwrap();
        let back = ViewState::from_json(&json).unwrap();
        assert_eq!(back.max_iterations, 512);
        assert_eq!(back.window.precision_bits(), 128);
        assert_eq!(back.window.center.to_fixed(), state.window.center.to_fixed());
    }

    #[test]
    fn malformed_json_is_a_state_error() {
        assert!(matches!(
            ViewState::from_json("{\"max_iterations\": 3"),
            Err(StateError::Json(_))
        ));
    }
}
