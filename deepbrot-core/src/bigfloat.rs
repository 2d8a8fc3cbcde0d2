use dashu_base::Approximation;
use dashu_float::{DBig, FBig};
use serde::{Deserialize, Serialize};

/// Arbitrary precision floating point with explicit precision enforcement
///
/// Uses f64 internally when precision_bits <= 64, FBig otherwise.
/// This optimization is completely transparent to external code.
#[derive(Clone, Debug)]
pub struct BigFloat {
    value: BigFloatValue,
    precision_bits: usize,
}

#[derive(Clone, Debug)]
pub enum BigFloatValue {
    F64(f64),
    Arbitrary(FBig),
}

impl BigFloat {
    /// Create BigFloat from f64 with explicit precision
    ///
    /// NO DEFAULT - precision must always be specified
    pub fn with_precision(val: f64, precision_bits: usize) -> Self {
        let value = if precision_bits <= 64 {
            BigFloatValue::F64(val)
        } else {
            BigFloatValue::Arbitrary(fbig_from_f64(val, precision_bits))
        };

        Self {
            value,
            precision_bits,
        }
    }

    /// Create zero with explicit precision
    pub fn zero(precision_bits: usize) -> Self {
        Self::with_precision(0.0, precision_bits)
    }

    /// Get precision in bits
    pub fn precision_bits(&self) -> usize {
        self.precision_bits
    }

    /// Re-round this value to a new working precision.
    ///
    /// Dropping to 64 bits or fewer collapses the value into the f64 fast path.
    pub fn to_precision(&self, precision_bits: usize) -> Self {
        if precision_bits <= 64 {
            return Self {
                value: BigFloatValue::F64(self.to_f64()),
                precision_bits,
            };
        }
        let fbig = match &self.value {
            BigFloatValue::F64(v) => fbig_from_f64(*v, precision_bits),
            BigFloatValue::Arbitrary(v) => v.clone().with_precision(precision_bits).value(),
        };
        Self {
            value: BigFloatValue::Arbitrary(fbig),
            precision_bits,
        }
    }

    /// Convert to f64, rounding to nearest
    /// May lose precision for values requiring > 64 bits
    pub fn to_f64(&self) -> f64 {
        match &self.value {
            BigFloatValue::F64(v) => *v,
            BigFloatValue::Arbitrary(v) => fbig_to_f64_nearest(v),
        }
    }

    /// Binary exponent `e` such that `self = m · 2^e` with `|m|` in `[0.5, 1)`.
    ///
    /// Zero reports 0. Unlike `to_f64`, this never underflows, so it stays
    /// meaningful far below the f64 range.
    pub fn exponent(&self) -> isize {
        match &self.value {
            BigFloatValue::F64(v) => libm::frexp(*v).1 as isize,
            BigFloatValue::Arbitrary(v) => {
                let repr = v.repr();
                if repr.is_zero() {
                    0
                } else {
                    repr.exponent() + repr.digits() as isize
                }
            }
        }
    }

    /// Create BigFloat from string with explicit precision
    ///
    /// Allows creating values beyond f64 range (e.g., "1e1000").
    /// Uses atomic base conversion with target precision to avoid precision loss.
    pub fn from_string(val: &str, precision_bits: usize) -> Result<Self, String> {
        if precision_bits <= 64 {
            val.parse::<f64>()
                .map(|f| Self::with_precision(f, precision_bits))
                .map_err(|e| format!("Failed to parse f64: {}", e))
        } else {
            // Parse as decimal, then convert to binary with atomic precision specification
            val.parse::<DBig>()
                .map_err(|e| format!("Failed to parse DBig: {}", e))
                .map(|dbig| {
                    let fbig_halfaway = match dbig.with_base_and_precision::<2>(precision_bits) {
                        Approximation::Exact(v) => v,
                        Approximation::Inexact(v, _) => v,
                    };
                    // FBig's default rounding mode is Zero
                    let fbig_with_prec =
                        fbig_halfaway.with_rounding::<dashu_float::round::mode::Zero>();
                    Self {
                        value: BigFloatValue::Arbitrary(fbig_with_prec),
                        precision_bits,
                    }
                })
        }
    }

    /// Decimal rendering that `from_string` accepts back.
    pub fn to_decimal_string(&self) -> String {
        match &self.value {
            BigFloatValue::F64(v) => format!("{:e}", v),
            BigFloatValue::Arbitrary(v) => v.clone().with_base::<10>().value().to_string(),
        }
    }

    /// Number of bits needed to hold a decimal literal without losing digits.
    pub fn precision_for_literal(val: &str) -> usize {
        let (mantissa, exponent) = match val.find(|c| c == 'e' || c == 'E') {
            Some(i) => (&val[..i], val[i + 1..].parse::<i64>().unwrap_or(0)),
            None => (val, 0),
        };
        let digits = mantissa.chars().filter(|c| c.is_ascii_digit()).count() as u64;
        // log2(10) < 3.33
        ((digits + exponent.unsigned_abs()) * 10 / 3) as usize + 64
    }

    /// Add two BigFloats, preserving max precision
    pub fn add(&self, other: &Self) -> Self {
        let result_precision = self.precision_bits.max(other.precision_bits);

        let result_value = match (&self.value, &other.value) {
            (BigFloatValue::F64(a), BigFloatValue::F64(b)) if result_precision <= 64 => {
                BigFloatValue::F64(a + b)
            }
            _ => {
                let a_big = self.to_fbig();
                let b_big = other.to_fbig();
                BigFloatValue::Arbitrary(&a_big + &b_big)
            }
        };

        Self {
            value: result_value,
            precision_bits: result_precision,
        }
    }

    /// Subtract two BigFloats, preserving max precision
    pub fn sub(&self, other: &Self) -> Self {
        let result_precision = self.precision_bits.max(other.precision_bits);

        let result_value = match (&self.value, &other.value) {
            (BigFloatValue::F64(a), BigFloatValue::F64(b)) if result_precision <= 64 => {
                BigFloatValue::F64(a - b)
            }
            _ => {
                let a_big = self.to_fbig();
                let b_big = other.to_fbig();
                BigFloatValue::Arbitrary(&a_big - &b_big)
            }
        };

        Self {
            value: result_value,
            precision_bits: result_precision,
        }
    }

    /// Multiply two BigFloats, preserving max precision
    pub fn mul(&self, other: &Self) -> Self {
        let result_precision = self.precision_bits.max(other.precision_bits);

        let result_value = match (&self.value, &other.value) {
            (BigFloatValue::F64(a), BigFloatValue::F64(b)) if result_precision <= 64 => {
                BigFloatValue::F64(a * b)
            }
            _ => {
                let a_big = self.to_fbig();
                let b_big = other.to_fbig();
                BigFloatValue::Arbitrary(&a_big * &b_big)
            }
        };

        Self {
            value: result_value,
            precision_bits: result_precision,
        }
    }

    /// Divide two BigFloats, preserving max precision
    pub fn div(&self, other: &Self) -> Self {
        let result_precision = self.precision_bits.max(other.precision_bits);

        let result_value = match (&self.value, &other.value) {
            (BigFloatValue::F64(a), BigFloatValue::F64(b)) if result_precision <= 64 => {
                BigFloatValue::F64(a / b)
            }
            _ => {
                let a_big = self.to_fbig();
                let b_big = other.to_fbig();
                BigFloatValue::Arbitrary(&a_big / &b_big)
            }
        };

        Self {
            value: result_value,
            precision_bits: result_precision,
        }
    }

    /// Multiply by an f64 scalar at this value's precision.
    pub fn mul_f64(&self, factor: f64) -> Self {
        self.mul(&Self::with_precision(factor, self.precision_bits))
    }

    /// Add an f64 at this value's precision.
    pub fn add_f64(&self, other: f64) -> Self {
        self.add(&Self::with_precision(other, self.precision_bits))
    }

    /// Convert to FBig for arbitrary precision operations
    fn to_fbig(&self) -> FBig {
        match &self.value {
            BigFloatValue::F64(v) => fbig_from_f64(*v, self.precision_bits),
            BigFloatValue::Arbitrary(v) => v.clone(),
        }
    }
}

fn fbig_from_f64(val: f64, precision_bits: usize) -> FBig {
    match FBig::try_from(val) {
        Ok(fbig) => fbig.with_precision(precision_bits).value(),
        Err(_) => {
            log::warn!("non-finite value {} replaced by zero", val);
            FBig::ZERO.with_precision(precision_bits).value()
        }
    }
}

/// Parsed values carry round-toward-zero; conversion to f64 must not.
fn fbig_to_f64_nearest(v: &FBig) -> f64 {
    v.clone()
        .with_rounding::<dashu_float::round::mode::HalfEven>()
        .to_f64()
        .value()
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        match (&self.value, &other.value) {
            (BigFloatValue::F64(a), BigFloatValue::F64(b)) => a == b,
            _ => {
                let a_big = self.to_fbig();
                let b_big = other.to_fbig();
                a_big == b_big
            }
        }
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (&self.value, &other.value) {
            (BigFloatValue::F64(a), BigFloatValue::F64(b)) => a.partial_cmp(b),
            _ => {
                let a_big = self.to_fbig();
                let b_big = other.to_fbig();
                a_big.partial_cmp(&b_big)
            }
        }
    }
}

impl std::fmt::Display for BigFloat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

#[derive(Serialize, Deserialize)]
struct BigFloatSerde {
    value: String,
    precision_bits: usize,
}

impl Serialize for BigFloat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Binary FBig text round-trips exactly, unlike a decimal rendering.
        let value = match &self.value {
            BigFloatValue::F64(v) => v.to_string(),
            BigFloatValue::Arbitrary(v) => v.to_string(),
        };

        BigFloatSerde {
            value,
            precision_bits: self.precision_bits,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BigFloat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let serde = BigFloatSerde::deserialize(deserializer)?;

        let value = if serde.precision_bits <= 64 {
            let f = serde
                .value
                .parse::<f64>()
                .map_err(|e| serde::de::Error::custom(format!("Failed to parse f64: {}", e)))?;
            BigFloatValue::F64(f)
        } else {
            let fbig = serde
                .value
                .parse::<FBig>()
                .map_err(|e| serde::de::Error::custom(format!("Failed to parse FBig: {}", e)))?;
            BigFloatValue::Arbitrary(fbig.with_precision(serde.precision_bits).value())
        };

        Ok(BigFloat {
            value,
            precision_bits: serde.precision_bits,
        })
    }
}
