//! Minimal numeral formatting for floats and complex numbers
//!
//! Floats print with the shortest digit string that round-trips at their
//! width. The layout follows `%g`: scientific notation (`1e+06`, `1.5e-07`)
//! when the decimal exponent is below -4 or at least 6, plain decimal
//! otherwise. Non-finite values print `NaN`, `+Inf`, `-Inf`.

/// Precision a float was declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    F32,
    F64,
}

/// Exponent at or above which scientific notation is used
const EXPONENT_THRESHOLD: i32 = 6;

pub fn format_float(v: f64, width: Width, buf: &mut String) {
    format_float_signed(v, width, false, buf);
}

/// `(re+imi)`, the imaginary part always signed
pub fn format_complex(re: f64, im: f64, width: Width, buf: &mut String) {
    buf.push('(');
    format_float_signed(re, width, false, buf);
    format_float_signed(im, width, true, buf);
    buf.push_str("i)");
}

fn format_float_signed(v: f64, width: Width, force_sign: bool, buf: &mut String) {
    if v.is_nan() {
        if force_sign {
            buf.push('+');
        }
        buf.push_str("NaN");
        return;
    }
    if v.is_infinite() {
        buf.push_str(if v > 0.0 { "+Inf" } else { "-Inf" });
        return;
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.2345e3"
    let sci = match width {
        Width::F32 => format!("{:e}", v as f32),
        Width::F64 => format!("{:e}", v),
    };
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();

    if negative {
        buf.push('-');
    } else if force_sign {
        buf.push('+');
    }

    if !(-4..EXPONENT_THRESHOLD).contains(&exponent) {
        buf.push_str(&digits[..1]);
        if digits.len() > 1 {
            buf.push('.');
            buf.push_str(&digits[1..]);
        }
        buf.push('e');
        buf.push(if exponent < 0 { '-' } else { '+' });
        buf.push_str(&format!("{:02}", exponent.unsigned_abs()));
        return;
    }

    // Position of the decimal point relative to the digit string
    let point = exponent + 1;
    let len = digits.len() as i32;
    if point <= 0 {
        buf.push_str("0.");
        for _ in 0..-point {
            buf.push('0');
        }
        buf.push_str(&digits);
    } else if point >= len {
        buf.push_str(&digits);
        for _ in 0..(point - len) {
            buf.push('0');
        }
    } else {
        let (int_part, frac_part) = digits.split_at(point as usize);
        buf.push_str(int_part);
        buf.push('.');
        buf.push_str(frac_part);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64s(v: f64) -> String {
        let mut buf = String::new();
        format_float(v, Width::F64, &mut buf);
        buf
    }

    #[test]
    fn test_plain_decimal() {
        assert_eq!(f64s(3.14), "3.14");
        assert_eq!(f64s(1203.0), "1203");
        assert_eq!(f64s(10.15), "10.15");
        assert_eq!(f64s(0.5), "0.5");
        assert_eq!(f64s(-2.25), "-2.25");
        assert_eq!(f64s(0.0001), "0.0001");
        assert_eq!(f64s(123456.0), "123456");
    }

    #[test]
    fn test_zero() {
        assert_eq!(f64s(0.0), "0");
        assert_eq!(f64s(-0.0), "-0");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(f64s(1e6), "1e+06");
        assert_eq!(f64s(1234567.0), "1.234567e+06");
        assert_eq!(f64s(0.00001), "1e-05");
        assert_eq!(f64s(1.5e-7), "1.5e-07");
        assert_eq!(f64s(1e100), "1e+100");
        assert_eq!(f64s(-2.5e21), "-2.5e+21");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(f64s(f64::NAN), "NaN");
        assert_eq!(f64s(f64::INFINITY), "+Inf");
        assert_eq!(f64s(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_f32_shortest_digits() {
        let mut buf = String::new();
        format_float(0.1f32 as f64, Width::F32, &mut buf);
        assert_eq!(buf, "0.1");
    }

    #[test]
    fn test_complex() {
        let mut buf = String::new();
        format_complex(3.0, 0.14, Width::F64, &mut buf);
        assert_eq!(buf, "(3+0.14i)");

        let mut buf = String::new();
        format_complex(1.0, -2.0, Width::F32, &mut buf);
        assert_eq!(buf, "(1-2i)");

        let mut buf = String::new();
        format_complex(0.0, f64::NAN, Width::F64, &mut buf);
        assert_eq!(buf, "(0+NaNi)");
    }
}
