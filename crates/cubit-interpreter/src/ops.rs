use std::ops::{Add, Div, Mul, Not, Sub};

use crate::{RuntimeError, RuntimeResult, Value, ValueKind};

type OpResult<'src> = RuntimeResult<'src, Value<'src>>;

/// The largest string in bytes which repetition may produce.
pub const MAX_STRING_LEN: usize = 1 << 30;

impl<'src> Value<'src> {
    /// Wraps `kind` in a value covering both operands.
    fn derive(&self, kind: ValueKind<'src>, rhs: &Self) -> Self {
        Value::new(kind, self.span.to(rhs.span), self.context.clone())
    }

    /// Applies `op` if both operands are numbers and fails with an illegal operation otherwise.
    fn numeric(self, rhs: Self, op: impl FnOnce(f64, f64) -> f64) -> OpResult<'src> {
        match (&self.kind, &rhs.kind) {
            (ValueKind::Number(left), ValueKind::Number(right)) => {
                Ok(self.derive(ValueKind::Number(op(*left, *right)), &rhs))
            }
            _ => Err(self.illegal(&rhs)),
        }
    }

    fn compare(self, rhs: Self, op: impl FnOnce(f64, f64) -> bool) -> OpResult<'src> {
        self.numeric(rhs, |left, right| op(left, right) as u8 as f64)
    }

    pub fn pow(self, rhs: Self) -> OpResult<'src> {
        self.numeric(rhs, f64::powf)
    }

    pub fn eq(self, rhs: Self) -> OpResult<'src> {
        self.compare(rhs, |left, right| left == right)
    }

    pub fn ne(self, rhs: Self) -> OpResult<'src> {
        self.compare(rhs, |left, right| left != right)
    }

    pub fn lt(self, rhs: Self) -> OpResult<'src> {
        self.compare(rhs, |left, right| left < right)
    }

    pub fn lte(self, rhs: Self) -> OpResult<'src> {
        self.compare(rhs, |left, right| left <= right)
    }

    pub fn gt(self, rhs: Self) -> OpResult<'src> {
        self.compare(rhs, |left, right| left > right)
    }

    pub fn gte(self, rhs: Self) -> OpResult<'src> {
        self.compare(rhs, |left, right| left >= right)
    }

    pub fn and(self, rhs: Self) -> OpResult<'src> {
        self.compare(rhs, |left, right| truthy(left) && truthy(right))
    }

    pub fn or(self, rhs: Self) -> OpResult<'src> {
        self.compare(rhs, |left, right| truthy(left) || truthy(right))
    }
}

fn truthy(num: f64) -> bool {
    num != 0.0 && !num.is_nan()
}

impl<'src> Not for Value<'src> {
    type Output = OpResult<'src>;

    fn not(self) -> Self::Output {
        match self.kind {
            // only an exact zero is falsy here, NaN becomes 0 like any other number
            ValueKind::Number(num) => Ok(Value::new(
                ValueKind::Number(if num == 0.0 { 1.0 } else { 0.0 }),
                self.span,
                self.context,
            )),
            _ => Err(self.illegal(&self)),
        }
    }
}

impl<'src> Add for Value<'src> {
    type Output = OpResult<'src>;

    fn add(self, rhs: Self) -> Self::Output {
        match (&self.kind, &rhs.kind) {
            (ValueKind::Number(_), _) => self.numeric(rhs, |left, right| left + right),
            (ValueKind::String(left), ValueKind::String(right)) => {
                Ok(self.derive(ValueKind::String(format!("{left}{right}")), &rhs))
            }
            (ValueKind::List(left), ValueKind::List(right)) => {
                let mut elements = Vec::with_capacity(left.len() + right.len());
                elements.extend(left.iter().cloned());
                elements.extend(right.iter().cloned());
                Ok(self.derive(ValueKind::List(elements), &rhs))
            }
            (ValueKind::List(_), _) => Err(RuntimeError::new(
                "To concatenate, must add a list",
                rhs.span,
                self.context.clone(),
            )),
            _ => Err(self.illegal(&rhs)),
        }
    }
}

impl<'src> Sub for Value<'src> {
    type Output = OpResult<'src>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.numeric(rhs, |left, right| left - right)
    }
}

impl<'src> Mul for Value<'src> {
    type Output = OpResult<'src>;

    fn mul(self, rhs: Self) -> Self::Output {
        match (&self.kind, &rhs.kind) {
            (ValueKind::String(text), ValueKind::Number(count)) => {
                // fractional counts are truncated
                let len = match count.is_finite() && *count >= 0.0 {
                    true => text.len().checked_mul(*count as usize),
                    false => None,
                };
                if !len.map_or(false, |len| len <= MAX_STRING_LEN) {
                    return Err(self.error(
                        format!(
                            "Failed to repeat: invalid count {}",
                            ValueKind::Number(*count)
                        ),
                        &rhs,
                    ));
                }
                Ok(self.derive(ValueKind::String(text.repeat(*count as usize)), &rhs))
            }
            _ => self.numeric(rhs, |left, right| left * right),
        }
    }
}

impl<'src> Div for Value<'src> {
    type Output = OpResult<'src>;

    fn div(self, rhs: Self) -> Self::Output {
        match (&self.kind, &rhs.kind) {
            (ValueKind::Number(_), ValueKind::Number(right)) if *right == 0.0 => {
                Err(RuntimeError::new(
                    "Dividing by zero is illegal",
                    rhs.span,
                    self.context.clone(),
                ))
            }
            _ => self.numeric(rhs, |left, right| left / right),
        }
    }
}

#[cfg(test)]
mod tests {
    use cubit_parser::span;

    use super::*;

    fn num(num: f64) -> Value<'static> {
        Value::number(num)
    }

    fn kind(res: OpResult) -> ValueKind {
        match res {
            Ok(value) => value.kind,
            Err(err) => panic!("unexpected error: {}", err.message),
        }
    }

    fn message(res: OpResult) -> String {
        match res {
            Ok(value) => panic!("expected an error, got `{value}`"),
            Err(err) => err.message,
        }
    }

    #[test]
    fn arithmetic() {
        assert_eq!(kind(num(1.5) + num(2.0)), ValueKind::Number(3.5));
        assert_eq!(kind(num(1.0) - num(3.0)), ValueKind::Number(-2.0));
        assert_eq!(kind(num(4.0) * num(2.5)), ValueKind::Number(10.0));
        assert_eq!(kind(num(7.0) / num(2.0)), ValueKind::Number(3.5));
        assert_eq!(kind(num(2.0).pow(num(10.0))), ValueKind::Number(1024.0));
    }

    #[test]
    fn division_by_zero() {
        for left in [0.0, 1.0, -3.5, f64::INFINITY] {
            assert_eq!(message(num(left) / num(0.0)), "Dividing by zero is illegal");
            assert_eq!(message(num(left) / num(-0.0)), "Dividing by zero is illegal");
        }

        let err = (num(1.0).with_span(span!(0..1)) / num(0.0).with_span(span!(4..5)))
            .expect_err("division by zero should fail");
        assert_eq!(err.span, span!(4..5));
    }

    #[test]
    fn comparisons() {
        let tests = [
            (num(5.0).eq(num(5.0)), 1.0),
            (num(5.0).eq(num(6.0)), 0.0),
            (num(5.0).ne(num(6.0)), 1.0),
            (num(1.0).lt(num(2.0)), 1.0),
            (num(2.0).lt(num(2.0)), 0.0),
            (num(2.0).lte(num(2.0)), 1.0),
            (num(3.0).gt(num(2.0)), 1.0),
            (num(2.0).gte(num(3.0)), 0.0),
            (num(2.0).and(num(3.0)), 1.0),
            (num(2.0).and(num(0.0)), 0.0),
            (num(0.0).or(num(0.0)), 0.0),
            (num(0.0).or(num(-1.0)), 1.0),
        ];
        for (res, expected) in tests {
            assert_eq!(kind(res), ValueKind::Number(expected));
        }
    }

    #[test]
    fn not() {
        assert_eq!(kind(!num(0.0)), ValueKind::Number(1.0));
        assert_eq!(kind(!num(1.0)), ValueKind::Number(0.0));
        assert_eq!(kind(!num(-7.0)), ValueKind::Number(0.0));
        assert_eq!(message(!Value::string("a")), "operation done is illegal");
    }

    #[test]
    fn strings() {
        assert_eq!(
            kind(Value::string("foo") + Value::string("bar")),
            ValueKind::String("foobar".to_string())
        );
        assert_eq!(
            kind(Value::string("ab") * num(3.0)),
            ValueKind::String("ababab".to_string())
        );
        assert_eq!(
            kind(Value::string("ab") * num(1.9)),
            ValueKind::String("ab".to_string())
        );
        assert_eq!(
            message(Value::string("ab") * num(-1.0)),
            "Failed to repeat: invalid count -1"
        );
        assert_eq!(
            kind(Value::string("") * num(1e19)),
            ValueKind::String(String::new())
        );
        assert_eq!(
            message(Value::string("ab") * num(1e19)),
            "Failed to repeat: invalid count 10000000000000000000"
        );
        assert_eq!(
            message(Value::string("ab") * num((MAX_STRING_LEN / 2 + 1) as f64)),
            format!("Failed to repeat: invalid count {}", MAX_STRING_LEN / 2 + 1)
        );
        assert_eq!(
            message(Value::string("ab") * num(f64::INFINITY)),
            "Failed to repeat: invalid count Infinity"
        );
        assert_eq!(
            message(Value::string("a") + num(1.0)),
            "operation done is illegal"
        );
        assert_eq!(
            message(Value::string("a").eq(Value::string("a"))),
            "operation done is illegal"
        );
        assert_eq!(message(num(2.0) * Value::string("a")), "operation done is illegal");
    }

    #[test]
    fn list_concatenation() {
        let left = Value::list(vec![num(1.0), num(2.0)]);
        let right = Value::list(vec![Value::string("a"), num(3.0), num(4.0)]);

        let joined = kind(left.clone() + right.clone());
        assert_eq!(
            joined,
            ValueKind::List(vec![
                num(1.0),
                num(2.0),
                Value::string("a"),
                num(3.0),
                num(4.0)
            ])
        );

        // neither operand is modified
        assert_eq!(left.kind, ValueKind::List(vec![num(1.0), num(2.0)]));
        assert_eq!(
            right.kind,
            ValueKind::List(vec![Value::string("a"), num(3.0), num(4.0)])
        );
    }

    #[test]
    fn list_with_non_list() {
        let err = (Value::list(vec![]).with_span(span!(0..2)) + num(1.0).with_span(span!(5..6)))
            .expect_err("adding a number to a list should fail");
        assert_eq!(err.message, "To concatenate, must add a list");
        assert_eq!(err.span, span!(5..6));
    }

    #[test]
    fn illegal_operation_span() {
        let err = (num(1.0).with_span(span!(0..1)) - Value::string("a").with_span(span!(4..7)))
            .expect_err("subtracting a string should fail");
        assert_eq!(err.message, "operation done is illegal");
        assert_eq!(err.span, span!(0..7));
    }
}
