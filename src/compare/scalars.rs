//! Comparison of primitive values and functions.

use super::engine::Context;
use super::{NIL_FUNC, NON_NIL_FUNC};
use crate::value::{format_float, format_timestamp, Kind, Value};

impl Context<'_> {
    /// Booleans, integers, strings and timestamps compare by value and are
    /// reported raw, without consulting `String()`.
    pub(super) fn compare_scalars(&mut self, a: &Value, b: &Value) {
        if let Some((left, right)) = differing_scalars(a, b) {
            self.sink.save(&self.path, left, right);
        }
    }

    /// Floats are equal when bitwise equal or when they agree to the
    /// configured number of decimal places. This is what makes `0 == -0`
    /// and `NaN == NaN`.
    pub(super) fn compare_floats(&mut self, a: &Value, b: &Value) {
        let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
            return;
        };
        if x == y {
            return;
        }
        let precision = self.config.float_precision;
        if format!("{:.*}", precision, x) == format!("{:.*}", precision, y) {
            return;
        }
        let bits = match a.kind() {
            Some(Kind::Float32) => 32,
            _ => 64,
        };
        self.sink
            .save(&self.path, format_float(x, bits), format_float(y, bits));
    }

    /// Functions are ignored unless `compare_functions` is set, in which case
    /// any non-nil function differs.
    pub(super) fn compare_funcs(&mut self, a: &Value, b: &Value) {
        if !self.config.compare_functions || (a.is_nil() && b.is_nil()) {
            return;
        }
        let render = |v: &Value| if v.is_nil() { NIL_FUNC } else { NON_NIL_FUNC };
        self.sink.save(&self.path, render(a), render(b));
    }
}

fn differing_scalars(a: &Value, b: &Value) -> Option<(String, String)> {
    if let (Some(x), Some(y)) = (a.as_bool(), b.as_bool()) {
        return (x != y).then(|| (x.to_string(), y.to_string()));
    }
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return (x != y).then(|| (x.to_string(), y.to_string()));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return (x != y).then(|| (x.to_string(), y.to_string()));
    }
    if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
        return (x != y).then(|| (x.to_string(), y.to_string()));
    }
    if let (Some(x), Some(y)) = (a.as_timestamp(), b.as_timestamp()) {
        return (x != y).then(|| (format_timestamp(&x), format_timestamp(&y)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::engine::Hooks;
    use crate::config::Config;
    use crate::value::{Reflect, Type};

    fn run(config: &Config, a: &Value, b: &Value) -> Vec<String> {
        let hooks = Hooks::default();
        Context::new(config, &hooks)
            .run(a, b)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_scalars_render_raw() {
        let config = Config::default();
        assert_eq!(run(&config, &true.to_value(), &false.to_value()), vec!["true != false"]);
        assert_eq!(run(&config, &1u8.to_value(), &2u8.to_value()), vec!["1 != 2"]);
        assert_eq!(
            run(&config, &Value::duration(1_000), &Value::duration(2_000)),
            vec!["1000 != 2000"]
        );
        assert!(run(&config, &"x".to_value(), &"x".to_value()).is_empty());
    }

    #[test]
    fn test_float_edge_cases() {
        let config = Config::default();
        assert!(run(&config, &0.0f64.to_value(), &(-0.0f64).to_value()).is_empty());
        assert!(run(&config, &f64::NAN.to_value(), &f64::NAN.to_value()).is_empty());
        assert_eq!(
            run(&config, &f64::INFINITY.to_value(), &f64::NEG_INFINITY.to_value()),
            vec!["+Inf != -Inf"]
        );
        assert_eq!(
            run(&config, &0.5f32.to_value(), &0.25f32.to_value()),
            vec!["0.5 != 0.25"]
        );

        let coarse = Config {
            float_precision: 2,
            ..Config::default()
        };
        assert!(run(&coarse, &1.001f64.to_value(), &1.002f64.to_value()).is_empty());
    }

    #[test]
    fn test_funcs() {
        let ty = Type::func_of(vec![], vec![]);
        let f = Value::func(&ty, |_| Vec::new());
        let g = Value::func(&ty, |_| Vec::new());
        let nil = Value::nil_func(&ty);

        let config = Config::default();
        assert!(run(&config, &f, &g).is_empty());

        let strict = Config {
            compare_functions: true,
            ..Config::default()
        };
        assert_eq!(run(&strict, &f, &g), vec!["<non-nil func> != <non-nil func>"]);
        assert_eq!(run(&strict, &nil, &g), vec!["<nil func> != <non-nil func>"]);
        assert!(run(&strict, &nil, &nil.clone()).is_empty());
    }
}
