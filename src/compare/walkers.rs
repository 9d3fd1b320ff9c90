//! Traversal of structs, maps, arrays and slices.

use super::engine::Context;
use super::path::Segment;
use super::{DOES_NOT_HAVE_KEY, NIL_MAP, NIL_SLICE, NO_VALUE};
use crate::value::Value;

impl Context<'_> {
    /// Fields are visited in declaration order. Unexported fields are skipped
    /// unless configured otherwise, and fields tagged `deep:"-"` always are.
    pub(super) fn compare_structs(&mut self, a: &Value, b: &Value, level: usize) {
        let Some(ty) = a.ty() else {
            return;
        };
        for (i, field) in ty.fields().iter().enumerate() {
            if !field.is_exported() && !self.config.compare_unexported_fields {
                continue;
            }
            if field.is_ignored() {
                continue;
            }
            let (Some(a_field), Some(b_field)) = (a.field(i), b.field(i)) else {
                continue;
            };

            self.path.push(Segment::Field(field.name().to_string()));
            self.equals(&a_field, &b_field, level + 1);
            self.path.pop();

            if self.sink.is_full() {
                break;
            }
        }
    }

    pub(super) fn compare_maps(&mut self, a: &Value, b: &Value, level: usize) {
        if self.nil_container_differs(a, b, NIL_MAP, self.config.nil_maps_are_empty) {
            return;
        }
        if a.identity() == b.identity() {
            return;
        }

        let b_entries = b.map_entries();
        for (key, a_val) in a.map_entries() {
            let segment = Segment::MapKey(key.to_string());
            match b.map_index(&key) {
                Some(b_val) => {
                    self.path.push(segment);
                    self.equals(&a_val, &b_val, level + 1);
                    self.path.pop();
                }
                None => self.sink.save_with_suffix(
                    &self.path,
                    segment,
                    a_val.to_string(),
                    DOES_NOT_HAVE_KEY,
                ),
            }
            if self.sink.is_full() {
                return;
            }
        }

        for (key, b_val) in b_entries {
            if a.map_index(&key).is_some() {
                continue;
            }
            self.sink.save_with_suffix(
                &self.path,
                Segment::MapKey(key.to_string()),
                DOES_NOT_HAVE_KEY,
                b_val.to_string(),
            );
            if self.sink.is_full() {
                return;
            }
        }
    }

    pub(super) fn compare_arrays(&mut self, a: &Value, b: &Value, level: usize) {
        for i in 0..a.len() {
            let (Some(a_elem), Some(b_elem)) = (a.index(i), b.index(i)) else {
                break;
            };
            self.path.push(Segment::ArrayIndex(i));
            self.equals(&a_elem, &b_elem, level + 1);
            self.path.pop();
            if self.sink.is_full() {
                break;
            }
        }
    }

    pub(super) fn compare_slices(&mut self, a: &Value, b: &Value, level: usize) {
        if self.nil_container_differs(a, b, NIL_SLICE, self.config.nil_slices_are_empty) {
            return;
        }
        if a.identity() == b.identity() && a.len() == b.len() {
            return;
        }
        if self.compare_keyed_slices(a, b, level) {
            return;
        }
        self.compare_positions(a, b, level);
    }

    /// Compares elements pairwise, then reports the tail of the longer slice.
    pub(super) fn compare_positions(&mut self, a: &Value, b: &Value, level: usize) {
        let n = a.len().max(b.len());
        for i in 0..n {
            match (a.index(i), b.index(i)) {
                (Some(a_elem), Some(b_elem)) => {
                    self.path.push(Segment::SliceIndex(i));
                    self.equals(&a_elem, &b_elem, level + 1);
                    self.path.pop();
                }
                (Some(a_elem), None) => self.sink.save_with_suffix(
                    &self.path,
                    Segment::SliceIndex(i),
                    a_elem.to_string(),
                    NO_VALUE,
                ),
                (None, Some(b_elem)) => self.sink.save_with_suffix(
                    &self.path,
                    Segment::SliceIndex(i),
                    NO_VALUE,
                    b_elem.to_string(),
                ),
                (None, None) => break,
            }
            if self.sink.is_full() {
                break;
            }
        }
    }

    /// Handles nil maps and slices. Returns true when the comparison of this
    /// container is finished.
    fn nil_container_differs(
        &mut self,
        a: &Value,
        b: &Value,
        sentinel: &str,
        nil_is_empty: bool,
    ) -> bool {
        let (a_nil, b_nil) = (a.is_nil(), b.is_nil());
        if nil_is_empty {
            if a_nil && !b.is_empty() {
                self.sink.save(&self.path, sentinel, b.to_string());
                return true;
            }
            if b_nil && !a.is_empty() {
                self.sink.save(&self.path, a.to_string(), sentinel);
                return true;
            }
            return a.is_empty() && b.is_empty();
        }
        match (a_nil, b_nil) {
            (true, true) => true,
            (true, false) => {
                self.sink.save(&self.path, sentinel, b.to_string());
                true
            }
            (false, true) => {
                self.sink.save(&self.path, a.to_string(), sentinel);
                true
            }
            (false, false) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::compare::engine::{Context, Hooks};
    use crate::config::Config;
    use crate::value::{Reflect, StructField, Type, Value};
    use std::collections::BTreeMap;

    fn run(config: &Config, a: &Value, b: &Value) -> Vec<String> {
        let hooks = Hooks::default();
        Context::new(config, &hooks)
            .run(a, b)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_struct_skips_unexported_and_ignored() {
        let ty = Type::structure(
            "T",
            "deep",
            vec![
                StructField::new("A", &Type::int()),
                StructField::new("b", &Type::int()),
                StructField::new("C", &Type::int()).with_tag(r#"deep:"-""#),
            ],
        );
        let a = Value::structure(&ty, vec![1isize.to_value(), 2isize.to_value(), 3isize.to_value()]);
        let b = Value::structure(&ty, vec![1isize.to_value(), 5isize.to_value(), 6isize.to_value()]);
        assert!(run(&Config::default(), &a, &b).is_empty());

        let config = Config {
            compare_unexported_fields: true,
            ..Config::default()
        };
        assert_eq!(run(&config, &a, &b), vec!["b: 2 != 5"]);
    }

    #[test]
    fn test_array_positions() {
        assert_eq!(
            run(&Config::default(), &[1i64, 2, 3].to_value(), &[1i64, 0, 4].to_value()),
            vec!["array[1]: 2 != 0", "array[2]: 3 != 4"]
        );
    }

    #[test]
    fn test_nil_maps() {
        let ty = Type::map_of(&Type::string(), &Type::int());
        let nil = Value::nil_map(&ty);
        let empty = Value::map(&ty, vec![]);
        let full = Value::map(&ty, vec![("a".to_value(), 1isize.to_value())]);

        let config = Config::default();
        assert_eq!(run(&config, &nil, &empty), vec!["<nil map> != map[]"]);
        assert_eq!(run(&config, &full, &nil), vec!["map[a:1] != <nil map>"]);
        assert!(run(&config, &nil, &nil.clone()).is_empty());

        let lenient = Config {
            nil_maps_are_empty: true,
            ..Config::default()
        };
        assert!(run(&lenient, &nil, &empty).is_empty());
        assert!(run(&lenient, &empty, &nil).is_empty());
        assert_eq!(run(&lenient, &nil, &full), vec!["<nil map> != map[a:1]"]);
    }

    #[test]
    fn test_map_extra_keys_both_sides() {
        let mut a = BTreeMap::new();
        a.insert("a".to_string(), 1i64);
        a.insert("b".to_string(), 2i64);
        let mut b = BTreeMap::new();
        b.insert("b".to_string(), 3i64);
        b.insert("c".to_string(), 4i64);
        assert_eq!(
            run(&Config::default(), &a.to_value(), &b.to_value()),
            vec![
                "map[a]: 1 != <does not have key>",
                "map[b]: 2 != 3",
                "map[c]: <does not have key> != 4",
            ]
        );
    }

    #[test]
    fn test_shared_slice_storage() {
        let v = vec![1i64, 2].to_value();
        assert!(run(&Config::default(), &v, &v.clone()).is_empty());
        assert_eq!(
            run(&Config::default(), &vec![1i64].to_value(), &vec![1i64, 2, 3].to_value()),
            vec!["slice[1]: <no value> != 2", "slice[2]: <no value> != 3"]
        );
    }

    #[test]
    fn test_max_diff_stops_walk() {
        let config = Config {
            max_diff: 2,
            ..Config::default()
        };
        let diffs = run(&config, &vec![1i64, 2, 3, 4].to_value(), &vec![5i64, 6, 7, 8].to_value());
        assert_eq!(diffs, vec!["slice[0]: 1 != 5", "slice[1]: 2 != 6"]);
    }
}
