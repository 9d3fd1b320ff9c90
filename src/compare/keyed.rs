//! Matching of slice elements by identity fields instead of by position.

use std::collections::{HashMap, VecDeque};

use super::engine::Context;
use super::errors::DeepError;
use super::path::Segment;
use super::NO_VALUE;
use crate::value::{Kind, Value};

/// Separates the renderings of the identity fields within a key.
const KEY_SEPARATOR: char = '\u{1f}';

impl Context<'_> {
    /// Compares two slices by the identity fields the `sequence_keys` hook
    /// names for the current location. Returns false, leaving positional
    /// comparison to the caller, when no keys apply or an element cannot be
    /// keyed.
    pub(super) fn compare_keyed_slices(&mut self, a: &Value, b: &Value, level: usize) -> bool {
        let Some(hook) = self.hooks.sequence_keys.clone() else {
            return false;
        };
        let fields = hook(self.path.nearest_name().unwrap_or(""));
        if fields.is_empty() {
            return false;
        }

        let (a_keys, b_keys) = match (self.element_keys(a, &fields), self.element_keys(b, &fields)) {
            (Ok(a_keys), Ok(b_keys)) => (a_keys, b_keys),
            (Err(index), _) | (_, Err(index)) => {
                self.diagnose(DeepError::UnkeyedElement { index });
                return false;
            }
        };

        let mut unmatched: HashMap<&str, VecDeque<usize>> = HashMap::new();
        for (j, key) in b_keys.iter().enumerate() {
            unmatched.entry(key.as_str()).or_default().push_back(j);
        }

        let mut matched = vec![false; b_keys.len()];
        for (i, key) in a_keys.iter().enumerate() {
            let partner = unmatched.get_mut(key.as_str()).and_then(VecDeque::pop_front);
            let Some(a_elem) = a.index(i) else {
                continue;
            };
            match partner.and_then(|j| b.index(j).map(|b_elem| (j, b_elem))) {
                Some((j, b_elem)) => {
                    matched[j] = true;
                    self.path.push(Segment::SliceIndex(i));
                    self.equals(&a_elem, &b_elem, level + 1);
                    self.path.pop();
                }
                None => self.sink.save_with_suffix(
                    &self.path,
                    Segment::SliceIndex(i),
                    a_elem.to_string(),
                    NO_VALUE,
                ),
            }
            if self.sink.is_full() {
                return true;
            }
        }

        for (j, _) in matched.iter().enumerate().filter(|(_, m)| !**m) {
            if let Some(b_elem) = b.index(j) {
                self.sink.save_with_suffix(
                    &self.path,
                    Segment::SliceIndex(j),
                    NO_VALUE,
                    b_elem.to_string(),
                );
            }
            if self.sink.is_full() {
                break;
            }
        }
        true
    }

    /// Keys every element of `slice`, or returns the index of the first
    /// element that is neither a map nor a struct.
    fn element_keys(&self, slice: &Value, fields: &[String]) -> Result<Vec<String>, usize> {
        (0..slice.len())
            .map(|i| {
                slice
                    .index(i)
                    .and_then(|elem| element_key(&elem, fields))
                    .ok_or(i)
            })
            .collect()
    }
}

/// Joins the renderings of the identity fields of a map or struct element,
/// looking through pointers and interfaces. Missing fields render empty.
fn element_key(elem: &Value, fields: &[String]) -> Option<String> {
    let mut target = elem.clone();
    while target.kind()?.is_indirect() {
        target = target.elem()?;
    }

    let lookup = |name: &str| -> Option<Value> {
        match target.kind() {
            Some(Kind::Map) => target
                .map_entries()
                .into_iter()
                .find(|(k, _)| k.to_string() == name)
                .map(|(_, v)| v),
            _ => target.field_by_name(name),
        }
    };
    if !matches!(target.kind(), Some(Kind::Map | Kind::Struct)) {
        return None;
    }

    let parts: Vec<String> = fields
        .iter()
        .map(|name| lookup(name).map(|v| v.to_string()).unwrap_or_default())
        .collect();
    Some(parts.join(&KEY_SEPARATOR.to_string()))
}
