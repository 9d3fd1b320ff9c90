//! Accumulation of differences.

use std::fmt;
use std::rc::Rc;

use super::path::{PathStack, Segment};

/// Diff is one point of disagreement between two values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    path: Vec<String>,
    left: String,
    right: String,
}

impl Diff {
    pub fn new(path: Vec<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        Diff {
            path,
            left: left.into(),
            right: right.into(),
        }
    }

    /// Rendered path segments, outermost first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Rendering of the first value.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Rendering of the second value.
    pub fn right(&self) -> &str {
        &self.right
    }
}

/// Formats as `a != b`, or `path.to.value: a != b`.
impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "{}: ", self.path.join("."))?;
        }
        write!(f, "{} != {}", self.left, self.right)
    }
}

/// Decides whether a candidate diff is kept.
pub type DiffFilter = Rc<dyn Fn(&Diff) -> bool>;

/// DiffSink collects diffs up to a fixed cap.
pub struct DiffSink {
    diffs: Vec<Diff>,
    max_diff: usize,
    filter: Option<DiffFilter>,
}

impl DiffSink {
    pub fn new(max_diff: usize, filter: Option<DiffFilter>) -> Self {
        DiffSink {
            diffs: Vec::new(),
            max_diff,
            filter,
        }
    }

    /// Records a diff at the current path.
    pub fn save(&mut self, path: &PathStack, left: impl Into<String>, right: impl Into<String>) {
        self.emit(Diff::new(path.render(None), left, right));
    }

    /// Records a diff at the current path extended by `segment`, without
    /// touching the path itself.
    pub fn save_with_suffix(
        &mut self,
        path: &PathStack,
        segment: Segment,
        left: impl Into<String>,
        right: impl Into<String>,
    ) {
        self.emit(Diff::new(path.render(Some(&segment)), left, right));
    }

    fn emit(&mut self, diff: Diff) {
        if self.is_full() {
            return;
        }
        if let Some(filter) = &self.filter {
            if !filter(&diff) {
                return;
            }
        }
        self.diffs.push(diff);
    }

    /// Returns true once the cap is reached.
    pub fn is_full(&self) -> bool {
        self.diffs.len() >= self.max_diff
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn into_diffs(self) -> Vec<Diff> {
        self.diffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_display() {
        assert_eq!(Diff::new(vec![], "foo", "bar").to_string(), "foo != bar");
        let diff = Diff::new(vec!["map[foo]".into(), "S".into()], "1", "2");
        assert_eq!(diff.to_string(), "map[foo].S: 1 != 2");
        assert_eq!(diff.left(), "1");
        assert_eq!(diff.path().len(), 2);
    }

    #[test]
    fn test_sink_caps_and_suffix() {
        let mut path = PathStack::new();
        path.push(Segment::Field("A".into()));
        let mut sink = DiffSink::new(2, None);
        sink.save_with_suffix(&path, Segment::SliceIndex(3), "x", "<no value>");
        sink.save(&path, "1", "2");
        assert!(sink.is_full());
        sink.save(&path, "3", "4");
        assert_eq!(path.to_string(), "A");

        let diffs: Vec<String> = sink.into_diffs().iter().map(ToString::to_string).collect();
        assert_eq!(diffs, vec!["A.slice[3]: x != <no value>", "A: 1 != 2"]);
    }

    #[test]
    fn test_filtered_diffs_do_not_count() {
        let filter: DiffFilter = Rc::new(|d: &Diff| d.left() != "skip");
        let mut sink = DiffSink::new(1, Some(filter));
        let path = PathStack::new();
        sink.save(&path, "skip", "me");
        assert!(sink.is_empty());
        sink.save(&path, "keep", "me");
        assert_eq!(sink.len(), 1);
    }
}
