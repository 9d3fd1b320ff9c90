//! Breadcrumbs locating a difference inside the value tree.

use std::fmt;

/// One step of a [`PathStack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A struct field, rendered as its name.
    Field(String),
    /// A position in a fixed-size array, rendered `array[i]`.
    ArrayIndex(usize),
    /// A position in a slice, rendered `slice[i]`.
    SliceIndex(usize),
    /// A map key in its default rendering, rendered `map[k]`.
    MapKey(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => f.write_str(name),
            Segment::ArrayIndex(i) => write!(f, "array[{}]", i),
            Segment::SliceIndex(i) => write!(f, "slice[{}]", i),
            Segment::MapKey(key) => write!(f, "map[{}]", key),
        }
    }
}

/// PathStack is the current location of a comparison, pushed on the way
/// down and popped on the way back up.
#[derive(Debug, Clone, Default)]
pub struct PathStack {
    segments: Vec<Segment>,
}

impl PathStack {
    pub fn new() -> Self {
        PathStack::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Removes the innermost segment. Popping an empty stack does nothing.
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Name of the innermost struct field or map key, if any.
    pub fn nearest_name(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|s| match s {
            Segment::Field(name) | Segment::MapKey(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Renders each segment, followed by `suffix` when given.
    pub fn render(&self, suffix: Option<&Segment>) -> Vec<String> {
        self.segments
            .iter()
            .chain(suffix)
            .map(ToString::to_string)
            .collect()
    }
}

impl fmt::Display for PathStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_display() {
        let mut path = PathStack::new();
        assert_eq!(path.to_string(), "");
        path.push(Segment::MapKey("foo".into()));
        path.push(Segment::Field("S".into()));
        path.push(Segment::SliceIndex(2));
        assert_eq!(path.to_string(), "map[foo].S.slice[2]");
        assert_eq!(path.len(), 3);

        assert_eq!(path.pop(), Some(Segment::SliceIndex(2)));
        path.pop();
        path.pop();
        assert!(path.is_empty());
        assert_eq!(path.pop(), None);
        assert!(path.is_empty());
    }

    #[test]
    fn test_nearest_name() {
        let mut path = PathStack::new();
        assert_eq!(path.nearest_name(), None);
        path.push(Segment::Field("Services".into()));
        path.push(Segment::ArrayIndex(0));
        assert_eq!(path.nearest_name(), Some("Services"));
        path.push(Segment::MapKey("users".into()));
        assert_eq!(path.nearest_name(), Some("users"));
    }

    #[test]
    fn test_render_with_suffix() {
        let mut path = PathStack::new();
        path.push(Segment::Field("A".into()));
        assert_eq!(
            path.render(Some(&Segment::ArrayIndex(1))),
            vec!["A".to_string(), "array[1]".to_string()]
        );
        assert_eq!(path.len(), 1);
    }
}
