/// Half-open byte range into the source text.
///
/// Line/column positions are derived on demand through
/// [`crate::diagnostic::SourceMap`]; everything else works in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Sentinel span that does not correspond to any source location.
    pub fn dummy() -> Self {
        Self {
            start: usize::MAX,
            end: usize::MAX,
        }
    }

    /// Returns true if this span is the dummy sentinel (no source location).
    pub fn is_dummy(self) -> bool {
        self.start == usize::MAX && self.end == usize::MAX
    }

    pub fn merge(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// True if `other` lies entirely within this span (equality allowed).
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Containment excluding equality. The scope tree's parent/child
    /// invariant is stated in terms of strict containment.
    pub fn strictly_contains(self, other: Span) -> bool {
        self != other && self.contains(other)
    }

    /// True if the two spans share at least one byte.
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_takes_the_hull() {
        let a = Span::new(3, 7);
        let b = Span::new(5, 12);
        assert_eq!(a.merge(b), Span::new(3, 12));
        assert_eq!(b.merge(a), Span::new(3, 12));
    }

    #[test]
    fn merge_ignores_dummy() {
        let a = Span::new(3, 7);
        assert_eq!(a.merge(Span::dummy()), a);
        assert_eq!(Span::dummy().merge(a), a);
    }

    #[test]
    fn containment() {
        let outer = Span::new(0, 10);
        let inner = Span::new(2, 5);
        assert!(outer.contains(inner));
        assert!(outer.strictly_contains(inner));
        assert!(outer.contains(outer));
        assert!(!outer.strictly_contains(outer));
        assert!(!inner.contains(outer));
    }

    #[test]
    fn overlap() {
        assert!(Span::new(0, 5).overlaps(Span::new(4, 8)));
        assert!(!Span::new(0, 5).overlaps(Span::new(5, 8)));
    }
}
