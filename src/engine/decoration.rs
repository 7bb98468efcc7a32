use std::ops::Range;

/// A mark decoration: a CSS-like class applied over a range without touching the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    class: String,
}

impl Decoration {
    pub fn mark(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn range(&self, from: usize, to: usize) -> DecorationRange {
        DecorationRange {
            from,
            to,
            decoration: self.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationRange {
    pub from: usize,
    pub to: usize,
    pub decoration: Decoration,
}

impl DecorationRange {
    /// The part of this range that lies inside a document of `len` chars.
    pub fn clipped(&self, len: usize) -> Option<Range<usize>> {
        let from = self.from.min(len);
        let to = self.to.min(len);
        (from < to).then_some(from..to)
    }
}

/// Ranges are stored as given; bounds are only enforced when a view clips them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    ranges: Vec<DecorationRange>,
}

impl DecorationSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(mut ranges: Vec<DecorationRange>) -> Self {
        ranges.sort_by_key(|r| (r.from, r.to));
        Self { ranges }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecorationRange> {
        self.ranges.iter()
    }
}
