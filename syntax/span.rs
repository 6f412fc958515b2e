use std::fmt;
use std::ops::Range;

/// Byte range within a stream's source
///
/// Offsets are 32 bits wide. Positions past 4 GiB are clamped to `u32::MAX` by [`clamp_offset`].
#[derive(PartialEq, Eq, Hash, Clone, PartialOrd, Ord, Copy)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Span {
        Span { start, end }
    }

    /// Creates a zero-width span at `position`
    pub fn point(position: u32) -> Span {
        Span::new(position, position)
    }

    pub fn start(self) -> u32 {
        self.start
    }

    pub fn end(self) -> u32 {
        self.end
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn byte_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "Span[{}]", self.start)
        } else {
            write!(f, "Span[{}:{}]", self.start, self.end)
        }
    }
}

/// Converts a stream position to a span offset, clamping at `u32::MAX`
pub fn clamp_offset(position: usize) -> u32 {
    u32::try_from(position).unwrap_or(u32::MAX)
}

// This isn't #[cfg(test)] because it's used by the integration tests
pub fn t2s(v: &str) -> Span {
    if let Some(zero_size_off) = v.find('>') {
        let byte_pos = (zero_size_off + 1) as u32;

        return Span::point(byte_pos);
    }

    let start = v.find('^').expect("Positioning character not found") as u32;
    let end = v.rfind('^').map(|i| i + 1).unwrap() as u32;

    Span::new(start, end)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn marker_strings() {
        assert_eq!(Span::new(0, 3), t2s("^^^"));
        assert_eq!(Span::new(2, 4), t2s("  ^^ "));
        assert_eq!(Span::point(2), t2s(" >"));
    }

    #[test]
    fn ranges() {
        let span = Span::new(4, 9);

        assert_eq!(4..9, span.byte_range());
        assert!(!span.is_empty());
        assert!(Span::point(9).is_empty());
        assert_eq!("Span[4:9]", format!("{:?}", span));
        assert_eq!("Span[9]", format!("{:?}", Span::point(9)));
    }

    #[test]
    fn clamped_offsets() {
        assert_eq!(0, clamp_offset(0));
        assert_eq!(4096, clamp_offset(4096));
        assert_eq!(u32::MAX, clamp_offset(u32::MAX as usize));
        assert_eq!(u32::MAX, clamp_offset(usize::MAX));
    }
}
