//! One-dimensional track sizing shared by the screen layout and the native grid.

/// Sizing rule for one row or column track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Exactly this many cells.
    Fixed(u16),
    /// Proportional share of the remaining space, like CSS `fr`.
    Flex(u16),
}

/// Start offset and length of a solved track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u16,
    pub len: u16,
}

impl Span {
    pub fn end(&self) -> u16 {
        self.start.saturating_add(self.len)
    }
}

#[derive(Debug, Clone)]
struct Segment {
    length: u32,
    min: u32,
    flex: u32,
}

impl Segment {
    fn from_track(track: Track) -> Self {
        match track {
            Track::Fixed(value) => Segment {
                length: u32::from(value),
                min: u32::from(value),
                flex: 0,
            },
            Track::Flex(weight) => Segment {
                length: 0,
                min: 0,
                flex: u32::from(weight.max(1)),
            },
        }
    }
}

/// Lay `tracks` out along `available` cells with `gap` cells between neighbours.
pub fn solve_tracks(available: u16, tracks: &[Track], gap: u16) -> Vec<Span> {
    if tracks.is_empty() {
        return Vec::new();
    }

    let gap_total = gap.saturating_mul(tracks.len().saturating_sub(1) as u16);
    let lengths = distribute(available.saturating_sub(gap_total), tracks);

    let mut cursor: u16 = 0;
    lengths
        .into_iter()
        .map(|len| {
            let span = Span { start: cursor, len };
            cursor = cursor.saturating_add(len).saturating_add(gap);
            span
        })
        .collect()
}

fn distribute(distributable: u16, tracks: &[Track]) -> Vec<u16> {
    let mut segments: Vec<Segment> = tracks.iter().copied().map(Segment::from_track).collect();

    let total = u32::from(distributable);
    let used: u32 = segments.iter().map(|s| s.length).sum();
    if used > total {
        shrink_segments(&mut segments, used - total);
    } else if total > used {
        distribute_flex(&mut segments, total - used);
    }

    segments
        .into_iter()
        .map(|segment| segment.length.min(u32::from(u16::MAX)) as u16)
        .collect()
}

/// Take cells back from the last tracks first, honouring minimums before going to zero.
fn shrink_segments(segments: &mut [Segment], mut over: u32) {
    for pass_min in [true, false] {
        for segment in segments.iter_mut().rev() {
            if over == 0 {
                return;
            }
            let floor = if pass_min { segment.min } else { 0 };
            let give = segment.length.saturating_sub(floor).min(over);
            segment.length -= give;
            over -= give;
        }
    }
}

fn distribute_flex(segments: &mut [Segment], remaining: u32) {
    let total_flex: u32 = segments.iter().map(|s| s.flex).sum();
    if total_flex == 0 {
        return;
    }

    let mut leftover = remaining;
    for segment in segments.iter_mut().filter(|s| s.flex > 0) {
        let share = (remaining * segment.flex) / total_flex;
        segment.length += share;
        leftover -= share;
    }

    // Rounding remainder goes round-robin to flexible tracks, left first.
    let flexible: Vec<usize> = (0..segments.len())
        .filter(|&idx| segments[idx].flex > 0)
        .collect();
    let mut idx = 0;
    while leftover > 0 {
        segments[flexible[idx % flexible.len()]].length += 1;
        leftover -= 1;
        idx += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lens(spans: &[Span]) -> Vec<u16> {
        spans.iter().map(|s| s.len).collect()
    }

    #[test]
    fn equal_flex_columns_share_remainder_left_first() {
        let spans = solve_tracks(40, &[Track::Flex(1); 12], 1);
        // 40 - 11 gaps = 29 cells over 12 columns.
        assert_eq!(lens(&spans), vec![3, 3, 3, 3, 3, 2, 2, 2, 2, 2, 2, 2]);
        assert_eq!(spans[1].start, 4);
        assert_eq!(spans.last().unwrap().end(), 40);
    }

    #[test]
    fn fixed_and_flex_mix() {
        let spans = solve_tracks(30, &[Track::Fixed(3), Track::Flex(1)], 0);
        assert_eq!(lens(&spans), vec![3, 27]);
        assert_eq!(spans[1].start, 3);
    }

    #[test]
    fn overflow_shrinks_from_the_end() {
        let spans = solve_tracks(5, &[Track::Fixed(3), Track::Fixed(3), Track::Fixed(3)], 0);
        assert_eq!(lens(&spans), vec![3, 2, 0]);
    }

    #[test]
    fn no_tracks_no_spans() {
        assert!(solve_tracks(10, &[], 1).is_empty());
    }
}
