//! Handicap-stroke allocation and round score math.
//!
//! Pure functions: no store access, no clock. Unscored holes stay `None`
//! through every computation so the UI can distinguish an incomplete round
//! from a round of zeros.

use crate::dao::models::{HoleInfoEntity, HoleScoreEntity};

/// Neutral slope rating in the course handicap formula.
const STANDARD_SLOPE: f64 = 113.0;

/// Course handicap from a handicap index and the tee's slope rating,
/// halved (still rounded) for 9-hole rounds.
pub fn course_handicap(handicap_index: f64, slope_rating: u32, holes_per_round: u32) -> i32 {
    let mut raw = handicap_index * f64::from(slope_rating) / STANDARD_SLOPE;
    if holes_per_round == 9 {
        raw /= 2.0;
    }
    raw.round() as i32
}

/// Handicap strokes a hole receives.
///
/// Every hole gets `H div N` strokes; holes whose stroke index is at most
/// `H mod N` get one more, so the hardest holes absorb the remainder first
/// and the per-hole strokes sum to `H` for any non-negative handicap.
/// Negative handicaps receive no strokes.
pub fn strokes_for_hole(course_handicap: i32, stroke_index: u32, holes_per_round: u32) -> u32 {
    if course_handicap <= 0 || holes_per_round == 0 {
        return 0;
    }
    let holes = holes_per_round as i32;
    let full_passes = course_handicap / holes;
    let remainder = course_handicap % holes;
    let extra = if stroke_index as i32 <= remainder { 1 } else { 0 };
    (full_passes + extra) as u32
}

/// Net strokes for one hole. `None` gross propagates as `None`.
pub fn adjusted(gross: Option<u32>, strokes: u32) -> Option<i32> {
    gross.map(|g| g as i32 - strokes as i32)
}

/// Allocate strokes over a tee's holes and pair them with gross scores.
///
/// `tee` must be in hole order and `gross` parallel to it; extra gross
/// entries are ignored and missing ones count as unscored.
pub fn score_round(
    course_handicap: i32,
    tee: &[HoleInfoEntity],
    gross: &[Option<u32>],
) -> Vec<HoleScoreEntity> {
    tee.iter()
        .enumerate()
        .map(|(idx, info)| {
            let strokes = strokes_for_hole(course_handicap, info.stroke_index, tee.len() as u32);
            let hole_gross = gross.get(idx).copied().flatten();
            HoleScoreEntity {
                hole: info.hole,
                par: info.par,
                yardage: info.yardage,
                stroke_index: info.stroke_index,
                gross: hole_gross,
                strokes,
                adjusted: adjusted(hole_gross, strokes),
            }
        })
        .collect()
}

/// Sums over one half (or the whole) of a round.
///
/// `gross` and `adjusted` are present only when every contributing hole
/// is scored; yardage and par come from reference data and always sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideTotals {
    /// Total yardage of the contributing holes.
    pub yardage: u32,
    /// Total par of the contributing holes.
    pub par: u32,
    /// Gross sum, absent while any contributing hole is unscored.
    pub gross: Option<u32>,
    /// Adjusted sum, absent while any contributing hole is unscored.
    pub adjusted: Option<i32>,
}

/// Front, back, and whole-round sums for a scored round.
///
/// 18-hole rounds split 1–9 / 10–18; a 9-hole round is a single front
/// nine and carries no back aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTotals {
    /// Front-half sums.
    pub front: SideTotals,
    /// Back-half sums; absent for 9-hole rounds.
    pub back: Option<SideTotals>,
    /// Whole-round sums.
    pub total: SideTotals,
}

impl RoundTotals {
    /// Compute aggregates for a round's holes.
    pub fn of(holes: &[HoleScoreEntity]) -> Self {
        let split = if holes.len() >= 18 { 9 } else { holes.len() };
        let (front_holes, back_holes) = holes.split_at(split);

        let front = side_totals(front_holes);
        let back = if back_holes.is_empty() {
            None
        } else {
            Some(side_totals(back_holes))
        };

        RoundTotals {
            front,
            back,
            total: side_totals(holes),
        }
    }
}

fn side_totals(holes: &[HoleScoreEntity]) -> SideTotals {
    SideTotals {
        yardage: holes.iter().map(|h| h.yardage).sum(),
        par: holes.iter().map(|h| h.par).sum(),
        gross: sum_all(holes.iter().map(|h| h.gross)),
        adjusted: sum_all(holes.iter().map(|h| h.adjusted)),
    }
}

/// Sum that is defined only when every element is; an unscored hole makes
/// the whole aggregate undefined rather than zero.
fn sum_all<T: std::iter::Sum>(values: impl Iterator<Item = Option<T>>) -> Option<T> {
    values.collect::<Option<Vec<T>>>().map(|v| v.into_iter().sum())
}
