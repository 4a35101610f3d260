use lesson_core::model::NumberLine;

use super::escape::escape_html;

const LINE_WIDTH: f64 = 600.0;
const LINE_PADDING: f64 = 20.0;
const LINE_HEIGHT: f64 = 80.0;
const AXIS_Y: f64 = 40.0;
/// Upper bound on drawn ticks; a tiny step over a wide range would otherwise explode.
const MAX_TICKS: usize = 201;

pub(crate) const TEN_FRAME_SLOTS: usize = 10;

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

/// Tick values from `min` to `max` inclusive.
pub(crate) fn tick_values(line: &NumberLine) -> Vec<f64> {
    let (min, max) = drawn_range(line);
    let step = if line.step.is_finite() && line.step > 0.0 {
        line.step
    } else {
        1.0
    };
    let tolerance = step * 1e-9;
    (0..MAX_TICKS)
        .map(|i| min + step * i as f64)
        .take_while(|value| *value <= max + tolerance)
        .collect()
}

/// Drawn range; a `max` below `min` collapses onto `min`.
fn drawn_range(line: &NumberLine) -> (f64, f64) {
    let min = if line.min.is_finite() { line.min } else { 0.0 };
    let max = if line.max.is_finite() { line.max.max(min) } else { min };
    (min, max)
}

/// Horizontal position of `value`; the span is never below one unit.
pub(crate) fn position(line: &NumberLine, value: f64) -> f64 {
    let (min, max) = drawn_range(line);
    let span = (max - min).max(1.0);
    LINE_PADDING + (value - min) / span * (LINE_WIDTH - 2.0 * LINE_PADDING)
}

pub(crate) fn number_line(line: &NumberLine) -> String {
    let (min, max) = drawn_range(line);
    let mut svg = format!(
        r#"<svg class="number-line" viewBox="0 0 {LINE_WIDTH} {LINE_HEIGHT}" role="img" aria-label="Number line from {} to {}">"#,
        format_value(min),
        format_value(max)
    );
    svg.push_str(&format!(
        r#"<line class="axis" x1="{LINE_PADDING}" y1="{AXIS_Y}" x2="{}" y2="{AXIS_Y}" stroke="currentColor"/>"#,
        LINE_WIDTH - LINE_PADDING
    ));
    for value in tick_values(line) {
        let x = position(line, value);
        svg.push_str(&format!(
            r#"<line class="tick" x1="{x:.2}" y1="{}" x2="{x:.2}" y2="{}" stroke="currentColor"/><text x="{x:.2}" y="{}" text-anchor="middle">{}</text>"#,
            AXIS_Y - 6.0,
            AXIS_Y + 6.0,
            AXIS_Y + 24.0,
            escape_html(&format_value(value))
        ));
    }
    if let Some(target) = line.target.filter(|target| target.is_finite()) {
        let x = position(line, target.clamp(min, max));
        svg.push_str(&format!(
            r#"<circle class="target" cx="{x:.2}" cy="{AXIS_Y}" r="6"/>"#
        ));
        if line.show_target_label {
            svg.push_str(&format!(
                r#"<text class="target-label" x="{x:.2}" y="{}" text-anchor="middle">{}</text>"#,
                AXIS_Y - 14.0,
                escape_html(&format_value(target))
            ));
        }
    }
    svg.push_str("</svg>");
    svg
}

/// Filled slot count for a ten frame.
pub(crate) fn ten_frame_filled(value: i64) -> usize {
    usize::try_from(value.clamp(0, TEN_FRAME_SLOTS as i64)).unwrap_or(0)
}

pub(crate) fn ten_frame(value: i64) -> String {
    let filled = ten_frame_filled(value);
    let mut html = format!(r#"<div class="ten-frame" role="img" aria-label="Ten frame showing {filled}">"#);
    for slot in 0..TEN_FRAME_SLOTS {
        if slot < filled {
            html.push_str(r#"<span class="cell filled"></span>"#);
        } else {
            html.push_str(r#"<span class="cell"></span>"#);
        }
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(min: f64, max: f64, step: f64, target: Option<f64>) -> NumberLine {
        NumberLine {
            min,
            max,
            step,
            target,
            show_target_label: false,
        }
    }

    #[test]
    fn degenerate_range_draws_a_single_tick() {
        let zero = line(0.0, 0.0, 1.0, None);
        assert_eq!(tick_values(&zero), vec![0.0]);
        let svg = number_line(&zero);
        assert_eq!(svg.matches(r#"class="tick""#).count(), 1);
        assert!(!svg.contains("class=\"target\""));
    }

    #[test]
    fn reversed_range_draws_from_min_with_unit_span() {
        let reversed = line(5.0, 2.0, 1.0, Some(3.0));
        assert_eq!(tick_values(&reversed), vec![5.0]);
        assert!((position(&reversed, 5.0) - LINE_PADDING).abs() < 1e-9);
        let svg = number_line(&reversed);
        assert!(svg.contains(r#"aria-label="Number line from 5 to 5""#));
        assert_eq!(svg.matches(r#"class="target""#).count(), 1);
    }

    #[test]
    fn ticks_are_proportional() {
        let l = line(0.0, 10.0, 2.0, Some(5.0));
        assert_eq!(tick_values(&l), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert!((position(&l, 0.0) - LINE_PADDING).abs() < 1e-9);
        assert!((position(&l, 10.0) - (LINE_WIDTH - LINE_PADDING)).abs() < 1e-9);
        assert!((position(&l, 5.0) - LINE_WIDTH / 2.0).abs() < 1e-9);
        assert_eq!(number_line(&l).matches(r#"class="target""#).count(), 1);
    }

    #[test]
    fn fractional_steps_and_labels() {
        let mut l = line(0.0, 1.0, 0.25, Some(0.5));
        l.show_target_label = true;
        assert_eq!(tick_values(&l).len(), 5);
        let svg = number_line(&l);
        assert!(svg.contains(">0.25</text>"));
        assert!(svg.contains(r#"class="target-label""#));
    }

    #[test]
    fn bad_steps_are_bounded() {
        assert_eq!(tick_values(&line(0.0, 3.0, 0.0, None)).len(), 4);
        assert_eq!(tick_values(&line(0.0, 1e9, 1.0, None)).len(), MAX_TICKS);
    }

    #[test]
    fn ten_frame_clamps_filled_slots() {
        assert_eq!(ten_frame_filled(15), 10);
        assert_eq!(ten_frame_filled(-3), 0);
        let html = ten_frame(15);
        assert_eq!(html.matches("cell filled").count(), 10);
        assert_eq!(html.matches("<span").count(), TEN_FRAME_SLOTS);
        assert_eq!(ten_frame(4).matches("cell filled").count(), 4);
    }
}
