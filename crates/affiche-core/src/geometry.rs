//! Fit/fill placement of natural-size content inside an anchor frame.
//!
//! One computation serves all three backends: the raster backend consumes
//! the source window directly as a crop rect, the vector backend expresses
//! it through `meet`/`slice` viewport clipping, and the document backend
//! pre-crops before embedding. Keeping the math in one place is what makes
//! the three crops pixel-identical.

use crate::{HorizontalAlign, Rect, ScaleStrategy, VerticalAlign};

/// Where content ends up: `dest` on the surface, `src` inside the natural
/// image (the crop window, equal to the full image for `Fit`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub dest: Rect,
    pub src: Rect,
}

impl Placement {
    /// The uniform scale factor mapping `src` onto `dest`.
    pub fn scale(&self) -> f32 {
        self.dest.width / self.src.width
    }
}

/// Resolve the drawn box for content of natural size `natural_width` x
/// `natural_height` inside `frame`.
///
/// Returns `None` when either natural dimension is not positive: the scale
/// would be undefined, so the element renders nothing.
pub fn place(
    frame: Rect,
    natural_width: f32,
    natural_height: f32,
    horizontal: HorizontalAlign,
    vertical: VerticalAlign,
    strategy: ScaleStrategy,
) -> Option<Placement> {
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return None;
    }
    if frame.width <= 0.0 || frame.height <= 0.0 {
        return None;
    }

    match strategy {
        ScaleStrategy::Fit => {
            let scale =
                (frame.width / natural_width).min(frame.height / natural_height);
            let drawn_width = scale * natural_width;
            let drawn_height = scale * natural_height;
            let dest = Rect::new(
                frame.x + horizontal_slack(frame.width - drawn_width, horizontal),
                frame.y + vertical_slack(frame.height - drawn_height, vertical),
                drawn_width,
                drawn_height,
            );
            Some(Placement {
                dest,
                src: Rect::new(0.0, 0.0, natural_width, natural_height),
            })
        }
        ScaleStrategy::Fill => {
            let scale =
                (frame.width / natural_width).max(frame.height / natural_height);
            let src_width = frame.width / scale;
            let src_height = frame.height / scale;
            let src = Rect::new(
                horizontal_slack(natural_width - src_width, horizontal),
                vertical_slack(natural_height - src_height, vertical),
                src_width,
                src_height,
            );
            Some(Placement { dest: frame, src })
        }
    }
}

fn horizontal_slack(slack: f32, align: HorizontalAlign) -> f32 {
    match align {
        HorizontalAlign::Left => 0.0,
        HorizontalAlign::Center => slack / 2.0,
        HorizontalAlign::Right => slack,
    }
}

fn vertical_slack(slack: f32, align: VerticalAlign) -> f32 {
    match align {
        VerticalAlign::Top => 0.0,
        VerticalAlign::Center => slack / 2.0,
        VerticalAlign::Bottom => slack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: [HorizontalAlign; 3] = [
        HorizontalAlign::Left,
        HorizontalAlign::Center,
        HorizontalAlign::Right,
    ];
    const V: [VerticalAlign; 3] = [
        VerticalAlign::Top,
        VerticalAlign::Center,
        VerticalAlign::Bottom,
    ];

    #[test]
    fn natural_size_equal_to_frame_is_alignment_invariant() {
        let frame = Rect::new(10.0, 20.0, 300.0, 400.0);
        for h in H {
            for v in V {
                for strategy in [ScaleStrategy::Fit, ScaleStrategy::Fill] {
                    let placement = place(frame, 300.0, 400.0, h, v, strategy)
                        .unwrap_or_else(|| panic!("placement for {h:?}/{v:?}"));
                    assert_eq!(placement.dest, frame, "{h:?}/{v:?}/{strategy:?}");
                    assert_eq!(
                        placement.src,
                        Rect::new(0.0, 0.0, 300.0, 400.0),
                        "{h:?}/{v:?}/{strategy:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn fit_letterboxes_wide_content() {
        let frame = Rect::new(0.0, 0.0, 100.0, 100.0);
        let placement = place(
            frame,
            200.0,
            100.0,
            HorizontalAlign::Center,
            VerticalAlign::Center,
            ScaleStrategy::Fit,
        )
        .unwrap();
        assert_eq!(placement.dest, Rect::new(0.0, 25.0, 100.0, 50.0));
        assert_eq!(placement.src, Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn fit_alignment_distributes_slack() {
        let frame = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Drawn size is 100x50, so all slack is vertical.
        let top = place(
            frame,
            200.0,
            100.0,
            HorizontalAlign::Left,
            VerticalAlign::Top,
            ScaleStrategy::Fit,
        )
        .unwrap();
        assert_eq!(top.dest.y, 0.0);

        let bottom = place(
            frame,
            200.0,
            100.0,
            HorizontalAlign::Left,
            VerticalAlign::Bottom,
            ScaleStrategy::Fit,
        )
        .unwrap();
        assert_eq!(bottom.dest.y, 50.0);
    }

    #[test]
    fn fill_covers_and_crops_opposite_the_anchor() {
        let frame = Rect::new(0.0, 0.0, 100.0, 100.0);

        // scale = max(0.5, 1.0) = 1.0; the source window is 100 of 200 wide.
        let left = place(
            frame,
            200.0,
            100.0,
            HorizontalAlign::Left,
            VerticalAlign::Center,
            ScaleStrategy::Fill,
        )
        .unwrap();
        assert_eq!(left.dest, frame);
        assert_eq!(left.src, Rect::new(0.0, 0.0, 100.0, 100.0));

        let right = place(
            frame,
            200.0,
            100.0,
            HorizontalAlign::Right,
            VerticalAlign::Center,
            ScaleStrategy::Fill,
        )
        .unwrap();
        assert_eq!(right.src, Rect::new(100.0, 0.0, 100.0, 100.0));

        let center = place(
            frame,
            200.0,
            100.0,
            HorizontalAlign::Center,
            VerticalAlign::Center,
            ScaleStrategy::Fill,
        )
        .unwrap();
        assert_eq!(center.src, Rect::new(50.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn fill_crops_vertically_for_tall_content() {
        let frame = Rect::new(0.0, 0.0, 100.0, 100.0);
        let bottom = place(
            frame,
            100.0,
            200.0,
            HorizontalAlign::Center,
            VerticalAlign::Bottom,
            ScaleStrategy::Fill,
        )
        .unwrap();
        // Bottom-aligned cover keeps the bottom edge, cropping the top half.
        assert_eq!(bottom.src, Rect::new(0.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn zero_natural_size_renders_nothing() {
        let frame = Rect::new(0.0, 0.0, 100.0, 100.0);
        for (w, h) in [(0.0, 50.0), (50.0, 0.0), (0.0, 0.0), (-1.0, 10.0)] {
            assert!(place(
                frame,
                w,
                h,
                HorizontalAlign::Center,
                VerticalAlign::Center,
                ScaleStrategy::Fit
            )
            .is_none());
        }
    }

    #[test]
    fn zero_sized_frame_renders_nothing() {
        let frame = Rect::new(0.0, 0.0, 0.0, 100.0);
        assert!(place(
            frame,
            10.0,
            10.0,
            HorizontalAlign::Center,
            VerticalAlign::Center,
            ScaleStrategy::Fill
        )
        .is_none());
    }

    #[test]
    fn placement_scale_maps_src_onto_dest() {
        let frame = Rect::new(0.0, 0.0, 100.0, 100.0);
        let placement = place(
            frame,
            200.0,
            100.0,
            HorizontalAlign::Left,
            VerticalAlign::Top,
            ScaleStrategy::Fill,
        )
        .unwrap();
        assert!((placement.scale() - 1.0).abs() < f32::EPSILON);
    }
}
