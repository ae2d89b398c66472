// src/compositor/tests.rs

#[cfg(test)]
mod compositor_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::color::{BlendMode, Rgb};
    use crate::compositor::*;
    use crate::error::CompositeError;
    use crate::layer::Layer;
    use crate::sink::NullSink;
    use crate::surface::Surface;
    use test_log::test; // For logging within tests

    const MODES: [BlendMode; 4] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
    ];

    /// Records streamed pixels in emission order.
    #[derive(Default)]
    struct Capture(Rc<RefCell<Vec<(i16, i16, Rgb)>>>);

    impl Capture {
        fn compositor(&self) -> LayerCompositor {
            let log = Rc::clone(&self.0);
            LayerCompositor::new(move |x: i16, y: i16, r: u8, g: u8, b: u8| {
                log.borrow_mut().push((x, y, Rgb::new(r, g, b)));
            })
        }

        fn pixels(&self) -> Vec<Rgb> {
            self.0.borrow().iter().map(|&(_, _, px)| px).collect()
        }

        fn coords(&self) -> Vec<(i16, i16)> {
            self.0.borrow().iter().map(|&(x, y, _)| (x, y)).collect()
        }

        fn is_empty(&self) -> bool {
            self.0.borrow().is_empty()
        }
    }

    fn filled(width: u16, height: u16, color: Rgb) -> Layer {
        let mut l = Layer::new(width, height, NullSink).expect("layer allocation");
        l.fill_screen(color);
        l
    }

    fn from_row(row: &[Rgb]) -> Layer {
        let mut l = Layer::new(row.len() as u16, 1, NullSink).expect("layer allocation");
        for (x, &px) in row.iter().enumerate() {
            l.draw_pixel(x as i16, 0, px);
        }
        l
    }

    // --- stack ---

    #[test]
    fn stack_write_back_with_transparent_foreground_keeps_background() {
        let mut bg = from_row(&[Rgb::RED, Rgb::GREEN, Rgb::BLUE]);
        let before = bg.pixels().to_vec();
        let fg = filled(3, 1, Rgb::BLACK);
        let capture = Capture::default();
        let mut compositor = capture.compositor();

        compositor.stack(&mut bg, &fg, true);

        assert_eq!(bg.pixels(), &before[..]);
        assert!(capture.is_empty());
    }

    #[test]
    fn stack_write_back_overwrites_with_opaque_pixels() {
        let mut bg = from_row(&[Rgb::RED, Rgb::GREEN, Rgb::BLUE]);
        let fg = from_row(&[Rgb::BLACK, Rgb::WHITE, Rgb::BLACK]);
        let mut compositor = LayerCompositor::new(NullSink);

        compositor.stack(&mut bg, &fg, true);

        assert_eq!(bg.row(0), &[Rgb::RED, Rgb::WHITE, Rgb::BLUE]);
    }

    #[test]
    fn stack_streams_without_touching_background() {
        let mut bg = from_row(&[Rgb::RED, Rgb::GREEN]);
        let mut fg = from_row(&[Rgb::WHITE, Rgb::BLUE]);
        fg.set_transparency_color(Rgb::BLUE);
        let capture = Capture::default();
        let mut compositor = capture.compositor();

        compositor.stack(&mut bg, &fg, false);

        assert_eq!(capture.pixels(), vec![Rgb::WHITE, Rgb::GREEN]);
        assert_eq!(bg.row(0), &[Rgb::RED, Rgb::GREEN]);
    }

    #[test]
    fn stack_ignores_disabled_transparency_flag() {
        let mut bg = from_row(&[Rgb::RED]);
        let mut fg = from_row(&[Rgb::BLACK]);
        fg.set_transparency(false);
        let capture = Capture::default();
        let mut compositor = capture.compositor();

        compositor.stack(&mut bg, &fg, false);

        assert_eq!(capture.pixels(), vec![Rgb::RED]);
    }

    // --- silhouette / blend ---

    #[test]
    fn silhouette_cuts_background_to_foreground_shape() {
        let bg = from_row(&[Rgb::RED, Rgb::GREEN, Rgb::BLUE]);
        let fg = from_row(&[Rgb::WHITE, Rgb::BLACK, Rgb::new(1, 1, 1)]);
        let capture = Capture::default();

        capture.compositor().silhouette(&bg, &fg);

        assert_eq!(capture.pixels(), vec![Rgb::RED, Rgb::BLACK, Rgb::BLUE]);
    }

    #[test]
    fn blend_mixes_opaque_pixels_by_ratio() {
        let bg = from_row(&[Rgb::new(0, 0, 0), Rgb::new(100, 100, 100)]);
        let fg = from_row(&[Rgb::new(200, 200, 200), Rgb::BLACK]);
        let capture = Capture::default();
        let mut compositor = capture.compositor();

        compositor.blend(&bg, &fg, DEFAULT_BLEND_RATIO);

        // blend8(0, 200, 127) = (200 + 200 * 127) >> 8
        assert_eq!(capture.pixels(), vec![Rgb::new(100, 100, 100), Rgb::new(100, 100, 100)]);
    }

    #[test]
    fn blend_ratio_extremes_select_an_operand() {
        let bg = filled(2, 2, Rgb::RED);
        let fg = filled(2, 2, Rgb::BLUE);
        let capture = Capture::default();
        let mut compositor = capture.compositor();

        compositor.blend(&bg, &fg, 0);
        compositor.blend(&bg, &fg, 255);

        let pixels = capture.pixels();
        assert!(pixels[..4].iter().all(|&px| px == Rgb::RED));
        assert!(pixels[4..].iter().all(|&px| px == Rgb::BLUE));
    }

    // --- blend_advanced ---

    #[test]
    fn blend_advanced_zero_opacity_returns_background_for_every_mode() {
        let bg = from_row(&[Rgb::new(200, 100, 50), Rgb::new(3, 250, 128)]);
        let fg = from_row(&[Rgb::new(100, 100, 100), Rgb::new(255, 0, 77)]);
        for mode in MODES {
            let capture = Capture::default();
            capture.compositor().blend_advanced(&bg, &fg, mode, 0);
            assert_eq!(capture.pixels(), bg.pixels(), "mode {:?}", mode);
        }
    }

    #[test]
    fn blend_advanced_full_opacity_normal_returns_foreground() {
        let bg = from_row(&[Rgb::new(200, 100, 50), Rgb::new(3, 250, 128)]);
        let fg = from_row(&[Rgb::new(100, 100, 100), Rgb::new(255, 0, 77)]);
        let capture = Capture::default();

        capture.compositor().blend_advanced(&bg, &fg, BlendMode::Normal, 255);

        assert_eq!(capture.pixels(), fg.pixels());
    }

    #[test]
    fn blend_advanced_multiply() {
        let bg = from_row(&[Rgb::new(200, 100, 50)]);
        let fg = from_row(&[Rgb::new(100, 100, 100)]);
        let capture = Capture::default();

        capture.compositor().blend_advanced(&bg, &fg, BlendMode::Multiply, 255);

        assert_eq!(capture.pixels(), vec![Rgb::new(78, 39, 19)]);
    }

    #[test]
    fn blend_advanced_honors_transparency_flag() {
        let bg = from_row(&[Rgb::RED]);
        let mut fg = from_row(&[Rgb::BLACK]);
        let capture = Capture::default();
        let mut compositor = capture.compositor();

        compositor.blend_advanced(&bg, &fg, BlendMode::Normal, 255);
        fg.set_transparency(false);
        compositor.blend_advanced(&bg, &fg, BlendMode::Normal, 255);

        assert_eq!(capture.pixels(), vec![Rgb::RED, Rgb::BLACK]);
    }

    // --- mask / alpha_composite ---

    #[test]
    fn white_mask_shows_foreground_and_black_mask_shows_background() {
        let bg = filled(3, 2, Rgb::new(10, 20, 30));
        let fg = filled(3, 2, Rgb::new(200, 150, 100));
        let white = filled(3, 2, Rgb::WHITE);
        let black = filled(3, 2, Rgb::BLACK);
        let capture = Capture::default();
        let mut compositor = capture.compositor();

        compositor.mask(&bg, &fg, &white);
        compositor.mask(&bg, &fg, &black);

        let pixels = capture.pixels();
        assert_eq!(&pixels[..6], fg.pixels());
        assert_eq!(&pixels[6..], bg.pixels());
    }

    #[test]
    fn mask_uses_channel_average_as_alpha() {
        let bg = from_row(&[Rgb::BLACK]);
        let fg = from_row(&[Rgb::new(255, 255, 255)]);
        // (255 + 0 + 0) / 3 = 85
        let mask = from_row(&[Rgb::RED]);
        let capture = Capture::default();

        capture.compositor().mask(&bg, &fg, &mask);

        // blend8(0, 255, 85) = (255 + 255 * 85) >> 8 = 85
        assert_eq!(capture.pixels(), vec![Rgb::new(85, 85, 85)]);
    }

    #[test]
    fn alpha_composite_blends_everything_when_transparency_disabled() {
        let bg = from_row(&[Rgb::new(100, 100, 100), Rgb::new(100, 100, 100)]);
        let mut fg = from_row(&[Rgb::BLACK, Rgb::WHITE]);
        let capture = Capture::default();
        let mut compositor = capture.compositor();

        compositor.alpha_composite(&bg, &fg, 255);
        fg.set_transparency(false);
        compositor.alpha_composite(&bg, &fg, 255);

        assert_eq!(
            capture.pixels(),
            vec![Rgb::new(100, 100, 100), Rgb::WHITE, Rgb::BLACK, Rgb::WHITE]
        );
    }

    // --- composite_multiple ---

    #[test]
    fn composite_multiple_rejects_bad_operands_before_emitting() {
        let l = filled(2, 2, Rgb::RED);
        let capture = Capture::default();
        let mut compositor = capture.compositor();

        assert_eq!(compositor.composite_multiple(&[], &[], &[]), Err(CompositeError::NoLayers));
        assert_eq!(
            compositor.composite_multiple(&[&l, &l, &l, &l, &l], &[BlendMode::Normal; 5], &[255; 5]),
            Err(CompositeError::TooManyLayers { count: 5, max: MAX_COMPOSITE_LAYERS })
        );
        assert_eq!(
            compositor.composite_multiple(&[&l, &l], &[BlendMode::Normal], &[255, 255]),
            Err(CompositeError::OperandMismatch { what: "blend modes", expected: 2, actual: 1 })
        );
        assert_eq!(
            compositor.composite_multiple(&[&l, &l], &[BlendMode::Normal; 2], &[255, 255, 255]),
            Err(CompositeError::OperandMismatch { what: "opacities", expected: 2, actual: 3 })
        );
        assert!(capture.is_empty());
    }

    #[test]
    fn composite_multiple_single_layer_streams_it() {
        let l = from_row(&[Rgb::RED, Rgb::GREEN]);
        let capture = Capture::default();

        capture
            .compositor()
            .composite_multiple(&[&l], &[BlendMode::Screen], &[0])
            .unwrap();

        assert_eq!(capture.pixels(), vec![Rgb::RED, Rgb::GREEN]);
    }

    #[test]
    fn composite_multiple_folds_bottom_up() {
        let base = from_row(&[Rgb::new(200, 100, 50), Rgb::new(200, 100, 50)]);
        let multiply = from_row(&[Rgb::new(100, 100, 100), Rgb::BLACK]);
        let top = from_row(&[Rgb::BLACK, Rgb::WHITE]);
        let capture = Capture::default();

        capture
            .compositor()
            .composite_multiple(
                &[&base, &multiply, &top],
                &[BlendMode::Overlay, BlendMode::Multiply, BlendMode::Normal],
                &[0, 255, 255],
            )
            .unwrap();

        // Pixel 0: multiply applies, black top is transparent.
        // Pixel 1: black multiply layer is transparent, white top replaces.
        assert_eq!(capture.pixels(), vec![Rgb::new(78, 39, 19), Rgb::WHITE]);
    }

    #[test]
    fn composite_multiple_matches_chained_blend_advanced() {
        let base = from_row(&[Rgb::new(30, 60, 90), Rgb::new(250, 5, 128)]);
        let a = from_row(&[Rgb::new(128, 200, 10), Rgb::new(7, 7, 7)]);
        let b = from_row(&[Rgb::new(64, 64, 255), Rgb::new(199, 3, 140)]);

        let folded = Capture::default();
        folded
            .compositor()
            .composite_multiple(
                &[&base, &a, &b],
                &[BlendMode::Normal, BlendMode::Screen, BlendMode::Overlay],
                &[255, 90, 200],
            )
            .unwrap();

        let first = Capture::default();
        first.compositor().blend_advanced(&base, &a, BlendMode::Screen, 90);
        let intermediate = from_row(&first.pixels());
        let second = Capture::default();
        second
            .compositor()
            .blend_advanced(&intermediate, &b, BlendMode::Overlay, 200);

        assert_eq!(folded.pixels(), second.pixels());
    }

    // --- extents ---

    #[test]
    fn mismatched_sizes_clip_to_common_extent() {
        let bg = filled(4, 3, Rgb::RED);
        let fg = filled(2, 5, Rgb::BLUE);
        let capture = Capture::default();

        capture.compositor().blend(&bg, &fg, 255);

        assert_eq!(common_extent_of(&[&bg, &fg]), (2, 3));
        assert_eq!(
            capture.coords(),
            vec![(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2)]
        );
    }

    #[test]
    fn stack_write_back_clips_to_smaller_background() {
        let mut bg = filled(2, 2, Rgb::RED);
        let fg = filled(4, 4, Rgb::GREEN);
        let mut compositor = LayerCompositor::new(NullSink);

        compositor.stack(&mut bg, &fg, true);

        assert_eq!(bg.get_pixel_count(Rgb::GREEN), 4);
    }

    fn common_extent_of(surfaces: &[&dyn Surface]) -> (u16, u16) {
        crate::surface::common_extent(surfaces)
    }
}
