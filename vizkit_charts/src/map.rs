// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Base maps are drawn by an external renderer; this module only resolves what to ask it for.

extern crate alloc;

use alloc::string::String;

use vizkit_core::Result;

use crate::layout::{ChartSize, Size};

/// A geographic base-map renderer (a tile/vector map library).
pub trait BaseMapRenderer {
    /// Handle to the rendered map, owned by the caller.
    type Handle;

    /// Renders a map of `style` into a container of `size`.
    ///
    /// `center` is `(longitude, latitude)`. `None` values leave the renderer's own defaults in
    /// place.
    fn render_base_map(
        &mut self,
        size: Size,
        style: &str,
        center: Option<(f64, f64)>,
        zoom: Option<f64>,
    ) -> Result<Self::Handle>;
}

/// Settings for a base-map chart.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseMapSpec {
    /// Map style reference (usually a style URL).
    pub style: String,
    /// Initial `(longitude, latitude)`.
    pub center: Option<(f64, f64)>,
    /// Initial zoom level.
    pub zoom: Option<f64>,
    /// Requested size.
    pub size: ChartSize,
}

impl BaseMapSpec {
    /// A map of `style` at the renderer's default view.
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            center: None,
            zoom: None,
            size: ChartSize::default(),
        }
    }

    /// Sets the initial center.
    pub fn with_center(mut self, longitude: f64, latitude: f64) -> Self {
        self.center = Some((longitude, latitude));
        self
    }

    /// Sets the initial zoom level.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Sets the requested size.
    pub fn with_size(mut self, size: ChartSize) -> Self {
        self.size = size;
        self
    }

    /// Resolves the size and hands the map to `renderer`.
    pub fn render<R: BaseMapRenderer>(
        &self,
        renderer: &mut R,
        container: Option<Size>,
    ) -> Result<R::Handle> {
        let size = self.size.resolve(container);
        tracing::debug!(style = %self.style, width = size.width, height = size.height, "rendering base map");
        renderer.render_base_map(size, &self.style, self.center, self.zoom)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec::Vec;
    use vizkit_core::Error;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Size, String, Option<(f64, f64)>, Option<f64>)>,
    }

    impl BaseMapRenderer for Recorder {
        type Handle = usize;

        fn render_base_map(
            &mut self,
            size: Size,
            style: &str,
            center: Option<(f64, f64)>,
            zoom: Option<f64>,
        ) -> Result<usize> {
            if style.is_empty() {
                return Err(Error::BaseMap("missing style".into()));
            }
            self.calls.push((size, style.into(), center, zoom));
            Ok(self.calls.len())
        }
    }

    #[test]
    fn absent_view_settings_are_left_to_the_renderer() {
        let mut r = Recorder::default();
        let spec = BaseMapSpec::new("https://tiles.example/style.json")
            .with_size(ChartSize::default().with_width(400.0).with_relative_height(0.5));
        assert_eq!(spec.render(&mut r, None), Ok(1));
        assert_eq!(r.calls[0].0, Size::new(400.0, 200.0));
        assert_eq!(r.calls[0].2, None);
        assert_eq!(r.calls[0].3, None);

        let spec = spec.with_center(10.0, 20.0).with_zoom(3.0);
        spec.render(&mut r, None).unwrap();
        assert_eq!(r.calls[1].2, Some((10.0, 20.0)));
        assert_eq!(r.calls[1].3, Some(3.0));
    }

    #[test]
    fn renderer_errors_propagate() {
        let mut r = Recorder::default();
        assert!(matches!(
            BaseMapSpec::new("").render(&mut r, None),
            Err(Error::BaseMap(_))
        ));
    }
}
