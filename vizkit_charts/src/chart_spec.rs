// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Settings shared by every chart family.

extern crate alloc;

use alloc::string::String;

use vizkit_core::Datum;

use crate::color::Theme;
use crate::interaction::InteractionController;
use crate::layout::{ChartLayout, ChartSize, Margins, Size};
use crate::tooltip::Template;

/// Default number of characters kept in category labels.
pub const DEFAULT_TRUNCATE_BY: usize = 999;

/// Default inner padding between bars, as a fraction of the step.
pub const DEFAULT_BAR_PADDING: f64 = 0.25;

/// Default dot radius.
pub const DEFAULT_RADIUS: f64 = 5.0;

/// Default axis tick count.
pub const DEFAULT_TICK_COUNT: usize = 5;

/// Size, margins, theme and interaction settings common to all charts.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSettings {
    /// Requested size.
    pub size: ChartSize,
    /// Size of the hosting container, when known.
    pub container: Option<Size>,
    /// Margins around the plot.
    pub margins: Margins,
    /// Light or dark chrome.
    pub theme: Theme,
    /// Right-to-left layout.
    pub rtl: bool,
    /// Hover tooltip template.
    pub tooltip: Option<Template>,
    /// Whether clicking the clicked item again clears the click.
    pub reset_selection_on_double_click: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self::with_default_margins(Margins::default())
    }
}

impl ChartSettings {
    /// Default settings with family-specific margins.
    pub fn with_default_margins(margins: Margins) -> Self {
        Self {
            size: ChartSize::default(),
            container: None,
            margins,
            theme: Theme::Light,
            rtl: false,
            tooltip: None,
            reset_selection_on_double_click: true,
        }
    }

    /// Sets the requested size.
    pub fn with_size(mut self, size: ChartSize) -> Self {
        self.size = size;
        self
    }

    /// Sets the container size.
    pub fn with_container(mut self, container: Size) -> Self {
        self.container = Some(container);
        self
    }

    /// Sets the margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Sets the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Enables right-to-left layout.
    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    /// Sets the tooltip template.
    pub fn with_tooltip(mut self, template: Template) -> Self {
        self.tooltip = Some(template);
        self
    }

    /// Sets whether a second click on the clicked item clears it.
    pub fn with_reset_selection_on_double_click(mut self, reset: bool) -> Self {
        self.reset_selection_on_double_click = reset;
        self
    }

    /// Resolved outer size.
    pub fn resolved_size(&self) -> Size {
        self.size.resolve(self.container)
    }

    /// Arranges the plot inside the resolved size.
    ///
    /// `extra` is added to the configured margins (room for axis titles).
    pub fn arrange(&self, extra: Margins) -> ChartLayout {
        let m = self.margins;
        let margins = Margins::new(
            m.top + extra.top,
            m.bottom + extra.bottom,
            m.left + extra.left,
            m.right + extra.right,
        );
        ChartLayout::arrange(self.resolved_size(), margins)
    }

    /// An interaction controller configured from these settings.
    pub fn controller<T>(&self) -> InteractionController<T> {
        InteractionController::new().with_reset_on_double_click(self.reset_selection_on_double_click)
    }

    /// Tooltip text for `datum`, if a template is set.
    pub fn tooltip_text(&self, datum: &impl Datum) -> Option<String> {
        self.tooltip.as_ref().map(|t| t.render(datum))
    }
}
