// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover, click and legend-highlight state.
//!
//! [`InteractionController`] owns one chart's [`Selection`]. Pointer events move it between
//! states, fire the optional callbacks and return the same information as an
//! [`InteractionEvent`] for callers that poll instead.

extern crate alloc;

use alloc::sync::Arc;

use peniko::Color;
use vizkit_core::ItemId;

use crate::frame::HitTarget;

/// Opacity of shapes outside the current highlight.
pub const DIM_OPACITY: f64 = 0.3;

/// Resting opacity of bars when nothing is highlighted.
pub const DEFAULT_OPACITY: f64 = 0.85;

/// Single-selection state.
///
/// Hovering while an item is clicked keeps the click and tracks the hover alongside it.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Selection<T> {
    /// No pointer over an item and nothing clicked.
    #[default]
    Idle,
    /// Pointer over an item.
    Hovering(T),
    /// An item is clicked.
    Clicked {
        /// The clicked item.
        item: T,
        /// The item under the pointer, if any.
        hovered: Option<T>,
    },
}

impl<T> Selection<T> {
    /// The item under the pointer.
    pub fn hovered(&self) -> Option<&T> {
        match self {
            Self::Idle => None,
            Self::Hovering(item) => Some(item),
            Self::Clicked { hovered, .. } => hovered.as_ref(),
        }
    }

    /// The clicked item.
    pub fn clicked(&self) -> Option<&T> {
        match self {
            Self::Clicked { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Returns `true` in the idle state.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What changed in response to an event.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent<T> {
    /// The hovered item changed (`None` when the pointer left).
    Hover(Option<T>),
    /// The clicked item changed (`None` when the click was reset).
    Click(Option<T>),
}

/// A hover or click callback.
pub type Callback<T> = Arc<dyn Fn(Option<&T>)>;

/// Per-frame highlight inputs for layouts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    /// Legend color being hovered; other colors are dimmed.
    pub selected_color: Option<Color>,
    /// Item under the pointer.
    pub hovered: Option<ItemId>,
}

impl ViewState {
    /// Highlights one legend color.
    pub fn with_selected_color(mut self, color: Option<Color>) -> Self {
        self.selected_color = color;
        self
    }

    /// Marks one item as hovered.
    pub fn with_hovered(mut self, hovered: Option<ItemId>) -> Self {
        self.hovered = hovered;
        self
    }
}

/// Hover/click state machine for one chart.
pub struct InteractionController<T> {
    selection: Selection<T>,
    hovered_color: Option<Color>,
    reset_on_double_click: bool,
    on_hover: Option<Callback<T>>,
    on_click: Option<Callback<T>>,
}

impl<T: core::fmt::Debug> core::fmt::Debug for InteractionController<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InteractionController")
            .field("selection", &self.selection)
            .field("hovered_color", &self.hovered_color)
            .field("reset_on_double_click", &self.reset_on_double_click)
            .field("on_hover", &self.on_hover.is_some())
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

impl<T> Default for InteractionController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InteractionController<T> {
    /// An idle controller that resets a click when the clicked item is clicked again.
    pub fn new() -> Self {
        Self {
            selection: Selection::Idle,
            hovered_color: None,
            reset_on_double_click: true,
            on_hover: None,
            on_click: None,
        }
    }

    /// Whether clicking the clicked item again clears the click.
    pub fn with_reset_on_double_click(mut self, reset: bool) -> Self {
        self.reset_on_double_click = reset;
        self
    }

    /// Sets the hover callback.
    pub fn with_on_hover(mut self, f: impl Fn(Option<&T>) + 'static) -> Self {
        self.on_hover = Some(Arc::new(f));
        self
    }

    /// Sets the click callback.
    pub fn with_on_click(mut self, f: impl Fn(Option<&T>) + 'static) -> Self {
        self.on_click = Some(Arc::new(f));
        self
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection<T> {
        &self.selection
    }

    /// Legend color currently hovered.
    pub fn hovered_color(&self) -> Option<Color> {
        self.hovered_color
    }

    /// Sets or clears the legend color used for cross-highlighting.
    pub fn hover_color(&mut self, color: Option<Color>) {
        self.hovered_color = color;
    }

    /// Returns to idle without firing callbacks (inputs changed underneath the chart).
    pub fn reset(&mut self) {
        tracing::debug!("selection reset");
        self.selection = Selection::Idle;
        self.hovered_color = None;
    }

    fn fire_hover(&self, item: Option<&T>) {
        if let Some(f) = &self.on_hover {
            f(item);
        }
    }

    fn fire_click(&self, item: Option<&T>) {
        if let Some(f) = &self.on_click {
            f(item);
        }
    }
}

impl<T: Clone + PartialEq> InteractionController<T> {
    /// The pointer entered `item`.
    pub fn pointer_enter(&mut self, item: T) -> InteractionEvent<T> {
        self.selection = match core::mem::take(&mut self.selection) {
            Selection::Idle | Selection::Hovering(_) => Selection::Hovering(item.clone()),
            Selection::Clicked { item: clicked, .. } => Selection::Clicked {
                item: clicked,
                hovered: Some(item.clone()),
            },
        };
        self.fire_hover(Some(&item));
        InteractionEvent::Hover(Some(item))
    }

    /// The pointer moved; only a change of hovered item is an event.
    pub fn pointer_move(&mut self, item: T) -> Option<InteractionEvent<T>> {
        if self.selection.hovered() == Some(&item) {
            return None;
        }
        Some(self.pointer_enter(item))
    }

    /// The pointer left the chart's items.
    pub fn pointer_leave(&mut self) -> InteractionEvent<T> {
        self.selection = match core::mem::take(&mut self.selection) {
            Selection::Idle | Selection::Hovering(_) => Selection::Idle,
            Selection::Clicked { item, .. } => Selection::Clicked {
                item,
                hovered: None,
            },
        };
        self.fire_hover(None);
        InteractionEvent::Hover(None)
    }

    /// `item` was clicked.
    ///
    /// Clicking the clicked item again returns to idle when reset-on-double-click is enabled;
    /// otherwise the click is re-reported.
    pub fn click(&mut self, item: T) -> InteractionEvent<T> {
        let same = self.selection.clicked() == Some(&item);
        if same && self.reset_on_double_click {
            self.selection = Selection::Idle;
            self.fire_click(None);
            return InteractionEvent::Click(None);
        }
        let hovered = self.selection.hovered().cloned();
        self.selection = Selection::Clicked {
            item: item.clone(),
            hovered,
        };
        self.fire_click(Some(&item));
        InteractionEvent::Click(Some(item))
    }
}

impl InteractionController<HitTarget> {
    /// Highlight inputs for the next layout.
    pub fn view_state(&self) -> ViewState {
        ViewState {
            selected_color: self.hovered_color,
            hovered: self.selection.hovered().map(|t| t.id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[test]
    fn hover_then_leave() {
        let mut c = InteractionController::new();
        assert_eq!(c.pointer_enter("a"), InteractionEvent::Hover(Some("a")));
        assert_eq!(c.selection(), &Selection::Hovering("a"));
        assert_eq!(c.pointer_move("a"), None, "same item is not an event");
        assert_eq!(c.pointer_leave(), InteractionEvent::Hover(None));
        assert!(c.selection().is_idle());
    }

    #[test]
    fn hovering_keeps_the_click() {
        let mut c = InteractionController::new();
        c.click("a");
        c.pointer_enter("b");
        assert_eq!(
            c.selection(),
            &Selection::Clicked {
                item: "a",
                hovered: Some("b")
            }
        );
        c.pointer_leave();
        assert_eq!(c.selection().clicked(), Some(&"a"));
        assert_eq!(c.selection().hovered(), None);
    }

    #[test]
    fn double_click_reset_reports_none() {
        let seen: Rc<RefCell<Vec<Option<&'static str>>>> = Rc::default();
        let log = seen.clone();
        let mut c = InteractionController::new()
            .with_on_click(move |item: Option<&&'static str>| log.borrow_mut().push(item.copied()));
        c.click("a");
        c.click("a");
        assert!(c.selection().is_idle());
        assert_eq!(*seen.borrow(), [Some("a"), None]);
    }

    #[test]
    fn without_reset_a_second_click_sticks() {
        let mut c = InteractionController::new().with_reset_on_double_click(false);
        c.click("a");
        assert_eq!(c.click("a"), InteractionEvent::Click(Some("a")));
        assert_eq!(c.selection().clicked(), Some(&"a"));
        assert_eq!(c.click("b"), InteractionEvent::Click(Some("b")));
    }

    #[test]
    fn reset_clears_everything_silently() {
        let fired = Rc::new(RefCell::new(0));
        let count = fired.clone();
        let mut c = InteractionController::new().with_on_hover(move |_: Option<&u8>| {
            *count.borrow_mut() += 1;
        });
        c.pointer_enter(1);
        c.hover_color(Some(Color::BLACK));
        c.reset();
        assert!(c.selection().is_idle());
        assert_eq!(c.hovered_color(), None);
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn view_state_follows_hover_and_legend() {
        let mut c = InteractionController::new();
        let target = HitTarget::datum(ItemId::Index(2), 2);
        c.pointer_enter(target);
        c.hover_color(Some(Color::WHITE));
        let view = c.view_state();
        assert_eq!(view.hovered, Some(ItemId::Index(2)));
        assert_eq!(view.selected_color, Some(Color::WHITE));
    }
}
