// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared data model and scene primitives for vizkit.
//!
//! This crate holds everything the chart layers agree on:
//! - **Inputs**: [`Label`]s, per-family datums (e.g. [`BarDatum`], [`ScatterDatum`]) and static
//!   overlays such as [`ReferenceValue`] and [`Annotation`].
//! - **Identity**: [`ItemId`] names a data item stably across recomputes, and [`MarkId`] names a
//!   rendered shape.
//! - **Output**: [`Mark`]s grouped by a [`Scene`], which diffs successive frames into
//!   [`MarkDiff`]s for a renderer.
//!
//! Every chart layout is a pure function of its inputs; the [`Scene`] is the only stateful piece
//! and it only remembers the previous frame.

#![no_std]

extern crate alloc;

mod datum;
mod error;
mod id;
mod label;
mod mark;
mod overlay;
mod scene;

pub use datum::{
    AreaDatum, BarDatum, BeeSwarmDatum, Datum, DumbbellDatum, GroupedBarDatum, IntervalDatum,
    ScatterDatum, StackedBarDatum, StripDatum, Values,
};
pub use error::{Error, Result};
pub use id::ItemId;
pub use label::{Label, Record};
pub use mark::{
    CircleMark, Mark, MarkId, MarkPayload, PathMark, RectMark, TextAnchor, TextBaseline, TextMark,
};
pub use overlay::{
    Annotation, AnnotationAlign, CustomHighlightArea, HighlightArea, ReferenceValue,
};
pub use scene::{MarkDiff, Scene};
