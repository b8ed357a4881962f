// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark roles used to derive stable [`MarkId`](vizkit_core::MarkId)s.
//!
//! Data marks hash `(role, item, part)`; guide marks pack `(role, index)`. Each role names one
//! kind of shape so ids never collide across kinds.

pub(crate) const BAR: u16 = 1;
pub(crate) const BAR_LABEL: u16 = 2;
pub(crate) const BAR_VALUE: u16 = 3;
pub(crate) const DOT: u16 = 4;
pub(crate) const CONNECTOR: u16 = 5;
pub(crate) const ARROW: u16 = 6;
pub(crate) const POINT: u16 = 7;
pub(crate) const POINT_LABEL: u16 = 8;
pub(crate) const LINE: u16 = 9;
pub(crate) const BAND: u16 = 10;
pub(crate) const AREA: u16 = 11;
pub(crate) const SEGMENT: u16 = 12;

pub(crate) const AXIS_DOMAIN: u16 = 100;
pub(crate) const AXIS_TICK: u16 = 101;
pub(crate) const AXIS_LABEL: u16 = 102;
pub(crate) const AXIS_TITLE: u16 = 103;
pub(crate) const GRID: u16 = 104;
pub(crate) const BASELINE: u16 = 105;
pub(crate) const REFERENCE: u16 = 106;
pub(crate) const REFERENCE_LABEL: u16 = 107;
pub(crate) const HIGHLIGHT: u16 = 108;
pub(crate) const CUSTOM_HIGHLIGHT: u16 = 109;
pub(crate) const ANNOTATION: u16 = 110;
pub(crate) const ANNOTATION_RING: u16 = 111;
pub(crate) const ANNOTATION_LEADER: u16 = 112;
pub(crate) const REGRESSION: u16 = 113;
pub(crate) const LEGEND_SWATCH: u16 = 114;
pub(crate) const LEGEND_LABEL: u16 = 115;
pub(crate) const LEGEND_TITLE: u16 = 116;
pub(crate) const HOVER_RULE: u16 = 117;
pub(crate) const HOVER_DOT: u16 = 118;
pub(crate) const EMPTY_STATE: u16 = 119;
pub(crate) const TIMELINE_LABEL: u16 = 120;
