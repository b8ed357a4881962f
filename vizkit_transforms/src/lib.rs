// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data passes that run before layout.
//!
//! This crate provides:
//! - [`Extent`]: null-filtered value extents with sign-aware zero inclusion and overrides,
//! - [`normalize`]: extents plus stable per-item identifiers and label-ordered slots,
//! - [`stack`]: per-segment stack offsets for stacked bars and areas,
//! - [`TableQuery`]: filter/sort over auxiliary records for data tables,
//! - [`linear_regression`]: ordinary least squares.
//!
//! Everything here is a pure function of its inputs; nothing is cached between calls.

#![no_std]

extern crate alloc;

mod extent;
mod normalize;
mod regression;
mod stack;
mod table;

pub use extent::{Extent, ExtentOptions, ZeroInclusion};
pub use normalize::{IdStrategy, NormalizeOptions, Normalized, Slot, normalize};
pub use regression::{LinearFit, linear_regression};
pub use stack::{StackOffset, StackSort, stack, stack_order};
pub use table::{ColumnFilter, SortOrder, TableQuery};
