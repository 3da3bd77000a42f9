// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `bytemuck` trait impls, so vertex buffers can be uploaded as raw bytes.

#![allow(
    unsafe_code,
    reason = "The `bytemuck` marker traits are `unsafe` and require `unsafe impl`."
)]

use bytemuck::{Pod, Zeroable};

use crate::GlyphVertex;

// Safety: The struct is `repr(C)` and all-zero bytes are a valid value of every field.
unsafe impl Zeroable for GlyphVertex {}

// Safety: The struct is `repr(C)`, every field is `Pod`, and the fields (4 + 4 + 2 + 2 + 4
// bytes) leave no padding.
unsafe impl Pod for GlyphVertex {}
