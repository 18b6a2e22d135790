// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic dataflow infrastructure shared by the analyses built on this IR.

pub mod dataflow;
