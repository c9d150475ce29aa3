// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for visitor-probe flood simulation.
//!
//! Drives the resolver with forged visitor identities and records how many
//! probe jobs actually reach the worker.

pub mod attacks;
pub mod generators;
pub mod metrics;
