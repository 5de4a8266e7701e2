// ABOUTME: Domain models re-exported from setbook-core
// ABOUTME: Users, exercises, workouts, workout exercises, and sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use setbook_core::models::*;
