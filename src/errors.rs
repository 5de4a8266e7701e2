// ABOUTME: Unified error handling re-exported from setbook-core
// ABOUTME: AppError, ErrorCode, and the typed auth, database, and validation errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use setbook_core::errors::*;
