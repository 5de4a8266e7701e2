// ABOUTME: Domain constants shared by validation and persistence
// ABOUTME: Field length limits, set type discriminators, and the validation base key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Field length limits enforced at validation time
pub mod limits {
    /// Maximum characters in an exercise name
    pub const EXERCISE_NAME_MAX_CHARS: usize = 255;
    /// Maximum characters in an exercise memo
    pub const EXERCISE_MEMO_MAX_CHARS: usize = 1000;
    /// Smallest allowed order index for entries and sets
    pub const MIN_ORDER_INDEX: i64 = 1;
    /// Smallest allowed repetition count on a strength set
    pub const MIN_REPS: i64 = 1;
    /// Smallest allowed duration on a cardio set
    pub const MIN_DURATION_SECONDS: i64 = 1;
}

/// Values stored in the `workout_sets.type` discriminator column
pub mod set_types {
    /// Strength set discriminator
    pub const STRENGTH: &str = "StrengthSet";
    /// Cardio set discriminator
    pub const CARDIO: &str = "CardioSet";
}

/// Key used for entity-scoped validation errors
pub const BASE_FIELD: &str = "base";
