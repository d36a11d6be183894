// Constants for the TAC generator

/// Address handed to the first declared variable
pub const VARIABLE_BASE: usize = 500;

/// Address handed to the first temporary
/// Temporaries live in their own region above the variables
pub const TEMPORARY_BASE: usize = 1000;

/// Stride between consecutive slots, also the scale of array indexing
pub const WORD_SIZE: usize = 4;

/// Call lowered to `PRINT`
pub const OUTPUT_FUNCTION: &str = "output";
