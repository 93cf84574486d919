//! Default sizing used when a [`crate::code::CodeImage`]'s metadata
//! requests defaults (a zero value in either slot).

/// Number of general-purpose registers in a task's register file.
pub const REGISTER_COUNT: usize = 16;

/// Default call-stack depth when a code image's metadata specifies zero.
pub const DEFAULT_CALL_STACK_SIZE: u32 = 8;

/// Default data-stack depth when a code image's metadata specifies zero.
pub const DEFAULT_DATA_STACK_SIZE: u32 = 32;
