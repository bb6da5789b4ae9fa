//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing the beginning of a period.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing the (exclusive) end of a period.
#[derive(Clone, Copy, Debug)]
pub struct End;
