/*!
 * Serde helper functions for compact serialization
 */

/// Skip serializing zero u64 values
#[inline]
pub fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}
