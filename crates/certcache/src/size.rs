//! Approximate in-memory footprint of cached values
//!
//! The estimate is the value's own (stack) size plus the bytes it owns on the
//! heap: string contents, collection elements and boxed payloads, recursively.
//! Allocator overhead, spare capacity and hash table bookkeeping are ignored,
//! so the result is a lower bound suitable only for budgeting cache capacity.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

/// Estimate of a value's memory footprint in bytes.
///
/// Composite types implement [`heap_size`](SizeOf::heap_size) as the sum of
/// their fields' heap sizes; the fields' inline sizes are already covered by
/// `size_of_val` of the enclosing value.
pub trait SizeOf {
    /// Bytes owned outside of the value's inline representation.
    fn heap_size(&self) -> u64 {
        0
    }

    /// Inline size plus [`heap_size`](SizeOf::heap_size).
    fn size_of(&self) -> u64 {
        std::mem::size_of_val(self) as u64 + self.heap_size()
    }
}

/// Estimate the footprint of `value`.
pub fn size_of<T: SizeOf + ?Sized>(value: &T) -> u64 {
    value.size_of()
}

macro_rules! inline_only {
    ($($ty:ty),* $(,)?) => {
        $(impl SizeOf for $ty {})*
    };
}

inline_only!(
    (), bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

impl SizeOf for str {}

impl SizeOf for String {
    fn heap_size(&self) -> u64 {
        self.len() as u64
    }
}

impl SizeOf for Path {}

impl SizeOf for PathBuf {
    fn heap_size(&self) -> u64 {
        self.as_os_str().len() as u64
    }
}

impl<T: SizeOf> SizeOf for [T] {
    fn heap_size(&self) -> u64 {
        self.iter().map(SizeOf::heap_size).sum()
    }
}

impl<T: SizeOf> SizeOf for Vec<T> {
    fn heap_size(&self) -> u64 {
        self.iter().map(SizeOf::size_of).sum()
    }
}

impl<T: SizeOf + ?Sized> SizeOf for Box<T> {
    fn heap_size(&self) -> u64 {
        (**self).size_of()
    }
}

impl<T: SizeOf> SizeOf for Option<T> {
    fn heap_size(&self) -> u64 {
        self.as_ref().map_or(0, SizeOf::heap_size)
    }
}

impl<Tz: TimeZone> SizeOf for DateTime<Tz> {}
