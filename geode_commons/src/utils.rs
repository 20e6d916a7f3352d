// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use itertools::Itertools;
use smallvec::SmallVec;

pub type SVec<T> = SmallVec<[T; 4]>;
pub type SVecN<T, const N: usize> = SmallVec<[T; N]>;

pub trait IteratorUtils: Iterator {
    fn collect_svec(self) -> SVec<Self::Item>
    where
        Self: Sized,
    {
        self.collect()
    }
}

/// Rotates the given iterator by shifting all elements `shift` positions
/// forward. Any elements that would be out of bounds are instead put at the
/// beginning.
///
/// This method requires passing the `len` as a separate parameter. This is
/// often known beforehand or can be found by calling .size_hint() for an
/// ExactSizeIterator.
pub fn rotate_iter<T>(
    it: impl Iterator<Item = T> + Clone,
    shift: usize,
    len: usize,
) -> impl Iterator<Item = T> {
    it.cycle().dropping(shift).take(len)
}

impl<T: ?Sized> IteratorUtils for T where T: Iterator {}

pub trait SliceUtils<T> {
    /// Same as .iter().copied(), but doesn't trigger rustfmt line breaks
    fn iter_cpy(&self) -> std::iter::Copied<std::slice::Iter<'_, T>>;
}

impl<T: Copy> SliceUtils<T> for [T] {
    fn iter_cpy(&self) -> std::iter::Copied<std::slice::Iter<'_, T>> {
        self.iter().copied()
    }
}

/// Extension trait for `Option`.
///
/// NOTE: Functions use a final underscore to avoid colliding with stdlib
/// functions that will be stabilized in the future.
pub trait OptionExt<T> {
    fn as_option(&self) -> &Option<T>;
    /// Returns `true` if the option is a [`Some`] and the value inside of it
    /// matches a predicate.
    fn is_some_and_(&self, f: impl FnOnce(&T) -> bool) -> bool {
        matches!(self.as_option(), Some(x) if f(x))
    }

    /// Returns true if the function is a [`None`] or when the value inside
    /// matches a predicate.
    fn is_none_or_(&self, f: impl FnOnce(&T) -> bool) -> bool {
        let this = self.as_option();
        this.is_none() || f(this.as_ref().unwrap())
    }
}
impl<T> OptionExt<T> for Option<T> {
    fn as_option(&self) -> &Option<T> {
        self
    }
}

#[test]
pub fn rotate_iter_wraps_around() {
    assert_eq!(
        rotate_iter(vec![1, 2, 3, 4, 5].into_iter(), 2, 5).collect_vec(),
        &[3, 4, 5, 1, 2]
    );
}
