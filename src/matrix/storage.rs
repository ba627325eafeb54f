//! Compressed lane storage shared by CSR, CSC and sparse vectors
//!
//! A [`CompressedStorage`] is a sequence of `n_major` lanes. Each lane holds
//! strictly ascending minor indices with a parallel list of non-zero values:
//! - ptr: Array of size n_major + 1; lane k occupies `ptr[k]..ptr[k + 1]`
//! - idx: Array of size nnz containing minor indices
//! - values: Array of size nnz containing the non-zero values
//!
//! CSR uses rows as lanes, CSC uses columns, and a sparse vector is a single
//! lane. The wrappers translate (row, column) into (major, minor).

use crate::scalar::Scalar;
use crate::utils::exclusive_scan;

/// Sorted entries of one output lane: `(minor indices, values)`
pub type Lane<T> = (Vec<usize>, Vec<T>);

#[derive(Clone, Debug, PartialEq)]
pub struct CompressedStorage<T> {
    pub(crate) n_major: usize,
    pub(crate) n_minor: usize,
    pub(crate) ptr: Vec<usize>,
    pub(crate) idx: Vec<usize>,
    pub(crate) values: Vec<T>,
}

impl<T: Scalar> CompressedStorage<T> {
    /// Empty storage with every lane absent
    pub fn new(n_major: usize, n_minor: usize) -> Self {
        Self {
            n_major,
            n_minor,
            ptr: vec![0; n_major + 1],
            idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds storage from unordered `(major, minor, value)` triplets.
    ///
    /// Entries are bucketed by lane with a counting sort, each lane is sorted
    /// by minor index, duplicate coordinates are summed and zeros dropped.
    /// Coordinates must already be in range.
    pub fn from_triplets(
        n_major: usize,
        n_minor: usize,
        triplets: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Self {
        let triplets: Vec<(usize, usize, T)> = triplets.into_iter().collect();

        let mut counts = vec![0usize; n_major];
        for &(major, _, _) in &triplets {
            counts[major] += 1;
        }

        let start = exclusive_scan(&counts);

        let mut cursor = start.clone();
        let mut bucketed: Vec<(usize, T)> = vec![(0, T::zero()); triplets.len()];
        for (major, minor, value) in triplets {
            bucketed[cursor[major]] = (minor, value);
            cursor[major] += 1;
        }

        let mut lanes = Vec::with_capacity(n_major);
        for major in 0..n_major {
            let bucket = &mut bucketed[start[major]..start[major + 1]];
            bucket.sort_by_key(|&(minor, _)| minor);

            let mut idx: Vec<usize> = Vec::with_capacity(bucket.len());
            let mut values: Vec<T> = Vec::with_capacity(bucket.len());
            for &(minor, value) in bucket.iter() {
                match idx.last() {
                    Some(&last) if last == minor => {
                        let slot = values.len() - 1;
                        values[slot] = values[slot] + value;
                    }
                    _ => {
                        idx.push(minor);
                        values.push(value);
                    }
                }
            }
            lanes.push(drop_zeros(idx, values));
        }

        Self::from_lanes(n_major, n_minor, lanes)
    }

    /// Assembles storage from per-lane results that are already sorted and zero free
    pub fn from_lanes(n_major: usize, n_minor: usize, lanes: Vec<Lane<T>>) -> Self {
        let mut storage = Self::new(n_major, n_minor);
        storage.assign_lanes(lanes);
        storage
    }

    /// Replaces the contents with `lanes`, one entry per major index
    pub fn assign_lanes(&mut self, lanes: Vec<Lane<T>>) {
        debug_assert_eq!(lanes.len(), self.n_major, "one lane per major index");

        let total: usize = lanes.iter().map(|(idx, _)| idx.len()).sum();

        self.ptr.clear();
        self.ptr.reserve(self.n_major + 1);
        self.ptr.push(0);
        self.idx.clear();
        self.idx.reserve(total);
        self.values.clear();
        self.values.reserve(total);

        for (idx, values) in lanes {
            debug_assert!(idx.windows(2).all(|w| w[0] < w[1]), "lane must be strictly ascending");
            debug_assert!(values.iter().all(|v| !v.is_zero()), "lane must not hold zeros");
            self.idx.extend(idx);
            self.values.extend(values);
            self.ptr.push(self.idx.len());
        }

        // Pad lanes the caller did not supply
        while self.ptr.len() < self.n_major + 1 {
            self.ptr.push(self.idx.len());
        }
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Minor indices and values of lane `major`
    pub fn lane(&self, major: usize) -> (&[usize], &[T]) {
        let start = self.ptr[major];
        let end = self.ptr[major + 1];
        (&self.idx[start..end], &self.values[start..end])
    }

    /// Ascending `(minor, value)` pairs of lane `major`
    pub fn lane_iter(&self, major: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let (idx, values) = self.lane(major);
        idx.iter().copied().zip(values.iter().copied())
    }

    /// Ascending `(major, value)` pairs at minor index `minor`, one binary search per lane
    pub fn minor_iter(&self, minor: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        (0..self.n_major).filter_map(move |major| {
            let (idx, values) = self.lane(major);
            idx.binary_search(&minor).ok().map(|p| (major, values[p]))
        })
    }

    /// Lane `major` expanded to `n_minor` values with zeros filled in
    pub fn lane_to_dense(&self, major: usize) -> Vec<T> {
        let mut dense = vec![T::zero(); self.n_minor];
        for (minor, value) in self.lane_iter(major) {
            dense[minor] = value;
        }
        dense
    }

    pub fn get(&self, major: usize, minor: usize) -> T {
        let (idx, values) = self.lane(major);
        match idx.binary_search(&minor) {
            Ok(p) => values[p],
            Err(_) => T::zero(),
        }
    }

    /// Stores `value` at `(major, minor)`, removing the entry when `value` is zero
    pub fn set(&mut self, major: usize, minor: usize, value: T) {
        let start = self.ptr[major];
        let end = self.ptr[major + 1];

        match self.idx[start..end].binary_search(&minor) {
            Ok(p) => {
                if value.is_zero() {
                    self.idx.remove(start + p);
                    self.values.remove(start + p);
                    for ptr in &mut self.ptr[major + 1..] {
                        *ptr -= 1;
                    }
                } else {
                    self.values[start + p] = value;
                }
            }
            Err(p) => {
                if !value.is_zero() {
                    self.idx.insert(start + p, minor);
                    self.values.insert(start + p, value);
                    for ptr in &mut self.ptr[major + 1..] {
                        *ptr += 1;
                    }
                }
            }
        }
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.ptr.iter_mut().for_each(|p| *p = 0);
        self.idx.clear();
        self.values.clear();
    }

    /// Swaps the major and minor axes with a counting sort over minor indices
    pub fn transpose(&self) -> Self {
        // Count entries per minor index
        let mut counts = vec![0usize; self.n_minor];
        for &minor in &self.idx {
            counts[minor] += 1;
        }

        // Prefix sum gives the new lane pointers
        let ptr = exclusive_scan(&counts);

        let nnz = self.nnz();
        let mut idx = vec![0; nnz];
        let mut values = vec![T::zero(); nnz];
        let mut cursor = ptr.clone();

        // Walking majors in order keeps every new lane ascending
        for major in 0..self.n_major {
            for (minor, value) in self.lane_iter(major) {
                let pos = cursor[minor];
                idx[pos] = major;
                values[pos] = value;
                cursor[minor] += 1;
            }
        }

        Self {
            n_major: self.n_minor,
            n_minor: self.n_major,
            ptr,
            idx,
            values,
        }
    }

    /// Applies `f` to every stored value, dropping results that become zero
    pub fn map_values(&self, f: impl Fn(T) -> T) -> Self {
        let lanes = (0..self.n_major)
            .map(|major| {
                let (idx, values) = self.lane(major);
                drop_zeros(idx.to_vec(), values.iter().map(|&v| f(v)).collect())
            })
            .collect();
        Self::from_lanes(self.n_major, self.n_minor, lanes)
    }
}

/// Filters zero values (and their indices) out of a lane
pub(crate) fn drop_zeros<T: Scalar>(idx: Vec<usize>, values: Vec<T>) -> Lane<T> {
    if values.iter().all(|v| !v.is_zero()) {
        return (idx, values);
    }
    idx.into_iter()
        .zip(values)
        .filter(|(_, v)| !v.is_zero())
        .unzip()
}
