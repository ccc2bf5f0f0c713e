//! Merges over sorted, duplicate-free doc id slices.
//! Every output is again sorted and duplicate-free.

use std::cmp::Ordering;

pub type DocSet = Vec<u32>;

pub fn intersect(a: &[u32], b: &[u32]) -> DocSet {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result
}

pub fn union(a: &[u32], b: &[u32]) -> DocSet {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                result.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                result.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);
    result
}

/// `a` minus `b`
pub fn difference(a: &[u32], b: &[u32]) -> DocSet {
    let mut result = Vec::with_capacity(a.len());
    let mut j = 0;
    for &doc_id in a {
        while j < b.len() && b[j] < doc_id {
            j += 1;
        }
        if j >= b.len() || b[j] != doc_id {
            result.push(doc_id);
        }
    }
    result
}
