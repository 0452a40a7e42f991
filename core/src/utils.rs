// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::mem;

/// Split `items` into consecutive chunks of at most `chunk_size` elements,
/// keeping their order. A `chunk_size` of 0 is treated as 1.
pub fn partition<T>(items: impl IntoIterator<Item = T>, chunk_size: usize) -> Vec<Vec<T>> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut current = Vec::with_capacity(chunk_size);

    for item in items {
        current.push(item);
        if current.len() == chunk_size {
            chunks.push(mem::replace(&mut current, Vec::with_capacity(chunk_size)));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_uneven_tail() {
        let chunks = partition(1..=7, 3);
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn test_partition_empty() {
        let chunks: Vec<Vec<u8>> = partition(Vec::new(), 4);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_partition_zero_size_is_one() {
        let chunks = partition(["a", "b"], 0);
        assert_eq!(chunks, vec![vec!["a"], vec!["b"]]);
    }
}
