use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::debug;

use crate::errors::{BenchError, SearchResult};
use crate::filters::FileSet;

/// A disjoint, ordered slice of the file set owned by a single worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub index: usize,
    pub files: Vec<PathBuf>,
}

/// Number of workers used for `file_count` files under `cap`
pub fn worker_count(file_count: usize, cap: NonZeroUsize) -> usize {
    file_count.min(cap.get())
}

/// Splits `files` round-robin into `min(cap, files.len())` partitions.
///
/// File `i` goes to partition `i % W`, so the same input always produces the
/// same partitions and every file lands in exactly one of them.
pub fn partition(files: &FileSet, cap: NonZeroUsize) -> SearchResult<Vec<Partition>> {
    if files.is_empty() {
        return Err(BenchError::NoFiles);
    }

    let workers = worker_count(files.len(), cap);
    let mut partitions: Vec<Partition> = (0..workers)
        .map(|index| Partition {
            index,
            files: Vec::with_capacity(files.len() / workers + 1),
        })
        .collect();

    for (i, path) in files.iter().enumerate() {
        partitions[i % workers].files.push(path.clone());
    }

    debug!(
        "Split {} files across {} partitions",
        files.len(),
        partitions.len()
    );
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn file_set(n: usize) -> FileSet {
        FileSet::new((0..n).map(|i| PathBuf::from(format!("file{}.txt", i))).collect())
    }

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_round_robin_assignment() {
        let parts = partition(&file_set(5), cap(2)).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[0].files,
            vec![
                PathBuf::from("file0.txt"),
                PathBuf::from("file2.txt"),
                PathBuf::from("file4.txt")
            ]
        );
        assert_eq!(
            parts[1].files,
            vec![PathBuf::from("file1.txt"), PathBuf::from("file3.txt")]
        );
        assert_eq!(parts[1].index, 1);
    }

    #[test]
    fn test_worker_count_capped_by_files() {
        let parts = partition(&file_set(3), cap(8)).unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| p.files.len() == 1));
        assert_eq!(worker_count(100, cap(8)), 8);
    }

    #[test]
    fn test_disjoint_cover_for_many_sizes() {
        for n in 1..40 {
            let files = file_set(n);
            for w in 1..12 {
                let parts = partition(&files, cap(w)).unwrap();
                assert_eq!(parts.len(), n.min(w));

                let all: Vec<_> = parts.iter().flat_map(|p| p.files.iter()).collect();
                let unique: HashSet<_> = all.iter().collect();
                assert_eq!(all.len(), n, "n={} w={}", n, w);
                assert_eq!(unique.len(), n, "n={} w={}", n, w);
                assert!(files.iter().all(|f| unique.contains(&f)));

                let sizes: Vec<_> = parts.iter().map(|p| p.files.len()).collect();
                let spread = sizes.iter().max().unwrap() - sizes.iter().min().unwrap();
                assert!(spread <= 1, "unbalanced split {:?}", sizes);
            }
        }
    }

    #[test]
    fn test_partitioning_is_reproducible() {
        let files = file_set(17);
        assert_eq!(
            partition(&files, cap(4)).unwrap(),
            partition(&files, cap(4)).unwrap()
        );
    }

    #[test]
    fn test_empty_file_set_rejected() {
        let result = partition(&FileSet::default(), cap(8));
        assert!(matches!(result, Err(BenchError::NoFiles)));
    }
}
