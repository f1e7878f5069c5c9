//! Worker partitioning over batch rows and Hamiltonians

/// Split `budget` workers between `n_rows` batch rows and `n_hams` Hamiltonians
///
/// Returns `(batch_threads, mea_threads)`, both at least 1, with a product
/// that never exceeds `budget` (for `budget ≥ 1`) and never exceeds the work
/// available along either axis. When everything fits, every row and every
/// Hamiltonian gets its own worker; otherwise the larger axis is served
/// first.
pub fn thread_balance(n_rows: usize, n_hams: usize, budget: usize) -> (usize, usize) {
    let n_rows = n_rows.max(1);
    let n_hams = n_hams.max(1);
    let budget = budget.max(1);

    if n_rows * n_hams <= budget {
        return (n_rows, n_hams);
    }
    if n_hams < n_rows {
        let batch = n_rows.min(budget);
        let mea = n_hams.min((budget / batch).max(1));
        (batch, mea)
    } else {
        let mea = n_hams.min(budget);
        let batch = n_rows.min((budget / mea).max(1));
        (batch, mea)
    }
}

/// Chunk length that splits `len` items over `workers` chunks
pub(crate) fn chunk_len(len: usize, workers: usize) -> usize {
    let workers = workers.max(1);
    ((len + workers - 1) / workers).max(1)
}
