//! Compressed sparse row storage for the document-term matrix.

use crate::tfidf::vectorizer::SparseVector;
use serde::{Deserialize, Serialize};

/// Row-major sparse matrix; row `i` spans `indptr[i]..indptr[i + 1]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CsrMatrix {
    pub n_cols: usize,
    pub indptr: Vec<usize>,
    pub indices: Vec<u32>,
    pub data: Vec<f32>,
}

impl CsrMatrix {
    pub fn from_rows(rows: &[SparseVector], n_cols: usize) -> Self {
        let nnz = rows.iter().map(|r| r.indices.len()).sum();
        let mut m = Self {
            n_cols,
            indptr: Vec::with_capacity(rows.len() + 1),
            indices: Vec::with_capacity(nnz),
            data: Vec::with_capacity(nnz),
        };
        m.indptr.push(0);
        for row in rows {
            m.indices.extend_from_slice(&row.indices);
            m.data.extend_from_slice(&row.values);
            m.indptr.push(m.indices.len());
        }
        m
    }

    pub fn n_rows(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    pub fn row(&self, i: usize) -> (&[u32], &[f32]) {
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        (&self.indices[start..end], &self.data[start..end])
    }

    /// Dot product of `query` with every row, in row order.
    pub fn dot_rows<'a>(&'a self, query: &'a SparseVector) -> impl Iterator<Item = (u32, f32)> + 'a {
        (0..self.n_rows()).map(move |i| {
            let (indices, values) = self.row(i);
            (i as u32, query.dot(indices, values))
        })
    }

    /// Check structural invariants after deserialization.
    pub fn validate(&self) -> Result<(), String> {
        if self.indptr.first() != Some(&0) {
            return Err("indptr must start at 0".into());
        }
        if self.indices.len() != self.data.len() {
            return Err(format!(
                "indices.len() {} != data.len() {}",
                self.indices.len(),
                self.data.len()
            ));
        }
        if self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err("indptr must be non-decreasing".into());
        }
        if self.indptr.last() != Some(&self.indices.len()) {
            return Err(format!(
                "indptr ends at {:?}, expected {}",
                self.indptr.last(),
                self.indices.len()
            ));
        }
        if let Some(&col) = self.indices.iter().find(|&&c| c as usize >= self.n_cols) {
            return Err(format!("column {} >= n_cols {}", col, self.n_cols));
        }
        // Sparse dot products merge-join on column order.
        for i in 0..self.n_rows() {
            let (indices, _) = self.row(i);
            if !indices.windows(2).all(|w| w[0] < w[1]) {
                return Err(format!("row {} columns are not strictly ascending", i));
            }
        }
        Ok(())
    }
}
