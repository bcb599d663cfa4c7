//! Cosine similarity over embedding vectors.

/// Compute cosine similarity between two vectors.
///
/// Defined as dot(a, b) / (|a| * |b|), range [-1.0, 1.0]. Ranking must
/// stay total over whatever vectors the store holds, so degenerate
/// inputs score 0.0 instead of raising: mismatched dimensions, empty
/// vectors, and zero-norm vectors all yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();

    let a_norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let b_norm: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }

    dot_product / (a_norm * b_norm)
}
